//! `delete-emails`: permanently destroy emails by id

use std::io::Write;

use tracing::warn;

use super::emit;
use crate::cli::DeleteEmailsArgs;
use crate::errors::AppResult;
use crate::format;
use crate::jmap::JmapClient;
use crate::query;

/// Destroy every id in one request and report per-id failures
///
/// Partial failure is reported, not raised; the command still succeeds.
pub async fn run<W: Write>(
    client: &JmapClient,
    args: &DeleteEmailsArgs,
    out: &mut W,
) -> AppResult<()> {
    emit(out, &format!("Deleting {} email(s)...", args.email_ids.len()))?;
    let result = client
        .email_set(&query::destroy_request(client.account_id(), &args.email_ids))
        .await?;

    let deleted = result.destroyed.as_ref().map_or(0, Vec::len);
    emit(out, &format!("Successfully deleted {deleted} emails"))?;

    let failures = format::render_failures("delete", result.not_destroyed.as_ref());
    if !failures.is_empty() {
        warn!(
            failed = result.not_destroyed.as_ref().map_or(0, |f| f.len()),
            "some emails were not deleted"
        );
        emit(out, &failures)?;
    }
    Ok(())
}
