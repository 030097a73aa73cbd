//! `move-by-ids`: move emails into one mailbox, replacing their membership

use std::io::Write;

use tracing::warn;

use super::emit;
use crate::cli::MoveByIdsArgs;
use crate::errors::AppResult;
use crate::format;
use crate::jmap::JmapClient;
use crate::query;

/// Move every id into the named mailbox
///
/// Resolving the mailbox is fatal on failure. Per-id update failures are
/// listed in the report and do not change the exit status.
pub async fn run<W: Write>(client: &JmapClient, args: &MoveByIdsArgs, out: &mut W) -> AppResult<()> {
    let target = args.mailbox.as_str();
    let mailbox_id = query::resolve_mailbox_id(client, target).await?;

    emit(
        out,
        &format!("Moving {} email(s) to {target}...", args.email_ids.len()),
    )?;
    let result = client
        .email_set(&query::move_request(
            client.account_id(),
            &args.email_ids,
            &mailbox_id,
        ))
        .await?;

    let moved = result.updated.as_ref().map_or(0, |u| u.len());
    emit(out, &format!("Successfully moved {moved} emails to {target}"))?;

    let failures = format::render_failures("move", result.not_updated.as_ref());
    if !failures.is_empty() {
        warn!(
            failed = result.not_updated.as_ref().map_or(0, |f| f.len()),
            "some emails were not moved"
        );
        emit(out, &failures)?;
    }
    Ok(())
}
