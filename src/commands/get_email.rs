//! `get-email`: full details and body of a single email

use std::io::Write;

use super::emit;
use crate::cli::GetEmailArgs;
use crate::errors::{AppError, AppResult};
use crate::format;
use crate::jmap::JmapClient;
use crate::query::{self, DETAIL_PROPERTIES};

pub async fn run<W: Write>(client: &JmapClient, args: &GetEmailArgs, out: &mut W) -> AppResult<()> {
    let email_id = args.email_id.as_str();
    let response = client
        .email_get(&query::email_get(
            client.account_id(),
            vec![email_id.to_owned()],
            DETAIL_PROPERTIES,
        ))
        .await?;

    let not_found = || AppError::NotFound(format!("Email {email_id} not found"));
    if response.is_not_found(email_id) {
        return Err(not_found());
    }
    let email = response.list.first().ok_or_else(not_found)?;
    emit(out, &format::render_email_detailed(email))
}
