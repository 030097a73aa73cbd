//! Command drivers, one per binary
//!
//! Each driver is a straight line: resolve what it needs, issue one or two
//! calls, render, and write the report to `out`. Drivers never exit the
//! process; the binary maps the returned result to a status.

pub mod delete_emails;
pub mod get_email;
pub mod list_emails;
pub mod list_mailboxes;
pub mod move_by_ids;
pub mod search_keywords;

use std::io::Write;

use crate::errors::{AppError, AppResult};

/// Write `text` and a trailing newline to `out`
fn emit<W: Write>(out: &mut W, text: &str) -> AppResult<()> {
    writeln!(out, "{text}")
        .and_then(|()| out.flush())
        .map_err(|e| AppError::Internal(format!("failed to write output: {e}")))
}
