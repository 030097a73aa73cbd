//! `list-emails`: recent emails with optional unread, flagged, mailbox, and
//! sender filters

use std::io::Write;

use tracing::debug;

use super::emit;
use crate::cli::ListEmailsArgs;
use crate::errors::AppResult;
use crate::format;
use crate::jmap::JmapClient;
use crate::query::{self, LIST_PROPERTIES, ListCriteria};

pub async fn run<W: Write>(client: &JmapClient, args: &ListEmailsArgs, out: &mut W) -> AppResult<()> {
    let mailbox_id = match &args.mailbox {
        Some(name) => Some(query::resolve_mailbox_id(client, name).await?),
        None => None,
    };
    let criteria = ListCriteria {
        unread_only: args.unread,
        flagged_only: args.flagged,
        mailbox_id,
        from: args.from.clone(),
    };

    let request = query::email_query(client.account_id(), query::list_filter(&criteria), args.limit);
    let found = client.email_query(&request).await?;
    debug!(count = found.ids.len(), "email query matched");
    if found.ids.is_empty() {
        return emit(out, "No emails found");
    }

    let fetched = client
        .email_get(&query::email_get(client.account_id(), found.ids.clone(), LIST_PROPERTIES))
        .await?;
    let emails = query::in_query_order(fetched.list, &found.ids);
    let title = list_title(emails.len(), args);
    emit(out, &format::render_email_list(&emails, Some(&title)))
}

/// `Found N email(s)` plus the active filters, in flag order
fn list_title(count: usize, args: &ListEmailsArgs) -> String {
    let mut filters = Vec::new();
    if args.unread {
        filters.push("unread".to_owned());
    }
    if args.flagged {
        filters.push("flagged".to_owned());
    }
    if let Some(mailbox) = &args.mailbox {
        filters.push(format!("in \"{mailbox}\""));
    }
    if let Some(from) = &args.from {
        filters.push(format!("from \"{from}\""));
    }

    if filters.is_empty() {
        format!("Found {count} email(s)")
    } else {
        format!("Found {count} email(s) ({})", filters.join(", "))
    }
}
