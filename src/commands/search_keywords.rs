//! `search-keywords`: emails in one mailbox matching any of several
//! full-text keywords

use std::io::Write;

use super::emit;
use crate::cli::SearchKeywordsArgs;
use crate::errors::AppResult;
use crate::format;
use crate::jmap::JmapClient;
use crate::query::{self, SEARCH_PROPERTIES};

pub async fn run<W: Write>(
    client: &JmapClient,
    args: &SearchKeywordsArgs,
    out: &mut W,
) -> AppResult<()> {
    let mailbox_id = query::resolve_mailbox_id(client, &args.mailbox).await?;
    let filter = query::keyword_filter(&mailbox_id, &args.keywords);
    let keywords = args.keywords.join(", ");

    let found = client
        .email_query(&query::email_query(client.account_id(), Some(filter), args.limit))
        .await?;
    if found.ids.is_empty() {
        return emit(out, &format!("No emails found matching keywords: {keywords}"));
    }

    let fetched = client
        .email_get(&query::email_get(client.account_id(), found.ids.clone(), SEARCH_PROPERTIES))
        .await?;
    let emails = query::in_query_order(fetched.list, &found.ids);
    let title = format!("Found {} emails matching: {keywords}", emails.len());
    emit(out, &format::render_email_list(&emails, Some(&title)))
}
