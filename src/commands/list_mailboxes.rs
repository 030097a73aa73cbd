//! `list-mailboxes`: the mailbox hierarchy with unread and total counts

use std::io::Write;

use super::emit;
use crate::cli::ListMailboxesArgs;
use crate::errors::AppResult;
use crate::format;
use crate::jmap::JmapClient;
use crate::models::MailboxGetRequest;

pub async fn run<W: Write>(
    client: &JmapClient,
    _args: &ListMailboxesArgs,
    out: &mut W,
) -> AppResult<()> {
    let response = client
        .mailbox_get(&MailboxGetRequest {
            account_id: client.account_id().to_owned(),
            ids: None,
        })
        .await?;
    emit(out, &format::render_mailbox_tree(&response.list))
}
