//! `list-mailboxes`: print the mailbox hierarchy with counts
//!
//! See `list-mailboxes --help` for flags. Requires `JMAP_SESSION_URL` and
//! `JMAP_BEARER_TOKEN`; `JMAP_ACCOUNT_ID` is optional.

use std::process::ExitCode;

use jmap_email_cli::cli::{self, ListMailboxesArgs};
use jmap_email_cli::commands::list_mailboxes;
use jmap_email_cli::errors::AppResult;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: ListMailboxesArgs = cli::parse_args();
    cli::init_tracing();
    cli::finish(run(&args).await)
}

async fn run(args: &ListMailboxesArgs) -> AppResult<()> {
    let client = cli::connect().await?;
    list_mailboxes::run(&client, args, &mut std::io::stdout()).await
}
