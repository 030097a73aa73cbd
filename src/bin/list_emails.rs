//! `list-emails`: list recent emails with optional filters
//!
//! See `list-emails --help` for flags. Requires `JMAP_SESSION_URL` and
//! `JMAP_BEARER_TOKEN`; `JMAP_ACCOUNT_ID` is optional.

use std::process::ExitCode;

use jmap_email_cli::cli::{self, ListEmailsArgs};
use jmap_email_cli::commands::list_emails;
use jmap_email_cli::errors::AppResult;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: ListEmailsArgs = cli::parse_args();
    cli::init_tracing();
    cli::finish(run(&args).await)
}

async fn run(args: &ListEmailsArgs) -> AppResult<()> {
    let client = cli::connect().await?;
    list_emails::run(&client, args, &mut std::io::stdout()).await
}
