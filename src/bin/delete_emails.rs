//! `delete-emails`: permanently delete emails by id
//!
//! See `delete-emails --help` for flags. Requires `JMAP_SESSION_URL` and
//! `JMAP_BEARER_TOKEN`; `JMAP_ACCOUNT_ID` is optional.

use std::process::ExitCode;

use jmap_email_cli::cli::{self, DeleteEmailsArgs};
use jmap_email_cli::commands::delete_emails;
use jmap_email_cli::errors::AppResult;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: DeleteEmailsArgs = cli::parse_args();
    cli::init_tracing();
    cli::finish(run(&args).await)
}

async fn run(args: &DeleteEmailsArgs) -> AppResult<()> {
    let client = cli::connect().await?;
    delete_emails::run(&client, args, &mut std::io::stdout()).await
}
