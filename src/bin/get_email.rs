//! `get-email`: show one email with headers and body
//!
//! See `get-email --help` for flags. Requires `JMAP_SESSION_URL` and
//! `JMAP_BEARER_TOKEN`; `JMAP_ACCOUNT_ID` is optional.

use std::process::ExitCode;

use jmap_email_cli::cli::{self, GetEmailArgs};
use jmap_email_cli::commands::get_email;
use jmap_email_cli::errors::AppResult;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: GetEmailArgs = cli::parse_args();
    cli::init_tracing();
    cli::finish(run(&args).await)
}

async fn run(args: &GetEmailArgs) -> AppResult<()> {
    let client = cli::connect().await?;
    get_email::run(&client, args, &mut std::io::stdout()).await
}
