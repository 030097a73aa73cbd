//! `search-keywords`: search one mailbox for emails matching any keyword
//!
//! See `search-keywords --help` for flags. Requires `JMAP_SESSION_URL` and
//! `JMAP_BEARER_TOKEN`; `JMAP_ACCOUNT_ID` is optional.

use std::process::ExitCode;

use jmap_email_cli::cli::{self, SearchKeywordsArgs};
use jmap_email_cli::commands::search_keywords;
use jmap_email_cli::errors::AppResult;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: SearchKeywordsArgs = cli::parse_args();
    cli::init_tracing();
    cli::finish(run(&args).await)
}

async fn run(args: &SearchKeywordsArgs) -> AppResult<()> {
    let client = cli::connect().await?;
    search_keywords::run(&client, args, &mut std::io::stdout()).await
}
