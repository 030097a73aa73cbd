//! `move-by-ids`: move emails into a mailbox by id
//!
//! See `move-by-ids --help` for flags. Requires `JMAP_SESSION_URL` and
//! `JMAP_BEARER_TOKEN`; `JMAP_ACCOUNT_ID` is optional.

use std::process::ExitCode;

use jmap_email_cli::cli::{self, MoveByIdsArgs};
use jmap_email_cli::commands::move_by_ids;
use jmap_email_cli::errors::AppResult;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: MoveByIdsArgs = cli::parse_args();
    cli::init_tracing();
    cli::finish(run(&args).await)
}

async fn run(args: &MoveByIdsArgs) -> AppResult<()> {
    let client = cli::connect().await?;
    move_by_ids::run(&client, args, &mut std::io::stdout()).await
}
