//! Command-line arguments and process wiring shared by the binaries
//!
//! Each binary declares its flags as a `clap` derive struct here. The help
//! contract is uniform: `--help` prints usage to stdout and exits 0; any
//! parse or required-input failure prints the diagnostic to stderr, the
//! usage to stdout, and exits 1.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::config::JmapConfig;
use crate::errors::AppResult;
use crate::jmap::JmapClient;

/// Arguments for `list-emails`
#[derive(Debug, Clone, Parser)]
#[command(
    name = "list-emails",
    about = "List recent emails with various filters.",
    after_help = "Examples:
  list-emails
  list-emails --unread
  list-emails --flagged
  list-emails --mailbox \"Archive\"
  list-emails --flagged --unread
  list-emails --unread --limit 50
  list-emails --from \"sender@example.com\""
)]
pub struct ListEmailsArgs {
    /// Number of emails to show
    #[arg(long, value_name = "N", default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,
    /// Show only unread emails
    #[arg(long)]
    pub unread: bool,
    /// Show only flagged/starred emails
    #[arg(long)]
    pub flagged: bool,
    /// Filter by mailbox name
    #[arg(long, value_name = "NAME")]
    pub mailbox: Option<String>,
    /// Filter by sender email address
    #[arg(long, value_name = "EMAIL")]
    pub from: Option<String>,
}

/// Arguments for `search-keywords`
#[derive(Debug, Clone, Parser)]
#[command(
    name = "search-keywords",
    about = "Search for emails matching any of the provided keywords.",
    after_help = "Examples:
  # Search for receipt-related emails
  search-keywords \"invoice\" \"receipt\" \"order confirmation\"

  # Search in different mailbox with custom limit
  search-keywords --mailbox \"Archive\" --limit 10 \"meeting\" \"agenda\"

Note: This command shows email previews. Use get-email with an email ID to view full content."
)]
pub struct SearchKeywordsArgs {
    /// Mailbox to search
    #[arg(long, value_name = "NAME", default_value = "Inbox")]
    pub mailbox: String,
    /// Max results
    #[arg(long, value_name = "N", default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,
    /// Keywords to match (any of them)
    #[arg(value_name = "KEYWORD", required = true)]
    pub keywords: Vec<String>,
}

/// Arguments for `get-email`
#[derive(Debug, Clone, Parser)]
#[command(
    name = "get-email",
    about = "Get full details of a specific email by ID.",
    after_help = "Examples:
  get-email \"StrgucNsyw-3\""
)]
pub struct GetEmailArgs {
    /// Email ID to retrieve
    #[arg(value_name = "EMAIL_ID")]
    pub email_id: String,
}

/// Arguments for `list-mailboxes`
#[derive(Debug, Clone, Parser)]
#[command(
    name = "list-mailboxes",
    about = "Display mailbox hierarchy with unread and total email counts.",
    after_help = "Examples:
  # View all mailboxes
  list-mailboxes"
)]
pub struct ListMailboxesArgs {}

/// Arguments for `move-by-ids`
#[derive(Debug, Clone, Parser)]
#[command(
    name = "move-by-ids",
    about = "Move one or more emails to a specific mailbox.",
    after_help = "Examples:
  move-by-ids --mailbox \"Archive\" \"StrgucNsyw-3\"
  move-by-ids --mailbox \"Processed\" \"id1\" \"id2\" \"id3\""
)]
pub struct MoveByIdsArgs {
    /// Target mailbox name
    #[arg(long, value_name = "NAME")]
    pub mailbox: String,
    /// Email ID(s) to move
    #[arg(value_name = "EMAIL_ID", required = true)]
    pub email_ids: Vec<String>,
}

/// Arguments for `delete-emails`
#[derive(Debug, Clone, Parser)]
#[command(
    name = "delete-emails",
    about = "Permanently delete one or more emails.",
    after_help = "Examples:
  delete-emails \"StrgucNsyw-3\"
  delete-emails \"id1\" \"id2\" \"id3\""
)]
pub struct DeleteEmailsArgs {
    /// Email ID(s) to delete
    #[arg(value_name = "EMAIL_ID", required = true)]
    pub email_ids: Vec<String>,
}

/// Early exit requested while parsing arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageExit {
    /// `0` for explicit help, `1` for invalid usage
    pub code: u8,
    /// Usage block for stdout
    pub usage: String,
    /// Parser diagnostic for stderr, absent for explicit help
    pub diagnostic: Option<String>,
}

/// Parse an explicit argument list
///
/// # Errors
///
/// Returns [`UsageExit`] when help was requested or the arguments are
/// invalid.
pub fn parse_args_from<T, I, S>(args: I) -> Result<T, UsageExit>
where
    T: Parser,
    I: IntoIterator<Item = S>,
    S: Into<std::ffi::OsString> + Clone,
{
    T::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => UsageExit {
            code: 0,
            usage: err.render().to_string(),
            diagnostic: None,
        },
        _ => UsageExit {
            code: 1,
            usage: T::command().render_help().to_string(),
            diagnostic: Some(err.render().to_string()),
        },
    })
}

/// Parse process arguments or exit with the help contract's status
pub fn parse_args<T: Parser>() -> T {
    match parse_args_from::<T, _, _>(std::env::args_os()) {
        Ok(args) => args,
        Err(exit) => {
            if let Some(diagnostic) = &exit.diagnostic {
                eprint!("{diagnostic}");
            }
            println!("{}", exit.usage.trim_end());
            std::process::exit(i32::from(exit.code));
        }
    }
}

/// Initialize stderr logging filtered by `RUST_LOG`
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration and open the JMAP session
///
/// A `.env` file in the working directory is read first; variables already
/// set in the environment take precedence. Missing credentials fail here,
/// before any network traffic.
pub async fn connect() -> AppResult<JmapClient> {
    dotenvy::dotenv().ok();
    let config = JmapConfig::load_from_env()?;
    JmapClient::connect(&config).await
}

/// Report the command outcome and map it to an exit status
pub fn finish(result: AppResult<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
