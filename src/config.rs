//! Configuration module for JMAP credentials and transport settings
//!
//! All configuration is loaded from environment variables once per process
//! and passed down explicitly as a [`JmapConfig`] value. Two variables are
//! required (`JMAP_SESSION_URL`, `JMAP_BEARER_TOKEN`); the account id and
//! HTTP timeouts are optional.

use std::env;

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

/// Session discovery endpoint (required)
pub const SESSION_URL_VAR: &str = "JMAP_SESSION_URL";
/// Bearer token used for every request (required)
pub const BEARER_TOKEN_VAR: &str = "JMAP_BEARER_TOKEN";
/// Overrides the auto-detected primary account (optional)
pub const ACCOUNT_ID_VAR: &str = "JMAP_ACCOUNT_ID";
/// TCP/TLS connect timeout in milliseconds (optional)
pub const CONNECT_TIMEOUT_VAR: &str = "JMAP_CONNECT_TIMEOUT_MS";
/// Whole-request timeout in milliseconds (optional)
pub const REQUEST_TIMEOUT_VAR: &str = "JMAP_REQUEST_TIMEOUT_MS";

/// JMAP connection configuration
///
/// Holds the session endpoint and credentials for a single account. The
/// bearer token is stored using `SecretString` to prevent accidental logging.
#[derive(Debug, Clone)]
pub struct JmapConfig {
    /// JMAP session resource URL (e.g. `https://api.fastmail.com/.well-known/jmap`)
    pub session_url: String,
    /// Bearer token stored in a type that prevents accidental logging
    pub bearer_token: SecretString,
    /// Explicit account id; `None` means use the session's primary account
    pub account_id: Option<String>,
    /// TCP/TLS connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Whole-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl JmapConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `Config` with the full usage message if either required
    /// variable is missing, or a short message if a timeout is malformed.
    ///
    /// # Example Environment
    ///
    /// ```text
    /// JMAP_SESSION_URL=https://api.fastmail.com/.well-known/jmap
    /// JMAP_BEARER_TOKEN=fmu1-...
    /// JMAP_ACCOUNT_ID=u1234abcd
    /// ```
    pub fn load_from_env() -> AppResult<Self> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty or whitespace-only values are treated as unset.
    pub fn load_with<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let (Some(session_url), Some(bearer_token)) =
            (read(SESSION_URL_VAR), read(BEARER_TOKEN_VAR))
        else {
            return Err(AppError::Config(missing_credentials_message()));
        };

        Ok(Self {
            session_url: session_url.trim().to_owned(),
            bearer_token: SecretString::new(bearer_token.trim().into()),
            account_id: read(ACCOUNT_ID_VAR).map(|v| v.trim().to_owned()),
            connect_timeout_ms: parse_u64_value(
                CONNECT_TIMEOUT_VAR,
                read(CONNECT_TIMEOUT_VAR),
                30_000,
            )?,
            request_timeout_ms: parse_u64_value(
                REQUEST_TIMEOUT_VAR,
                read(REQUEST_TIMEOUT_VAR),
                120_000,
            )?,
        })
    }
}

/// Usage message shown when required credentials are missing
pub fn missing_credentials_message() -> String {
    format!(
        "ERROR: Missing required JMAP environment variables\n\
         \n\
         Set these environment variables before running this command:\n  \
         - {SESSION_URL_VAR}\n  \
         - {BEARER_TOKEN_VAR}\n\
         Example:\n  \
         {SESSION_URL_VAR}=\"https://api.fastmail.com/.well-known/jmap\" \\\n  \
         {BEARER_TOKEN_VAR}=\"your-token-here\" \\\n  \
         list-emails\n"
    )
}

/// Parse an optional `u64` value with default fallback
///
/// # Errors
///
/// Returns `Config` if the value is set but not a valid `u64`.
fn parse_u64_value(key: &str, value: Option<String>, default: u64) -> AppResult<u64> {
    match value {
        Some(v) => v.trim().parse::<u64>().map_err(|_| {
            AppError::Config(format!("invalid u64 environment variable {key}: '{v}'"))
        }),
        None => Ok(default),
    }
}
