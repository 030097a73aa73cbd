//! Application error model with exit status mapping
//!
//! Defines a typed error hierarchy using `thiserror` for internal error
//! handling. Binaries print the error once to stderr and exit with
//! [`AppError::exit_code`].

use thiserror::Error;

/// Application error type
///
/// Covers every failure a command may hit after argument parsing; usage
/// errors exit through [`crate::cli::UsageExit`] instead. Partial mutation
/// failures are not errors; they are part of the printed report.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed environment configuration
    #[error("{0}")]
    Config(String),
    /// Named mailbox or email does not exist in the account
    ///
    /// The message is shown verbatim, e.g. `Mailbox "Archive" not found`.
    #[error("{0}")]
    NotFound(String),
    /// HTTP transport failure (connect, timeout, non-success status)
    #[error("transport error: {0}")]
    Transport(String),
    /// Malformed or unexpected JMAP response, including method errors
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Internal error (output write failure, unexpected state)
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Process exit status for this error
    ///
    /// Every failure exits with `1`; success and "nothing found" exit `0`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_)
            | Self::NotFound(_)
            | Self::Transport(_)
            | Self::Protocol(_)
            | Self::Internal(_) => 1,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Protocol(format!("malformed response body: {e}"))
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Type alias for fallible return values
///
/// Use this for all internal functions that can fail. Provides a consistent
/// error type throughout the codebase.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn not_found_message_is_shown_verbatim() {
        let err = AppError::NotFound("Mailbox \"Archive\" not found".to_owned());
        assert_eq!(err.to_string(), "Mailbox \"Archive\" not found");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn every_failure_exits_non_zero() {
        for err in [
            AppError::Config("missing".to_owned()),
            AppError::NotFound("Email e1 not found".to_owned()),
            AppError::Transport("down".to_owned()),
            AppError::Protocol("garbled".to_owned()),
            AppError::Internal("oops".to_owned()),
        ] {
            assert_eq!(err.exit_code(), 1);
        }
    }
}
