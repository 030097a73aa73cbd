//! JMAP session handle and method calls over HTTP
//!
//! Wraps `reqwest` with bearer authentication and the configured timeouts.
//! Every method call is sent as its own single-call batch and attempted
//! exactly once; failures surface as [`AppError::Transport`] or
//! [`AppError::Protocol`].

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::JmapConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Email, EmailGetRequest, EmailQueryRequest, EmailSetRequest, GetResponse, Mailbox,
    MailboxGetRequest, MailboxQueryRequest, QueryResponse, Session, SetResponse,
};

/// Core protocol capability
pub const CAPABILITY_CORE: &str = "urn:ietf:params:jmap:core";
/// Mail data model capability
pub const CAPABILITY_MAIL: &str = "urn:ietf:params:jmap:mail";

/// Call id used for the single call in every batch
const CALL_ID: &str = "0";

/// Authenticated JMAP session
///
/// Holds the discovered session resource and the resolved account. One
/// handle lives for one process run.
#[derive(Debug)]
pub struct JmapClient {
    http: Client,
    token: SecretString,
    session: Session,
    account_id: String,
}

impl JmapClient {
    /// Discover the session and resolve the account
    ///
    /// Fetches the session resource from `config.session_url`. The account
    /// is `config.account_id` when set, otherwise the session's primary
    /// mail account.
    ///
    /// # Errors
    ///
    /// - `Transport` if the session request fails or returns non-success
    /// - `Protocol` if the session body is malformed or names no account
    pub async fn connect(config: &JmapConfig) -> AppResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;

        debug!(url = %config.session_url, "fetching JMAP session");
        let response = http
            .get(&config.session_url)
            .bearer_auth(config.bearer_token.expose_secret())
            .send()
            .await?;
        let session: Session = check_status(response, "session request")
            .await?
            .json()
            .await?;

        let account_id = match &config.account_id {
            Some(id) => id.clone(),
            None => primary_account_id(&session)?,
        };
        debug!(account_id = %account_id, api_url = %session.api_url, "JMAP session ready");

        Ok(Self {
            http,
            token: config.bearer_token.clone(),
            session,
            account_id,
        })
    }

    /// Account every call is scoped to
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Issue one method call and return its response arguments
    ///
    /// # Errors
    ///
    /// - `Transport` on network failure or non-success HTTP status
    /// - `Protocol` on a JMAP method error or malformed response
    pub async fn call<A, R>(&self, method: &str, arguments: &A) -> AppResult<R>
    where
        A: Serialize,
        R: DeserializeOwned,
    {
        let arguments = serde_json::to_value(arguments)
            .map_err(|e| AppError::Internal(format!("failed to encode {method} arguments: {e}")))?;
        let body = json!({
            "using": [CAPABILITY_CORE, CAPABILITY_MAIL],
            "methodCalls": [[method, arguments, CALL_ID]],
        });

        debug!(method, "issuing JMAP call");
        let response = self
            .http
            .post(&self.session.api_url)
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await?;
        let envelope: Value = check_status(response, method).await?.json().await?;

        let arguments = extract_method_response(envelope, method)?;
        serde_json::from_value(arguments)
            .map_err(|e| AppError::Protocol(format!("unexpected {method} response: {e}")))
    }

    /// `Mailbox/query` filtered by name; ids in server order
    pub async fn mailbox_query(&self, request: &MailboxQueryRequest) -> AppResult<QueryResponse> {
        self.call("Mailbox/query", request).await
    }

    /// `Mailbox/get`
    pub async fn mailbox_get(&self, request: &MailboxGetRequest) -> AppResult<GetResponse<Mailbox>> {
        self.call("Mailbox/get", request).await
    }

    /// `Email/query`
    pub async fn email_query(&self, request: &EmailQueryRequest) -> AppResult<QueryResponse> {
        self.call("Email/query", request).await
    }

    /// `Email/get`
    pub async fn email_get(&self, request: &EmailGetRequest) -> AppResult<GetResponse<Email>> {
        self.call("Email/get", request).await
    }

    /// `Email/set`
    pub async fn email_set(&self, request: &EmailSetRequest) -> AppResult<SetResponse> {
        self.call("Email/set", request).await
    }
}

/// Map non-success HTTP statuses to `Transport`
async fn check_status(response: reqwest::Response, what: &str) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Transport(format!(
        "{what} failed with HTTP {status}: {}",
        body.trim()
    )))
}

/// Pick the account to use when none is configured
///
/// Prefers the primary mail account, then the primary core account, then
/// the only account in the session.
fn primary_account_id(session: &Session) -> AppResult<String> {
    if let Some(id) = session
        .primary_accounts
        .get(CAPABILITY_MAIL)
        .or_else(|| session.primary_accounts.get(CAPABILITY_CORE))
    {
        return Ok(id.clone());
    }
    match session.accounts.keys().collect::<Vec<_>>().as_slice() {
        [only] => Ok((*only).clone()),
        _ => Err(AppError::Protocol(
            "session does not name a primary mail account; set JMAP_ACCOUNT_ID".to_owned(),
        )),
    }
}

/// Pull the arguments for `method` out of a response envelope
///
/// A `["error", {...}, id]` invocation becomes a `Protocol` error carrying
/// the server's `type` and `description`.
fn extract_method_response(envelope: Value, method: &str) -> AppResult<Value> {
    let Value::Object(mut envelope) = envelope else {
        return Err(AppError::Protocol("response is not a JSON object".to_owned()));
    };
    let Some(Value::Array(responses)) = envelope.remove("methodResponses") else {
        return Err(AppError::Protocol(
            "response is missing methodResponses".to_owned(),
        ));
    };

    for invocation in responses {
        let Value::Array(parts) = invocation else {
            continue;
        };
        let [Value::String(name), arguments, Value::String(call_id)] =
            <[Value; 3]>::try_from(parts).map_err(|_| {
                AppError::Protocol("method response is not a 3-element array".to_owned())
            })?
        else {
            return Err(AppError::Protocol(
                "method response has unexpected element types".to_owned(),
            ));
        };
        if call_id != CALL_ID {
            continue;
        }
        if name == "error" {
            let kind = arguments
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            let description = arguments
                .get("description")
                .and_then(Value::as_str)
                .map(|d| format!(": {d}"))
                .unwrap_or_default();
            return Err(AppError::Protocol(format!(
                "{method} failed with {kind}{description}"
            )));
        }
        if name == method {
            return Ok(arguments);
        }
    }

    Err(AppError::Protocol(format!(
        "response does not contain a {method} result"
    )))
}
