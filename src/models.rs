//! Typed JMAP records and request/response DTOs
//!
//! Server records are pass-through: every optional JMAP property is an
//! explicit `Option` so missing values survive decoding without guessing.
//! Request types serialize to the camelCase argument objects of RFC 8620
//! and RFC 8621 method calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keyword marking an email as read
pub const KEYWORD_SEEN: &str = "$seen";
/// Keyword marking an email as flagged/starred
pub const KEYWORD_FLAGGED: &str = "$flagged";

/// JMAP session resource (subset used by this crate)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Endpoint that accepts method-call batches
    pub api_url: String,
    /// Primary account per capability URI
    #[serde(default)]
    pub primary_accounts: BTreeMap<String, String>,
    /// All accounts visible to the credential, keyed by account id
    #[serde(default)]
    pub accounts: BTreeMap<String, Value>,
}

/// Email address with optional display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Display name, if the header carried one
    #[serde(default)]
    pub name: Option<String>,
    /// Address portion
    pub email: String,
}

/// Reference to one body part of an email
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPart {
    /// Key into [`Email::body_values`]
    pub part_id: Option<String>,
    /// MIME type of the part
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

/// Decoded text of a body part
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyValue {
    #[serde(default)]
    pub value: String,
}

/// Email record as returned by `Email/get`
///
/// Only the requested properties are present; everything else decodes to
/// `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: Option<String>,
    pub subject: Option<String>,
    pub from: Option<Vec<EmailAddress>>,
    pub to: Option<Vec<EmailAddress>>,
    pub cc: Option<Vec<EmailAddress>>,
    pub received_at: Option<String>,
    pub sent_at: Option<String>,
    pub size: Option<u64>,
    pub preview: Option<String>,
    pub keywords: Option<BTreeMap<String, bool>>,
    pub text_body: Option<Vec<BodyPart>>,
    pub html_body: Option<Vec<BodyPart>>,
    pub body_values: Option<BTreeMap<String, BodyValue>>,
}

impl Email {
    /// Unread iff a keyword set exists and lacks `$seen`
    ///
    /// A missing keyword set cannot be judged and is reported as not unread.
    pub fn is_unread(&self) -> bool {
        self.keywords
            .as_ref()
            .is_some_and(|k| !k.get(KEYWORD_SEEN).copied().unwrap_or(false))
    }

    /// Flagged iff a keyword set exists and contains `$flagged`
    pub fn is_flagged(&self) -> bool {
        self.keywords
            .as_ref()
            .is_some_and(|k| k.get(KEYWORD_FLAGGED).copied().unwrap_or(false))
    }
}

/// Mailbox record as returned by `Mailbox/get`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mailbox {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Parent mailbox id; `None` or empty marks a root
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub unread_emails: u64,
    #[serde(default)]
    pub total_emails: u64,
}

impl Mailbox {
    /// Parent id, with an empty string read as no parent
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }
}

/// Logical operator for compound filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterOperator {
    Or,
}

/// Single `Email/query` filter condition
///
/// Set fields are ANDed by the server; unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailFilterCondition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_mailbox: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl EmailFilterCondition {
    /// Whether no predicate is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// `Email/query` filter: a condition or an operator over nested filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EmailFilter {
    Condition(EmailFilterCondition),
    Operator {
        operator: FilterOperator,
        conditions: Vec<EmailFilter>,
    },
}

/// Sort comparator for query methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparator {
    pub property: String,
    pub is_ascending: bool,
}

impl Comparator {
    /// Most recently received first
    pub fn newest_first() -> Self {
        Self {
            property: "receivedAt".to_owned(),
            is_ascending: false,
        }
    }
}

/// `Mailbox/query` filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailboxFilter {
    pub name: String,
}

/// `Mailbox/query` arguments
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxQueryRequest {
    pub account_id: String,
    pub filter: MailboxFilter,
}

/// `Mailbox/get` arguments; `ids: None` fetches every mailbox
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxGetRequest {
    pub account_id: String,
    pub ids: Option<Vec<String>>,
}

/// `Email/query` arguments
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailQueryRequest {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<EmailFilter>,
    pub sort: Vec<Comparator>,
    pub limit: u32,
}

/// `Email/get` arguments
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailGetRequest {
    pub account_id: String,
    pub ids: Vec<String>,
    pub properties: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fetch_text_body_values: bool,
    #[serde(rename = "fetchHTMLBodyValues", skip_serializing_if = "std::ops::Not::not")]
    pub fetch_html_body_values: bool,
}

/// Partial email used in `Email/set` updates
///
/// `mailboxIds` is replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPatch {
    pub mailbox_ids: BTreeMap<String, bool>,
}

/// `Email/set` arguments
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSetRequest {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<BTreeMap<String, EmailPatch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destroy: Option<Vec<String>>,
}

/// Response to any `*/query` call
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub ids: Vec<String>,
}

/// Response to any `*/get` call
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse<T> {
    pub list: Vec<T>,
    #[serde(default)]
    pub not_found: Option<Vec<String>>,
}

impl<T> GetResponse<T> {
    /// Whether the server reported `id` as not found
    pub fn is_not_found(&self, id: &str) -> bool {
        self.not_found
            .as_ref()
            .is_some_and(|ids| ids.iter().any(|nf| nf == id))
    }
}

/// Response to `Email/set`
///
/// Per-id failures are opaque `SetError` objects, kept as raw JSON for
/// display.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetResponse {
    #[serde(default)]
    pub updated: Option<BTreeMap<String, Option<Value>>>,
    #[serde(default)]
    pub destroyed: Option<Vec<String>>,
    #[serde(default)]
    pub not_updated: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub not_destroyed: Option<BTreeMap<String, Value>>,
}
