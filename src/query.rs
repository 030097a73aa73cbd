//! Query and mutation builders
//!
//! Turns parsed command arguments into JMAP request arguments: email search
//! filters, the mailbox name lookup, destroy lists, and mailbox-replacing
//! update maps. Builders are pure; the commands issue the calls.

use std::collections::{BTreeMap, HashMap};

use crate::errors::{AppError, AppResult};
use crate::jmap::JmapClient;
use crate::models::{
    Comparator, Email, EmailFilter, EmailFilterCondition, EmailGetRequest, EmailPatch,
    EmailQueryRequest, EmailSetRequest, FilterOperator, KEYWORD_FLAGGED, KEYWORD_SEEN,
    MailboxFilter, MailboxQueryRequest,
};

/// Properties fetched for the compact list view of `list-emails`
pub const LIST_PROPERTIES: &[&str] = &[
    "id",
    "subject",
    "from",
    "to",
    "receivedAt",
    "preview",
    "keywords",
];

/// Properties fetched for the compact list view of `search-keywords`
pub const SEARCH_PROPERTIES: &[&str] = &["id", "subject", "from", "receivedAt", "preview", "keywords"];

/// Properties fetched for the detailed single-email view
pub const DETAIL_PROPERTIES: &[&str] = &[
    "id",
    "subject",
    "from",
    "to",
    "cc",
    "receivedAt",
    "sentAt",
    "textBody",
    "htmlBody",
    "bodyValues",
    "size",
    "keywords",
];

/// Independent predicates for a listing; unset ones are left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCriteria {
    pub unread_only: bool,
    pub flagged_only: bool,
    /// Already-resolved mailbox id
    pub mailbox_id: Option<String>,
    pub from: Option<String>,
}

/// Build the `Email/query` filter for a listing
///
/// Returns `None` when no predicate is active so the filter argument is
/// omitted entirely.
pub fn list_filter(criteria: &ListCriteria) -> Option<EmailFilter> {
    let condition = EmailFilterCondition {
        in_mailbox: criteria.mailbox_id.clone(),
        has_keyword: criteria.flagged_only.then(|| KEYWORD_FLAGGED.to_owned()),
        not_keyword: criteria.unread_only.then(|| KEYWORD_SEEN.to_owned()),
        from: criteria.from.clone(),
        text: None,
    };
    (!condition.is_empty()).then_some(EmailFilter::Condition(condition))
}

/// Build an OR of one full-text condition per keyword, each scoped to
/// `mailbox_id`
pub fn keyword_filter(mailbox_id: &str, keywords: &[String]) -> EmailFilter {
    EmailFilter::Operator {
        operator: FilterOperator::Or,
        conditions: keywords
            .iter()
            .map(|keyword| {
                EmailFilter::Condition(EmailFilterCondition {
                    in_mailbox: Some(mailbox_id.to_owned()),
                    text: Some(keyword.clone()),
                    ..EmailFilterCondition::default()
                })
            })
            .collect(),
    }
}

/// `Email/query` arguments, newest first, capped at `limit`
pub fn email_query(account_id: &str, filter: Option<EmailFilter>, limit: u32) -> EmailQueryRequest {
    EmailQueryRequest {
        account_id: account_id.to_owned(),
        filter,
        sort: vec![Comparator::newest_first()],
        limit,
    }
}

/// `Email/get` arguments for the given ids and properties
///
/// Body values are requested only when the property set includes
/// `bodyValues`.
pub fn email_get(account_id: &str, ids: Vec<String>, properties: &[&str]) -> EmailGetRequest {
    let with_bodies = properties.contains(&"bodyValues");
    EmailGetRequest {
        account_id: account_id.to_owned(),
        ids,
        properties: properties.iter().map(|p| (*p).to_owned()).collect(),
        fetch_text_body_values: with_bodies,
        fetch_html_body_values: with_bodies,
    }
}

/// Reorder `Email/get` records to follow the `Email/query` ids
///
/// `/get` lists may come back in any order; only the query result carries
/// the newest-first sort. Records not named in `ids` go last, in the order
/// received.
pub fn in_query_order(mut emails: Vec<Email>, ids: &[String]) -> Vec<Email> {
    let position: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();
    emails.sort_by_key(|email| {
        email
            .id
            .as_deref()
            .and_then(|id| position.get(id).copied())
            .unwrap_or(usize::MAX)
    });
    emails
}

/// `Email/set` destroying every id in one request
pub fn destroy_request(account_id: &str, ids: &[String]) -> EmailSetRequest {
    EmailSetRequest {
        account_id: account_id.to_owned(),
        destroy: Some(ids.to_vec()),
        ..EmailSetRequest::default()
    }
}

/// `Email/set` moving every id into `mailbox_id` only
///
/// Each update replaces the whole `mailboxIds` set, removing the email from
/// every other mailbox.
pub fn move_request(account_id: &str, ids: &[String], mailbox_id: &str) -> EmailSetRequest {
    let update = ids
        .iter()
        .map(|id| {
            (
                id.clone(),
                EmailPatch {
                    mailbox_ids: BTreeMap::from([(mailbox_id.to_owned(), true)]),
                },
            )
        })
        .collect();
    EmailSetRequest {
        account_id: account_id.to_owned(),
        update: Some(update),
        ..EmailSetRequest::default()
    }
}

/// Resolve a mailbox name to its id
///
/// Issues one `Mailbox/query` with a `name` filter. Servers match names
/// containing the given text, so `Inbox` may also match `Inbox Archive`.
/// The first id wins; order is whatever the server returns.
///
/// # Errors
///
/// Returns `NotFound` (`Mailbox "<name>" not found`) when nothing matches.
pub async fn resolve_mailbox_id(client: &JmapClient, name: &str) -> AppResult<String> {
    let request = MailboxQueryRequest {
        account_id: client.account_id().to_owned(),
        filter: MailboxFilter {
            name: name.to_owned(),
        },
    };
    let result = client.mailbox_query(&request).await?;
    result
        .ids
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("Mailbox \"{name}\" not found")))
}
