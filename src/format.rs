//! Human-readable rendering of emails, mailboxes, and mutation outcomes
//!
//! Every renderer is pure and returns text; commands decide where it goes.
//! Line layout is fixed so output can be read by people and scraped by
//! scripts alike.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::models::{BodyPart, BodyValue, Email, EmailAddress, Mailbox};

/// Shown in place of an empty or missing address list
pub const NO_ADDRESSES: &str = "(none)";
/// Shown in place of an empty or missing subject
pub const NO_SUBJECT: &str = "(no subject)";
/// Maximum preview characters in list views
pub const PREVIEW_MAX_CHARS: usize = 100;

const RULE_WIDTH: usize = 80;
const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Render one address as `Name <email>` or the bare address
pub fn format_address(address: &EmailAddress) -> String {
    match address.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => format!("{name} <{}>", address.email),
        None => address.email.clone(),
    }
}

/// Render an address list, comma-joined
pub fn format_addresses(addresses: Option<&[EmailAddress]>) -> String {
    match addresses {
        Some(list) if !list.is_empty() => list
            .iter()
            .map(format_address)
            .collect::<Vec<_>>()
            .join(", "),
        _ => NO_ADDRESSES.to_owned(),
    }
}

/// Render an RFC 3339 timestamp in local time
///
/// Unparseable input is returned unchanged.
pub fn format_date(iso_date: &str) -> String {
    DateTime::parse_from_rfc3339(iso_date)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string()
        })
        .unwrap_or_else(|_| iso_date.to_owned())
}

/// Render a byte count with binary units labelled B, KB, MB
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    }
}

/// Truncate a preview to [`PREVIEW_MAX_CHARS`], appending `...` if cut
pub fn truncate_preview(preview: &str) -> String {
    if preview.chars().count() > PREVIEW_MAX_CHARS {
        let head: String = preview.chars().take(PREVIEW_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        preview.to_owned()
    }
}

/// Star and unread markers followed by the subject
fn marked_subject(email: &Email) -> String {
    let flagged = if email.is_flagged() { "⭐ " } else { "" };
    let unread = if email.is_unread() { "[UNREAD] " } else { "" };
    let subject = email
        .subject
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_SUBJECT);
    format!("{flagged}{unread}{subject}")
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Compact multi-line entry used in list views
pub fn render_email_compact(email: &Email) -> String {
    let mut lines = vec![
        marked_subject(email),
        format!("From: {}", format_addresses(email.from.as_deref())),
    ];
    if let Some(received) = non_empty(email.received_at.as_ref()) {
        lines.push(format!("Date: {}", format_date(received)));
    }
    if let Some(id) = non_empty(email.id.as_ref()) {
        lines.push(format!("ID: {id}"));
    }
    if let Some(preview) = non_empty(email.preview.as_ref()) {
        lines.push(format!("Preview: {}", truncate_preview(preview)));
    }
    lines.join("\n")
}

/// Which body variant was selected for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Text,
    Html,
}

/// First part of `parts` whose decoded value is non-empty
fn first_part_value<'a>(
    parts: Option<&[BodyPart]>,
    values: &'a BTreeMap<String, BodyValue>,
) -> Option<&'a str> {
    let part_id = parts?.first()?.part_id.as_deref()?;
    values
        .get(part_id)
        .map(|v| v.value.as_str())
        .filter(|v| !v.is_empty())
}

/// Choose the body to show in the detailed view
///
/// Prefers the first plain-text part with a non-empty value, then the first
/// HTML part under the same condition. Only one part is ever shown.
pub fn select_body(email: &Email) -> Option<(BodyKind, &str)> {
    let values = email.body_values.as_ref()?;
    first_part_value(email.text_body.as_deref(), values)
        .map(|v| (BodyKind::Text, v))
        .or_else(|| first_part_value(email.html_body.as_deref(), values).map(|v| (BodyKind::Html, v)))
}

/// Full single-email view with headers and the selected body
pub fn render_email_detailed(email: &Email) -> String {
    let mut lines = vec![
        format!("Subject: {}", marked_subject(email)),
        format!("From: {}", format_addresses(email.from.as_deref())),
        format!("To: {}", format_addresses(email.to.as_deref())),
    ];
    if let Some(cc) = email.cc.as_deref().filter(|cc| !cc.is_empty()) {
        lines.push(format!("Cc: {}", format_addresses(Some(cc))));
    }
    if let Some(received) = non_empty(email.received_at.as_ref()) {
        lines.push(format!("Date: {}", format_date(received)));
    }
    if let Some(sent) = non_empty(email.sent_at.as_ref()) {
        lines.push(format!("Sent: {}", format_date(sent)));
    }
    if let Some(size) = email.size {
        lines.push(format!("Size: {}", format_size(size)));
    }
    if let Some(id) = non_empty(email.id.as_ref()) {
        lines.push(format!("ID: {id}"));
    }

    if let Some((kind, body)) = select_body(email) {
        let heading = match kind {
            BodyKind::Text => "--- Body ---",
            BodyKind::Html => "--- HTML Body ---",
        };
        lines.push(String::new());
        lines.push(heading.to_owned());
        lines.push(String::new());
        lines.push(body.to_owned());
    }
    lines.join("\n")
}

/// Titled list of compact entries separated by rules, with a total line
pub fn render_email_list(emails: &[Email], title: Option<&str>) -> String {
    let mut lines = Vec::with_capacity(emails.len() * 3 + 4);
    if let Some(title) = title {
        lines.push(title.to_owned());
    }
    lines.push("=".repeat(RULE_WIDTH));
    for email in emails {
        lines.push(String::new());
        lines.push(render_email_compact(email));
        lines.push("-".repeat(RULE_WIDTH));
    }
    lines.push(String::new());
    lines.push(format!("Total: {} emails", emails.len()));
    lines.join("\n")
}

/// Indented mailbox hierarchy with unread and total counts
///
/// Depth-first from every root, two spaces per level. Siblings keep the
/// order of `mailboxes`.
pub fn render_mailbox_tree(mailboxes: &[Mailbox]) -> String {
    let mut children: HashMap<&str, Vec<&Mailbox>> = HashMap::new();
    for mailbox in mailboxes {
        if let Some(parent) = mailbox.parent() {
            children.entry(parent).or_default().push(mailbox);
        }
    }

    let mut lines = vec!["Mailboxes:".to_owned(), "----------".to_owned()];
    for root in mailboxes.iter().filter(|m| m.parent().is_none()) {
        push_mailbox(root, 0, &children, &mut lines);
    }
    lines.join("\n")
}

fn push_mailbox(
    mailbox: &Mailbox,
    depth: usize,
    children: &HashMap<&str, Vec<&Mailbox>>,
    lines: &mut Vec<String>,
) {
    let badge = if mailbox.unread_emails > 0 {
        format!(" ({} unread)", mailbox.unread_emails)
    } else {
        String::new()
    };
    lines.push(format!(
        "{}{}{badge} - {} total",
        "  ".repeat(depth),
        mailbox.name,
        mailbox.total_emails
    ));
    for child in children.get(mailbox.id.as_str()).into_iter().flatten() {
        push_mailbox(child, depth + 1, children, lines);
    }
}

/// Per-id failure listing for a partially failed mutation
///
/// Returns an empty string when nothing failed. Error details are the
/// server's `SetError` objects rendered as compact JSON.
pub fn render_failures(verb: &str, failures: Option<&BTreeMap<String, Value>>) -> String {
    let Some(failures) = failures.filter(|f| !f.is_empty()) else {
        return String::new();
    };
    let mut lines = vec![
        String::new(),
        format!("Failed to {verb} {} emails:", failures.len()),
    ];
    lines.extend(
        failures
            .iter()
            .map(|(id, error)| format!("- {id}: {error}")),
    );
    lines.join("\n")
}
