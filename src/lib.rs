//! jmap-email-cli: small JMAP command-line tools for email
//!
//! Six independent binaries list, search, read, move, and delete emails and
//! print the mailbox hierarchy of a JMAP account. Each run parses its
//! flags, opens one session, issues at most three sequential method calls,
//! prints a plain-text report, and exits.
//!
//! # Architecture
//!
//! - [`config`]: Environment-driven credentials and transport timeouts
//! - [`errors`]: Application error model with exit status mapping
//! - [`jmap`]: Session discovery and method calls over HTTP
//! - [`models`]: Typed JMAP records and request/response DTOs
//! - [`query`]: Filter, lookup, and mutation builders
//! - [`format`]: Human-readable rendering of emails and mailboxes
//! - [`cli`]: Per-binary arguments, help contract, and process wiring
//! - [`commands`]: One driver per binary

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod format;
pub mod jmap;
pub mod models;
pub mod query;
