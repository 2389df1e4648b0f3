// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! LinkedIn Job Application Tracker
//!
//! Extracts job-application records from LinkedIn notification emails and
//! reconciles Applied, Viewed and Rejected notifications about the same job
//! into a single record.
//!
//! # Features
//!
//! - MIME body extraction with UTF-8/Latin-1 decoding
//! - Anchor-based parsing of Applied emails
//! - Rule chains with subject fallbacks for Viewed/Rejected emails
//! - Monotonic status merging keyed on normalized company and title
//! - Failure log with per-message diagnostics
//! - CSV reports
//!
//! # Example
//!
//! ```rust
//! use jobmail_tracker::{NotificationMeta, Reconciler, parse_applied, parse_viewed_rejected};
//!
//! let body = "Your application was sent to Acme Corp\n\nSoftware Engineer\nAcme Corp\nRemote\n";
//! let meta = NotificationMeta {
//!     email_id: "1".into(),
//!     label: "LinkedIn/Applied".into(),
//!     subject: "Your application was sent to Acme Corp".into(),
//!     date: "2024-05-01".into(),
//!     comment: "Email regarding: Your application was sent to Acme Corp".into(),
//! };
//!
//! let mut reconciler = Reconciler::new();
//! reconciler.apply_applied(&parse_applied(body).unwrap(), &meta).unwrap();
//!
//! let viewed = parse_viewed_rejected("", "Your application was viewed by Acme Corp");
//! assert!(viewed.is_ok());
//! ```

mod body;
mod config;
mod date_range;
mod error;
mod failure;
mod mailbox;
mod parser;
mod processor;
mod reconciler;
mod report;
mod rules;
mod types;

pub use body::{MessageParts, decode_text, extract_part};
pub use config::{Config, Labels};
pub use date_range::DateRange;
pub use error::{Error, ParseError, Result};
pub use failure::{FailureCollector, NOT_AVAILABLE, PARSE_FAILED};
pub use mailbox::{DirectoryMailbox, EmlMessage, MailSource, MemoryMailbox, RawMessage};
pub use parser::{
    APPLIED_ANCHOR, NO_SUBJECT_COMMENT, NotificationParse, generate_comment, parse_applied,
    parse_date_header, parse_viewed_rejected,
};
pub use processor::{LabelStats, MessageFilter, Processor, RunReport, RunStats};
pub use reconciler::{MergeOutcome, Reconciler};
pub use report::{
    FAILURE_HEADERS, RECORD_HEADERS, append_failures, failure_log_path, report_path,
    save_records, write_failures, write_records,
};
pub use rules::{
    COMPANY_RULES, Extraction, ExtractionRule, LOCATION_RULES, Notification, TITLE_RULES, clean_text,
    run_chain,
};
pub use types::*;
