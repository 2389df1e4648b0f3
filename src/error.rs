//! Error types for notification parsing and processing runs

use crate::types::{BodyKind, Field};
use thiserror::Error;

/// Errors raised while extracting fields from a single notification.
///
/// These never abort a run: the processor turns each one into a
/// [`FailureRecord`](crate::FailureRecord) and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// One or more required fields could not be resolved after the anchor
    #[error("Could not parse required fields. Missing: {}", join_fields(.0))]
    MissingFields(Vec<Field>),

    /// Company name still empty after HTML and subject fallbacks
    #[error("Critical parse failure: Could not determine Company Name from HTML or Subject.")]
    CompanyUnresolved,

    /// The message has no body of the requested kind
    #[error("No {0} body found.")]
    EmptyBody(BodyKind),

    /// Failed to parse the raw MIME structure
    #[error("Failed to parse email structure: {0}")]
    Structure(String),

    /// The message bytes could not be read from storage
    #[error("Could not read message: {0}")]
    Unreadable(String),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .copied()
        .map(Field::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run-level errors surfaced to the caller
#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be read or is malformed
    #[error("config error: {0}")]
    Config(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// The mailbox cannot supply messages for a label
    #[error("Label '{0}' not found")]
    LabelNotFound(String),

    #[error(transparent)]
    Mail(#[from] ParseError),
}

/// Result type for processing operations
pub type Result<T> = std::result::Result<T, Error>;
