//! Core types for parsed notifications and application records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Application status carried by a notification label.
///
/// Variants are declared in priority order, so the derived `Ord` matches
/// [`Status::priority`]: `Applied < Viewed < Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Applied,
    Viewed,
    Rejected,
}

impl Status {
    /// Priority used to decide whether a notification may overwrite a status
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Applied => 1,
            Self::Viewed => 2,
            Self::Rejected => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Viewed => "Viewed",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field extracted from a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    JobTitle,
    CompanyName,
    Location,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JobTitle => "Job Title",
            Self::CompanyName => "Company Name",
            Self::Location => "Location",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which body representation of a message is wanted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    PlainText,
    Html,
}

impl BodyKind {
    /// MIME type matched against message parts
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
            Self::Html => "text/html",
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlainText => f.write_str("plain text"),
            Self::Html => f.write_str("HTML"),
        }
    }
}

/// Fields pulled out of one notification. Any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFields {
    pub job_title: String,
    pub company_name: String,
    pub location: String,
}

impl ParsedFields {
    pub fn new(
        job_title: impl Into<String>,
        company_name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            job_title: job_title.into(),
            company_name: company_name.into(),
            location: location.into(),
        }
    }

    /// Deduplication key, `None` when the company is empty
    #[must_use]
    pub fn key(&self) -> Option<ApplicationKey> {
        ApplicationKey::new(&self.company_name, &self.job_title)
    }

    /// Fields that are empty, in display order
    #[must_use]
    pub fn missing(&self) -> Vec<Field> {
        [
            (Field::JobTitle, &self.job_title),
            (Field::CompanyName, &self.company_name),
            (Field::Location, &self.location),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

/// Normalized `(company, title)` identity of one job application.
///
/// Normalization is lowercase + trim. Location and date play no part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApplicationKey {
    company: String,
    title: String,
}

impl ApplicationKey {
    /// Build a key; returns `None` if the company normalizes to empty
    #[must_use]
    pub fn new(company: &str, title: &str) -> Option<Self> {
        let company = normalize(company);
        if company.is_empty() {
            return None;
        }
        Some(Self {
            company,
            title: normalize(title),
        })
    }

    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl fmt::Display for ApplicationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.company, self.title)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Metadata that travels with a notification into the reconciler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMeta {
    /// Source message identifier
    pub email_id: String,

    /// Mailbox label the message was fetched from
    pub label: String,

    /// Original subject line
    pub subject: String,

    /// `YYYY-MM-DD` or empty
    pub date: String,

    /// Provenance comment derived from the subject
    pub comment: String,
}

/// One consolidated job application.
///
/// Field order is the report column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(rename = "Company Name")]
    pub company_name: String,

    #[serde(rename = "Job Title")]
    pub job_title: String,

    #[serde(rename = "Status")]
    pub status: Status,

    /// `YYYY-MM-DD` or empty if the header date was unparseable
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Location")]
    pub location: String,

    #[serde(rename = "Metadata Subject")]
    pub metadata_subject: String,

    /// Human-readable provenance trail
    #[serde(rename = "Comment")]
    pub comment: String,
}

impl ApplicationRecord {
    /// Create a record from freshly parsed fields
    #[must_use]
    pub fn from_parsed(fields: &ParsedFields, status: Status, meta: &NotificationMeta) -> Self {
        Self {
            company_name: fields.company_name.clone(),
            job_title: fields.job_title.clone(),
            status,
            date: meta.date.clone(),
            location: fields.location.clone(),
            metadata_subject: meta.subject.clone(),
            comment: meta.comment.clone(),
        }
    }

    #[must_use]
    pub fn key(&self) -> Option<ApplicationKey> {
        ApplicationKey::new(&self.company_name, &self.job_title)
    }
}

/// Append-only diagnostic entry for a message that failed or needs attention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Local time the failure was recorded, `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "Timestamp")]
    pub timestamp: String,

    #[serde(rename = "Email ID")]
    pub email_id: String,

    #[serde(rename = "Label")]
    pub label: String,

    #[serde(rename = "Reason")]
    pub reason: String,

    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Company Name")]
    pub company_name: String,

    #[serde(rename = "Job Title")]
    pub job_title: String,

    #[serde(rename = "Location")]
    pub location: String,

    #[serde(rename = "Status")]
    pub status: Status,

    /// Subject line of the message
    #[serde(rename = "Metadata")]
    pub metadata: String,

    #[serde(rename = "Comment")]
    pub comment: String,
}
