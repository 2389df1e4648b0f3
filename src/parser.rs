//! Field parsers for LinkedIn application notifications

use crate::error::ParseError;
use crate::rules::{
    COMPANY_RULES, LOCATION_RULES, Notification, TITLE_RULES, clean_text, run_chain,
};
use crate::types::ParsedFields;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Literal line that precedes title, company and location in Applied emails
pub const APPLIED_ANCHOR: &str = "Your application was sent to";

/// Comment used when a message has no subject
pub const NO_SUBJECT_COMMENT: &str = "No subject found.";

/// Parse the plain-text body of an Applied notification.
///
/// The three non-empty lines following the anchor line are, in order, the
/// job title, the company and the location. Every unresolved field is named
/// in the returned error; a missing anchor leaves all three unresolved.
pub fn parse_applied(plain_text: &str) -> Result<ParsedFields, ParseError> {
    let mut lines = plain_text.lines();
    let anchored = lines.by_ref().any(|line| line.contains(APPLIED_ANCHOR));

    let mut values = if anchored {
        lines
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(3)
            .map(clean_text)
            .collect::<Vec<_>>()
    } else {
        Vec::new()
    };
    values.resize(3, String::new());

    let location = values.pop().unwrap_or_default();
    let company_name = values.pop().unwrap_or_default();
    let job_title = values.pop().unwrap_or_default();
    let fields = ParsedFields {
        job_title,
        company_name,
        location,
    };

    let missing = fields.missing();
    if missing.is_empty() {
        Ok(fields)
    } else {
        Err(ParseError::MissingFields(missing))
    }
}

/// Result of parsing a Viewed or Rejected notification.
///
/// Parsing never fails outright; an unresolved company is reported through
/// `error` so the caller can decide what to do with the partial fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationParse {
    pub fields: ParsedFields,
    pub error: Option<ParseError>,
}

impl NotificationParse {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Parse a Viewed/Rejected notification from its HTML body and subject.
///
/// Each field is resolved independently by its rule chain: HTML markup
/// first, then subject-line fallbacks which only fill what HTML left empty.
#[must_use]
pub fn parse_viewed_rejected(html: &str, subject: &str) -> NotificationParse {
    let doc = Notification::new(html, subject);

    let company = run_chain(COMPANY_RULES, &doc);
    let title = run_chain(TITLE_RULES, &doc);
    let location = run_chain(LOCATION_RULES, &doc);

    debug!(
        "Field rules: company={:?} title={:?} location={:?}",
        company.rule(),
        title.rule(),
        location.rule()
    );

    let fields = ParsedFields {
        job_title: title.into_value(),
        company_name: company.into_value(),
        location: location.into_value(),
    };

    let error = fields
        .company_name
        .is_empty()
        .then_some(ParseError::CompanyUnresolved);

    NotificationParse { fields, error }
}

static PAREN_COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*$").unwrap());

static DAY_MONTH_YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s+([A-Za-z]+)\s+(\d{4})").unwrap());

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%a, %d %b %Y %H:%M %z",
    "%d %b %Y %H:%M:%S %z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%a %b %d %H:%M:%S %Y",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y %I:%M:%S %p",
    "%B %d, %Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
    "%a %b %d %Y",
    "%a, %b %d, %Y",
    "%A, %B %d, %Y",
    "%a, %d %b %Y",
];

/// Normalize an email `Date` header to `YYYY-MM-DD`.
///
/// Lenient: tries RFC 2822 (with or without a trailing zone comment),
/// RFC 3339, offset-bearing and 12-hour layouts and a few date-only
/// layouts before falling back to any
/// `D Mon YYYY` fragment. Returns an empty string when nothing parses.
#[must_use]
pub fn parse_date_header(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    parse_lenient_date(raw).map_or_else(
        || {
            debug!("Unparseable date header: {}", raw);
            String::new()
        },
        |d| d.format("%Y-%m-%d").to_string(),
    )
}

fn parse_lenient_date(raw: &str) -> Option<NaiveDate> {
    let stripped = PAREN_COMMENT_REGEX.replace(raw, "");
    let candidates = [raw, stripped.as_ref()];

    for s in candidates {
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }
    }

    let s = stripped.as_ref();
    if let Some(dt) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }

    let caps = DAY_MONTH_YEAR_REGEX.captures(s)?;
    let fragment = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
    NaiveDate::parse_from_str(&fragment, "%d %b %Y")
        .or_else(|_| NaiveDate::parse_from_str(&fragment, "%d %B %Y"))
        .ok()
}

/// Provenance comment shown next to a record
#[must_use]
pub fn generate_comment(subject: &str) -> String {
    if subject.trim().is_empty() {
        NO_SUBJECT_COMMENT.to_string()
    } else {
        format!("Email regarding: {subject}")
    }
}
