//! Ordered extraction rules for Viewed/Rejected notifications
//!
//! LinkedIn's HTML templates drift, so each field is resolved by a chain of
//! independent rules tried in priority order. The first rule producing a
//! non-empty value wins.

use regex::Regex;
use std::sync::LazyLock;

/// The inputs a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct Notification<'a> {
    pub html: &'a str,
    pub subject: &'a str,
}

impl<'a> Notification<'a> {
    #[must_use]
    pub const fn new(html: &'a str, subject: &'a str) -> Self {
        Self { html, subject }
    }
}

/// A single named extraction strategy
#[derive(Clone, Copy)]
pub struct ExtractionRule {
    pub name: &'static str,
    pub extract: fn(&Notification<'_>) -> Option<String>,
}

impl std::fmt::Debug for ExtractionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Outcome of running a rule chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found { value: String, rule: &'static str },
    NotFound,
}

impl Extraction {
    /// The extracted value, or empty when nothing matched
    #[must_use]
    pub fn into_value(self) -> String {
        match self {
            Self::Found { value, .. } => value,
            Self::NotFound => String::new(),
        }
    }

    #[must_use]
    pub const fn rule(&self) -> Option<&'static str> {
        match self {
            Self::Found { rule, .. } => Some(rule),
            Self::NotFound => None,
        }
    }
}

/// Apply `rules` in order and keep the first non-empty value
#[must_use]
pub fn run_chain(rules: &[ExtractionRule], doc: &Notification<'_>) -> Extraction {
    rules
        .iter()
        .find_map(|rule| {
            (rule.extract)(doc)
                .filter(|v| !v.is_empty())
                .map(|value| Extraction::Found {
                    value,
                    rule: rule.name,
                })
        })
        .unwrap_or(Extraction::NotFound)
}

// Regex patterns
static COMPANY_LOCATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<p[^>]*?>\s*([^<]+?)\s*(?:·|&middot;)\s*(.*?)\s*</p>").unwrap()
});

static TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)color:\s*#0a66c2;?\s*"[^>]*>\s*([^<]+?)\s*<"#).unwrap()
});

static VIEWED_BY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Your application was viewed by\s+(.*)").unwrap());

static APPLICATION_TO_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Your application to\s+(.*?)\s+at\s+(.*)").unwrap());

fn capture(re: &Regex, haystack: &str, group: usize) -> Option<String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(group))
        .map(|m| clean_text(m.as_str()))
        .filter(|s| !s.is_empty())
}

fn html_company(doc: &Notification<'_>) -> Option<String> {
    capture(&COMPANY_LOCATION_REGEX, doc.html, 1)
}

fn html_location(doc: &Notification<'_>) -> Option<String> {
    capture(&COMPANY_LOCATION_REGEX, doc.html, 2)
}

fn html_title(doc: &Notification<'_>) -> Option<String> {
    capture(&TITLE_REGEX, doc.html, 1)
}

fn subject_viewed_by(doc: &Notification<'_>) -> Option<String> {
    capture(&VIEWED_BY_REGEX, doc.subject, 1)
}

fn subject_application_to_title(doc: &Notification<'_>) -> Option<String> {
    capture(&APPLICATION_TO_REGEX, doc.subject, 1)
}

fn subject_application_to_company(doc: &Notification<'_>) -> Option<String> {
    capture(&APPLICATION_TO_REGEX, doc.subject, 2)
}

pub const COMPANY_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        name: "html-company-location",
        extract: html_company,
    },
    ExtractionRule {
        name: "subject-viewed-by",
        extract: subject_viewed_by,
    },
    ExtractionRule {
        name: "subject-application-to",
        extract: subject_application_to_company,
    },
];

pub const TITLE_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        name: "html-brand-link",
        extract: html_title,
    },
    ExtractionRule {
        name: "subject-application-to",
        extract: subject_application_to_title,
    },
];

pub const LOCATION_RULES: &[ExtractionRule] = &[ExtractionRule {
    name: "html-company-location",
    extract: html_location,
}];

/// Unescape the entities LinkedIn emits and collapse whitespace runs
#[must_use]
pub fn clean_text(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
