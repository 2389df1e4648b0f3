//! Accumulation of per-message failures

use crate::types::{FailureRecord, NotificationMeta, ParsedFields, Status};
use chrono::Local;
use tracing::warn;

/// Placeholder for fields of an Applied message that failed to parse
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for fields a Viewed/Rejected parse could not produce
pub const PARSE_FAILED: &str = "Parse Failed";

/// Append-only log of failures for one run
#[derive(Debug, Default)]
pub struct FailureCollector {
    failures: Vec<FailureRecord>,
}

impl FailureCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure with whatever fields were recovered.
    ///
    /// Empty fields are replaced by `placeholder`.
    pub fn record(
        &mut self,
        meta: &NotificationMeta,
        status: Status,
        reason: impl Into<String>,
        fields: Option<&ParsedFields>,
        placeholder: &str,
    ) {
        let reason = reason.into();
        warn!(
            "Failed {} message {} ({}): {}",
            meta.label, meta.email_id, meta.subject, reason
        );

        let or_placeholder = |value: Option<&String>| {
            value
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| placeholder.to_string(), Clone::clone)
        };

        self.failures.push(FailureRecord {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            email_id: meta.email_id.clone(),
            label: meta.label.clone(),
            reason,
            date: meta.date.clone(),
            company_name: or_placeholder(fields.map(|f| &f.company_name)),
            job_title: or_placeholder(fields.map(|f| &f.job_title)),
            location: or_placeholder(fields.map(|f| &f.location)),
            status,
            metadata: meta.subject.clone(),
            comment: meta.comment.clone(),
        });
    }

    #[must_use]
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn into_failures(self) -> Vec<FailureRecord> {
        self.failures
    }
}
