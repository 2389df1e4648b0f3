//! A processing run: Applied first, then Viewed and Rejected

use crate::config::Labels;
use crate::date_range::DateRange;
use crate::error::{ParseError, Result};
use crate::failure::{FailureCollector, NOT_AVAILABLE, PARSE_FAILED};
use crate::mailbox::{MailSource, RawMessage};
use crate::parser::{generate_comment, parse_applied, parse_date_header, parse_viewed_rejected};
use crate::reconciler::{MergeOutcome, Reconciler};
use crate::types::{ApplicationRecord, BodyKind, FailureRecord, NotificationMeta, Status};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Decides which messages a run looks at, by header date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageFilter {
    pub range: DateRange,
    pub min_year: Option<i32>,
    pub today: NaiveDate,
}

impl Default for MessageFilter {
    fn default() -> Self {
        Self {
            range: DateRange::All,
            min_year: None,
            today: Local::now().date_naive(),
        }
    }
}

impl MessageFilter {
    /// Messages with an empty date are always accepted
    #[must_use]
    pub fn accepts(&self, date: &str) -> bool {
        if let Some(min_year) = self.min_year
            && let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            && d.year() < min_year
        {
            return false;
        }
        self.range.contains(date, self.today)
    }
}

/// Per-label counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelStats {
    pub label: String,
    pub fetched: usize,
    pub skipped: usize,
    pub parsed: usize,
    pub failed: usize,
}

/// Counters for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub labels: Vec<LabelStats>,
    pub inserted: usize,
    pub replaced: usize,
    pub created: usize,
    pub unmatched: usize,
    pub upgraded: usize,
    pub unchanged: usize,
    pub records: usize,
    pub failures: usize,
}

impl RunStats {
    fn count(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Inserted => self.inserted += 1,
            MergeOutcome::Replaced => self.replaced += 1,
            MergeOutcome::Created { unmatched } => {
                self.created += 1;
                if unmatched {
                    self.unmatched += 1;
                }
            }
            MergeOutcome::Upgraded { .. } => self.upgraded += 1,
            MergeOutcome::Unchanged { .. } => self.unchanged += 1,
        }
    }
}

/// Everything a run produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub records: Vec<ApplicationRecord>,
    pub failures: Vec<FailureRecord>,
    pub stats: RunStats,
}

/// Owns the reconciler and failure log for exactly one run
#[derive(Debug)]
pub struct Processor {
    labels: Labels,
    filter: MessageFilter,
    reconciler: Reconciler,
    failures: FailureCollector,
    stats: RunStats,
}

impl Processor {
    #[must_use]
    pub fn new(labels: Labels, filter: MessageFilter) -> Self {
        Self {
            labels,
            filter,
            reconciler: Reconciler::new(),
            failures: FailureCollector::new(),
            stats: RunStats::default(),
        }
    }

    #[must_use]
    pub const fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    #[must_use]
    pub fn failures(&self) -> &[FailureRecord] {
        self.failures.failures()
    }

    /// Fetch and process every label, Applied first.
    ///
    /// Per-message problems end up in the failure log; only a label the
    /// source cannot supply aborts the run.
    pub fn run<S: MailSource>(mut self, source: &mut S) -> Result<RunReport> {
        let applied = self.labels.applied.clone();
        info!("Phase 1: building records from '{}'", applied);
        let messages = source.fetch(&applied)?;
        let mut label_stats = LabelStats {
            label: applied.clone(),
            fetched: messages.len(),
            ..LabelStats::default()
        };
        for message in &messages {
            self.process_applied(message, &applied, &mut label_stats);
        }
        self.stats.labels.push(label_stats);
        info!(
            "Built {} unique applications from '{}'",
            self.reconciler.len(),
            applied
        );

        info!("Phase 2: processing Viewed and Rejected notifications");
        let status_labels = [
            (self.labels.viewed.clone(), Status::Viewed),
            (self.labels.rejected.clone(), Status::Rejected),
        ];
        for (label, status) in status_labels {
            let messages = source.fetch(&label)?;
            let mut label_stats = LabelStats {
                label: label.clone(),
                fetched: messages.len(),
                ..LabelStats::default()
            };
            for message in &messages {
                self.process_status(message, &label, status, &mut label_stats);
            }
            self.stats.labels.push(label_stats);
        }

        Ok(self.finish())
    }

    /// Parse one Applied message and fold it into the record set
    pub fn process_applied<M: RawMessage>(
        &mut self,
        message: &M,
        label: &str,
        label_stats: &mut LabelStats,
    ) {
        let meta = notification_meta(message, label);
        if !self.filter.accepts(&meta.date) {
            debug!("Skipping {} dated {}", meta.email_id, meta.date);
            label_stats.skipped += 1;
            return;
        }

        let result = match message.defect() {
            Some(defect) => Err(defect.clone()),
            None => self.apply_applied_body(&message.plain_text_body(), &meta),
        };

        match result {
            Ok(outcome) => {
                label_stats.parsed += 1;
                self.stats.count(outcome);
            }
            Err(e) => {
                label_stats.failed += 1;
                self.failures
                    .record(&meta, Status::Applied, e.to_string(), None, NOT_AVAILABLE);
            }
        }
    }

    fn apply_applied_body(
        &mut self,
        body: &str,
        meta: &NotificationMeta,
    ) -> std::result::Result<MergeOutcome, ParseError> {
        if body.trim().is_empty() {
            return Err(ParseError::EmptyBody(BodyKind::PlainText));
        }
        let fields = parse_applied(body)?;
        self.reconciler.apply_applied(&fields, meta)
    }

    /// Parse one Viewed/Rejected message and merge it into the record set
    pub fn process_status<M: RawMessage>(
        &mut self,
        message: &M,
        label: &str,
        status: Status,
        label_stats: &mut LabelStats,
    ) {
        let meta = notification_meta(message, label);
        if !self.filter.accepts(&meta.date) {
            debug!("Skipping {} dated {}", meta.email_id, meta.date);
            label_stats.skipped += 1;
            return;
        }

        if let Some(defect) = message.defect() {
            label_stats.failed += 1;
            self.failures
                .record(&meta, status, defect.to_string(), None, PARSE_FAILED);
            return;
        }

        let parsed = parse_viewed_rejected(&message.html_body(), &meta.subject);
        if let Some(e) = parsed.error {
            label_stats.failed += 1;
            self.failures.record(
                &meta,
                status,
                e.to_string(),
                Some(&parsed.fields),
                PARSE_FAILED,
            );
            return;
        }

        match self.reconciler.apply_status(&parsed.fields, status, &meta) {
            Ok(outcome) => {
                label_stats.parsed += 1;
                self.stats.count(outcome);
                if let MergeOutcome::Created { unmatched: true } = outcome {
                    let location = if parsed.fields.location.is_empty() {
                        "Not Found"
                    } else {
                        parsed.fields.location.as_str()
                    };
                    let reason = format!(
                        "Unmatched '{status}' email. Added to main report, but a matching 'Applied' record was not found in the selected date range. Location: {location}"
                    );
                    self.failures
                        .record(&meta, status, reason, Some(&parsed.fields), "Not Found");
                }
            }
            Err(e) => {
                label_stats.failed += 1;
                self.failures.record(
                    &meta,
                    status,
                    e.to_string(),
                    Some(&parsed.fields),
                    PARSE_FAILED,
                );
            }
        }
    }

    /// Hand the records and failures over, consuming the run state
    #[must_use]
    pub fn finish(mut self) -> RunReport {
        self.stats.records = self.reconciler.len();
        self.stats.failures = self.failures.len();
        if self.failures.is_empty() {
            info!("Run finished with {} records and no errors", self.stats.records);
        } else {
            warn!(
                "Run finished with {} records; {} non-critical errors were logged",
                self.stats.records, self.stats.failures
            );
        }

        RunReport {
            records: self.reconciler.into_records(),
            failures: self.failures.into_failures(),
            stats: self.stats,
        }
    }
}

fn notification_meta<M: RawMessage>(message: &M, label: &str) -> NotificationMeta {
    let subject = message.subject().to_string();
    NotificationMeta {
        email_id: message.id().to_string(),
        label: label.to_string(),
        date: parse_date_header(message.date_header()),
        comment: generate_comment(&subject),
        subject,
    }
}
