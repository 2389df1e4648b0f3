//! Merging notifications into one record per application

use crate::error::ParseError;
use crate::types::{ApplicationKey, ApplicationRecord, NotificationMeta, ParsedFields, Status};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// What a notification did to the record set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// New record seeded from an Applied notification
    Inserted,

    /// Applied notification for a key already present; the newer one wins
    Replaced,

    /// Viewed/Rejected notification with no prior record for its key
    Created { unmatched: bool },

    /// Status moved to a strictly higher priority
    Upgraded { from: Status },

    /// Status not higher than the current one; only an empty location may
    /// have been filled
    Unchanged { location_backfilled: bool },
}

/// Deduplicated map of application records for a single processing run.
///
/// Records keep the position of the notification that first created them.
#[derive(Debug, Default)]
pub struct Reconciler {
    records: HashMap<ApplicationKey, ApplicationRecord>,
    order: Vec<ApplicationKey>,
}

impl Reconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an Applied notification in.
    ///
    /// Duplicate Applied keys are last-write-wins. A record that already
    /// moved past Applied keeps its status and only gains an empty location.
    pub fn apply_applied(
        &mut self,
        fields: &ParsedFields,
        meta: &NotificationMeta,
    ) -> Result<MergeOutcome, ParseError> {
        let key = fields.key().ok_or(ParseError::CompanyUnresolved)?;
        let record = ApplicationRecord::from_parsed(fields, Status::Applied, meta);

        match self.records.entry(key.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(record);
                self.order.push(key);
                Ok(MergeOutcome::Inserted)
            }
            Entry::Occupied(mut entry) if entry.get().status == Status::Applied => {
                entry.insert(record);
                debug!("Replaced Applied record for {}", key);
                Ok(MergeOutcome::Replaced)
            }
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                debug!("Kept {} record for {} over late Applied", existing.status, key);
                Ok(MergeOutcome::Unchanged {
                    location_backfilled: backfill_location(existing, fields),
                })
            }
        }
    }

    /// Fold a Viewed or Rejected notification in.
    ///
    /// Status only ever moves up in priority. Location from an earlier
    /// record is kept and only filled when it was empty.
    pub fn apply_status(
        &mut self,
        fields: &ParsedFields,
        status: Status,
        meta: &NotificationMeta,
    ) -> Result<MergeOutcome, ParseError> {
        if status == Status::Applied {
            return self.apply_applied(fields, meta);
        }

        let key = fields.key().ok_or(ParseError::CompanyUnresolved)?;

        let existing = match self.records.entry(key.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut record = ApplicationRecord::from_parsed(fields, status, meta);
                record.comment = format!("{status} email found without matching Applied record");
                debug!("Created {} record without prior Applied for {}", status, key);
                entry.insert(record);
                self.order.push(key);
                return Ok(MergeOutcome::Created {
                    unmatched: status == Status::Viewed,
                });
            }
        };

        if status.priority() > existing.status.priority() {
            let from = existing.status;
            let location = if existing.location.trim().is_empty() {
                fields.location.clone()
            } else {
                existing.location.clone()
            };
            *existing = ApplicationRecord {
                company_name: existing.company_name.clone(),
                job_title: existing.job_title.clone(),
                status,
                date: meta.date.clone(),
                location,
                metadata_subject: meta.subject.clone(),
                comment: format!("Status updated to {status}. Original: {}", existing.comment),
            };
            debug!("Upgraded {} from {} to {}", key, from, status);
            return Ok(MergeOutcome::Upgraded { from });
        }

        Ok(MergeOutcome::Unchanged {
            location_backfilled: backfill_location(existing, fields),
        })
    }

    #[must_use]
    pub fn get(&self, key: &ApplicationKey) -> Option<&ApplicationRecord> {
        self.records.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in first-seen order
    pub fn records(&self) -> impl Iterator<Item = &ApplicationRecord> {
        self.order.iter().filter_map(|key| self.records.get(key))
    }

    #[must_use]
    pub fn into_records(mut self) -> Vec<ApplicationRecord> {
        self.order
            .iter()
            .filter_map(|key| self.records.remove(key))
            .collect()
    }
}

fn backfill_location(existing: &mut ApplicationRecord, fields: &ParsedFields) -> bool {
    let fill = existing.location.trim().is_empty() && !fields.location.trim().is_empty();
    if fill {
        existing.location.clone_from(&fields.location);
    }
    fill
}
