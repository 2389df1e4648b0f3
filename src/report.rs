//! CSV serialization of records and failure logs

use crate::date_range::DateRange;
use crate::error::Result;
use crate::types::{ApplicationRecord, FailureRecord};
use chrono::NaiveDateTime;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Column order of the main report
pub const RECORD_HEADERS: [&str; 7] = [
    "Company Name",
    "Job Title",
    "Status",
    "Date",
    "Location",
    "Metadata Subject",
    "Comment",
];

/// Column order of the failure log
pub const FAILURE_HEADERS: [&str; 11] = [
    "Timestamp",
    "Email ID",
    "Label",
    "Reason",
    "Date",
    "Company Name",
    "Job Title",
    "Location",
    "Status",
    "Metadata",
    "Comment",
];

/// Serialize records with a header row, even when there are none
pub fn write_records<W: Write>(writer: W, records: &[ApplicationRecord]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(RECORD_HEADERS)?;
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Serialize failures, optionally preceded by the header row
pub fn write_failures<W: Write>(
    writer: W,
    failures: &[FailureRecord],
    with_header: bool,
) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    if with_header {
        csv.write_record(FAILURE_HEADERS)?;
    }
    for failure in failures {
        csv.serialize(failure)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the main report, replacing any existing file
pub fn save_records(path: &Path, records: &[ApplicationRecord]) -> Result<()> {
    ensure_parent(path)?;
    let file = fs::File::create(path)?;
    write_records(file, records)?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Append to a failure log; the header is written only for a new or empty file
pub fn append_failures(path: &Path, failures: &[FailureRecord]) -> Result<()> {
    ensure_parent(path)?;
    let is_new = !fs::metadata(path).is_ok_and(|m| m.len() > 0);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    write_failures(file, failures, is_new)?;
    info!("Appended {} failures to {}", failures.len(), path.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// `job_application_status_{suffix}_{timestamp}.csv` under `dir`
#[must_use]
pub fn report_path(dir: &Path, range: &DateRange, now: NaiveDateTime) -> PathBuf {
    dir.join(format!(
        "job_application_status_{}_{}.csv",
        range.file_suffix(),
        now.format("%Y%m%d_%H%M%S")
    ))
}

/// `failed_verifications_{timestamp}.csv` under `dir`
#[must_use]
pub fn failure_log_path(dir: &Path, now: NaiveDateTime) -> PathBuf {
    dir.join(format!(
        "failed_verifications_{}.csv",
        now.format("%Y%m%d_%H%M%S")
    ))
}
