//! Run configuration loaded from TOML

use crate::date_range::DateRange;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Label names for each notification kind
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub applied: String,
    pub viewed: String,
    pub rejected: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            applied: "LinkedIn/Applied".into(),
            viewed: "LinkedIn/Viewed".into(),
            rejected: "LinkedIn/Rejected".into(),
        }
    }
}

/// Settings for one processing run.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one sub-directory of `.eml` files per label
    pub mailbox_root: PathBuf,

    pub labels: Labels,

    /// Where reports and failure logs are written
    pub output_dir: PathBuf,

    /// Optional file receiving a copy of the log output
    pub log_file: Option<PathBuf>,

    /// Date range preset or `YYYY-MM-DD:YYYY-MM-DD`
    pub date_range: String,

    /// Messages dated before this year are skipped; `0` disables
    pub min_year: Option<i32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mailbox_root: PathBuf::from("data/mailbox"),
            labels: Labels::default(),
            output_dir: PathBuf::from("data/processed"),
            log_file: None,
            date_range: "all".into(),
            min_year: Some(2024),
        }
    }
}

impl Config {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn date_range(&self) -> Result<DateRange> {
        self.date_range.parse()
    }

    /// Minimum year with `0` treated as disabled
    #[must_use]
    pub fn min_year(&self) -> Option<i32> {
        self.min_year.filter(|y| *y > 0)
    }
}
