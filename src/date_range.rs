//! Date range presets for selecting which notifications to process

use crate::error::{Error, Result};
use chrono::{Days, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Window of message dates a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    All,
    LastDay,
    LastWeek,
    LastMonth,
    LastQuarter,
    LastYear,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    /// Presets accepted on the command line, with descriptions
    #[must_use]
    pub const fn available() -> &'static [(&'static str, &'static str)] {
        &[
            ("all", "All time"),
            ("24h", "Last 24 hours"),
            ("1d", "Last 24 hours"),
            ("7d", "Last 7 days"),
            ("1w", "Last week"),
            ("30d", "Last 30 days"),
            ("1m", "Last month"),
            ("90d", "Last 90 days"),
            ("3m", "Last 3 months"),
            ("1y", "Last year"),
            ("custom", "Custom range (YYYY-MM-DD:YYYY-MM-DD)"),
        ]
    }

    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::All => "All time".into(),
            Self::LastDay => "Last 24 hours".into(),
            Self::LastWeek => "Last 7 days".into(),
            Self::LastMonth => "Last 30 days".into(),
            Self::LastQuarter => "Last 90 days".into(),
            Self::LastYear => "Last year".into(),
            Self::Custom { start, end } => format!("From {start} to {end}"),
        }
    }

    /// Suffix used in report file names
    #[must_use]
    pub fn file_suffix(&self) -> String {
        match self {
            Self::All => "all_time".into(),
            Self::LastDay => "last_24h".into(),
            Self::LastWeek => "last_week".into(),
            Self::LastMonth => "last_month".into(),
            Self::LastQuarter => "last_3months".into(),
            Self::LastYear => "last_year".into(),
            Self::Custom { start, end } => format!("custom_{start}_to_{end}"),
        }
    }

    const fn lookback_days(&self) -> Option<u64> {
        match self {
            Self::LastDay => Some(1),
            Self::LastWeek => Some(7),
            Self::LastMonth => Some(30),
            Self::LastQuarter => Some(90),
            Self::LastYear => Some(365),
            Self::All | Self::Custom { .. } => None,
        }
    }

    /// Whether a `YYYY-MM-DD` message date falls inside the range.
    ///
    /// Empty or unparseable dates are always inside: a bad header never
    /// hides a message.
    #[must_use]
    pub fn contains(&self, date: &str, today: NaiveDate) -> bool {
        let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
            return true;
        };

        match self {
            Self::All => true,
            Self::Custom { start, end } => *start <= date && date <= *end,
            preset => preset
                .lookback_days()
                .and_then(|days| today.checked_sub_days(Days::new(days)))
                .is_none_or(|since| date >= since),
        }
    }
}

impl FromStr for DateRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::All);
        }

        if let Some((start, end)) = s.split_once(':') {
            let parse = |v: &str| {
                NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").map_err(|_| {
                    Error::InvalidDateRange(
                        "Invalid date format. Use YYYY-MM-DD:YYYY-MM-DD format".into(),
                    )
                })
            };
            let (start, end) = (parse(start)?, parse(end)?);
            if start > end {
                return Err(Error::InvalidDateRange(
                    "Start date must be before end date".into(),
                ));
            }
            return Ok(Self::Custom { start, end });
        }

        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "24h" | "1d" => Ok(Self::LastDay),
            "7d" | "1w" => Ok(Self::LastWeek),
            "30d" | "1m" => Ok(Self::LastMonth),
            "90d" | "3m" => Ok(Self::LastQuarter),
            "1y" => Ok(Self::LastYear),
            other => Err(Error::InvalidDateRange(format!(
                "Unknown date range: {other}"
            ))),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
