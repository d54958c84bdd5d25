use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::{
    inclusive_days, month_end, month_start, shift_month, shift_year, year_end, year_start,
};
use crate::errors::SubscriptionError;

/// Closed date interval; both `start` and `end` are part of the window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SubscriptionError> {
        if end < start {
            return Err(SubscriptionError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Inclusive day count; a single-day window covers one day.
    pub fn days(&self) -> i64 {
        inclusive_days(self.start, self.end)
    }

    /// Intersection of this window with `[start, end]`, or `None` when it is empty.
    pub fn clip(&self, start: NaiveDate, end: NaiveDate) -> Option<DateWindow> {
        let start = start.max(self.start);
        let end = end.min(self.end);
        if start > end {
            None
        } else {
            Some(DateWindow { start, end })
        }
    }

    pub fn intersect(&self, other: &DateWindow) -> Option<DateWindow> {
        self.clip(other.start, other.end)
    }
}

/// Which calendar unit the headline total covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportingMode {
    #[default]
    Month,
    Year,
}

impl fmt::Display for ReportingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportingMode::Month => f.write_str("month"),
            ReportingMode::Year => f.write_str("year"),
        }
    }
}

impl FromStr for ReportingMode {
    type Err = SubscriptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" | "monthly" | "m" => Ok(ReportingMode::Month),
            "year" | "yearly" | "y" => Ok(ReportingMode::Year),
            other => Err(SubscriptionError::Validation(format!(
                "unknown reporting mode `{other}` (expected month or year)"
            ))),
        }
    }
}

/// A concrete calendar month or calendar year used as a reporting window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportingWindow {
    mode: ReportingMode,
    bounds: DateWindow,
}

impl ReportingWindow {
    /// The month or year that contains `reference`.
    pub fn containing(mode: ReportingMode, reference: NaiveDate) -> Self {
        let bounds = match mode {
            ReportingMode::Month => DateWindow {
                start: month_start(reference),
                end: month_end(reference),
            },
            ReportingMode::Year => DateWindow {
                start: year_start(reference),
                end: year_end(reference),
            },
        };
        Self { mode, bounds }
    }

    pub fn month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self::containing(ReportingMode::Month, first))
    }

    pub fn year(year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, 1, 1)
            .map(|first| Self::containing(ReportingMode::Year, first))
    }

    /// Parses `YYYY-MM` for month windows and `YYYY` for year windows.
    pub fn parse(mode: ReportingMode, text: &str) -> Result<Self, SubscriptionError> {
        let text = text.trim();
        let invalid = || {
            SubscriptionError::Validation(format!("`{text}` is not a valid {mode} (YYYY-MM or YYYY)"))
        };
        match mode {
            ReportingMode::Month => {
                let (year, month) = text.split_once('-').ok_or_else(invalid)?;
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                Self::month(year, month).ok_or_else(invalid)
            }
            ReportingMode::Year => {
                let year: i32 = text.parse().map_err(|_| invalid())?;
                Self::year(year).ok_or_else(invalid)
            }
        }
    }

    pub fn mode(&self) -> ReportingMode {
        self.mode
    }

    pub fn bounds(&self) -> DateWindow {
        self.bounds
    }

    pub fn start(&self) -> NaiveDate {
        self.bounds.start
    }

    pub fn end(&self) -> NaiveDate {
        self.bounds.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.bounds.contains(date)
    }

    /// Moves the window by whole months or years.
    pub fn shift(&self, steps: i64) -> Option<Self> {
        let moved = match self.mode {
            ReportingMode::Month => shift_month(self.bounds.start, steps)?,
            ReportingMode::Year => shift_year(self.bounds.start, steps)?,
        };
        Some(Self::containing(self.mode, moved))
    }

    pub fn label(&self) -> String {
        match self.mode {
            ReportingMode::Month => self.bounds.start.format("%B %Y").to_string(),
            ReportingMode::Year => self.bounds.start.year().to_string(),
        }
    }
}

impl fmt::Display for ReportingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
