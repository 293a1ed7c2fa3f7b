//! Time range presets and the immutable date window of a render pass.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Earliest date used by the `Max` preset.
pub const ALL_HISTORY_START: (i32, u32, u32) = (2000, 1, 1);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("invalid time range: start {start} is after end {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[error("unknown range preset '{0}' (expected one of Today, 1M, 6M, 1Y, 3Y, 5Y, Max)")]
    UnknownPreset(String),
}

/// Named time-range options offered by the range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RangePreset {
    #[serde(rename = "Today")]
    Today,
    #[serde(rename = "1M")]
    OneMonth,
    #[default]
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "3Y")]
    ThreeYears,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "Max")]
    Max,
}

impl RangePreset {
    /// All presets in selector order.
    pub const ALL: [RangePreset; 7] = [
        RangePreset::Today,
        RangePreset::OneMonth,
        RangePreset::SixMonths,
        RangePreset::OneYear,
        RangePreset::ThreeYears,
        RangePreset::FiveYears,
        RangePreset::Max,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RangePreset::Today => "Today",
            RangePreset::OneMonth => "1M",
            RangePreset::SixMonths => "6M",
            RangePreset::OneYear => "1Y",
            RangePreset::ThreeYears => "3Y",
            RangePreset::FiveYears => "5Y",
            RangePreset::Max => "Max",
        }
    }

    /// Calendar-day lookback, or `None` for the all-history preset.
    pub fn lookback_days(self) -> Option<i64> {
        match self {
            RangePreset::Today => Some(1),
            RangePreset::OneMonth => Some(30),
            RangePreset::SixMonths => Some(182),
            RangePreset::OneYear => Some(365),
            RangePreset::ThreeYears => Some(1095),
            RangePreset::FiveYears => Some(1825),
            RangePreset::Max => None,
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> RangePreset {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> RangePreset {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for RangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RangePreset {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        RangePreset::ALL
            .iter()
            .copied()
            .find(|p| p.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RangeError::UnknownPreset(trimmed.to_string()))
    }
}

/// Inclusive date window. Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TimeRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    /// Resolve a preset against the given "today".
    pub fn from_preset(preset: RangePreset, today: NaiveDate) -> Self {
        let start = match preset.lookback_days() {
            Some(days) => today - Duration::days(days),
            None => {
                let (y, m, d) = ALL_HISTORY_START;
                NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
            }
        };
        // A clock set before 2000 would otherwise invert the Max window.
        Self {
            start: start.min(today),
            end: today,
        }
    }

    /// The six-month window ending today.
    pub fn default_for(today: NaiveDate) -> Self {
        Self::from_preset(RangePreset::default(), today)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
