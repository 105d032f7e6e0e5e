//! Date windows and the preset/custom range chosen per indicator.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Earliest date any indicator series is assumed to cover.
pub fn earliest_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("invalid date range: start {start} is after end {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[error("unknown date preset '{0}'")]
    UnknownPreset(String),
}

/// Inclusive `[start, end]` window. Always satisfies `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    /// `earliest_supported_date() ..= today`.
    pub fn max_until(today: NaiveDate) -> Self {
        let start = earliest_supported_date().min(today);
        Self { start, end: today }
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

    /// Wire format used by query strings (`YYYY-MM-DD`).
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Named range choices offered to the analyst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatePreset {
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "2Y")]
    TwoYears,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "10Y")]
    TenYears,
    #[serde(rename = "MAX")]
    Max,
    #[serde(rename = "CUSTOM")]
    Custom,
}

impl DatePreset {
    pub const ALL: [DatePreset; 6] = [
        DatePreset::OneYear,
        DatePreset::TwoYears,
        DatePreset::FiveYears,
        DatePreset::TenYears,
        DatePreset::Max,
        DatePreset::Custom,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            DatePreset::OneYear => "1Y",
            DatePreset::TwoYears => "2Y",
            DatePreset::FiveYears => "5Y",
            DatePreset::TenYears => "10Y",
            DatePreset::Max => "MAX",
            DatePreset::Custom => "CUSTOM",
        }
    }

    pub fn parse(tag: &str) -> Result<Self, DateRangeError> {
        Self::ALL
            .into_iter()
            .find(|p| p.tag().eq_ignore_ascii_case(tag.trim()))
            .ok_or_else(|| DateRangeError::UnknownPreset(tag.to_string()))
    }

    /// Look-back in years for the rolling presets.
    fn years(self) -> Option<i64> {
        match self {
            DatePreset::OneYear => Some(1),
            DatePreset::TwoYears => Some(2),
            DatePreset::FiveYears => Some(5),
            DatePreset::TenYears => Some(10),
            DatePreset::Max | DatePreset::Custom => None,
        }
    }
}

/// Raw serde shape; validated into [`DateRangeSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDateRange {
    preset: DatePreset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_end: Option<NaiveDate>,
}

/// A preset tag plus explicit bounds when the preset is `CUSTOM`.
///
/// Rolling presets are resolved against "today" at read time, so a spec
/// stored a year ago still means "the last 5 years" when re-opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange", into = "RawDateRange")]
pub struct DateRangeSpec {
    preset: DatePreset,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
}

impl TryFrom<RawDateRange> for DateRangeSpec {
    type Error = DateRangeError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        if raw.preset == DatePreset::Custom {
            if let (Some(start), Some(end)) = (raw.custom_start, raw.custom_end) {
                if start > end {
                    return Err(DateRangeError::StartAfterEnd { start, end });
                }
            }
        }
        Ok(Self {
            preset: raw.preset,
            custom_start: raw.custom_start,
            custom_end: raw.custom_end,
        })
    }
}

impl From<DateRangeSpec> for RawDateRange {
    fn from(spec: DateRangeSpec) -> Self {
        Self {
            preset: spec.preset,
            custom_start: spec.custom_start,
            custom_end: spec.custom_end,
        }
    }
}

impl DateRangeSpec {
    pub fn preset(preset: DatePreset) -> Self {
        Self {
            preset,
            custom_start: None,
            custom_end: None,
        }
    }

    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::StartAfterEnd { start, end });
        }
        Ok(Self {
            preset: DatePreset::Custom,
            custom_start: Some(start),
            custom_end: Some(end),
        })
    }

    pub fn from_window(window: DateWindow) -> Self {
        Self {
            preset: DatePreset::Custom,
            custom_start: Some(window.start()),
            custom_end: Some(window.end()),
        }
    }

    /// Default for a freshly selected indicator: custom, from the earliest
    /// supported date up to the indicator's latest known date.
    pub fn selection_default(latest: NaiveDate) -> Self {
        let start = earliest_supported_date().min(latest);
        Self {
            preset: DatePreset::Custom,
            custom_start: Some(start),
            custom_end: Some(latest),
        }
    }

    pub fn preset_tag(&self) -> DatePreset {
        self.preset
    }

    pub fn custom_start(&self) -> Option<NaiveDate> {
        self.custom_start
    }

    pub fn custom_end(&self) -> Option<NaiveDate> {
        self.custom_end
    }

    /// Concrete window for this spec as of `today`.
    pub fn resolve(&self, today: NaiveDate) -> DateWindow {
        match self.preset.years() {
            Some(years) => {
                let start = today - Duration::days(365 * years);
                DateWindow { start, end: today }
            }
            None if self.preset == DatePreset::Custom => {
                let end = self.custom_end.unwrap_or(today);
                let start = self.custom_start.unwrap_or_else(earliest_supported_date).min(end);
                DateWindow { start, end }
            }
            None => DateWindow::max_until(today),
        }
    }
}
