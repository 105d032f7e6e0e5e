//! Collaborator traits and structured error types.
//!
//! The traits abstract over the report backend (HTTP in production, the
//! in-memory fixture in tests and offline CLI runs) so the catalog and
//! selection logic never depend on a transport.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    Category, ChartPosition, ChartType, DateWindow, IndicatorDescriptor, IndicatorSettings,
};

/// Structured error types for collaborator calls.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("rate limited by backend (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status}: {context}")]
    HttpStatus { status: u16, context: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend unavailable (circuit breaker open, retry in {remaining_secs}s)")]
    CircuitBreakerOpen { remaining_secs: u64 },

    #[error("source error: {0}")]
    Other(String),
}

impl SourceError {
    /// Whether a retry of the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::NetworkUnreachable(_)
            | SourceError::Timeout(_)
            | SourceError::RateLimited { .. } => true,
            SourceError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Page parameters for an indicator query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_type_id: Option<i64>,
}

impl PageRequest {
    pub fn first(limit: u32, report_type_id: Option<i64>) -> Self {
        Self {
            limit,
            offset: 0,
            report_type_id,
        }
    }

    /// The page after this one.
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

impl Pagination {
    /// Used when the backend returns a bare array.
    pub fn single_page(count: usize, request: &PageRequest) -> Self {
        Self {
            total: u32::try_from(count).unwrap_or(u32::MAX),
            limit: request.limit,
            offset: request.offset,
            has_more: false,
        }
    }
}

/// One page of normalised descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPage {
    pub data: Vec<IndicatorDescriptor>,
    pub pagination: Pagination,
}

/// Query side of the report backend.
pub trait IndicatorSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch one page of indicators for a category over a date window.
    fn fetch_page(
        &self,
        category: Category,
        window: &DateWindow,
        page: &PageRequest,
    ) -> Result<IndicatorPage, SourceError>;
}

/// Persisted chart settings for one indicator or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorConfigRecord {
    pub chart_type: ChartType,
    pub date_range_start: NaiveDate,
    pub date_range_end: NaiveDate,
}

impl IndicatorConfigRecord {
    /// Resolve the settings' date range as of `today` into the stored shape.
    pub fn from_settings(settings: &IndicatorSettings, today: NaiveDate) -> Self {
        let window = settings.date_range.resolve(today);
        Self {
            chart_type: settings.chart_type,
            date_range_start: window.start(),
            date_range_end: window.end(),
        }
    }
}

/// Per-indicator config endpoint. A write-through cache of what the
/// selection store holds, never the authority.
pub trait IndicatorConfigStore: Send + Sync {
    fn get(
        &self,
        indicator_id: &str,
        block_id: Option<&str>,
    ) -> Result<Option<IndicatorConfigRecord>, SourceError>;

    fn put(
        &self,
        indicator_id: &str,
        record: &IndicatorConfigRecord,
        block_id: Option<&str>,
    ) -> Result<(), SourceError>;
}

/// Report-block side: where customization is saved while editing.
pub trait ReportBlocks: Send + Sync {
    fn update_chart_config(
        &self,
        block_id: &str,
        position: ChartPosition,
        customization_json: &str,
    ) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DatePreset, DateRangeSpec};

    #[test]
    fn next_page_advances_by_limit() {
        let p = PageRequest::first(10, Some(4));
        let n = p.next();
        assert_eq!(n.offset, 10);
        assert_eq!(n.limit, 10);
        assert_eq!(n.report_type_id, Some(4));
        assert_eq!(n.next().offset, 20);
    }

    #[test]
    fn transient_classification() {
        assert!(SourceError::Timeout("x".into()).is_transient());
        assert!(SourceError::HttpStatus { status: 503, context: "x".into() }.is_transient());
        assert!(!SourceError::HttpStatus { status: 404, context: "x".into() }.is_transient());
        assert!(!SourceError::CircuitBreakerOpen { remaining_secs: 5 }.is_transient());
    }

    #[test]
    fn config_record_resolves_presets() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let settings = IndicatorSettings {
            chart_type: ChartType::Area,
            date_range: DateRangeSpec::preset(DatePreset::Max),
        };
        let rec = IndicatorConfigRecord::from_settings(&settings, today);
        assert_eq!(rec.date_range_start, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(rec.date_range_end, today);
        let json = serde_json::to_value(rec).unwrap();
        assert_eq!(json["chartType"], "area");
        assert_eq!(json["dateRangeStart"], "2000-01-01");
    }
}
