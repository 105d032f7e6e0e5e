//! Local search and sort over loaded catalog rows, plus a debouncer for
//! keystroke-driven input.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::domain::IndicatorDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    /// Latest date, newest first.
    Date,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "date" => Ok(SortKey::Date),
            other => Err(format!("unknown sort key '{other}' (expected name or date)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorQuery {
    pub term: String,
    pub sort: SortKey,
}

impl IndicatorQuery {
    pub fn new(term: impl Into<String>, sort: SortKey) -> Self {
        Self {
            term: term.into(),
            sort,
        }
    }

    pub fn matches(&self, descriptor: &IndicatorDescriptor) -> bool {
        let term = self.term.trim();
        term.is_empty()
            || descriptor
                .display_name()
                .to_lowercase()
                .contains(&term.to_lowercase())
    }

    fn compare(&self, a: &IndicatorDescriptor, b: &IndicatorDescriptor) -> Ordering {
        let by_default = b.is_default().cmp(&a.is_default());
        let by_name = || {
            a.display_name()
                .to_lowercase()
                .cmp(&b.display_name().to_lowercase())
        };
        match self.sort {
            SortKey::Name => by_default.then_with(by_name),
            // Groups have no date; `None < Some` puts them last when reversed.
            SortKey::Date => by_default
                .then_with(|| b.latest_date().cmp(&a.latest_date()))
                .then_with(by_name),
        }
    }

    /// Matching rows, default-first, then by the chosen key.
    pub fn apply<'a>(&self, rows: &'a [IndicatorDescriptor]) -> Vec<&'a IndicatorDescriptor> {
        let mut out: Vec<_> = rows.iter().filter(|d| self.matches(d)).collect();
        out.sort_by(|a, b| self.compare(a, b));
        out
    }
}

/// Holds the most recent value and releases it once `delay` has passed
/// without another change.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a change at `now`, replacing any pending value.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending value if it has settled by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(v, _)| v)
            }
            _ => None,
        }
    }

    /// Release whatever is pending regardless of timing.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
