//! In-memory backend for tests and offline CLI runs.
//!
//! Implements every collaborator trait. Fixture files use the same row
//! shapes as the live endpoint, keyed by category:
//!
//! ```json
//! { "macro": [ { "indicator_id": "GDP", ... } ], "micro": [ ... ] }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::provider::{
    IndicatorConfigRecord, IndicatorConfigStore, IndicatorPage, IndicatorSource, PageRequest,
    Pagination, ReportBlocks, SourceError,
};
use super::wire;
use crate::domain::{Category, ChartPosition, DateWindow, IndicatorDescriptor};
use crate::filter::filter_descriptor;

/// A recorded block update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockWrite {
    pub block_id: String,
    pub position: ChartPosition,
    pub customization_json: String,
}

#[derive(Debug, Default)]
struct FixtureState {
    configs: HashMap<String, IndicatorConfigRecord>,
    failing_config_ids: HashSet<String>,
    pending_fetch_failures: u32,
    fetch_calls: Vec<(Category, PageRequest)>,
    block_writes: Vec<BlockWrite>,
    fail_blocks: bool,
}

#[derive(Debug, Default)]
pub struct FixtureSource {
    indicators: BTreeMap<Category, Vec<IndicatorDescriptor>>,
    state: Mutex<FixtureState>,
}

fn lock(state: &Mutex<FixtureState>) -> MutexGuard<'_, FixtureState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: Category, rows: Vec<IndicatorDescriptor>) -> Self {
        self.indicators.insert(category, rows);
        self
    }

    /// Parse a fixture document (see module docs).
    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        let raw: BTreeMap<String, Vec<serde_json::Value>> = serde_json::from_str(json)
            .map_err(|e| SourceError::ResponseFormatChanged(format!("fixture: {e}")))?;
        let mut source = Self::new();
        for (key, rows) in raw {
            let category: Category = key
                .parse()
                .map_err(|e| SourceError::ResponseFormatChanged(format!("fixture: {e}")))?;
            let descriptors = rows
                .into_iter()
                .map(wire::parse_descriptor)
                .collect::<Result<Vec<_>, _>>()?;
            source.indicators.insert(category, descriptors);
        }
        Ok(source)
    }

    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SourceError::Other(format!("reading fixture {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Make the next `n` page fetches fail with a network error.
    pub fn fail_next_fetches(&self, n: u32) {
        lock(&self.state).pending_fetch_failures = n;
    }

    /// Make config writes for `id` fail.
    pub fn fail_config_for(&self, id: &str) {
        lock(&self.state).failing_config_ids.insert(id.to_string());
    }

    pub fn fail_block_updates(&self, fail: bool) {
        lock(&self.state).fail_blocks = fail;
    }

    pub fn fetch_calls(&self) -> Vec<(Category, PageRequest)> {
        lock(&self.state).fetch_calls.clone()
    }

    pub fn stored_config(&self, id: &str) -> Option<IndicatorConfigRecord> {
        lock(&self.state).configs.get(id).copied()
    }

    pub fn block_writes(&self) -> Vec<BlockWrite> {
        lock(&self.state).block_writes.clone()
    }
}

impl IndicatorSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    fn fetch_page(
        &self,
        category: Category,
        window: &DateWindow,
        page: &PageRequest,
    ) -> Result<IndicatorPage, SourceError> {
        {
            let mut state = lock(&self.state);
            state.fetch_calls.push((category, *page));
            if state.pending_fetch_failures > 0 {
                state.pending_fetch_failures -= 1;
                return Err(SourceError::NetworkUnreachable("fixture: injected failure".into()));
            }
        }

        let all = self.indicators.get(&category).map(Vec::as_slice).unwrap_or(&[]);
        let start = (page.offset as usize).min(all.len());
        let end = start.saturating_add(page.limit as usize).min(all.len());
        let data = all[start..end]
            .iter()
            .map(|d| filter_descriptor(d, window))
            .collect();
        Ok(IndicatorPage {
            data,
            pagination: Pagination {
                total: u32::try_from(all.len()).unwrap_or(u32::MAX),
                limit: page.limit,
                offset: page.offset,
                has_more: end < all.len(),
            },
        })
    }
}

impl IndicatorConfigStore for FixtureSource {
    fn get(
        &self,
        indicator_id: &str,
        _block_id: Option<&str>,
    ) -> Result<Option<IndicatorConfigRecord>, SourceError> {
        Ok(lock(&self.state).configs.get(indicator_id).copied())
    }

    fn put(
        &self,
        indicator_id: &str,
        record: &IndicatorConfigRecord,
        _block_id: Option<&str>,
    ) -> Result<(), SourceError> {
        let mut state = lock(&self.state);
        if state.failing_config_ids.contains(indicator_id) {
            return Err(SourceError::HttpStatus {
                status: 500,
                context: format!("save config for {indicator_id}"),
            });
        }
        state.configs.insert(indicator_id.to_string(), *record);
        Ok(())
    }
}

impl ReportBlocks for FixtureSource {
    fn update_chart_config(
        &self,
        block_id: &str,
        position: ChartPosition,
        customization_json: &str,
    ) -> Result<(), SourceError> {
        let mut state = lock(&self.state);
        if state.fail_blocks {
            return Err(SourceError::NetworkUnreachable("fixture: block update refused".into()));
        }
        state.block_writes.push(BlockWrite {
            block_id: block_id.to_string(),
            position,
            customization_json: customization_json.to_string(),
        });
        Ok(())
    }
}
