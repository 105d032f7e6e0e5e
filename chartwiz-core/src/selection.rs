//! The ordered set of chosen indicators and their chart settings.
//!
//! This store is the single source of truth for per-indicator settings. The
//! config endpoint is only written through to; nothing read from it ever
//! overrides what is held here.

use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::{IndicatorConfigRecord, IndicatorConfigStore, SourceError};
use crate::domain::{
    Category, IndicatorDescriptor, IndicatorKind, IndicatorSettings, IndicatorVisualConfig,
    SelectedIndicator, SelectionKey,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("a toggle for '{0}' is still settling")]
    ToggleInFlight(SelectionKey),

    #[error("'{0}' is not selected")]
    NotSelected(SelectionKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Already in the requested state.
    Unchanged,
}

/// A toggle that has been accepted but not yet applied. While it exists,
/// further toggles of the same key are rejected.
#[derive(Debug)]
#[must_use = "a pending toggle holds its key until finished"]
pub(crate) struct PendingToggle {
    key: SelectionKey,
    entry: Option<SelectedIndicator>,
}

impl PendingToggle {
    #[cfg(test)]
    fn key(&self) -> &SelectionKey {
        &self.key
    }
}

/// What a bulk settings update is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// A named sub-group: group selections with that name, and flat
    /// selections whose subcategory is that name.
    Group(String),
    /// Every selection pulled from one source category (combination pools).
    Category(Category),
}

/// Per-id outcome of a group apply.
#[derive(Debug, Default)]
pub struct GroupApplyReport {
    pub applied: Vec<SelectionKey>,
    pub failed: Vec<(SelectionKey, SourceError)>,
}

impl GroupApplyReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Default, Clone)]
pub struct SelectionStore {
    entries: Vec<SelectedIndicator>,
    settling: HashSet<SelectionKey>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents, keeping the first entry for any duplicate key.
    pub fn hydrate(&mut self, entries: Vec<SelectedIndicator>) {
        self.entries.clear();
        self.settling.clear();
        for entry in entries {
            if !self.contains(&entry.key()) {
                self.entries.push(entry);
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.settling.clear();
    }

    pub fn entries(&self) -> &[SelectedIndicator] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &SelectionKey) -> bool {
        self.entries.iter().any(|e| &e.key() == key)
    }

    pub fn get(&self, key: &SelectionKey) -> Option<&SelectedIndicator> {
        self.entries.iter().find(|e| &e.key() == key)
    }

    fn get_mut(&mut self, key: &SelectionKey) -> Option<&mut SelectedIndicator> {
        self.entries.iter_mut().find(|e| &e.key() == key)
    }

    #[cfg(test)]
    fn is_settling(&self, key: &SelectionKey) -> bool {
        self.settling.contains(key)
    }

    /// First phase of a toggle: claim the key and build the entry to add.
    fn begin_toggle(
        &mut self,
        descriptor: &IndicatorDescriptor,
        selected: bool,
        today: NaiveDate,
    ) -> Result<PendingToggle, SelectionError> {
        let key = descriptor.key();
        if !self.settling.insert(key.clone()) {
            debug!(%key, "toggle rejected while settling");
            return Err(SelectionError::ToggleInFlight(key));
        }
        let entry = selected.then(|| SelectedIndicator::from_descriptor(descriptor, today));
        Ok(PendingToggle { key, entry })
    }

    /// Second phase: apply and release the key.
    fn finish_toggle(&mut self, pending: PendingToggle) -> ToggleOutcome {
        let PendingToggle { key, entry } = pending;
        self.settling.remove(&key);
        let present = self.contains(&key);
        let outcome = match entry {
            Some(entry) if !present => {
                self.entries.push(entry);
                ToggleOutcome::Added
            }
            None if present => {
                self.entries.retain(|e| e.key() != key);
                ToggleOutcome::Removed
            }
            _ => ToggleOutcome::Unchanged,
        };
        debug!(%key, ?outcome, selected = self.entries.len(), "toggle applied");
        outcome
    }

    /// Both phases at once.
    pub fn toggle(
        &mut self,
        descriptor: &IndicatorDescriptor,
        selected: bool,
        today: NaiveDate,
    ) -> Result<ToggleOutcome, SelectionError> {
        let pending = self.begin_toggle(descriptor, selected, today)?;
        Ok(self.finish_toggle(pending))
    }

    /// Remove by key alone, for entries whose descriptor is no longer loaded
    /// (hydrated selections, a category switch).
    pub fn deselect(&mut self, key: &SelectionKey) -> Result<ToggleOutcome, SelectionError> {
        if self.settling.contains(key) {
            return Err(SelectionError::ToggleInFlight(key.clone()));
        }
        let before = self.entries.len();
        self.entries.retain(|e| &e.key() != key);
        let outcome = if self.entries.len() < before {
            ToggleOutcome::Removed
        } else {
            ToggleOutcome::Unchanged
        };
        debug!(%key, ?outcome, "deselect");
        Ok(outcome)
    }

    /// Re-key selections for a category switch. Entering the combination
    /// category tags flat selections with the category they were picked
    /// from; leaving it drops the tag. Entries that land on the same key
    /// collapse to the first. Returns how many were merged away.
    pub fn retarget(&mut self, from: Option<Category>, to: Category) -> usize {
        let into_combination = to.is_combination();
        let out_of_combination = from.is_some_and(Category::is_combination) && !into_combination;
        for entry in &mut self.entries {
            match entry.source_indicator.kind {
                IndicatorKind::Combined if out_of_combination => {
                    entry.source_category = None;
                    entry.source_indicator.kind = IndicatorKind::Flat;
                }
                IndicatorKind::Flat if into_combination => {
                    if let Some(origin) = from.filter(|c| !c.is_combination()) {
                        entry.source_category = Some(origin);
                        entry.source_indicator.kind = IndicatorKind::Combined;
                        entry.source_indicator.category = Some(origin);
                    }
                }
                _ => {}
            }
        }

        let before = self.entries.len();
        let mut seen = HashSet::new();
        self.entries.retain(|e| seen.insert(e.key()));
        let merged = before - self.entries.len();
        if merged > 0 {
            info!(?from, to = %to, merged, "selections merged on category switch");
        }
        merged
    }

    /// Replace chart type and date range for one selection only.
    pub fn update_individual_config(
        &mut self,
        key: &SelectionKey,
        settings: IndicatorSettings,
    ) -> Result<(), SelectionError> {
        let entry = self
            .get_mut(key)
            .ok_or_else(|| SelectionError::NotSelected(key.clone()))?;
        entry.apply(settings);
        Ok(())
    }

    pub fn update_visual(
        &mut self,
        key: &SelectionKey,
        visual: IndicatorVisualConfig,
    ) -> Result<(), SelectionError> {
        let entry = self
            .get_mut(key)
            .ok_or_else(|| SelectionError::NotSelected(key.clone()))?;
        entry.config = Some(visual);
        Ok(())
    }

    /// Overwrite every selection's settings.
    pub fn broadcast(&mut self, settings: IndicatorSettings) {
        for entry in &mut self.entries {
            entry.apply(settings);
        }
        info!(
            chart_type = %settings.chart_type,
            count = self.entries.len(),
            "settings broadcast to all selections"
        );
    }

    /// Keys of the selections a group key covers, in store order.
    pub fn members_of(&self, group: &GroupKey) -> Vec<SelectionKey> {
        self.entries
            .iter()
            .filter(|e| match group {
                GroupKey::Group(name) => e.source_indicator.group.as_deref() == Some(name.as_str()),
                GroupKey::Category(c) => e.source_category == Some(*c),
            })
            .map(SelectedIndicator::key)
            .collect()
    }

    /// Persist `settings` for every member of the group, then apply them
    /// locally to the members whose write succeeded. All writes are issued
    /// and awaited; one failure never cancels the others and nothing is
    /// rolled back.
    pub fn apply_group_config(
        &mut self,
        group: &GroupKey,
        settings: IndicatorSettings,
        store: &dyn IndicatorConfigStore,
        block_id: Option<&str>,
        today: NaiveDate,
    ) -> GroupApplyReport {
        let members = self.members_of(group);
        let record = IndicatorConfigRecord::from_settings(&settings, today);

        let results: Vec<(SelectionKey, Result<(), SourceError>)> = members
            .into_par_iter()
            .map(|key| {
                let outcome = store.put(&key.id, &record, block_id);
                (key, outcome)
            })
            .collect();

        let mut report = GroupApplyReport::default();
        for (key, outcome) in results {
            match outcome {
                Ok(()) => {
                    if let Some(entry) = self.get_mut(&key) {
                        entry.apply(settings);
                    }
                    report.applied.push(key);
                }
                Err(err) => {
                    warn!(%key, error = %err, "group config write failed");
                    report.failed.push((key, err));
                }
            }
        }
        info!(
            group = ?group,
            applied = report.applied.len(),
            failed = report.failed.len(),
            "group config applied"
        );
        report
    }
}
