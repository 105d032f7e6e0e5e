//! The wizard session: one logical actor owning every store.
//!
//! Outside callers see `open` / `close` and the chart-generated callback;
//! the step methods exist for the front end that drives the session. All
//! fetch I/O runs on the [`CatalogWorker`]; replies are applied when the
//! front end calls [`WizardSession::poll`] or [`WizardSession::wait_idle`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chartwiz_core::catalog::{
    CatalogOptions, CatalogStatus, FetchTicket, IndicatorCatalog, Resolution,
};
use chartwiz_core::customize::CustomizationStore;
use chartwiz_core::data::{
    CircuitBreaker, FixtureSource, HttpBackend, IndicatorConfigRecord, IndicatorConfigStore,
    IndicatorSource, ReportBlocks, SourceError,
};
use chartwiz_core::domain::{
    Category, ChartPayload, ChartType, DateRangeSpec, DateWindow, IndicatorDescriptor,
    IndicatorSettings, IndicatorVisualConfig, SelectionKey,
};
use chartwiz_core::preview::{build_preview, ChartPreview};
use chartwiz_core::search::{Debouncer, IndicatorQuery, SortKey};
use chartwiz_core::selection::{GroupApplyReport, GroupKey, SelectionStore, ToggleOutcome};
use chartwiz_core::{assemble, AssemblyInput};
use chrono::{Local, NaiveDate};
use tracing::{error, info, warn};

use crate::chart_log::ChartLog;
use crate::config::Settings;
use crate::controller::{Advance, WizardController};
use crate::error::WizardError;
use crate::notice::{NoticeLevel, Notices};
use crate::steps::{StepDescriptor, StepId};
use crate::worker::{CatalogReply, CatalogWorker};

/// The report backend, split by concern.
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn IndicatorSource>,
    pub configs: Arc<dyn IndicatorConfigStore>,
    pub blocks: Arc<dyn ReportBlocks>,
}

impl Collaborators {
    /// One backend serving all three roles.
    pub fn shared<B>(backend: Arc<B>) -> Self
    where
        B: IndicatorSource + IndicatorConfigStore + ReportBlocks + 'static,
    {
        Self {
            source: backend.clone(),
            configs: backend.clone(),
            blocks: backend,
        }
    }

    /// The HTTP backend described by `settings`, or the local fixture when
    /// `api.fixture` is set.
    pub fn from_settings(settings: &Settings) -> Result<Self, WizardError> {
        match &settings.api.fixture {
            Some(path) => {
                info!(path = %path.display(), "serving indicators from fixture");
                Ok(Self::shared(Arc::new(FixtureSource::from_file(path)?)))
            }
            None => {
                let breaker = Arc::new(CircuitBreaker::default_backend());
                let backend = HttpBackend::new(&settings.http_config(), breaker)?;
                info!(base_url = %settings.api.base_url, "using report backend");
                Ok(Self::shared(Arc::new(backend)))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub catalog: CatalogOptions,
    pub debounce: Duration,
    pub chart_log: Option<PathBuf>,
    /// Pin "today" instead of reading the local clock.
    pub today: Option<NaiveDate>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            catalog: CatalogOptions::default(),
            debounce: Duration::from_millis(300),
            chart_log: None,
            today: None,
        }
    }
}

impl From<&Settings> for SessionOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            catalog: settings.catalog_options(),
            debounce: settings.debounce(),
            chart_log: settings.output.chart_log.clone(),
            today: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Moved(StepId),
    /// The wizard finished and has been reset.
    Generated(ChartPayload),
}

pub type ChartGeneratedCallback = Box<dyn FnMut(ChartPayload) + Send>;

/// Uniform settings the combination step starts from.
fn combination_default(today: NaiveDate) -> IndicatorSettings {
    IndicatorSettings {
        chart_type: ChartType::Bar,
        date_range: DateRangeSpec::from_window(DateWindow::max_until(today)),
    }
}

pub struct WizardSession {
    collaborators: Collaborators,
    worker: CatalogWorker,
    chart_log: Option<ChartLog>,
    fixed_today: Option<NaiveDate>,
    on_generated: Option<ChartGeneratedCallback>,

    open: bool,
    controller: WizardController,
    catalog: IndicatorCatalog,
    selection: SelectionStore,
    customization: CustomizationStore,
    combination: IndicatorSettings,
    title: Option<String>,
    chart_id: Option<i64>,
    block_id: Option<String>,
    query: IndicatorQuery,
    search: Debouncer<String>,
    notices: Notices,
}

impl WizardSession {
    pub fn new(collaborators: Collaborators, options: SessionOptions) -> Result<Self, WizardError> {
        let worker = CatalogWorker::spawn(Arc::clone(&collaborators.source))?;
        let today = options.today.unwrap_or_else(|| Local::now().date_naive());
        Ok(Self {
            collaborators,
            worker,
            chart_log: options.chart_log.map(ChartLog::new),
            fixed_today: options.today,
            on_generated: None,
            open: false,
            controller: WizardController::new(),
            catalog: IndicatorCatalog::new(options.catalog),
            selection: SelectionStore::new(),
            customization: CustomizationStore::new(),
            combination: combination_default(today),
            title: None,
            chart_id: None,
            block_id: None,
            query: IndicatorQuery::default(),
            search: Debouncer::new(options.debounce),
            notices: Notices::default(),
        })
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Window the catalog is queried over.
    fn catalog_window(&self) -> DateWindow {
        DateWindow::max_until(self.today())
    }

    // ── Public surface ──────────────────────────────────────────────────

    /// Start a session, fresh or hydrated from a chart being edited.
    pub fn open(&mut self, existing: Option<ChartPayload>) {
        self.reset_state();
        self.open = true;
        let Some(payload) = existing else {
            info!("wizard opened");
            return;
        };

        let category = payload.category();
        self.controller.hydrate(category, 0..=2);
        self.selection.hydrate(payload.selected_indicators().to_vec());
        self.customization
            .hydrate(payload.customization().clone(), payload.position());
        self.title = Some(payload.title().to_string());
        self.chart_id = payload.id();
        self.block_id = payload.id().map(|id| id.to_string());
        if category.is_combination() {
            if let Some(first) = payload.selected_indicators().first() {
                self.combination = IndicatorSettings {
                    chart_type: payload.chart_type(),
                    date_range: first.date_range,
                };
            }
        }
        info!(
            %category,
            chart_id = ?self.chart_id,
            indicators = self.selection.len(),
            "wizard opened for editing"
        );
    }

    pub fn close(&mut self) {
        self.reset_state();
        self.open = false;
        info!("wizard closed");
    }

    /// Discard everything without producing a payload.
    pub fn cancel(&mut self) {
        self.reset_state();
        self.open = false;
        info!("wizard cancelled");
    }

    pub fn on_chart_generated(&mut self, callback: ChartGeneratedCallback) {
        self.on_generated = Some(callback);
    }

    /// Report block that customization is saved to while editing.
    pub fn set_block_id(&mut self, block_id: Option<String>) {
        self.block_id = block_id;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn reset_state(&mut self) {
        let today = self.today();
        self.controller.reset();
        self.catalog.invalidate();
        self.selection.clear();
        self.customization.reset();
        self.combination = combination_default(today);
        self.title = None;
        self.chart_id = None;
        self.block_id = None;
        self.query = IndicatorQuery::default();
        self.search.cancel();
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.open {
            Ok(())
        } else {
            Err(WizardError::NotOpen)
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn steps(&self) -> &'static [StepDescriptor] {
        self.controller.steps()
    }

    pub fn current_step(&self) -> StepDescriptor {
        self.controller.current_step()
    }

    pub fn category(&self) -> Option<Category> {
        self.controller.category()
    }

    pub fn can_advance(&self) -> bool {
        self.controller.can_advance(self.selection.len())
    }

    /// Choose the category. Selections survive a switch, re-keyed for the
    /// new category so one indicator id is never selected twice. The catalog
    /// is invalidated so any fetch still in flight for the old one is dropped.
    pub fn select_category(&mut self, category: Category) -> Result<(), WizardError> {
        self.ensure_open()?;
        let previous = self.controller.category();
        if self.controller.select_category(category)? {
            self.catalog.invalidate();
            let merged = self.selection.retarget(previous, category);
            if merged > 0 {
                self.notices.push(
                    NoticeLevel::Info,
                    format!("{merged} duplicate selection(s) merged"),
                    "selection",
                );
            }
        }
        Ok(())
    }

    pub fn advance(&mut self) -> Result<StepOutcome, WizardError> {
        self.ensure_open()?;
        match self.controller.advance(self.selection.len())? {
            Advance::Moved { from, to } => {
                self.on_leave(from);
                self.on_enter(to);
                Ok(StepOutcome::Moved(to))
            }
            Advance::Finish => self.finish().map(StepOutcome::Generated),
        }
    }

    pub fn retreat(&mut self) -> Option<StepId> {
        if !self.open {
            return None;
        }
        let to = self.controller.retreat()?;
        if to == StepId::SelectIndicators {
            self.ensure_catalog();
        }
        Some(to)
    }

    fn on_leave(&mut self, step: StepId) {
        match step {
            StepId::DateChartType => self.broadcast_combination(),
            StepId::ChartConfig => self.save_customization(),
            _ => {}
        }
    }

    fn on_enter(&mut self, step: StepId) {
        match step {
            StepId::SelectIndicators => self.refresh_catalog(),
            StepId::DateChartType => self.broadcast_combination(),
            _ => {}
        }
    }

    fn broadcast_combination(&mut self) {
        self.selection.broadcast(self.combination);
    }

    /// Persist customization to the block being edited. Failure is reported
    /// but never blocks navigation.
    fn save_customization(&mut self) {
        let Some(block_id) = self.block_id.clone() else {
            return;
        };
        let json = match self.customization.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(block_id = %block_id, error = %e, "customization not serialisable");
                return;
            }
        };
        match self
            .collaborators
            .blocks
            .update_chart_config(&block_id, self.customization.position(), &json)
        {
            Ok(()) => info!(block_id = %block_id, "customization saved"),
            Err(e) => {
                warn!(block_id = %block_id, error = %e, "saving customization failed");
                self.notices.push(
                    NoticeLevel::Warning,
                    format!("customization not saved: {e}"),
                    format!("block {block_id}"),
                );
            }
        }
    }

    fn assembly_input(&self) -> AssemblyInput<'_> {
        let category = self.controller.category();
        AssemblyInput {
            category,
            selection: &self.selection,
            customization: &self.customization,
            combination_type: category
                .filter(|c| c.is_combination())
                .map(|_| self.combination.chart_type),
            title: self.title.as_deref(),
            chart_id: self.chart_id,
        }
    }

    fn finish(&mut self) -> Result<ChartPayload, WizardError> {
        let payload = match assemble(self.assembly_input()) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "assembly failed; resetting wizard");
                self.reset_state();
                self.open = false;
                self.notices
                    .push(NoticeLevel::Error, format!("chart not generated: {e}"), "assembly");
                return Err(e.into());
            }
        };

        if let Some(log) = &self.chart_log {
            if let Err(e) = log.append(&payload) {
                warn!(path = %log.path().display(), error = %e, "chart log append failed");
                self.notices.push(
                    NoticeLevel::Warning,
                    format!("chart log not written: {e}"),
                    log.path().display().to_string(),
                );
            }
        }
        if let Some(callback) = self.on_generated.as_mut() {
            callback(payload.clone());
        }

        self.notices.push(
            NoticeLevel::Info,
            format!(
                "chart '{}' generated with {} indicator(s)",
                payload.title(),
                payload.selected_indicators().len()
            ),
            payload.category().title(),
        );
        self.reset_state();
        self.open = false;
        Ok(payload)
    }

    // ── Catalog ─────────────────────────────────────────────────────────

    pub fn catalog(&self) -> &IndicatorCatalog {
        &self.catalog
    }

    fn dispatch(&mut self, ticket: FetchTicket) {
        if let Err(token) = self.worker.submit(ticket) {
            let err = SourceError::Other("catalog worker stopped".into());
            self.catalog.resolve(token, Err(err));
            self.notices
                .push(NoticeLevel::Error, "catalog worker stopped", "catalog");
        }
    }

    /// Fetch the first page for the current category.
    fn refresh_catalog(&mut self) {
        let Some(category) = self.controller.category() else {
            return;
        };
        let ticket = self.catalog.begin_fetch(category, self.catalog_window());
        self.dispatch(ticket);
    }

    /// Fetch unless the catalog already holds (or is loading) this category.
    fn ensure_catalog(&mut self) {
        let current = self.controller.category();
        let fresh =
            self.catalog.category() == current && self.catalog.status() != &CatalogStatus::Idle;
        if !fresh {
            self.refresh_catalog();
        }
    }

    /// Next page. `false` when nothing was issued.
    pub fn fetch_more(&mut self) -> bool {
        match self.catalog.begin_more() {
            Some(ticket) => {
                self.dispatch(ticket);
                true
            }
            None => false,
        }
    }

    /// Replay the failed fetch. `false` when nothing failed.
    pub fn retry(&mut self) -> bool {
        match self.catalog.retry() {
            Some(ticket) => {
                self.dispatch(ticket);
                true
            }
            None => false,
        }
    }

    fn apply_reply(&mut self, reply: CatalogReply) -> Resolution {
        let failure = reply.outcome.as_ref().err().cloned();
        let resolution = self.catalog.resolve(reply.token, reply.outcome);
        if let (Resolution::Applied, Some(err)) = (resolution, failure) {
            let hint = if err.is_transient() { " (retry available)" } else { "" };
            self.notices.push(
                NoticeLevel::Error,
                format!("loading indicators failed: {err}{hint}"),
                "catalog",
            );
        }
        resolution
    }

    /// Apply every reply that has arrived. Returns how many were received,
    /// stale ones included.
    pub fn poll(&mut self) -> usize {
        let mut received = 0;
        while let Some(reply) = self.worker.try_recv() {
            self.apply_reply(reply);
            received += 1;
        }
        received
    }

    /// Block until the catalog has no request in flight, or `timeout`.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.poll();
        while self.catalog.is_loading() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            match self.worker.recv_timeout(deadline - now) {
                Some(reply) => {
                    self.apply_reply(reply);
                }
                None => return !self.catalog.is_loading(),
            }
        }
        true
    }

    // ── Search ──────────────────────────────────────────────────────────

    /// Record a keystroke-level change; applied by [`tick`](Self::tick).
    pub fn set_search(&mut self, term: impl Into<String>, now: Instant) {
        self.search.push(term.into(), now);
    }

    /// Apply a settled search term. Returns whether the query changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(term) if term != self.query.term => {
                self.query.term = term;
                true
            }
            _ => false,
        }
    }

    /// Apply the pending term immediately.
    pub fn flush_search(&mut self) {
        if let Some(term) = self.search.flush() {
            self.query.term = term;
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.query.sort = sort;
    }

    pub fn query(&self) -> &IndicatorQuery {
        &self.query
    }

    /// Loaded rows passing the current query, in display order.
    pub fn visible_indicators(&self) -> Vec<&IndicatorDescriptor> {
        self.query.apply(self.catalog.items())
    }

    // ── Selection ───────────────────────────────────────────────────────

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn toggle(&mut self, key: &SelectionKey, selected: bool) -> Result<ToggleOutcome, WizardError> {
        self.ensure_open()?;
        let today = self.today();
        match self.catalog.find(key) {
            Some(descriptor) => Ok(self.selection.toggle(descriptor, selected, today)?),
            None if !selected => Ok(self.selection.deselect(key)?),
            None => Err(WizardError::UnknownIndicator(key.clone())),
        }
    }

    /// Change one selection's settings, then write them through to the
    /// config endpoint. A failed write is reported and otherwise ignored.
    pub fn update_indicator_config(
        &mut self,
        key: &SelectionKey,
        settings: IndicatorSettings,
    ) -> Result<(), WizardError> {
        self.ensure_open()?;
        self.selection.update_individual_config(key, settings)?;
        let record = IndicatorConfigRecord::from_settings(&settings, self.today());
        if let Err(e) = self
            .collaborators
            .configs
            .put(&key.id, &record, self.block_id.as_deref())
        {
            warn!(%key, error = %e, "indicator config write failed");
            self.notices.push(
                NoticeLevel::Warning,
                format!("settings for {key} not saved: {e}"),
                "indicator config",
            );
        }
        Ok(())
    }

    pub fn update_visual(
        &mut self,
        key: &SelectionKey,
        visual: IndicatorVisualConfig,
    ) -> Result<(), WizardError> {
        self.ensure_open()?;
        Ok(self.selection.update_visual(key, visual)?)
    }

    /// Fan the settings out to every member of the group and wait for all
    /// writes. Members whose write failed keep their old settings.
    pub fn apply_group_config(
        &mut self,
        group: &GroupKey,
        settings: IndicatorSettings,
    ) -> Result<GroupApplyReport, WizardError> {
        self.ensure_open()?;
        let today = self.today();
        let report = self.selection.apply_group_config(
            group,
            settings,
            self.collaborators.configs.as_ref(),
            self.block_id.as_deref(),
            today,
        );
        for (key, err) in &report.failed {
            self.notices.push(
                NoticeLevel::Warning,
                format!("settings for {key} not saved: {err}"),
                "group config",
            );
        }
        if !report.applied.is_empty() {
            self.apply_date_filter(settings.date_range.resolve(today));
        }
        Ok(report)
    }

    /// Slice every loaded series to one window. A later fetch replaces the
    /// sliced items with fresh ones.
    pub fn apply_date_filter(&mut self, window: DateWindow) {
        self.catalog.apply_window(&window);
        info!(
            start = %window.start(),
            end = %window.end(),
            items = self.catalog.items().len(),
            "date filter applied to catalog"
        );
    }

    pub fn combination_settings(&self) -> IndicatorSettings {
        self.combination
    }

    /// Uniform settings for the combination step. Broadcast to every
    /// selection when the step is entered and again when it is completed.
    pub fn set_combination_settings(&mut self, settings: IndicatorSettings) {
        self.combination = settings;
    }

    // ── Customization, title, preview ───────────────────────────────────

    pub fn customization(&self) -> &CustomizationStore {
        &self.customization
    }

    pub fn customization_mut(&mut self) -> &mut CustomizationStore {
        &mut self.customization
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn chart_id(&self) -> Option<i64> {
        self.chart_id
    }

    pub fn preview(&self) -> ChartPreview {
        build_preview(self.assembly_input(), self.catalog.items(), self.today())
    }

    // ── Notices ─────────────────────────────────────────────────────────

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartwiz_core::domain::{FlatIndicator, TimeSeriesPoint};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn flat(id: &str) -> IndicatorDescriptor {
        IndicatorDescriptor::Flat(FlatIndicator {
            indicator_id: id.into(),
            name: id.to_lowercase(),
            latest_date: d(2024, 3, 1),
            latest_value: 1.0,
            default_chart_type: ChartType::Area,
            is_default: false,
            source: None,
            subcategory: None,
            units: None,
            release_frequency: None,
            points: vec![TimeSeriesPoint::new(d(2020, 1, 1), 1.0)],
        })
    }

    fn session(backend: Arc<FixtureSource>) -> WizardSession {
        let options = SessionOptions {
            today: Some(d(2024, 6, 1)),
            ..SessionOptions::default()
        };
        WizardSession::new(Collaborators::shared(backend), options).unwrap()
    }

    #[test]
    fn closed_session_rejects_mutation() {
        let mut s = session(Arc::new(FixtureSource::new()));
        assert!(matches!(s.select_category(Category::Macro), Err(WizardError::NotOpen)));
        assert!(matches!(s.advance(), Err(WizardError::NotOpen)));
        assert_eq!(s.retreat(), None);
    }

    #[test]
    fn entering_indicators_step_fetches() {
        let backend = Arc::new(FixtureSource::new().with_category(Category::Micro, vec![flat("A")]));
        let mut s = session(Arc::clone(&backend));
        s.open(None);
        s.select_category(Category::Micro).unwrap();
        assert_eq!(s.advance().unwrap(), StepOutcome::Moved(StepId::SelectIndicators));
        assert!(s.wait_idle(Duration::from_secs(5)));
        assert_eq!(s.catalog().items().len(), 1);
        assert_eq!(backend.fetch_calls().len(), 1);
    }

    #[test]
    fn search_applies_after_debounce() {
        let mut s = session(Arc::new(FixtureSource::new()));
        s.open(None);
        let t0 = Instant::now();
        s.set_search("gd", t0);
        s.set_search("gdp", t0 + Duration::from_millis(100));
        assert!(!s.tick(t0 + Duration::from_millis(350)));
        assert!(s.tick(t0 + Duration::from_millis(400)));
        assert_eq!(s.query().term, "gdp");
    }

    #[test]
    fn failed_individual_write_keeps_local_change() {
        let backend = Arc::new(FixtureSource::new().with_category(Category::Micro, vec![flat("A")]));
        backend.fail_config_for("A");
        let mut s = session(Arc::clone(&backend));
        s.open(None);
        s.select_category(Category::Micro).unwrap();
        s.advance().unwrap();
        s.wait_idle(Duration::from_secs(5));
        let key = SelectionKey::plain("A");
        s.toggle(&key, true).unwrap();

        let settings = IndicatorSettings {
            chart_type: ChartType::Scatter,
            date_range: DateRangeSpec::custom(d(2015, 1, 1), d(2020, 1, 1)).unwrap(),
        };
        s.update_indicator_config(&key, settings).unwrap();
        assert_eq!(s.selection().get(&key).unwrap().settings(), settings);
        assert_eq!(s.notices().latest().unwrap().level, NoticeLevel::Warning);
    }

    #[test]
    fn toggle_unknown_indicator_is_an_error() {
        let mut s = session(Arc::new(FixtureSource::new()));
        s.open(None);
        assert!(matches!(
            s.toggle(&SelectionKey::plain("NOPE"), true),
            Err(WizardError::UnknownIndicator(_))
        ));
    }

    #[test]
    fn settings_fixture_selects_offline_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indicators.json");
        std::fs::write(
            &path,
            r#"{"cta": [{"indicator_id": 7, "indicator_name": "Trend score",
                "latest_date": "2024-05-31", "latest_value": 0.4,
                "data_points": [{"date": "2024-05-31", "value": 0.4}]}]}"#,
        )
        .unwrap();
        let mut settings = Settings::default();
        settings.api.fixture = Some(path);

        let collaborators = Collaborators::from_settings(&settings).unwrap();
        let options = SessionOptions {
            today: Some(d(2024, 6, 1)),
            ..SessionOptions::default()
        };
        let mut s = WizardSession::new(collaborators, options).unwrap();
        s.open(None);
        s.select_category(Category::Cta).unwrap();
        s.advance().unwrap();
        assert!(s.wait_idle(Duration::from_secs(5)));
        assert_eq!(s.catalog().items()[0].key(), SelectionKey::plain("7"));
    }

    #[test]
    fn missing_fixture_is_a_source_error() {
        let mut settings = Settings::default();
        settings.api.fixture = Some(PathBuf::from("/nonexistent/indicators.json"));
        assert!(matches!(
            Collaborators::from_settings(&settings),
            Err(WizardError::Source(_))
        ));
    }
}
