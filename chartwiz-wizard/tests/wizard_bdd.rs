//! BDD tests for the chart wizard session.
//!
//! These scenarios drive a full `WizardSession` against in-memory backends:
//! - Step topology per category
//! - Guarded advance
//! - Selection dedup
//! - Combination uniformity
//! - End-to-end chart generation
//! - Stale fetch discard
//! - Category switch with carried selections
//! - Paging and the global date filter
//! - Failure, retry, cancel and edit-mode persistence

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chartwiz_core::catalog::CatalogStatus;
use chartwiz_core::customize::CustomizationStore;
use chartwiz_core::data::{
    FixtureSource, IndicatorPage, IndicatorSource, PageRequest, SourceError,
};
use chartwiz_core::domain::{
    Category, ChartPayload, ChartPosition, ChartType, DatePreset, DateRangeSpec, DateWindow,
    FlatIndicator, IndicatorDescriptor, IndicatorSettings, SelectionKey, TimeSeriesPoint,
};
use chartwiz_core::filter::filter_points;
use chartwiz_core::selection::{GroupKey, SelectionStore, ToggleOutcome};
use chartwiz_core::{assemble, AssemblyInput, CatalogOptions};
use chartwiz_wizard::{
    ChartLog, Collaborators, GuardFailure, NoticeLevel, SessionOptions, StepId, StepOutcome,
    WizardError, WizardSession, BASE_STEP_COUNT,
};
use chrono::NaiveDate;

const WAIT: Duration = Duration::from_secs(10);

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn today() -> NaiveDate {
    d(2024, 6, 1)
}

fn flat(id: &str, name: &str, chart_type: ChartType, is_default: bool) -> IndicatorDescriptor {
    IndicatorDescriptor::Flat(FlatIndicator {
        indicator_id: id.into(),
        name: name.into(),
        latest_date: d(2024, 3, 31),
        latest_value: 3.2,
        default_chart_type: chart_type,
        is_default,
        source: Some("BEA".into()),
        subcategory: None,
        units: None,
        release_frequency: None,
        points: vec![
            TimeSeriesPoint::new(d(2012, 6, 30), 1.0),
            TimeSeriesPoint::new(d(2018, 6, 30), 2.0),
            TimeSeriesPoint::new(d(2024, 3, 31), 3.2),
        ],
    })
}

fn in_group(mut desc: IndicatorDescriptor, group: &str) -> IndicatorDescriptor {
    if let Some(series) = desc.series_mut() {
        series.subcategory = Some(group.into());
    }
    desc
}

fn macro_rows() -> Vec<IndicatorDescriptor> {
    vec![
        flat("CPI", "Consumer Price Index", ChartType::Line, false),
        flat("GDP", "Gross Domestic Product", ChartType::Bar, true),
        flat("UNRATE", "Unemployment Rate", ChartType::Area, false),
    ]
}

fn options() -> SessionOptions {
    SessionOptions {
        today: Some(today()),
        ..SessionOptions::default()
    }
}

fn session_with(backend: Arc<FixtureSource>) -> WizardSession {
    WizardSession::new(Collaborators::shared(backend), options()).unwrap()
}

/// Open a session, choose `category` and land on the indicator step with
/// the catalog loaded.
fn on_indicator_step(session: &mut WizardSession, category: Category) {
    session.open(None);
    session.select_category(category).unwrap();
    assert_eq!(
        session.advance().unwrap(),
        StepOutcome::Moved(StepId::SelectIndicators)
    );
    assert!(session.wait_idle(WAIT), "catalog did not settle");
}

/// Holds fetches for one category open until the test releases them.
struct GatedSource {
    inner: FixtureSource,
    gated: Category,
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl IndicatorSource for GatedSource {
    fn name(&self) -> &str {
        "gated"
    }

    fn fetch_page(
        &self,
        category: Category,
        window: &DateWindow,
        page: &PageRequest,
    ) -> Result<IndicatorPage, SourceError> {
        if category == self.gated {
            let _ = self.entered.lock().unwrap().send(());
            let _ = self.release.lock().unwrap().recv_timeout(WAIT);
        }
        self.inner.fetch_page(category, window, page)
    }
}

// ── 1. Step topology ─────────────────────────────────────────────────

#[test]
fn bdd_scenario_step_count_depends_on_category() {
    // GIVEN an open session
    let mut session = session_with(Arc::new(FixtureSource::new()));
    session.open(None);

    for category in Category::ALL {
        // WHEN a category is chosen on the first step
        session.select_category(category).unwrap();

        // THEN only combination carries the extra step
        let expected = if category == Category::Combination {
            BASE_STEP_COUNT + 1
        } else {
            BASE_STEP_COUNT
        };
        assert_eq!(session.steps().len(), expected, "{category}");
    }

    // AND the extra step sits between indicators and chart config
    session.select_category(Category::Combination).unwrap();
    let ids: Vec<StepId> = session.steps().iter().map(|s| s.id).collect();
    assert_eq!(ids[1], StepId::SelectIndicators);
    assert_eq!(ids[2], StepId::DateChartType);
    assert_eq!(ids[3], StepId::ChartConfig);
}

// ── 2. Guarded advance ───────────────────────────────────────────────

#[test]
fn bdd_scenario_advance_without_selection_is_blocked() {
    // GIVEN a session on the indicator step with nothing selected
    let backend = Arc::new(FixtureSource::new().with_category(Category::Macro, macro_rows()));
    let mut session = session_with(backend);
    on_indicator_step(&mut session, Category::Macro);
    assert!(!session.can_advance());

    // WHEN the user tries to advance
    let result = session.advance();

    // THEN the guard refuses and the step does not change
    assert!(matches!(
        result,
        Err(WizardError::Guard(GuardFailure::NoIndicators))
    ));
    assert_eq!(session.current_step().id, StepId::SelectIndicators);
    assert!(session.is_open());
}

#[test]
fn bdd_scenario_category_step_requires_a_category() {
    // GIVEN a freshly opened session
    let mut session = session_with(Arc::new(FixtureSource::new()));
    session.open(None);

    // WHEN advancing with no category
    // THEN the guard names the missing category
    assert!(matches!(
        session.advance(),
        Err(WizardError::Guard(GuardFailure::NoCategory))
    ));
    assert_eq!(session.controller().current_index(), 0);
}

// ── 3. Dedup ─────────────────────────────────────────────────────────

#[test]
fn bdd_scenario_double_toggle_keeps_one_entry() {
    // GIVEN a loaded macro catalog
    let backend = Arc::new(FixtureSource::new().with_category(Category::Macro, macro_rows()));
    let mut session = session_with(backend);
    on_indicator_step(&mut session, Category::Macro);
    let key = SelectionKey::plain("CPI");

    // WHEN the same indicator is toggled on twice
    assert_eq!(session.toggle(&key, true).unwrap(), ToggleOutcome::Added);
    assert_eq!(session.toggle(&key, true).unwrap(), ToggleOutcome::Unchanged);

    // THEN exactly one selection carries that key
    let count = session
        .selection()
        .entries()
        .iter()
        .filter(|e| e.key() == key)
        .count();
    assert_eq!(count, 1);
}

// ── 4. Date filter ───────────────────────────────────────────────────

#[test]
fn bdd_scenario_refiltering_a_filtered_series_changes_nothing() {
    // GIVEN a series filtered to 2015..2020
    let IndicatorDescriptor::Flat(gdp) = flat("GDP", "GDP", ChartType::Line, false) else {
        unreachable!();
    };
    let window = DateWindow::new(d(2015, 1, 1), d(2020, 12, 31)).unwrap();
    let once = filter_points(&gdp.points, &window);

    // WHEN the result is filtered again with the same window
    let twice = filter_points(&once, &window);

    // THEN nothing changes and only the in-window point survives
    assert_eq!(once, twice);
    assert_eq!(once, vec![TimeSeriesPoint::new(d(2018, 6, 30), 2.0)]);
    assert_eq!(gdp.points.len(), 3);
}

// ── 5. Combination uniformity ────────────────────────────────────────

#[test]
fn bdd_scenario_combination_step_overwrites_every_selection() {
    // GIVEN a combination session with two indicators pulled from macro
    let backend = Arc::new(FixtureSource::new().with_category(Category::Macro, macro_rows()));
    let mut session = session_with(backend);
    on_indicator_step(&mut session, Category::Combination);
    assert_eq!(session.catalog().items().len(), 3);
    for id in ["CPI", "UNRATE"] {
        session
            .toggle(&SelectionKey::sourced(Category::Macro, id), true)
            .unwrap();
    }

    // WHEN the date/type step is entered
    assert_eq!(
        session.advance().unwrap(),
        StepOutcome::Moved(StepId::DateChartType)
    );

    // THEN the default uniform settings are already applied
    let default_range = DateRangeSpec::custom(d(2000, 1, 1), today()).unwrap();
    for entry in session.selection().entries() {
        assert_eq!(entry.chart_type, ChartType::Bar);
        assert_eq!(entry.date_range, default_range);
    }

    // WHEN bar over 2010..2020 is chosen and the step completed
    let chosen = IndicatorSettings {
        chart_type: ChartType::Bar,
        date_range: DateRangeSpec::custom(d(2010, 1, 1), d(2020, 1, 1)).unwrap(),
    };
    session.set_combination_settings(chosen);
    assert_eq!(
        session.advance().unwrap(),
        StepOutcome::Moved(StepId::ChartConfig)
    );

    // THEN every selection has exactly that type and window
    assert_eq!(session.selection().len(), 2);
    for entry in session.selection().entries() {
        assert_eq!(entry.chart_type, ChartType::Bar);
        assert_eq!(entry.date_range.custom_start(), Some(d(2010, 1, 1)));
        assert_eq!(entry.date_range.custom_end(), Some(d(2020, 1, 1)));
    }

    // AND the generated payload uses the uniform type
    session.advance().unwrap();
    let StepOutcome::Generated(payload) = session.advance().unwrap() else {
        panic!("expected a generated chart");
    };
    assert_eq!(payload.chart_type(), ChartType::Bar);
    assert_eq!(payload.category(), Category::Combination);
}

// ── 6. End to end ────────────────────────────────────────────────────

#[test]
fn bdd_scenario_macro_default_indicator_end_to_end() {
    // GIVEN a macro catalog of three indicators, one flagged default
    let backend = Arc::new(FixtureSource::new().with_category(Category::Macro, macro_rows()));
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("charts.jsonl");
    let mut session = WizardSession::new(
        Collaborators::shared(backend),
        SessionOptions {
            chart_log: Some(log_path.clone()),
            ..options()
        },
    )
    .unwrap();
    let generated: Arc<Mutex<Vec<ChartPayload>>> = Arc::default();
    let sink = Arc::clone(&generated);
    session.on_chart_generated(Box::new(move |p| sink.lock().unwrap().push(p)));

    on_indicator_step(&mut session, Category::Macro);
    let first = &session.catalog().items()[0];
    assert!(first.is_default(), "default indicator sorts first");

    // WHEN the default indicator is selected
    let key = SelectionKey::plain("GDP");
    session.toggle(&key, true).unwrap();

    // THEN its date range runs from the epoch to its latest date
    let entry = session.selection().get(&key).unwrap();
    assert_eq!(entry.date_range.preset_tag(), DatePreset::Custom);
    assert_eq!(entry.date_range.custom_start(), Some(d(2000, 1, 1)));
    assert_eq!(entry.date_range.custom_end(), Some(d(2024, 3, 31)));

    // WHEN advancing through chart config untouched and finishing
    assert_eq!(
        session.advance().unwrap(),
        StepOutcome::Moved(StepId::ChartConfig)
    );
    assert_eq!(session.advance().unwrap(), StepOutcome::Moved(StepId::Preview));
    let preview = session.preview();
    assert!(preview.has_data);
    assert_eq!(preview.indicator_count, 1);
    let outcome = session.advance().unwrap();

    // THEN one payload is produced with the indicator's default type
    let StepOutcome::Generated(payload) = outcome else {
        panic!("expected a generated chart");
    };
    assert_eq!(payload.chart_type(), ChartType::Bar);
    assert_eq!(payload.selected_indicators().len(), 1);
    assert_eq!(payload.position(), ChartPosition::Square);

    // AND the callback saw it, the log holds it, the session is reset
    assert_eq!(generated.lock().unwrap().as_slice(), &[payload.clone()]);
    assert_eq!(ChartLog::new(&log_path).read_all().unwrap(), vec![payload]);
    assert!(!session.is_open());
    assert!(session.selection().is_empty());
    assert_eq!(session.category(), None);
    assert_eq!(session.notices().latest().unwrap().level, NoticeLevel::Info);
}

// ── 7. Stale fetch discard ───────────────────────────────────────────

#[test]
fn bdd_scenario_switching_category_discards_stale_fetch() {
    // GIVEN a backend whose micro fetches hang until released
    let two_categories = || {
        FixtureSource::new()
            .with_category(Category::Micro, vec![flat("M1", "Micro one", ChartType::Line, false)])
            .with_category(
                Category::Options,
                vec![flat("O1", "Options one", ChartType::Line, false)],
            )
    };
    let fixture = Arc::new(two_categories());
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let gated = Arc::new(GatedSource {
        inner: two_categories(),
        gated: Category::Micro,
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    });
    let collaborators = Collaborators {
        source: gated,
        configs: fixture.clone(),
        blocks: fixture,
    };
    let mut session = WizardSession::new(collaborators, options()).unwrap();

    // AND a fetch for micro that is in flight
    session.open(None);
    session.select_category(Category::Micro).unwrap();
    session.advance().unwrap();
    entered_rx.recv_timeout(WAIT).unwrap();
    assert!(session.catalog().is_loading());

    // WHEN the user goes back and switches to options
    session.retreat();
    session.select_category(Category::Options).unwrap();
    session.advance().unwrap();

    // AND the micro fetch resolves afterwards
    release_tx.send(()).unwrap();
    assert!(session.wait_idle(WAIT));

    // THEN the catalog reflects the options request only
    assert_eq!(session.catalog().category(), Some(Category::Options));
    let ids: Vec<String> = session.catalog().items().iter().map(|d| d.key().id).collect();
    assert_eq!(ids, vec!["O1"]);
    assert_eq!(session.catalog().status(), &CatalogStatus::Loaded);
}

// ── Category switch ──────────────────────────────────────────────────

#[test]
fn bdd_scenario_selection_carried_out_of_combination_stays_unique() {
    // GIVEN GDP picked from the macro pool of a combination chart
    let backend = Arc::new(FixtureSource::new().with_category(Category::Macro, macro_rows()));
    let mut session = session_with(backend);
    on_indicator_step(&mut session, Category::Combination);
    session
        .toggle(&SelectionKey::sourced(Category::Macro, "GDP"), true)
        .unwrap();

    // WHEN the user goes back, switches to macro and picks GDP again
    assert_eq!(session.retreat(), Some(StepId::SelectCategory));
    session.select_category(Category::Macro).unwrap();
    assert_eq!(
        session.advance().unwrap(),
        StepOutcome::Moved(StepId::SelectIndicators)
    );
    assert!(session.wait_idle(WAIT));
    let outcome = session.toggle(&SelectionKey::plain("GDP"), true).unwrap();

    // THEN the carried selection already is that indicator
    assert_eq!(outcome, ToggleOutcome::Unchanged);
    let ids: Vec<&str> = session
        .selection()
        .entries()
        .iter()
        .map(|e| e.indicator_id.as_str())
        .collect();
    assert_eq!(ids, vec!["GDP"]);
    assert_eq!(session.selection().entries()[0].source_category, None);

    // AND the generated chart lists it once
    assert_eq!(
        session.advance().unwrap(),
        StepOutcome::Moved(StepId::ChartConfig)
    );
    session.advance().unwrap();
    let StepOutcome::Generated(payload) = session.advance().unwrap() else {
        panic!("expected a generated chart");
    };
    let ids: Vec<&str> = payload
        .selected_indicators()
        .iter()
        .map(|s| s.indicator_id.as_str())
        .collect();
    assert_eq!(ids, vec!["GDP"]);
}

// ── Paging ───────────────────────────────────────────────────────────

#[test]
fn bdd_scenario_fetch_more_appends_pages_in_order() {
    // GIVEN a macro catalog served one row per page
    let backend = Arc::new(FixtureSource::new().with_category(Category::Macro, macro_rows()));
    let mut session = WizardSession::new(
        Collaborators::shared(Arc::clone(&backend)),
        SessionOptions {
            catalog: CatalogOptions {
                page_size: 1,
                ..CatalogOptions::default()
            },
            ..options()
        },
    )
    .unwrap();
    on_indicator_step(&mut session, Category::Macro);
    assert_eq!(session.catalog().items().len(), 1);
    assert!(session.catalog().has_more());

    // WHEN the next page is requested twice before it lands
    assert!(session.fetch_more());
    assert!(!session.fetch_more(), "second request while one is pending");
    assert!(session.wait_idle(WAIT));

    // AND once more after it lands
    assert!(session.fetch_more());
    assert!(session.wait_idle(WAIT));

    // THEN the pages were appended in order and nothing is left
    let ids: Vec<String> = session.catalog().items().iter().map(|d| d.key().id).collect();
    assert_eq!(ids, vec!["CPI", "GDP", "UNRATE"]);
    assert!(!session.catalog().has_more());
    assert!(!session.fetch_more());
    let offsets: Vec<u32> = backend.fetch_calls().iter().map(|(_, p)| p.offset).collect();
    assert_eq!(offsets, vec![0, 1, 2]);
}

// ── Global date filter ───────────────────────────────────────────────

#[test]
fn bdd_scenario_group_apply_slices_every_loaded_series() {
    // GIVEN a macro catalog where two of three rows are selected
    let rows = macro_rows()
        .into_iter()
        .map(|desc| in_group(desc, "Core"))
        .collect();
    let backend = Arc::new(FixtureSource::new().with_category(Category::Macro, rows));
    let mut session = session_with(backend);
    on_indicator_step(&mut session, Category::Macro);
    for id in ["CPI", "GDP"] {
        session.toggle(&SelectionKey::plain(id), true).unwrap();
    }

    // WHEN a 2015..2020 window is applied to the group
    let settings = IndicatorSettings {
        chart_type: ChartType::Line,
        date_range: DateRangeSpec::custom(d(2015, 1, 1), d(2020, 12, 31)).unwrap(),
    };
    let report = session
        .apply_group_config(&GroupKey::Group("Core".into()), settings)
        .unwrap();
    assert!(report.is_complete());

    // THEN every loaded series, selected or not, is cut to that window
    let items = session.catalog().items();
    assert_eq!(items.len(), 3);
    for desc in items {
        let points = &desc.series().unwrap().points;
        assert_eq!(points, &vec![TimeSeriesPoint::new(d(2018, 6, 30), 2.0)]);
    }
}

// ── Failure and retry ────────────────────────────────────────────────

#[test]
fn bdd_scenario_fetch_failure_then_retry_preserves_selection() {
    // GIVEN a loaded catalog with one selection
    let backend = Arc::new(FixtureSource::new().with_category(Category::Macro, macro_rows()));
    let mut session = session_with(Arc::clone(&backend));
    on_indicator_step(&mut session, Category::Macro);
    session.toggle(&SelectionKey::plain("CPI"), true).unwrap();

    // WHEN re-entering the step fails to load
    backend.fail_next_fetches(1);
    session.advance().unwrap();
    session.retreat();
    session.retreat();
    session.advance().unwrap();
    assert!(session.wait_idle(WAIT));

    // THEN the failure is distinct from an empty result and reported
    assert!(matches!(session.catalog().status(), CatalogStatus::Failed(_)));
    assert_eq!(session.notices().latest().unwrap().level, NoticeLevel::Error);
    assert_eq!(session.selection().len(), 1);

    // WHEN retrying
    assert!(session.retry());
    assert!(session.wait_idle(WAIT));

    // THEN the same request succeeds and the selection is untouched
    assert_eq!(session.catalog().status(), &CatalogStatus::Loaded);
    assert_eq!(session.catalog().items().len(), 3);
    assert_eq!(session.selection().len(), 1);
}

// ── Group apply ──────────────────────────────────────────────────────

#[test]
fn bdd_scenario_group_apply_reports_partial_failure() {
    // GIVEN three selected rates indicators, one whose config write fails
    let rows = vec![
        in_group(flat("DGS2", "2Y Treasury", ChartType::Line, false), "Rates"),
        in_group(flat("DGS10", "10Y Treasury", ChartType::Line, false), "Rates"),
        in_group(flat("DGS30", "30Y Treasury", ChartType::Line, false), "Rates"),
    ];
    let backend = Arc::new(FixtureSource::new().with_category(Category::Micro, rows));
    backend.fail_config_for("DGS10");
    let mut session = session_with(Arc::clone(&backend));
    on_indicator_step(&mut session, Category::Micro);
    for id in ["DGS2", "DGS10", "DGS30"] {
        session.toggle(&SelectionKey::plain(id), true).unwrap();
    }

    // WHEN a 5Y area setting is applied to the group
    let settings = IndicatorSettings {
        chart_type: ChartType::Area,
        date_range: DateRangeSpec::preset(DatePreset::FiveYears),
    };
    let report = session
        .apply_group_config(&GroupKey::Group("Rates".into()), settings)
        .unwrap();

    // THEN every write was attempted and only the failure is left behind
    assert_eq!(report.applied.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, SelectionKey::plain("DGS10"));
    let selection = session.selection();
    assert_eq!(selection.get(&SelectionKey::plain("DGS2")).unwrap().settings(), settings);
    assert_eq!(selection.get(&SelectionKey::plain("DGS30")).unwrap().settings(), settings);
    assert_eq!(
        selection.get(&SelectionKey::plain("DGS10")).unwrap().chart_type,
        ChartType::Line
    );
    assert!(backend.stored_config("DGS2").is_some());
    assert_eq!(session.notices().latest().unwrap().level, NoticeLevel::Warning);
}

// ── Cancel ───────────────────────────────────────────────────────────

#[test]
fn bdd_scenario_cancel_resets_everything() {
    // GIVEN a session mid-way with a selection and customization
    let backend = Arc::new(FixtureSource::new().with_category(Category::Macro, macro_rows()));
    let mut session = session_with(backend);
    on_indicator_step(&mut session, Category::Macro);
    session.toggle(&SelectionKey::plain("GDP"), true).unwrap();
    session.customization_mut().set_font_size(20);
    session.set_title(Some("Growth".into()));

    // WHEN the wizard is cancelled
    session.cancel();

    // THEN nothing survives and no chart was produced
    assert!(!session.is_open());
    assert_eq!(session.category(), None);
    assert!(session.selection().is_empty());
    assert_eq!(session.customization(), &CustomizationStore::new());
    assert_eq!(session.title(), None);
    assert_eq!(session.catalog().status(), &CatalogStatus::Idle);
    assert!(matches!(session.advance(), Err(WizardError::NotOpen)));
}

// ── Edit mode ────────────────────────────────────────────────────────

fn existing_chart() -> ChartPayload {
    let mut selection = SelectionStore::new();
    selection
        .toggle(&flat("GDP", "Gross Domestic Product", ChartType::Bar, true), true, today())
        .unwrap();
    let mut customization = CustomizationStore::new();
    customization.set_position(ChartPosition::Inline);
    assemble(AssemblyInput {
        category: Some(Category::Macro),
        selection: &selection,
        customization: &customization,
        combination_type: None,
        title: Some("Output"),
        chart_id: Some(42),
    })
    .unwrap()
}

#[test]
fn bdd_scenario_edit_mode_hydrates_and_saves_customization() {
    // GIVEN an existing chart reopened for editing
    let backend = Arc::new(FixtureSource::new().with_category(Category::Macro, macro_rows()));
    let mut session = session_with(Arc::clone(&backend));
    session.open(Some(existing_chart()));

    // THEN stores and markers are hydrated
    assert_eq!(session.category(), Some(Category::Macro));
    assert_eq!(session.selection().len(), 1);
    assert_eq!(session.customization().position(), ChartPosition::Inline);
    assert_eq!(session.title(), Some("Output"));
    assert!(session.controller().is_completed(1));
    assert!(session.controller().is_completed(2));

    // WHEN leaving the chart config step
    session.advance().unwrap();
    assert!(session.wait_idle(WAIT));
    session.advance().unwrap();
    session.customization_mut().set_font_size(16);
    session.advance().unwrap();

    // THEN the customization was written to the chart's block
    let writes = backend.block_writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].block_id, "42");
    assert_eq!(writes[0].position, ChartPosition::Inline);
    assert!(writes[0].customization_json.contains("\"fontSize\":16"));

    // AND finishing keeps the chart id
    let StepOutcome::Generated(payload) = session.advance().unwrap() else {
        panic!("expected a generated chart");
    };
    assert_eq!(payload.id(), Some(42));
    assert_eq!(payload.title(), "Output");
}

#[test]
fn bdd_scenario_failed_customization_save_does_not_block() {
    // GIVEN an edited chart whose block update fails
    let backend = Arc::new(FixtureSource::new().with_category(Category::Macro, macro_rows()));
    backend.fail_block_updates(true);
    let mut session = session_with(Arc::clone(&backend));
    session.open(Some(existing_chart()));
    session.advance().unwrap();
    session.wait_idle(WAIT);
    session.advance().unwrap();

    // WHEN leaving chart config
    let outcome = session.advance().unwrap();

    // THEN navigation proceeds and a warning is raised
    assert_eq!(outcome, StepOutcome::Moved(StepId::Preview));
    assert_eq!(session.notices().latest().unwrap().level, NoticeLevel::Warning);
}
