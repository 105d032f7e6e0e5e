//! Application state: single-owner, main-thread only.
//!
//! The wizard session owns every store; this struct only adds what the
//! terminal needs on top (cursors, overlays, the status line).

use std::path::PathBuf;
use std::time::Instant;

use chartwiz_core::customize::IconFlag;
use chartwiz_core::domain::{
    AspectRatio, Category, ChartPayload, ChartPosition, ChartType, DatePreset, DateRangeSpec,
    FontWeight, IndicatorDescriptor, Palette, ThemeMode,
};
use chartwiz_core::selection::GroupKey;
use chartwiz_core::SortKey;
use chartwiz_wizard::{StepId, StepOutcome, WizardError, WizardSession};

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    Help,
    Notices,
    /// Typing a search term for the indicator list.
    Search,
    /// Typing the chart title.
    Title,
}

/// Rows of the date & chart type step.
pub const SETTINGS_ROWS: usize = 2;

/// Presets reachable by cycling. Custom ranges come from selection
/// defaults or edited charts, never from the cycle.
const PRESET_CYCLE: [DatePreset; 5] = [
    DatePreset::OneYear,
    DatePreset::TwoYears,
    DatePreset::FiveYears,
    DatePreset::TenYears,
    DatePreset::Max,
];

pub fn cycle_preset(current: DatePreset, direction: i32) -> DatePreset {
    let len = PRESET_CYCLE.len() as i32;
    match PRESET_CYCLE.iter().position(|p| *p == current) {
        Some(i) => PRESET_CYCLE[(i as i32 + direction).rem_euclid(len) as usize],
        None if direction < 0 => DatePreset::Max,
        None => DatePreset::OneYear,
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, direction: i32) -> T {
    let len = all.len() as i32;
    let idx = all.iter().position(|v| *v == current).unwrap_or(0) as i32;
    all[(idx + direction).rem_euclid(len) as usize]
}

/// Editable rows of the chart config step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Position,
    Palette,
    Theme,
    FontSize,
    FontWeight,
    TitleSize,
    LabelSize,
    Width,
    Height,
    AspectRatio,
    Legend,
    Grid,
    Axes,
    DataLabels,
}

impl ConfigField {
    pub const ALL: [ConfigField; 14] = [
        ConfigField::Position,
        ConfigField::Palette,
        ConfigField::Theme,
        ConfigField::FontSize,
        ConfigField::FontWeight,
        ConfigField::TitleSize,
        ConfigField::LabelSize,
        ConfigField::Width,
        ConfigField::Height,
        ConfigField::AspectRatio,
        ConfigField::Legend,
        ConfigField::Grid,
        ConfigField::Axes,
        ConfigField::DataLabels,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConfigField::Position => "Position",
            ConfigField::Palette => "Palette",
            ConfigField::Theme => "Theme",
            ConfigField::FontSize => "Font size",
            ConfigField::FontWeight => "Font weight",
            ConfigField::TitleSize => "Title size",
            ConfigField::LabelSize => "Label size",
            ConfigField::Width => "Width",
            ConfigField::Height => "Height",
            ConfigField::AspectRatio => "Aspect ratio",
            ConfigField::Legend => "Legend",
            ConfigField::Grid => "Grid",
            ConfigField::Axes => "Axes",
            ConfigField::DataLabels => "Data labels",
        }
    }

    pub fn flag(self) -> Option<IconFlag> {
        match self {
            ConfigField::Legend => Some(IconFlag::Legend),
            ConfigField::Grid => Some(IconFlag::Grid),
            ConfigField::Axes => Some(IconFlag::Axes),
            ConfigField::DataLabels => Some(IconFlag::DataLabels),
            _ => None,
        }
    }
}

/// Top-level application state.
pub struct AppState {
    pub session: WizardSession,
    pub running: bool,
    pub overlay: Overlay,

    pub category_cursor: usize,
    pub indicator_cursor: usize,
    pub settings_cursor: usize,
    pub config_cursor: usize,
    pub notice_scroll: usize,
    pub text_input: String,

    pub status_message: Option<(String, StatusLevel)>,
    /// Charts generated since start, oldest first.
    pub generated: Vec<ChartPayload>,
    pub last_category: Option<Category>,
    pub state_path: PathBuf,
}

impl AppState {
    /// Wrap `session` and open it fresh.
    pub fn new(mut session: WizardSession, state_path: PathBuf) -> Self {
        session.open(None);
        Self {
            session,
            running: true,
            overlay: Overlay::None,
            category_cursor: 0,
            indicator_cursor: 0,
            settings_cursor: 0,
            config_cursor: 0,
            notice_scroll: 0,
            text_input: String::new(),
            status_message: None,
            generated: Vec::new(),
            last_category: None,
            state_path,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }

    /// Guards are a nudge, everything else is an error.
    pub fn report(&mut self, err: WizardError) {
        match err {
            WizardError::Guard(g) => self.set_warning(g.to_string()),
            other => self.set_error(other.to_string()),
        }
        if !self.session.is_open() {
            self.restart();
        }
    }

    /// Reopen a fresh wizard, keeping the category cursor where it was.
    pub fn restart(&mut self) {
        self.session.open(None);
        self.indicator_cursor = 0;
        self.settings_cursor = 0;
        self.config_cursor = 0;
        self.overlay = Overlay::None;
        self.text_input.clear();
    }

    /// Apply settled search input and drain finished fetches.
    pub fn tick(&mut self, now: Instant) {
        if self.session.tick(now) {
            self.indicator_cursor = 0;
        }
        self.session.poll();
    }

    pub fn current_step(&self) -> StepId {
        self.session.current_step().id
    }

    // ── Navigation ──────────────────────────────────────────────────────

    pub fn advance(&mut self) {
        match self.session.advance() {
            Ok(StepOutcome::Moved(step)) => {
                self.indicator_cursor = 0;
                self.settings_cursor = 0;
                self.config_cursor = 0;
                let title = self.session.current_step().title;
                self.set_status(format!("{title} ({step})"));
            }
            Ok(StepOutcome::Generated(payload)) => {
                self.set_status(format!(
                    "Chart '{}' generated with {} indicator(s)",
                    payload.title(),
                    payload.selected_indicators().len()
                ));
                self.generated.push(payload);
                self.restart();
            }
            Err(e) => self.report(e),
        }
    }

    pub fn retreat(&mut self) {
        if self.session.retreat().is_some() {
            self.indicator_cursor = 0;
        }
    }

    pub fn cancel(&mut self) {
        self.session.cancel();
        self.restart();
        self.set_warning("Wizard cancelled; nothing was generated");
    }

    // ── Category step ───────────────────────────────────────────────────

    pub fn move_category_cursor(&mut self, delta: i32) {
        let max = Category::ALL.len() as i32 - 1;
        self.category_cursor = (self.category_cursor as i32 + delta).clamp(0, max) as usize;
    }

    pub fn choose_category(&mut self) {
        let category = Category::ALL[self.category_cursor.min(Category::ALL.len() - 1)];
        match self.session.select_category(category) {
            Ok(()) => {
                self.last_category = Some(category);
                self.set_status(format!(
                    "{} selected ({} steps)",
                    category.title(),
                    self.session.steps().len()
                ));
            }
            Err(e) => self.report(e),
        }
    }

    // ── Indicator step ──────────────────────────────────────────────────

    pub fn visible_count(&self) -> usize {
        self.session.visible_indicators().len()
    }

    pub fn move_indicator_cursor(&mut self, delta: i32) {
        let count = self.visible_count();
        if count == 0 {
            self.indicator_cursor = 0;
            return;
        }
        let max = count as i32 - 1;
        self.indicator_cursor = (self.indicator_cursor as i32 + delta).clamp(0, max) as usize;
    }

    /// Row under the cursor.
    pub fn highlighted(&self) -> Option<IndicatorDescriptor> {
        self.session
            .visible_indicators()
            .get(self.indicator_cursor)
            .map(|d| (*d).clone())
    }

    pub fn toggle_highlighted(&mut self) {
        let Some(desc) = self.highlighted() else {
            return;
        };
        let key = desc.key();
        let selected = !self.session.selection().contains(&key);
        if let Err(e) = self.session.toggle(&key, selected) {
            self.report(e);
        }
    }

    /// Step the highlighted selection's chart type or preset. Unselected rows
    /// are left alone.
    pub fn adjust_highlighted(&mut self, chart_type: bool, direction: i32) {
        let Some(desc) = self.highlighted() else {
            return;
        };
        let key = desc.key();
        let Some(entry) = self.session.selection().get(&key) else {
            self.set_warning(format!("{} is not selected", desc.display_name()));
            return;
        };
        let mut settings = entry.settings();
        if chart_type {
            settings.chart_type = cycle(&ChartType::ALL, settings.chart_type, direction);
        } else {
            let preset = cycle_preset(settings.date_range.preset_tag(), direction);
            settings.date_range = DateRangeSpec::preset(preset);
        }
        if let Err(e) = self.session.update_indicator_config(&key, settings) {
            self.report(e);
        }
    }

    /// Copy the highlighted selection's settings to its whole group.
    pub fn apply_to_group(&mut self) {
        let Some(desc) = self.highlighted() else {
            return;
        };
        let group = match (desc.group_name(), desc.source_category()) {
            (Some(name), _) => GroupKey::Group(name.to_string()),
            (None, Some(category)) => GroupKey::Category(category),
            (None, None) => {
                self.set_warning(format!("{} has no group", desc.display_name()));
                return;
            }
        };
        let Some(settings) = self.session.selection().get(&desc.key()).map(|e| e.settings())
        else {
            self.set_warning(format!("{} is not selected", desc.display_name()));
            return;
        };
        match self.session.apply_group_config(&group, settings) {
            Ok(report) if report.is_complete() => {
                self.set_status(format!("Applied to {} indicator(s)", report.applied.len()));
            }
            Ok(report) => self.set_warning(format!(
                "Applied to {}, {} failed",
                report.applied.len(),
                report.failed.len()
            )),
            Err(e) => self.report(e),
        }
    }

    pub fn toggle_sort(&mut self) {
        let next = match self.session.query().sort {
            SortKey::Name => SortKey::Date,
            SortKey::Date => SortKey::Name,
        };
        self.session.set_sort(next);
        self.indicator_cursor = 0;
    }

    pub fn fetch_more(&mut self) {
        if self.session.fetch_more() {
            self.set_status("Loading more indicators...");
        } else {
            self.set_warning("No more pages");
        }
    }

    pub fn retry(&mut self) {
        if self.session.retry() {
            self.set_status("Retrying...");
        }
    }

    // ── Date & chart type step ──────────────────────────────────────────

    pub fn adjust_combination(&mut self, direction: i32) {
        let mut settings = self.session.combination_settings();
        if self.settings_cursor == 0 {
            settings.chart_type = cycle(&ChartType::ALL, settings.chart_type, direction);
        } else {
            let preset = cycle_preset(settings.date_range.preset_tag(), direction);
            settings.date_range = DateRangeSpec::preset(preset);
        }
        self.session.set_combination_settings(settings);
    }

    // ── Chart config step ───────────────────────────────────────────────

    pub fn config_field(&self) -> ConfigField {
        ConfigField::ALL[self.config_cursor.min(ConfigField::ALL.len() - 1)]
    }

    pub fn adjust_config(&mut self, direction: i32) {
        let field = self.config_field();
        let store = self.session.customization_mut();
        let c = store.customization().clone();
        let step = |v: u32, by: i32| (v as i64 + (by * direction) as i64).max(0) as u32;
        match field {
            ConfigField::Position => {
                store.set_position(cycle(&ChartPosition::ALL, store.position(), direction));
            }
            ConfigField::Palette => {
                store.set_palette(cycle(Palette::ALL, c.theme.palette, direction));
            }
            ConfigField::Theme => {
                store.set_theme_mode(cycle(ThemeMode::ALL, c.theme.mode, direction));
            }
            ConfigField::FontSize => store.set_font_size(step(c.typography.font_size, 1)),
            ConfigField::FontWeight => {
                store.set_font_weight(cycle(FontWeight::ALL, c.typography.font_weight, direction));
            }
            ConfigField::TitleSize => store.set_title_size(step(c.typography.title_size, 1)),
            ConfigField::LabelSize => store.set_label_size(step(c.typography.label_size, 1)),
            ConfigField::Width => store.set_width(step(c.size.width, 50)),
            ConfigField::Height => store.set_height(step(c.size.height, 50)),
            ConfigField::AspectRatio => {
                store.set_aspect_ratio(cycle(AspectRatio::ALL, c.size.aspect_ratio, direction));
            }
            ConfigField::Legend
            | ConfigField::Grid
            | ConfigField::Axes
            | ConfigField::DataLabels => {
                if let Some(flag) = field.flag() {
                    store.toggle_flag(flag);
                }
            }
        }
    }

    pub fn commit_title(&mut self) {
        let title = self.text_input.trim().to_string();
        self.session
            .set_title(if title.is_empty() { None } else { Some(title) });
        self.text_input.clear();
        self.overlay = Overlay::None;
    }
}
