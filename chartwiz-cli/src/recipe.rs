//! Non-interactive wizard runs described by a TOML recipe.
//!
//! ```toml
//! category = "macro"
//! title = "Prices and growth"
//!
//! [[indicators]]
//! id = "CPI"
//! chart_type = "bar"
//! date_range = { preset = "5Y" }
//!
//! [[groups]]
//! name = "Labor"
//! chart_type = "line"
//!
//! [customization]
//! position = "tight"
//! palette = "pastel"
//! font_size = 16
//! grid = false
//! ```
//!
//! Combination recipes give each indicator's `source` category and may set a
//! `[combination]` table that applies to every selection. A grouped row is
//! selected by its name with `group = true`.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use chartwiz_core::customize::IconFlag;
use chartwiz_core::domain::{
    AspectRatio, Category, ChartPayload, ChartPosition, ChartType, DateRangeSpec, FontWeight,
    IndicatorSettings, Palette, SelectionKey, ThemeMode,
};
use chartwiz_core::selection::GroupKey;
use chartwiz_core::CustomizationStore;
use chartwiz_wizard::{StepId, StepOutcome, WizardSession};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SettingsPatch {
    #[serde(default)]
    pub chart_type: Option<ChartType>,
    #[serde(default)]
    pub date_range: Option<DateRangeSpec>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.chart_type.is_none() && self.date_range.is_none()
    }

    pub fn apply(&self, base: IndicatorSettings) -> IndicatorSettings {
        IndicatorSettings {
            chart_type: self.chart_type.unwrap_or(base.chart_type),
            date_range: self.date_range.unwrap_or(base.date_range),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndicatorStep {
    pub id: String,
    /// Source category of a combination pool entry.
    #[serde(default)]
    pub source: Option<Category>,
    /// `id` names a grouped row rather than a flat indicator.
    #[serde(default)]
    pub group: bool,
    #[serde(default)]
    pub chart_type: Option<ChartType>,
    #[serde(default)]
    pub date_range: Option<DateRangeSpec>,
}

impl IndicatorStep {
    pub fn key(&self) -> SelectionKey {
        match (self.source, self.group) {
            (Some(source), _) => SelectionKey::sourced(source, &self.id),
            (None, true) => SelectionKey::group(&self.id),
            (None, false) => SelectionKey::plain(&self.id),
        }
    }

    fn patch(&self) -> SettingsPatch {
        SettingsPatch {
            chart_type: self.chart_type,
            date_range: self.date_range,
        }
    }
}

/// Settings applied to every selected member of a group. Exactly one of
/// `name` or `category` scopes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupStep {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub chart_type: Option<ChartType>,
    #[serde(default)]
    pub date_range: Option<DateRangeSpec>,
}

impl GroupStep {
    pub fn key(&self) -> Result<GroupKey> {
        match (&self.name, self.category) {
            (Some(name), None) => Ok(GroupKey::Group(name.clone())),
            (None, Some(category)) => Ok(GroupKey::Category(category)),
            _ => bail!("a [[groups]] entry needs exactly one of `name` or `category`"),
        }
    }

    fn patch(&self) -> SettingsPatch {
        SettingsPatch {
            chart_type: self.chart_type,
            date_range: self.date_range,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CustomizationPatch {
    pub position: Option<ChartPosition>,
    pub palette: Option<Palette>,
    pub theme: Option<ThemeMode>,
    pub font_size: Option<u32>,
    pub font_weight: Option<FontWeight>,
    pub title_size: Option<u32>,
    pub label_size: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub aspect_ratio: Option<AspectRatio>,
    pub legend: Option<bool>,
    pub grid: Option<bool>,
    pub axes: Option<bool>,
    pub data_labels: Option<bool>,
}

impl CustomizationPatch {
    pub fn apply(&self, store: &mut CustomizationStore) {
        if let Some(position) = self.position {
            store.set_position(position);
        }
        if let Some(palette) = self.palette {
            store.set_palette(palette);
        }
        if let Some(mode) = self.theme {
            store.set_theme_mode(mode);
        }
        if let Some(size) = self.font_size {
            store.set_font_size(size);
        }
        if let Some(weight) = self.font_weight {
            store.set_font_weight(weight);
        }
        if let Some(size) = self.title_size {
            store.set_title_size(size);
        }
        if let Some(size) = self.label_size {
            store.set_label_size(size);
        }
        if let Some(width) = self.width {
            store.set_width(width);
        }
        if let Some(height) = self.height {
            store.set_height(height);
        }
        if let Some(ratio) = self.aspect_ratio {
            store.set_aspect_ratio(ratio);
        }
        for (flag, value) in [
            (IconFlag::Legend, self.legend),
            (IconFlag::Grid, self.grid),
            (IconFlag::Axes, self.axes),
            (IconFlag::DataLabels, self.data_labels),
        ] {
            if let Some(on) = value {
                store.set_flag(flag, on);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Recipe {
    pub category: Category,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub indicators: Vec<IndicatorStep>,
    #[serde(default)]
    pub groups: Vec<GroupStep>,
    #[serde(default)]
    pub combination: Option<SettingsPatch>,
    #[serde(default)]
    pub customization: CustomizationPatch,
}

impl Recipe {
    pub fn from_toml(content: &str) -> Result<Self> {
        let recipe: Recipe = toml::from_str(content).context("parsing recipe")?;
        if recipe.combination.is_some() && !recipe.category.is_combination() {
            bail!("[combination] only applies to the combination category");
        }
        for group in &recipe.groups {
            group.key()?;
        }
        Ok(recipe)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading recipe {}", path.display()))?;
        Self::from_toml(&content)
    }
}

/// Wait for the in-flight fetch and surface its failure.
fn settle(session: &mut WizardSession, timeout: Duration) -> Result<()> {
    if !session.wait_idle(timeout) {
        bail!("timed out after {}s waiting for indicators", timeout.as_secs());
    }
    if let Some(err) = session.catalog().error() {
        bail!("loading indicators failed: {err}");
    }
    Ok(())
}

/// Page through the catalog until `key` is loaded.
fn ensure_loaded(session: &mut WizardSession, key: &SelectionKey, timeout: Duration) -> Result<()> {
    while session.catalog().find(key).is_none() {
        if !session.fetch_more() {
            bail!("indicator '{key}' is not available in this category");
        }
        settle(session, timeout)?;
    }
    Ok(())
}

/// Run the wizard up to (and onto) the preview step.
pub fn drive_to_preview(
    session: &mut WizardSession,
    recipe: &Recipe,
    timeout: Duration,
) -> Result<()> {
    session.open(None);
    session.select_category(recipe.category)?;
    session.advance()?;
    settle(session, timeout)?;

    for step in &recipe.indicators {
        let key = step.key();
        ensure_loaded(session, &key, timeout)?;
        session.toggle(&key, true)?;
        let patch = step.patch();
        if !patch.is_empty() {
            let current = session
                .selection()
                .get(&key)
                .map(|s| s.settings())
                .with_context(|| format!("'{key}' was not selected"))?;
            session.update_indicator_config(&key, patch.apply(current))?;
        }
        info!(%key, "indicator selected");
    }

    for group in &recipe.groups {
        let group_key = group.key()?;
        let members = session.selection().members_of(&group_key);
        let Some(base) = members
            .first()
            .and_then(|key| session.selection().get(key))
            .map(|s| s.settings())
        else {
            bail!("no selected indicator belongs to group {group_key:?}");
        };
        let report = session.apply_group_config(&group_key, group.patch().apply(base))?;
        if !report.is_complete() {
            warn!(
                group = ?group_key,
                failed = report.failed.len(),
                applied = report.applied.len(),
                "group settings partially applied"
            );
        }
    }

    if let Some(patch) = &recipe.combination {
        let settings = patch.apply(session.combination_settings());
        session.set_combination_settings(settings);
    }

    while session.current_step().id != StepId::ChartConfig {
        if let StepOutcome::Generated(_) = session.advance()? {
            bail!("wizard finished before the chart config step");
        }
    }
    recipe.customization.apply(session.customization_mut());
    session.set_title(recipe.title.clone());
    session.advance()?;
    Ok(())
}

/// Run the whole wizard and return the generated payload.
pub fn build(session: &mut WizardSession, recipe: &Recipe, timeout: Duration) -> Result<ChartPayload> {
    drive_to_preview(session, recipe, timeout)?;
    match session.advance()? {
        StepOutcome::Generated(payload) => Ok(payload),
        StepOutcome::Moved(step) => bail!("wizard did not finish (stopped at '{step}')"),
    }
}
