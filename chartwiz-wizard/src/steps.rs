//! Step topology.
//!
//! The step list is a pure function of the category. The controller only
//! holds an index into whichever list applies.

use chartwiz_core::domain::Category;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    SelectCategory,
    SelectIndicators,
    /// Combination only: one chart type and date range for every selection.
    DateChartType,
    ChartConfig,
    Preview,
}

impl StepId {
    pub fn as_str(self) -> &'static str {
        match self {
            StepId::SelectCategory => "select-category",
            StepId::SelectIndicators => "select-indicators",
            StepId::DateChartType => "date-chart-type",
            StepId::ChartConfig => "chart-config",
            StepId::Preview => "preview",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepDescriptor {
    pub id: StepId,
    pub title: &'static str,
}

const fn step(id: StepId, title: &'static str) -> StepDescriptor {
    StepDescriptor { id, title }
}

pub const BASE_STEP_COUNT: usize = 4;

static BASE_STEPS: [StepDescriptor; BASE_STEP_COUNT] = [
    step(StepId::SelectCategory, "Select category"),
    step(StepId::SelectIndicators, "Indicators"),
    step(StepId::ChartConfig, "Chart config"),
    step(StepId::Preview, "Preview"),
];

static COMBINATION_STEPS: [StepDescriptor; BASE_STEP_COUNT + 1] = [
    step(StepId::SelectCategory, "Select category"),
    step(StepId::SelectIndicators, "Indicators"),
    step(StepId::DateChartType, "Date & chart type"),
    step(StepId::ChartConfig, "Chart config"),
    step(StepId::Preview, "Preview"),
];

/// Steps for a category. With no category chosen yet the base list applies.
pub fn steps_for(category: Option<Category>) -> &'static [StepDescriptor] {
    match category {
        Some(c) if c.is_combination() => &COMBINATION_STEPS,
        _ => &BASE_STEPS,
    }
}
