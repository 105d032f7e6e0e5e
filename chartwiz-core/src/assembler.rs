//! Folds the wizard's stores into the final [`ChartPayload`].

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::domain::payload::PayloadParts;
use crate::domain::{Category, ChartPayload, ChartType, SelectedIndicator, DEFAULT_CHART_TITLE};
use crate::customize::CustomizationStore;
use crate::selection::SelectionStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("no category selected")]
    MissingCategory,

    #[error("no indicators selected")]
    EmptySelection,

    #[error("combination chart has no uniform chart type")]
    MissingCombinationType,
}

/// Everything the assembler reads.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub category: Option<Category>,
    pub selection: &'a SelectionStore,
    pub customization: &'a CustomizationStore,
    /// Uniform type chosen in the combination step.
    pub combination_type: Option<ChartType>,
    pub title: Option<&'a str>,
    /// Id of the chart being edited, if any.
    pub chart_id: Option<i64>,
}

/// The single chart type for the payload's top-level config.
pub fn representative_chart_type(
    category: Category,
    selected: &[SelectedIndicator],
    combination_type: Option<ChartType>,
) -> Result<ChartType, AssemblyError> {
    if category.is_combination() {
        return combination_type.ok_or(AssemblyError::MissingCombinationType);
    }
    selected
        .first()
        .map(|s| s.chart_type)
        .ok_or(AssemblyError::EmptySelection)
}

pub fn assemble(input: AssemblyInput<'_>) -> Result<ChartPayload, AssemblyError> {
    assemble_at(input, Utc::now())
}

/// [`assemble`] with an explicit timestamp. Apart from `generated_at` the
/// output depends only on the input.
pub fn assemble_at(
    input: AssemblyInput<'_>,
    generated_at: DateTime<Utc>,
) -> Result<ChartPayload, AssemblyError> {
    let category = input.category.ok_or(AssemblyError::MissingCategory)?;
    let selected = input.selection.entries().to_vec();
    if selected.is_empty() {
        return Err(AssemblyError::EmptySelection);
    }
    let chart_type = representative_chart_type(category, &selected, input.combination_type)?;
    let title = input
        .title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_CHART_TITLE)
        .to_string();

    let payload = ChartPayload::from_parts(PayloadParts {
        id: input.chart_id,
        title,
        category,
        chart_type,
        selected,
        customization: input.customization.snapshot(),
        position: input.customization.position(),
        generated_at,
    });
    info!(
        category = %category,
        chart_type = %chart_type,
        indicators = payload.selected_indicators().len(),
        "chart assembled"
    );
    Ok(payload)
}
