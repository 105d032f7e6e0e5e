//! The finished chart artifact handed to the report editor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::Category;
use super::chart::{ChartPosition, ChartType};
use super::customization::ChartCustomization;
use super::selected::SelectedIndicator;

pub const DEFAULT_CHART_TITLE: &str = "New Chart";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadStatus {
    #[default]
    Generated,
}

/// Top-level chart config as the charting surface reads it: the
/// representative type, title and position, with the customization
/// flattened alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub title: String,
    pub position: ChartPosition,
    #[serde(flatten)]
    pub customization: ChartCustomization,
}

/// Immutable once built. Fields are private; the only constructor is the
/// assembler, and deserialization for hydration and log inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    title: String,
    category_id: u32,
    category_name: Category,
    selected_indicators: Vec<SelectedIndicator>,
    chart_config: ChartConfig,
    chart_customization: ChartCustomization,
    chart_position: ChartPosition,
    #[serde(default)]
    indicator_names: BTreeMap<String, String>,
    #[serde(default)]
    order_index: u32,
    generated_at: DateTime<Utc>,
    #[serde(default)]
    status: PayloadStatus,
}

/// Parts the assembler validated and resolved.
pub(crate) struct PayloadParts {
    pub id: Option<i64>,
    pub title: String,
    pub category: Category,
    pub chart_type: ChartType,
    pub selected: Vec<SelectedIndicator>,
    pub customization: ChartCustomization,
    pub position: ChartPosition,
    pub generated_at: DateTime<Utc>,
}

impl ChartPayload {
    pub(crate) fn from_parts(parts: PayloadParts) -> Self {
        let indicator_names = parts
            .selected
            .iter()
            .map(|s| (s.key().to_string(), s.display_name().to_string()))
            .collect();
        Self {
            id: parts.id,
            title: parts.title.clone(),
            category_id: parts.category.backend_id(),
            category_name: parts.category,
            chart_config: ChartConfig {
                chart_type: parts.chart_type,
                title: parts.title,
                position: parts.position,
                customization: parts.customization.clone(),
            },
            selected_indicators: parts.selected,
            chart_customization: parts.customization,
            chart_position: parts.position,
            indicator_names,
            order_index: 0,
            generated_at: parts.generated_at,
            status: PayloadStatus::Generated,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category_id(&self) -> u32 {
        self.category_id
    }

    pub fn category(&self) -> Category {
        self.category_name
    }

    pub fn selected_indicators(&self) -> &[SelectedIndicator] {
        &self.selected_indicators
    }

    pub fn chart_config(&self) -> &ChartConfig {
        &self.chart_config
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_config.chart_type
    }

    pub fn customization(&self) -> &ChartCustomization {
        &self.chart_customization
    }

    pub fn position(&self) -> ChartPosition {
        self.chart_position
    }

    pub fn indicator_names(&self) -> &BTreeMap<String, String> {
        &self.indicator_names
    }

    pub fn order_index(&self) -> u32 {
        self.order_index
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn status(&self) -> PayloadStatus {
        self.status
    }
}
