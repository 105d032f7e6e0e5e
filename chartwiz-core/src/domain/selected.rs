use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::chart::ChartType;
use super::date_range::DateRangeSpec;
use super::indicator::{IndicatorDescriptor, IndicatorKind, SelectionKey};

/// Per-indicator visual overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorVisualConfig {
    pub color: String,
    pub opacity: f64,
    pub line_width: f64,
    pub show_data_labels: bool,
    pub show_legend: bool,
}

impl IndicatorVisualConfig {
    /// Defaults for a new selection. The hue is derived from the key so the
    /// same indicator always gets the same colour.
    pub fn for_key(key: &SelectionKey) -> Self {
        let hash = blake3::hash(key.to_string().as_bytes());
        let bytes = hash.as_bytes();
        let hue = u16::from_le_bytes([bytes[0], bytes[1]]) % 360;
        Self {
            color: format!("hsl({hue}, 70%, 50%)"),
            opacity: 0.8,
            line_width: 2.0,
            show_data_labels: false,
            show_legend: true,
        }
    }
}

/// Snapshot of the descriptor a selection was made from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceIndicator {
    pub kind: IndicatorKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<f64>,
}

impl SourceIndicator {
    pub fn from_descriptor(descriptor: &IndicatorDescriptor) -> Self {
        let (members, values) = match descriptor {
            IndicatorDescriptor::Grouped(g) => (g.members.clone(), g.values.clone()),
            _ => (Vec::new(), Vec::new()),
        };
        Self {
            kind: descriptor.kind(),
            name: descriptor.display_name().to_string(),
            group: descriptor.group_name().map(String::from),
            category: descriptor.source_category(),
            latest_date: descriptor.latest_date(),
            members,
            values,
        }
    }
}

/// Chart type and date range applied to one selection (or a whole group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSettings {
    pub chart_type: ChartType,
    pub date_range: DateRangeSpec,
}

/// An indicator the analyst has chosen, with its chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedIndicator {
    pub indicator_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_category: Option<Category>,
    pub chart_type: ChartType,
    pub date_range: DateRangeSpec,
    pub is_selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<IndicatorVisualConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub source_indicator: SourceIndicator,
}

impl SelectedIndicator {
    /// Build a selection with defaults for the descriptor's shape: flat and
    /// combined series use their own default chart type, groups use line.
    /// The date range runs from the epoch to the indicator's latest date
    /// (or `today` for groups, which carry no date).
    pub fn from_descriptor(descriptor: &IndicatorDescriptor, today: NaiveDate) -> Self {
        let key = descriptor.key();
        let (chart_type, latest, value) = match descriptor {
            IndicatorDescriptor::Flat(f) => (f.default_chart_type, f.latest_date, Some(f.latest_value)),
            IndicatorDescriptor::Combined(c) => (
                c.indicator.default_chart_type,
                c.indicator.latest_date,
                Some(c.indicator.latest_value),
            ),
            IndicatorDescriptor::Grouped(g) => {
                (ChartType::Line, today, Some(g.values.first().copied().unwrap_or(0.0)))
            }
        };
        Self {
            indicator_id: key.id.clone(),
            source_category: key.source,
            chart_type,
            date_range: DateRangeSpec::selection_default(latest),
            is_selected: true,
            config: Some(IndicatorVisualConfig::for_key(&key)),
            value,
            source_indicator: SourceIndicator::from_descriptor(descriptor),
        }
    }

    pub fn key(&self) -> SelectionKey {
        SelectionKey {
            source: self.source_category,
            group: self.source_indicator.kind == IndicatorKind::Grouped,
            id: self.indicator_id.clone(),
        }
    }

    pub fn settings(&self) -> IndicatorSettings {
        IndicatorSettings {
            chart_type: self.chart_type,
            date_range: self.date_range,
        }
    }

    pub fn apply(&mut self, settings: IndicatorSettings) {
        self.chart_type = settings.chart_type;
        self.date_range = settings.date_range;
    }

    pub fn display_name(&self) -> &str {
        &self.source_indicator.name
    }
}
