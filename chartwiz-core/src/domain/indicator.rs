//! Indicator descriptors returned by the catalog.
//!
//! Three shapes share one tagged union: flat series, named groups, and flat
//! series tagged with the category they were pulled from for a combination
//! chart. Selection and config logic dispatch on the variant.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::chart::ChartType;

/// One observation of an indicator series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_score: Option<f64>,
}

impl TimeSeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value,
            normalized_value: None,
            z_score: None,
        }
    }
}

/// A named time-series data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatIndicator {
    pub indicator_id: String,
    pub name: String,
    pub latest_date: NaiveDate,
    pub latest_value: f64,
    #[serde(default)]
    pub default_chart_type: ChartType,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_frequency: Option<String>,
    #[serde(default)]
    pub points: Vec<TimeSeriesPoint>,
}

/// A named sub-group of indicators. The group itself is the selection unit;
/// it carries aggregate values but no series of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

/// A flat indicator pulled into a combination pool, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedIndicator {
    pub source_category: Category,
    pub indicator: FlatIndicator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Flat,
    Grouped,
    Combined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IndicatorDescriptor {
    Flat(FlatIndicator),
    Grouped(IndicatorGroup),
    Combined(CombinedIndicator),
}

impl IndicatorDescriptor {
    pub fn kind(&self) -> IndicatorKind {
        match self {
            IndicatorDescriptor::Flat(_) => IndicatorKind::Flat,
            IndicatorDescriptor::Grouped(_) => IndicatorKind::Grouped,
            IndicatorDescriptor::Combined(_) => IndicatorKind::Combined,
        }
    }

    /// Identity used for dedup in the selection store.
    pub fn key(&self) -> SelectionKey {
        match self {
            IndicatorDescriptor::Flat(f) => SelectionKey::plain(&f.indicator_id),
            IndicatorDescriptor::Grouped(g) => SelectionKey::group(&g.name),
            IndicatorDescriptor::Combined(c) => {
                SelectionKey::sourced(c.source_category, &c.indicator.indicator_id)
            }
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            IndicatorDescriptor::Flat(f) => &f.name,
            IndicatorDescriptor::Grouped(g) => &g.name,
            IndicatorDescriptor::Combined(c) => &c.indicator.name,
        }
    }

    /// The underlying series, if this descriptor has one.
    pub fn series(&self) -> Option<&FlatIndicator> {
        match self {
            IndicatorDescriptor::Flat(f) => Some(f),
            IndicatorDescriptor::Combined(c) => Some(&c.indicator),
            IndicatorDescriptor::Grouped(_) => None,
        }
    }

    pub fn series_mut(&mut self) -> Option<&mut FlatIndicator> {
        match self {
            IndicatorDescriptor::Flat(f) => Some(f),
            IndicatorDescriptor::Combined(c) => Some(&mut c.indicator),
            IndicatorDescriptor::Grouped(_) => None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.series().is_some_and(|f| f.is_default)
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.series().map(|f| f.latest_date)
    }

    pub fn source_category(&self) -> Option<Category> {
        match self {
            IndicatorDescriptor::Combined(c) => Some(c.source_category),
            _ => None,
        }
    }

    /// Named sub-group the descriptor belongs to (groups belong to themselves).
    pub fn group_name(&self) -> Option<&str> {
        match self {
            IndicatorDescriptor::Grouped(g) => Some(&g.name),
            _ => self.series().and_then(|f| f.subcategory.as_deref()),
        }
    }
}

/// Dedup key of a selection: the indicator id or group name, qualified by
/// source category for combination pools. Groups live in their own key
/// space, so a group named like a flat indicator's id never collides with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SelectionKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Category>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub group: bool,
    pub id: String,
}

impl SelectionKey {
    pub fn plain(id: impl Into<String>) -> Self {
        Self {
            source: None,
            group: false,
            id: id.into(),
        }
    }

    pub fn sourced(source: Category, id: impl Into<String>) -> Self {
        Self {
            source: Some(source),
            group: false,
            id: id.into(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self {
            source: None,
            group: true,
            id: name.into(),
        }
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.source, self.group) {
            (Some(c), _) => write!(f, "{c}:{}", self.id),
            (None, true) => write!(f, "group:{}", self.id),
            (None, false) => f.write_str(&self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(id: &str) -> FlatIndicator {
        FlatIndicator {
            indicator_id: id.into(),
            name: format!("{id} name"),
            latest_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            latest_value: 1.5,
            default_chart_type: ChartType::Bar,
            is_default: false,
            source: None,
            subcategory: Some("Growth".into()),
            units: None,
            release_frequency: None,
            points: vec![],
        }
    }

    #[test]
    fn combined_key_includes_source_category() {
        let a = IndicatorDescriptor::Combined(CombinedIndicator {
            source_category: Category::Macro,
            indicator: flat("GDP"),
        });
        let b = IndicatorDescriptor::Combined(CombinedIndicator {
            source_category: Category::Micro,
            indicator: flat("GDP"),
        });
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key().to_string(), "macro:GDP");
        assert_eq!(IndicatorDescriptor::Flat(flat("GDP")).key().to_string(), "GDP");
    }

    #[test]
    fn grouped_key_is_group_name() {
        let g = IndicatorDescriptor::Grouped(IndicatorGroup {
            id: 7,
            name: "Rates".into(),
            members: vec!["2Y".into(), "10Y".into()],
            values: vec![4.1, 4.3],
        });
        assert_eq!(g.key(), SelectionKey::group("Rates"));
        assert_eq!(g.key().to_string(), "group:Rates");
        assert_eq!(g.group_name(), Some("Rates"));
        assert!(g.series().is_none());
        assert_eq!(g.kind(), IndicatorKind::Grouped);
    }

    #[test]
    fn group_named_like_a_flat_id_keeps_its_own_key() {
        let flat = IndicatorDescriptor::Flat(flat("Rates"));
        let group = IndicatorDescriptor::Grouped(IndicatorGroup {
            id: 1,
            name: "Rates".into(),
            members: vec![],
            values: vec![],
        });
        assert_ne!(flat.key(), group.key());

        let json = serde_json::to_string(&flat.key()).unwrap();
        assert!(!json.contains("group"));
        let back: SelectionKey = serde_json::from_str(r#"{"group": true, "id": "Rates"}"#).unwrap();
        assert_eq!(back, group.key());
    }

    #[test]
    fn descriptor_serde_is_tagged() {
        let d = IndicatorDescriptor::Flat(flat("CPI"));
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "flat");
        let back: IndicatorDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }
}
