//! Live preview datasets for rendering collaborators.

use chrono::NaiveDate;
use serde::Serialize;

use crate::assembler::{representative_chart_type, AssemblyInput};
use crate::domain::{ChartPosition, ChartType, IndicatorDescriptor, DEFAULT_CHART_TITLE};
use crate::filter::filter_points;

/// Fallback colours, cycled, for selections without a visual config.
pub const PREVIEW_COLORS: [&str; 5] = ["#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PreviewX {
    Date(NaiveDate),
    Member(String),
}

impl std::fmt::Display for PreviewX {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewX::Date(d) => write!(f, "{d}"),
            PreviewX::Member(m) => f.write_str(m),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewPoint {
    pub x: PreviewX,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDataset {
    pub key: String,
    pub label: String,
    pub color: String,
    pub chart_type: ChartType,
    pub points: Vec<PreviewPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPreview {
    pub has_data: bool,
    pub indicator_count: usize,
    pub category_name: Option<String>,
    pub chart_type: Option<ChartType>,
    pub position: ChartPosition,
    pub title: String,
    pub datasets: Vec<PreviewDataset>,
}

/// Build preview datasets from the current selection and the loaded catalog
/// rows. Series are sliced to each selection's own resolved window; a
/// selection whose row is not loaded yields an empty dataset.
pub fn build_preview(
    input: AssemblyInput<'_>,
    loaded: &[IndicatorDescriptor],
    today: NaiveDate,
) -> ChartPreview {
    let selected = input.selection.entries();
    let chart_type = input
        .category
        .and_then(|c| representative_chart_type(c, selected, input.combination_type).ok());

    let datasets: Vec<PreviewDataset> = selected
        .iter()
        .enumerate()
        .map(|(i, sel)| {
            let key = sel.key();
            let window = sel.date_range.resolve(today);
            let points = match loaded.iter().find(|d| d.key() == key) {
                Some(IndicatorDescriptor::Grouped(g)) => g
                    .members
                    .iter()
                    .zip(&g.values)
                    .map(|(m, v)| PreviewPoint {
                        x: PreviewX::Member(m.clone()),
                        value: *v,
                    })
                    .collect(),
                Some(other) => other
                    .series()
                    .map(|s| filter_points(&s.points, &window))
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| PreviewPoint {
                        x: PreviewX::Date(p.date),
                        value: p.value,
                    })
                    .collect(),
                None => Vec::new(),
            };
            let color = sel
                .config
                .as_ref()
                .map(|c| c.color.clone())
                .unwrap_or_else(|| PREVIEW_COLORS[i % PREVIEW_COLORS.len()].to_string());
            PreviewDataset {
                key: key.to_string(),
                label: sel.display_name().to_string(),
                color,
                chart_type: sel.chart_type,
                points,
            }
        })
        .collect();

    ChartPreview {
        has_data: datasets.iter().any(|d| !d.points.is_empty()),
        indicator_count: selected.len(),
        category_name: input.category.map(|c| c.title().to_string()),
        chart_type,
        position: input.customization.position(),
        title: input
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_CHART_TITLE)
            .to_string(),
        datasets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customize::CustomizationStore;
    use crate::domain::{
        Category, DateRangeSpec, FlatIndicator, IndicatorGroup, IndicatorSettings, SelectionKey,
        TimeSeriesPoint,
    };
    use crate::selection::SelectionStore;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn loaded() -> Vec<IndicatorDescriptor> {
        vec![
            IndicatorDescriptor::Flat(FlatIndicator {
                indicator_id: "CPI".into(),
                name: "Consumer Prices".into(),
                latest_date: d(2021, 1, 1),
                latest_value: 3.0,
                default_chart_type: ChartType::Line,
                is_default: true,
                source: None,
                subcategory: None,
                units: None,
                release_frequency: None,
                points: vec![
                    TimeSeriesPoint::new(d(2005, 1, 1), 1.0),
                    TimeSeriesPoint::new(d(2015, 1, 1), 2.0),
                    TimeSeriesPoint::new(d(2021, 1, 1), 3.0),
                ],
            }),
            IndicatorDescriptor::Grouped(IndicatorGroup {
                id: 4,
                name: "Curve".into(),
                members: vec!["2Y".into(), "10Y".into()],
                values: vec![4.5, 4.2],
            }),
        ]
    }

    #[test]
    fn datasets_follow_selection_windows() {
        let rows = loaded();
        let mut sel = SelectionStore::new();
        for row in &rows {
            sel.toggle(row, true, d(2024, 1, 1)).unwrap();
        }
        sel.update_individual_config(
            &SelectionKey::plain("CPI"),
            IndicatorSettings {
                chart_type: ChartType::Bar,
                date_range: DateRangeSpec::custom(d(2010, 1, 1), d(2020, 1, 1)).unwrap(),
            },
        )
        .unwrap();
        let cust = CustomizationStore::new();
        let preview = build_preview(
            AssemblyInput {
                category: Some(Category::Macro),
                selection: &sel,
                customization: &cust,
                combination_type: None,
                title: None,
                chart_id: None,
            },
            &rows,
            d(2024, 1, 1),
        );
        assert!(preview.has_data);
        assert_eq!(preview.indicator_count, 2);
        assert_eq!(preview.chart_type, Some(ChartType::Bar));
        assert_eq!(preview.category_name.as_deref(), Some("Macro"));
        assert_eq!(preview.datasets[0].points.len(), 1);
        assert_eq!(preview.datasets[0].points[0].x, PreviewX::Date(d(2015, 1, 1)));
        assert_eq!(preview.datasets[1].points.len(), 2);
        assert_eq!(preview.datasets[1].points[0].x.to_string(), "2Y");
        assert_eq!(preview.title, "New Chart");
    }

    #[test]
    fn empty_selection_has_no_data() {
        let sel = SelectionStore::new();
        let cust = CustomizationStore::new();
        let preview = build_preview(
            AssemblyInput {
                category: None,
                selection: &sel,
                customization: &cust,
                combination_type: None,
                title: Some("Draft"),
                chart_id: None,
            },
            &[],
            d(2024, 1, 1),
        );
        assert!(!preview.has_data);
        assert_eq!(preview.chart_type, None);
        assert_eq!(preview.title, "Draft");
    }
}
