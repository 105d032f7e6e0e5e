//! Preview step: the assembled chart drawn from the live preview datasets.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use chartwiz_core::domain::ChartType;
use chartwiz_core::preview::{PreviewDataset, PreviewX};
use chartwiz_core::ChartPreview;

use crate::app::AppState;
use crate::theme;

/// Dates plot as days since the common era; group members by position.
pub fn plot_points(dataset: &PreviewDataset) -> Vec<(f64, f64)> {
    dataset
        .points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.value.is_finite())
        .map(|(i, p)| {
            let x = match &p.x {
                PreviewX::Date(d) => f64::from(chrono::Datelike::num_days_from_ce(d)),
                PreviewX::Member(_) => i as f64,
            };
            (x, p.value)
        })
        .collect()
}

/// `[min, max]` over every point, widened when degenerate.
pub fn bounds(series: &[Vec<(f64, f64)>], pick: fn(&(f64, f64)) -> f64) -> [f64; 2] {
    let (lo, hi) = series
        .iter()
        .flatten()
        .map(pick)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if (hi - lo).abs() <= f64::EPSILON {
        return [lo - 1.0, hi + 1.0];
    }
    [lo, hi]
}

fn graph_type(chart_type: ChartType) -> GraphType {
    match chart_type {
        ChartType::Line | ChartType::Area => GraphType::Line,
        ChartType::Bar | ChartType::Pie => GraphType::Bar,
        ChartType::Scatter => GraphType::Scatter,
    }
}

fn header(preview: &ChartPreview) -> Vec<Line<'static>> {
    let chart_type = preview
        .chart_type
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| "-".into());
    vec![
        Line::from(vec![
            Span::styled(preview.title.clone(), theme::accent_bold()),
            Span::styled(
                format!(
                    "  {}  {} indicators  {}  {}",
                    preview.category_name.as_deref().unwrap_or("-"),
                    preview.indicator_count,
                    chart_type,
                    preview.position.label()
                ),
                theme::muted(),
            ),
        ]),
        Line::from(Span::styled("[Enter]generate chart [b]back", theme::muted())),
    ]
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let preview = app.session.preview();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);
    f.render_widget(Paragraph::new(header(&preview)), rows[0]);

    if !preview.has_data {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No data in the selected date ranges.",
                theme::muted(),
            )),
        ];
        f.render_widget(Paragraph::new(lines), rows[1]);
        return;
    }

    let series: Vec<Vec<(f64, f64)>> = preview.datasets.iter().map(plot_points).collect();
    let x_bounds = bounds(&series, |p| p.0);
    let y_bounds = bounds(&series, |p| p.1);

    let datasets: Vec<Dataset> = preview
        .datasets
        .iter()
        .zip(&series)
        .map(|(ds, data)| {
            Dataset::default()
                .name(ds.label.clone())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(theme::series_color(&ds.color)))
                .graph_type(graph_type(ds.chart_type))
                .data(data)
        })
        .collect();

    let dated = preview
        .datasets
        .iter()
        .flat_map(|d| d.points.first())
        .any(|p| matches!(p.x, PreviewX::Date(_)));
    let x_label = |v: f64| -> String {
        chrono::NaiveDate::from_num_days_from_ce_opt(v as i32)
            .filter(|_| dated)
            .map(|d| d.to_string())
            .unwrap_or_else(|| format!("{v:.0}"))
    };

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds(x_bounds)
                .labels(vec![
                    Span::styled(x_label(x_bounds[0]), theme::muted()),
                    Span::styled(x_label(x_bounds[1]), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds(y_bounds)
                .labels(vec![
                    Span::styled(format!("{:.2}", y_bounds[0]), theme::muted()),
                    Span::styled(format!("{:.2}", y_bounds[1]), theme::muted()),
                ]),
        );

    f.render_widget(chart, rows[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartwiz_core::preview::PreviewPoint;
    use chrono::NaiveDate;

    fn dataset(points: Vec<PreviewPoint>) -> PreviewDataset {
        PreviewDataset {
            key: "k".into(),
            label: "K".into(),
            color: "#3b82f6".into(),
            chart_type: ChartType::Line,
            points,
        }
    }

    #[test]
    fn dates_plot_as_day_numbers() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        let ds = dataset(vec![
            PreviewPoint { x: PreviewX::Date(d1), value: 1.0 },
            PreviewPoint { x: PreviewX::Date(d2), value: 2.0 },
        ]);
        let pts = plot_points(&ds);
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[1].0 - pts[0].0, 10.0);
    }

    #[test]
    fn members_plot_by_position_and_skip_nan() {
        let ds = dataset(vec![
            PreviewPoint { x: PreviewX::Member("A".into()), value: 1.0 },
            PreviewPoint { x: PreviewX::Member("B".into()), value: f64::NAN },
            PreviewPoint { x: PreviewX::Member("C".into()), value: 3.0 },
        ]);
        assert_eq!(plot_points(&ds), vec![(0.0, 1.0), (2.0, 3.0)]);
    }

    #[test]
    fn bounds_widen_flat_and_empty_series() {
        assert_eq!(bounds(&[], |p| p.1), [0.0, 1.0]);
        assert_eq!(bounds(&[vec![(0.0, 5.0), (1.0, 5.0)]], |p| p.1), [4.0, 6.0]);
        assert_eq!(
            bounds(&[vec![(0.0, 1.0)], vec![(3.0, -2.0)]], |p| p.0),
            [0.0, 3.0]
        );
    }
}
