//! Step 2: browse the catalog and pick indicators.
//!
//! Left: the filtered, sorted list. Right: the highlighted row's details,
//! a sparkline of its series, and the current selection.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use chartwiz_core::catalog::CatalogStatus;
use chartwiz_core::domain::IndicatorDescriptor;
use chartwiz_core::SortKey;

use crate::app::AppState;
use crate::theme;
use crate::ui::scroll_offset;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Block-character sparkline of `values`, averaged into at most `width`
/// buckets. Non-finite values are ignored.
pub fn sparkline(values: &[f64], width: usize) -> String {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let buckets: Vec<f64> = if values.len() <= width {
        values
    } else {
        let n = values.len();
        (0..width)
            .map(|i| {
                let start = i * n / width;
                let end = ((i + 1) * n / width).max(start + 1);
                let slice = &values[start..end];
                slice.iter().sum::<f64>() / slice.len() as f64
            })
            .collect()
    };

    let min = buckets.iter().copied().fold(f64::INFINITY, f64::min);
    let max = buckets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    buckets
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                BARS[3]
            } else {
                let idx = ((v - min) / span * 7.0).round() as usize;
                BARS[idx.min(7)]
            }
        })
        .collect()
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    render_list(f, columns[0], app);
    render_detail(f, columns[1], app);
}

fn status_line(app: &AppState) -> Line<'static> {
    let catalog = app.session.catalog();
    let query = app.session.query();
    let sort = match query.sort {
        SortKey::Name => "name",
        SortKey::Date => "date",
    };
    let mut spans = vec![Span::styled(
        format!("{} loaded  sort:{sort}  ", catalog.items().len()),
        theme::muted(),
    )];
    if !query.term.is_empty() {
        spans.push(Span::styled(format!("search:'{}'  ", query.term), theme::accent()));
    }
    match catalog.status() {
        CatalogStatus::Loading => spans.push(Span::styled("loading...", theme::warning())),
        CatalogStatus::Failed(e) => {
            spans.push(Span::styled(format!("failed: {e} [r]retry"), theme::negative()));
        }
        CatalogStatus::Loaded if catalog.has_more() => {
            spans.push(Span::styled("[m]more", theme::neutral()));
        }
        CatalogStatus::Loaded | CatalogStatus::Idle => {}
    }
    Line::from(spans)
}

fn render_list(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "[Space]select [c/d]type/range [g]group [/]search [o]sort [Enter]next",
            theme::muted(),
        )),
        status_line(app),
        Line::from(""),
    ];

    let visible = app.session.visible_indicators();
    if visible.is_empty() {
        let msg = match app.session.catalog().status() {
            CatalogStatus::Loading => "Loading indicators...",
            CatalogStatus::Failed(_) => "Could not load indicators. Press r to retry.",
            _ if !app.session.query().term.is_empty() => "No indicators match the search.",
            _ => "No indicators available for this category.",
        };
        lines.push(Line::from(Span::styled(msg, theme::muted())));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    let height = (area.height as usize).saturating_sub(lines.len());
    let offset = scroll_offset(app.indicator_cursor, height);
    let selection = app.session.selection();
    for (i, desc) in visible.iter().enumerate().skip(offset).take(height) {
        let key = desc.key();
        let check = if selection.contains(&key) { "[x]" } else { "[ ]" };
        let star = if desc.is_default() { "*" } else { " " };
        let name_style = if i == app.indicator_cursor {
            theme::cursor()
        } else if selection.contains(&key) {
            theme::positive()
        } else {
            theme::text()
        };
        let mut spans = vec![
            Span::styled(format!("{check}{star}"), theme::accent()),
            Span::styled(desc.display_name().to_string(), name_style),
        ];
        if let Some(source) = desc.source_category() {
            spans.push(Span::styled(format!("  {}", source.title()), theme::neutral()));
        }
        if let Some(date) = desc.latest_date() {
            spans.push(Span::styled(format!("  {date}"), theme::muted()));
        }
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn describe(desc: &IndicatorDescriptor, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        desc.display_name().to_string(),
        theme::accent_bold(),
    ))];
    match desc.series() {
        Some(series) => {
            lines.push(Line::from(Span::styled(
                format!(
                    "latest {} on {}  default {}",
                    series.latest_value, series.latest_date, series.default_chart_type
                ),
                theme::muted(),
            )));
            for (label, value) in [
                ("source", &series.source),
                ("group", &series.subcategory),
                ("units", &series.units),
                ("frequency", &series.release_frequency),
            ] {
                if let Some(value) = value {
                    lines.push(Line::from(Span::styled(
                        format!("{label}: {value}"),
                        theme::muted(),
                    )));
                }
            }
            let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
            lines.push(Line::from(Span::styled(sparkline(&values, width), theme::accent())));
        }
        None => {
            if let IndicatorDescriptor::Grouped(group) = desc {
                lines.push(Line::from(Span::styled(
                    format!("{} members", group.members.len()),
                    theme::muted(),
                )));
                lines.push(Line::from(Span::styled(
                    sparkline(&group.values, width),
                    theme::accent(),
                )));
            }
        }
    }
    lines
}

fn render_detail(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(3)])
        .split(area);

    let detail_block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Indicator ");
    let inner = detail_block.inner(rows[0]);
    let lines = match app.highlighted() {
        Some(desc) => describe(&desc, inner.width as usize),
        None => vec![Line::from(Span::styled("Nothing highlighted", theme::muted()))],
    };
    f.render_widget(
        Paragraph::new(lines).block(detail_block).wrap(Wrap { trim: true }),
        rows[0],
    );

    let selection = app.session.selection();
    let mut lines: Vec<Line> = Vec::new();
    for entry in selection.entries() {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", entry.display_name()), theme::positive()),
            Span::styled(
                format!("{} {}", entry.chart_type, entry.date_range.preset_tag().tag()),
                theme::muted(),
            ),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("None selected yet", theme::muted())));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(format!(" Selected ({}) ", selection.len()));
    f.render_widget(Paragraph::new(lines).block(block), rows[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_uses_every_bar() {
        let values: Vec<f64> = (1..=8).map(f64::from).collect();
        assert_eq!(sparkline(&values, 8), "▁▂▃▄▅▆▇█");
    }

    #[test]
    fn flat_series_is_mid_height() {
        assert_eq!(sparkline(&[2.0, 2.0, 2.0], 10), "▄▄▄");
    }

    #[test]
    fn long_series_is_bucketed_to_width() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let line = sparkline(&values, 10);
        assert_eq!(line.chars().count(), 10);
        assert!(line.starts_with('▁'));
        assert!(line.ends_with('█'));
    }

    #[test]
    fn empty_and_non_finite_input() {
        assert_eq!(sparkline(&[], 5), "");
        assert_eq!(sparkline(&[1.0, 2.0], 0), "");
        assert_eq!(sparkline(&[f64::NAN, 1.0, f64::INFINITY, 3.0], 5), "▁█");
    }

    proptest::proptest! {
        #[test]
        fn never_wider_than_requested(
            values in proptest::collection::vec(-1e6f64..1e6, 0..300),
            width in 1usize..120,
        ) {
            let line = sparkline(&values, width);
            proptest::prop_assert_eq!(line.chars().count(), values.len().min(width));
        }
    }
}
