//! Combination-only step: one chart type and one date range for every
//! selected indicator.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use chartwiz_core::domain::DateRangeSpec;

use crate::app::AppState;
use crate::theme;

fn range_label(range: &DateRangeSpec) -> String {
    match (range.custom_start(), range.custom_end()) {
        (Some(start), Some(end)) => format!("{start} to {end}"),
        _ => range.preset_tag().tag().to_string(),
    }
}

fn row(label: &str, value: String, is_cursor: bool) -> Line<'static> {
    let label_style = if is_cursor { theme::cursor() } else { theme::text() };
    Line::from(vec![
        Span::styled(format!("  {label:>12}: "), label_style),
        Span::styled(format!("< {value} >"), theme::accent()),
    ])
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let settings = app.session.combination_settings();
    let mut lines = vec![
        Line::from(Span::styled(
            "[j/k]row [h/l]change [Enter]apply and continue",
            theme::muted(),
        )),
        Line::from(""),
        row("Chart type", settings.chart_type.label().to_string(), app.settings_cursor == 0),
        row("Date range", range_label(&settings.date_range), app.settings_cursor == 1),
        Line::from(""),
        Line::from(Span::styled(
            format!("Applies to {} selected indicators:", app.session.selection().len()),
            theme::muted(),
        )),
    ];

    for entry in app.session.selection().entries() {
        let source = entry
            .source_category
            .map(|c| format!("  {}", c.title()))
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(format!("    {}", entry.display_name()), theme::positive()),
            Span::styled(source, theme::neutral()),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartwiz_core::domain::DatePreset;
    use chrono::NaiveDate;

    #[test]
    fn preset_and_custom_labels() {
        assert_eq!(range_label(&DateRangeSpec::preset(DatePreset::FiveYears)), DatePreset::FiveYears.tag());
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let custom = DateRangeSpec::custom(start, end).unwrap();
        assert_eq!(range_label(&custom), "2020-01-01 to 2021-01-01");
    }
}
