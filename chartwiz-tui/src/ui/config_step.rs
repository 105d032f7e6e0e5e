//! Chart config step: position, typography, size, theme and icon flags.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use chartwiz_core::CustomizationStore;

use crate::app::{AppState, ConfigField};
use crate::theme;

/// Current value of a config row, as shown next to its label.
pub fn field_value(field: ConfigField, store: &CustomizationStore) -> String {
    if let Some(flag) = field.flag() {
        return if store.flag(flag) { "on".into() } else { "off".into() };
    }
    let c = store.customization();
    match field {
        ConfigField::Position => store.position().label().to_string(),
        ConfigField::Palette => c.theme.palette.to_string(),
        ConfigField::Theme => c.theme.mode.to_string(),
        ConfigField::FontSize => format!("{}px", c.typography.font_size),
        ConfigField::FontWeight => c.typography.font_weight.to_string(),
        ConfigField::TitleSize => format!("{}px", c.typography.title_size),
        ConfigField::LabelSize => format!("{}px", c.typography.label_size),
        ConfigField::Width => format!("{}px", c.size.width),
        ConfigField::Height => format!("{}px", c.size.height),
        ConfigField::AspectRatio => c.size.aspect_ratio.to_string(),
        ConfigField::Legend | ConfigField::Grid | ConfigField::Axes | ConfigField::DataLabels => {
            String::new()
        }
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let store = app.session.customization();
    let title = app.session.title().unwrap_or("(untitled)");
    let mut lines = vec![
        Line::from(Span::styled(
            "[j/k]row [h/l/Space]change [t]title [R]reset [Enter]continue",
            theme::muted(),
        )),
        Line::from(vec![
            Span::styled(format!("  {:>14}: ", "Title"), theme::text()),
            Span::styled(title.to_string(), theme::accent_bold()),
        ]),
        Line::from(""),
    ];

    for (i, field) in ConfigField::ALL.iter().enumerate() {
        let label_style = if i == app.config_cursor {
            theme::cursor()
        } else {
            theme::text()
        };
        let value_style = match field.flag() {
            Some(flag) if store.flag(flag) => theme::positive(),
            Some(_) => theme::muted(),
            None => theme::accent(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>14}: ", field.label()), label_style),
            Span::styled(field_value(*field, store), value_style),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
