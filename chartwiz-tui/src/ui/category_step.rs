//! Step 1: choose the indicator domain.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use chartwiz_core::domain::Category;
use chartwiz_wizard::steps_for;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "[j/k]move [Space]choose [Enter]choose and continue",
            theme::muted(),
        )),
        Line::from(""),
    ];

    let chosen = app.session.category();
    for (i, category) in Category::ALL.iter().enumerate() {
        let is_cursor = i == app.category_cursor;
        let is_chosen = chosen == Some(*category);
        let mark = if is_chosen { "(•)" } else { "( )" };
        let name_style = if is_cursor {
            theme::cursor()
        } else if is_chosen {
            theme::positive()
        } else {
            theme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {mark} "), theme::accent()),
            Span::styled(format!("{:<14}", category.title()), name_style),
            Span::styled(
                format!("  {} steps  ", steps_for(Some(*category)).len()),
                theme::neutral(),
            ),
            Span::styled(category.description(), theme::muted()),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
