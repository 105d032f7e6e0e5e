//! Overlay widgets: welcome, key help, notice history, text input.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

/// First-run welcome overlay.
pub fn render_welcome(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Welcome to ChartWiz ")
        .title_style(theme::accent_bold());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Building a chart:", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled("  1. Pick a category and press Enter", theme::muted())),
        Line::from(Span::styled(
            "  2. Select indicators with Space, set type and range with c/d",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  3. Adjust position, fonts and theme",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  4. Check the preview and press Enter to generate",
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press ? at any time for keys.", theme::muted())),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'static>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}

/// Keyboard reference.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(80, 90, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keys [any key]close ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();
    section(&mut lines, "Anywhere");
    key(&mut lines, "n / Tab", "Next step (checks the step's requirements)");
    key(&mut lines, "b / Esc", "Previous step");
    key(&mut lines, "x", "Cancel and start over");
    key(&mut lines, "e", "Notification history");
    key(&mut lines, "q / Ctrl-C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Indicators");
    key(&mut lines, "Space", "Select / deselect");
    key(&mut lines, "c / C", "Cycle chart type of a selected indicator");
    key(&mut lines, "d / D", "Cycle date range of a selected indicator");
    key(&mut lines, "g", "Apply its settings to the whole group");
    key(&mut lines, "/ or s", "Search by name");
    key(&mut lines, "o", "Sort by name / latest date");
    key(&mut lines, "m", "Load the next page");
    key(&mut lines, "r", "Retry a failed load");
    lines.push(Line::from(""));

    section(&mut lines, "Date & chart type / Chart config");
    key(&mut lines, "j / k", "Move between rows");
    key(&mut lines, "h / l / Space", "Change the value");
    key(&mut lines, "t", "Edit the chart title");
    key(&mut lines, "R", "Reset customization");
    lines.push(Line::from(""));

    section(&mut lines, "Preview");
    key(&mut lines, "Enter", "Generate the chart");

    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, popup);
}

/// Notice history, newest first.
pub fn render_notices(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let notices = app.session.notices();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::warning())
        .title(format!(
            " Notifications ({}) [Esc]close [j/k]scroll [c]clear ",
            notices.len()
        ))
        .title_style(theme::warning());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if notices.is_empty() {
        let text = Paragraph::new(Span::styled("Nothing to report.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, notice) in notices
        .iter()
        .enumerate()
        .skip(app.notice_scroll)
        .take(inner.height as usize)
    {
        let style = if i == app.notice_scroll {
            theme::notice(notice.level).add_modifier(Modifier::BOLD)
        } else {
            theme::notice(notice.level)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", notice.at.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", notice.level.label()), style),
            Span::styled(notice.message.clone(), style),
        ]));
        if !notice.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(notice.context.clone(), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

/// Single-line text entry (search term, chart title).
pub fn render_input(f: &mut Frame, area: Rect, title: &str, input: &str) {
    let popup = centered_rect(50, 20, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(format!("{title}[Enter]ok [Esc]cancel "))
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(input.to_string(), theme::accent_bold()),
            Span::styled("_", theme::accent()),
        ]),
    ];

    f.render_widget(Paragraph::new(text), inner);
}
