//! Bottom lines: the latest wizard notice and the status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

/// Latest notice from the session, if any.
pub fn render_notice(f: &mut Frame, area: Rect, app: &AppState) {
    let notices = app.session.notices();
    let line = match notices.latest() {
        Some(notice) => Line::from(vec![
            Span::styled(format!(" [{}] ", notice.level.label()), theme::notice(notice.level)),
            Span::styled(notice.message.clone(), theme::notice(notice.level)),
            Span::styled(
                format!("  ({} total, e to view)", notices.len()),
                theme::muted(),
            ),
        ]),
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = vec![Span::styled(
        " n:Next b:Back x:Cancel e:Notices ?:Help q:Quit",
        theme::muted(),
    )];

    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    if !app.generated.is_empty() {
        spans.push(Span::styled(
            format!("  charts generated: {}", app.generated.len()),
            theme::positive(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
