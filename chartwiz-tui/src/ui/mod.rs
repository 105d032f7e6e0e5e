//! Top-level UI layout: step breadcrumb, one screen per step, notice line
//! and status bar.

pub mod category_step;
pub mod config_step;
pub mod indicator_step;
pub mod overlays;
pub mod preview_step;
pub mod settings_step;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use chartwiz_wizard::StepId;

use crate::app::{AppState, Overlay};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_breadcrumb(f, chunks[0], app);
    draw_step(f, chunks[1], app);
    status_bar::render_notice(f, chunks[2], app);
    status_bar::render(f, chunks[3], app);

    let main_area = chunks[1];
    match app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, main_area),
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::Notices => overlays::render_notices(f, main_area, app),
        Overlay::Search => overlays::render_input(f, main_area, " Search indicators ", &app.text_input),
        Overlay::Title => overlays::render_input(f, main_area, " Chart title ", &app.text_input),
        Overlay::None => {}
    }
}

/// `1 Select category > 2 Indicators > ...`, current step highlighted and
/// completed steps marked.
fn render_breadcrumb(f: &mut Frame, area: Rect, app: &AppState) {
    let controller = app.session.controller();
    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, step) in app.session.steps().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", theme::muted()));
        }
        let marker = if controller.is_completed(i) { "✓" } else { "" };
        let style = if i == controller.current_index() {
            theme::accent_bold()
        } else if controller.is_completed(i) {
            theme::positive()
        } else {
            theme::muted()
        };
        spans.push(Span::styled(format!("{} {}{marker}", i + 1, step.title), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_step(f: &mut Frame, area: Rect, app: &AppState) {
    let step = app.session.current_step();
    let index = app.session.controller().current_index();
    let total = app.session.steps().len();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}/{}] ", step.title, index + 1, total))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match step.id {
        StepId::SelectCategory => category_step::render(f, inner, app),
        StepId::SelectIndicators => indicator_step::render(f, inner, app),
        StepId::DateChartType => settings_step::render(f, inner, app),
        StepId::ChartConfig => config_step::render(f, inner, app),
        StepId::Preview => preview_step::render(f, inner, app),
    }
}

/// First visible row so that `cursor` stays on screen.
pub fn scroll_offset(cursor: usize, height: usize) -> usize {
    cursor.saturating_sub(height.saturating_sub(1))
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_keeps_cursor_visible() {
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(10, 10), 1);
        assert_eq!(scroll_offset(25, 10), 16);
        assert_eq!(scroll_offset(3, 0), 3);
    }

    #[test]
    fn centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert_eq!(popup.width, 60);
    }
}
