//! Keyboard input dispatch: overlays → global keys → step-specific handlers.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use chartwiz_core::domain::Category;
use chartwiz_wizard::StepId;

use crate::app::{AppState, ConfigField, Overlay, SETTINGS_ROWS};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.running = false;
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome | Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::Notices => {
            handle_notices_overlay(app, key);
            return;
        }
        Overlay::Search => {
            handle_search_overlay(app, key);
            return;
        }
        Overlay::Title => {
            handle_title_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::Notices;
            app.notice_scroll = 0;
            return;
        }
        KeyCode::Char('x') => {
            app.cancel();
            return;
        }
        KeyCode::Char('n') | KeyCode::Tab => {
            app.advance();
            return;
        }
        KeyCode::Char('b') | KeyCode::BackTab | KeyCode::Esc => {
            app.retreat();
            return;
        }
        _ => {}
    }

    // 3. Step-specific keys.
    match app.current_step() {
        StepId::SelectCategory => handle_category_key(app, key),
        StepId::SelectIndicators => handle_indicator_key(app, key),
        StepId::DateChartType => handle_settings_key(app, key),
        StepId::ChartConfig => handle_config_key(app, key),
        StepId::Preview => {
            if key.code == KeyCode::Enter {
                app.advance();
            }
        }
    }
}

fn handle_notices_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.notice_scroll + 1 < app.session.notices().len() {
                app.notice_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.notice_scroll = app.notice_scroll.saturating_sub(1);
        }
        KeyCode::Char('c') => {
            app.session.clear_notices();
            app.notice_scroll = 0;
        }
        _ => {}
    }
}

fn handle_search_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.text_input.clear();
            app.session.set_search("", Instant::now());
            app.session.flush_search();
            app.indicator_cursor = 0;
            app.overlay = Overlay::None;
        }
        KeyCode::Enter => {
            app.session.flush_search();
            app.indicator_cursor = 0;
            app.overlay = Overlay::None;
        }
        KeyCode::Backspace => {
            app.text_input.pop();
            app.session.set_search(app.text_input.clone(), Instant::now());
        }
        KeyCode::Char(c) => {
            app.text_input.push(c);
            app.session.set_search(app.text_input.clone(), Instant::now());
        }
        _ => {}
    }
}

fn handle_title_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.text_input.clear();
            app.overlay = Overlay::None;
        }
        KeyCode::Enter => app.commit_title(),
        KeyCode::Backspace => {
            app.text_input.pop();
        }
        KeyCode::Char(c) => app.text_input.push(c),
        _ => {}
    }
}

fn handle_category_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_category_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_category_cursor(-1),
        KeyCode::Char(' ') => app.choose_category(),
        KeyCode::Enter => {
            app.choose_category();
            if app.session.category() == Some(Category::ALL[app.category_cursor]) {
                app.advance();
            }
        }
        _ => {}
    }
}

fn handle_indicator_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_indicator_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_indicator_cursor(-1),
        KeyCode::Char(' ') => app.toggle_highlighted(),
        KeyCode::Char('c') => app.adjust_highlighted(true, 1),
        KeyCode::Char('C') => app.adjust_highlighted(true, -1),
        KeyCode::Char('d') => app.adjust_highlighted(false, 1),
        KeyCode::Char('D') => app.adjust_highlighted(false, -1),
        KeyCode::Char('g') => app.apply_to_group(),
        KeyCode::Char('o') => app.toggle_sort(),
        KeyCode::Char('m') => app.fetch_more(),
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('/') | KeyCode::Char('s') => {
            app.text_input = app.session.query().term.clone();
            app.overlay = Overlay::Search;
        }
        KeyCode::Enter => app.advance(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.settings_cursor + 1 < SETTINGS_ROWS {
                app.settings_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.settings_cursor = app.settings_cursor.saturating_sub(1);
        }
        KeyCode::Char('h') | KeyCode::Left => app.adjust_combination(-1),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(' ') => app.adjust_combination(1),
        KeyCode::Enter => app.advance(),
        _ => {}
    }
}

fn handle_config_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.config_cursor + 1 < ConfigField::ALL.len() {
                app.config_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.config_cursor = app.config_cursor.saturating_sub(1);
        }
        KeyCode::Char('h') | KeyCode::Left => app.adjust_config(-1),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(' ') => app.adjust_config(1),
        KeyCode::Char('t') => {
            app.text_input = app.session.title().unwrap_or_default().to_string();
            app.overlay = Overlay::Title;
        }
        KeyCode::Char('R') => {
            app.session.customization_mut().reset();
            app.set_status("Customization reset to defaults");
        }
        KeyCode::Enter => app.advance(),
        _ => {}
    }
}
