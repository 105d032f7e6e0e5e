//! Parrot/neon style tokens for the wizard screens.
//!
//! Neon accents on a near-black background:
//! - **Accent**: electric cyan (focus, current step)
//! - **Positive**: neon green (selected, completed)
//! - **Negative**: hot pink (errors, failed loads)
//! - **Warning**: neon orange (guards, unsaved settings)
//! - **Neutral**: cool purple (hints)
//! - **Muted**: steel blue (secondary text)

use ratatui::style::{Color, Modifier, Style};

use chartwiz_wizard::NoticeLevel;

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

/// Row under the cursor.
pub fn cursor() -> Style {
    Style::default()
        .fg(BACKGROUND)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

pub fn notice(level: NoticeLevel) -> Style {
    match level {
        NoticeLevel::Info => accent(),
        NoticeLevel::Warning => warning(),
        NoticeLevel::Error => negative(),
    }
}

/// Terminal colour for a series colour string (`#rrggbb` or
/// `hsl(h, s%, l%)`). Unparseable input falls back to the accent.
pub fn series_color(spec: &str) -> Color {
    parse_hex(spec)
        .or_else(|| parse_hsl(spec))
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(ACCENT)
}

fn parse_hex(spec: &str) -> Option<(u8, u8, u8)> {
    let hex = spec.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn parse_hsl(spec: &str) -> Option<(u8, u8, u8)> {
    let inner = spec.trim().strip_prefix("hsl(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().trim_end_matches('%'));
    let h: f64 = parts.next()?.parse().ok()?;
    let s: f64 = parts.next()?.parse::<f64>().ok()? / 100.0;
    let l: f64 = parts.next()?.parse::<f64>().ok()? / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Some((to_u8(r1), to_u8(g1), to_u8(b1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse() {
        assert_eq!(series_color("#3b82f6"), Color::Rgb(0x3b, 0x82, 0xf6));
        assert_eq!(series_color("#fff"), ACCENT);
        assert_eq!(series_color("#zzzzzz"), ACCENT);
    }

    #[test]
    fn hsl_colors_parse() {
        assert_eq!(series_color("hsl(0, 100%, 50%)"), Color::Rgb(255, 0, 0));
        assert_eq!(series_color("hsl(120, 100%, 50%)"), Color::Rgb(0, 255, 0));
        assert_eq!(series_color("hsl(240, 100%, 50%)"), Color::Rgb(0, 0, 255));
        assert_eq!(series_color("hsl(200, 0%, 100%)"), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn garbage_falls_back_to_accent() {
        assert_eq!(series_color("teal"), ACCENT);
        assert_eq!(series_color("hsl(a, b, c)"), ACCENT);
    }

    #[test]
    fn notice_levels_have_distinct_styles() {
        assert_eq!(notice(NoticeLevel::Error), negative());
        assert_eq!(notice(NoticeLevel::Warning), warning());
        assert_ne!(notice(NoticeLevel::Info), notice(NoticeLevel::Error));
    }
}
