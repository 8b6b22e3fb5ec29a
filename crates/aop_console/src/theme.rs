//! Colors and text styles.
//!
//! Pages never hardcode colors; they ask the [`Theme`] to style a string.
//! A plain theme returns text untouched, which keeps views comparable in
//! tests and honors `NO_COLOR`.

use crossterm::style::{Color, Stylize, style};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Layout constants shared by the shell and pages.
pub mod spacing {
    /// Width of one dashboard card including borders.
    pub const CARD_WIDTH: usize = 24;
    /// Gap between adjacent cards.
    pub const CARD_GAP: usize = 2;
    /// Lines taken by the navigation bar and its rule.
    pub const NAV_HEIGHT: usize = 2;
    /// Lines taken by the footer and its rule.
    pub const FOOTER_HEIGHT: usize = 2;
}

/// Semantic color tokens plus a color on/off switch.
#[derive(Debug, Clone)]
pub struct Theme {
    color: bool,
    pub primary: Color,
    pub success: Color,
    pub error: Color,
    pub muted: Color,
    pub text: Color,
    pub highlight_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Colored theme for dark terminals.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            color: true,
            primary: Color::Rgb { r: 0x7d, g: 0x56, b: 0xf4 },
            success: Color::Rgb { r: 0x50, g: 0xfa, b: 0x7b },
            error: Color::Rgb { r: 0xff, g: 0x55, b: 0x55 },
            muted: Color::Rgb { r: 0x62, g: 0x72, b: 0xa4 },
            text: Color::Rgb { r: 0xf8, g: 0xf8, b: 0xf2 },
            highlight_bg: Color::Rgb { r: 0x44, g: 0x47, b: 0x5a },
        }
    }

    /// Theme that emits no escape sequences.
    #[must_use]
    pub const fn plain() -> Self {
        let mut theme = Self::dark();
        theme.color = false;
        theme
    }

    /// Pick [`Theme::dark`] or [`Theme::plain`].
    #[must_use]
    pub const fn with_color(color: bool) -> Self {
        if color { Self::dark() } else { Self::plain() }
    }

    /// Whether this theme emits colors.
    #[must_use]
    pub const fn is_colored(&self) -> bool {
        self.color
    }

    fn paint(&self, text: &str, fg: Color, bold: bool) -> String {
        if !self.color {
            return text.to_string();
        }
        let styled = style(text).with(fg);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }

    pub fn title(&self, text: &str) -> String {
        self.paint(text, self.primary, true)
    }

    pub fn text(&self, text: &str) -> String {
        self.paint(text, self.text, false)
    }

    pub fn strong(&self, text: &str) -> String {
        self.paint(text, self.text, true)
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(text, self.muted, false)
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, self.success, false)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, self.error, true)
    }

    /// Selected row / active tab.
    pub fn selected(&self, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        style(text)
            .with(self.text)
            .on(self.highlight_bg)
            .bold()
            .to_string()
    }

    /// An action that cannot be taken right now.
    pub fn disabled(&self, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        style(text).with(self.muted).dim().to_string()
    }
}

/// Pad `text` with spaces to `width` display columns, truncating with `…`
/// when it does not fit.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let current = text.width();
    if current <= width {
        return format!("{text}{}", " ".repeat(width - current));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out.push_str(&" ".repeat(width.saturating_sub(used + 1)));
    out
}

/// A horizontal rule `width` columns wide.
#[must_use]
pub fn rule(width: usize) -> String {
    "─".repeat(width)
}

/// Display width of `text`, ignoring ANSI escape sequences.
#[must_use]
pub fn visible_width(text: &str) -> usize {
    let mut chars = text.chars();
    let mut skipped = String::new();
    let mut width = 0;
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            copy_escape(&mut chars, &mut skipped);
        } else {
            width += c.width().unwrap_or(0);
        }
    }
    width
}

/// Cut `text` to at most `width` display columns, ending with `…` when
/// anything was dropped.
///
/// Escape sequences are copied through and take no columns. A cut line
/// that carried styles ends with a reset so they do not bleed.
#[must_use]
pub fn clip(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    let mut styled = false;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            styled = true;
            out.push(c);
            copy_escape(&mut chars, &mut out);
            continue;
        }
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    if width > 0 {
        out.push('…');
    }
    if styled {
        out.push_str("\x1b[0m");
    }
    out
}

/// Copy the rest of an escape sequence whose `ESC` was just consumed.
fn copy_escape(chars: &mut std::str::Chars<'_>, out: &mut String) {
    match chars.next() {
        Some('[') => {
            out.push('[');
            for c in chars.by_ref() {
                out.push(c);
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
        Some(c) => out.push(c),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_leaves_text_alone() {
        let theme = Theme::plain();
        assert!(!theme.is_colored());
        assert_eq!(theme.title("Dashboard"), "Dashboard");
        assert_eq!(theme.disabled("[Set Draft]"), "[Set Draft]");
        assert_eq!(theme.selected("row"), "row");
    }

    #[test]
    fn colored_theme_emits_escapes() {
        let theme = Theme::dark();
        let styled = theme.error("boom");
        assert!(styled.contains('\x1b'));
        assert!(styled.contains("boom"));
    }

    #[test]
    fn with_color_switch() {
        assert!(Theme::with_color(true).is_colored());
        assert!(!Theme::with_color(false).is_colored());
    }

    #[test]
    fn fit_pads_short_text() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("", 2), "  ");
    }

    #[test]
    fn fit_truncates_long_text() {
        let out = fit("Annual Operating Plan", 8);
        assert_eq!(out, "Annual …");
        assert_eq!(out.width(), 8);
    }

    #[test]
    fn fit_zero_width() {
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn rule_width() {
        assert_eq!(rule(3), "───");
    }

    #[test]
    fn clip_keeps_lines_that_fit() {
        assert_eq!(clip("abc", 3), "abc");
        assert_eq!(clip("", 0), "");
    }

    #[test]
    fn clip_cuts_plain_text() {
        let out = clip("Annual Operating Plan", 8);
        assert_eq!(out, "Annual …");
        assert_eq!(out.width(), 8);
        assert_eq!(clip("abc", 0), "");
    }

    #[test]
    fn clip_ignores_escapes_when_measuring() {
        let theme = Theme::dark();
        let styled = theme.muted("short");
        assert!(styled.len() > 10);
        assert_eq!(visible_width(&styled), 5);
        assert_eq!(clip(&styled, 5), styled);
    }

    #[test]
    fn clip_cuts_styled_text_and_resets() {
        let theme = Theme::dark();
        let styled = format!("{}{}", theme.title("AOP"), theme.muted(" Management page"));
        let out = clip(&styled, 10);
        assert_eq!(visible_width(&out), 10);
        assert!(out.ends_with("…\x1b[0m"));
        assert!(out.contains("AOP"));
    }

    #[test]
    fn clip_counts_wide_characters() {
        let out = clip("預算預算預算", 5);
        assert!(visible_width(&out) <= 5);
        assert!(out.ends_with('…'));
    }
}
