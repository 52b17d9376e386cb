use unicode_width::UnicodeWidthStr;

use crate::ui::style::Style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Right-aligns the text in `width` columns, counting wide glyphs
    /// (年, 月) as two.
    pub fn padded(text: &str, width: usize, style: Style) -> Self {
        let used = UnicodeWidthStr::width(text);
        let pad = width.saturating_sub(used);
        Self::styled(format!("{}{}", " ".repeat(pad), text), style)
    }
}

pub type SpanLine = Vec<Span>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_glyphs_take_two_columns() {
        assert_eq!(Span::padded("3月", 4, Style::default()).text, " 3月");
        assert_eq!(Span::padded("日", 4, Style::default()).text, "  日");
        assert_eq!(Span::padded("12", 4, Style::default()).text, "  12");
        assert_eq!(Span::padded("toolong", 4, Style::default()).text, "toolong");
    }
}
