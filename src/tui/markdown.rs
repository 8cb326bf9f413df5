//! Formatted response → ratatui `Text` renderer.
//!
//! Maps the inline tree from `core::format` onto styled `Line`/`Span` values:
//! bold nodes get `Modifier::BOLD`, line breaks start a new `Line`.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::core::format::{FormattedText, Inline};

/// Returns owned text (`'static`) so callers aren't constrained by input lifetime.
pub fn render(formatted: &FormattedText, base: Style) -> Text<'static> {
    let lines: Vec<Line<'static>> = formatted
        .lines()
        .into_iter()
        .map(|nodes| {
            let spans: Vec<Span<'static>> = nodes
                .into_iter()
                .filter_map(|node| match node {
                    Inline::Text(text) => Some(Span::styled(text.clone(), base)),
                    Inline::Bold(text) => Some(Span::styled(
                        text.clone(),
                        base.add_modifier(Modifier::BOLD),
                    )),
                    Inline::LineBreak => None,
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::format_response;

    #[test]
    fn test_bold_span_and_line_break() {
        let text = render(&format_response(Some("**Hi**\nthere")), Style::default());
        assert_eq!(text.lines.len(), 2);
        assert_eq!(text.lines[0].spans[0].content, "Hi");
        assert!(
            text.lines[0].spans[0]
                .style
                .add_modifier
                .contains(Modifier::BOLD)
        );
        assert_eq!(text.lines[1].spans[0].content, "there");
        assert!(
            !text.lines[1].spans[0]
                .style
                .add_modifier
                .contains(Modifier::BOLD)
        );
    }

    #[test]
    fn test_empty_input_renders_no_lines() {
        let text = render(&format_response(None), Style::default());
        assert!(text.lines.is_empty());
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let text = render(&format_response(Some("a\n\nb")), Style::default());
        assert_eq!(text.lines.len(), 3);
        assert!(text.lines[1].spans.is_empty());
    }

    #[test]
    fn test_markup_is_shown_literally() {
        let text = render(&format_response(Some("<b>x</b>")), Style::default());
        assert_eq!(text.lines[0].spans[0].content, "<b>x</b>");
    }
}
