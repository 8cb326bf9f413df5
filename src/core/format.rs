//! # Response Formatter
//!
//! Turns the raw `content` string from the generation endpoint into a small
//! inline tree. Only two markers are recognized:
//!
//! - `**text**` → [`Inline::Bold`] (non-greedy, never spans a newline)
//! - `\n`       → [`Inline::LineBreak`]
//!
//! Everything else is literal text. The tree is the only thing adapters see;
//! [`FormattedText::to_html`] escapes every text node before emitting
//! `<strong>` / `<br>`, so server content can never inject markup.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
    LineBreak,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedText {
    pub nodes: Vec<Inline>,
}

/// Formats a raw response. `None` and `""` both produce an empty result.
pub fn format_response(raw: Option<&str>) -> FormattedText {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return FormattedText::default(),
    };

    let mut nodes = Vec::new();
    for (i, line) in raw.split('\n').enumerate() {
        if i > 0 {
            nodes.push(Inline::LineBreak);
        }
        push_line(&mut nodes, line);
    }
    FormattedText { nodes }
}

fn push_line(nodes: &mut Vec<Inline>, line: &str) {
    let mut last = 0;
    for caps in BOLD.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            nodes.push(Inline::Text(line[last..whole.start()].to_string()));
        }
        nodes.push(Inline::Bold(inner.as_str().to_string()));
        last = whole.end();
    }
    if last < line.len() {
        nodes.push(Inline::Text(line[last..].to_string()));
    }
}

impl FormattedText {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders to HTML: text escaped, bold as `<strong>`, breaks as `<br>`.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Inline::Text(text) => out.push_str(&escape_html(text)),
                Inline::Bold(text) => {
                    out.push_str("<strong>");
                    out.push_str(&escape_html(text));
                    out.push_str("</strong>");
                }
                Inline::LineBreak => out.push_str("<br>"),
            }
        }
        out
    }

    /// The text with markers removed and breaks as `\n`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Inline::Text(text) | Inline::Bold(text) => out.push_str(text),
                Inline::LineBreak => out.push('\n'),
            }
        }
        out
    }

    /// Groups nodes into lines, split at each [`Inline::LineBreak`].
    pub fn lines(&self) -> Vec<Vec<&Inline>> {
        let mut lines = vec![Vec::new()];
        for node in &self.nodes {
            match node {
                Inline::LineBreak => lines.push(Vec::new()),
                other => {
                    if let Some(current) = lines.last_mut() {
                        current.push(other);
                    }
                }
            }
        }
        if self.nodes.is_empty() {
            lines.clear();
        }
        lines
    }
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold_count(text: &FormattedText) -> usize {
        text.nodes
            .iter()
            .filter(|n| matches!(n, Inline::Bold(_)))
            .count()
    }

    #[test]
    fn test_absent_and_empty_input() {
        assert!(format_response(None).is_empty());
        assert!(format_response(Some("")).is_empty());
        assert_eq!(format_response(None).to_html(), "");
        assert!(format_response(None).lines().is_empty());
    }

    #[test]
    fn test_bold_and_line_break() {
        let formatted = format_response(Some("**Hi**\nthere"));
        assert_eq!(
            formatted.nodes,
            vec![
                Inline::Bold("Hi".to_string()),
                Inline::LineBreak,
                Inline::Text("there".to_string()),
            ]
        );
        assert_eq!(formatted.to_html(), "<strong>Hi</strong><br>there");
    }

    #[test]
    fn test_multiple_bold_spans_are_non_greedy() {
        let formatted = format_response(Some("**a** and **b**"));
        assert_eq!(formatted.to_html(), "<strong>a</strong> and <strong>b</strong>");
    }

    #[test]
    fn test_bold_does_not_cross_newline() {
        let formatted = format_response(Some("**a\nb**"));
        assert_eq!(bold_count(&formatted), 0);
        assert_eq!(formatted.to_html(), "**a<br>b**");
    }

    #[test]
    fn test_unmatched_marker_is_literal() {
        let formatted = format_response(Some("2 ** 3 = 8"));
        assert_eq!(formatted.plain_text(), "2 ** 3 = 8");
        assert_eq!(bold_count(&formatted), 0);
    }

    #[test]
    fn test_empty_bold_span() {
        let formatted = format_response(Some("x****y"));
        assert_eq!(formatted.to_html(), "x<strong></strong>y");
    }

    #[test]
    fn test_markers_and_breaks_keep_order() {
        let formatted =
            format_response(Some("Intro\n**Point one**: yes\n\n**Point two**: no"));
        let html = formatted.to_html();
        assert_eq!(
            html,
            "Intro<br><strong>Point one</strong>: yes<br><br><strong>Point two</strong>: no"
        );
        assert!(!html.contains("**"));
    }

    #[test]
    fn test_html_in_content_is_escaped() {
        let formatted = format_response(Some("<script>alert('x')</script> & **<b>**"));
        assert_eq!(
            formatted.to_html(),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; <strong>&lt;b&gt;</strong>"
        );
    }

    #[test]
    fn test_reformatting_adds_no_emphasis() {
        let once = format_response(Some("**a**\nb"));
        assert_eq!(bold_count(&once), 1);
        assert_eq!(once.to_html().matches("<strong>").count(), 1);

        let plain_again = format_response(Some(&once.plain_text()));
        assert_eq!(bold_count(&plain_again), 0);

        let html_again = format_response(Some(&once.to_html()));
        assert_eq!(bold_count(&html_again), 0);
        assert_eq!(html_again.to_html().matches("<strong>").count(), 0);
    }

    #[test]
    fn test_trailing_newline_produces_break() {
        let formatted = format_response(Some("done\n"));
        assert_eq!(
            formatted.nodes,
            vec![Inline::Text("done".to_string()), Inline::LineBreak]
        );
        assert_eq!(formatted.lines().len(), 2);
    }

    #[test]
    fn test_plain_text_strips_markers() {
        let formatted = format_response(Some("**Hi**\nthere"));
        assert_eq!(formatted.plain_text(), "Hi\nthere");
    }
}
