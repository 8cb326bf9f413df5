//! # PromptChip Component
//!
//! Small dismissible chip in the top-right corner echoing the current prompt.
//! Shown whenever the prompt is non-empty; clicking it (or Ctrl+X) clears the
//! prompt and nothing else.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::Component;

/// Maximum display width of the prompt excerpt, in cells.
const MAX_LABEL_WIDTH: usize = 24;
const CLOSE_GLYPH: &str = " ×";

pub struct PromptChip<'a> {
    pub prompt: &'a str,
}

impl<'a> PromptChip<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self { prompt }
    }

    /// The chip label: first line of the prompt, truncated with an ellipsis.
    pub fn label(&self) -> String {
        let first_line = self.prompt.lines().next().unwrap_or("").trim();
        truncate_to_width(first_line, MAX_LABEL_WIDTH)
    }

    /// Where the chip is drawn within `frame_area` (top-right, one row tall).
    pub fn area(&self, frame_area: Rect) -> Rect {
        let width = (self.label().width() + CLOSE_GLYPH.width() + 2) as u16;
        let width = width.min(frame_area.width);
        Rect {
            x: frame_area.right().saturating_sub(width),
            y: frame_area.y,
            width,
            height: 1.min(frame_area.height),
        }
    }
}

/// Truncates `text` to at most `max` display cells, ending with `…` when cut.
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

impl Component for PromptChip<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = Style::default().fg(Color::Black).bg(Color::Cyan);
        let line = Line::from(vec![
            Span::styled(format!(" {}", self.label()), style),
            Span::styled(
                format!("{CLOSE_GLYPH} "),
                style.add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(line), area);
    }
}
