//! # TextField Component
//!
//! Editable text buffer used for both the prompt textarea and the file path field.
//!
//! ## Responsibilities
//!
//! - Capture text input and paste
//! - Handle editing (backspace, delete, cursor movement, Home/End)
//! - Emit `Activated` on Enter for single-line fields
//! - Keep the cursor row visible when the content is taller than the field
//!
//! The buffer is internal state; `focused` is a prop set by the parent each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;

/// High-level events emitted by a TextField
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// Buffer content changed
    Changed,
    /// Cursor moved without changing content
    Moved,
    /// Enter pressed on a single-line field
    Activated,
}

pub struct TextField {
    /// Prop: border title, may be updated by the parent each frame
    pub title: String,
    placeholder: &'static str,
    multiline: bool,
    buffer: String,
    /// Cursor position as a byte offset into `buffer`
    pos: usize,
    /// First visible content row
    scroll_offset: u16,
    /// Prop: draws a highlighted border and the terminal cursor when true
    pub focused: bool,
}

impl TextField {
    pub fn new(title: &str, placeholder: &'static str, multiline: bool) -> Self {
        Self {
            title: title.to_string(),
            placeholder,
            multiline,
            buffer: String::new(),
            pos: 0,
            scroll_offset: 0,
            focused: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Replaces the buffer and moves the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.pos = self.buffer.len();
        self.scroll_offset = 0;
    }

    /// (row, column) of the cursor in content coordinates, column in display cells.
    fn cursor_row_col(&self) -> (u16, u16) {
        let before = &self.buffer[..self.pos];
        let row = before.matches('\n').count() as u16;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let col = before[line_start..].width() as u16;
        (row, col)
    }

    fn keep_cursor_visible(&mut self, visible_rows: u16) {
        if visible_rows == 0 {
            return;
        }
        let (row, _) = self.cursor_row_col();
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + visible_rows {
            self.scroll_offset = row + 1 - visible_rows;
        }
    }

    fn insert_str(&mut self, text: &str) {
        let text = if self.multiline {
            text.to_string()
        } else {
            text.replace(['\r', '\n'], "")
        };
        self.buffer.insert_str(self.pos, &text);
        self.pos += text.len();
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl Component for TextField {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let visible_rows = area.height.saturating_sub(VERTICAL_OVERHEAD);
        self.keep_cursor_visible(visible_rows);

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title.as_str());

        let paragraph = if self.buffer.is_empty() && !self.focused {
            Paragraph::new(Text::styled(
                self.placeholder,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Paragraph::new(self.buffer.as_str()).scroll((self.scroll_offset, 0))
        };
        frame.render_widget(paragraph.block(block), area);

        if self.focused {
            let (row, col) = self.cursor_row_col();
            let x = (area.x + 1 + col).min(area.right().saturating_sub(2));
            let y = area.y + 1 + row.saturating_sub(self.scroll_offset);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for TextField {
    type Event = FieldEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                if *c == '\n' && !self.multiline {
                    return None;
                }
                self.buffer.insert(self.pos, *c);
                self.pos += c.len_utf8();
                Some(FieldEvent::Changed)
            }
            TuiEvent::Enter => {
                if self.multiline {
                    self.insert_str("\n");
                    Some(FieldEvent::Changed)
                } else {
                    Some(FieldEvent::Activated)
                }
            }
            TuiEvent::Paste(text) => {
                self.insert_str(text);
                Some(FieldEvent::Changed)
            }
            TuiEvent::Backspace => (self.pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.pos);
                self.buffer.drain(prev..self.pos);
                self.pos = prev;
                FieldEvent::Changed
            }),
            TuiEvent::Delete => (self.pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.pos);
                self.buffer.drain(self.pos..next);
                FieldEvent::Changed
            }),
            TuiEvent::CursorLeft => (self.pos > 0).then(|| {
                self.pos = prev_char_boundary(&self.buffer, self.pos);
                FieldEvent::Moved
            }),
            TuiEvent::CursorRight => (self.pos < self.buffer.len()).then(|| {
                self.pos = next_char_boundary(&self.buffer, self.pos);
                FieldEvent::Moved
            }),
            TuiEvent::Home => {
                let line_start = self.buffer[..self.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.pos != line_start).then(|| {
                    self.pos = line_start;
                    FieldEvent::Moved
                })
            }
            TuiEvent::End => {
                let line_end = self.buffer[self.pos..]
                    .find('\n')
                    .map(|i| self.pos + i)
                    .unwrap_or(self.buffer.len());
                (self.pos != line_end).then(|| {
                    self.pos = line_end;
                    FieldEvent::Moved
                })
            }
            _ => None,
        }
    }
}
