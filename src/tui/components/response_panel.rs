//! # ResponsePanel Component
//!
//! Scrollable view of the formatted response.
//!
//! `ResponsePanel` is a transient component (created each frame) that wraps
//! `&'a mut ResponsePanelState` (persistent scroll state) and the formatted
//! response (props).

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::format::FormattedText;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::markdown;

/// Scroll state for the response panel.
/// Must be persisted in the parent TuiState.
#[derive(Default)]
pub struct ResponsePanelState {
    pub scroll_state: ScrollViewState,
    /// Height of the wrapped response at the last render
    pub content_height: u16,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl ResponsePanelState {
    /// Jump back to the top, used when a new response arrives.
    pub fn reset(&mut self) {
        self.scroll_state = ScrollViewState::default();
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for ResponsePanelState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        self.clamp_scroll();
        Some(())
    }
}

pub struct ResponsePanel<'a> {
    pub text: &'a FormattedText,
    pub state: &'a mut ResponsePanelState,
}

impl Component for ResponsePanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Green))
            .title("Response");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Leave one column for the scrollbar
        let content_width = inner.width.saturating_sub(1);
        let paragraph = Paragraph::new(markdown::render(self.text, Style::default()))
            .wrap(Wrap { trim: false });
        let content_height = paragraph.line_count(content_width) as u16;

        self.state.content_height = content_height;
        self.state.viewport_height = inner.height;
        self.state.clamp_scroll();

        let mut scroll_view = ScrollView::new(Size::new(content_width, content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, content_height));

        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}
