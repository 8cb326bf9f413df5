//! # TitleBar Component
//!
//! Top status bar showing the endpoint and the current status message.
//!
//! TitleBar is purely presentational: it receives all data as props and has no
//! internal state.
//!
//! 1. **Status message**: `"Ross AI (endpoint: http://…) | Generating..."`
//! 2. **Default**: `"Ross AI (endpoint: http://…)"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

pub struct TitleBar {
    /// Generation endpoint URL
    pub endpoint: String,
    /// Status message (e.g., "Generating...", "Login required")
    pub status_message: String,
}

impl TitleBar {
    pub fn new(endpoint: String, status_message: String) -> Self {
        Self {
            endpoint,
            status_message,
        }
    }

    fn text(&self) -> String {
        if self.status_message.is_empty() {
            format!("Ross AI (endpoint: {})", self.endpoint)
        } else {
            format!(
                "Ross AI (endpoint: {}) | {}",
                self.endpoint, self.status_message
            )
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let span = Span::styled(self.text(), Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(span, area);
    }
}
