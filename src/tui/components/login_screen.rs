//! # Login Screen Component
//!
//! Shown instead of the form when the access token is missing or was rejected.
//! The login flow itself is external; this screen only points the user at it.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub struct LoginScreen<'a> {
    /// Redirect target (e.g. "/login")
    pub target: &'a str,
}

impl Component for LoginScreen<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);
        let lines = vec![
            Line::from(Span::styled(
                "Login required",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Your access token is missing or was rejected."),
            Line::from(vec![
                Span::raw("Sign in at "),
                Span::styled(self.target.to_string(), Style::default().fg(Color::Cyan)),
                Span::raw(", then store the new token with:"),
            ]),
            Line::from(Span::styled(
                "ross token set <TOKEN>",
                Style::default().fg(Color::Green),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Enter: back to the form   Esc: quit",
                dim,
            )),
        ];

        let height = lines.len() as u16;
        let [centered] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);

        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            centered,
        );
    }
}
