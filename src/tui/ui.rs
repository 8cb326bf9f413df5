use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::core::state::{App, ResultState, Route};
use crate::tui::component::Component;
use crate::tui::components::{LoginScreen, PromptChip, ResponsePanel, TitleBar};
use crate::tui::{Focus, TuiState};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const PROMPT_HEIGHT: u16 = 7;
const FIELD_HEIGHT: u16 = 3;
const BUTTON_HEIGHT: u16 = 3;
const HELP_TEXT: &str =
    "Tab: next field  Ctrl+S: submit  Ctrl+J: newline  Ctrl+X: clear prompt  Esc: quit";

/// Screen areas from the last frame, used for mouse hit testing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormLayout {
    pub prompt: Rect,
    pub file: Rect,
    pub submit: Rect,
    pub chip: Option<Rect>,
}

/// What a mouse click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Chip,
    Prompt,
    File,
    Submit,
}

/// The chip is drawn on top of everything else, so it wins over other regions.
pub fn hit_test(layout: &FormLayout, column: u16, row: u16) -> Option<Hit> {
    let position = Position::new(column, row);
    if layout.chip.is_some_and(|chip| chip.contains(position)) {
        return Some(Hit::Chip);
    }
    if layout.prompt.contains(position) {
        Some(Hit::Prompt)
    } else if layout.file.contains(position) {
        Some(Hit::File)
    } else if layout.submit.contains(position) {
        Some(Hit::Submit)
    } else {
        None
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let area = frame.area();
    let mut title_bar = TitleBar::new(app.endpoint().to_string(), app.status_message.clone());

    if let Route::Login { target } = &app.route {
        let [title_area, main_area] = Layout::vertical([Length(1), Min(0)]).areas(area);
        title_bar.render(frame, title_area);
        LoginScreen { target }.render(frame, main_area);
        tui.layout = FormLayout::default();
        return;
    }

    let result = app.result_state();
    let error_height = u16::from(matches!(result, ResultState::Failure(_)));
    let spinner_height = u16::from(result == ResultState::Loading);
    let [
        title_area,
        prompt_area,
        file_area,
        error_area,
        button_area,
        spinner_area,
        response_area,
        help_area,
    ] = Layout::vertical([
        Length(1),
        Length(PROMPT_HEIGHT),
        Length(FIELD_HEIGHT),
        Length(error_height),
        Length(BUTTON_HEIGHT),
        Length(spinner_height),
        Min(0),
        Length(1),
    ])
    .areas(area);

    title_bar.render(frame, title_area);

    tui.prompt_input.focused = tui.focus == Focus::Prompt;
    tui.prompt_input.render(frame, prompt_area);

    tui.file_input.focused = tui.focus == Focus::File;
    tui.file_input.title = match &app.file {
        Some(file) => format!("File (attached: {}, {})", file.file_name, file.size_label()),
        None => "File".to_string(),
    };
    tui.file_input.render(frame, file_area);

    draw_submit_button(frame, button_area, tui.focus == Focus::Submit);

    match result {
        ResultState::Idle => {}
        ResultState::Failure(error) => {
            let error_line =
                Paragraph::new(Span::styled(error, Style::default().fg(Color::Red)));
            frame.render_widget(error_line, error_area);
        }
        ResultState::Loading => {
            let glyph = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
            let spinner = Paragraph::new(Line::from(vec![
                Span::styled(glyph, Style::default().fg(Color::Blue)),
                Span::raw(" Generating..."),
            ]))
            .alignment(Alignment::Center);
            frame.render_widget(spinner, spinner_area);
        }
        ResultState::Success(response) => {
            if !response.is_empty() {
                ResponsePanel {
                    text: response,
                    state: &mut tui.response_panel,
                }
                .render(frame, response_area);
            }
        }
    }

    let help = Paragraph::new(Span::styled(HELP_TEXT, Style::default().fg(Color::DarkGray)))
        .wrap(Wrap { trim: true });
    frame.render_widget(help, help_area);

    tui.layout = FormLayout {
        prompt: prompt_area,
        file: file_area,
        submit: button_area,
        chip: None,
    };

    if app.shows_prompt_chip() {
        let mut chip = PromptChip::new(&app.prompt);
        let chip_area = chip.area(area);
        chip.render(frame, chip_area);
        tui.layout.chip = Some(chip_area);
    }
}

fn draw_submit_button(frame: &mut Frame, area: Rect, focused: bool) {
    let (style, border_style) = if focused {
        (
            Style::default()
                .fg(Color::Black)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Blue),
        )
    } else {
        (
            Style::default().fg(Color::Blue),
            Style::default().fg(Color::DarkGray),
        )
    };
    let button = Paragraph::new(Span::styled(" Submit ", style))
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(border_style),
        );
    frame.render_widget(button, area);
}
