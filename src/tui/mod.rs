//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the form,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinner animates.
//! - **Idle**: sleeps up to 500ms and only redraws on events or background
//!   actions.
//!
//! ## Background Work
//!
//! Requests and file reads run in tokio tasks. They report back by sending an
//! `Action` through a std `mpsc` channel that the loop drains between frames.
//! Issuing a new request aborts the previous task; a completion that still
//! slips through carries an old generation and is dropped by `update()`.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::expand_home;
use crate::core::controller;
use crate::core::state::{App, Route};
use crate::generation::{Attachment, Submission};
use crate::tui::component::EventHandler;
use crate::tui::components::{FieldEvent, ResponsePanelState, TextField};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::{FormLayout, Hit, hit_test};

/// Which form control receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Prompt,
    File,
    Submit,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Prompt => Focus::File,
            Focus::File => Focus::Submit,
            Focus::Submit => Focus::Prompt,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Prompt => Focus::Submit,
            Focus::File => Focus::Prompt,
            Focus::Submit => Focus::File,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub prompt_input: TextField,
    pub file_input: TextField,
    pub response_panel: ResponsePanelState,
    pub focus: Focus,
    /// Areas from the last frame, for mouse hit testing
    pub layout: FormLayout,
}

impl TuiState {
    pub fn new(prompt: &str, file_path: &str) -> Self {
        let mut prompt_input = TextField::new("Prompt", "Enter your prompt", true);
        prompt_input.set_text(prompt);
        let mut file_input = TextField::new("File", "Path to a file, then Enter", false);
        file_input.set_text(file_path);
        Self {
            prompt_input,
            file_input,
            response_panel: ResponsePanelState::default(),
            focus: Focus::Prompt,
            layout: FormLayout::default(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Keyboard enhancement is ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Runs the interactive form until the user quits.
///
/// `file_path` pre-fills the file field; the caller attaches the file itself.
pub fn run(mut app: App, file_path: Option<String>) -> std::io::Result<()> {
    let mut tui = TuiState::new(&app.prompt, file_path.as_deref().unwrap_or_default());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let (tx, rx) = mpsc::channel();
    let mut active_request: Option<AbortHandle> = None;

    let start_time = Instant::now();
    let mut needs_redraw = true;

    'main: loop {
        if app.is_loading {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effect = handle_event(&mut app, &mut tui, event, &tx);
            if !apply_effect(&app, effect, &mut active_request, &tx) {
                break 'main;
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let finished = matches!(action, Action::SubmissionFinished { .. });
            let effect = update(&mut app, action);
            if finished && !app.is_loading {
                tui.response_panel.reset();
                active_request = None;
            }
            if !apply_effect(&app, effect, &mut active_request, &tx) {
                break 'main;
            }
        }
    }

    if let Some(handle) = active_request.take() {
        handle.abort();
    }
    ratatui::restore();
    Ok(())
}

/// Performs the I/O an effect asks for. Returns `false` when the loop should stop.
fn apply_effect(
    app: &App,
    effect: Effect,
    active_request: &mut Option<AbortHandle>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => {}
        Effect::SpawnRequest {
            generation,
            submission,
        } => {
            if let Some(previous) = active_request.take() {
                debug!("Aborting superseded request");
                previous.abort();
            }
            *active_request = Some(spawn_request(app, generation, submission, tx.clone()));
        }
        Effect::Redirect(target) => {
            info!("Redirecting to {}", target);
        }
        Effect::Quit => return false,
    }
    if !app.is_loading
        && let Some(stale) = active_request.take()
    {
        debug!("Aborting request superseded by a rejected submit");
        stale.abort();
    }
    true
}

/// Routes one terminal event through focus handling and the form controls.
pub fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    tx: &mpsc::Sender<Action>,
) -> Effect {
    if matches!(event, TuiEvent::Quit) {
        return update(app, Action::Quit);
    }

    if let Route::Login { .. } = app.route {
        return match event {
            TuiEvent::Enter => update(app, Action::ReturnToForm),
            _ => Effect::None,
        };
    }

    match event {
        TuiEvent::Resize => Effect::None,
        TuiEvent::Submit => update(app, Action::Submit),
        TuiEvent::DismissChip => dismiss_chip(app, tui),
        TuiEvent::FocusNext => {
            tui.focus = tui.focus.next();
            Effect::None
        }
        TuiEvent::FocusPrev => {
            tui.focus = tui.focus.prev();
            Effect::None
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.response_panel.handle_event(&event);
            Effect::None
        }
        TuiEvent::MouseClick(column, row) => match hit_test(&tui.layout, column, row) {
            Some(Hit::Chip) => dismiss_chip(app, tui),
            Some(Hit::Prompt) => {
                tui.focus = Focus::Prompt;
                Effect::None
            }
            Some(Hit::File) => {
                tui.focus = Focus::File;
                Effect::None
            }
            Some(Hit::Submit) => {
                tui.focus = Focus::Submit;
                update(app, Action::Submit)
            }
            None => Effect::None,
        },
        _ => match tui.focus {
            Focus::Prompt => {
                if let Some(FieldEvent::Changed) = tui.prompt_input.handle_event(&event) {
                    update(app, Action::SetPrompt(tui.prompt_input.text().to_string()))
                } else {
                    Effect::None
                }
            }
            Focus::File => match tui.file_input.handle_event(&event) {
                Some(FieldEvent::Activated) => {
                    let raw = tui.file_input.text().trim().to_string();
                    if raw.is_empty() {
                        update(app, Action::DetachFile)
                    } else {
                        spawn_attach(raw, tx.clone());
                        Effect::None
                    }
                }
                Some(FieldEvent::Changed) if tui.file_input.text().is_empty() => {
                    update(app, Action::DetachFile)
                }
                _ => Effect::None,
            },
            Focus::Submit => match event {
                TuiEvent::Enter | TuiEvent::InputChar(' ') => update(app, Action::Submit),
                _ => Effect::None,
            },
        },
    }
}

fn dismiss_chip(app: &mut App, tui: &mut TuiState) -> Effect {
    tui.prompt_input.set_text("");
    update(app, Action::DismissPromptChip)
}

fn spawn_attach(raw_path: String, tx: mpsc::Sender<Action>) {
    let path: PathBuf = expand_home(&raw_path);
    info!("Reading attachment {}", path.display());
    tokio::spawn(async move {
        let action = match Attachment::from_path(&path).await {
            Ok(attachment) => Action::AttachFile(attachment),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                Action::AttachFailed(format!("Could not read {}: {}", raw_path, e))
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to send attachment result: receiver dropped");
        }
    });
}

fn spawn_request(
    app: &App,
    generation: u64,
    submission: Submission,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!(
        "Spawning generation request (generation={}, file={})",
        generation, submission.file.file_name
    );

    let client = app.client.clone();
    let credentials = app.credentials.clone();

    let handle = tokio::spawn(async move {
        let outcome =
            controller::execute(&submission, credentials.as_ref(), client.as_ref()).await;
        if tx
            .send(Action::SubmissionFinished {
                generation,
                outcome,
            })
            .is_err()
        {
            warn!("Failed to send SubmissionFinished: receiver dropped");
        }
    });
    handle.abort_handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::MISSING_FILE_MESSAGE;
    use crate::core::controller::Outcome;
    use crate::core::credentials::MemoryCredentialStore;
    use crate::generation::GenerateResponse;
    use crate::test_support::{ScriptedClient, test_app, test_attachment};
    use std::sync::Arc;

    fn setup() -> (App, TuiState, mpsc::Sender<Action>, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        (test_app(), TuiState::new("", ""), tx, rx)
    }

    fn type_text(app: &mut App, tui: &mut TuiState, tx: &mpsc::Sender<Action>, text: &str) {
        for c in text.chars() {
            handle_event(app, tui, TuiEvent::InputChar(c), tx);
        }
    }

    #[test]
    fn test_focus_cycles() {
        assert_eq!(Focus::Prompt.next(), Focus::File);
        assert_eq!(Focus::Submit.next(), Focus::Prompt);
        assert_eq!(Focus::Prompt.prev(), Focus::Submit);
        assert_eq!(Focus::File.prev(), Focus::Prompt);
    }

    #[test]
    fn test_typing_updates_prompt() {
        let (mut app, mut tui, tx, _rx) = setup();
        type_text(&mut app, &mut tui, &tx, "Summarize");
        assert_eq!(app.prompt, "Summarize");
        assert!(app.shows_prompt_chip());
    }

    #[test]
    fn test_dismiss_chip_clears_prompt_field() {
        let (mut app, mut tui, tx, _rx) = setup();
        type_text(&mut app, &mut tui, &tx, "Summarize");
        handle_event(&mut app, &mut tui, TuiEvent::DismissChip, &tx);
        assert!(app.prompt.is_empty());
        assert_eq!(tui.prompt_input.text(), "");
    }

    #[test]
    fn test_submit_without_file_shows_error() {
        let (mut app, mut tui, tx, rx) = setup();
        let effect = handle_event(&mut app, &mut tui, TuiEvent::Submit, &tx);
        assert_eq!(effect, Effect::None);
        assert_eq!(app.error.as_deref(), Some(MISSING_FILE_MESSAGE));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_enter_on_submit_button() {
        let (mut app, mut tui, tx, _rx) = setup();
        app.file = Some(test_attachment());
        handle_event(&mut app, &mut tui, TuiEvent::FocusNext, &tx);
        handle_event(&mut app, &mut tui, TuiEvent::FocusNext, &tx);
        assert_eq!(tui.focus, Focus::Submit);
        let effect = handle_event(&mut app, &mut tui, TuiEvent::Enter, &tx);
        assert!(matches!(effect, Effect::SpawnRequest { generation: 1, .. }));
        assert!(app.is_loading);
    }

    #[test]
    fn test_clearing_file_field_detaches() {
        let (mut app, mut tui, tx, _rx) = setup();
        app.file = Some(test_attachment());
        tui.file_input.set_text("a");
        tui.focus = Focus::File;
        handle_event(&mut app, &mut tui, TuiEvent::Backspace, &tx);
        assert!(app.file.is_none());
    }

    #[test]
    fn test_login_route_only_accepts_enter_and_quit() {
        let (mut app, mut tui, tx, _rx) = setup();
        app.route = Route::Login {
            target: "/login".to_string(),
        };
        handle_event(&mut app, &mut tui, TuiEvent::InputChar('x'), &tx);
        assert!(app.prompt.is_empty());
        handle_event(&mut app, &mut tui, TuiEvent::Enter, &tx);
        assert_eq!(app.route, Route::Form);
        assert_eq!(
            handle_event(&mut app, &mut tui, TuiEvent::Quit, &tx),
            Effect::Quit
        );
    }

    #[test]
    fn test_click_on_chip_dismisses() {
        let (mut app, mut tui, tx, _rx) = setup();
        type_text(&mut app, &mut tui, &tx, "Hi");
        tui.layout.chip = Some(ratatui::layout::Rect::new(70, 0, 10, 1));
        handle_event(&mut app, &mut tui, TuiEvent::MouseClick(72, 0), &tx);
        assert!(app.prompt.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_file_field_enter_attaches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let (mut app, mut tui, tx, rx) = setup();
        tui.focus = Focus::File;
        tui.file_input.set_text(path.to_str().unwrap());
        handle_event(&mut app, &mut tui, TuiEvent::Enter, &tx);

        let action = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        update(&mut app, action);
        let file = app.file.as_ref().unwrap();
        assert_eq!(file.file_name, "report.pdf");
        assert_eq!(file.bytes, b"%PDF-1.4");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_file_field_missing_path_reports_error() {
        let (mut app, mut tui, tx, rx) = setup();
        tui.focus = Focus::File;
        tui.file_input.set_text("/definitely/not/here.txt");
        handle_event(&mut app, &mut tui, TuiEvent::Enter, &tx);

        let action = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        update(&mut app, action);
        assert!(app.file.is_none());
        assert!(
            app.error
                .as_deref()
                .unwrap()
                .starts_with("Could not read /definitely/not/here.txt")
        );
    }

    #[tokio::test]
    async fn test_rejected_submit_aborts_request_in_flight() {
        let (mut app, _tui, tx, _rx) = setup();
        let pending = tokio::spawn(std::future::pending::<()>());
        let mut active_request = Some(pending.abort_handle());

        let effect = update(&mut app, Action::Submit);
        assert_eq!(effect, Effect::None);
        assert!(apply_effect(&app, effect, &mut active_request, &tx));

        assert!(active_request.is_none());
        assert!(pending.await.unwrap_err().is_cancelled());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_spawn_request_reports_outcome() {
        let client = Arc::new(ScriptedClient::new(Ok(GenerateResponse {
            content: Some("**Hi**".to_string()),
        })));
        let app = App::new(
            client.clone(),
            Arc::new(MemoryCredentialStore::with_token("abc")),
            "/login".to_string(),
        );
        let (tx, rx) = mpsc::channel();
        let submission = Submission {
            prompt: "Summarize".to_string(),
            file: test_attachment(),
        };
        spawn_request(&app, 7, submission, tx);

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            Action::SubmissionFinished {
                generation,
                outcome: Outcome::Success(text),
            } => {
                assert_eq!(generation, 7);
                assert_eq!(text.to_html(), "<strong>Hi</strong>");
            }
            other => panic!("unexpected action: {other:?}"),
        }
        assert_eq!(client.last_token().as_deref(), Some("abc"));
    }
}
