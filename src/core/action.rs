//! # Actions
//!
//! Everything that can happen in Ross becomes an `Action`.
//! User submits the form? That's `Action::Submit`.
//! The request finishes? That's `Action::SubmissionFinished { .. }`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing the I/O the
//! adapter should perform. No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info};

use crate::core::controller::Outcome;
use crate::core::state::{App, Route};
use crate::generation::{Attachment, Submission};

pub const MISSING_FILE_MESSAGE: &str = "Please upload a file";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetPrompt(String),
    /// Clears the prompt only; nothing else in the form changes.
    DismissPromptChip,
    AttachFile(Attachment),
    DetachFile,
    /// A selected path could not be read.
    AttachFailed(String),
    Submit,
    SubmissionFinished { generation: u64, outcome: Outcome },
    ReturnToForm,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Run the request for `submission` and report back with `generation`.
    SpawnRequest { generation: u64, submission: Submission },
    /// Token missing or rejected; navigate to the login target.
    Redirect(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::SetPrompt(prompt) => {
            app.prompt = prompt;
            Effect::None
        }
        Action::DismissPromptChip => {
            app.prompt.clear();
            Effect::None
        }
        Action::AttachFile(attachment) => {
            app.status_message = format!("Attached {}", attachment.file_name);
            app.file = Some(attachment);
            Effect::None
        }
        Action::DetachFile => {
            app.file = None;
            Effect::None
        }
        Action::AttachFailed(message) => {
            app.response = None;
            app.error = Some(message);
            Effect::None
        }
        Action::Submit => {
            // Every submit supersedes whatever is still in flight, valid or not
            app.generation += 1;
            app.error = None;
            app.response = None;
            app.is_loading = true;

            let Some(file) = app.file.clone() else {
                app.error = Some(MISSING_FILE_MESSAGE.to_string());
                app.is_loading = false;
                return Effect::None;
            };

            app.status_message = String::from("Generating...");
            info!(
                "Submit accepted: generation={}, file={}",
                app.generation, file.file_name
            );
            Effect::SpawnRequest {
                generation: app.generation,
                submission: Submission {
                    prompt: app.prompt.clone(),
                    file,
                },
            }
        }
        Action::SubmissionFinished {
            generation,
            outcome,
        } => {
            if generation != app.generation {
                debug!(
                    "Dropping stale completion: generation={} (latest={})",
                    generation, app.generation
                );
                return Effect::None;
            }

            app.is_loading = false;
            match outcome {
                Outcome::Success(formatted) => {
                    app.error = None;
                    app.response = Some(formatted);
                    app.status_message = String::from("Done");
                    Effect::None
                }
                Outcome::Failure(message) => {
                    app.response = None;
                    app.error = Some(message);
                    app.status_message = String::from("Failed");
                    Effect::None
                }
                Outcome::LoginRequired => {
                    app.route = Route::Login {
                        target: app.login_path.clone(),
                    };
                    app.status_message = String::from("Login required");
                    Effect::Redirect(app.login_path.clone())
                }
            }
        }
        Action::ReturnToForm => {
            app.route = Route::Form;
            app.status_message = String::from("Ready");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
