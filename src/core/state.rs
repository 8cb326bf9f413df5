//! # Application State
//!
//! Core form state for Ross. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── client: Arc<dyn GenerationClient>    // generation endpoint
//! ├── credentials: Arc<dyn CredentialStore> // bearer token storage
//! ├── prompt: String                       // prompt text
//! ├── file: Option<Attachment>             // selected upload
//! ├── response: Option<FormattedText>      // last formatted response
//! ├── error: Option<String>                // inline error message
//! ├── is_loading: bool                     // request in flight
//! ├── route: Route                         // form or login screen
//! ├── login_path: String                   // redirect target
//! ├── generation: u64                      // latest issued submission
//! └── status_message: String               // title bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::credentials::CredentialStore;
use crate::core::format::FormattedText;
use crate::generation::{Attachment, GenerationClient};

/// Which screen is active. `Login` stands in for a navigation to the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Form,
    Login { target: String },
}

/// The single visible result region, derived from [`App`].
#[derive(Debug, PartialEq)]
pub enum ResultState<'a> {
    Idle,
    Loading,
    Success(&'a FormattedText),
    Failure(&'a str),
}

pub struct App {
    pub client: Arc<dyn GenerationClient>,
    pub credentials: Arc<dyn CredentialStore>,
    pub prompt: String,
    pub file: Option<Attachment>,
    pub response: Option<FormattedText>,
    pub error: Option<String>,
    pub is_loading: bool,
    pub route: Route,
    pub login_path: String,
    /// Incremented on every submit that issues a request. Completions carrying
    /// an older value are stale and ignored.
    pub generation: u64,
    pub status_message: String,
}

impl App {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        credentials: Arc<dyn CredentialStore>,
        login_path: String,
    ) -> Self {
        Self {
            client,
            credentials,
            prompt: String::new(),
            file: None,
            response: None,
            error: None,
            is_loading: false,
            route: Route::Form,
            login_path,
            generation: 0,
            status_message: String::from("Ready"),
        }
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    pub fn result_state(&self) -> ResultState<'_> {
        if self.is_loading {
            ResultState::Loading
        } else if let Some(error) = &self.error {
            ResultState::Failure(error)
        } else if let Some(response) = &self.response {
            ResultState::Success(response)
        } else {
            ResultState::Idle
        }
    }

    /// True when the prompt chip overlay should be shown.
    pub fn shows_prompt_chip(&self) -> bool {
        !self.prompt.is_empty()
    }
}
