//! # Request Lifecycle
//!
//! Runs one submission against the generation endpoint and reduces the
//! result to an [`Outcome`] the reducer can apply. This is the only place
//! that reads or invalidates the bearer token.
//!
//! ```text
//! token? ──no──▶ LoginRequired
//!   │yes
//!   ▼
//! POST ──401──▶ remove token ─▶ LoginRequired
//!   │ ──other non-2xx / bad body──▶ Failure("Failed to generate content")
//!   │ ──transport error──▶ Failure(message | "Something went wrong")
//!   ▼ 2xx
//! Success(format_response(content))
//! ```

use log::{info, warn};

use crate::core::credentials::{ACCESS_TOKEN_KEY, CredentialStore};
use crate::core::format::{FormattedText, format_response};
use crate::generation::{GenerationClient, GenerationError, Submission};

pub const REQUEST_FAILED_MESSAGE: &str = "Failed to generate content";
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(FormattedText),
    /// Inline error text.
    Failure(String),
    /// Token missing or rejected; the user has to log in again.
    LoginRequired,
}

/// Executes one submission. Never fails: every error becomes an [`Outcome`].
pub async fn execute(
    submission: &Submission,
    credentials: &dyn CredentialStore,
    client: &dyn GenerationClient,
) -> Outcome {
    let token = match credentials.get(ACCESS_TOKEN_KEY) {
        Ok(Some(token)) if !token.is_empty() => token,
        Ok(_) => {
            info!("No access token stored, login required");
            return Outcome::LoginRequired;
        }
        Err(e) => {
            warn!("Failed to read access token: {}", e);
            return Outcome::LoginRequired;
        }
    };

    match client.generate(submission, &token).await {
        Ok(body) => {
            let formatted = format_response(body.content.as_deref());
            info!("Generation succeeded: {} nodes", formatted.nodes.len());
            Outcome::Success(formatted)
        }
        Err(GenerationError::Unauthorized) => {
            info!("Access token rejected, clearing it");
            if let Err(e) = credentials.remove(ACCESS_TOKEN_KEY) {
                warn!("Failed to clear rejected access token: {}", e);
            }
            Outcome::LoginRequired
        }
        Err(GenerationError::Api { status, .. }) => {
            info!("Generation failed with HTTP {}", status);
            Outcome::Failure(REQUEST_FAILED_MESSAGE.to_string())
        }
        Err(GenerationError::Parse(e)) => {
            info!("Generation response unreadable: {}", e);
            Outcome::Failure(REQUEST_FAILED_MESSAGE.to_string())
        }
        Err(e @ (GenerationError::Network(_) | GenerationError::Config(_))) => {
            info!("Generation request did not complete: {:?}", e);
            Outcome::Failure(message_or_fallback(&e))
        }
    }
}

/// The error's own message, or the generic fallback when it has none.
fn message_or_fallback(error: &GenerationError) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
