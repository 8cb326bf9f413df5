use std::fmt;

use async_trait::async_trait;

use super::types::{GenerateResponse, Submission};

/// Errors that can occur while talking to the generation endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Client misconfigured (bad URL, invalid MIME type, TLS setup).
    Config(String),
    /// The endpoint rejected the bearer token (HTTP 401).
    Unauthorized,
    /// The endpoint answered with any other non-2xx status.
    Api { status: u16, message: String },
    /// Transport failure: the request never produced a response.
    /// The message may be empty when the underlying error carries none.
    Network(String),
    /// A 2xx body that could not be decoded.
    Parse(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Config(msg) => write!(f, "config error: {msg}"),
            GenerationError::Unauthorized => write!(f, "unauthorized"),
            GenerationError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            GenerationError::Network(msg) => write!(f, "{msg}"),
            GenerationError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for GenerationError {}

#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// The URL submissions are posted to.
    fn endpoint(&self) -> &str;

    /// Uploads the submission with `token` as bearer credential and returns the decoded body.
    async fn generate(
        &self,
        submission: &Submission,
        token: &str,
    ) -> Result<GenerateResponse, GenerationError>;
}
