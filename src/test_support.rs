//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::credentials::MemoryCredentialStore;
use crate::core::state::App;
use crate::generation::{
    Attachment, GenerateResponse, GenerationClient, GenerationError, Submission,
};

/// A client that returns the same canned result for every call and records tokens.
pub struct ScriptedClient {
    result: Result<GenerateResponse, GenerationError>,
    tokens: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(result: Result<GenerateResponse, GenerationError>) -> Self {
        Self {
            result,
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }

    pub fn last_token(&self) -> Option<String> {
        self.tokens.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    fn endpoint(&self) -> &str {
        "http://test.invalid/generate"
    }

    async fn generate(
        &self,
        _submission: &Submission,
        token: &str,
    ) -> Result<GenerateResponse, GenerationError> {
        self.tokens.lock().unwrap().push(token.to_string());
        self.result.clone()
    }
}

pub fn test_attachment() -> Attachment {
    Attachment::new("notes.txt", b"meeting notes".to_vec())
}

pub fn test_submission() -> Submission {
    Submission {
        prompt: "Summarize".to_string(),
        file: test_attachment(),
    }
}

/// Creates a test App with a ScriptedClient and an empty credential store.
pub fn test_app() -> App {
    App::new(
        Arc::new(ScriptedClient::new(Ok(GenerateResponse::default()))),
        Arc::new(MemoryCredentialStore::default()),
        "/login".to_string(),
    )
}
