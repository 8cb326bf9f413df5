//! HTTP client for the generation endpoint.
//!
//! One multipart `POST` per submission:
//! - `file`: the attachment bytes, with its file name and MIME type
//! - `prompt`: the prompt text
//!
//! The bearer token is supplied per call; the client never stores it.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};

use crate::generation::{GenerateResponse, GenerationClient, GenerationError, Submission};

pub struct HttpGenerationClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpGenerationClient {
    /// Creates a client posting to `endpoint`.
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the generation route
    /// * `timeout` - Optional whole-request timeout
    pub fn new(endpoint: String, timeout: Option<Duration>) -> Result<Self, GenerationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GenerationError::Config(e.to_string()))?;
        Ok(Self { endpoint, client })
    }

    fn build_form(submission: &Submission) -> Result<Form, GenerationError> {
        let file = &submission.file;
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime)
            .map_err(|e| GenerationError::Config(format!("invalid MIME type {}: {e}", file.mime)))?;
        Ok(Form::new()
            .part("file", part)
            .text("prompt", submission.prompt.clone()))
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn generate(
        &self,
        submission: &Submission,
        token: &str,
    ) -> Result<GenerateResponse, GenerationError> {
        let form = Self::build_form(submission)?;

        info!(
            "Generation request: endpoint={}, file={} ({} bytes, {}), prompt_len={}",
            self.endpoint,
            submission.file.file_name,
            submission.file.bytes.len(),
            submission.file.mime,
            submission.prompt.len(),
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", token))
            .multipart(form)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Generation response status: {}", status);

        if status == StatusCode::UNAUTHORIZED {
            warn!("Generation endpoint rejected the bearer token");
            return Err(GenerationError::Unauthorized);
        }

        if !status.is_success() {
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Generation API error: {} - {}", status.as_u16(), err_body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;
        debug!("Generation response body: {} bytes", body.len());

        serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to decode generation response: {}", e);
            GenerationError::Parse(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::Attachment;

    #[test]
    fn test_client_keeps_endpoint() {
        let client =
            HttpGenerationClient::new("http://localhost:8080/gemini/generate-content".into(), None)
                .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/gemini/generate-content"
        );
    }

    #[test]
    fn test_build_form_rejects_invalid_mime() {
        let submission = Submission {
            prompt: "p".to_string(),
            file: Attachment {
                file_name: "a.txt".to_string(),
                mime: "not a mime".to_string(),
                bytes: vec![1, 2, 3],
            },
        };
        let err = HttpGenerationClient::build_form(&submission).unwrap_err();
        assert!(matches!(err, GenerationError::Config(_)));
    }
}
