use std::io;
use std::path::Path;

use serde::Deserialize;

/// A file read into memory, ready to be sent as the `file` multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Reads `path` and names the attachment after its final component.
    pub async fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// Human-readable size for the file field ("12 B", "3.4 KB", "1.2 MB").
    pub fn size_label(&self) -> String {
        let len = self.bytes.len() as f64;
        if len < 1024.0 {
            format!("{} B", self.bytes.len())
        } else if len < 1024.0 * 1024.0 {
            format!("{:.1} KB", len / 1024.0)
        } else {
            format!("{:.1} MB", len / (1024.0 * 1024.0))
        }
    }
}

/// Maps a file extension to a MIME type. Unknown extensions are sent as octet-stream.
fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}

/// One submit: the prompt text plus the attached file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub prompt: String,
    pub file: Attachment,
}

/// Success body of the generation endpoint.
///
/// Only `content` is read; a missing or null field decodes as `None`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct GenerateResponse {
    #[serde(default)]
    pub content: Option<String>,
}
