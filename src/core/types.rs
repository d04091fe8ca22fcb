// Data model shared by intake, orchestration and rendering

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A single file picked by the user
#[derive(Clone)]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    pub content: Arc<Vec<u8>>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: content.len() as u64,
            content: Arc::new(content),
        }
    }

    /// Read a file from disk, naming the handle after the path's file name
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.png".to_string());
        Ok(Self::new(name, content))
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish()
    }
}

/// Canonical description of one processed image and its original
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub processed_url: String,
    #[serde(default)]
    pub original_url: String,
    #[serde(default)]
    pub processed_size: u64,
    #[serde(default)]
    pub original_size: u64,
    #[serde(default)]
    pub original_filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingResult {
    /// Successful and pointing at an image that can be shown
    pub fn is_displayable(&self) -> bool {
        self.success && !self.processed_url.is_empty()
    }
}

/// Envelope returned by the batch endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub processed: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub results: Vec<ProcessingResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchResponse {
    /// First entry the service reports as processed, if any
    pub fn first_success(&self) -> Option<&ProcessingResult> {
        self.results.iter().find(|r| r.is_displayable())
    }
}

/// Readiness report from the health endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Background color sent as `background_color`
///
/// Either `transparent`, a named preset (`red`, `white`, ...) or a custom
/// value such as `#ff8800`. The service interprets the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackgroundOption(String);

impl BackgroundOption {
    pub const TRANSPARENT: &'static str = "transparent";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn transparent() -> Self {
        Self(Self::TRANSPARENT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_transparent(&self) -> bool {
        self.0 == Self::TRANSPARENT
    }
}

impl Default for BackgroundOption {
    fn default() -> Self {
        Self::transparent()
    }
}

impl fmt::Display for BackgroundOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BackgroundOption {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Image format requested from the service or used for downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Webp,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }
}

/// Client-visible mode. Exactly one is active at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Idle,
    Uploading,
    Displaying,
    /// Idle with the last failure message kept for display
    Error(String),
}

impl ViewState {
    /// Idle or error-Idle: the intake surface is visible
    pub fn is_idle(&self) -> bool {
        matches!(self, ViewState::Idle | ViewState::Error(_))
    }
}

/// Process-wide session data owned by the orchestrator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Empty iff nothing has been displayed since the last reset
    pub current_processed_url: String,
    pub current_original_filename: String,
    pub active_background: BackgroundOption,
    pub current_result: Option<ProcessingResult>,
}

impl SessionState {
    pub fn has_result(&self) -> bool {
        !self.current_processed_url.is_empty()
    }
}

/// Kind of user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Toast-style message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }
}

/// A result ready for display: image references plus formatted sizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedResult {
    pub original_url: String,
    pub processed_url: String,
    pub original_size: String,
    pub processed_size: String,
    pub original_filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_envelope_decodes() {
        let json = r#"{
            "success": true,
            "processed_url": "/static/processed/a.png",
            "original_url": "/static/uploads/a.png",
            "processed_size": 1500000,
            "original_size": 2000000,
            "original_filename": "a.png",
            "processed_filename": "a_nobg.png",
            "timestamp": "2024-01-01T00:00:00"
        }"#;

        let result: ProcessingResult = serde_json::from_str(json).unwrap();
        assert!(result.success);
        assert_eq!(result.processed_size, 1_500_000);
        assert_eq!(result.processed_filename.as_deref(), Some("a_nobg.png"));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_error_only_envelope_decodes() {
        let result: ProcessingResult =
            serde_json::from_str(r#"{"error": "Invalid file type"}"#).unwrap();

        assert!(!result.success);
        assert!(result.processed_url.is_empty());
        assert_eq!(result.error.as_deref(), Some("Invalid file type"));
    }

    #[test]
    fn test_batch_first_success_skips_failures() {
        let json = r#"{
            "success": true,
            "processed": 1,
            "total": 2,
            "results": [
                {"success": false, "original_filename": "bad.gif", "error": "boom"},
                {"success": true, "processed_url": "/p/good.png", "original_filename": "good.png"}
            ]
        }"#;

        let batch: BatchResponse = serde_json::from_str(json).unwrap();
        let first = batch.first_success().unwrap();
        assert_eq!(first.original_filename, "good.png");
        assert_eq!(first.processed_size, 0);
    }

    #[test]
    fn test_success_without_processed_url_is_not_displayable() {
        let batch: BatchResponse = serde_json::from_str(
            r#"{
                "success": true,
                "processed": 2,
                "total": 2,
                "results": [
                    {"success": true, "original_filename": "empty.png"},
                    {"success": true, "processed_url": "/p/ok.png", "original_filename": "ok.png"}
                ]
            }"#,
        )
        .unwrap();

        assert!(!batch.results[0].is_displayable());
        assert_eq!(batch.first_success().unwrap().original_filename, "ok.png");
    }

    #[test]
    fn test_view_state_idle_includes_error() {
        assert!(ViewState::Idle.is_idle());
        assert!(ViewState::Error("x".into()).is_idle());
        assert!(!ViewState::Uploading.is_idle());
        assert!(!ViewState::Displaying.is_idle());
    }

    #[test]
    fn test_file_handle_debug_hides_content() {
        let handle = FileHandle::new("a.png", vec![1, 2, 3]);
        assert_eq!(handle.size, 3);
        assert_eq!(format!("{:?}", handle), r#"FileHandle { name: "a.png", size: 3 }"#);
    }
}
