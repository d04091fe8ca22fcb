// Processing service boundary
//
// The orchestrator only talks to the background-removal service through this
// trait. `HttpProcessingService` is the real adapter; tests drive the core
// with a scripted implementation.

use async_trait::async_trait;

use crate::core::errors::ServiceResult;
use crate::core::types::{
    BackgroundOption, BatchResponse, FileHandle, HealthResponse, OutputFormat, ProcessingResult,
};

pub const UPLOAD_ENDPOINT: &str = "/api/upload";
pub const BATCH_UPLOAD_ENDPOINT: &str = "/api/batch-upload";
pub const HEALTH_ENDPOINT: &str = "/api/health";

/// Single-image request: multipart `file`, `background_color`, `output_format`
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: FileHandle,
    pub background: BackgroundOption,
    pub format: OutputFormat,
}

/// Batch request: every file under the shared `files` field
#[derive(Debug, Clone)]
pub struct BatchUploadRequest {
    pub files: Vec<FileHandle>,
    pub background: BackgroundOption,
    pub format: OutputFormat,
}

#[async_trait]
pub trait ProcessingService: Send + Sync {
    /// `POST /api/upload`. Also used to recomposite an already processed image.
    async fn upload(&self, request: UploadRequest) -> ServiceResult<ProcessingResult>;

    /// `POST /api/batch-upload`
    async fn batch_upload(&self, request: BatchUploadRequest) -> ServiceResult<BatchResponse>;

    /// Fetch the raw bytes behind a URL returned by the service
    async fn fetch_resource(&self, url: &str) -> ServiceResult<Vec<u8>>;

    /// `GET /api/health`
    async fn health(&self) -> ServiceResult<HealthResponse>;
}
