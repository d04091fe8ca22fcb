pub mod http_client;
pub mod processing;

#[cfg(test)]
pub(crate) mod scripted;

// Re-export commonly used types
pub use http_client::HttpProcessingService;
pub use processing::{BatchUploadRequest, ProcessingService, UploadRequest};
