// Error types for the client core
//
// Using thiserror so each failure class in the upload flow has its own
// variant, a readable Display message, and a chained source where one exists.

use thiserror::Error;

/// Errors raised while talking to the processing service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Invalid resource URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Errors surfaced by the orchestrator, recolor loop and download.
///
/// Every variant has already been reported to the renderer by the time it
/// is returned; callers are free to drop it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request rejected, non-success status, or undecodable envelope
    #[error("{message}")]
    TransportFailure {
        message: String,
        #[source]
        source: ServiceError,
    },

    /// Well-formed envelope carrying `success: false`
    #[error("{0}")]
    ApplicationFailure(String),

    /// Any failure inside the recolor loop (view state is left untouched)
    #[error("{message}")]
    RecolorFailure {
        message: String,
        #[source]
        source: Option<ServiceError>,
    },

    #[error("No processed image is currently displayed")]
    NothingDisplayed,

    /// A newer submission or recolor was issued while this one was in flight
    #[error("Response for request #{token} superseded by request #{latest}")]
    Superseded { token: u64, latest: u64 },

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid service base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Progress tick must be > 0 ms")]
    InvalidProgressTick,

    #[error("Progress increment must be > 0, got {0}")]
    InvalidProgressIncrement(f64),

    #[error("Progress ceiling must be in (0, 100), got {0}")]
    InvalidProgressCeiling(f64),

    #[error("Timeout must be > 0 seconds ({0})")]
    InvalidTimeout(&'static str),
}

// Convenience type aliases for Results
pub type ServiceResult<T> = Result<T, ServiceError>;
pub type ClientResult<T> = Result<T, ClientError>;
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ClientError {
    /// Whether this error came from a response that lost the sequencing race
    pub fn is_superseded(&self) -> bool {
        matches!(self, ClientError::Superseded { .. })
    }
}
