pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items for convenience
pub use config::Config;
pub use errors::{ClientError, ConfigError, ServiceError};
pub use types::{
    BackgroundOption, BatchResponse, FileHandle, HealthResponse, Notification,
    NotificationKind, OutputFormat, PresentedResult, ProcessingResult, SessionState, ViewState,
};
