// Library exports for the background-removal upload client
//
// The core (intake, orchestration, progress, presentation, recolor) talks to
// the outside world only through `ProcessingService` and `Renderer`.

// Core modules
pub mod core;
pub mod orchestration;
pub mod render;
pub mod services;
pub mod utils;

// Re-export commonly used types and functions
pub use core::{
    config::Config,
    errors::{ClientError, ConfigError, ServiceError},
    types::{
        BackgroundOption, FileHandle, Notification, NotificationKind, OutputFormat,
        PresentedResult, ProcessingResult, SessionState, ViewState,
    },
};

pub use orchestration::{
    FileIntake, HealthMonitor, HealthStatus, IntakeSource, SubmitOutcome, UploadOrchestrator,
};

pub use render::{LogRenderer, RecordingRenderer, RenderEvent, Renderer};

pub use services::{HttpProcessingService, ProcessingService};

pub use utils::{format_size, Metrics};
