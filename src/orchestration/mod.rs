pub mod download;
pub mod health;
pub mod intake;
pub mod presenter;
pub mod progress;
pub mod recolor;
pub mod upload_orchestrator;

// Re-export commonly used items
pub use health::{HealthMonitor, HealthStatus};
pub use intake::{Dispatch, FileIntake, FileSelection, IntakeSource};
pub use presenter::ResultPresenter;
pub use progress::{ProgressSimulator, ProgressState, ProgressTask, PROCESSING_PHASES};
pub use upload_orchestrator::{SubmitOutcome, UploadOrchestrator};
