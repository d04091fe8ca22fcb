// Render capability driven by the core
//
// The orchestrator never touches a UI toolkit directly; hosts implement
// `Renderer` and receive every visible state change through it.

pub mod log_renderer;
pub mod recording;

use crate::core::types::{BackgroundOption, Notification, PresentedResult};

pub use log_renderer::LogRenderer;
pub use recording::{RecordingRenderer, RenderEvent};

pub trait Renderer: Send + Sync {
    /// Hide intake and results, show the processing indicator
    fn show_uploading(&self);

    /// Update the progress bar and its phase label
    fn set_progress(&self, percent: f64, phase: &str);

    /// Show a freshly displayed result (original and processed side by side)
    fn show_result(&self, result: &PresentedResult);

    /// Swap only the processed image after a recolor
    fn update_processed(&self, result: &PresentedResult);

    /// Show the intake surface with nothing displayed
    fn show_idle(&self);

    /// Hide the processing indicator, show intake, and report `message`
    fn show_error(&self, message: &str);

    fn notify(&self, notification: &Notification);

    /// Highlight `selected` as the active background swatch
    fn reset_background_options(&self, selected: &BackgroundOption);
}
