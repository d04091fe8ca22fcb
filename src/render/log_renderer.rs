use tracing::{debug, error, info};

use crate::core::types::{BackgroundOption, Notification, NotificationKind, PresentedResult};
use crate::render::Renderer;

/// Renderer for the terminal host: state changes go to the log,
/// notifications and results are printed for the user.
#[derive(Debug, Default)]
pub struct LogRenderer;

impl LogRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for LogRenderer {
    fn show_uploading(&self) {
        info!("Uploading...");
    }

    fn set_progress(&self, percent: f64, phase: &str) {
        debug!("Progress {:>3.0}% - {}", percent, phase);
    }

    fn show_result(&self, result: &PresentedResult) {
        println!(
            "Original:  {} ({})",
            result.original_url, result.original_size
        );
        println!(
            "Processed: {} ({})",
            result.processed_url, result.processed_size
        );
    }

    fn update_processed(&self, result: &PresentedResult) {
        println!(
            "Processed: {} ({})",
            result.processed_url, result.processed_size
        );
    }

    fn show_idle(&self) {
        info!("Ready for new images");
    }

    fn show_error(&self, message: &str) {
        error!("{}", message);
    }

    fn notify(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Success => println!("✓ {}", notification.message),
            NotificationKind::Error => eprintln!("✗ {}", notification.message),
        }
    }

    fn reset_background_options(&self, selected: &BackgroundOption) {
        debug!("Background option: {}", selected);
    }
}
