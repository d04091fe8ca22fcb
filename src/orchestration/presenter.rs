use std::sync::Arc;

use crate::core::types::{BackgroundOption, PresentedResult, ProcessingResult, SessionState};
use crate::render::Renderer;
use crate::utils::format_size;

/// Turns processing results into visible state
pub struct ResultPresenter {
    renderer: Arc<dyn Renderer>,
}

impl ResultPresenter {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self { renderer }
    }

    /// Format a result for display without touching any state
    pub fn present(result: &ProcessingResult) -> PresentedResult {
        PresentedResult {
            original_url: result.original_url.clone(),
            processed_url: result.processed_url.clone(),
            original_size: format_size(result.original_size),
            processed_size: format_size(result.processed_size),
            original_filename: result.original_filename.clone(),
        }
    }

    /// Record `result` as the current one in the orchestrator's session.
    ///
    /// Replaces any previous result wholesale and selects the default
    /// background again.
    pub fn apply(session: &mut SessionState, result: ProcessingResult) -> PresentedResult {
        let presented = Self::present(&result);
        session.current_processed_url = result.processed_url.clone();
        session.current_original_filename = result.original_filename.clone();
        session.active_background = BackgroundOption::transparent();
        session.current_result = Some(result);
        presented
    }

    /// Show a full (non-recolor) result and reset the background swatches
    pub fn display(&self, presented: &PresentedResult) {
        self.renderer.show_result(presented);
        self.renderer
            .reset_background_options(&BackgroundOption::transparent());
    }

    /// Show the processed half of a recolored result
    pub fn display_recolor(&self, presented: &PresentedResult) {
        self.renderer.update_processed(presented);
    }
}
