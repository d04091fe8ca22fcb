use parking_lot::Mutex;

use crate::core::types::{BackgroundOption, Notification, PresentedResult};
use crate::render::Renderer;

/// Everything a [`RecordingRenderer`] was asked to show, in order
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Uploading,
    Progress { percent: f64, phase: String },
    Result(PresentedResult),
    ProcessedUpdated(PresentedResult),
    Idle,
    Error(String),
    Notification(Notification),
    BackgroundReset(BackgroundOption),
}

/// Renderer that records events instead of drawing them.
///
/// Lets a host-less test assert on exactly what the user would have seen.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Progress percentages in the order they were rendered
    pub fn progress_values(&self) -> Vec<f64> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Progress { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Notification(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: RenderEvent) {
        self.events.lock().push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn show_uploading(&self) {
        self.push(RenderEvent::Uploading);
    }

    fn set_progress(&self, percent: f64, phase: &str) {
        self.push(RenderEvent::Progress {
            percent,
            phase: phase.to_string(),
        });
    }

    fn show_result(&self, result: &PresentedResult) {
        self.push(RenderEvent::Result(result.clone()));
    }

    fn update_processed(&self, result: &PresentedResult) {
        self.push(RenderEvent::ProcessedUpdated(result.clone()));
    }

    fn show_idle(&self) {
        self.push(RenderEvent::Idle);
    }

    fn show_error(&self, message: &str) {
        self.push(RenderEvent::Error(message.to_string()));
    }

    fn notify(&self, notification: &Notification) {
        self.push(RenderEvent::Notification(notification.clone()));
    }

    fn reset_background_options(&self, selected: &BackgroundOption) {
        self.push(RenderEvent::BackgroundReset(selected.clone()));
    }
}
