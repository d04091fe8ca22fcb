// Recolor loop: re-submit the displayed cut-out with a new background
//
// Only the processed half of the display changes. The original image, its
// size and file name stay as they were when first displayed.

use tracing::{debug, info, instrument, warn};

use crate::core::errors::{ClientError, ClientResult, ServiceError};
use crate::core::types::{
    BackgroundOption, FileHandle, Notification, OutputFormat, PresentedResult, ViewState,
};
use crate::orchestration::presenter::ResultPresenter;
use crate::orchestration::upload_orchestrator::UploadOrchestrator;
use crate::services::processing::UploadRequest;

const RECOLOR_FAILED: &str = "Failed to change background";
const FALLBACK_FILE_NAME: &str = "processed.png";

impl UploadOrchestrator {
    /// Recomposite the current processed image onto `color`.
    ///
    /// The chosen swatch is highlighted right away, but the session only
    /// records it once the service succeeds. Failures put the highlight back,
    /// leave the previous result visible and raise an error notification. A
    /// response overtaken by a newer submission or recolor is dropped without
    /// touching the display.
    #[instrument(skip(self, color))]
    pub async fn recolor(
        &self,
        color: impl Into<BackgroundOption>,
    ) -> ClientResult<PresentedResult> {
        let color = color.into();

        let (token, processed_url) = {
            let mut state = self.inner.state.lock();
            if state.view != ViewState::Displaying || !state.session.has_result() {
                drop(state);
                return Err(self.recolor_failed(RECOLOR_FAILED.to_string(), None, None));
            }
            let url = state.session.current_processed_url.clone();
            (state.issue_token(), url)
        };
        self.inner.renderer.reset_background_options(&color);
        info!("Recoloring {} onto '{}' as request #{}", processed_url, color, token);

        let bytes = match self.inner.service.fetch_resource(&processed_url).await {
            Ok(bytes) => bytes,
            Err(source) => {
                let previous = self.background_if_latest(token)?;
                return Err(self.recolor_failed(
                    RECOLOR_FAILED.to_string(),
                    Some(source),
                    Some(&previous),
                ));
            }
        };

        let request = UploadRequest {
            file: FileHandle::new(file_name_from_url(&processed_url), bytes),
            background: color.clone(),
            format: OutputFormat::Png,
        };
        let response = self.inner.service.upload(request).await;

        let mut state = self.inner.state.lock();
        self.ensure_latest(&state, token)?;

        let result = match response {
            Err(source) => {
                let previous = state.session.active_background.clone();
                drop(state);
                return Err(self.recolor_failed(
                    RECOLOR_FAILED.to_string(),
                    Some(source),
                    Some(&previous),
                ));
            }
            Ok(result) if !result.is_displayable() => {
                let previous = state.session.active_background.clone();
                drop(state);
                let message = result
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| RECOLOR_FAILED.to_string());
                return Err(self.recolor_failed(message, None, Some(&previous)));
            }
            Ok(result) => result,
        };

        state.session.active_background = color;
        state.session.current_processed_url = result.processed_url.clone();
        let presented = match state.session.current_result.as_mut() {
            Some(current) => {
                current.processed_url = result.processed_url;
                current.processed_size = result.processed_size;
                ResultPresenter::present(current)
            }
            // Unreachable while Displaying, but keep the new image either way
            None => ResultPresenter::present(&result),
        };
        drop(state);

        self.inner.metrics.record_recolor();
        self.inner.presenter.display_recolor(&presented);
        debug!("Recolor #{} displayed {}", token, presented.processed_url);
        Ok(presented)
    }

    /// Committed background, provided `token` is still the latest request
    fn background_if_latest(&self, token: u64) -> ClientResult<BackgroundOption> {
        let state = self.inner.state.lock();
        self.ensure_latest(&state, token)?;
        Ok(state.session.active_background.clone())
    }

    fn recolor_failed(
        &self,
        message: String,
        source: Option<ServiceError>,
        restore: Option<&BackgroundOption>,
    ) -> ClientError {
        match &source {
            Some(err) => warn!("Recolor failed: {} ({})", message, err),
            None => warn!("Recolor failed: {}", message),
        }
        if let Some(previous) = restore {
            self.inner.renderer.reset_background_options(previous);
        }
        self.inner.renderer.notify(&Notification::error(message.clone()));
        ClientError::RecolorFailure { message, source }
    }
}

/// Last path segment of a resource URL, without any query string
pub(crate) fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => FALLBACK_FILE_NAME.to_string(),
    }
}
