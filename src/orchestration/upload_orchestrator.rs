// Upload Orchestrator: owns the view state machine and the session
//
// Idle --submit--> Uploading --success--> Displaying
//                           --failure--> Error (intake visible again)
//
// Every submission and recolor takes a sequence token. Only the response to
// the most recently issued token may touch state; anything older is dropped.

use parking_lot::{Mutex, MutexGuard};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::core::config::Config;
use crate::core::errors::{ClientError, ClientResult, ServiceResult};
use crate::core::types::{
    BackgroundOption, BatchResponse, Notification, OutputFormat, PresentedResult,
    ProcessingResult, SessionState, ViewState,
};
use crate::orchestration::intake::{Dispatch, FileSelection};
use crate::orchestration::presenter::ResultPresenter;
use crate::orchestration::progress::{ProgressSimulator, PROCESSING_PHASES};
use crate::render::Renderer;
use crate::services::processing::{BatchUploadRequest, ProcessingService, UploadRequest};
use crate::utils::Metrics;

const UPLOAD_FAILED: &str = "Upload failed";
const PROCESSING_FAILED: &str = "Processing failed";
const BATCH_UPLOAD_FAILED: &str = "Batch upload failed";
const BATCH_PROCESSING_FAILED: &str = "Batch processing failed";

/// What a submission ended up showing
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Empty selection, nothing was sent
    Ignored,
    Displayed(PresentedResult),
    /// Batch summary; only the first successful entry is displayed
    Batch {
        processed: usize,
        total: usize,
        displayed: Option<PresentedResult>,
    },
}

pub(crate) struct OrchestratorState {
    pub(crate) view: ViewState,
    pub(crate) session: SessionState,
    latest_token: u64,
}

impl OrchestratorState {
    pub(crate) fn issue_token(&mut self) -> u64 {
        self.latest_token += 1;
        self.latest_token
    }

    pub(crate) fn latest_token(&self) -> u64 {
        self.latest_token
    }
}

pub(crate) struct OrchestratorInner {
    pub(crate) service: Arc<dyn ProcessingService>,
    pub(crate) renderer: Arc<dyn Renderer>,
    pub(crate) presenter: ResultPresenter,
    pub(crate) progress: ProgressSimulator,
    pub(crate) state: Mutex<OrchestratorState>,
    pub(crate) metrics: Metrics,
    pub(crate) download_dir: PathBuf,
}

/// Client core. Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct UploadOrchestrator {
    pub(crate) inner: Arc<OrchestratorInner>,
}

impl UploadOrchestrator {
    pub fn new(
        config: &Config,
        service: Arc<dyn ProcessingService>,
        renderer: Arc<dyn Renderer>,
        metrics: Metrics,
    ) -> Self {
        Self {
            inner: Arc::new(OrchestratorInner {
                service,
                presenter: ResultPresenter::new(Arc::clone(&renderer)),
                progress: ProgressSimulator::new(config.progress.clone(), Arc::clone(&renderer)),
                renderer,
                state: Mutex::new(OrchestratorState {
                    view: ViewState::Idle,
                    session: SessionState::default(),
                    latest_token: 0,
                }),
                metrics,
                download_dir: config.download_dir().clone(),
            }),
        }
    }

    pub fn view_state(&self) -> ViewState {
        self.inner.state.lock().view.clone()
    }

    /// Read-only copy of the session
    pub fn session(&self) -> SessionState {
        self.inner.state.lock().session.clone()
    }

    pub fn progress(&self) -> &ProgressSimulator {
        &self.inner.progress
    }

    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    /// Send a selection to the service and display the outcome.
    ///
    /// Failures are shown to the user before being returned.
    #[instrument(skip(self, selection), fields(files = selection.len()))]
    pub async fn submit(&self, selection: FileSelection) -> ClientResult<SubmitOutcome> {
        let count = selection.len();
        let Some(dispatch) = selection.into_dispatch() else {
            debug!("Empty selection, nothing to submit");
            return Ok(SubmitOutcome::Ignored);
        };

        let token = {
            let mut state = self.inner.state.lock();
            state.view = ViewState::Uploading;
            state.issue_token()
        };
        self.inner.metrics.record_submission(count);
        info!("Submitting {} image(s) as request #{}", count, token);

        self.inner.renderer.show_uploading();
        let progress = self.inner.progress.start();

        match dispatch {
            Dispatch::Single(file) => {
                let request = UploadRequest {
                    file,
                    background: BackgroundOption::transparent(),
                    format: OutputFormat::Png,
                };
                let response = self.inner.service.upload(request).await;
                progress.cancel();
                self.finish_single(token, response)
            }
            Dispatch::Batch(files) => {
                let request = BatchUploadRequest {
                    files,
                    background: BackgroundOption::transparent(),
                    format: OutputFormat::Png,
                };
                let response = self.inner.service.batch_upload(request).await;
                progress.cancel();
                self.finish_batch(token, response)
            }
        }
    }

    /// Back to a blank Idle session.
    ///
    /// Responses still in flight are discarded when they arrive.
    pub fn reset(&self) {
        {
            let mut state = self.inner.state.lock();
            state.issue_token();
            state.view = ViewState::Idle;
            state.session = SessionState::default();
        }
        self.inner.progress.cancel_active();
        self.inner.renderer.show_idle();
        info!("Session reset");
    }

    fn finish_single(
        &self,
        token: u64,
        response: ServiceResult<ProcessingResult>,
    ) -> ClientResult<SubmitOutcome> {
        let mut state = self.inner.state.lock();
        self.ensure_latest(&state, token)?;

        match response {
            Err(source) => {
                self.fail_submission(state, UPLOAD_FAILED.to_string());
                Err(ClientError::TransportFailure {
                    message: UPLOAD_FAILED.to_string(),
                    source,
                })
            }
            // A success with nothing to show would leave the session empty
            // while Displaying
            Ok(result) if !result.is_displayable() => {
                let message = result
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| PROCESSING_FAILED.to_string());
                self.fail_submission(state, message.clone());
                Err(ClientError::ApplicationFailure(message))
            }
            Ok(result) => {
                let presented = ResultPresenter::apply(&mut state.session, result);
                state.view = ViewState::Displaying;
                drop(state);

                self.show_displayed(&presented);
                info!("Displaying {}", presented.processed_url);
                Ok(SubmitOutcome::Displayed(presented))
            }
        }
    }

    fn finish_batch(
        &self,
        token: u64,
        response: ServiceResult<BatchResponse>,
    ) -> ClientResult<SubmitOutcome> {
        let mut state = self.inner.state.lock();
        self.ensure_latest(&state, token)?;

        match response {
            Err(source) => {
                self.fail_submission(state, BATCH_UPLOAD_FAILED.to_string());
                Err(ClientError::TransportFailure {
                    message: BATCH_UPLOAD_FAILED.to_string(),
                    source,
                })
            }
            Ok(batch) if !batch.success => {
                let message = batch
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| BATCH_PROCESSING_FAILED.to_string());
                self.fail_submission(state, message.clone());
                Err(ClientError::ApplicationFailure(message))
            }
            Ok(batch) => {
                let (processed, total) = (batch.processed, batch.total);
                let first = batch
                    .results
                    .into_iter()
                    .find(ProcessingResult::is_displayable);

                let displayed = match first {
                    Some(result) => {
                        let presented = ResultPresenter::apply(&mut state.session, result);
                        state.view = ViewState::Displaying;
                        Some(presented)
                    }
                    None => {
                        state.view = ViewState::Idle;
                        None
                    }
                };
                drop(state);

                self.inner.renderer.notify(&Notification::success(format!(
                    "Processed {} of {} images",
                    processed, total
                )));
                match &displayed {
                    Some(presented) => self.show_displayed(presented),
                    None => {
                        warn!("Batch returned no successful images");
                        self.inner.renderer.show_idle();
                    }
                }

                info!("Batch finished: {} of {} processed", processed, total);
                Ok(SubmitOutcome::Batch {
                    processed,
                    total,
                    displayed,
                })
            }
        }
    }

    /// Reject a response whose token has been superseded
    pub(crate) fn ensure_latest(&self, state: &OrchestratorState, token: u64) -> ClientResult<()> {
        let latest = state.latest_token();
        if token == latest {
            return Ok(());
        }

        self.inner.metrics.record_stale_response();
        debug!("Discarding response #{} (latest is #{})", token, latest);
        Err(ClientError::Superseded { token, latest })
    }

    fn fail_submission(&self, mut state: MutexGuard<'_, OrchestratorState>, message: String) {
        state.view = ViewState::Error(message.clone());
        drop(state);

        warn!("Submission failed: {}", message);
        self.inner.renderer.show_error(&message);
    }

    fn show_displayed(&self, presented: &PresentedResult) {
        // Real completion, not the simulator, takes the bar to 100%
        let last_phase = PROCESSING_PHASES[PROCESSING_PHASES.len() - 1];
        self.inner.renderer.set_progress(100.0, last_phase);
        self.inner.presenter.display(presented);
    }
}
