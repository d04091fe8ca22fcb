use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, instrument, warn};

use crate::core::errors::{ClientError, ClientResult};
use crate::core::types::{Notification, OutputFormat};
use crate::orchestration::upload_orchestrator::UploadOrchestrator;

const DOWNLOAD_FAILED: &str = "Download failed";

impl UploadOrchestrator {
    /// Save the displayed processed image as `processed_<unix-millis>.<ext>`.
    ///
    /// Writes into `dir`, or the configured download directory when `None`.
    /// With nothing displayed this is a silent no-op returning
    /// [`ClientError::NothingDisplayed`].
    #[instrument(skip(self, dir))]
    pub async fn download_current(
        &self,
        dir: Option<&Path>,
        format: OutputFormat,
    ) -> ClientResult<PathBuf> {
        let url = {
            let state = self.inner.state.lock();
            if !state.session.has_result() {
                return Err(ClientError::NothingDisplayed);
            }
            state.session.current_processed_url.clone()
        };

        let bytes = self
            .inner
            .service
            .fetch_resource(&url)
            .await
            .map_err(|source| {
                warn!("Failed to fetch {} for download: {}", url, source);
                self.inner.renderer.notify(&Notification::error(DOWNLOAD_FAILED));
                ClientError::TransportFailure {
                    message: DOWNLOAD_FAILED.to_string(),
                    source,
                }
            })?;

        let dir = dir.unwrap_or(self.inner.download_dir.as_path());
        let path = dir.join(download_file_name(format));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| {
                self.inner.renderer.notify(&Notification::error(DOWNLOAD_FAILED));
                ClientError::WriteFailed {
                    path: path.display().to_string(),
                    source,
                }
            })?;

        info!("Saved {} ({} bytes) to {}", url, bytes.len(), path.display());
        self.inner
            .renderer
            .notify(&Notification::success("Download started"));
        Ok(path)
    }
}

fn download_file_name(format: OutputFormat) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("processed_{}.{}", millis, format.as_str())
}
