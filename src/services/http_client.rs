use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, instrument, warn};

use crate::core::config::Config;
use crate::core::errors::{ServiceError, ServiceResult};
use crate::core::types::{BatchResponse, FileHandle, HealthResponse, ProcessingResult};
use crate::services::processing::{
    BatchUploadRequest, ProcessingService, UploadRequest, BATCH_UPLOAD_ENDPOINT, HEALTH_ENDPOINT,
    UPLOAD_ENDPOINT,
};
use crate::utils::Metrics;

/// Metrics label for fetches of service-hosted images
const RESOURCE_ENDPOINT: &str = "resource";

/// HTTP adapter for the background-removal service
pub struct HttpProcessingService {
    base_url: Url,
    http_client: reqwest::Client,
    metrics: Option<Metrics>,
}

impl HttpProcessingService {
    /// Create a client for the configured service base URL
    pub fn new(config: &Config, metrics: Option<Metrics>) -> Result<Self> {
        let base_url = Url::parse(config.base_url())
            .with_context(|| format!("Invalid service base URL: {}", config.base_url()))?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url,
            http_client,
            metrics,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a service path or absolute URL against the base URL
    pub fn resolve(&self, path_or_url: &str) -> ServiceResult<Url> {
        self.base_url
            .join(path_or_url)
            .map_err(|e| ServiceError::InvalidUrl {
                url: path_or_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Send a request and turn non-success statuses into errors
    async fn execute(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> ServiceResult<reqwest::Response> {
        let start = Instant::now();

        let result = match request.send().await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!("{} responded with status {}: {}", endpoint, status, body);
                Err(ServiceError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
            Err(e) => {
                warn!("{} request failed: {}", endpoint, e);
                Err(ServiceError::Request(e))
            }
        };

        if let Some(ref m) = self.metrics {
            m.record_request(endpoint, result.is_ok(), start.elapsed());
        }

        result
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ServiceResult<T> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn file_part(file: &FileHandle) -> Part {
    Part::bytes(file.content.as_ref().clone()).file_name(file.name.clone())
}

#[async_trait]
impl ProcessingService for HttpProcessingService {
    #[instrument(skip(self, request), fields(file = %request.file.name, background = %request.background))]
    async fn upload(&self, request: UploadRequest) -> ServiceResult<ProcessingResult> {
        let url = self.resolve(UPLOAD_ENDPOINT)?;
        debug!("Uploading {} ({} bytes)", request.file.name, request.file.size);

        let form = Form::new()
            .part("file", file_part(&request.file))
            .text("background_color", request.background.as_str().to_string())
            .text("output_format", request.format.as_str());

        let response = self
            .execute(UPLOAD_ENDPOINT, self.http_client.post(url).multipart(form))
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, request), fields(files = request.files.len()))]
    async fn batch_upload(&self, request: BatchUploadRequest) -> ServiceResult<BatchResponse> {
        let url = self.resolve(BATCH_UPLOAD_ENDPOINT)?;

        let form = request
            .files
            .iter()
            .fold(Form::new(), |form, file| form.part("files", file_part(file)))
            .text("background_color", request.background.as_str().to_string())
            .text("output_format", request.format.as_str());

        let response = self
            .execute(BATCH_UPLOAD_ENDPOINT, self.http_client.post(url).multipart(form))
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn fetch_resource(&self, url: &str) -> ServiceResult<Vec<u8>> {
        let url = self.resolve(url)?;
        let response = self
            .execute(RESOURCE_ENDPOINT, self.http_client.get(url))
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn health(&self) -> ServiceResult<HealthResponse> {
        let url = self.resolve(HEALTH_ENDPOINT)?;
        let response = self
            .execute(HEALTH_ENDPOINT, self.http_client.get(url))
            .await?;
        Self::decode(response).await
    }
}
