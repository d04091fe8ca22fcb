// Scripted processing service for orchestrator tests
//
// Responses are queued per endpoint and may carry a delay, so tests can make
// an earlier request resolve after a later one.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::core::errors::{ServiceError, ServiceResult};
use crate::core::types::{BatchResponse, HealthResponse, ProcessingResult};
use crate::services::processing::{BatchUploadRequest, ProcessingService, UploadRequest};

/// One recorded call against the fake
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload {
        file_name: String,
        content: Vec<u8>,
        background: String,
        format: String,
    },
    Batch {
        file_names: Vec<String>,
        background: String,
        format: String,
    },
    Fetch(String),
    Health,
}

enum Reply<T> {
    Ok(T, Duration),
    Err(ServiceError, Duration),
}

#[derive(Default)]
pub struct ScriptedService {
    uploads: Mutex<VecDeque<Reply<ProcessingResult>>>,
    batches: Mutex<VecDeque<Reply<BatchResponse>>>,
    health: Mutex<VecDeque<Reply<HealthResponse>>>,
    resources: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_upload(&self, result: ProcessingResult) -> &Self {
        self.push_upload_after(result, Duration::ZERO)
    }

    pub fn push_upload_after(&self, result: ProcessingResult, delay: Duration) -> &Self {
        self.uploads.lock().push_back(Reply::Ok(result, delay));
        self
    }

    pub fn push_upload_error(&self, status: u16) -> &Self {
        self.uploads.lock().push_back(Reply::Err(status_error(status), Duration::ZERO));
        self
    }

    pub fn push_batch(&self, response: BatchResponse) -> &Self {
        self.batches.lock().push_back(Reply::Ok(response, Duration::ZERO));
        self
    }

    pub fn push_batch_error(&self, status: u16) -> &Self {
        self.batches.lock().push_back(Reply::Err(status_error(status), Duration::ZERO));
        self
    }

    pub fn push_health(&self, response: HealthResponse) -> &Self {
        self.health.lock().push_back(Reply::Ok(response, Duration::ZERO));
        self
    }

    pub fn push_health_error(&self, status: u16) -> &Self {
        self.health.lock().push_back(Reply::Err(status_error(status), Duration::ZERO));
        self
    }

    pub fn serve_resource(&self, url: &str, bytes: Vec<u8>) -> &Self {
        self.resources.lock().insert(url.to_string(), bytes);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn upload_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Upload { .. }))
            .collect()
    }

    pub fn batch_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Batch { .. }))
            .collect()
    }
}

fn status_error(status: u16) -> ServiceError {
    ServiceError::Status {
        status,
        body: "scripted failure".to_string(),
    }
}

async fn resolve<T>(reply: Option<Reply<T>>, endpoint: &str) -> ServiceResult<T> {
    match reply {
        Some(Reply::Ok(value, delay)) => {
            tokio::time::sleep(delay).await;
            Ok(value)
        }
        Some(Reply::Err(err, delay)) => {
            tokio::time::sleep(delay).await;
            Err(err)
        }
        None => Err(ServiceError::Status {
            status: 599,
            body: format!("no scripted reply for {}", endpoint),
        }),
    }
}

#[async_trait]
impl ProcessingService for ScriptedService {
    async fn upload(&self, request: UploadRequest) -> ServiceResult<ProcessingResult> {
        self.calls.lock().push(Call::Upload {
            file_name: request.file.name.clone(),
            content: request.file.content.as_ref().clone(),
            background: request.background.as_str().to_string(),
            format: request.format.as_str().to_string(),
        });
        let reply = self.uploads.lock().pop_front();
        resolve(reply, "upload").await
    }

    async fn batch_upload(&self, request: BatchUploadRequest) -> ServiceResult<BatchResponse> {
        self.calls.lock().push(Call::Batch {
            file_names: request.files.iter().map(|f| f.name.clone()).collect(),
            background: request.background.as_str().to_string(),
            format: request.format.as_str().to_string(),
        });
        let reply = self.batches.lock().pop_front();
        resolve(reply, "batch").await
    }

    async fn fetch_resource(&self, url: &str) -> ServiceResult<Vec<u8>> {
        self.calls.lock().push(Call::Fetch(url.to_string()));
        let bytes = self.resources.lock().get(url).cloned();
        bytes.ok_or_else(|| ServiceError::Status {
            status: 404,
            body: format!("{} not found", url),
        })
    }

    async fn health(&self) -> ServiceResult<HealthResponse> {
        self.calls.lock().push(Call::Health);
        let reply = self.health.lock().pop_front();
        resolve(reply, "health").await
    }
}

/// A successful single-image envelope for tests
pub fn processed(name: &str, processed_url: &str, processed_size: u64) -> ProcessingResult {
    ProcessingResult {
        success: true,
        processed_url: processed_url.to_string(),
        original_url: format!("/static/uploads/{}", name),
        processed_size,
        original_size: processed_size * 2,
        original_filename: name.to_string(),
        processed_filename: None,
        error: None,
    }
}
