// One-shot readiness probe run at host startup

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::services::processing::ProcessingService;

/// What the startup probe learned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Ready,
    ModelNotLoaded,
    Unreachable,
    /// The probe had already run; nothing was sent
    AlreadyProbed,
}

/// Checks the service once. Results are logged only; no UI state changes
/// and no retries.
pub struct HealthMonitor {
    service: Arc<dyn ProcessingService>,
    fired: AtomicBool,
}

impl HealthMonitor {
    pub fn new(service: Arc<dyn ProcessingService>) -> Self {
        Self {
            service,
            fired: AtomicBool::new(false),
        }
    }

    /// Probe the health endpoint. Only the first call does anything.
    pub async fn probe_once(&self) -> HealthStatus {
        if self.fired.swap(true, Ordering::SeqCst) {
            return HealthStatus::AlreadyProbed;
        }

        match self.service.health().await {
            Ok(health) if health.model_loaded => {
                info!("Processing service ready");
                HealthStatus::Ready
            }
            Ok(_) => {
                warn!("Model not fully loaded");
                HealthStatus::ModelNotLoaded
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
                HealthStatus::Unreachable
            }
        }
    }

    /// Run the probe as a detached task so intake is never blocked
    pub fn spawn(self: Arc<Self>) -> JoinHandle<HealthStatus> {
        tokio::spawn(async move { self.probe_once().await })
    }
}
