use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector for the client.
///
/// Tracks service calls, their latency, and how often the orchestrator
/// submitted, recolored, or dropped a superseded response.
/// Cheap to clone; all clones share the same counters.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    // Service call metrics
    requests_total: AtomicUsize,
    requests_success: AtomicUsize,
    requests_failed: AtomicUsize,
    request_latency_ms: RwLock<Vec<u64>>,

    // Per-endpoint request counters
    endpoint_counters: DashMap<String, AtomicUsize>,

    // Orchestration metrics
    submissions: AtomicUsize,
    images_submitted: AtomicUsize,
    recolors: AtomicUsize,
    stale_responses: AtomicUsize,

    // Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                requests_total: AtomicUsize::new(0),
                requests_success: AtomicUsize::new(0),
                requests_failed: AtomicUsize::new(0),
                request_latency_ms: RwLock::new(Vec::new()),
                endpoint_counters: DashMap::new(),
                submissions: AtomicUsize::new(0),
                images_submitted: AtomicUsize::new(0),
                recolors: AtomicUsize::new(0),
                stale_responses: AtomicUsize::new(0),
                start_time: Instant::now(),
            }),
        }
    }

    // Service call metrics
    pub fn record_request(&self, endpoint: &str, success: bool, duration: Duration) {
        self.inner.requests_total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.inner.requests_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.inner.requests_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.inner
            .request_latency_ms
            .write()
            .push(duration.as_millis() as u64);
        self.inner
            .endpoint_counters
            .entry(endpoint.to_string())
            .or_insert_with(|| AtomicUsize::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    // Orchestration metrics
    pub fn record_submission(&self, num_images: usize) {
        self.inner.submissions.fetch_add(1, Ordering::Relaxed);
        self.inner
            .images_submitted
            .fetch_add(num_images, Ordering::Relaxed);
    }

    pub fn record_recolor(&self) {
        self.inner.recolors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_response(&self) {
        self.inner.stale_responses.fetch_add(1, Ordering::Relaxed);
    }

    // Get snapshot for reporting
    pub fn snapshot(&self) -> MetricsSnapshot {
        let latency = self.inner.request_latency_ms.read();
        let latency_avg = avg(&latency);
        let latency_p95 = percentile(&latency, 0.95);
        drop(latency);

        let endpoints = self
            .inner
            .endpoint_counters
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect();

        MetricsSnapshot {
            requests_total: self.inner.requests_total.load(Ordering::Relaxed),
            requests_success: self.inner.requests_success.load(Ordering::Relaxed),
            requests_failed: self.inner.requests_failed.load(Ordering::Relaxed),
            request_latency_avg_ms: latency_avg,
            request_latency_p95_ms: latency_p95,
            endpoints,
            submissions: self.inner.submissions.load(Ordering::Relaxed),
            images_submitted: self.inner.images_submitted.load(Ordering::Relaxed),
            recolors: self.inner.recolors.load(Ordering::Relaxed),
            stale_responses: self.inner.stale_responses.load(Ordering::Relaxed),
            uptime_seconds: self.inner.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub requests_total: usize,
    pub requests_success: usize,
    pub requests_failed: usize,
    pub request_latency_avg_ms: u64,
    pub request_latency_p95_ms: u64,
    pub endpoints: BTreeMap<String, usize>,
    pub submissions: usize,
    pub images_submitted: usize,
    pub recolors: usize,
    pub stale_responses: usize,
    pub uptime_seconds: u64,
}

fn percentile(values: &[u64], p: f64) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let idx = ((values.len() as f64 - 1.0) * p) as usize;
    sorted[idx]
}

fn avg(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    values.iter().sum::<u64>() / values.len() as u64
}
