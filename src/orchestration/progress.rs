// Simulated upload progress
//
// The service gives no progress feedback, so while a request is outstanding a
// repeating task nudges a bounded estimate forward. The estimate stops at the
// ceiling; only a real result may show completion.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::core::config::ProgressConfig;
use crate::render::Renderer;

/// Status labels shown while the service works, in order
pub const PROCESSING_PHASES: [&str; 3] = [
    "Analyzing subject…",
    "Refining edges…",
    "Finalizing output…",
];

/// Percentages the estimate must exceed to enter phase 1 and phase 2
const PHASE_THRESHOLDS: [f64; 2] = [30.0, 60.0];

/// Current estimate of one simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressState {
    pub percent: f64,
    pub phase_index: usize,
}

impl ProgressState {
    pub fn phase_label(&self) -> &'static str {
        PROCESSING_PHASES[self.phase_index]
    }

    /// Apply one tick. Returns `false` once the ceiling is reached.
    ///
    /// Negative increments are ignored so the estimate never moves backwards.
    /// The phase moves at most one step per tick.
    pub fn advance(&mut self, increment: f64, ceiling: f64) -> bool {
        self.percent += increment.max(0.0);

        let running = if self.percent >= ceiling {
            self.percent = ceiling;
            false
        } else {
            true
        };

        if self.phase_index == 0 && self.percent > PHASE_THRESHOLDS[0] {
            self.phase_index = 1;
        } else if self.phase_index == 1 && self.percent > PHASE_THRESHOLDS[1] {
            self.phase_index = 2;
        }

        running
    }
}

#[derive(Debug, Default)]
struct Counters {
    started: AtomicUsize,
    cancelled: AtomicUsize,
}

/// Starts progress simulations; at most one is live at a time
pub struct ProgressSimulator {
    config: ProgressConfig,
    renderer: Arc<dyn Renderer>,
    active: Mutex<Option<Arc<ProgressTask>>>,
    counters: Arc<Counters>,
}

impl ProgressSimulator {
    pub fn new(config: ProgressConfig, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            config,
            renderer,
            active: Mutex::new(None),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Reset to 0% / phase 0 and start ticking.
    ///
    /// A simulation still running from an earlier submission is cancelled
    /// first. Must be called from within a tokio runtime.
    pub fn start(&self) -> Arc<ProgressTask> {
        if let Some(previous) = self.active.lock().take() {
            previous.cancel();
        }

        let state = Arc::new(Mutex::new(ProgressState::default()));
        let cancelled = Arc::new(AtomicBool::new(false));
        self.renderer.set_progress(0.0, PROCESSING_PHASES[0]);

        let handle = spawn_tick_loop(
            Arc::clone(&self.renderer),
            self.config.clone(),
            Arc::clone(&state),
            Arc::clone(&cancelled),
        );

        let task = Arc::new(ProgressTask {
            state,
            cancelled,
            handle: Mutex::new(Some(handle)),
            counters: Arc::clone(&self.counters),
        });
        self.counters.started.fetch_add(1, Ordering::Relaxed);
        *self.active.lock() = Some(Arc::clone(&task));
        task
    }

    /// Cancel whatever simulation is live. No-op if none is.
    pub fn cancel_active(&self) -> bool {
        match self.active.lock().take() {
            Some(task) => task.cancel(),
            None => false,
        }
    }

    pub fn started_count(&self) -> usize {
        self.counters.started.load(Ordering::Relaxed)
    }

    pub fn cancelled_count(&self) -> usize {
        self.counters.cancelled.load(Ordering::Relaxed)
    }
}

/// Handle to one running simulation
pub struct ProgressTask {
    state: Arc<Mutex<ProgressState>>,
    cancelled: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
    counters: Arc<Counters>,
}

impl ProgressTask {
    /// Stop the simulation. Returns `true` only for the call that stopped it.
    ///
    /// Waits for a tick that is mid-render, so nothing simulated is rendered
    /// once this returns.
    pub fn cancel(&self) -> bool {
        // Ticks render under this lock
        let _state = self.state.lock();
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return false;
        }
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
        self.counters.cancelled.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> ProgressState {
        *self.state.lock()
    }
}

impl Drop for ProgressTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.get_mut().take() {
            handle.abort();
        }
    }
}

fn spawn_tick_loop(
    renderer: Arc<dyn Renderer>,
    config: ProgressConfig,
    state: Arc<Mutex<ProgressState>>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let tick = Duration::from_millis(config.tick_ms);
        let mut ticker = interval_at(Instant::now() + tick, tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let increment = rand::random::<f64>() * config.max_increment;
            let running = {
                let mut state = state.lock();
                if cancelled.load(Ordering::SeqCst) {
                    break;
                }
                let running = state.advance(increment, config.ceiling);
                renderer.set_progress(state.percent, state.phase_label());
                running
            };

            if !running {
                debug!("Progress reached {}%, waiting for result", config.ceiling);
                break;
            }
        }
    })
}
