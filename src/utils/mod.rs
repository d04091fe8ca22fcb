pub mod format;
pub mod metrics;

// Re-export commonly used items
pub use format::format_size;
pub use metrics::{Metrics, MetricsSnapshot};
