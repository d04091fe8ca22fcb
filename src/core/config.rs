use crate::core::errors::ConfigError;
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Processing service connection settings
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

/// Progress simulation settings
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Interval between simulated progress steps
    pub tick_ms: u64,
    /// Upper bound (exclusive) of the random increment added per tick
    pub max_increment: f64,
    /// Percentage at which the simulator stops advancing on its own
    pub ceiling: f64,
}

/// Local output settings
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub download_dir: PathBuf,
}

/// Main client configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub progress: ProgressConfig,
    pub output: OutputConfig,
    pub log_level: Level,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_ms: 200,
            max_increment: 12.0,
            ceiling: 90.0,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    ///
    /// `Config::new` feeds this from the process environment; tests pass a
    /// closure over a fixed map.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::load(&lookup);
        config.validate()?;
        Ok(config)
    }

    fn load<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ProgressConfig::default();

        let log_level = lookup("LOG_LEVEL")
            .and_then(|s| match s.to_lowercase().as_str() {
                "trace" => Some(Level::TRACE),
                "debug" => Some(Level::DEBUG),
                "info" => Some(Level::INFO),
                "warn" | "warning" => Some(Level::WARN),
                "error" => Some(Level::ERROR),
                _ => None,
            })
            .unwrap_or(Level::INFO);

        Self {
            service: ServiceConfig {
                base_url: lookup("SERVICE_BASE_URL")
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "http://localhost:5000".to_string()),
                timeout_seconds: lookup("API_TIMEOUT_SECONDS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
                connect_timeout_seconds: lookup("CONNECT_TIMEOUT_SECONDS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            },
            progress: ProgressConfig {
                tick_ms: lookup("PROGRESS_TICK_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.tick_ms),
                max_increment: lookup("PROGRESS_MAX_INCREMENT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.max_increment),
                ceiling: lookup("PROGRESS_CEILING")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.ceiling),
            },
            output: OutputConfig {
                download_dir: lookup("DOWNLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".")),
            },
            log_level,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.service.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.service.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.service.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        // Endpoints are absolute paths, so a path prefix would be dropped on join
        if url.path() != "/" {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.service.base_url.clone(),
                reason: "must be an origin without a path".to_string(),
            });
        }

        if self.service.timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout("API_TIMEOUT_SECONDS"));
        }
        if self.service.connect_timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout("CONNECT_TIMEOUT_SECONDS"));
        }

        if self.progress.tick_ms == 0 {
            return Err(ConfigError::InvalidProgressTick);
        }
        if !(self.progress.max_increment > 0.0) {
            return Err(ConfigError::InvalidProgressIncrement(
                self.progress.max_increment,
            ));
        }
        if !(self.progress.ceiling > 0.0 && self.progress.ceiling < 100.0) {
            return Err(ConfigError::InvalidProgressCeiling(self.progress.ceiling));
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.service.base_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.service.connect_timeout_seconds)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress.tick_ms)
    }

    pub fn download_dir(&self) -> &PathBuf {
        &self.output.download_dir
    }

    pub fn log_level(&self) -> Level {
        self.log_level
    }
}
