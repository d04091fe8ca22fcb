// Terminal host for the background-removal client
//
// cutout [--recolor COLOR]... [--download DIR] FILE...

use cutout_client::{
    core::{types::OutputFormat, Config},
    orchestration::{FileIntake, HealthMonitor, UploadOrchestrator},
    render::LogRenderer,
    services::{HttpProcessingService, ProcessingService},
    utils::Metrics,
};

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    files: Vec<PathBuf>,
    recolors: Vec<String>,
    download_dir: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--recolor" | "-c" => {
                let Some(color) = args.get(i + 1) else {
                    bail!("--recolor needs a color");
                };
                parsed.recolors.push(color.clone());
                i += 2;
            }
            "--download" | "-d" => {
                let Some(dir) = args.get(i + 1) else {
                    bail!("--download needs a directory");
                };
                parsed.download_dir = Some(PathBuf::from(dir));
                i += 2;
            }
            other => {
                parsed.files.push(PathBuf::from(other));
                i += 1;
            }
        }
    }

    Ok(parsed)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::new().context("Failed to load configuration")?;

    // Initialize logging
    let filter = EnvFilter::new(format!(
        "cutout_client={},cutout={}",
        level_name(config.log_level()),
        level_name(config.log_level()),
    ));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let raw: Vec<String> = std::env::args().collect();
    let args = parse_args(&raw)?;
    if args.files.is_empty() {
        eprintln!(
            "Usage: {} [--recolor COLOR]... [--download DIR] FILE...",
            raw.first().map(String::as_str).unwrap_or("cutout")
        );
        std::process::exit(1);
    }

    info!("Service: {}", config.base_url());
    debug!("Config: {:?}", config);

    let metrics = Metrics::new();
    let service: Arc<dyn ProcessingService> =
        Arc::new(HttpProcessingService::new(&config, Some(metrics.clone()))?);
    let orchestrator = UploadOrchestrator::new(
        &config,
        Arc::clone(&service),
        Arc::new(LogRenderer::new()),
        metrics.clone(),
    );

    // Readiness is logged only; intake does not wait for it
    let health = Arc::new(HealthMonitor::new(Arc::clone(&service))).spawn();

    let intake = FileIntake::new(orchestrator.clone());
    // Failures have already been shown by the renderer
    match intake.accept_paths(&args.files).await {
        Ok(outcome) => debug!("Submission finished: {:?}", outcome),
        Err(e) => warn!("Submission failed: {}", e),
    }

    for color in &args.recolors {
        if let Err(e) = orchestrator.recolor(color.as_str()).await {
            warn!("Recolor to '{}' failed: {}", color, e);
        }
    }

    if let Some(dir) = &args.download_dir {
        match orchestrator.download_current(Some(dir.as_path()), OutputFormat::Png).await {
            Ok(path) => info!("Saved {}", path.display()),
            Err(e) => warn!("Download skipped: {}", e),
        }
    }

    if let Ok(status) = health.await {
        debug!("Health probe: {:?}", status);
    }

    let snapshot = serde_json::to_string(&metrics.snapshot())
        .context("Failed to serialize metrics")?;
    info!("Metrics: {}", snapshot);

    Ok(())
}

fn level_name(level: tracing::Level) -> &'static str {
    match level {
        tracing::Level::TRACE => "trace",
        tracing::Level::DEBUG => "debug",
        tracing::Level::INFO => "info",
        tracing::Level::WARN => "warn",
        tracing::Level::ERROR => "error",
    }
}
