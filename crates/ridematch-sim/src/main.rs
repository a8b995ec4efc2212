#![doc = include_str!("../README.md")]

mod config;
mod report;
mod telemetry;

use clap::Parser;
use config::{CliArgs, ReportFormat, SimConfig};
use report::Summary;
use ridematch::{RideSharingSystem, ShutdownOutcome};
use telemetry::init_telemetry;
use tokio::signal;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = SimConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let system = RideSharingSystem::new(config.system.clone())?;

    for i in 0..config.riders {
        let rider = system.add_rider(format!("Rider{i}"))?;
        tracing::info!("Rider created: {} ID: {}", rider.name(), rider.id());
    }
    for i in 0..config.drivers {
        let driver = system.add_driver_with_rating(format!("Driver{i}"), config.driver_rating)?;
        tracing::info!(
            "Driver created: {} ID: {} Rating: {}",
            driver.name(),
            driver.id(),
            config.driver_rating
        );
    }

    settle(&config).await;

    let outcome = system.shutdown().await;
    if let ShutdownOutcome::Forced { still_running } = outcome {
        tracing::warn!("Force shutdown! {still_running} workers did not stop in time");
    }

    let rides = system.list_completed_rides();
    let summary = Summary::new(outcome, system.pending_riders(), system.pending_drivers());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match config.format {
        ReportFormat::Text => report::write_text(&mut out, &rides, summary)?,
        ReportFormat::Json => report::write_json(&mut out, &rides, summary)?,
    }

    Ok(())
}

fn log_startup_info(config: &SimConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting simulation with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting simulation with {} {} workers, {} riders, {} drivers",
            config.system.worker_threads,
            config.system.ride_kind,
            config.riders,
            config.drivers
        );
    }
}

/// Waits for the settle period, or less if the process is asked to stop.
async fn settle(config: &SimConfig) {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_e) => {
                tracing::error!("Failed to install SIGTERM handler: {_e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(_e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {_e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = tokio::time::sleep(config.settle) => {
            tracing::debug!("Settle period elapsed after {:?}", config.settle);
        },
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down early");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down early");
        },
    }
}
