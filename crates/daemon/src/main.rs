//! Jobpost Relay - Main Entry Point
//! Polls the jobposts table and forwards qualifying rows to the work queue

mod logging;
mod settings;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// Import workspace crates
use jobpost_relay_core::application::{
    shutdown_channel, PollingScheduler, RowClassifier, ScanOrchestrator,
};
use jobpost_relay_core::port::{JobPostSource, QueuePublisher};
use jobpost_relay_infra_amqp::AmqpQueuePublisher;
use jobpost_relay_infra_postgres::PgJobPostSource;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long an in-flight scan gets to release its connections after shutdown
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = settings::Cli::parse();

    // 1. Initialize logging
    let _log_guard = logging::init()?;

    info!("Jobpost relay v{} starting...", VERSION);

    // 2. Load configuration
    let config = settings::load(&cli)?;
    let broker = config.broker();

    info!(
        interval_secs = config.interval_seconds,
        rule = %config.rule,
        broker = %broker.endpoint(),
        queue = %broker.queue,
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let source: Arc<dyn JobPostSource> = Arc::new(
        PgJobPostSource::from_url(&config.postgres_connection)
            .context("Invalid postgres_connection")?,
    );
    let publisher: Arc<dyn QueuePublisher> = Arc::new(AmqpQueuePublisher::new(&broker));

    let orchestrator = ScanOrchestrator::new(source, publisher, RowClassifier::new(config.rule));
    let scheduler = PollingScheduler::new(config.interval(), orchestrator);

    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    // 4. Manual trigger: one scan, then exit
    if cli.once {
        let scan = scheduler.run_once(shutdown_rx);
        tokio::pin!(scan);

        let outcome = tokio::select! {
            result = &mut scan => result,
            _ = shutdown_signal() => {
                shutdown_tx.shutdown();
                scan.await
            }
        };

        match outcome {
            Ok(outcome) => info!(
                forwarded = outcome.forwarded,
                skipped = outcome.skipped,
                errored = outcome.errored,
                "Single scan finished"
            ),
            Err(e) if e.is_cancelled() => info!("Single scan interrupted by shutdown"),
            Err(e) => return Err(e).context("Scan failed"),
        }
        return Ok(());
    }

    // 5. Start polling loop
    info!("Starting polling scheduler...");
    let mut worker_handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal; a scheduler that exits on its own is fatal
    tokio::select! {
        _ = shutdown_signal() => {}
        joined = &mut worker_handle => {
            return match joined {
                Ok(Ok(())) => Err(anyhow!("Polling scheduler stopped without a shutdown signal")),
                Ok(Err(e)) => Err(e).context("Polling scheduler failed"),
                Err(e) => Err(e).context("Polling scheduler task aborted"),
            };
        }
    }

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    shutdown_tx.shutdown();
    if tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, worker_handle)
        .await
        .is_err()
    {
        tracing::warn!("Scheduler did not stop within grace period");
    }

    info!("Shutdown complete.");

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
