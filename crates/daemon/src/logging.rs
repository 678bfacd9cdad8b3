//! Logging setup
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (default: `jobpost_relay=info`)
//! - `JOBPOST_RELAY_LOG_FORMAT`: `json` for structured output, anything else for pretty
//! - `JOBPOST_RELAY_LOG_DIR`: also write JSON logs to a daily rolling file there

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

const DEFAULT_FILTER: &str = "jobpost_relay=info,jobpost_relay_core=info,jobpost_relay_infra_postgres=info,jobpost_relay_infra_amqp=info";
const LOG_FILE_PREFIX: &str = "jobpost-relay.log";

/// Output format for stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held
/// until the process exits.
pub fn init() -> Result<Option<WorkerGuard>> {
    let format = LogFormat::from_env_value(std::env::var("JOBPOST_RELAY_LOG_FORMAT").ok().as_deref());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    match format {
        // Production: JSON structured logging
        LogFormat::Json => layers.push(fmt::layer().json().boxed()),
        // Development: Pretty formatting with colors
        LogFormat::Pretty => layers.push(fmt::layer().pretty().boxed()),
    }

    let guard = match std::env::var("JOBPOST_RELAY_LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            );
            Some(guard)
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
