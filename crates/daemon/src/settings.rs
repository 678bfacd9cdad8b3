//! Configuration loading: optional file, then `JOBPOST_RELAY_*` environment

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, Environment, File};
use jobpost_relay_core::domain::ClassificationRule;
use jobpost_relay_core::RelayConfig;
use std::path::PathBuf;

/// Environment variable prefix (JOBPOST_RELAY_POSTGRES_CONNECTION, ...)
pub const ENV_PREFIX: &str = "JOBPOST_RELAY";

/// File looked up in the working directory when --config is not given
const DEFAULT_CONFIG_BASENAME: &str = "jobpost-relay";

#[derive(Parser, Debug)]
#[command(name = "jobpost-relay")]
#[command(about = "Scans the jobposts table and forwards rows to a work queue", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (TOML, JSON or YAML, by extension)
    #[arg(short, long, env = "JOBPOST_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the classification rule (title_audit, description_forward)
    #[arg(short, long)]
    pub rule: Option<ClassificationRule>,

    /// Run a single scan immediately and exit
    #[arg(long)]
    pub once: bool,
}

/// Merge file and environment sources into a validated config
pub fn load(cli: &Cli) -> Result<RelayConfig> {
    let mut builder = Config::builder();

    builder = match &cli.config {
        Some(path) => builder.add_source(File::from(path.as_path())),
        None => builder.add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false)),
    };

    let mut config: RelayConfig = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    if let Some(rule) = cli.rule {
        config.rule = rule;
    }

    config.validate().context("Configuration rejected")?;
    Ok(config)
}
