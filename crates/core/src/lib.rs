// Jobpost Relay Core - Domain Logic & Ports
// NO infrastructure dependencies: storage and broker adapters live in infra crates

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use config::{BrokerSettings, RelayConfig};
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
