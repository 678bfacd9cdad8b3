// Application Layer - Use Cases and Business Logic

pub mod classifier;
pub mod normalizer;
pub mod scan;
pub mod scheduler;
pub mod shutdown;

// Re-exports
pub use classifier::RowClassifier;
pub use normalizer::normalize;
pub use scan::{ScanOrchestrator, ScanOutcome};
pub use scheduler::{PollingScheduler, SchedulerState};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
