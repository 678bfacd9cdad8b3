// Port Layer - Interfaces for external dependencies

pub mod job_post_source;
pub mod queue_publisher;

// Re-exports
pub use job_post_source::{JobPostCursor, JobPostSource};
pub use queue_publisher::{PublishError, PublishErrorKind, QueuePublisher};
