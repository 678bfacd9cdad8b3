// Domain Layer - Pure business logic and entities

pub mod decision;
pub mod error;
pub mod job_post;
pub mod message;
pub mod rule;

// Re-exports
pub use decision::{Classification, NormalizationResult, PublishDecision, RowEvent};
pub use error::DomainError;
pub use job_post::{JobPostId, JobPostRecord};
pub use message::QueueMessage;
pub use rule::ClassificationRule;
