// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown classification rule: {0} (expected title_audit or description_forward)")]
    UnknownRule(String),

    #[error("Invalid queue name: {0}")]
    InvalidQueueName(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
