// Queue Message Domain Model

use super::error::{DomainError, Result};

/// AMQP short strings cap queue names at 255 bytes
pub const MAX_QUEUE_NAME_LEN: usize = 255;

/// A single message bound for the work queue.
///
/// No headers, correlation id or retry count: consumers only ever see the
/// payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub queue: String,
    pub payload: Vec<u8>,
    pub durable: bool,
}

impl QueueMessage {
    /// Persistent message for a durable queue, payload encoded as UTF-8
    pub fn durable(queue: impl Into<String>, payload: &str) -> Self {
        Self {
            queue: queue.into(),
            payload: payload.as_bytes().to_vec(),
            durable: true,
        }
    }

    /// Payload decoded back to text (lossy for non-UTF-8 bytes)
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Check a queue name against broker limits
pub fn validate_queue_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidQueueName(
            "queue name cannot be empty".to_string(),
        ));
    }
    if name.len() > MAX_QUEUE_NAME_LEN {
        return Err(DomainError::InvalidQueueName(format!(
            "queue name too long ({} bytes, max {})",
            name.len(),
            MAX_QUEUE_NAME_LEN
        )));
    }
    Ok(())
}
