// Queue Publisher Port
// Abstraction over the message broker that receives forwarded job posts

use async_trait::async_trait;
use thiserror::Error;

/// Stage of the publish sequence that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishErrorKind {
    /// Broker unreachable or credentials rejected
    Connect,
    Channel,
    /// Queue exists with incompatible properties
    Declare,
    Publish,
    /// Broker did not accept the message
    Confirm,
}

impl std::fmt::Display for PublishErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PublishErrorKind::Connect => "connect",
            PublishErrorKind::Channel => "channel",
            PublishErrorKind::Declare => "declare",
            PublishErrorKind::Publish => "publish",
            PublishErrorKind::Confirm => "confirm",
        };
        f.write_str(s)
    }
}

/// Single error surfaced for any failed publish
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} failed for queue '{queue}': {message}")]
pub struct PublishError {
    pub kind: PublishErrorKind,
    pub queue: String,
    pub message: String,
}

impl PublishError {
    pub fn new(kind: PublishErrorKind, queue: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            queue: queue.into(),
            message: message.into(),
        }
    }
}

/// Queue Publisher trait
///
/// Implementations:
/// - AmqpQueuePublisher: connection per publish against an AMQP broker
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// Target queue for every published payload
    fn queue_name(&self) -> &str;

    /// Ensure the durable queue exists and publish one payload to it
    ///
    /// No deduplication: publishing the same payload twice yields two
    /// messages.
    ///
    /// # Errors
    /// - PublishError with the failing stage; nothing is retried
    async fn publish(&self, payload: &str) -> Result<(), PublishError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::QueueMessage;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Publisher that records messages instead of talking to a broker
    pub struct RecordingPublisher {
        queue: String,
        messages: Mutex<Vec<QueueMessage>>,
        failing_payloads: Mutex<HashSet<String>>,
        publish_delay: Duration,
        attempts: AtomicUsize,
        open_connections: AtomicUsize,
    }

    impl RecordingPublisher {
        pub fn new(queue: impl Into<String>) -> Self {
            Self {
                queue: queue.into(),
                messages: Mutex::new(Vec::new()),
                failing_payloads: Mutex::new(HashSet::new()),
                publish_delay: Duration::ZERO,
                attempts: AtomicUsize::new(0),
                open_connections: AtomicUsize::new(0),
            }
        }

        pub fn with_publish_delay(mut self, delay: Duration) -> Self {
            self.publish_delay = delay;
            self
        }

        /// Reject every publish of this payload with a connect error
        pub fn fail_payload(&self, payload: impl Into<String>) {
            self.failing_payloads.lock().unwrap().insert(payload.into());
        }

        pub fn messages(&self) -> Vec<QueueMessage> {
            self.messages.lock().unwrap().clone()
        }

        pub fn payloads(&self) -> Vec<String> {
            self.messages().iter().map(|m| m.payload_text()).collect()
        }

        /// Publish calls, failed ones included
        pub fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }

        /// Simulated broker connections still open
        pub fn open_connections(&self) -> usize {
            self.open_connections.load(Ordering::SeqCst)
        }
    }

    struct ConnectionGuard<'a>(&'a AtomicUsize);

    impl Drop for ConnectionGuard<'_> {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl QueuePublisher for RecordingPublisher {
        fn queue_name(&self) -> &str {
            &self.queue
        }

        async fn publish(&self, payload: &str) -> Result<(), PublishError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            self.open_connections.fetch_add(1, Ordering::SeqCst);
            let _connection = ConnectionGuard(&self.open_connections);

            if !self.publish_delay.is_zero() {
                tokio::time::sleep(self.publish_delay).await;
            }

            if self.failing_payloads.lock().unwrap().contains(payload) {
                return Err(PublishError::new(
                    PublishErrorKind::Connect,
                    &self.queue,
                    "connection refused",
                ));
            }

            self.messages
                .lock()
                .unwrap()
                .push(QueueMessage::durable(&self.queue, payload));
            Ok(())
        }
    }
}
