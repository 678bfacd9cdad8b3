// Jobpost Relay Infrastructure - AMQP Adapter
// Implements: QueuePublisher (durable queue via the default exchange)

mod publisher;
mod uri;

pub use publisher::AmqpQueuePublisher;
pub use uri::broker_uri;
