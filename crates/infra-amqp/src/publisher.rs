// AMQP Queue Publisher
// Connection per publish: connect, declare, publish, close

use crate::uri::broker_uri;
use async_trait::async_trait;
use jobpost_relay_core::domain::QueueMessage;
use jobpost_relay_core::port::{PublishError, PublishErrorKind, QueuePublisher};
use jobpost_relay_core::BrokerSettings;
use lapin::options::{BasicPublishOptions, ConfirmSelectOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::uri::AMQPUri;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tracing::{debug, warn};

/// AMQP reply code for a normal close
const REPLY_SUCCESS: u16 = 200;

/// Default exchange: routing key is the queue name
const DEFAULT_EXCHANGE: &str = "";

/// Delivery mode 2 marks a message persistent
const PERSISTENT_DELIVERY: u8 = 2;
const TRANSIENT_DELIVERY: u8 = 1;

/// Connection I/O and callbacks run on the current tokio runtime
fn connection_properties() -> ConnectionProperties {
    ConnectionProperties::default()
        .with_executor(tokio_executor_trait::Tokio::current())
        .with_reactor(tokio_reactor_trait::Tokio)
}

/// Publishes payloads to a durable queue on an AMQP 0-9-1 broker.
///
/// Every publish opens and closes its own connection and channel; nothing
/// is kept between calls.
pub struct AmqpQueuePublisher {
    uri: AMQPUri,
    endpoint: String,
    queue: String,
}

impl AmqpQueuePublisher {
    pub fn new(settings: &BrokerSettings) -> Self {
        Self {
            uri: broker_uri(settings),
            endpoint: settings.endpoint(),
            queue: settings.queue.clone(),
        }
    }

    /// Broker endpoint without credentials
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn error(&self, kind: PublishErrorKind, err: lapin::Error) -> PublishError {
        PublishError::new(kind, &self.queue, err.to_string())
    }

    async fn publish_on(&self, channel: &Channel, message: &QueueMessage) -> Result<(), PublishError> {
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await
            .map_err(|e| self.error(PublishErrorKind::Channel, e))?;

        // Idempotent: no-op when the queue already exists with the same durability
        channel
            .queue_declare(
                &message.queue,
                QueueDeclareOptions {
                    durable: message.durable,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| self.error(PublishErrorKind::Declare, e))?;

        let delivery_mode = if message.durable {
            PERSISTENT_DELIVERY
        } else {
            TRANSIENT_DELIVERY
        };

        let confirm = channel
            .basic_publish(
                DEFAULT_EXCHANGE,
                &message.queue,
                BasicPublishOptions::default(),
                &message.payload,
                BasicProperties::default().with_delivery_mode(delivery_mode),
            )
            .await
            .map_err(|e| self.error(PublishErrorKind::Publish, e))?;

        let confirmation = confirm
            .await
            .map_err(|e| self.error(PublishErrorKind::Confirm, e))?;

        if confirmation.is_nack() {
            return Err(PublishError::new(
                PublishErrorKind::Confirm,
                &self.queue,
                "broker rejected the message",
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl QueuePublisher for AmqpQueuePublisher {
    fn queue_name(&self) -> &str {
        &self.queue
    }

    async fn publish(&self, payload: &str) -> Result<(), PublishError> {
        let message = QueueMessage::durable(&self.queue, payload);

        let connection = Connection::connect_uri(self.uri.clone(), connection_properties())
            .await
            .map_err(|e| self.error(PublishErrorKind::Connect, e))?;

        let result = match connection.create_channel().await {
            Ok(channel) => {
                let result = self.publish_on(&channel, &message).await;
                if let Err(e) = channel.close(REPLY_SUCCESS, "publish complete").await {
                    debug!(error = %e, "Channel close failed");
                }
                result
            }
            Err(e) => Err(self.error(PublishErrorKind::Channel, e)),
        };

        if let Err(e) = connection.close(REPLY_SUCCESS, "publish complete").await {
            warn!(endpoint = %self.endpoint, error = %e, "Broker connection close failed");
        }

        result
    }
}
