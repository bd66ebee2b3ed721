use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use thiserror::Error;

use super::messages::RpcReply;
use crate::config::KafkaConfig;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send reply to Kafka: {0}")]
    SendError(String),

    #[error("Failed to serialize reply: {0}")]
    SerializationError(String),
}

/// Publishes replies to the topic named in each request's `reply_to`.
pub struct KafkaReplyProducer {
    producer: FutureProducer,
    timeout: Duration,
}

impl KafkaReplyProducer {
    pub fn new(config: &KafkaConfig) -> Result<Self, anyhow::Error> {
        tracing::info!(brokers = %config.brokers, "Initializing Kafka reply producer");

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "5000")
            .set("queue.buffering.max.messages", "10000")
            .set("linger.ms", "0")
            .create()?;

        tracing::info!("Kafka reply producer initialized successfully");

        Ok(Self {
            producer,
            timeout: Duration::from_secs(5),
        })
    }

    /// Send a reply, keyed by its correlation id.
    pub async fn send_reply(
        &self,
        reply_to: &str,
        reply: &RpcReply,
    ) -> Result<(), KafkaProducerError> {
        let payload = serde_json::to_string(reply)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        let record = FutureRecord::to(reply_to)
            .key(&reply.correlation_id)
            .payload(&payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map_err(|(err, _)| KafkaProducerError::SendError(err.to_string()))?;

        tracing::debug!(
            topic = %reply_to,
            correlation_id = %reply.correlation_id,
            "Reply sent"
        );
        Ok(())
    }
}
