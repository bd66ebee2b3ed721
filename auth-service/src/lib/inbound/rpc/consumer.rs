use std::future::Future;
use std::sync::Arc;

use futures::StreamExt;
use rdkafka::consumer::Consumer;
use rdkafka::consumer::StreamConsumer;
use rdkafka::error::KafkaError;
use rdkafka::message::BorrowedMessage;
use rdkafka::ClientConfig;
use rdkafka::Message;
use thiserror::Error;
use tokio::task::JoinSet;

use super::dispatcher::RpcDispatcher;
use super::handlers::RpcError;
use super::messages::RequestDecodeError;
use super::messages::RpcReply;
use super::messages::RpcRequest;
use super::producer::KafkaReplyProducer;
use crate::config::KafkaConfig;
use crate::domain::user::ports::AuthServicePort;

#[derive(Debug, Error)]
enum MessageProcessingError {
    #[error("Kafka consumer error: {0}")]
    KafkaError(#[from] KafkaError),

    #[error("Message has no payload")]
    NoPayload,
}

/// Consumes RPC requests from the request topic and answers each one on its
/// `reply_to` topic.
///
/// Every request is handled in its own task so a slow password hash does not
/// hold up the requests behind it.
pub struct KafkaRpcConsumer<S: AuthServicePort> {
    consumer: StreamConsumer,
    dispatcher: Arc<RpcDispatcher<S>>,
    producer: Arc<KafkaReplyProducer>,
}

impl<S: AuthServicePort> KafkaRpcConsumer<S> {
    pub fn new(
        config: &KafkaConfig,
        dispatcher: Arc<RpcDispatcher<S>>,
        producer: Arc<KafkaReplyProducer>,
    ) -> Result<Self, anyhow::Error> {
        tracing::info!(
            brokers = %config.brokers,
            group_id = %config.group_id,
            topic = %config.request_topic,
            "Initializing Kafka request consumer"
        );

        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.commit.interval.ms", "5000")
            .set("auto.offset.reset", &config.auto_offset_reset)
            .set("session.timeout.ms", "30000")
            .set("enable.partition.eof", "false")
            .create()?;

        consumer.subscribe(&[config.request_topic.as_str()])?;

        tracing::info!(topic = %config.request_topic, "Kafka request consumer subscribed");

        Ok(Self {
            consumer,
            dispatcher,
            producer,
        })
    }

    /// Run the consume loop until `shutdown` resolves, then wait for in-flight
    /// requests to finish replying.
    pub async fn start_consuming(self, shutdown: impl Future<Output = ()>) {
        tracing::info!("Starting Kafka request consumer loop");

        let mut in_flight = JoinSet::new();
        let mut message_stream = self.consumer.stream();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping request consumer");
                    break;
                }
                next = message_stream.next() => {
                    let Some(result) = next else {
                        tracing::warn!("Kafka request stream ended");
                        break;
                    };

                    if let Err(e) = self.process_message(result, &mut in_flight) {
                        tracing::error!(error = %e, "Error processing message");

                        if matches!(e, MessageProcessingError::KafkaError(_)) {
                            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                        }
                    }
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "Request task failed");
                    }
                }
            }
        }

        let pending = in_flight.len();
        if pending > 0 {
            tracing::info!(pending, "Waiting for in-flight requests");
        }
        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Request task failed");
            }
        }

        tracing::info!("Kafka request consumer stopped");
    }

    fn process_message(
        &self,
        result: Result<BorrowedMessage<'_>, KafkaError>,
        in_flight: &mut JoinSet<()>,
    ) -> Result<(), MessageProcessingError> {
        let message = result?;
        let payload = message.payload().ok_or(MessageProcessingError::NoPayload)?;

        match route_payload(payload) {
            RequestRoute::Dispatch(request) => {
                let dispatcher = Arc::clone(&self.dispatcher);
                let producer = Arc::clone(&self.producer);

                in_flight.spawn(async move {
                    let reply_to = request.reply_to.clone();
                    let reply = dispatcher.handle(request).await;
                    publish_reply(&producer, &reply_to, &reply).await;
                });
            }
            RequestRoute::Reject { reply_to, reply } => {
                tracing::warn!(
                    correlation_id = %reply.correlation_id,
                    "Rejecting malformed request"
                );
                let producer = Arc::clone(&self.producer);

                in_flight.spawn(async move {
                    publish_reply(&producer, &reply_to, &reply).await;
                });
            }
            RequestRoute::Drop(reason) => {
                tracing::warn!(reason = %reason, "Dropping request without reply address");
            }
        }

        Ok(())
    }
}

async fn publish_reply(producer: &KafkaReplyProducer, reply_to: &str, reply: &RpcReply) {
    if let Err(e) = producer.send_reply(reply_to, reply).await {
        tracing::error!(
            correlation_id = %reply.correlation_id,
            error = %e,
            "Failed to send reply"
        );
    }
}

/// What the consumer does with one raw request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestRoute {
    /// Decoded; hand to the dispatcher.
    Dispatch(RpcRequest),
    /// Reply address known but the envelope is invalid; answer with a 400.
    Reject { reply_to: String, reply: RpcReply },
    /// No way to answer.
    Drop(String),
}

pub fn route_payload(payload: &[u8]) -> RequestRoute {
    match RpcRequest::decode(payload) {
        Ok(request) => RequestRoute::Dispatch(request),
        Err(RequestDecodeError::Malformed { address, reason }) => RequestRoute::Reject {
            reply_to: address.reply_to,
            reply: RpcReply::failure(
                address.correlation_id,
                RpcError::BadRequest(format!("Malformed request: {}", reason)),
            ),
        },
        Err(e @ RequestDecodeError::Unroutable(_)) => RequestRoute::Drop(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::inbound::rpc::messages::patterns;

    #[test]
    fn test_route_valid_request() {
        let payload = json!({
            "correlation_id": "c-1",
            "reply_to": "gateway.replies",
            "pattern": patterns::LOGIN_USER,
            "data": { "email": "a@x.com", "password": "secret" }
        });

        match route_payload(payload.to_string().as_bytes()) {
            RequestRoute::Dispatch(request) => {
                assert_eq!(request.correlation_id, "c-1");
                assert_eq!(request.pattern, patterns::LOGIN_USER);
            }
            other => panic!("Expected Dispatch, got {:?}", other),
        }
    }

    #[test]
    fn test_route_malformed_request_gets_bad_request_reply() {
        let payload = json!({ "correlation_id": "c-2", "reply_to": "gateway.replies" });

        match route_payload(payload.to_string().as_bytes()) {
            RequestRoute::Reject { reply_to, reply } => {
                assert_eq!(reply_to, "gateway.replies");
                assert_eq!(reply.correlation_id, "c-2");
                assert!(reply.response.is_none());

                let err = reply.err.unwrap();
                assert_eq!(err.status, 400);
                assert!(err.message.starts_with("Malformed request"));
            }
            other => panic!("Expected Reject, got {:?}", other),
        }
    }

    #[test]
    fn test_route_unroutable_payload_is_dropped() {
        let without_address = json!({ "pattern": patterns::VERIFY_TOKEN, "data": {} });

        assert!(matches!(
            route_payload(without_address.to_string().as_bytes()),
            RequestRoute::Drop(_)
        ));
        assert!(matches!(route_payload(b"not json"), RequestRoute::Drop(_)));
    }
}
