pub mod consumer;
pub mod dispatcher;
pub mod handlers;
pub mod messages;
pub mod producer;

pub use consumer::route_payload;
pub use consumer::KafkaRpcConsumer;
pub use consumer::RequestRoute;
pub use dispatcher::RpcDispatcher;
pub use producer::KafkaReplyProducer;
