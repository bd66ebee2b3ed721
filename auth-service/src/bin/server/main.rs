use std::sync::Arc;

use auth::Authenticator;
use auth_service::config::Config;
use auth_service::domain::user::service::AuthService;
use auth_service::inbound::rpc::KafkaReplyProducer;
use auth_service::inbound::rpc::KafkaRpcConsumer;
use auth_service::inbound::rpc::RpcDispatcher;
use auth_service::outbound::repositories::PostgresUserRepository;
use chrono::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        kafka_brokers = %config.kafka.brokers,
        request_topic = %config.kafka.request_topic,
        token_ttl_hours = config.jwt.expiration_hours,
        reveal_credential_field = config.login.reveal_credential_field,
        "Configuration loaded"
    );

    let user_repository = Arc::new(PostgresUserRepository::connect(&config.database).await?);
    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        Duration::hours(config.jwt.expiration_hours),
    ));

    let auth_service = Arc::new(AuthService::new(Arc::clone(&user_repository), authenticator));
    let dispatcher = Arc::new(RpcDispatcher::new(
        auth_service,
        config.login.reveal_credential_field,
    ));
    let reply_producer = Arc::new(KafkaReplyProducer::new(&config.kafka)?);
    let consumer = KafkaRpcConsumer::new(&config.kafka, dispatcher, reply_producer)?;

    tracing::info!(
        topic = %config.kafka.request_topic,
        transport = "kafka",
        "Listening for requests"
    );

    consumer.start_consuming(shutdown_signal()).await;

    user_repository.close().await;
    tracing::info!("Service stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
