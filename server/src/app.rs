//! Service wiring: collaborators, command sets and the HTTP server.

use crate::config::Config;
use flashcards_commands::{CardCommands, DeckCommands, Notifier};
use flashcards_core::environment::SystemClock;
use flashcards_postgres::{PostgresCardRepository, PostgresDeckRepository};
use flashcards_redpanda::RedpandaNotifier;
use flashcards_web::AppState;
use futures::StreamExt;
use std::sync::Arc;

/// Connect to the database and the broker and build the handler state.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the producer cannot be
/// created.
pub async fn build(config: &Config) -> anyhow::Result<(AppState, Arc<RedpandaNotifier>)> {
    let pool = flashcards_postgres::connect(&config.postgres.pool_settings()).await?;

    let notifier = Arc::new(
        RedpandaNotifier::builder()
            .brokers(&config.redpanda.brokers)
            .topic(&config.redpanda.topic)
            .producer_acks(&config.redpanda.producer_acks)
            .timeout(config.redpanda.timeout())
            .consumer_group(&config.redpanda.consumer_group)
            .build()?,
    );

    let policy = Notifier::new(notifier.clone(), Arc::new(SystemClock))
        .with_service_name(&config.server.service_name);

    let state = AppState::new(
        DeckCommands::new(Arc::new(PostgresDeckRepository::new(pool.clone())), policy.clone()),
        CardCommands::new(Arc::new(PostgresCardRepository::new(pool)), policy),
    );

    Ok((state, notifier))
}

/// Spawn the task that logs every notification read back from the topic.
///
/// # Errors
///
/// Returns an error if the subscription cannot be created.
pub fn spawn_log_consumer(
    notifier: &RedpandaNotifier,
) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    let mut stream = notifier.subscribe()?;

    Ok(tokio::spawn(async move {
        while let Some(item) = stream.next().await {
            match item {
                Ok(envelope) => tracing::info!(
                    timestamp = %envelope.timestamp,
                    operation = %envelope.operation,
                    raw_query = %envelope.raw_query,
                    "Notification received"
                ),
                Err(error) => tracing::warn!(error = %error, "Unreadable notification"),
            }
        }
        tracing::info!("Notification log consumer stopped");
    }))
}

/// Run the service until Ctrl+C.
///
/// # Errors
///
/// Returns an error if wiring fails or the listener cannot be bound.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let (state, notifier) = build(&config).await?;

    let consumer = if config.redpanda.log_consumer {
        Some(spawn_log_consumer(&notifier)?)
    } else {
        None
    };

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Listening");

    axum::serve(listener, flashcards_web::router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutting down gracefully...");
        })
        .await?;

    if let Some(consumer) = consumer {
        consumer.abort();
    }

    Ok(())
}
