//! Redpanda notification publisher for the flashcards service.
//!
//! This crate provides [`RedpandaNotifier`], the production implementation of
//! the [`EventPublisher`] capability from `flashcards-core`. It uses rdkafka, so
//! any Kafka-compatible broker works (Redpanda, Apache Kafka, MSK, ...).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Command layer  │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  1. Postgres    │
//! │   (persist)     │◄─── Source of truth
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  2. Redpanda    │
//! │   (notify)      │◄─── Best effort, one topic
//! └─────────────────┘
//! ```
//!
//! # Delivery Semantics
//!
//! **Best effort**. Each envelope is sent once with a bounded delivery timeout;
//! there is no retry and no outbox. The caller decides what a failure means.
//!
//! Messages are keyed by operation type, so envelopes of the same operation stay
//! ordered within their partition. Payloads are JSON.
//!
//! # Example
//!
//! ```no_run
//! use flashcards_core::{Envelope, EventPublisher, OperationType, Utc};
//! use flashcards_redpanda::RedpandaNotifier;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let notifier = RedpandaNotifier::builder()
//!     .brokers("localhost:9092")
//!     .topic("flashcards-events")
//!     .build()?;
//!
//! let envelope = Envelope::new(Utc::now(), OperationType::DeleteCard, "{\"id\":1}".into());
//! notifier.publish(&envelope).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use flashcards_core::{BusError, Envelope, EventPublisher};
use futures::Stream;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Default outbound topic.
pub const DEFAULT_TOPIC: &str = "flashcards-events";

/// Stream of envelopes read back from the notification topic.
pub type EnvelopeStream = Pin<Box<dyn Stream<Item = Result<Envelope, BusError>> + Send>>;

/// Redpanda-backed [`EventPublisher`].
///
/// Publishes every envelope to a single topic and can read that topic back
/// with [`subscribe`](Self::subscribe).
///
/// # Example
///
/// ```no_run
/// use flashcards_redpanda::RedpandaNotifier;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let notifier = RedpandaNotifier::builder()
///     .brokers("localhost:9092,localhost:9093")
///     .topic("flashcards-events")
///     .producer_acks("all")
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct RedpandaNotifier {
    /// Kafka producer for publishing envelopes
    producer: FutureProducer,
    /// Broker addresses (for creating consumers)
    brokers: String,
    /// Outbound topic
    topic: String,
    /// Delivery timeout
    timeout: Duration,
    /// Consumer group for `subscribe`
    consumer_group: String,
    /// Auto offset reset policy for `subscribe`
    auto_offset_reset: String,
}

impl RedpandaNotifier {
    /// Create a notifier with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::ConnectionFailed`] if the producer cannot be created.
    pub fn new(brokers: &str) -> Result<Self, BusError> {
        Self::builder().brokers(brokers).build()
    }

    /// Create a new builder for configuring the notifier.
    #[must_use]
    pub fn builder() -> RedpandaNotifierBuilder {
        RedpandaNotifierBuilder::default()
    }

    /// Broker list this notifier talks to.
    #[must_use]
    pub fn brokers(&self) -> &str {
        &self.brokers
    }

    /// Topic envelopes are published to.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Read envelopes back from the notification topic.
    ///
    /// Offsets are auto-committed; this stream is meant for observing the
    /// topic (logging, debugging), not for processing that must not lose
    /// messages. Payloads that are not valid envelopes are yielded as
    /// [`BusError::Serialization`] and the stream continues.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::SubscriptionFailed`] if the consumer cannot be
    /// created or subscribed.
    pub fn subscribe(&self) -> Result<EnvelopeStream, BusError> {
        let topic = self.topic.clone();

        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", &self.consumer_group)
            .set("enable.auto.commit", "true")
            .set("auto.commit.interval.ms", "5000")
            .set("auto.offset.reset", &self.auto_offset_reset)
            .set("session.timeout.ms", "6000")
            .set("enable.partition.eof", "false")
            .create()
            .map_err(|e| BusError::SubscriptionFailed {
                topic: topic.clone(),
                reason: format!("Failed to create consumer: {e}"),
            })?;

        consumer
            .subscribe(&[topic.as_str()])
            .map_err(|e| BusError::SubscriptionFailed {
                topic: topic.clone(),
                reason: format!("Failed to subscribe: {e}"),
            })?;

        tracing::info!(
            topic = %topic,
            consumer_group = %self.consumer_group,
            auto_offset_reset = %self.auto_offset_reset,
            "Subscribed to notification topic"
        );

        let stream = async_stream::stream! {
            use futures::StreamExt;

            let mut messages = consumer.stream();
            while let Some(message) = messages.next().await {
                match message {
                    Ok(message) => match message.payload() {
                        Some(payload) => yield Envelope::from_json(payload),
                        None => {
                            yield Err(BusError::Serialization("Message has no payload".to_string()));
                        },
                    },
                    Err(e) => yield Err(BusError::Transport(format!("Failed to receive message: {e}"))),
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Builder for configuring a [`RedpandaNotifier`].
#[derive(Default)]
pub struct RedpandaNotifierBuilder {
    brokers: Option<String>,
    topic: Option<String>,
    producer_acks: Option<String>,
    timeout: Option<Duration>,
    consumer_group: Option<String>,
    auto_offset_reset: Option<String>,
}

impl RedpandaNotifierBuilder {
    /// Set the broker addresses (comma-separated, e.g. "localhost:9092").
    #[must_use]
    pub fn brokers(mut self, brokers: impl Into<String>) -> Self {
        self.brokers = Some(brokers.into());
        self
    }

    /// Set the outbound topic.
    ///
    /// Default: [`DEFAULT_TOPIC`]
    #[must_use]
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Set the producer acknowledgment mode: "0", "1" or "all".
    ///
    /// Default: "all"
    #[must_use]
    pub fn producer_acks(mut self, acks: impl Into<String>) -> Self {
        self.producer_acks = Some(acks.into());
        self
    }

    /// Set the delivery timeout. This is the only deadline on a publish.
    ///
    /// Default: 5 seconds
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the consumer group used by [`RedpandaNotifier::subscribe`].
    ///
    /// Default: "flashcards-notification-log"
    #[must_use]
    pub fn consumer_group(mut self, consumer_group: impl Into<String>) -> Self {
        self.consumer_group = Some(consumer_group.into());
        self
    }

    /// Set where a new consumer group starts reading: "earliest" or "latest".
    ///
    /// Default: "earliest"
    #[must_use]
    pub fn auto_offset_reset(mut self, policy: impl Into<String>) -> Self {
        self.auto_offset_reset = Some(policy.into());
        self
    }

    /// Build the [`RedpandaNotifier`].
    ///
    /// # Errors
    ///
    /// Returns [`BusError::ConnectionFailed`] if:
    /// - Brokers not set
    /// - Cannot create producer
    pub fn build(self) -> Result<RedpandaNotifier, BusError> {
        let brokers = self
            .brokers
            .ok_or_else(|| BusError::ConnectionFailed("Brokers not configured".to_string()))?;
        let timeout = self.timeout.unwrap_or(Duration::from_secs(5));
        let acks = self.producer_acks.unwrap_or_else(|| "all".to_string());

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &brokers)
            .set("message.timeout.ms", timeout.as_millis().to_string())
            .set("acks", &acks)
            .create()
            .map_err(|e| BusError::ConnectionFailed(format!("Failed to create producer: {e}")))?;

        let topic = self.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string());

        tracing::info!(
            brokers = %brokers,
            topic = %topic,
            acks = %acks,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "RedpandaNotifier created"
        );

        Ok(RedpandaNotifier {
            producer,
            brokers,
            topic,
            timeout,
            consumer_group: self
                .consumer_group
                .unwrap_or_else(|| "flashcards-notification-log".to_string()),
            auto_offset_reset: self
                .auto_offset_reset
                .unwrap_or_else(|| "earliest".to_string()),
        })
    }
}

impl EventPublisher for RedpandaNotifier {
    fn publish(
        &self,
        envelope: &Envelope,
    ) -> Pin<Box<dyn Future<Output = Result<(), BusError>> + Send + '_>> {
        let payload = envelope.to_json();
        let operation = envelope.operation;

        Box::pin(async move {
            let payload = payload?;
            let key = operation.as_str();

            let record = FutureRecord::to(&self.topic).payload(&payload).key(key);

            match self.producer.send(record, Timeout::After(self.timeout)).await {
                Ok((partition, offset)) => {
                    tracing::debug!(
                        topic = %self.topic,
                        partition = partition,
                        offset = offset,
                        operation = %operation,
                        "Notification published"
                    );
                    metrics::counter!("flashcards.bus.published", "operation" => key).increment(1);
                    Ok(())
                },
                Err((kafka_error, _)) => {
                    metrics::counter!("flashcards.bus.failed", "operation" => key).increment(1);
                    Err(BusError::PublishFailed {
                        topic: self.topic.clone(),
                        reason: kafka_error.to_string(),
                    })
                },
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn redpanda_notifier_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<RedpandaNotifier>();
        assert_sync::<RedpandaNotifier>();
    }

    #[test]
    fn build_without_brokers_fails() {
        let result = RedpandaNotifier::builder().topic("flashcards-events").build();
        assert!(matches!(result, Err(BusError::ConnectionFailed(_))));
    }

    #[test]
    fn build_applies_defaults() {
        // Producer creation does not contact the broker.
        let notifier = RedpandaNotifier::new("localhost:9092").expect("producer config is valid");
        assert_eq!(notifier.brokers(), "localhost:9092");
        assert_eq!(notifier.topic(), DEFAULT_TOPIC);
        assert_eq!(notifier.timeout, Duration::from_secs(5));
        assert_eq!(notifier.auto_offset_reset, "earliest");
    }
}
