//! Operation notifications published to the message bus.
//!
//! Every handled operation produces one [`Envelope`]:
//!
//! ```json
//! {
//!   "timestamp": "2025-01-01T00:00:00Z",
//!   "type": "CreateDeck",
//!   "raw_query": "{\"title\":\"Algebra\",\"description\":\"Basics\",\"author\":\"Ana\"}"
//! }
//! ```
//!
//! `raw_query` is the JSON-serialized request that triggered the operation.
//!
//! # Delivery
//!
//! Publication is best-effort: there is no retry, no outbox and no coupling to
//! the storage write. Deciding what to do with a failed publish is the
//! caller's job; [`EventPublisher`] only reports it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// The eight operations exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    /// Create a deck.
    CreateDeck,
    /// Read a deck with its cards.
    GetDeckById,
    /// Update a deck.
    UpdateDeck,
    /// Delete a deck.
    DeleteDeck,
    /// Create a card.
    CreateCard,
    /// Read a card.
    GetCardById,
    /// Update a card.
    UpdateCard,
    /// Delete a card.
    DeleteCard,
}

impl OperationType {
    /// All operation types.
    pub const ALL: [Self; 8] = [
        Self::CreateDeck,
        Self::GetDeckById,
        Self::UpdateDeck,
        Self::DeleteDeck,
        Self::CreateCard,
        Self::GetCardById,
        Self::UpdateCard,
        Self::DeleteCard,
    ];

    /// Wire name, as it appears in the envelope's `type` field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateDeck => "CreateDeck",
            Self::GetDeckById => "GetDeckById",
            Self::UpdateDeck => "UpdateDeck",
            Self::DeleteDeck => "DeleteDeck",
            Self::CreateCard => "CreateCard",
            Self::GetCardById => "GetCardById",
            Self::UpdateCard => "UpdateCard",
            Self::DeleteCard => "DeleteCard",
        }
    }

    /// Resource kind the operation acts on ("deck" or "card").
    #[must_use]
    pub const fn resource(&self) -> &'static str {
        match self {
            Self::CreateDeck | Self::GetDeckById | Self::UpdateDeck | Self::DeleteDeck => "deck",
            Self::CreateCard | Self::GetCardById | Self::UpdateCard | Self::DeleteCard => "card",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from building, publishing or consuming notifications.
#[derive(Error, Debug, Clone)]
pub enum BusError {
    /// Failed to connect to the bus or build a client
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Envelope could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The bus rejected or timed out the message
    #[error("Publish failed for topic '{topic}': {reason}")]
    PublishFailed {
        /// The topic that failed
        topic: String,
        /// The reason for failure
        reason: String,
    },

    /// Failed to subscribe to the notification topic
    #[error("Subscription failed for topic '{topic}': {reason}")]
    SubscriptionFailed {
        /// The topic that failed
        topic: String,
        /// The reason for failure
        reason: String,
    },

    /// Network or transport error while consuming
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Timestamped record of one handled operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// When the operation was handled.
    pub timestamp: DateTime<Utc>,
    /// Which operation was handled.
    #[serde(rename = "type")]
    pub operation: OperationType,
    /// JSON-serialized request.
    pub raw_query: String,
}

impl Envelope {
    /// Build an envelope around an already-serialized request.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, operation: OperationType, raw_query: String) -> Self {
        Self {
            timestamp,
            operation,
            raw_query,
        }
    }

    /// Build an envelope by serializing `request` to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Serialization`] if the request cannot be encoded.
    pub fn for_request<T: Serialize + ?Sized>(
        timestamp: DateTime<Utc>,
        operation: OperationType,
        request: &T,
    ) -> Result<Self, BusError> {
        let raw_query =
            serde_json::to_string(request).map_err(|e| BusError::Serialization(e.to_string()))?;
        Ok(Self::new(timestamp, operation, raw_query))
    }

    /// Encode the envelope as the JSON message payload.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<Vec<u8>, BusError> {
        serde_json::to_vec(self).map_err(|e| BusError::Serialization(e.to_string()))
    }

    /// Decode an envelope from a JSON message payload.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Serialization`] if the payload is not a valid envelope.
    pub fn from_json(payload: &[u8]) -> Result<Self, BusError> {
        serde_json::from_slice(payload).map_err(|e| BusError::Serialization(e.to_string()))
    }
}

/// Single-method capability that carries envelopes to the bus.
///
/// Implementations report failures; they never retry and never swallow them.
pub trait EventPublisher: Send + Sync {
    /// Publish one envelope to the outbound topic.
    ///
    /// # Errors
    ///
    /// Returns a [`BusError`] if the envelope could not be delivered.
    fn publish(
        &self,
        envelope: &Envelope,
    ) -> Pin<Box<dyn Future<Output = Result<(), BusError>> + Send + '_>>;
}
