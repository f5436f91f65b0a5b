//! # Flashcards Core
//!
//! Domain model and capability traits for the flashcards service.
//!
//! This crate holds everything the command layer needs to know about its
//! collaborators without depending on any of them:
//!
//! - **Model**: [`Deck`](model::Deck), [`Card`](model::Card) and the
//!   [`DeckWithCards`](model::DeckWithCards) aggregate read view
//! - **Repositories**: [`DeckRepository`](repository::DeckRepository) and
//!   [`CardRepository`](repository::CardRepository), with the
//!   [`RepositoryError::NotFound`](repository::RepositoryError::NotFound) sentinel
//! - **Notifications**: the [`Envelope`](notification::Envelope) published for
//!   every handled operation and the [`EventPublisher`](notification::EventPublisher)
//!   capability that carries it to the bus
//! - **Environment**: the [`Clock`](environment::Clock) used to timestamp envelopes
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐
//! │ Command layer│────►│  DeckRepository  │──► Postgres
//! │ (validation, │     │  CardRepository  │
//! │  errors)     │     └──────────────────┘
//! │              │     ┌──────────────────┐
//! │              │────►│  EventPublisher  │──► Redpanda
//! └──────────────┘     └──────────────────┘
//! ```
//!
//! All capability traits are dyn-compatible so they can be injected as
//! `Arc<dyn Trait>`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod notification;
pub mod repository;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use model::{Card, CardId, Deck, DeckId, DeckWithCards};
pub use notification::{BusError, Envelope, EventPublisher, OperationType};
pub use repository::{CardRepository, DeckRepository, RepositoryError};

/// Environment traits injected into the command layer.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use flashcards_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
