//! # Flashcards Testing
//!
//! Test doubles for the flashcards service.
//!
//! This crate provides:
//! - [`InMemoryStore`]: both repository capabilities over shared in-memory tables
//! - [`RecordingPublisher`] / [`FailingPublisher`]: notification publishers that
//!   capture or reject envelopes
//! - [`FixedClock`] / [`test_clock`]: deterministic time
//! - [`properties`]: proptest strategies for request fields
//!
//! ## Example
//!
//! ```ignore
//! use flashcards_testing::{test_clock, InMemoryStore, RecordingPublisher};
//! use std::sync::Arc;
//!
//! let store = InMemoryStore::new();
//! let publisher = RecordingPublisher::new();
//! let decks = DeckCommands::new(Arc::new(store.clone()), notifier(publisher.clone()));
//!
//! decks.delete(7).await?;
//! assert_eq!(publisher.operations(), vec![OperationType::DeleteDeck]);
//! ```

mod publisher;
mod store;

pub use publisher::{FailingPublisher, RecordingPublisher};
pub use store::{InMemoryStore, StoreOperation};

use chrono::{DateTime, Utc};
use flashcards_core::environment::Clock;

/// Deterministic clocks.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making envelope timestamps reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use flashcards_testing::mocks::FixedClock;
    /// use flashcards_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which cannot happen.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Property-based testing strategies for request fields.
pub mod properties {
    use proptest::prelude::*;

    /// Strings that pass the required-field check.
    pub fn present_text() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ]{0,23}"
    }

    /// Ids that pass the positive-id check.
    pub fn valid_id() -> impl Strategy<Value = i64> {
        1..=i64::MAX
    }

    /// Ids that fail the positive-id check.
    pub fn invalid_id() -> impl Strategy<Value = i64> {
        i64::MIN..=0
    }
}

pub use mocks::{FixedClock, test_clock};
