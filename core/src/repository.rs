//! Repository capabilities for decks and cards.
//!
//! The command layer talks to storage only through these traits. Storage
//! adapters translate their own "zero rows" signal into
//! [`RepositoryError::NotFound`], so callers can branch on absence without
//! inspecting driver-specific error types.
//!
//! # Dyn Compatibility
//!
//! Methods return `Pin<Box<dyn Future>>` instead of `async fn` so repositories
//! can be injected as `Arc<dyn DeckRepository>` / `Arc<dyn CardRepository>`.

use crate::model::{Card, CardId, Deck, DeckId, DeckWithCards};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors returned by repository implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The requested entity does not exist (store returned zero rows).
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind ("deck" or "card").
        entity: &'static str,
        /// The id that was looked up.
        id: i64,
    },

    /// Any other storage failure.
    #[error("Database error: {0}")]
    Database(String),
}

impl RepositoryError {
    /// Not-found sentinel for a deck.
    #[must_use]
    pub const fn deck_not_found(id: DeckId) -> Self {
        Self::NotFound { entity: "deck", id }
    }

    /// Not-found sentinel for a card.
    #[must_use]
    pub const fn card_not_found(id: CardId) -> Self {
        Self::NotFound { entity: "card", id }
    }

    /// Whether this is the not-found sentinel.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Boxed future returned by repository methods.
pub type RepositoryFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

/// Persistence operations for decks.
pub trait DeckRepository: Send + Sync {
    /// Insert a deck and return the store-generated id.
    ///
    /// `deck.id` and `deck.created_at` are ignored.
    fn add(&self, deck: &Deck) -> RepositoryFuture<'_, DeckId>;

    /// Load a deck.
    ///
    /// Returns [`RepositoryError::NotFound`] when no deck has this id.
    fn get_by_id(&self, id: DeckId) -> RepositoryFuture<'_, Deck>;

    /// Overwrite title, description and author of `deck.id`.
    ///
    /// Returns the number of affected rows; `0` means the deck does not exist.
    fn update(&self, deck: &Deck) -> RepositoryFuture<'_, u64>;

    /// Hard-delete a deck.
    ///
    /// Returns [`RepositoryError::NotFound`] when nothing was deleted.
    fn delete(&self, id: DeckId) -> RepositoryFuture<'_, ()>;

    /// Load a deck together with all of its cards.
    ///
    /// Returns [`RepositoryError::NotFound`] when no deck has this id.
    fn get_with_cards_by_id(&self, id: DeckId) -> RepositoryFuture<'_, DeckWithCards>;
}

/// Persistence operations for cards.
pub trait CardRepository: Send + Sync {
    /// Insert a card and return the store-generated id.
    fn add(&self, card: &Card) -> RepositoryFuture<'_, CardId>;

    /// Load a card.
    ///
    /// Returns [`RepositoryError::NotFound`] when no card has this id.
    fn get_by_id(&self, id: CardId) -> RepositoryFuture<'_, Card>;

    /// Overwrite front, back, deck and author of `card.id`.
    ///
    /// Returns the number of affected rows; `0` means the card does not exist.
    fn update(&self, card: &Card) -> RepositoryFuture<'_, u64>;

    /// Hard-delete a card.
    ///
    /// Returns [`RepositoryError::NotFound`] when nothing was deleted.
    fn delete(&self, id: CardId) -> RepositoryFuture<'_, ()>;
}
