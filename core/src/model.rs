//! Deck and card entities and the deck-with-cards aggregate.
//!
//! Identifiers are `i64` because they are generated by the relational store
//! (`BIGSERIAL`). An id of `0` means "not yet persisted"; `created_at` is
//! `None` until the store assigns it on insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-generated deck identifier.
pub type DeckId = i64;

/// Store-generated card identifier.
pub type CardId = i64;

/// A named collection of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Store-assigned id (`0` before persistence).
    pub id: DeckId,
    /// Deck title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Author name.
    pub author: String,
    /// Insert timestamp, assigned by the store.
    pub created_at: Option<DateTime<Utc>>,
}

impl Deck {
    /// Create an unpersisted deck.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            author: author.into(),
            created_at: None,
        }
    }

    /// Set the id, keeping every other field.
    #[must_use]
    pub const fn with_id(mut self, id: DeckId) -> Self {
        self.id = id;
        self
    }
}

/// A single flashcard belonging to a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Store-assigned id (`0` before persistence).
    pub id: CardId,
    /// Question side.
    pub front: String,
    /// Answer side.
    pub back: String,
    /// Owning deck. Referential integrity is the store's concern.
    pub deck_id: DeckId,
    /// Author name.
    pub author: String,
    /// Insert timestamp, assigned by the store.
    pub created_at: Option<DateTime<Utc>>,
}

impl Card {
    /// Create an unpersisted card.
    #[must_use]
    pub fn new(
        front: impl Into<String>,
        back: impl Into<String>,
        deck_id: DeckId,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            front: front.into(),
            back: back.into(),
            deck_id,
            author: author.into(),
            created_at: None,
        }
    }

    /// Set the id, keeping every other field.
    #[must_use]
    pub const fn with_id(mut self, id: CardId) -> Self {
        self.id = id;
        self
    }

    /// `true` for the placeholder a left outer join yields when a deck has no cards.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.id == 0
    }
}

/// Aggregate read view: one deck plus all of its cards.
///
/// Card order is not significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckWithCards {
    /// The parent deck.
    pub deck: Deck,
    /// The deck's cards, never containing a zero-id placeholder.
    pub cards: Vec<Card>,
}

impl DeckWithCards {
    /// Assemble the aggregate from `deck LEFT JOIN cards` rows.
    ///
    /// Every row repeats the deck columns; the card side of a row is a
    /// placeholder (id `0`) when the deck has no cards. Placeholders are
    /// dropped. Returns `None` when there are no rows at all, i.e. the deck
    /// does not exist.
    #[must_use]
    pub fn from_join_rows<I>(rows: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Deck, Card)>,
    {
        let mut rows = rows.into_iter();
        let (deck, first_card) = rows.next()?;

        let cards = std::iter::once(first_card)
            .chain(rows.map(|(_, card)| card))
            .filter(|card| !card.is_placeholder())
            .collect();

        Some(Self { deck, cards })
    }
}
