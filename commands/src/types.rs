//! Typed request and response messages.
//!
//! These are the service's RPC surface. Requests deserialize with every field
//! defaulted, so a missing field reaches validation as an empty value and is
//! rejected as an invalid argument rather than as a decoding failure.
//!
//! Field names are written in snake_case. The lowerCamelCase spellings
//! (`deckId`, `createdAt`) are accepted on input as well.

use chrono::{DateTime, SecondsFormat, Utc};
use flashcards_core::{Card, CardId, Deck, DeckId, DeckWithCards};
use serde::{Deserialize, Serialize};

/// Request addressing a single entity by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ByIdRequest {
    /// Entity id.
    pub id: i64,
}

impl ByIdRequest {
    /// Request for `id`.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self { id }
    }
}

/// `CreateDeck` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateDeckRequest {
    /// Deck title (required).
    pub title: String,
    /// Deck description (required).
    pub description: String,
    /// Author name (required).
    pub author: String,
}

impl CreateDeckRequest {
    pub(crate) fn to_deck(&self) -> Deck {
        Deck::new(&self.title, &self.description, &self.author)
    }
}

/// `UpdateDeck` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateDeckRequest {
    /// Deck to update.
    pub id: DeckId,
    /// New title (required).
    pub title: String,
    /// New description (required).
    pub description: String,
    /// New author (required).
    pub author: String,
}

impl UpdateDeckRequest {
    pub(crate) fn to_deck(&self) -> Deck {
        Deck::new(&self.title, &self.description, &self.author).with_id(self.id)
    }
}

/// A deck as returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckResponse {
    /// Deck id.
    pub id: DeckId,
    /// Deck title.
    pub title: String,
    /// Deck description.
    pub description: String,
    /// Author name.
    pub author: String,
    /// RFC 3339 insert timestamp; absent on update responses.
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<Deck> for DeckResponse {
    fn from(deck: Deck) -> Self {
        Self {
            id: deck.id,
            title: deck.title,
            description: deck.description,
            author: deck.author,
            created_at: deck.created_at.as_ref().map(format_timestamp),
        }
    }
}

impl From<UpdateDeckRequest> for DeckResponse {
    fn from(request: UpdateDeckRequest) -> Self {
        Self {
            id: request.id,
            title: request.title,
            description: request.description,
            author: request.author,
            created_at: None,
        }
    }
}

/// `GetDeckById` response: a deck and all of its cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckWithCardsResponse {
    /// The deck.
    pub deck: DeckResponse,
    /// The deck's cards, in no particular order.
    pub cards: Vec<CardResponse>,
}

impl From<DeckWithCards> for DeckWithCardsResponse {
    fn from(aggregate: DeckWithCards) -> Self {
        Self {
            deck: aggregate.deck.into(),
            cards: aggregate
                .cards
                .into_iter()
                .filter(|card| !card.is_placeholder())
                .map(CardResponse::from)
                .collect(),
        }
    }
}

/// `CreateCard` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateCardRequest {
    /// Question side (required).
    pub front: String,
    /// Answer side (required).
    pub back: String,
    /// Owning deck.
    #[serde(alias = "deckId")]
    pub deck_id: DeckId,
    /// Author name.
    pub author: String,
}

impl CreateCardRequest {
    pub(crate) fn to_card(&self) -> Card {
        Card::new(&self.front, &self.back, self.deck_id, &self.author)
    }
}

/// `UpdateCard` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateCardRequest {
    /// Card to update.
    pub id: CardId,
    /// New question side (required).
    pub front: String,
    /// New answer side (required).
    pub back: String,
    /// New owning deck.
    #[serde(alias = "deckId")]
    pub deck_id: DeckId,
    /// New author.
    pub author: String,
}

impl UpdateCardRequest {
    pub(crate) fn to_card(&self) -> Card {
        Card::new(&self.front, &self.back, self.deck_id, &self.author).with_id(self.id)
    }
}

/// A card as returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardResponse {
    /// Card id.
    pub id: CardId,
    /// Question side.
    pub front: String,
    /// Answer side.
    pub back: String,
    /// Owning deck.
    #[serde(alias = "deckId")]
    pub deck_id: DeckId,
    /// Author name.
    pub author: String,
    /// RFC 3339 insert timestamp; absent on update responses.
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            front: card.front,
            back: card.back,
            deck_id: card.deck_id,
            author: card.author,
            created_at: card.created_at.as_ref().map(format_timestamp),
        }
    }
}

impl From<UpdateCardRequest> for CardResponse {
    fn from(request: UpdateCardRequest) -> Self {
        Self {
            id: request.id,
            front: request.front,
            back: request.back,
            deck_id: request.deck_id,
            author: request.author,
            created_at: None,
        }
    }
}

/// Empty response of the delete operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
