//! In-memory repository implementation.

use crate::test_clock;
use chrono::{DateTime, Utc};
use flashcards_core::environment::Clock;
use flashcards_core::repository::RepositoryFuture;
use flashcards_core::{
    Card, CardId, CardRepository, Deck, DeckId, DeckRepository, DeckWithCards, RepositoryError,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Repository method identifier, used for call accounting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `DeckRepository::add`
    DeckAdd,
    /// `DeckRepository::get_by_id`
    DeckGet,
    /// `DeckRepository::update`
    DeckUpdate,
    /// `DeckRepository::delete`
    DeckDelete,
    /// `DeckRepository::get_with_cards_by_id`
    DeckGetWithCards,
    /// `CardRepository::add`
    CardAdd,
    /// `CardRepository::get_by_id`
    CardGet,
    /// `CardRepository::update`
    CardUpdate,
    /// `CardRepository::delete`
    CardDelete,
}

#[derive(Debug, Default)]
struct Tables {
    decks: BTreeMap<DeckId, Deck>,
    cards: BTreeMap<CardId, Card>,
    next_deck_id: DeckId,
    next_card_id: CardId,
    calls: Vec<StoreOperation>,
    failures: HashMap<StoreOperation, RepositoryError>,
}

/// Both repository capabilities over shared in-memory tables.
///
/// Behaves like the relational store: ids start at 1, `created_at` is stamped
/// on insert, deleting a deck cascades to its cards and a card must reference
/// an existing deck. Clones share the same tables.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    created_at: DateTime<Utc>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty store stamping rows with [`test_clock`] time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            created_at: test_clock().now(),
        }
    }

    /// Make every future call of `operation` fail with `error`.
    pub fn fail_on(&self, operation: StoreOperation, error: RepositoryError) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.failures.insert(operation, error);
        }
    }

    /// Seed a deck without recording a call. Returns the assigned id.
    pub fn insert_deck(&self, deck: Deck) -> DeckId {
        self.tables
            .lock()
            .map(|mut tables| Self::insert_deck_row(&mut tables, deck, self.created_at))
            .unwrap_or_default()
    }

    /// Seed a card without recording a call. Returns the assigned id.
    pub fn insert_card(&self, card: Card) -> CardId {
        self.tables
            .lock()
            .map(|mut tables| Self::insert_card_row(&mut tables, card, self.created_at))
            .unwrap_or_default()
    }

    /// Current state of a deck row.
    #[must_use]
    pub fn deck(&self, id: DeckId) -> Option<Deck> {
        self.tables.lock().ok()?.decks.get(&id).cloned()
    }

    /// Current state of a card row.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<Card> {
        self.tables.lock().ok()?.cards.get(&id).cloned()
    }

    /// Repository calls made so far, in order. Seeding is not recorded.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreOperation> {
        self.tables
            .lock()
            .map(|tables| tables.calls.clone())
            .unwrap_or_default()
    }

    fn insert_deck_row(tables: &mut Tables, mut deck: Deck, created_at: DateTime<Utc>) -> DeckId {
        tables.next_deck_id += 1;
        deck.id = tables.next_deck_id;
        deck.created_at = Some(created_at);
        tables.decks.insert(deck.id, deck);
        tables.next_deck_id
    }

    fn insert_card_row(tables: &mut Tables, mut card: Card, created_at: DateTime<Utc>) -> CardId {
        tables.next_card_id += 1;
        card.id = tables.next_card_id;
        card.created_at = Some(created_at);
        tables.cards.insert(card.id, card);
        tables.next_card_id
    }

    /// Record the call, apply any injected failure, then run `f` on the tables.
    fn run<T>(
        &self,
        operation: StoreOperation,
        f: impl FnOnce(&mut Tables) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| RepositoryError::Database("store lock poisoned".to_string()))?;

        tables.calls.push(operation);
        if let Some(error) = tables.failures.get(&operation) {
            return Err(error.clone());
        }
        f(&mut tables)
    }
}

impl DeckRepository for InMemoryStore {
    fn add(&self, deck: &Deck) -> RepositoryFuture<'_, DeckId> {
        let deck = deck.clone();
        Box::pin(async move {
            self.run(StoreOperation::DeckAdd, |tables| {
                Ok(Self::insert_deck_row(tables, deck, self.created_at))
            })
        })
    }

    fn get_by_id(&self, id: DeckId) -> RepositoryFuture<'_, Deck> {
        Box::pin(async move {
            self.run(StoreOperation::DeckGet, |tables| {
                tables
                    .decks
                    .get(&id)
                    .cloned()
                    .ok_or(RepositoryError::deck_not_found(id))
            })
        })
    }

    fn update(&self, deck: &Deck) -> RepositoryFuture<'_, u64> {
        let deck = deck.clone();
        Box::pin(async move {
            self.run(StoreOperation::DeckUpdate, |tables| {
                Ok(tables.decks.get_mut(&deck.id).map_or(0, |row| {
                    row.title = deck.title;
                    row.description = deck.description;
                    row.author = deck.author;
                    1
                }))
            })
        })
    }

    fn delete(&self, id: DeckId) -> RepositoryFuture<'_, ()> {
        Box::pin(async move {
            self.run(StoreOperation::DeckDelete, |tables| {
                tables
                    .decks
                    .remove(&id)
                    .ok_or(RepositoryError::deck_not_found(id))?;
                tables.cards.retain(|_, card| card.deck_id != id);
                Ok(())
            })
        })
    }

    fn get_with_cards_by_id(&self, id: DeckId) -> RepositoryFuture<'_, DeckWithCards> {
        Box::pin(async move {
            self.run(StoreOperation::DeckGetWithCards, |tables| {
                let deck = tables
                    .decks
                    .get(&id)
                    .cloned()
                    .ok_or(RepositoryError::deck_not_found(id))?;
                let cards = tables
                    .cards
                    .values()
                    .filter(|card| card.deck_id == id)
                    .cloned()
                    .collect();
                Ok(DeckWithCards { deck, cards })
            })
        })
    }
}

impl CardRepository for InMemoryStore {
    fn add(&self, card: &Card) -> RepositoryFuture<'_, CardId> {
        let card = card.clone();
        Box::pin(async move {
            self.run(StoreOperation::CardAdd, |tables| {
                if !tables.decks.contains_key(&card.deck_id) {
                    return Err(RepositoryError::Database(format!(
                        "insert violates foreign key: deck {} does not exist",
                        card.deck_id
                    )));
                }
                Ok(Self::insert_card_row(tables, card, self.created_at))
            })
        })
    }

    fn get_by_id(&self, id: CardId) -> RepositoryFuture<'_, Card> {
        Box::pin(async move {
            self.run(StoreOperation::CardGet, |tables| {
                tables
                    .cards
                    .get(&id)
                    .cloned()
                    .ok_or(RepositoryError::card_not_found(id))
            })
        })
    }

    fn update(&self, card: &Card) -> RepositoryFuture<'_, u64> {
        let card = card.clone();
        Box::pin(async move {
            self.run(StoreOperation::CardUpdate, |tables| {
                Ok(tables.cards.get_mut(&card.id).map_or(0, |row| {
                    row.front = card.front;
                    row.back = card.back;
                    row.deck_id = card.deck_id;
                    row.author = card.author;
                    1
                }))
            })
        })
    }

    fn delete(&self, id: CardId) -> RepositoryFuture<'_, ()> {
        Box::pin(async move {
            self.run(StoreOperation::CardDelete, |tables| {
                tables
                    .cards
                    .remove(&id)
                    .map(|_| ())
                    .ok_or(RepositoryError::card_not_found(id))
            })
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_start_at_one_and_rows_get_created_at() {
        let store = InMemoryStore::new();

        let id = DeckRepository::add(&store, &Deck::new("Algebra", "Basics", "Ana"))
            .await
            .expect("add succeeds");
        assert_eq!(id, 1);

        let deck = store.deck(id).expect("row exists");
        assert_eq!(deck.created_at, Some(test_clock().now()));
        assert_eq!(store.calls(), vec![StoreOperation::DeckAdd]);
    }

    #[tokio::test]
    async fn deleting_a_deck_cascades_to_its_cards() {
        let store = InMemoryStore::new();
        let deck_id = store.insert_deck(Deck::new("Algebra", "Basics", "Ana"));
        let card_id = store.insert_card(Card::new("2+2", "4", deck_id, "Ana"));

        DeckRepository::delete(&store, deck_id)
            .await
            .expect("delete succeeds");

        assert!(store.card(card_id).is_none());
    }

    #[tokio::test]
    async fn card_requires_existing_deck() {
        let store = InMemoryStore::new();

        let result = CardRepository::add(&store, &Card::new("2+2", "4", 42, "Ana")).await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }

    #[tokio::test]
    async fn injected_failure_is_returned_and_recorded() {
        let store = InMemoryStore::new();
        store.fail_on(
            StoreOperation::CardGet,
            RepositoryError::Database("connection reset".to_string()),
        );

        let result = CardRepository::get_by_id(&store, 1).await;

        assert_eq!(
            result,
            Err(RepositoryError::Database("connection reset".to_string()))
        );
        assert_eq!(store.calls(), vec![StoreOperation::CardGet]);
    }

    #[tokio::test]
    async fn dropped_future_writes_nothing() {
        let store = InMemoryStore::new();

        let pending = DeckRepository::add(&store, &Deck::new("Algebra", "Basics", "Ana"));
        drop(pending);

        assert!(store.deck(1).is_none());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_row_affects_nothing() {
        let store = InMemoryStore::new();

        let affected = DeckRepository::update(&store, &Deck::new("a", "b", "c").with_id(9))
            .await
            .expect("update succeeds");

        assert_eq!(affected, 0);
    }
}
