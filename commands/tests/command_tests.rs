//! Command-layer behaviour against in-memory collaborators.

#![allow(clippy::expect_used)]

mod common;

use common::Harness;
use flashcards_commands::{
    ByIdRequest, CommandError, CreateCardRequest, CreateDeckRequest, ErrorKind, ResourceCommands,
    UpdateCardRequest, UpdateDeckRequest,
};
use flashcards_core::{Card, Deck, OperationType, RepositoryError};
use flashcards_testing::{FailingPublisher, RecordingPublisher, StoreOperation};
use std::sync::Arc;

fn algebra() -> CreateDeckRequest {
    CreateDeckRequest {
        title: "Algebra".into(),
        description: "Basics".into(),
        author: "Ana".into(),
    }
}

fn card_for(deck_id: i64) -> CreateCardRequest {
    CreateCardRequest {
        front: "2+2".into(),
        back: "4".into(),
        deck_id,
        author: "Ana".into(),
    }
}

#[tokio::test]
async fn create_deck_then_card_then_read_aggregate() {
    let h = Harness::new();

    let deck = h.decks.create(algebra()).await.expect("deck created");
    assert!(deck.id > 0);
    assert_eq!(deck.title, "Algebra");
    assert_eq!(deck.description, "Basics");
    assert_eq!(deck.author, "Ana");
    assert_eq!(deck.created_at.as_deref(), Some("2025-01-01T00:00:00Z"));

    let card = h.cards.create(card_for(deck.id)).await.expect("card created");
    assert_eq!(card.deck_id, deck.id);
    assert!(card.created_at.is_some_and(|at| !at.is_empty()));

    let aggregate = h
        .decks
        .get_with_cards(ByIdRequest::new(deck.id))
        .await
        .expect("aggregate loaded");
    assert_eq!(aggregate.deck.id, deck.id);
    assert_eq!(aggregate.cards.len(), 1);
    assert_eq!(aggregate.cards[0].front, "2+2");

    assert_eq!(
        h.publisher.operations(),
        vec![
            OperationType::CreateDeck,
            OperationType::CreateCard,
            OperationType::GetDeckById
        ]
    );
}

#[tokio::test]
async fn create_then_get_returns_the_same_fields() {
    let h = Harness::new();
    let deck_id = h.store.insert_deck(Deck::new("Holder", "For cards", "Ana"));

    let created = h.cards.create(card_for(deck_id)).await.expect("card created");
    let loaded = h
        .cards
        .get_by_id(ByIdRequest::new(created.id))
        .await
        .expect("card loaded");

    assert_eq!(loaded, created);
    assert_eq!(loaded.front, "2+2");
    assert_eq!(loaded.back, "4");
    assert_eq!(loaded.author, "Ana");
}

#[tokio::test]
async fn update_of_missing_card_is_not_found_and_silent() {
    let h = Harness::new();

    let result = h
        .cards
        .update(UpdateCardRequest {
            id: 999,
            front: "x".into(),
            back: "y".into(),
            ..UpdateCardRequest::default()
        })
        .await;

    assert_eq!(result, Err(CommandError::NotFound("Card not found".into())));
    assert!(h.publisher.envelopes().is_empty());
}

#[tokio::test]
async fn update_of_missing_deck_is_not_found_and_silent() {
    let h = Harness::new();

    let result = h
        .decks
        .update(UpdateDeckRequest {
            id: 999,
            title: "Geometry".into(),
            description: "Shapes".into(),
            author: "Bo".into(),
        })
        .await;

    assert_eq!(result, Err(CommandError::NotFound("Deck not found".into())));
    assert_eq!(h.store.calls(), vec![StoreOperation::DeckUpdate]);
    assert!(h.publisher.envelopes().is_empty());
}

#[tokio::test]
async fn deck_create_then_get_returns_the_same_fields() {
    let h = Harness::new();

    let created = h.decks.create(algebra()).await.expect("deck created");
    let loaded = h
        .decks
        .get_by_id(ByIdRequest::new(created.id))
        .await
        .expect("deck loaded");

    assert_eq!(loaded, created);
    assert_eq!(loaded.title, "Algebra");
    assert_eq!(loaded.description, "Basics");
    assert_eq!(loaded.author, "Ana");
    assert_eq!(
        h.publisher.operations(),
        vec![OperationType::CreateDeck, OperationType::GetDeckById]
    );
}

#[tokio::test]
async fn delete_with_negative_id_never_reaches_the_repository() {
    let h = Harness::new();

    let result = h.cards.delete(ByIdRequest::new(-5)).await;

    assert_eq!(result.map_err(|e| e.kind()), Err(ErrorKind::InvalidArgument));
    assert!(h.store.calls().is_empty());
    assert!(h.publisher.envelopes().is_empty());
}

#[tokio::test]
async fn aggregate_of_deck_without_cards_is_empty() {
    let h = Harness::new();
    let deck_id = h.store.insert_deck(Deck::new("Empty", "No cards", "Bo"));

    let aggregate = h
        .decks
        .get_with_cards(ByIdRequest::new(deck_id))
        .await
        .expect("aggregate loaded");

    assert!(aggregate.cards.is_empty());
}

#[tokio::test]
async fn update_echoes_request_and_persists() {
    let h = Harness::new();
    let deck_id = h.store.insert_deck(Deck::new("Algebra", "Basics", "Ana"));

    let response = h
        .decks
        .update(UpdateDeckRequest {
            id: deck_id,
            title: "Geometry".into(),
            description: "Shapes".into(),
            author: "Bo".into(),
        })
        .await
        .expect("deck updated");

    assert_eq!(response.id, deck_id);
    assert_eq!(response.title, "Geometry");
    assert!(response.created_at.is_none());

    let stored = h.store.deck(deck_id).expect("row exists");
    assert_eq!(stored.title, "Geometry");
    assert!(stored.created_at.is_some());
    assert_eq!(h.publisher.operations(), vec![OperationType::UpdateDeck]);
}

#[tokio::test]
async fn card_update_moves_card_between_decks() {
    let h = Harness::new();
    let first = h.store.insert_deck(Deck::new("First", "1", "Ana"));
    let second = h.store.insert_deck(Deck::new("Second", "2", "Ana"));
    let card_id = h.store.insert_card(Card::new("2+2", "4", first, "Ana"));

    h.cards
        .update(UpdateCardRequest {
            id: card_id,
            front: "3+3".into(),
            back: "6".into(),
            deck_id: second,
            author: "Bo".into(),
        })
        .await
        .expect("card updated");

    let stored = h.store.card(card_id).expect("row exists");
    assert_eq!(stored.deck_id, second);
    assert_eq!(stored.author, "Bo");
}

#[tokio::test]
async fn get_missing_entities_is_not_found() {
    let h = Harness::new();

    assert_eq!(
        h.decks.get_by_id(ByIdRequest::new(42)).await,
        Err(CommandError::NotFound("Deck not found".into()))
    );
    assert_eq!(
        h.decks.get_with_cards(ByIdRequest::new(42)).await,
        Err(CommandError::NotFound("Deck not found".into()))
    );
    assert_eq!(
        h.cards.get_by_id(ByIdRequest::new(42)).await,
        Err(CommandError::NotFound("Card not found".into()))
    );
    assert!(h.publisher.envelopes().is_empty());
}

#[tokio::test]
async fn delete_of_missing_entity_is_not_found() {
    let h = Harness::new();

    let result = h.decks.delete(ByIdRequest::new(42)).await;

    assert_eq!(result.map_err(|e| e.kind()), Err(ErrorKind::NotFound));
    assert!(h.publisher.envelopes().is_empty());
}

#[tokio::test]
async fn delete_removes_entity_and_notifies() {
    let h = Harness::new();
    let deck_id = h.store.insert_deck(Deck::new("Algebra", "Basics", "Ana"));

    h.decks
        .delete(ByIdRequest::new(deck_id))
        .await
        .expect("deck deleted");

    assert!(h.store.deck(deck_id).is_none());
    let envelopes = h.publisher.envelopes();
    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0].operation, OperationType::DeleteDeck);
    assert_eq!(envelopes[0].raw_query, format!("{{\"id\":{deck_id}}}"));
}

#[tokio::test]
async fn storage_failures_are_internal() {
    let h = Harness::new();
    let deck_id = h.store.insert_deck(Deck::new("Algebra", "Basics", "Ana"));
    let broken = RepositoryError::Database("connection reset".into());
    h.store.fail_on(StoreOperation::DeckGet, broken.clone());
    h.store.fail_on(StoreOperation::DeckDelete, broken.clone());
    h.store.fail_on(StoreOperation::CardUpdate, broken);

    let get = h.decks.get_by_id(ByIdRequest::new(deck_id)).await;
    let delete = h.decks.delete(ByIdRequest::new(deck_id)).await;
    let update = h
        .cards
        .update(UpdateCardRequest {
            id: 1,
            front: "x".into(),
            back: "y".into(),
            ..UpdateCardRequest::default()
        })
        .await;

    assert_eq!(get, Err(CommandError::Internal("Failed to get deck".into())));
    assert_eq!(
        delete,
        Err(CommandError::Internal("Failed to delete deck".into()))
    );
    assert_eq!(
        update,
        Err(CommandError::Internal("Failed to update card".into()))
    );
    assert!(h.publisher.envelopes().is_empty());
}

#[tokio::test]
async fn storage_error_text_is_not_returned_to_callers() {
    let h = Harness::new();
    let deck_id = h.store.insert_deck(Deck::new("Algebra", "Basics", "Ana"));
    let broken = RepositoryError::Database("duplicate key on decks_pkey".into());
    h.store.fail_on(StoreOperation::DeckAdd, broken.clone());
    h.store.fail_on(StoreOperation::DeckUpdate, broken);

    let create = h.decks.create(algebra()).await;
    let update = h
        .decks
        .update(UpdateDeckRequest {
            id: deck_id,
            title: "Geometry".into(),
            description: "Shapes".into(),
            author: "Bo".into(),
        })
        .await;

    assert_eq!(
        create,
        Err(CommandError::Internal("Failed to add deck".into()))
    );
    assert_eq!(
        update,
        Err(CommandError::Internal("Failed to update deck".into()))
    );
    for error in [create.err(), update.err()].into_iter().flatten() {
        assert!(!error.to_string().contains("decks_pkey"));
    }
    assert!(h.publisher.envelopes().is_empty());
}

#[tokio::test]
async fn failed_reread_after_create_is_internal_without_notification() {
    let h = Harness::new();
    h.store.fail_on(
        StoreOperation::DeckGet,
        RepositoryError::Database("replica lag".into()),
    );

    let result = h.decks.create(algebra()).await;

    assert_eq!(
        result,
        Err(CommandError::Internal(
            "Failed to retrieve deck after creation".into()
        ))
    );
    assert_eq!(
        h.store.calls(),
        vec![StoreOperation::DeckAdd, StoreOperation::DeckGet]
    );
    assert!(h.publisher.envelopes().is_empty());
}

#[tokio::test]
async fn card_for_unknown_deck_is_internal() {
    let h = Harness::new();

    let result = h.cards.create(card_for(77)).await;

    assert_eq!(
        result,
        Err(CommandError::Internal("Failed to add card".into()))
    );
}

#[tokio::test]
async fn notification_failure_does_not_fail_the_command() {
    let failing = FailingPublisher::new();
    let h = Harness::with_publisher(RecordingPublisher::new(), Arc::new(failing.clone()));

    let deck = h.decks.create(algebra()).await.expect("deck created");
    h.decks
        .delete(ByIdRequest::new(deck.id))
        .await
        .expect("deck deleted");

    assert_eq!(failing.attempts(), 2);
}

#[tokio::test]
async fn raw_query_is_the_serialized_request() {
    let h = Harness::new();

    h.decks.create(algebra()).await.expect("deck created");

    let envelopes = h.publisher.envelopes();
    let raw: serde_json::Value =
        serde_json::from_str(&envelopes[0].raw_query).expect("raw_query is JSON");
    assert_eq!(raw["title"], "Algebra");
    assert_eq!(raw["description"], "Basics");
    assert_eq!(raw["author"], "Ana");
}
