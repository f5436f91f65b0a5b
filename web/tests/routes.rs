//! REST routes driven through the router with in-memory collaborators.

#![allow(clippy::expect_used)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use flashcards_commands::{CardCommands, DeckCommands, Notifier};
use flashcards_core::{Deck, OperationType};
use flashcards_testing::{InMemoryStore, RecordingPublisher, test_clock};
use flashcards_web::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    store: InMemoryStore,
    publisher: RecordingPublisher,
}

fn test_app() -> TestApp {
    let store = InMemoryStore::new();
    let publisher = RecordingPublisher::new();
    let notifier = Notifier::new(Arc::new(publisher.clone()), Arc::new(test_clock()));
    let state = AppState::new(
        DeckCommands::new(Arc::new(store.clone()), notifier.clone()),
        CardCommands::new(Arc::new(store.clone()), notifier),
    );

    TestApp {
        router: router(state),
        store,
        publisher,
    }
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}

#[tokio::test]
async fn deck_and_card_lifecycle() {
    let app = test_app();

    let (status, deck) = send(
        &app,
        Method::POST,
        "/v1/decks",
        Some(json!({"title": "Algebra", "description": "Basics", "author": "Ana"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let deck_id = deck["id"].as_i64().expect("deck id");
    assert_eq!(deck["title"], "Algebra");
    assert_eq!(deck["created_at"], "2025-01-01T00:00:00Z");

    let (status, card) = send(
        &app,
        Method::POST,
        "/v1/cards",
        Some(json!({"front": "2+2", "back": "4", "deck_id": deck_id, "author": "Ana"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["deck_id"], deck_id);

    let (status, aggregate) = send(&app, Method::GET, &format!("/v1/decks/{deck_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(aggregate["deck"]["id"], deck_id);
    assert_eq!(aggregate["cards"].as_array().map(Vec::len), Some(1));
    assert_eq!(aggregate["cards"][0]["front"], "2+2");

    let (status, body) = send(&app, Method::DELETE, &format!("/v1/decks/{deck_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    assert_eq!(
        app.publisher.operations(),
        vec![
            OperationType::CreateDeck,
            OperationType::CreateCard,
            OperationType::GetDeckById,
            OperationType::DeleteDeck
        ]
    );
}

#[tokio::test]
async fn card_create_accepts_camel_case_deck_id() {
    let app = test_app();
    let deck_id = app.store.insert_deck(Deck::new("Algebra", "Basics", "Ana"));

    let (status, card) = send(
        &app,
        Method::POST,
        "/v1/cards",
        Some(json!({"front": "2+2", "back": "4", "deckId": deck_id, "author": "Ana"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["deck_id"], deck_id);
    let card_id = card["id"].as_i64().expect("card id");
    assert_eq!(app.store.card(card_id).expect("row exists").deck_id, deck_id);
}

#[tokio::test]
async fn update_uses_path_id() {
    let app = test_app();
    let deck_id = app.store.insert_deck(Deck::new("Algebra", "Basics", "Ana"));

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/v1/decks/{deck_id}"),
        Some(json!({"id": 999, "title": "Geometry", "description": "Shapes", "author": "Bo"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], deck_id);
    assert!(body.get("created_at").is_none());
    assert_eq!(
        app.store.deck(deck_id).expect("row exists").title,
        "Geometry"
    );
}

#[tokio::test]
async fn missing_card_update_is_404() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::PUT,
        "/v1/cards/999",
        Some(json!({"front": "x", "back": "y"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"code": "NOT_FOUND", "message": "Card not found"}));
    assert!(app.publisher.envelopes().is_empty());
}

#[tokio::test]
async fn negative_id_is_400() {
    let app = test_app();

    let (status, body) = send(&app, Method::DELETE, "/v1/cards/-5", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn deck_delete_errors_map_to_status() {
    let app = test_app();

    let (status, body) = send(&app, Method::DELETE, "/v1/decks/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"code": "NOT_FOUND", "message": "Deck not found"}));

    let (status, body) = send(&app, Method::DELETE, "/v1/decks/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
    assert!(app.publisher.envelopes().is_empty());
}

#[tokio::test]
async fn missing_field_is_400() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/decks",
        Some(json!({"title": "Algebra", "author": "Ana"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"code": "INVALID_ARGUMENT", "message": "title, description, and author are required"})
    );
}

#[tokio::test]
async fn malformed_path_and_body_are_400() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/v1/cards/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/cards")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("valid request");
    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_deck_is_404() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/v1/decks/42", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Deck not found");
}

#[tokio::test]
async fn health_is_ok() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
}
