//! REST transcoding layer for the flashcards service.
//!
//! The router turns HTTP requests into typed command requests and maps
//! command results back to JSON. All behaviour lives in the command layer;
//! this crate only decides routes, status codes and headers.
//!
//! # Routes
//!
//! | Method   | Path             | Command                         |
//! |----------|------------------|---------------------------------|
//! | `POST`   | `/v1/decks`      | `CreateDeck`                    |
//! | `GET`    | `/v1/decks/:id`  | `GetDeckById` (deck with cards) |
//! | `PUT`    | `/v1/decks/:id`  | `UpdateDeck`                    |
//! | `DELETE` | `/v1/decks/:id`  | `DeleteDeck`                    |
//! | `POST`   | `/v1/cards`      | `CreateCard`                    |
//! | `GET`    | `/v1/cards/:id`  | `GetCardById`                   |
//! | `PUT`    | `/v1/cards/:id`  | `UpdateCard`                    |
//! | `DELETE` | `/v1/cards/:id`  | `DeleteCard`                    |
//! | `GET`    | `/health`        | liveness                        |
//!
//! Command errors map to `400 INVALID_ARGUMENT`, `404 NOT_FOUND` and
//! `500 INTERNAL`.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use error::AppError;
pub use middleware::{correlation_id_layer, CorrelationId, CORRELATION_ID_HEADER};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/v1/decks", post(handlers::decks::create_deck))
        .route(
            "/v1/decks/:id",
            get(handlers::decks::get_deck)
                .put(handlers::decks::update_deck)
                .delete(handlers::decks::delete_deck),
        )
        .route("/v1/cards", post(handlers::cards::create_card))
        .route(
            "/v1/cards/:id",
            get(handlers::cards::get_card)
                .put(handlers::cards::update_card)
                .delete(handlers::cards::delete_card),
        )
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
