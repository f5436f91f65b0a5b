//! `/v1/decks` handlers.

use crate::{AppState, WebResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use flashcards_commands::{
    ByIdRequest, CreateDeckRequest, DeckResponse, DeckWithCardsResponse, DeleteResponse,
    ResourceCommands, UpdateDeckRequest,
};

/// `POST /v1/decks`
pub async fn create_deck(
    State(state): State<AppState>,
    body: Result<Json<CreateDeckRequest>, JsonRejection>,
) -> WebResult<Json<DeckResponse>> {
    let Json(request) = body?;
    Ok(Json(state.decks.create(request).await?))
}

/// `GET /v1/decks/:id`, returning the deck with all of its cards.
pub async fn get_deck(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> WebResult<Json<DeckWithCardsResponse>> {
    let Path(id) = id?;
    Ok(Json(state.decks.get_with_cards(ByIdRequest::new(id)).await?))
}

/// `PUT /v1/decks/:id`
///
/// The path id wins over any `id` in the body.
pub async fn update_deck(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateDeckRequest>, JsonRejection>,
) -> WebResult<Json<DeckResponse>> {
    let Path(id) = id?;
    let Json(request) = body?;
    let request = UpdateDeckRequest { id, ..request };
    Ok(Json(state.decks.update(request).await?))
}

/// `DELETE /v1/decks/:id`
pub async fn delete_deck(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> WebResult<Json<DeleteResponse>> {
    let Path(id) = id?;
    Ok(Json(state.decks.delete(ByIdRequest::new(id)).await?))
}
