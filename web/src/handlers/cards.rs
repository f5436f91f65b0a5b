//! `/v1/cards` handlers.

use crate::{AppState, WebResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use flashcards_commands::{
    ByIdRequest, CardResponse, CreateCardRequest, DeleteResponse, ResourceCommands,
    UpdateCardRequest,
};

/// `POST /v1/cards`
pub async fn create_card(
    State(state): State<AppState>,
    body: Result<Json<CreateCardRequest>, JsonRejection>,
) -> WebResult<Json<CardResponse>> {
    let Json(request) = body?;
    Ok(Json(state.cards.create(request).await?))
}

/// `GET /v1/cards/:id`
pub async fn get_card(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> WebResult<Json<CardResponse>> {
    let Path(id) = id?;
    Ok(Json(state.cards.get_by_id(ByIdRequest::new(id)).await?))
}

/// `PUT /v1/cards/:id`
///
/// The path id wins over any `id` in the body.
pub async fn update_card(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateCardRequest>, JsonRejection>,
) -> WebResult<Json<CardResponse>> {
    let Path(id) = id?;
    let Json(request) = body?;
    let request = UpdateCardRequest { id, ..request };
    Ok(Json(state.cards.update(request).await?))
}

/// `DELETE /v1/cards/:id`
pub async fn delete_card(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> WebResult<Json<DeleteResponse>> {
    let Path(id) = id?;
    Ok(Json(state.cards.delete(ByIdRequest::new(id)).await?))
}
