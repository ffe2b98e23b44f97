//! Handlers for the `/messages` resource.

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::{AppState, DataResponse};
use crate::core::message::{self, MessageFilter, MessageUpdate, NewMessage};
use crate::entities::MessageModel;
use crate::errors::{Error, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

/// Routes mounted at `/messages`.
///
/// ```text
/// GET    /        -> list (?sender_id=&recipient_id=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<MessageFilter>,
) -> Result<Json<DataResponse<Vec<MessageModel>>>> {
    let messages = message::list_messages(&state.db, &filter).await?;
    Ok(Json(DataResponse::new(messages)))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewMessage>,
) -> Result<(StatusCode, Json<DataResponse<MessageModel>>)> {
    let message = message::create_message(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(message))))
}

async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DataResponse<MessageModel>>> {
    message::get_message_by_id(&state.db, id)
        .await?
        .map(|m| Json(DataResponse::new(m)))
        .ok_or(Error::NotFound {
            entity: "Message",
            id,
        })
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<MessageUpdate>,
) -> Result<Json<DataResponse<MessageModel>>> {
    let message = message::update_message(&state.db, id, changes).await?;
    Ok(Json(DataResponse::new(message)))
}

async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    message::delete_message(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
