//! Handlers for the `/reviews` resource.

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::{AppState, DataResponse};
use crate::core::review::{self, NewReview, ReviewFilter, ReviewUpdate};
use crate::entities::ReviewModel;
use crate::errors::{Error, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

/// Routes mounted at `/reviews`.
///
/// ```text
/// GET    /        -> list (?property_id=&user_id=)
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
    ApiQuery(filter): ApiQuery<ReviewFilter>,
) -> Result<Json<DataResponse<Vec<ReviewModel>>>> {
    let reviews = review::list_reviews(&state.db, &filter).await?;
    Ok(Json(DataResponse::new(reviews)))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewReview>,
) -> Result<(StatusCode, Json<DataResponse<ReviewModel>>)> {
    let review = review::create_review(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(review))))
}

async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DataResponse<ReviewModel>>> {
    review::get_review_by_id(&state.db, id)
        .await?
        .map(|r| Json(DataResponse::new(r)))
        .ok_or(Error::NotFound {
            entity: "Review",
            id,
        })
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<ReviewUpdate>,
) -> Result<Json<DataResponse<ReviewModel>>> {
    let review = review::update_review(&state.db, id, changes).await?;
    Ok(Json(DataResponse::new(review)))
}

async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    review::delete_review(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
