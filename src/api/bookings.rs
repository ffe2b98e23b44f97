//! Handlers for the `/bookings` resource.

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::{AppState, DataResponse};
use crate::core::booking::{self, BookingFilter, BookingUpdate, NewBooking};
use crate::entities::BookingModel;
use crate::errors::{Error, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

/// Routes mounted at `/bookings`.
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
    ApiQuery(filter): ApiQuery<BookingFilter>,
) -> Result<Json<DataResponse<Vec<BookingModel>>>> {
    let bookings = booking::list_bookings(&state.db, &filter).await?;
    Ok(Json(DataResponse::new(bookings)))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewBooking>,
) -> Result<(StatusCode, Json<DataResponse<BookingModel>>)> {
    let booking = booking::create_booking(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(booking))))
}

async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DataResponse<BookingModel>>> {
    booking::get_booking_by_id(&state.db, id)
        .await?
        .map(|b| Json(DataResponse::new(b)))
        .ok_or(Error::NotFound {
            entity: "Booking",
            id,
        })
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<BookingUpdate>,
) -> Result<Json<DataResponse<BookingModel>>> {
    let booking = booking::update_booking(&state.db, id, changes).await?;
    Ok(Json(DataResponse::new(booking)))
}

async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    booking::delete_booking(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
