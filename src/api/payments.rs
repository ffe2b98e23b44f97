//! Handlers for the `/payments` resource.

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::{AppState, DataResponse};
use crate::core::payment::{self, NewPayment, PaymentFilter, PaymentUpdate};
use crate::entities::PaymentModel;
use crate::errors::{Error, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

/// Routes mounted at `/payments`.
///
/// ```text
/// GET    /        -> list (?booking_id=)
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
    ApiQuery(filter): ApiQuery<PaymentFilter>,
) -> Result<Json<DataResponse<Vec<PaymentModel>>>> {
    let payments = payment::list_payments(&state.db, &filter).await?;
    Ok(Json(DataResponse::new(payments)))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewPayment>,
) -> Result<(StatusCode, Json<DataResponse<PaymentModel>>)> {
    let payment = payment::create_payment(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(payment))))
}

async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DataResponse<PaymentModel>>> {
    payment::get_payment_by_id(&state.db, id)
        .await?
        .map(|p| Json(DataResponse::new(p)))
        .ok_or(Error::NotFound {
            entity: "Payment",
            id,
        })
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<PaymentUpdate>,
) -> Result<Json<DataResponse<PaymentModel>>> {
    let payment = payment::update_payment(&state.db, id, changes).await?;
    Ok(Json(DataResponse::new(payment)))
}

async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    payment::delete_payment(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
