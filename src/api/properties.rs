//! Handlers for the `/properties` resource.

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::{AppState, DataResponse};
use crate::core::property::{self, NewProperty, PropertyFilter, PropertyUpdate};
use crate::entities::PropertyModel;
use crate::errors::{Error, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

/// Routes mounted at `/properties`.
///
/// ```text
/// GET    /        -> list (?host_id=)
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
    ApiQuery(filter): ApiQuery<PropertyFilter>,
) -> Result<Json<DataResponse<Vec<PropertyModel>>>> {
    let properties = property::list_properties(&state.db, &filter).await?;
    Ok(Json(DataResponse::new(properties)))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewProperty>,
) -> Result<(StatusCode, Json<DataResponse<PropertyModel>>)> {
    let property = property::create_property(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(property))))
}

async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DataResponse<PropertyModel>>> {
    property::get_property_by_id(&state.db, id)
        .await?
        .map(|p| Json(DataResponse::new(p)))
        .ok_or(Error::NotFound {
            entity: "Property",
            id,
        })
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<PropertyUpdate>,
) -> Result<Json<DataResponse<PropertyModel>>> {
    let property = property::update_property(&state.db, id, changes).await?;
    Ok(Json(DataResponse::new(property)))
}

async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    property::delete_property(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
