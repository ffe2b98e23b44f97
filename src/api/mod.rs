//! REST API - a thin axum CRUD surface over [`crate::core`].
//!
//! Route hierarchy:
//!
//! ```text
//! /health                     liveness + database ping
//! /api/properties[/{id}]
//! /api/bookings[/{id}]
//! /api/payments[/{id}]
//! /api/reviews[/{id}]
//! /api/messages[/{id}]
//! ```

mod bookings;
mod error;
mod extract;
mod messages;
mod payments;
mod properties;
mod response;
mod reviews;

pub use response::DataResponse;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state available to all handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/properties", properties::router())
        .nest("/bookings", bookings::router())
        .nest("/payments", payments::router())
        .nest("/reviews", reviews::router())
        .nest("/messages", messages::router());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let db_healthy = state.db.ping().await.is_ok();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "db_healthy": db_healthy,
    }))
}
