//! Database configuration module for the booking backend.
//!
//! This module handles `SQLite` connection setup. Every connection is brought up
//! with foreign-key enforcement on and the schema from [`crate::schema`] ensured,
//! so cascade and protect rules hold from the first query.

use crate::errors::Result;
use crate::schema;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://stay_booking.sqlite?mode=rwc";

/// Pool size for file-backed databases.
const FILE_POOL_SIZE: u32 = 8;

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a local `SQLite` file, created on first use, if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Whether `database_url` names an in-memory database, which lives and dies with
/// a single connection.
fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Connects to `database_url` and ensures the schema exists.
///
/// In-memory databases get a single-connection pool; file databases get a shared
/// pool. The driver turns `foreign_keys` on for every pooled connection.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    let pool_size = if is_in_memory(database_url) {
        1
    } else {
        FILE_POOL_SIZE
    };
    let mut options = ConnectOptions::new(database_url);
    options.max_connections(pool_size).sqlx_logging(false);

    let db = Database::connect(options).await?;
    schema::create_tables(&db).await?;
    info!(url = %database_url, "Database ready");
    Ok(db)
}

/// Establishes a connection using `DATABASE_URL`.
pub async fn create_connection() -> Result<DatabaseConnection> {
    connect(&get_database_url()).await
}
