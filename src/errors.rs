//! Unified error types and result handling.
//!
//! Storage failures are classified on the way in: any `DbErr` converted with `?`
//! becomes the specific rule it violated (uniqueness, check constraint, foreign key,
//! required column) rather than an opaque database error.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// A field value failed validation before reaching storage
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending field
        field: &'static str,
        /// Human-readable description
        message: String,
    },

    /// A required field was empty or absent
    #[error("{field} is required")]
    MissingField {
        /// Missing field
        field: String,
    },

    /// A request value could not be read as the type its field expects
    #[error("Invalid {field}: {message}")]
    InvalidValue {
        /// Field path as named in the request
        field: String,
        /// Parser description
        message: String,
    },

    /// A request body or query string that could not be read at all
    #[error("Malformed request: {message}")]
    BadRequest {
        /// Parser description
        message: String,
    },

    /// A row looked up by primary key does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity name
        entity: &'static str,
        /// Requested primary key
        id: i64,
    },

    /// A referenced parent row does not exist
    #[error("Referenced {entity} {id} does not exist")]
    MissingReference {
        /// Foreign-key field on the written row
        field: &'static str,
        /// Referenced entity name
        entity: &'static str,
        /// Referenced primary key
        id: i64,
    },

    /// A unique constraint rejected the write
    #[error("A record with this {field} already exists")]
    UniqueViolation {
        /// Column carrying the unique constraint
        field: String,
    },

    /// A named check constraint rejected the write
    #[error("Constraint {constraint} violated")]
    CheckViolation {
        /// Constraint name as declared in the schema
        constraint: String,
    },

    /// A review rating outside `1..=5`
    #[error("Rating {rating} is outside the allowed range 1..=5")]
    RatingOutOfRange {
        /// Rejected rating
        rating: i32,
    },

    /// Deletion refused because the row is still referenced through a protective relation
    #[error("{entity} {id} is still in use and cannot be deleted")]
    ProtectedReference {
        /// Entity name
        entity: &'static str,
        /// Primary key of the protected row
        id: i64,
    },

    /// Foreign-key failure reported by storage without a pre-check catching it
    #[error("Foreign key constraint failed: {message}")]
    ForeignKeyViolation {
        /// Storage message
        message: String,
    },

    /// Credential derivation or parsing failed
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Human-readable description
        message: String,
    },

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(DbErr),

    /// I/O failure (config file, listener)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The field a caller should attach this error to, when there is one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } | Self::MissingReference { field, .. } => Some(*field),
            Self::MissingField { field }
            | Self::InvalidValue { field, .. }
            | Self::UniqueViolation { field } => Some(field.as_str()),
            Self::CheckViolation { constraint } => crate::schema::constraint_field(constraint),
            Self::RatingOutOfRange { .. } => Some("rating"),
            _ => None,
        }
    }

    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                return Self::UniqueViolation {
                    field: failed_column(&message).unwrap_or("unknown").to_string(),
                };
            }
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                return Self::ForeignKeyViolation { message };
            }
            _ => {}
        }

        let message = err.to_string();
        if let Some(constraint) = after_marker(&message, "CHECK constraint failed: ") {
            return Self::CheckViolation {
                constraint: constraint.to_string(),
            };
        }
        if let Some(column) = after_marker(&message, "NOT NULL constraint failed: ") {
            return Self::MissingField {
                field: failed_column(column).unwrap_or(column).to_string(),
            };
        }
        Self::Database(err)
    }
}

/// Returns the first token following `marker` in a storage error message.
fn after_marker<'a>(message: &'a str, marker: &str) -> Option<&'a str> {
    let start = message.find(marker)? + marker.len();
    message
        .get(start..)?
        .split(|c: char| c.is_whitespace() || c == ',' || c == ')')
        .find(|token| !token.is_empty())
}

/// Extracts `email` from messages such as `UNIQUE constraint failed: users.email`.
fn failed_column(message: &str) -> Option<&str> {
    let qualified = after_marker(message, "failed: ").unwrap_or(message);
    qualified.rsplit('.').next().filter(|column| !column.is_empty())
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
