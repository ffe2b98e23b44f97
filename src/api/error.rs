//! HTTP rendering of [`Error`].
//!
//! Every error becomes `{ "error": message, "code": CODE, "field": field|null }`.
//! Caller mistakes map to 400/404/409; everything else is a 500 whose detail is
//! logged and withheld from the body. Extractor rejections are folded into the same
//! shape, so a malformed body or an unparsable id never produces a plain-text reply.

use crate::errors::Error;
use axum::Json;
use axum::extract::path::ErrorKind;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

impl Error {
    /// HTTP status and stable error code for this error.
    #[must_use]
    pub const fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } | Self::MissingField { .. } | Self::InvalidValue { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            Self::BadRequest { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::RatingOutOfRange { .. } => (StatusCode::BAD_REQUEST, "RATING_OUT_OF_RANGE"),
            Self::CheckViolation { .. } => (StatusCode::BAD_REQUEST, "CONSTRAINT_VIOLATION"),
            Self::MissingReference { .. } | Self::ForeignKeyViolation { .. } => {
                (StatusCode::BAD_REQUEST, "MISSING_REFERENCE")
            }
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::UniqueViolation { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            Self::ProtectedReference { .. } => (StatusCode::CONFLICT, "PROTECTED_REFERENCE"),
            Self::Config { .. } | Self::PasswordHash { .. } | Self::Database(_) | Self::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

/// Strips the fixed rejection prefix (`"Failed to deserialize ...: "`) from a body text.
fn rejection_detail(body_text: &str) -> &str {
    body_text
        .split_once(": ")
        .map_or(body_text, |(_, detail)| detail)
}

/// Classifies a serde failure reported as `[path: ]message`.
fn deserialize_error(detail: &str) -> Error {
    if let Some(field) = detail
        .split_once("missing field `")
        .and_then(|(_, rest)| rest.split_once('`'))
        .map(|(field, _)| field)
    {
        return Error::MissingField {
            field: field.to_string(),
        };
    }
    match detail.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            Error::InvalidValue {
                field: path.to_string(),
                message: message.to_string(),
            }
        }
        _ => Error::BadRequest {
            message: detail.to_string(),
        },
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                deserialize_error(rejection_detail(&err.body_text()))
            }
            other => Self::BadRequest {
                message: other.body_text(),
            },
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        match rejection {
            QueryRejection::FailedToDeserializeQueryString(err) => {
                deserialize_error(rejection_detail(&err.body_text()))
            }
            other => Self::BadRequest {
                message: other.body_text(),
            },
        }
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) if err.status().is_client_error() => {
                let field = match err.kind() {
                    ErrorKind::ParseErrorAtKey { key, .. }
                    | ErrorKind::DeserializeError { key, .. } => key.clone(),
                    // every resource route carries a single `{id}` segment
                    _ => "id".to_string(),
                };
                Self::InvalidValue {
                    field,
                    message: err.kind().to_string(),
                }
            }
            // a route/extractor mismatch, not a caller mistake
            other => Self::Config {
                message: other.body_text(),
            },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Internal error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = json!({
            "error": message,
            "code": code,
            "field": self.field(),
        });

        (status, Json(body)).into_response()
    }
}
