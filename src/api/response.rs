//! Shared response envelope types for API handlers.
//!
//! All successful API responses use a `{ "data": ... }` envelope.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    /// Response payload
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    /// Wraps `data` in the envelope.
    pub const fn new(data: T) -> Self {
        Self { data }
    }
}
