//! Core business logic - framework-agnostic operations over the booking data model.
//!
//! Each submodule owns one entity: create, retrieve-by-id, list (optionally filtered by
//! an owning foreign key), update, and delete. Field validation that storage cannot
//! express (lengths, fixed-point scale) happens here; relational invariants are left
//! to the schema and surface through [`crate::errors::Error`].

pub mod booking;
pub mod message;
pub mod password;
pub mod payment;
pub mod property;
pub mod review;
pub mod role;
pub mod user;

use crate::entities::Money;
use crate::errors::{Error, Result};
use rust_decimal::Decimal;

/// Largest magnitude a `DECIMAL(10, 2)` money field can hold, exclusive.
const MONEY_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Validates a monetary amount and returns it with exactly two fractional digits.
pub(crate) fn fixed_point(field: &'static str, value: Decimal) -> Result<Money> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(Error::validation(field, "must not be negative"));
    }
    let normalized = value.normalize();
    if normalized.scale() > 2 {
        return Err(Error::validation(
            field,
            "must have at most 2 decimal places",
        ));
    }
    if normalized >= MONEY_LIMIT {
        return Err(Error::validation(field, "must have at most 10 digits"));
    }
    Ok(Money::from(normalized))
}

/// Trims `value` and checks it is non-empty and within `max_chars`.
pub(crate) fn required_text(field: &'static str, value: &str, max_chars: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::MissingField {
            field: field.to_string(),
        });
    }
    if trimmed.chars().count() > max_chars {
        return Err(Error::validation(
            field,
            format!("must be at most {max_chars} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// [`required_text`] for free-form bodies, which have no length cap.
pub(crate) fn required_body(field: &'static str, value: &str) -> Result<String> {
    required_text(field, value, usize::MAX)
}
