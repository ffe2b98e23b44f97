//! Payment business logic - money recorded against a booking.

use super::booking;
use crate::{
    entities::{Payment, payment},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

const MAX_METHOD_CHARS: usize = 50;

/// Fields required to record a payment.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPayment {
    /// Booking being paid
    pub booking_id: i64,
    /// Amount received
    pub amount: Decimal,
    /// Free-text method, e.g. `"card"`
    pub payment_method: String,
    /// When the payment was made; now when omitted
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
}

/// Payment fields that may change.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentUpdate {
    /// Corrected amount
    pub amount: Option<Decimal>,
    /// Corrected method
    pub payment_method: Option<String>,
    /// Corrected date
    pub payment_date: Option<DateTime<Utc>>,
}

/// Booking filter for [`list_payments`].
#[derive(Debug, Default, Deserialize)]
pub struct PaymentFilter {
    /// Only payments for this booking
    pub booking_id: Option<i64>,
}

/// Records a payment against an existing booking.
///
/// # Errors
/// - [`Error::Validation`] for a negative or over-precise amount, or an over-long method
/// - [`Error::MissingField`] if the method is empty
/// - [`Error::MissingReference`] if the booking does not exist
pub async fn create_payment(
    db: &DatabaseConnection,
    new_payment: NewPayment,
) -> Result<payment::Model> {
    let amount = super::fixed_point("amount", new_payment.amount)?;
    let payment_method =
        super::required_text("payment_method", &new_payment.payment_method, MAX_METHOD_CHARS)?;
    booking::require_booking(db, new_payment.booking_id, "booking_id").await?;

    payment::ActiveModel {
        booking_id: Set(new_payment.booking_id),
        amount: Set(amount),
        payment_method: Set(payment_method),
        payment_date: Set(new_payment.payment_date.unwrap_or_else(Utc::now)),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Retrieves a payment by ID.
pub async fn get_payment_by_id(
    db: &DatabaseConnection,
    payment_id: i64,
) -> Result<Option<payment::Model>> {
    Payment::find_by_id(payment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists payments, most recent first.
pub async fn list_payments(
    db: &DatabaseConnection,
    filter: &PaymentFilter,
) -> Result<Vec<payment::Model>> {
    let mut query = Payment::find()
        .order_by_desc(payment::Column::PaymentDate)
        .order_by_desc(payment::Column::Id);
    if let Some(booking_id) = filter.booking_id {
        query = query.filter(payment::Column::BookingId.eq(booking_id));
    }
    query.all(db).await.map_err(Into::into)
}

/// Applies `changes` to a payment.
pub async fn update_payment(
    db: &DatabaseConnection,
    payment_id: i64,
    changes: PaymentUpdate,
) -> Result<payment::Model> {
    let mut payment: payment::ActiveModel = get_payment_by_id(db, payment_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Payment",
            id: payment_id,
        })?
        .into();

    if let Some(amount) = changes.amount {
        payment.amount = Set(super::fixed_point("amount", amount)?);
    }
    if let Some(method) = changes.payment_method {
        payment.payment_method = Set(super::required_text(
            "payment_method",
            &method,
            MAX_METHOD_CHARS,
        )?);
    }
    if let Some(payment_date) = changes.payment_date {
        payment.payment_date = Set(payment_date);
    }

    payment.update(db).await.map_err(Into::into)
}

/// Deletes a payment.
pub async fn delete_payment(db: &DatabaseConnection, payment_id: i64) -> Result<()> {
    let result = Payment::delete_by_id(payment_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Payment",
            id: payment_id,
        });
    }
    Ok(())
}
