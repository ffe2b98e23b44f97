//! Booking business logic - reservations of a property by a guest.
//!
//! Date ordering is owned by storage: a booking whose `start_date` is not strictly
//! before its `end_date` is rejected by the `check_start_date_before_end_date`
//! constraint and reported as [`Error::CheckViolation`], with nothing persisted.

use super::{property, user};
use crate::{
    entities::{Booking, BookingStatus, booking},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{debug, instrument};

/// Fields required to book a property.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    /// Property being booked
    pub property_id: i64,
    /// Guest making the booking
    pub user_id: i64,
    /// First night
    pub start_date: NaiveDate,
    /// Checkout day
    pub end_date: NaiveDate,
    /// Total charge
    pub total_price: Decimal,
    /// Initial status, `pending` when omitted
    #[serde(default)]
    pub status: Option<BookingStatus>,
}

/// Booking fields that may change.
#[derive(Debug, Default, Deserialize)]
pub struct BookingUpdate {
    /// New first night
    pub start_date: Option<NaiveDate>,
    /// New checkout day
    pub end_date: Option<NaiveDate>,
    /// New total
    pub total_price: Option<Decimal>,
    /// New status
    pub status: Option<BookingStatus>,
}

/// Owner filters for [`list_bookings`]; both may be combined.
#[derive(Debug, Default, Deserialize)]
pub struct BookingFilter {
    /// Only bookings of this property
    pub property_id: Option<i64>,
    /// Only bookings made by this guest
    pub user_id: Option<i64>,
}

pub(crate) async fn require_booking<C>(
    db: &C,
    booking_id: i64,
    field: &'static str,
) -> Result<booking::Model>
where
    C: ConnectionTrait,
{
    Booking::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or(Error::MissingReference {
            field,
            entity: "Booking",
            id: booking_id,
        })
}

/// Creates a booking for an existing property and guest.
///
/// # Errors
/// - [`Error::Validation`] if the total is negative or has more than two decimals
/// - [`Error::MissingReference`] if the property or guest does not exist
/// - [`Error::CheckViolation`] if `start_date >= end_date`
#[instrument(skip(db, new_booking), fields(property_id = new_booking.property_id, user_id = new_booking.user_id))]
pub async fn create_booking(
    db: &DatabaseConnection,
    new_booking: NewBooking,
) -> Result<booking::Model> {
    let total_price = super::fixed_point("total_price", new_booking.total_price)?;
    property::require_property(db, new_booking.property_id, "property_id").await?;
    user::require_user(db, new_booking.user_id, "user_id").await?;

    let booking = booking::ActiveModel {
        property_id: Set(new_booking.property_id),
        user_id: Set(new_booking.user_id),
        start_date: Set(new_booking.start_date),
        end_date: Set(new_booking.end_date),
        total_price: Set(total_price),
        status: Set(new_booking.status.unwrap_or_default()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let booking = booking.insert(db).await?;
    debug!(booking_id = booking.id, "Booking created");
    Ok(booking)
}

/// Retrieves a booking by ID.
pub async fn get_booking_by_id(
    db: &DatabaseConnection,
    booking_id: i64,
) -> Result<Option<booking::Model>> {
    Booking::find_by_id(booking_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists bookings, newest first.
pub async fn list_bookings(
    db: &DatabaseConnection,
    filter: &BookingFilter,
) -> Result<Vec<booking::Model>> {
    let mut query = Booking::find()
        .order_by_desc(booking::Column::CreatedAt)
        .order_by_desc(booking::Column::Id);
    if let Some(property_id) = filter.property_id {
        query = query.filter(booking::Column::PropertyId.eq(property_id));
    }
    if let Some(user_id) = filter.user_id {
        query = query.filter(booking::Column::UserId.eq(user_id));
    }
    query.all(db).await.map_err(Into::into)
}

/// Applies `changes` to a booking. The stored row is left untouched on any error.
pub async fn update_booking(
    db: &DatabaseConnection,
    booking_id: i64,
    changes: BookingUpdate,
) -> Result<booking::Model> {
    let mut booking: booking::ActiveModel = get_booking_by_id(db, booking_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Booking",
            id: booking_id,
        })?
        .into();

    if let Some(start_date) = changes.start_date {
        booking.start_date = Set(start_date);
    }
    if let Some(end_date) = changes.end_date {
        booking.end_date = Set(end_date);
    }
    if let Some(total_price) = changes.total_price {
        booking.total_price = Set(super::fixed_point("total_price", total_price)?);
    }
    if let Some(status) = changes.status {
        booking.status = Set(status);
    }

    booking.update(db).await.map_err(Into::into)
}

/// Deletes a booking together with its payments.
pub async fn delete_booking(db: &DatabaseConnection, booking_id: i64) -> Result<()> {
    let result = Booking::delete_by_id(booking_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Booking",
            id: booking_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::Payment;
    use crate::schema::CHECK_START_DATE_BEFORE_END_DATE;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, PaginatorTrait, Statement};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stay(property_id: i64, user_id: i64, start: NaiveDate, end: NaiveDate) -> NewBooking {
        NewBooking {
            property_id,
            user_id,
            start_date: start,
            end_date: end,
            total_price: Decimal::new(30_000, 2),
            status: None,
        }
    }

    fn is_date_violation(result: &Result<booking::Model>) -> bool {
        matches!(
            result,
            Err(Error::CheckViolation { constraint }) if constraint == CHECK_START_DATE_BEFORE_END_DATE
        )
    }

    #[tokio::test]
    async fn test_create_booking_defaults_to_pending() -> Result<()> {
        let (db, _host, property) = setup_with_property().await?;
        let guest = create_test_user(&db, "guest@example.com").await?;

        let booking = create_booking(
            &db,
            stay(property.id, guest.id, date(2025, 1, 1), date(2025, 1, 3)),
        )
        .await?;

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.start_date, date(2025, 1, 1));
        assert_eq!(booking.end_date, date(2025, 1, 3));
        assert_eq!(booking.total_price.to_string(), "300.00");

        let fetched = get_booking_by_id(&db, booking.id).await?.unwrap();
        assert_eq!(fetched.total_price.to_string(), "300.00");
        Ok(())
    }

    #[tokio::test]
    async fn test_equal_dates_rejected() -> Result<()> {
        let (db, _host, property) = setup_with_property().await?;
        let guest = create_test_user(&db, "guest@example.com").await?;

        let result = create_booking(
            &db,
            stay(property.id, guest.id, date(2025, 1, 5), date(2025, 1, 5)),
        )
        .await;

        assert!(is_date_violation(&result), "got {result:?}");
        assert_eq!(result.unwrap_err().field(), Some("end_date"));
        assert_eq!(Booking::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_reversed_dates_rejected() -> Result<()> {
        let (db, _host, property) = setup_with_property().await?;
        let guest = create_test_user(&db, "guest@example.com").await?;

        let result = create_booking(
            &db,
            stay(property.id, guest.id, date(2025, 1, 10), date(2025, 1, 5)),
        )
        .await;

        assert!(is_date_violation(&result), "got {result:?}");
        assert_eq!(Booking::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_raw_insert_cannot_bypass_date_order() -> Result<()> {
        let (db, host, property) = setup_with_property().await?;

        let result = db
            .execute(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "INSERT INTO bookings (property_id, user_id, start_date, end_date, total_price) \
                 VALUES (?, ?, '2025-03-02', '2025-03-01', 10)",
                [property.id.into(), host.id.into()],
            ))
            .await;

        let err = Error::from(result.unwrap_err());
        assert!(matches!(
            err,
            Error::CheckViolation { ref constraint } if constraint == CHECK_START_DATE_BEFORE_END_DATE
        ));
        assert_eq!(Booking::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_status_rejected_by_storage() -> Result<()> {
        let (db, host, property) = setup_with_property().await?;

        let result = db
            .execute(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "INSERT INTO bookings (property_id, user_id, start_date, end_date, total_price, status) \
                 VALUES (?, ?, '2025-03-01', '2025-03-02', 10, 'archived')",
                [property.id.into(), host.id.into()],
            ))
            .await;

        let err = Error::from(result.unwrap_err());
        assert_eq!(err.field(), Some("status"));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_booking_requires_parents() -> Result<()> {
        let (db, host, property) = setup_with_property().await?;

        let result = create_booking(&db, stay(999, host.id, date(2025, 1, 1), date(2025, 1, 2))).await;
        assert!(matches!(
            result,
            Err(Error::MissingReference {
                field: "property_id",
                ..
            })
        ));

        let result =
            create_booking(&db, stay(property.id, 999, date(2025, 1, 1), date(2025, 1, 2))).await;
        assert!(matches!(
            result,
            Err(Error::MissingReference { field: "user_id", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_booking_status_and_dates() -> Result<()> {
        let (db, _host, property) = setup_with_property().await?;
        let guest = create_test_user(&db, "guest@example.com").await?;
        let booking = create_test_booking(&db, property.id, guest.id).await?;

        let updated = update_booking(
            &db,
            booking.id,
            BookingUpdate {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.status, BookingStatus::Confirmed);

        // Moving the end before the start is refused and the row is unchanged
        let result = update_booking(
            &db,
            booking.id,
            BookingUpdate {
                end_date: Some(booking.start_date),
                ..Default::default()
            },
        )
        .await;
        assert!(is_date_violation(&result), "got {result:?}");

        let stored = get_booking_by_id(&db, booking.id).await?.unwrap();
        assert_eq!(stored.end_date, booking.end_date);
        assert_eq!(stored.status, BookingStatus::Confirmed);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_bookings_filters() -> Result<()> {
        let (db, host, property) = setup_with_property().await?;
        let guest = create_test_user(&db, "guest@example.com").await?;
        let other = create_test_property(&db, host.id).await?;
        create_test_booking(&db, property.id, guest.id).await?;
        create_test_booking(&db, other.id, guest.id).await?;
        create_test_booking(&db, other.id, host.id).await?;

        let by_property = list_bookings(
            &db,
            &BookingFilter {
                property_id: Some(other.id),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(by_property.len(), 2);

        let by_both = list_bookings(
            &db,
            &BookingFilter {
                property_id: Some(other.id),
                user_id: Some(guest.id),
            },
        )
        .await?;
        assert_eq!(by_both.len(), 1);

        assert_eq!(list_bookings(&db, &BookingFilter::default()).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_booking_cascades_to_payments() -> Result<()> {
        let (db, _host, property) = setup_with_property().await?;
        let guest = create_test_user(&db, "guest@example.com").await?;
        let booking = create_test_booking(&db, property.id, guest.id).await?;
        create_test_payment(&db, booking.id).await?;

        delete_booking(&db, booking.id).await?;

        assert_eq!(Payment::find().count(&db).await?, 0);
        assert!(matches!(
            delete_booking(&db, booking.id).await,
            Err(Error::NotFound { entity: "Booking", .. })
        ));
        Ok(())
    }
}
