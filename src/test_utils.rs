//! Shared test utilities for the booking backend.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{booking, message, payment, property, review, user},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Password given to every user created through these helpers.
pub const TEST_PASSWORD: &str = "test-password";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    crate::config::database::connect("sqlite::memory:").await
}

/// Creates a test user with sensible defaults.
///
/// # Defaults
/// * `first_name`: "Test"
/// * `last_name`: "User"
/// * `password`: [`TEST_PASSWORD`]
/// * no phone number, no role
pub async fn create_test_user(db: &DatabaseConnection, email: &str) -> Result<entities::UserModel> {
    create_custom_user(db, email, None).await
}

/// Creates a test user assigned to `role_id`.
pub async fn create_custom_user(
    db: &DatabaseConnection,
    email: &str,
    role_id: Option<i64>,
) -> Result<entities::UserModel> {
    user::create_user(db, email, "Test", "User", TEST_PASSWORD, None, role_id).await
}

/// Creates a test property for `host_id`.
///
/// # Defaults
/// * `name`: "Test Property"
/// * `location`: "Test City"
/// * `price_per_night`: 100.00
pub async fn create_test_property(
    db: &DatabaseConnection,
    host_id: i64,
) -> Result<entities::PropertyModel> {
    property::create_property(
        db,
        property::NewProperty {
            host_id,
            name: "Test Property".to_string(),
            description: "A place to stay".to_string(),
            location: "Test City".to_string(),
            price_per_night: Decimal::new(10_000, 2),
        },
    )
    .await
}

/// Creates a pending two-night booking (2025-06-01 to 2025-06-03) costing 200.00.
pub async fn create_test_booking(
    db: &DatabaseConnection,
    property_id: i64,
    user_id: i64,
) -> Result<entities::BookingModel> {
    booking::create_booking(
        db,
        booking::NewBooking {
            property_id,
            user_id,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap_or_default(),
            total_price: Decimal::new(20_000, 2),
            status: None,
        },
    )
    .await
}

/// Records a 50.00 card payment against `booking_id`.
pub async fn create_test_payment(
    db: &DatabaseConnection,
    booking_id: i64,
) -> Result<entities::PaymentModel> {
    payment::create_payment(
        db,
        payment::NewPayment {
            booking_id,
            amount: Decimal::new(5_000, 2),
            payment_method: "card".to_string(),
            payment_date: None,
        },
    )
    .await
}

/// Creates a review with the given rating.
pub async fn create_test_review(
    db: &DatabaseConnection,
    property_id: i64,
    user_id: i64,
    rating: i32,
) -> Result<entities::ReviewModel> {
    review::create_review(
        db,
        review::NewReview {
            property_id,
            user_id,
            rating,
            comment: "Test review".to_string(),
        },
    )
    .await
}

/// Sends a test message.
pub async fn create_test_message(
    db: &DatabaseConnection,
    sender_id: i64,
    recipient_id: i64,
) -> Result<entities::MessageModel> {
    message::create_message(
        db,
        message::NewMessage {
            sender_id,
            recipient_id,
            message_body: "Test message".to_string(),
        },
    )
    .await
}

/// Sets up a fresh database with one host and one of their properties.
pub async fn setup_with_property() -> Result<(
    DatabaseConnection,
    entities::UserModel,
    entities::PropertyModel,
)> {
    let db = setup_test_db().await?;
    let host = create_test_user(&db, "host@example.com").await?;
    let property = create_test_property(&db, host.id).await?;
    Ok((db, host, property))
}
