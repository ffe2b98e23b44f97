//! Booking entity - A guest's reservation of a property for a date range.
//!
//! `start_date` must fall strictly before `end_date`; storage enforces this through
//! the `check_start_date_before_end_date` constraint.

use super::Money;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a booking
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting confirmation
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Confirmed by the host
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Canceled by either party
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

/// Booking database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    /// Unique identifier for the booking
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the booked property
    pub property_id: i64,
    /// ID of the guest
    pub user_id: i64,
    /// First night
    pub start_date: Date,
    /// Checkout day, strictly after `start_date`
    pub end_date: Date,
    /// Total charge with two fractional digits
    pub total_price: Money,
    /// Current status, `pending` on creation
    pub status: BookingStatus,
    /// When the booking was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Booking and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each booking belongs to one property
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,
    /// Each booking belongs to one guest
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// One booking has many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
