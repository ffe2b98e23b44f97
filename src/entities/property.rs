//! Property entity - A listing offered by its host.

use super::Money;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Property database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    /// Unique identifier for the property
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the hosting user
    pub host_id: i64,
    /// Listing title
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Human-readable location
    pub location: String,
    /// Nightly rate with two fractional digits
    pub price_per_night: Money,
    /// When the listing was created
    pub created_at: DateTimeUtc,
    /// When the listing was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Property and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each property belongs to one host
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::HostId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Host,
    /// One property has many bookings
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
    /// One property has many reviews
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Host.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
