//! User entity - Account holders: hosts, guests, and staff.
//!
//! The normalized email is the login identity. Only a derived credential is stored
//! in `password`; it is never serialized.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Normalized (lowercase) email, unique across all users
    #[sea_orm(unique)]
    pub email: String,
    /// Unique username, defaults to the normalized email
    #[sea_orm(unique)]
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Optional contact number
    pub phone_number: Option<String>,
    /// Argon2id PHC string derived from the password
    #[serde(skip_serializing)]
    pub password: String,
    /// Inactive accounts cannot authenticate
    pub is_active: bool,
    /// Elevated account flag
    pub is_staff: bool,
    /// Full administrative account flag
    pub is_superuser: bool,
    /// When the account was created
    pub date_joined: DateTimeUtc,
    /// Last successful authentication
    pub last_login: Option<DateTimeUtc>,
    /// Optional role assignment
    pub role_id: Option<i64>,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each user optionally belongs to one role; the role cannot be deleted while referenced
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id",
        on_delete = "Restrict"
    )]
    Role,
    /// One user hosts many properties
    #[sea_orm(has_many = "super::property::Entity")]
    Properties,
    /// One user makes many bookings
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
    /// One user writes many reviews
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
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
