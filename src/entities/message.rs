//! Message entity - A direct message between two users.
//!
//! Both ends reference `users`, so there is no single `Related<user::Entity>` impl;
//! use the `Sender` and `Recipient` relations explicitly.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Message database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    /// Unique identifier for the message
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the sending user
    pub sender_id: i64,
    /// ID of the receiving user
    pub recipient_id: i64,
    /// Message text
    pub message_body: String,
    /// When the message was sent
    pub sent_at: DateTimeUtc,
}

/// Defines relationships between Message and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The user who sent the message
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SenderId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Sender,
    /// The user who receives the message
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RecipientId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Recipient,
}

impl ActiveModelBehavior for ActiveModel {}
