//! Message business logic - direct messages between users.

use super::user;
use crate::{
    entities::{Message, message},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// Fields required to send a message.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMessage {
    /// Sending user
    pub sender_id: i64,
    /// Receiving user
    pub recipient_id: i64,
    /// Message text
    pub message_body: String,
}

/// Message fields that may change.
#[derive(Debug, Default, Deserialize)]
pub struct MessageUpdate {
    /// Edited text
    pub message_body: Option<String>,
}

/// Participant filters for [`list_messages`].
#[derive(Debug, Default, Deserialize)]
pub struct MessageFilter {
    /// Only messages sent by this user
    pub sender_id: Option<i64>,
    /// Only messages received by this user
    pub recipient_id: Option<i64>,
}

/// Sends a message between two existing users.
///
/// Sender and recipient may be the same user.
pub async fn create_message(
    db: &DatabaseConnection,
    new_message: NewMessage,
) -> Result<message::Model> {
    let body = super::required_body("message_body", &new_message.message_body)?;
    user::require_user(db, new_message.sender_id, "sender_id").await?;
    user::require_user(db, new_message.recipient_id, "recipient_id").await?;

    message::ActiveModel {
        sender_id: Set(new_message.sender_id),
        recipient_id: Set(new_message.recipient_id),
        message_body: Set(body),
        sent_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Retrieves a message by ID.
pub async fn get_message_by_id(
    db: &DatabaseConnection,
    message_id: i64,
) -> Result<Option<message::Model>> {
    Message::find_by_id(message_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists messages, most recently sent first.
pub async fn list_messages(
    db: &DatabaseConnection,
    filter: &MessageFilter,
) -> Result<Vec<message::Model>> {
    let mut query = Message::find()
        .order_by_desc(message::Column::SentAt)
        .order_by_desc(message::Column::Id);
    if let Some(sender_id) = filter.sender_id {
        query = query.filter(message::Column::SenderId.eq(sender_id));
    }
    if let Some(recipient_id) = filter.recipient_id {
        query = query.filter(message::Column::RecipientId.eq(recipient_id));
    }
    query.all(db).await.map_err(Into::into)
}

/// Edits a message body.
pub async fn update_message(
    db: &DatabaseConnection,
    message_id: i64,
    changes: MessageUpdate,
) -> Result<message::Model> {
    let mut message: message::ActiveModel = get_message_by_id(db, message_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Message",
            id: message_id,
        })?
        .into();

    if let Some(body) = changes.message_body {
        message.message_body = Set(super::required_body("message_body", &body)?);
    }

    message.update(db).await.map_err(Into::into)
}

/// Deletes a message.
pub async fn delete_message(db: &DatabaseConnection, message_id: i64) -> Result<()> {
    let result = Message::delete_by_id(message_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Message",
            id: message_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_create_message_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice@example.com").await?;
        let bob = create_test_user(&db, "bob@example.com").await?;

        let message = create_message(
            &db,
            NewMessage {
                sender_id: alice.id,
                recipient_id: bob.id,
                message_body: "Is the loft free in May?".to_string(),
            },
        )
        .await?;

        assert_eq!(message.sender_id, alice.id);
        assert_eq!(message.recipient_id, bob.id);
        assert_eq!(message.message_body, "Is the loft free in May?");
        Ok(())
    }

    #[tokio::test]
    async fn test_message_to_self_is_allowed() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice@example.com").await?;

        let note = create_test_message(&db, alice.id, alice.id).await?;
        assert_eq!(note.sender_id, note.recipient_id);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_message_requires_both_users() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice@example.com").await?;

        let result = create_message(
            &db,
            NewMessage {
                sender_id: alice.id,
                recipient_id: 404,
                message_body: "hello".to_string(),
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::MissingReference {
                field: "recipient_id",
                ..
            })
        ));

        let result = create_message(
            &db,
            NewMessage {
                sender_id: alice.id,
                recipient_id: alice.id,
                message_body: "  ".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::MissingField { .. })));
        assert_eq!(Message::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_messages_by_participant() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice@example.com").await?;
        let bob = create_test_user(&db, "bob@example.com").await?;
        create_test_message(&db, alice.id, bob.id).await?;
        create_test_message(&db, alice.id, bob.id).await?;
        create_test_message(&db, bob.id, alice.id).await?;

        let sent = list_messages(
            &db,
            &MessageFilter {
                sender_id: Some(alice.id),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(sent.len(), 2);

        let inbox = list_messages(
            &db,
            &MessageFilter {
                recipient_id: Some(alice.id),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].sender_id, bob.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_message() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice@example.com").await?;
        let message = create_test_message(&db, alice.id, alice.id).await?;

        let edited = update_message(
            &db,
            message.id,
            MessageUpdate {
                message_body: Some("  edited\n".to_string()),
            },
        )
        .await?;
        assert_eq!(edited.message_body, "edited");
        assert_eq!(edited.sent_at, message.sent_at);

        delete_message(&db, message.id).await?;
        assert!(get_message_by_id(&db, message.id).await?.is_none());
        Ok(())
    }
}
