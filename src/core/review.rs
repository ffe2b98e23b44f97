//! Review business logic - guest ratings of a property.
//!
//! Ratings are bounded to `1..=5`. Out-of-range ratings are refused here with
//! [`Error::RatingOutOfRange`]; the `check_review_rating_range` constraint rejects
//! anything that bypasses this module.

use super::{property, user};
use crate::{
    entities::{Review, review},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use std::ops::RangeInclusive;

/// Accepted rating values.
pub const RATING_RANGE: RangeInclusive<i32> = 1..=5;

/// Fields required to review a property.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    /// Reviewed property
    pub property_id: i64,
    /// Reviewing user
    pub user_id: i64,
    /// Rating in `1..=5`
    pub rating: i32,
    /// Review text
    pub comment: String,
}

/// Review fields that may change.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewUpdate {
    /// New rating
    pub rating: Option<i32>,
    /// New text
    pub comment: Option<String>,
}

/// Owner filters for [`list_reviews`].
#[derive(Debug, Default, Deserialize)]
pub struct ReviewFilter {
    /// Only reviews of this property
    pub property_id: Option<i64>,
    /// Only reviews written by this user
    pub user_id: Option<i64>,
}

fn check_rating(rating: i32) -> Result<i32> {
    if RATING_RANGE.contains(&rating) {
        Ok(rating)
    } else {
        Err(Error::RatingOutOfRange { rating })
    }
}

/// Creates a review.
///
/// # Errors
/// - [`Error::RatingOutOfRange`] if `rating` is outside `1..=5`
/// - [`Error::MissingField`] if the comment is blank
/// - [`Error::MissingReference`] if the property or user does not exist
pub async fn create_review(db: &DatabaseConnection, new_review: NewReview) -> Result<review::Model> {
    let rating = check_rating(new_review.rating)?;
    let comment = super::required_body("comment", &new_review.comment)?;
    property::require_property(db, new_review.property_id, "property_id").await?;
    user::require_user(db, new_review.user_id, "user_id").await?;

    review::ActiveModel {
        property_id: Set(new_review.property_id),
        user_id: Set(new_review.user_id),
        rating: Set(rating),
        comment: Set(comment),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Retrieves a review by ID.
pub async fn get_review_by_id(
    db: &DatabaseConnection,
    review_id: i64,
) -> Result<Option<review::Model>> {
    Review::find_by_id(review_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists reviews, newest first.
pub async fn list_reviews(
    db: &DatabaseConnection,
    filter: &ReviewFilter,
) -> Result<Vec<review::Model>> {
    let mut query = Review::find()
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id);
    if let Some(property_id) = filter.property_id {
        query = query.filter(review::Column::PropertyId.eq(property_id));
    }
    if let Some(user_id) = filter.user_id {
        query = query.filter(review::Column::UserId.eq(user_id));
    }
    query.all(db).await.map_err(Into::into)
}

/// Applies `changes` to a review.
pub async fn update_review(
    db: &DatabaseConnection,
    review_id: i64,
    changes: ReviewUpdate,
) -> Result<review::Model> {
    let mut review: review::ActiveModel = get_review_by_id(db, review_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Review",
            id: review_id,
        })?
        .into();

    if let Some(rating) = changes.rating {
        review.rating = Set(check_rating(rating)?);
    }
    if let Some(comment) = changes.comment {
        review.comment = Set(super::required_body("comment", &comment)?);
    }

    review.update(db).await.map_err(Into::into)
}

/// Deletes a review.
pub async fn delete_review(db: &DatabaseConnection, review_id: i64) -> Result<()> {
    let result = Review::delete_by_id(review_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Review",
            id: review_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::schema::CHECK_REVIEW_RATING_RANGE;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase, PaginatorTrait, Statement};

    fn review(property_id: i64, user_id: i64, rating: i32) -> NewReview {
        NewReview {
            property_id,
            user_id,
            rating,
            comment: "Lovely stay".to_string(),
        }
    }

    #[tokio::test]
    async fn test_rating_bounds_checked_before_storage() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for rating in [0, 6, -1] {
            let result = create_review(&db, review(1, 1, rating)).await;
            assert!(
                matches!(result, Err(Error::RatingOutOfRange { rating: r }) if r == rating),
                "rating {rating} accepted"
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_comment_rejected() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut blank = review(1, 1, 4);
        blank.comment = " \n ".to_string();
        let result = create_review(&db, blank).await;
        assert!(matches!(result, Err(Error::MissingField { ref field }) if field == "comment"));
        Ok(())
    }

    #[tokio::test]
    async fn test_rating_bounds_are_inclusive() -> Result<()> {
        let (db, _host, property) = setup_with_property().await?;
        let guest = create_test_user(&db, "guest@example.com").await?;

        let low = create_review(&db, review(property.id, guest.id, 1)).await?;
        let high = create_review(&db, review(property.id, guest.id, 5)).await?;

        assert_eq!(low.rating, 1);
        assert_eq!(high.rating, 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_rating_persists_nothing() -> Result<()> {
        let (db, _host, property) = setup_with_property().await?;
        let guest = create_test_user(&db, "guest@example.com").await?;

        let result = create_review(&db, review(property.id, guest.id, 6)).await;
        assert_eq!(result.unwrap_err().field(), Some("rating"));
        assert_eq!(Review::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_storage_rejects_rating_outside_range() -> Result<()> {
        let (db, host, property) = setup_with_property().await?;

        let result = db
            .execute(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "INSERT INTO reviews (property_id, user_id, rating, comment) VALUES (?, ?, 0, 'raw')",
                [property.id.into(), host.id.into()],
            ))
            .await;

        let err = Error::from(result.unwrap_err());
        assert!(matches!(
            err,
            Error::CheckViolation { ref constraint } if constraint == CHECK_REVIEW_RATING_RANGE
        ));
        assert_eq!(Review::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_review_rating_is_checked() -> Result<()> {
        let (db, _host, property) = setup_with_property().await?;
        let guest = create_test_user(&db, "guest@example.com").await?;
        let created = create_test_review(&db, property.id, guest.id, 4).await?;

        let result = update_review(
            &db,
            created.id,
            ReviewUpdate {
                rating: Some(9),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::RatingOutOfRange { rating: 9 })));

        let updated = update_review(
            &db,
            created.id,
            ReviewUpdate {
                rating: Some(2),
                comment: Some(" Noisy street ".to_string()),
            },
        )
        .await?;
        assert_eq!(updated.rating, 2);
        assert_eq!(updated.comment, "Noisy street");
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_delete_reviews() -> Result<()> {
        let (db, host, property) = setup_with_property().await?;
        let guest = create_test_user(&db, "guest@example.com").await?;
        let kept = create_test_review(&db, property.id, guest.id, 5).await?;
        let removed = create_test_review(&db, property.id, host.id, 3).await?;

        delete_review(&db, removed.id).await?;

        let remaining = list_reviews(
            &db,
            &ReviewFilter {
                property_id: Some(property.id),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept.id);

        let by_host = list_reviews(
            &db,
            &ReviewFilter {
                user_id: Some(host.id),
                ..Default::default()
            },
        )
        .await?;
        assert!(by_host.is_empty());
        Ok(())
    }
}
