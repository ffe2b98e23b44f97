//! Property business logic - listings owned by a host.
//!
//! Deleting a property removes its bookings and reviews, and through the bookings
//! every payment made against them.

use super::user;
use crate::{
    entities::{Property, property},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

const MAX_NAME_CHARS: usize = 255;
const MAX_LOCATION_CHARS: usize = 255;

/// Fields required to list a new property.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    /// Hosting user
    pub host_id: i64,
    /// Listing title
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Human-readable location
    pub location: String,
    /// Nightly rate
    pub price_per_night: Decimal,
}

/// Listing fields that may change. `None` leaves a field untouched.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyUpdate {
    /// New title
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New location
    pub location: Option<String>,
    /// New nightly rate
    pub price_per_night: Option<Decimal>,
}

/// Owner filter for [`list_properties`].
#[derive(Debug, Default, Deserialize)]
pub struct PropertyFilter {
    /// Only properties hosted by this user
    pub host_id: Option<i64>,
}

/// Fetches a property that another row is about to reference.
pub(crate) async fn require_property<C>(
    db: &C,
    property_id: i64,
    field: &'static str,
) -> Result<property::Model>
where
    C: ConnectionTrait,
{
    Property::find_by_id(property_id)
        .one(db)
        .await?
        .ok_or(Error::MissingReference {
            field,
            entity: "Property",
            id: property_id,
        })
}

/// Creates a property listing for an existing host.
///
/// # Errors
/// - [`Error::MissingField`] / [`Error::Validation`] for empty or over-long text
/// - [`Error::Validation`] if the price is negative or has more than two decimals
/// - [`Error::MissingReference`] if the host does not exist
pub async fn create_property(
    db: &DatabaseConnection,
    new_property: NewProperty,
) -> Result<property::Model> {
    let name = super::required_text("name", &new_property.name, MAX_NAME_CHARS)?;
    let description = super::required_body("description", &new_property.description)?;
    let location = super::required_text("location", &new_property.location, MAX_LOCATION_CHARS)?;
    let price_per_night = super::fixed_point("price_per_night", new_property.price_per_night)?;
    user::require_user(db, new_property.host_id, "host_id").await?;

    let now = chrono::Utc::now();
    let property = property::ActiveModel {
        host_id: Set(new_property.host_id),
        name: Set(name),
        description: Set(description),
        location: Set(location),
        price_per_night: Set(price_per_night),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    property.insert(db).await.map_err(Into::into)
}

/// Retrieves a property by ID.
pub async fn get_property_by_id(
    db: &DatabaseConnection,
    property_id: i64,
) -> Result<Option<property::Model>> {
    Property::find_by_id(property_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists properties, newest first, optionally for a single host.
pub async fn list_properties(
    db: &DatabaseConnection,
    filter: &PropertyFilter,
) -> Result<Vec<property::Model>> {
    let mut query = Property::find()
        .order_by_desc(property::Column::CreatedAt)
        .order_by_desc(property::Column::Id);
    if let Some(host_id) = filter.host_id {
        query = query.filter(property::Column::HostId.eq(host_id));
    }
    query.all(db).await.map_err(Into::into)
}

/// Applies `changes` to a property and refreshes `updated_at`.
pub async fn update_property(
    db: &DatabaseConnection,
    property_id: i64,
    changes: PropertyUpdate,
) -> Result<property::Model> {
    let mut property: property::ActiveModel = get_property_by_id(db, property_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Property",
            id: property_id,
        })?
        .into();

    if let Some(name) = changes.name {
        property.name = Set(super::required_text("name", &name, MAX_NAME_CHARS)?);
    }
    if let Some(description) = changes.description {
        property.description = Set(super::required_body("description", &description)?);
    }
    if let Some(location) = changes.location {
        property.location = Set(super::required_text(
            "location",
            &location,
            MAX_LOCATION_CHARS,
        )?);
    }
    if let Some(price) = changes.price_per_night {
        property.price_per_night = Set(super::fixed_point("price_per_night", price)?);
    }
    property.updated_at = Set(chrono::Utc::now());

    property.update(db).await.map_err(Into::into)
}

/// Deletes a property with its bookings, payments, and reviews.
pub async fn delete_property(db: &DatabaseConnection, property_id: i64) -> Result<()> {
    let result = Property::delete_by_id(property_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Property",
            id: property_id,
        });
    }
    Ok(())
}
