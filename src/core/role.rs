//! Role business logic - named groups users can be assigned to.
//!
//! Role names are unique. [`ensure_role`] is an idempotent upsert so concurrent
//! callers bootstrapping the same role never race into a duplicate, and
//! [`delete_role`] refuses to remove a role that is still assigned.

use crate::{
    config::settings::RoleConfig,
    entities::{Role, role},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::OnConflict};
use tracing::{info, instrument};

/// Name of the role granted by [`crate::core::user::create_superuser`].
pub const ADMIN_ROLE: &str = "admin";

const MAX_NAME_CHARS: usize = 50;

/// Creates a role, failing with [`Error::UniqueViolation`] if the name is taken.
pub async fn create_role<C>(db: &C, name: &str) -> Result<role::Model>
where
    C: ConnectionTrait,
{
    let name = super::required_text("name", name, MAX_NAME_CHARS)?;
    role::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Returns the role with this name, creating it if absent.
///
/// Uses `INSERT .. ON CONFLICT (name) DO NOTHING` followed by a lookup, so it is
/// safe to call concurrently.
pub async fn ensure_role<C>(db: &C, name: &str) -> Result<role::Model>
where
    C: ConnectionTrait,
{
    let name = super::required_text("name", name, MAX_NAME_CHARS)?;
    Role::insert(role::ActiveModel {
        name: Set(name.clone()),
        ..Default::default()
    })
    .on_conflict(OnConflict::column(role::Column::Name).do_nothing().to_owned())
    .exec_without_returning(db)
    .await?;

    Role::find()
        .filter(role::Column::Name.eq(name.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| Error::Database(DbErr::RecordNotFound(format!("role {name}"))))
}

/// Retrieves a role by its ID.
pub async fn get_role_by_id<C>(db: &C, role_id: i64) -> Result<Option<role::Model>>
where
    C: ConnectionTrait,
{
    Role::find_by_id(role_id).one(db).await.map_err(Into::into)
}

/// Retrieves a role by its exact name.
pub async fn get_role_by_name<C>(db: &C, name: &str) -> Result<Option<role::Model>>
where
    C: ConnectionTrait,
{
    Role::find()
        .filter(role::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all roles ordered by name.
pub async fn list_roles(db: &DatabaseConnection) -> Result<Vec<role::Model>> {
    Role::find()
        .order_by_asc(role::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a role that no user references.
///
/// # Errors
/// - [`Error::NotFound`] if the role does not exist
/// - [`Error::ProtectedReference`] if any user is still assigned to it
pub async fn delete_role(db: &DatabaseConnection, role_id: i64) -> Result<()> {
    let result = Role::delete_by_id(role_id)
        .exec(db)
        .await
        .map_err(|e| match Error::from(e) {
            Error::ForeignKeyViolation { .. } => Error::ProtectedReference {
                entity: "Role",
                id: role_id,
            },
            other => other,
        })?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Role",
            id: role_id,
        });
    }
    Ok(())
}

/// Ensures every role listed in configuration exists.
#[instrument(skip(db, roles))]
pub async fn seed_roles(db: &DatabaseConnection, roles: &[RoleConfig]) -> Result<()> {
    for config in roles {
        let role = ensure_role(db, &config.name).await?;
        info!(role_id = role.id, name = %role.name, "Role ensured");
    }
    Ok(())
}
