//! User business logic - account creation, credentials, and lookups.
//!
//! The normalized email is the login identity and is unique across all users; the
//! storage layer enforces this, so two concurrent registrations of the same address
//! yield exactly one account. Passwords are stored only as Argon2id hashes.

use super::{password, role};
use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Deserialize;
use tracing::{debug, info, instrument};

const MAX_EMAIL_CHARS: usize = 254;
const MAX_NAME_CHARS: usize = 50;
const MAX_USERNAME_CHARS: usize = 150;
const MAX_PHONE_CHARS: usize = 20;

/// Normalizes an email address for storage and lookup.
///
/// Trims surrounding whitespace and lowercases the whole address, so
/// `Guest@Example.COM` and `guest@example.com` are the same identity.
///
/// # Errors
/// - [`Error::MissingField`] if the email is empty
/// - [`Error::Validation`] if it is not a plausible `local@domain` address
pub fn normalize_email(email: &str) -> Result<String> {
    let email = super::required_text("email", email, MAX_EMAIL_CHARS)?.to_lowercase();

    let Some((local, domain)) = email.split_once('@') else {
        return Err(Error::validation("email", "must contain '@'"));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(Error::validation("email", "must look like local@domain"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(Error::validation("email", "must not contain whitespace"));
    }
    Ok(email)
}

fn optional_phone(phone_number: Option<&str>) -> Result<Option<String>> {
    match phone_number.map(str::trim) {
        None | Some("") => Ok(None),
        Some(phone) if phone.chars().count() > MAX_PHONE_CHARS => Err(Error::validation(
            "phone_number",
            format!("must be at most {MAX_PHONE_CHARS} characters"),
        )),
        Some(phone) => Ok(Some(phone.to_string())),
    }
}

fn required_password(password: &str) -> Result<&str> {
    if password.is_empty() {
        return Err(Error::MissingField {
            field: "password".to_string(),
        });
    }
    Ok(password)
}

/// Checks a new username for the account registered as `email`.
///
/// New accounts take their email as username, so an address-shaped username is
/// reserved for the account's own email.
fn username_for(email: &str, username: &str) -> Result<String> {
    let username = super::required_text("username", username, MAX_USERNAME_CHARS)?;
    if !username.contains('@') {
        return Ok(username);
    }
    if username.eq_ignore_ascii_case(email) {
        return Ok(email.to_string());
    }
    Err(Error::validation(
        "username",
        "may only contain '@' when it is the account's own email",
    ))
}

/// Fetches a user that another row is about to reference.
pub(crate) async fn require_user<C>(db: &C, user_id: i64, field: &'static str) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::MissingReference {
            field,
            entity: "User",
            id: user_id,
        })
}

/// Creates a regular user account.
///
/// The email is normalized before the uniqueness check and doubles as the initial
/// username. Only a derived credential of `password` is stored.
///
/// # Errors
/// - [`Error::MissingField`] if email, names, or password are empty
/// - [`Error::Validation`] for malformed email or over-long fields
/// - [`Error::MissingReference`] if `role_id` names no role
/// - [`Error::UniqueViolation`] if the email is already registered
pub async fn create_user<C>(
    db: &C,
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
    phone_number: Option<&str>,
    role_id: Option<i64>,
) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let email = normalize_email(email)?;
    let first_name = super::required_text("first_name", first_name, MAX_NAME_CHARS)?;
    let last_name = super::required_text("last_name", last_name, MAX_NAME_CHARS)?;
    let phone_number = optional_phone(phone_number)?;
    let credential = password::hash_password(required_password(password)?)?;

    if let Some(role_id) = role_id {
        role::get_role_by_id(db, role_id)
            .await?
            .ok_or(Error::MissingReference {
                field: "role_id",
                entity: "Role",
                id: role_id,
            })?;
    }

    let user = user::ActiveModel {
        username: Set(email.clone()),
        email: Set(email),
        first_name: Set(first_name),
        last_name: Set(last_name),
        phone_number: Set(phone_number),
        password: Set(credential),
        is_active: Set(true),
        is_staff: Set(false),
        is_superuser: Set(false),
        date_joined: Set(chrono::Utc::now()),
        last_login: Set(None),
        role_id: Set(role_id),
        ..Default::default()
    };
    let user = user.insert(db).await?;
    debug!(user_id = user.id, "User created");
    Ok(user)
}

/// Creates an administrative account.
///
/// Ensures the `admin` role exists, assigns it, and sets the staff and superuser
/// flags. Runs in a single transaction: either all of it happens or none of it.
#[instrument(skip(db, password))]
pub async fn create_superuser(
    db: &DatabaseConnection,
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
) -> Result<user::Model> {
    let txn = db.begin().await?;

    let admin = role::ensure_role(&txn, role::ADMIN_ROLE).await?;
    let user = create_user(
        &txn,
        email,
        first_name,
        last_name,
        password,
        None,
        Some(admin.id),
    )
    .await?;

    let mut user: user::ActiveModel = user.into();
    user.is_staff = Set(true);
    user.is_superuser = Set(true);
    let user = user.update(&txn).await?;

    txn.commit().await?;
    info!(user_id = user.id, "Superuser created");
    Ok(user)
}

/// Retrieves a user by ID.
pub async fn get_user_by_id<C>(db: &C, user_id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Retrieves a user by email, in any letter case.
pub async fn get_user_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    let email = normalize_email(email)?;
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists users, optionally only those assigned to `role_id`.
pub async fn list_users(db: &DatabaseConnection, role_id: Option<i64>) -> Result<Vec<user::Model>> {
    let mut query = User::find().order_by_asc(user::Column::Id);
    if let Some(role_id) = role_id {
        query = query.filter(user::Column::RoleId.eq(role_id));
    }
    query.all(db).await.map_err(Into::into)
}

/// Profile fields that may change after registration. `None` leaves a field untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    /// New username
    pub username: Option<String>,
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
    /// New phone number; an empty string clears it
    pub phone_number: Option<String>,
    /// Activate or deactivate the account
    pub is_active: Option<bool>,
    /// New role assignment
    pub role_id: Option<i64>,
}

/// Applies `changes` to an existing user.
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i64,
    changes: UserUpdate,
) -> Result<user::Model> {
    let existing = get_user_by_id(db, user_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "User",
            id: user_id,
        })?;
    let email = existing.email.clone();
    let mut user: user::ActiveModel = existing.into();

    if let Some(username) = changes.username {
        user.username = Set(username_for(&email, &username)?);
    }
    if let Some(first_name) = changes.first_name {
        user.first_name = Set(super::required_text(
            "first_name",
            &first_name,
            MAX_NAME_CHARS,
        )?);
    }
    if let Some(last_name) = changes.last_name {
        user.last_name = Set(super::required_text(
            "last_name",
            &last_name,
            MAX_NAME_CHARS,
        )?);
    }
    if let Some(phone_number) = changes.phone_number {
        user.phone_number = Set(optional_phone(Some(&phone_number))?);
    }
    if let Some(is_active) = changes.is_active {
        user.is_active = Set(is_active);
    }
    if let Some(role_id) = changes.role_id {
        role::get_role_by_id(db, role_id)
            .await?
            .ok_or(Error::MissingReference {
                field: "role_id",
                entity: "Role",
                id: role_id,
            })?;
        user.role_id = Set(Some(role_id));
    }

    user.update(db).await.map_err(Into::into)
}

/// Replaces a user's credential with one derived from `new_password`.
pub async fn set_password(db: &DatabaseConnection, user_id: i64, new_password: &str) -> Result<()> {
    let credential = password::hash_password(required_password(new_password)?)?;
    let result = User::update_many()
        .col_expr(user::Column::Password, Expr::value(credential))
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "User",
            id: user_id,
        });
    }
    Ok(())
}

/// Checks an email/password pair and records the login.
///
/// Returns `Ok(None)` for unknown emails, wrong passwords, and inactive accounts.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<Option<user::Model>> {
    let Ok(email) = normalize_email(email) else {
        return Ok(None);
    };
    let Some(user) = User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    if !user.is_active || !password::verify_password(password, &user.password)? {
        return Ok(None);
    }

    let mut user: user::ActiveModel = user.into();
    user.last_login = Set(Some(chrono::Utc::now()));
    user.update(db).await.map(Some).map_err(Into::into)
}

/// Deletes a user together with their properties, bookings, reviews, and messages.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let result = User::delete_by_id(user_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "User",
            id: user_id,
        });
    }
    Ok(())
}
