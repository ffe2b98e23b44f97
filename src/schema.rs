//! Persisted schema - tables, named constraints, foreign-key indexes, and triggers.
//!
//! The DDL is written out explicitly rather than derived from the entities because
//! the invariants live here: named check constraints, a case-insensitive unique email,
//! and a deletion policy chosen per relationship.

use crate::errors::Result;
use sea_orm::ConnectionTrait;
use tracing::{debug, info, instrument};

/// Named constraint: a booking's start date must be strictly before its end date.
pub const CHECK_START_DATE_BEFORE_END_DATE: &str = "check_start_date_before_end_date";
/// Named constraint: review ratings are bounded to `1..=5`.
pub const CHECK_REVIEW_RATING_RANGE: &str = "check_review_rating_range";
/// Named constraint: booking status is one of the known values.
pub const CHECK_BOOKING_STATUS: &str = "check_booking_status";
/// Named constraint: nightly price is non-negative.
pub const CHECK_PROPERTY_PRICE_NON_NEGATIVE: &str = "check_property_price_non_negative";
/// Named constraint: booking total is non-negative.
pub const CHECK_BOOKING_TOTAL_PRICE_NON_NEGATIVE: &str = "check_booking_total_price_non_negative";
/// Named constraint: payment amount is non-negative.
pub const CHECK_PAYMENT_AMOUNT_NON_NEGATIVE: &str = "check_payment_amount_non_negative";

/// What happens to a referencing row when the referenced row is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Delete the referencing rows along with the parent
    Cascade,
    /// Refuse to delete the parent while any row references it
    Protect,
}

impl DeletePolicy {
    /// SQL `ON DELETE` action for this policy.
    #[must_use]
    pub const fn on_delete(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Protect => "RESTRICT",
        }
    }
}

/// A single foreign-key relationship and the index that supports lookup by owner.
#[derive(Clone, Copy, Debug)]
pub struct ForeignKey {
    /// Referencing table
    pub table: &'static str,
    /// Referencing column
    pub column: &'static str,
    /// Referenced table (always keyed by `id`)
    pub references: &'static str,
    /// Deletion policy for the relationship
    pub policy: DeletePolicy,
    /// Name of the index over `column`
    pub index: &'static str,
}

impl ForeignKey {
    fn clause(&self) -> String {
        format!(
            "FOREIGN KEY ({}) REFERENCES {} (id) ON DELETE {}",
            self.column,
            self.references,
            self.policy.on_delete()
        )
    }

    fn index_ddl(&self) -> String {
        format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
            self.index, self.table, self.column
        )
    }
}

/// Every relationship in the model.
pub const FOREIGN_KEYS: &[ForeignKey] = &[
    ForeignKey {
        table: "users",
        column: "role_id",
        references: "roles",
        policy: DeletePolicy::Protect,
        index: "idx_user_role",
    },
    ForeignKey {
        table: "properties",
        column: "host_id",
        references: "users",
        policy: DeletePolicy::Cascade,
        index: "idx_property_host",
    },
    ForeignKey {
        table: "bookings",
        column: "property_id",
        references: "properties",
        policy: DeletePolicy::Cascade,
        index: "idx_booking_property",
    },
    ForeignKey {
        table: "bookings",
        column: "user_id",
        references: "users",
        policy: DeletePolicy::Cascade,
        index: "idx_booking_user",
    },
    ForeignKey {
        table: "payments",
        column: "booking_id",
        references: "bookings",
        policy: DeletePolicy::Cascade,
        index: "idx_payment_booking",
    },
    ForeignKey {
        table: "reviews",
        column: "property_id",
        references: "properties",
        policy: DeletePolicy::Cascade,
        index: "idx_review_property",
    },
    ForeignKey {
        table: "reviews",
        column: "user_id",
        references: "users",
        policy: DeletePolicy::Cascade,
        index: "idx_review_user",
    },
    ForeignKey {
        table: "messages",
        column: "sender_id",
        references: "users",
        policy: DeletePolicy::Cascade,
        index: "idx_message_sender",
    },
    ForeignKey {
        table: "messages",
        column: "recipient_id",
        references: "users",
        policy: DeletePolicy::Cascade,
        index: "idx_message_recipient",
    },
];

/// A named `CHECK` constraint and the field it is reported against.
#[derive(Clone, Copy, Debug)]
pub struct Check {
    /// Constraint name
    pub name: &'static str,
    /// Boolean SQL expression
    pub expr: &'static str,
    /// Field a violation is attributed to
    pub field: &'static str,
}

struct Table {
    name: &'static str,
    columns: &'static [&'static str],
    checks: &'static [Check],
}

const NOW: &str = "(strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))";

const TABLES: &[Table] = &[
    Table {
        name: "roles",
        columns: &[
            "id INTEGER PRIMARY KEY AUTOINCREMENT",
            "name VARCHAR(50) NOT NULL UNIQUE",
        ],
        checks: &[],
    },
    Table {
        name: "users",
        columns: &[
            "id INTEGER PRIMARY KEY AUTOINCREMENT",
            "email VARCHAR(254) NOT NULL COLLATE NOCASE UNIQUE",
            "username VARCHAR(150) NOT NULL COLLATE NOCASE UNIQUE",
            "first_name VARCHAR(50) NOT NULL",
            "last_name VARCHAR(50) NOT NULL",
            "phone_number VARCHAR(20)",
            "password VARCHAR(255) NOT NULL",
            "is_active BOOLEAN NOT NULL DEFAULT TRUE",
            "is_staff BOOLEAN NOT NULL DEFAULT FALSE",
            "is_superuser BOOLEAN NOT NULL DEFAULT FALSE",
            "date_joined DATETIME NOT NULL DEFAULT {now}",
            "last_login DATETIME",
            "role_id INTEGER",
        ],
        checks: &[],
    },
    Table {
        name: "properties",
        columns: &[
            "id INTEGER PRIMARY KEY AUTOINCREMENT",
            "host_id INTEGER NOT NULL",
            "name VARCHAR(255) NOT NULL",
            "description TEXT NOT NULL",
            "location VARCHAR(255) NOT NULL",
            "price_per_night REAL NOT NULL",
            "created_at DATETIME NOT NULL DEFAULT {now}",
            "updated_at DATETIME NOT NULL DEFAULT {now}",
        ],
        checks: &[Check {
            name: CHECK_PROPERTY_PRICE_NON_NEGATIVE,
            expr: "price_per_night >= 0",
            field: "price_per_night",
        }],
    },
    Table {
        name: "bookings",
        columns: &[
            "id INTEGER PRIMARY KEY AUTOINCREMENT",
            "property_id INTEGER NOT NULL",
            "user_id INTEGER NOT NULL",
            "start_date DATE NOT NULL",
            "end_date DATE NOT NULL",
            "total_price REAL NOT NULL",
            "status VARCHAR(10) NOT NULL DEFAULT 'pending'",
            "created_at DATETIME NOT NULL DEFAULT {now}",
        ],
        checks: &[
            Check {
                name: CHECK_START_DATE_BEFORE_END_DATE,
                expr: "start_date < end_date",
                field: "end_date",
            },
            Check {
                name: CHECK_BOOKING_STATUS,
                expr: "status IN ('pending', 'confirmed', 'canceled')",
                field: "status",
            },
            Check {
                name: CHECK_BOOKING_TOTAL_PRICE_NON_NEGATIVE,
                expr: "total_price >= 0",
                field: "total_price",
            },
        ],
    },
    Table {
        name: "payments",
        columns: &[
            "id INTEGER PRIMARY KEY AUTOINCREMENT",
            "booking_id INTEGER NOT NULL",
            "amount REAL NOT NULL",
            "payment_date DATETIME NOT NULL DEFAULT {now}",
            "payment_method VARCHAR(50) NOT NULL",
        ],
        checks: &[Check {
            name: CHECK_PAYMENT_AMOUNT_NON_NEGATIVE,
            expr: "amount >= 0",
            field: "amount",
        }],
    },
    Table {
        name: "reviews",
        columns: &[
            "id INTEGER PRIMARY KEY AUTOINCREMENT",
            "property_id INTEGER NOT NULL",
            "user_id INTEGER NOT NULL",
            "rating INTEGER NOT NULL",
            "comment TEXT NOT NULL",
            "created_at DATETIME NOT NULL DEFAULT {now}",
        ],
        checks: &[Check {
            name: CHECK_REVIEW_RATING_RANGE,
            expr: "rating BETWEEN 1 AND 5",
            field: "rating",
        }],
    },
    Table {
        name: "messages",
        columns: &[
            "id INTEGER PRIMARY KEY AUTOINCREMENT",
            "sender_id INTEGER NOT NULL",
            "recipient_id INTEGER NOT NULL",
            "message_body TEXT NOT NULL",
            "sent_at DATETIME NOT NULL DEFAULT {now}",
        ],
        checks: &[],
    },
];

/// Keeps `properties.updated_at` fresh for writes that do not set it themselves.
const PROPERTY_TOUCH_TRIGGER: &str = "CREATE TRIGGER IF NOT EXISTS trg_property_touch_updated_at
    AFTER UPDATE ON properties
    FOR EACH ROW WHEN NEW.updated_at = OLD.updated_at
    BEGIN
        UPDATE properties SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = NEW.id;
    END";

/// Returns the field a named check constraint is reported against.
#[must_use]
pub fn constraint_field(constraint: &str) -> Option<&'static str> {
    TABLES
        .iter()
        .flat_map(|table| table.checks.iter())
        .find(|check| check.name == constraint)
        .map(|check| check.field)
}

fn table_ddl(table: &Table) -> String {
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|column| column.replace("{now}", NOW))
        .collect();
    lines.extend(
        FOREIGN_KEYS
            .iter()
            .filter(|fk| fk.table == table.name)
            .map(ForeignKey::clause),
    );
    lines.extend(
        table
            .checks
            .iter()
            .map(|check| format!("CONSTRAINT {} CHECK ({})", check.name, check.expr)),
    );
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        table.name,
        lines.join(",\n    ")
    )
}

/// All DDL statements in dependency order: tables, indexes, triggers.
#[must_use]
pub fn statements() -> Vec<String> {
    let mut statements: Vec<String> = TABLES.iter().map(table_ddl).collect();
    statements.extend(FOREIGN_KEYS.iter().map(ForeignKey::index_ddl));
    statements.push(PROPERTY_TOUCH_TRIGGER.to_string());
    statements
}

/// Creates every table, index, and trigger that does not exist yet.
#[instrument(skip(db))]
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    debug!("Executing CREATE statements if objects do not exist.");
    db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
    for statement in statements() {
        db.execute_unprepared(&statement).await?;
    }
    info!("Database schema ensured.");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;
    use sea_orm::{DbBackend, Statement};

    async fn sqlite_objects(
        db: &sea_orm::DatabaseConnection,
        kind: &str,
    ) -> Result<Vec<String>> {
        let rows = db
            .query_all(Statement::from_sql_and_values(
                DbBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type = ? ORDER BY name",
                [kind.into()],
            ))
            .await?;
        Ok(rows
            .iter()
            .map(|row| row.try_get::<String>("", "name"))
            .collect::<std::result::Result<_, _>>()?)
    }

    #[test]
    fn test_delete_policy_sql() {
        assert_eq!(DeletePolicy::Cascade.on_delete(), "CASCADE");
        assert_eq!(DeletePolicy::Protect.on_delete(), "RESTRICT");
    }

    #[test]
    fn test_only_role_reference_is_protective() {
        let protective: Vec<_> = FOREIGN_KEYS
            .iter()
            .filter(|fk| fk.policy == DeletePolicy::Protect)
            .map(|fk| (fk.table, fk.column))
            .collect();
        assert_eq!(protective, vec![("users", "role_id")]);
    }

    #[test]
    fn test_booking_ddl_names_date_constraint() {
        let ddl = statements();
        let bookings = ddl
            .iter()
            .find(|s| s.starts_with("CREATE TABLE IF NOT EXISTS bookings"))
            .unwrap();
        assert!(bookings.contains(
            "CONSTRAINT check_start_date_before_end_date CHECK (start_date < end_date)"
        ));
        assert!(bookings.contains(
            "FOREIGN KEY (property_id) REFERENCES properties (id) ON DELETE CASCADE"
        ));
    }

    #[test]
    fn test_constraint_field_lookup() {
        assert_eq!(
            constraint_field(CHECK_START_DATE_BEFORE_END_DATE),
            Some("end_date")
        );
        assert_eq!(constraint_field(CHECK_REVIEW_RATING_RANGE), Some("rating"));
        assert_eq!(constraint_field("no_such_constraint"), None);
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        create_tables(&db).await?;

        let tables = sqlite_objects(&db, "table").await?;
        for table in [
            "bookings",
            "messages",
            "payments",
            "properties",
            "reviews",
            "roles",
            "users",
        ] {
            assert!(tables.iter().any(|t| t == table), "missing table {table}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_key_indexes_exist() -> Result<()> {
        let db = setup_test_db().await?;
        let indexes = sqlite_objects(&db, "index").await?;

        for name in [
            "idx_property_host",
            "idx_booking_property",
            "idx_booking_user",
            "idx_review_property",
            "idx_review_user",
            "idx_payment_booking",
            "idx_message_sender",
            "idx_message_recipient",
        ] {
            assert!(indexes.iter().any(|i| i == name), "missing index {name}");
        }
        Ok(())
    }
}
