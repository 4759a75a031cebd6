//! Account schema and its versioned migrations.
//!
//! Tables are SCHEMAFULL and mirror the relational layout of the
//! account store: `user`, `password` (credential) and `login` (counter).
//! Credential and counter records share the user's record key and also
//! carry it in a uniquely indexed `user_id` field.
//!
//! Applied versions are recorded as `schema_version:<n>` records. Each
//! migration and its version record commit together.

use surrealdb::{Connection, Surreal};
use tracing::{debug, info};

use crate::error::DbError;

const VERSION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS schema_version SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS description ON TABLE schema_version TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE schema_version TYPE datetime \
    DEFAULT time::now();
";

struct Migration {
    version: i64,
    description: &'static str,
    ddl: &'static str,
    /// `(table, index)` pairs that must exist once this version is in.
    unique_indexes: &'static [(&'static str, &'static str)],
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "user, password and login tables",
    ddl: ACCOUNT_TABLES,
    unique_indexes: &[
        ("user", "idx_user_phone_number"),
        ("password", "idx_password_user_id"),
        ("login", "idx_login_user_id"),
    ],
}];

const ACCOUNT_TABLES: &str = "\
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD full_name ON TABLE user TYPE string \
    ASSERT string::len($value) >= 3 AND string::len($value) <= 60;
DEFINE FIELD phone_number ON TABLE user TYPE string \
    ASSERT string::starts_with($value, '+62');
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_phone_number ON TABLE user \
    COLUMNS phone_number UNIQUE;

DEFINE TABLE password SCHEMAFULL;
DEFINE FIELD user_id ON TABLE password TYPE string;
DEFINE FIELD password ON TABLE password TYPE string \
    ASSERT string::len($value) > 0;
DEFINE FIELD salt ON TABLE password TYPE string \
    ASSERT string::len($value) = 16;
DEFINE INDEX idx_password_user_id ON TABLE password \
    COLUMNS user_id UNIQUE;

DEFINE TABLE login SCHEMAFULL;
DEFINE FIELD user_id ON TABLE login TYPE string;
DEFINE FIELD success_login ON TABLE login TYPE int DEFAULT 0 \
    ASSERT $value >= 0;
DEFINE INDEX idx_login_user_id ON TABLE login \
    COLUMNS user_id UNIQUE;
";

/// Wrap a migration's DDL and its version record in one transaction.
fn migration_batch(migration: &Migration) -> String {
    let mut batch = String::from("BEGIN TRANSACTION;\n");
    batch.push_str(migration.ddl);
    batch.push_str(
        "CREATE type::record('schema_version', $version) SET description = $description;\n",
    );
    batch.push_str("COMMIT TRANSACTION;\n");
    batch
}

/// Apply every migration not yet recorded, then check that the unique
/// indexes the account repository relies on are present.
///
/// Returns how many migrations were applied by this call.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<usize, DbError> {
    db.query(VERSION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(format!("version table: {e}")))?;

    let mut result = db.query("SELECT VALUE meta::id(id) FROM schema_version").await?;
    let recorded: Vec<i64> = result.take(0)?;

    let mut applied = 0;
    for migration in MIGRATIONS.iter().filter(|m| !recorded.contains(&m.version)) {
        info!(
            version = migration.version,
            description = migration.description,
            "Applying migration"
        );
        db.query(migration_batch(migration))
            .bind(("version", migration.version))
            .bind(("description", migration.description))
            .await?
            .check()
            .map_err(|e| DbError::Migration(format!("v{}: {e}", migration.version)))?;
        applied += 1;
    }

    verify_unique_indexes(db).await?;
    Ok(applied)
}

async fn verify_unique_indexes<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    for (table, index) in MIGRATIONS.iter().flat_map(|m| m.unique_indexes) {
        let mut result = db.query(format!("INFO FOR TABLE {table}")).await?;
        let info: Option<surrealdb_types::Value> = result.take(0)?;
        let present = info.is_some_and(|info| format!("{info:?}").contains(index));
        if !present {
            return Err(DbError::Migration(format!(
                "table `{table}` is missing unique index `{index}`"
            )));
        }
        debug!(table, index, "Unique index present");
    }
    Ok(())
}
