//! SQLite schema setup.
//!
//! The schema is a list of steps, applied in order. Each database records
//! the steps it has taken in `schema_migrations`; opening it runs whichever
//! steps are still missing inside one transaction.

use rusqlite::{params, Connection};

use crate::error::{Result, StoreError};

/// Schema steps as `(version, sql)`, versions contiguous from 1.
const STEPS: &[(u32, &str)] = &[(
    1,
    "CREATE TABLE blobs (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    );",
)];

/// The version a freshly opened database ends up at.
pub const CURRENT_VERSION: u32 = 1;

/// Bring the schema up to [`CURRENT_VERSION`]. Safe to call on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        );",
    )?;

    let from = schema_version(conn)?;
    if from > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database is at version {from}, newer than supported {CURRENT_VERSION}"
        )));
    }

    let pending: Vec<(u32, &str)> = STEPS.iter().copied().filter(|(v, _)| *v > from).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![version, crate::now_millis()],
        )?;
    }
    tx.commit()?;

    tracing::debug!(from, to = CURRENT_VERSION, "schema migrated");
    Ok(())
}

/// Highest recorded step, or 0 for a new database.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}
