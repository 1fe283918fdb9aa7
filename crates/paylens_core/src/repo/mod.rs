//! Repository layer over the query gateway.
//!
//! # Responsibility
//! - Define use-case oriented read contracts mirroring the payroll queries.
//! - Guard against connections without the migrated payroll schema.
//!
//! # Invariants
//! - Repositories never mutate domain rows; this layer is read-only.
//! - Row hydration rejects invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::query::{GatewayError, GatewayResult};
use rusqlite::Connection;

pub mod payment_repo;
pub mod user_repo;

const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    ("companies", &["uuid", "name"]),
    (
        "users",
        &["uuid", "first_name", "last_name", "birth_date", "company_uuid"],
    ),
    ("payments", &["uuid", "amount", "paid_at", "receiver_uuid"]),
];

/// Verifies the connection carries the migrated payroll schema.
pub(crate) fn ensure_schema_ready(conn: &Connection) -> GatewayResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version == 0 {
        return Err(GatewayError::UninitializedConnection {
            expected_version: latest_version(),
            actual_version,
        });
    }

    for (table, columns) in REQUIRED_TABLES.iter().copied() {
        if !table_exists(conn, table)? {
            return Err(GatewayError::MissingRequiredTable(table));
        }
        for column in columns.iter().copied() {
            if !table_has_column(conn, table, column)? {
                return Err(GatewayError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> GatewayResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> GatewayResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
