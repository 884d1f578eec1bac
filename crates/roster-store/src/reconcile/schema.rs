//! Target table schema

use crate::errors::{from_rusqlite, Result};
use roster_core::errors::RosterErrorKind;
use rusqlite::Connection;

/// Name of the employee table
pub const EMPLOYEE_TABLE: &str = "AVANTI_EMPLOYEES";

const CREATE_EMPLOYEE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS AVANTI_EMPLOYEES (
    empNo TEXT PRIMARY KEY NOT NULL CHECK (length(trim(empNo, ' ' || char(9, 10, 12, 13))) > 0),
    givenName TEXT NOT NULL,
    surname TEXT NOT NULL,
    preferredName TEXT NOT NULL,
    initial TEXT NOT NULL,
    positionName TEXT NOT NULL,
    positionNameFr TEXT NOT NULL,
    photoRevision INTEGER NOT NULL,
    active BOOLEAN NOT NULL CHECK (active IN (0, 1)),
    email TEXT NOT NULL
)";

/// Create the employee table if it does not exist
///
/// Safe to call on every run. An existing table is left alone, even if its
/// shape differs.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_EMPLOYEE_TABLE)
        .map_err(|e| from_rusqlite(RosterErrorKind::SchemaFailure, "ensure_schema", e))?;
    tracing::debug!(table = EMPLOYEE_TABLE, "schema ensured");
    Ok(())
}
