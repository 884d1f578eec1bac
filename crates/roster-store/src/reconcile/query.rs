//! Read-back of stored employees

use super::schema::EMPLOYEE_TABLE;
use crate::errors::{from_rusqlite, Result};
use roster_core::errors::RosterErrorKind;
use roster_core::model::{EmployeeRecord, EMPLOYEE_FIELDS};
use rusqlite::Connection;

/// All stored employees ordered by `empNo`
pub fn load_stored_employees(conn: &Connection) -> Result<Vec<EmployeeRecord>> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY empNo",
        EMPLOYEE_FIELDS.join(", "),
        EMPLOYEE_TABLE
    );
    let map_err =
        |e: rusqlite::Error| from_rusqlite(RosterErrorKind::Internal, "load_stored_employees", e);

    let mut stmt = conn.prepare(&sql).map_err(map_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(EmployeeRecord::new(
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get(7)?,
                row.get(8)?,
                row.get::<_, String>(9)?,
            ))
        })
        .map_err(map_err)?;

    rows.collect::<std::result::Result<Vec<_>, _>>().map_err(map_err)
}

/// Number of stored employees
pub fn count_stored_employees(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {}", EMPLOYEE_TABLE), [], |row| {
            row.get(0)
        })
        .map_err(|e| from_rusqlite(RosterErrorKind::Internal, "count_stored_employees", e))?;
    Ok(count.max(0) as u64)
}
