//! Replay a staged snapshot into the employee table

use super::upsert::{record_params, upsert_sql, LoadTransaction, UpsertSummary};
use crate::errors::{from_rusqlite, Result};
use crate::snapshot::{SnapshotFile, SnapshotReader, SnapshotRow};
use roster_core::errors::{reason, RosterError, RosterErrorKind};
use roster_core::model::{EmployeeRecord, EMPLOYEE_FIELDS};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;

const OP: &str = "upsert_from_snapshot";

/// Upsert every row of the snapshot at `path`, one statement per row
///
/// Rows are coerced and executed as they stream from the file inside a single
/// transaction. A read error, a coercion error, or a rejected row rolls back
/// everything applied so far.
///
/// # Errors
///
/// `UpsertFailure` with reason `read` (source carries the `ReadFailure`),
/// `coercion`, `constraint`, or `engine`.
pub fn upsert_from_snapshot(conn: &mut Connection, path: &Path) -> Result<UpsertSummary> {
    let reader = open_checked(path).map_err(wrap_read)?;

    let load = LoadTransaction::begin(conn, OP)?;
    match apply_rows(&load, reader) {
        Ok(rows) => {
            let state = load.commit()?;
            tracing::debug!(path = %path.display(), rows, "snapshot upsert committed");
            Ok(UpsertSummary {
                rows,
                statements: rows,
                state,
            })
        }
        Err(err) => Err(load.abort(err)),
    }
}

fn open_checked(path: &Path) -> Result<SnapshotReader> {
    let reader = SnapshotFile::new(path).open_reader()?;
    if let Some(missing) = EMPLOYEE_FIELDS.iter().find(|f| !reader.has_field(f)) {
        return Err(RosterError::new(RosterErrorKind::ReadFailure)
            .with_reason(reason::MISSING_FIELD)
            .with_op("snapshot_header")
            .with_line(1)
            .with_message(format!("snapshot has no '{}' column", missing)));
    }
    Ok(reader)
}

fn apply_rows(load: &LoadTransaction<'_>, reader: SnapshotReader) -> Result<usize> {
    let tx = load.tx()?;
    let mut stmt = tx
        .prepare_cached(&upsert_sql(1))
        .map_err(|e| from_rusqlite(RosterErrorKind::UpsertFailure, OP, e))?;

    let mut applied = 0;
    for row in reader {
        let row = row.map_err(wrap_read)?;
        let record = coerce_row(&row)?;
        stmt.execute(params_from_iter(record_params(&record)))
            .map_err(|e| {
                from_rusqlite(RosterErrorKind::UpsertFailure, OP, e)
                    .with_emp_no(record.emp_no.clone())
                    .with_line(row.line())
            })?;
        applied += 1;
    }
    Ok(applied)
}

fn wrap_read(err: RosterError) -> RosterError {
    RosterError::new(RosterErrorKind::UpsertFailure)
        .with_reason(reason::READ)
        .with_op(OP)
        .with_message("could not read snapshot")
        .with_source(err)
}

/// Convert one snapshot row back into a record
///
/// `active` accepts `true`/`false` in any case; `photoRevision` must be a
/// plain integer. Columns outside the stored ten are ignored.
///
/// # Errors
///
/// `UpsertFailure` with reason `coercion` for any other value, or
/// `missing_field` if the row lacks a stored column.
pub fn coerce_row(row: &SnapshotRow) -> Result<EmployeeRecord> {
    let cell = |field: &'static str| {
        row.get(field).ok_or_else(|| {
            RosterError::new(RosterErrorKind::UpsertFailure)
                .with_reason(reason::MISSING_FIELD)
                .with_op("coerce_row")
                .with_line(row.line())
                .with_message(format!("row has no '{}' column", field))
        })
    };

    let emp_no = cell("empNo")?;
    let coercion = |field: &str, value: &str, expected: &str| {
        RosterError::new(RosterErrorKind::UpsertFailure)
            .with_reason(reason::COERCION)
            .with_op("coerce_row")
            .with_emp_no(emp_no)
            .with_line(row.line())
            .with_message(format!("{} '{}' is not {}", field, value, expected))
    };

    let raw_revision = cell("photoRevision")?;
    let photo_revision = raw_revision
        .parse::<i64>()
        .map_err(|_| coercion("photoRevision", raw_revision, "an integer"))?;

    let raw_active = cell("active")?;
    let active = if raw_active.eq_ignore_ascii_case("true") {
        true
    } else if raw_active.eq_ignore_ascii_case("false") {
        false
    } else {
        return Err(coercion("active", raw_active, "true or false"));
    };

    Ok(EmployeeRecord::new(
        emp_no,
        cell("givenName")?,
        cell("surname")?,
        cell("preferredName")?,
        cell("initial")?,
        cell("positionName")?,
        cell("positionNameFr")?,
        photo_revision,
        active,
        cell("email")?,
    ))
}
