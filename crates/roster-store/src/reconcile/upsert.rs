//! Batched idempotent upsert of employee records

use crate::errors::{from_rusqlite, Result};
use roster_core::errors::{RosterError, RosterErrorKind};
use roster_core::model::{EmployeeRecord, EMPLOYEE_FIELDS};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Transaction, TransactionBehavior};

/// Rows bound into one multi-row INSERT
pub const MAX_ROWS_PER_STATEMENT: usize = 500;

/// Lifecycle of one upsert call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertState {
    Pending,
    Executing,
    Committed,
    RolledBack,
}

/// Outcome of a committed upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertSummary {
    /// Rows applied (inserted or overwritten)
    pub rows: usize,
    /// Statements executed against the engine
    pub statements: usize,
    pub state: UpsertState,
}

/// Tracks one transactional load from Pending to Committed or RolledBack
pub(crate) struct LoadTransaction<'conn> {
    tx: Option<Transaction<'conn>>,
    op: &'static str,
    state: UpsertState,
}

impl<'conn> LoadTransaction<'conn> {
    pub(crate) fn begin(conn: &'conn mut Connection, op: &'static str) -> Result<Self> {
        let mut load = Self {
            tx: None,
            op,
            state: UpsertState::Pending,
        };
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| from_rusqlite(RosterErrorKind::UpsertFailure, op, e))?;
        load.tx = Some(tx);
        load.transition(UpsertState::Executing);
        Ok(load)
    }

    pub(crate) fn tx(&self) -> Result<&Transaction<'conn>> {
        self.tx.as_ref().ok_or_else(|| {
            RosterError::new(RosterErrorKind::Internal)
                .with_op(self.op)
                .with_message("transaction already finished")
        })
    }

    pub(crate) fn commit(mut self) -> Result<UpsertState> {
        let tx = self.tx.take().ok_or_else(|| {
            RosterError::new(RosterErrorKind::Internal)
                .with_op(self.op)
                .with_message("transaction already finished")
        })?;
        tx.commit()
            .map_err(|e| from_rusqlite(RosterErrorKind::UpsertFailure, self.op, e))?;
        self.transition(UpsertState::Committed);
        Ok(self.state)
    }

    /// Roll back and hand the triggering error back to the caller
    pub(crate) fn abort(mut self, err: RosterError) -> RosterError {
        if let Some(tx) = self.tx.take() {
            if let Err(rollback_err) = tx.rollback() {
                tracing::warn!(op = self.op, error = %rollback_err, "rollback failed");
            }
        }
        self.transition(UpsertState::RolledBack);
        err
    }

    fn transition(&mut self, next: UpsertState) {
        tracing::debug!(op = self.op, from = ?self.state, to = ?next, "upsert state");
        self.state = next;
    }
}

/// Upsert records into the employee table in one transaction
///
/// Rows are sent as multi-row statements of up to
/// [`MAX_ROWS_PER_STATEMENT`] rows. Any failure rolls the whole batch back.
/// A key repeated inside the batch ends up with its last occurrence.
///
/// # Errors
///
/// `UpsertFailure` with reason `constraint` or `engine`.
pub fn upsert(conn: &mut Connection, records: &[EmployeeRecord]) -> Result<UpsertSummary> {
    let load = LoadTransaction::begin(conn, "upsert")?;

    let mut statements = 0;
    for chunk in records.chunks(MAX_ROWS_PER_STATEMENT) {
        if let Err(err) = execute_chunk(&load, chunk) {
            return Err(load.abort(err));
        }
        statements += 1;
    }

    let state = load.commit()?;
    tracing::debug!(rows = records.len(), statements, "upsert committed");

    Ok(UpsertSummary {
        rows: records.len(),
        statements,
        state,
    })
}

fn execute_chunk(load: &LoadTransaction<'_>, chunk: &[EmployeeRecord]) -> Result<()> {
    let tx = load.tx()?;
    let params = chunk.iter().flat_map(record_params);
    tx.prepare_cached(&upsert_sql(chunk.len()))
        .and_then(|mut stmt| stmt.execute(params_from_iter(params)))
        .map_err(|e| {
            let err = from_rusqlite(RosterErrorKind::UpsertFailure, "upsert", e);
            // engine errors carry no row, tag the chunk's first key
            match chunk.first() {
                Some(first) => err.with_emp_no(first.emp_no.clone()),
                None => err,
            }
        })?;
    Ok(())
}

/// INSERT ... ON CONFLICT statement for `rows` rows
pub(crate) fn upsert_sql(rows: usize) -> String {
    let columns = EMPLOYEE_FIELDS.join(", ");
    let width = EMPLOYEE_FIELDS.len();

    let tuples: Vec<String> = (0..rows)
        .map(|row| {
            let slots: Vec<String> = (1..=width)
                .map(|col| format!("?{}", row * width + col))
                .collect();
            format!("({})", slots.join(", "))
        })
        .collect();

    let updates: Vec<String> = EMPLOYEE_FIELDS
        .iter()
        .filter(|f| **f != "empNo")
        .map(|f| format!("{f} = excluded.{f}"))
        .collect();

    format!(
        "INSERT INTO {table} ({columns}) VALUES {values} ON CONFLICT(empNo) DO UPDATE SET {updates}",
        table = super::EMPLOYEE_TABLE,
        values = tuples.join(", "),
        updates = updates.join(", "),
    )
}

/// Bind values for one record, in `EMPLOYEE_FIELDS` order
pub(crate) fn record_params(record: &EmployeeRecord) -> [Value; 10] {
    [
        Value::Text(record.emp_no.clone()),
        Value::Text(record.given_name.clone()),
        Value::Text(record.surname.clone()),
        Value::Text(record.preferred_name.clone()),
        Value::Text(record.initial.clone()),
        Value::Text(record.position_name.clone()),
        Value::Text(record.position_name_fr.clone()),
        Value::Integer(record.photo_revision),
        Value::Integer(i64::from(record.active)),
        Value::Text(record.email.clone()),
    ]
}
