//! Reconciler: maps roster records onto the employee table
//!
//! Every write path is an idempotent upsert keyed by `empNo` and runs in a
//! single transaction, so a failed load leaves the table as it was.

mod from_snapshot;
mod query;
mod schema;
mod upsert;

pub use from_snapshot::{coerce_row, upsert_from_snapshot};
pub use query::{count_stored_employees, load_stored_employees};
pub use schema::{ensure_schema, EMPLOYEE_TABLE};
pub use upsert::{upsert, UpsertState, UpsertSummary, MAX_ROWS_PER_STATEMENT};
