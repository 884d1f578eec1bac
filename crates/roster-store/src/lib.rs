//! Roster Store - staging and persistence layer
//!
//! Provides:
//! - SQLite connection management behind a `StorageConnector` seam
//! - The snapshot store: atomic CSV staging of fetched roster pages
//! - The reconciler: target schema, batched upsert, and row-by-row
//!   upsert from a staged snapshot

pub mod db;
pub mod errors;
pub mod reconcile;
pub mod snapshot;

// Re-export key types
pub use db::{SqliteConnector, StorageConnector};
pub use errors::Result;
pub use reconcile::{
    count_stored_employees, ensure_schema, load_stored_employees, upsert, upsert_from_snapshot,
    UpsertState, UpsertSummary,
};
pub use snapshot::{Snapshot, SnapshotFile, SnapshotRow, SnapshotSummary};
