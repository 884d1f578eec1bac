//! Snapshot store
//!
//! A snapshot is a CSV staging copy of one fetched roster page. It decouples
//! fetching from loading: the reconciler can replay it later without the
//! remote.
//!
//! Provides:
//! - Table model (`Snapshot`, `SnapshotRow`) with the first-record-defines-
//!   columns rule
//! - Atomic file replacement
//! - `SnapshotFile` for write, full read, and streaming read

mod atomic;
mod file;
mod table;

pub use atomic::atomic_write;
pub use file::{SnapshotFile, SnapshotReader, SnapshotSummary};
pub use table::{render_cell, Snapshot, SnapshotRow};
