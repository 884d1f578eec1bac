//! Roster Engine - Orchestration layer
//!
//! Fetches a roster page from a `RosterSource`, stages it as a snapshot, and
//! reconciles it into storage. Also replays a staged snapshot without the
//! remote (the load path).

pub mod fetch;
pub mod pipeline;

pub use fetch::{HttpRosterFetcher, RosterSource};
pub use pipeline::{
    run_load, LoadReport, Pipeline, PipelineError, PipelineReport, SnapshotOutcome, Stage,
};
