//! Pipeline orchestration
//!
//! ## Sync run (in order):
//! 1. Fetch one page from the `RosterSource` (terminal on failure)
//! 2. Stage it as a snapshot (a failure is a warning on the report)
//! 3. Open a storage connection (terminal)
//! 4. Ensure the schema (terminal)
//! 5. Upsert the fetched records (terminal)
//!
//! ## Load run:
//! Steps 3 and 4, then upsert from the staged snapshot.
//!
//! The connection is owned by the run and released when it returns, on every
//! path. Each run gets a fresh `RunId`; lifecycle events are logged here and
//! nowhere below.

#![allow(clippy::result_large_err)]

use crate::fetch::RosterSource;
use roster_core::errors::RosterError;
use roster_core::model::RosterQuery;
use roster_core::{log_op_end, log_op_error, log_op_start, log_op_warn};
use roster_core_types::RunId;
use roster_store::reconcile::{ensure_schema, upsert, upsert_from_snapshot, UpsertSummary};
use roster_store::snapshot::{SnapshotFile, SnapshotSummary};
use roster_store::StorageConnector;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

const OP_SYNC: &str = "roster_sync";
const OP_LOAD: &str = "roster_load";

/// Pipeline stage, as reported in failures and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Snapshot,
    Connection,
    Schema,
    Load,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Snapshot => "snapshot",
            Stage::Connection => "connection",
            Stage::Schema => "schema",
            Stage::Load => "load",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage failure that ended a run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch: {0}")]
    FetchStage(#[source] RosterError),

    #[error("connection: {0}")]
    ConnectionStage(#[source] RosterError),

    #[error("schema: {0}")]
    SchemaStage(#[source] RosterError),

    #[error("load: {0}")]
    LoadStage(#[source] RosterError),
}

impl PipelineError {
    /// Which stage failed
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::FetchStage(_) => Stage::Fetch,
            PipelineError::ConnectionStage(_) => Stage::Connection,
            PipelineError::SchemaStage(_) => Stage::Schema,
            PipelineError::LoadStage(_) => Stage::Load,
        }
    }

    /// The underlying failure
    pub fn cause(&self) -> &RosterError {
        match self {
            PipelineError::FetchStage(e)
            | PipelineError::ConnectionStage(e)
            | PipelineError::SchemaStage(e)
            | PipelineError::LoadStage(e) => e,
        }
    }
}

/// What happened to the snapshot during a sync run
#[derive(Debug, Clone)]
pub enum SnapshotOutcome {
    Written(SnapshotSummary),
    /// The write failed; the run continued
    Failed(RosterError),
}

/// Result of a completed sync run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run_id: RunId,
    /// Records in the fetched page
    pub fetched: usize,
    /// Total count reported by the source, if any
    pub total: Option<u64>,
    pub snapshot: SnapshotOutcome,
    pub loaded: UpsertSummary,
}

impl PipelineReport {
    /// Non-fatal failures seen during the run
    pub fn warnings(&self) -> Vec<&RosterError> {
        match &self.snapshot {
            SnapshotOutcome::Failed(err) => vec![err],
            SnapshotOutcome::Written(_) => Vec::new(),
        }
    }
}

/// Result of a completed load run
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub run_id: RunId,
    pub snapshot_path: PathBuf,
    pub loaded: UpsertSummary,
}

/// A configured sync pipeline
pub struct Pipeline<S, C> {
    source: S,
    connector: C,
    snapshot: SnapshotFile,
    query: RosterQuery,
}

impl<S: RosterSource, C: StorageConnector> Pipeline<S, C> {
    pub fn new(source: S, connector: C, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            connector,
            snapshot: SnapshotFile::new(snapshot_path),
            query: RosterQuery::default(),
        }
    }

    /// Replace the default query
    pub fn with_query(mut self, query: RosterQuery) -> Self {
        self.query = query;
        self
    }

    pub fn query(&self) -> &RosterQuery {
        &self.query
    }

    /// Run fetch → snapshot → reconcile once
    ///
    /// # Errors
    ///
    /// The first terminal stage failure. A snapshot write failure is not
    /// terminal and shows up in [`PipelineReport::warnings`] instead.
    pub fn sync(&self) -> Result<PipelineReport, PipelineError> {
        let run_id = RunId::new();
        let snapshot_path = self.snapshot.path().display().to_string();
        log_op_start!(
            OP_SYNC,
            run_id = run_id.as_str(),
            snapshot_path = snapshot_path.as_str()
        );
        let start = Instant::now();

        let report = self.sync_impl(&run_id).map_err(|e| {
            log_op_error!(
                OP_SYNC,
                e.cause(),
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = run_id.as_str(),
                stage = e.stage().as_str(),
                "{}",
                e
            );
            e
        })?;

        log_op_end!(
            OP_SYNC,
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = run_id.as_str(),
            fetched = report.fetched as u64,
            row_count = report.loaded.rows as u64,
            warnings = report.warnings().len() as u64
        );

        Ok(report)
    }

    /// Replay the configured snapshot into storage
    ///
    /// # Errors
    ///
    /// See [`run_load`].
    pub fn load(&self) -> Result<LoadReport, PipelineError> {
        run_load(&self.connector, self.snapshot.path())
    }

    fn sync_impl(&self, run_id: &RunId) -> Result<PipelineReport, PipelineError> {
        let fetched = self
            .source
            .fetch(&self.query)
            .map_err(PipelineError::FetchStage)?;
        tracing::debug!(run_id = run_id.as_str(), records = fetched.len(), "fetched");

        let snapshot = match self.snapshot.write(&fetched) {
            Ok(summary) => SnapshotOutcome::Written(summary),
            Err(err) => {
                log_op_warn!(
                    OP_SYNC,
                    err,
                    run_id = run_id.as_str(),
                    stage = Stage::Snapshot.as_str(),
                    "snapshot not written, continuing: {}",
                    err
                );
                SnapshotOutcome::Failed(err)
            }
        };

        tracing::debug!(
            run_id = run_id.as_str(),
            db = %self.connector.describe(),
            "connecting"
        );
        let loaded = {
            let mut conn = self
                .connector
                .connect()
                .map_err(PipelineError::ConnectionStage)?;
            ensure_schema(&conn).map_err(PipelineError::SchemaStage)?;
            upsert(&mut conn, &fetched.records).map_err(PipelineError::LoadStage)?
        };

        Ok(PipelineReport {
            run_id: run_id.clone(),
            fetched: fetched.len(),
            total: fetched.total,
            snapshot,
            loaded,
        })
    }
}

/// Load a staged snapshot into storage without contacting the source
///
/// # Errors
///
/// `ConnectionStage`, `SchemaStage`, or `LoadStage` (read and coercion
/// failures of the snapshot surface here).
pub fn run_load<C>(connector: &C, snapshot_path: &Path) -> Result<LoadReport, PipelineError>
where
    C: StorageConnector + ?Sized,
{
    let run_id = RunId::new();
    let path = snapshot_path.display().to_string();
    log_op_start!(OP_LOAD, run_id = run_id.as_str(), snapshot_path = path.as_str());
    let start = Instant::now();

    let loaded = load_impl(connector, snapshot_path).map_err(|e| {
        log_op_error!(
            OP_LOAD,
            e.cause(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = run_id.as_str(),
            stage = e.stage().as_str(),
            "{}",
            e
        );
        e
    })?;

    log_op_end!(
        OP_LOAD,
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = run_id.as_str(),
        row_count = loaded.rows as u64
    );

    Ok(LoadReport {
        run_id,
        snapshot_path: snapshot_path.to_path_buf(),
        loaded,
    })
}

fn load_impl<C>(connector: &C, snapshot_path: &Path) -> Result<UpsertSummary, PipelineError>
where
    C: StorageConnector + ?Sized,
{
    tracing::debug!(db = %connector.describe(), "connecting");
    let mut conn = connector
        .connect()
        .map_err(PipelineError::ConnectionStage)?;
    ensure_schema(&conn).map_err(PipelineError::SchemaStage)?;
    upsert_from_snapshot(&mut conn, snapshot_path).map_err(PipelineError::LoadStage)
}
