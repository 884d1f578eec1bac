// Integration tests for the sync and load pipelines, driven by an in-process
// roster source

use roster_core::errors::{reason, Result, RosterError, RosterErrorKind};
use roster_core::model::{EmployeeRecord, FetchResult, RosterQuery};
use roster_engine::{
    run_load, Pipeline, PipelineError, PipelineReport, RosterSource, SnapshotOutcome, Stage,
};
use roster_store::reconcile::{count_stored_employees, load_stored_employees};
use roster_store::{SqliteConnector, StorageConnector};
use rusqlite::{Connection, OpenFlags};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Serves a fixed outcome and remembers the queries it saw
struct StaticSource {
    outcome: std::result::Result<FetchResult, RosterError>,
    queries: RefCell<Vec<RosterQuery>>,
}

impl StaticSource {
    fn page(records: Vec<EmployeeRecord>) -> Self {
        Self {
            outcome: Ok(FetchResult::new(records, None)),
            queries: RefCell::new(Vec::new()),
        }
    }

    fn failing(err: RosterError) -> Self {
        Self {
            outcome: Err(err),
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl RosterSource for StaticSource {
    fn fetch(&self, query: &RosterQuery) -> Result<FetchResult> {
        self.queries.borrow_mut().push(query.clone());
        self.outcome.clone()
    }
}

/// Hands out read-only connections so schema creation fails
struct ReadOnlyConnector(PathBuf);

impl StorageConnector for ReadOnlyConnector {
    fn connect(&self) -> Result<Connection> {
        Connection::open_with_flags(&self.0, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(|e| {
            RosterError::new(RosterErrorKind::ConnectionFailure).with_message(e.to_string())
        })
    }

    fn describe(&self) -> String {
        format!("read-only {}", self.0.display())
    }
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn snapshot(&self) -> PathBuf {
        self.dir.path().join("employees.csv")
    }

    fn db(&self) -> PathBuf {
        self.dir.path().join("roster.db")
    }

    fn connector(&self) -> SqliteConnector {
        SqliteConnector::new(self.db())
    }

    fn stored(&self) -> Vec<EmployeeRecord> {
        let conn = Connection::open(self.db()).unwrap();
        load_stored_employees(&conn).unwrap()
    }
}

fn employee(emp_no: &str, photo_revision: i64, active: bool) -> EmployeeRecord {
    EmployeeRecord::new(
        emp_no,
        "Jean",
        "Tremblay",
        "",
        "J",
        "Developer",
        "Développeur",
        photo_revision,
        active,
        "jean@example.com",
    )
}

fn sync(
    ws: &Workspace,
    source: &StaticSource,
) -> std::result::Result<PipelineReport, PipelineError> {
    Pipeline::new(source, ws.connector(), ws.snapshot()).sync()
}

#[test]
fn test_sync_then_resync_keeps_one_row_per_key() {
    let ws = Workspace::new();

    // Given: a first page with employee 1
    let report = sync(&ws, &StaticSource::page(vec![employee("1", 1, true)])).unwrap();

    // Then: the snapshot has the header and one row, and one row is stored
    assert_eq!(report.fetched, 1);
    assert_eq!(report.loaded.rows, 1);
    assert!(report.warnings().is_empty());
    let content = fs::read_to_string(ws.snapshot()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert!(lines[0].starts_with("empNo,givenName,surname,"));
    assert_eq!(lines.len(), 2);

    // When: the same employee comes back with new values
    sync(&ws, &StaticSource::page(vec![employee("1", 2, false)])).unwrap();

    // Then: exactly one row, carrying the new values
    let stored = ws.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].emp_no, "1");
    assert_eq!(stored[0].photo_revision, 2);
    assert!(!stored[0].active);
}

#[test]
fn test_sync_report_carries_snapshot_summary() {
    let ws = Workspace::new();

    let report = sync(&ws, &StaticSource::page(vec![employee("1", 1, true)])).unwrap();

    match &report.snapshot {
        SnapshotOutcome::Written(summary) => {
            assert_eq!(summary.path, ws.snapshot());
            assert_eq!(summary.rows, 1);
        }
        SnapshotOutcome::Failed(err) => panic!("unexpected snapshot failure: {}", err),
    }
    assert!(!report.run_id.as_str().is_empty());
}

#[test]
fn test_sync_passes_query_through() {
    let ws = Workspace::new();
    let source = StaticSource::page(vec![employee("1", 1, true)]);
    let query = RosterQuery::default().with_take(25).with_search("jean");

    let pipeline = Pipeline::new(&source, ws.connector(), ws.snapshot()).with_query(query.clone());
    pipeline.sync().unwrap();

    assert_eq!(source.queries.borrow().as_slice(), &[query]);
}

#[test]
fn test_fetch_failure_stops_before_storage() {
    let ws = Workspace::new();
    let source = StaticSource::failing(
        RosterError::new(RosterErrorKind::FetchFailure).with_reason(reason::TRANSPORT),
    );

    let err = sync(&ws, &source).unwrap_err();

    assert_eq!(err.stage(), Stage::Fetch);
    assert_eq!(err.cause().reason(), Some(reason::TRANSPORT));
    assert!(!ws.snapshot().exists());
    assert!(!ws.db().exists());
}

#[test]
fn test_empty_page_warns_and_keeps_old_snapshot() {
    // Given: a previous successful run
    let ws = Workspace::new();
    sync(&ws, &StaticSource::page(vec![employee("1", 1, true)])).unwrap();
    let before = fs::read(ws.snapshot()).unwrap();

    // When: the source returns nothing
    let report = sync(&ws, &StaticSource::page(Vec::new())).unwrap();

    // Then: the run succeeds with a warning and nothing is lost
    let warnings = report.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].reason(), Some(reason::EMPTY));
    assert_eq!(report.loaded.rows, 0);
    assert_eq!(fs::read(ws.snapshot()).unwrap(), before);
    assert_eq!(ws.stored().len(), 1);
}

#[test]
fn test_snapshot_failure_does_not_block_load() {
    // Given: the snapshot's parent is a regular file
    let ws = Workspace::new();
    let blocker = ws.dir.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let source = StaticSource::page(vec![employee("1", 1, true)]);

    // When: a sync runs
    let report = Pipeline::new(&source, ws.connector(), blocker.join("employees.csv"))
        .sync()
        .unwrap();

    // Then: the write failure is a warning and the load still happened
    assert_eq!(report.warnings().len(), 1);
    assert_eq!(report.warnings()[0].kind(), RosterErrorKind::WriteFailure);
    assert_eq!(ws.stored().len(), 1);
}

#[test]
fn test_connection_failure_is_reported() {
    let ws = Workspace::new();
    let source = StaticSource::page(vec![employee("1", 1, true)]);
    let connector = SqliteConnector::new(ws.dir.path().join("missing").join("roster.db"));

    let err = Pipeline::new(&source, connector, ws.snapshot())
        .sync()
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Connection);
    assert_eq!(err.cause().kind(), RosterErrorKind::ConnectionFailure);
    assert!(ws.snapshot().exists(), "snapshot is staged before connecting");
}

#[test]
fn test_schema_failure_is_reported() {
    let ws = Workspace::new();
    Connection::open(ws.db())
        .unwrap()
        .execute_batch("CREATE TABLE unrelated (x INTEGER)")
        .unwrap();
    let source = StaticSource::page(vec![employee("1", 1, true)]);

    let err = Pipeline::new(&source, ReadOnlyConnector(ws.db()), ws.snapshot())
        .sync()
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Schema);
    assert_eq!(err.cause().kind(), RosterErrorKind::SchemaFailure);
}

#[test]
fn test_load_failure_leaves_storage_unchanged() {
    // Given: one committed employee
    let ws = Workspace::new();
    sync(&ws, &StaticSource::page(vec![employee("1", 1, true)])).unwrap();

    // When: a page with an invalid key is synced
    let source = StaticSource::page(vec![employee("1", 9, false), employee("", 1, true)]);
    let err = sync(&ws, &source).unwrap_err();

    // Then: the run fails at load and the old row is intact
    assert_eq!(err.stage(), Stage::Load);
    assert_eq!(err.cause().reason(), Some(reason::CONSTRAINT));
    let stored = ws.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].photo_revision, 1);
}

#[test]
fn test_load_replays_snapshot_without_source() {
    // Given: a staged snapshot from a sync into another database
    let ws = Workspace::new();
    let records = vec![employee("1", 1, true), employee("2", 4, false)];
    sync(&ws, &StaticSource::page(records)).unwrap();
    let fresh = ws.dir.path().join("fresh.db");

    // When: it is loaded into an empty database
    let report = run_load(&SqliteConnector::new(&fresh), &ws.snapshot()).unwrap();

    // Then: the fresh database matches the synced one
    assert_eq!(report.loaded.rows, 2);
    assert_eq!(report.snapshot_path, ws.snapshot());
    let conn = Connection::open(&fresh).unwrap();
    assert_eq!(load_stored_employees(&conn).unwrap(), ws.stored());
}

#[test]
fn test_pipeline_load_uses_configured_snapshot() {
    let ws = Workspace::new();
    let source = StaticSource::page(vec![employee("7", 1, true)]);
    let pipeline = Pipeline::new(&source, ws.connector(), ws.snapshot());
    pipeline.sync().unwrap();

    let report = pipeline.load().unwrap();

    assert_eq!(report.loaded.rows, 1);
    assert_eq!(ws.stored().len(), 1);
}

#[test]
fn test_load_of_missing_snapshot_fails_at_load_stage() {
    let ws = Workspace::new();

    let err = run_load(&ws.connector(), &ws.snapshot()).unwrap_err();

    assert_eq!(err.stage(), Stage::Load);
    assert_eq!(err.cause().reason(), Some(reason::READ));
    let conn = Connection::open(ws.db()).unwrap();
    assert_eq!(count_stored_employees(&conn).unwrap(), 0);
}

#[test]
fn test_load_of_bad_snapshot_commits_nothing() {
    let ws = Workspace::new();
    write_snapshot(
        &ws.snapshot(),
        "1,A,B,,,P,PF,1,true,a@x\n2,C,D,,,P,PF,seven,true,c@x\n",
    );

    let err = run_load(&ws.connector(), &ws.snapshot()).unwrap_err();

    assert_eq!(err.stage(), Stage::Load);
    assert_eq!(err.cause().reason(), Some(reason::COERCION));
    assert!(ws.stored().is_empty());
}

fn write_snapshot(path: &Path, rows: &str) {
    fs::write(
        path,
        format!(
            "empNo,givenName,surname,preferredName,initial,positionName,positionNameFr,photoRevision,active,email\n{}",
            rows
        ),
    )
    .unwrap();
}
