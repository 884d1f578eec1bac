//! Sync command

use clap::Args;
use roster_core::config::RosterConfig;
use roster_core::model::RosterQuery;
use roster_engine::{HttpRosterFetcher, Pipeline, SnapshotOutcome};
use roster_store::SqliteConnector;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Snapshot file (overrides CSV_FILENAME)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// SQLite database (overrides DB_PATH)
    #[arg(long)]
    pub db: Option<PathBuf>,

    #[arg(long)]
    pub skip: Option<u32>,

    /// Page size
    #[arg(long)]
    pub take: Option<u32>,

    #[arg(long)]
    pub search: Option<String>,
}

pub fn execute(args: SyncArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = RosterConfig::from_env()?;
    let fetcher = HttpRosterFetcher::new(config.endpoint()?)?;

    let mut query = RosterQuery::default();
    if let Some(skip) = args.skip {
        query = query.with_skip(skip);
    }
    if let Some(take) = args.take {
        query = query.with_take(take);
    }
    if let Some(search) = args.search {
        query = query.with_search(search);
    }

    let snapshot = args.snapshot.unwrap_or(config.snapshot_path);
    let db = args.db.unwrap_or(config.db_path);

    let report = Pipeline::new(fetcher, SqliteConnector::new(db), snapshot)
        .with_query(query)
        .sync()?;

    for warning in report.warnings() {
        eprintln!("Warning: {}", warning);
    }

    println!("✓ Sync complete");
    println!("  Run: {}", report.run_id);
    match report.total {
        Some(total) => println!("  Fetched: {} of {}", report.fetched, total),
        None => println!("  Fetched: {}", report.fetched),
    }
    if let SnapshotOutcome::Written(summary) = &report.snapshot {
        println!("  Snapshot: {} ({})", summary.path.display(), summary.digest);
    }
    println!("  Loaded: {}", report.loaded.rows);

    Ok(())
}
