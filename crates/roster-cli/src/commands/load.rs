//! Load command: replay the staged snapshot

use clap::Args;
use roster_core::config::RosterConfig;
use roster_engine::run_load;
use roster_store::SqliteConnector;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Snapshot file (overrides CSV_FILENAME)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// SQLite database (overrides DB_PATH)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn execute(args: LoadArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = RosterConfig::from_env()?;
    let snapshot = args.snapshot.unwrap_or(config.snapshot_path);
    let db = args.db.unwrap_or(config.db_path);

    let report = run_load(&SqliteConnector::new(db), &snapshot)?;

    println!("✓ Load complete");
    println!("  Run: {}", report.run_id);
    println!("  Snapshot: {}", report.snapshot_path.display());
    println!("  Loaded: {}", report.loaded.rows);

    Ok(())
}
