//! Roster CLI
//!
//! Command-line interface for the roster sync pipeline

use clap::{Parser, Subcommand};
use roster_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "roster")]
#[command(about = "Roster - employee roster sync", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the roster, stage a snapshot, and load it into the database
    Sync(commands::sync::SyncArgs),
    /// Load the staged snapshot into the database without fetching
    Load(commands::load::LoadArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    logging_facility::init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Sync(args) => commands::sync::execute(args),
        Commands::Load(args) => commands::load::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
