//! Folio CLI
//!
//! Command-line access to the page and block handler over a local store

use clap::{Parser, Subcommand};
use folio_core::logging_facility::{init, Profile};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(about = "Folio - Page and block content management", long_about = None)]
struct Cli {
    /// SQLite database file, created on first use
    #[arg(long, global = true, default_value = ".folio/folio.db")]
    db: PathBuf,

    /// Logging profile: development or production
    #[arg(long, global = true, default_value = "development")]
    log_profile: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Page operations
    Page(commands::page::PageArgs),
    /// Block operations
    Block(commands::block::BlockArgs),
    /// Inspect the job queue
    Jobs(commands::jobs::JobsArgs),
}

fn main() {
    let cli = Cli::parse();
    init(cli.log_profile);

    let result = match cli.command {
        Commands::Page(args) => commands::page::execute(&cli.db, args),
        Commands::Block(args) => commands::block::execute(&cli.db, args),
        Commands::Jobs(args) => commands::jobs::execute(&cli.db, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
