use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;

#[derive(Debug, Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/quire/quire.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Create the database and bring its schema up to date
    ///
    /// Opens (or creates) the database file and applies any pending schema
    /// migrations, establishing all tables, constraints, and indexes in
    /// dependency order:
    ///
    /// - Reference data: publishers, authors, genres
    /// - Catalog: books and their author/genre junctions
    /// - People: members and staff
    /// - Activity: borrowings, fines, reservations
    /// - Audit: the append-only audit log
    ///
    /// Running init against an up-to-date database is a no-op; already
    /// applied migrations are skipped.
    Init,
    /// Show catalog and circulation counts
    Status,
    /// Print the audit trail of one row
    ///
    /// TABLE is the stored table name (e.g. "books") and RECORD_ID the
    /// row's integer id. Entries are printed oldest first, with the old
    /// and new value snapshots when they were recorded.
    Audit {
        /// Table the row belongs to
        table: String,
        /// Integer id of the row
        record_id: i64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.db {
        Some(path) => config::Config::load_with_db_path(path)?,
        None => config::Config::load()?,
    };

    // Ensure database directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match cli.command {
        Commands::Init => {
            commands::run_init(&config.database_path)?;
        }
        Commands::Status => {
            commands::show_status(&config.database_path)?;
        }
        Commands::Audit { table, record_id } => {
            commands::show_audit(&config.database_path, &table, record_id)?;
        }
    }

    Ok(())
}
