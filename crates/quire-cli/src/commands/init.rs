use anyhow::Result;
use quire_core::schema::Database;
use std::path::Path;

pub fn run_init(db_path: &Path) -> Result<()> {
    log::info!("Initializing database at {}", db_path.display());
    let db = Database::open(db_path)?;

    // Opening applies pending migrations; report what exists now
    let stats = db.stats()?;
    println!("Database ready: {}", db_path.display());
    println!(
        "  {} books, {} members, {} staff",
        stats.books, stats.members, stats.staff
    );

    Ok(())
}
