use anyhow::Result;
use quire_core::schema::Database;
use std::path::Path;

pub fn show_status(db_path: &Path) -> Result<()> {
    let db = Database::open(db_path)?;
    let stats = db.stats()?;

    println!("\n📚 Quire Status\n");
    println!("  Database: {}", db_path.display());
    println!("  Publishers: {}", stats.publishers);
    println!("  Authors: {}", stats.authors);
    println!("  Genres: {}", stats.genres);
    println!("  Books: {}", stats.books);
    println!("  Members: {}", stats.members);
    println!("  Staff: {}", stats.staff);
    println!("  Open borrowings: {}", stats.open_borrowings);
    println!("  Pending fines: {}", stats.pending_fines);
    println!("  Pending reservations: {}", stats.pending_reservations);
    println!("  Audit entries: {}", stats.audit_entries);

    Ok(())
}
