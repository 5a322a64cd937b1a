use anyhow::Result;
use quire_core::schema::Database;
use std::path::Path;

pub fn show_audit(db_path: &Path, table: &str, record_id: i64) -> Result<()> {
    let db = Database::open(db_path)?;
    let trail = db.audit_trail(table, record_id)?;

    if trail.is_empty() {
        println!("No audit entries for {table} row {record_id}");
        return Ok(());
    }

    println!("\nAudit trail for {table} row {record_id}\n");
    for entry in trail {
        println!(
            "  {}  {}",
            entry.changed_at.format("%Y-%m-%d %H:%M:%S"),
            entry.action
        );
        if let Some(old) = &entry.old_values {
            println!("    old: {old}");
        }
        if let Some(new) = &entry.new_values {
            println!("    new: {new}");
        }
    }

    Ok(())
}
