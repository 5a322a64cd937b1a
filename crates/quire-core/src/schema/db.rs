use rusqlite::Connection;
use std::path::Path;

use crate::error::Result;

use super::migrations::MIGRATIONS;

/// A database connection with CRUD methods for the catalog, circulation,
/// and audit entities.
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Foreign key enforcement is per-connection in SQLite
        conn.pragma_update(None, "foreign_keys", true)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        // Create migrations table if it doesn't exist
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        // Get applied migrations
        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        // Apply pending migrations
        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

/// Row and open-activity counts, for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryStats {
    pub publishers: i64,
    pub authors: i64,
    pub genres: i64,
    pub books: i64,
    pub members: i64,
    pub staff: i64,
    pub open_borrowings: i64,
    pub pending_fines: i64,
    pub pending_reservations: i64,
    pub audit_entries: i64,
}

impl Database {
    /// Summary counts across the whole store.
    pub fn stats(&self) -> Result<LibraryStats> {
        let count = |sql: &str| -> Result<i64> {
            Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
        };

        Ok(LibraryStats {
            publishers: count("SELECT COUNT(*) FROM publishers")?,
            authors: count("SELECT COUNT(*) FROM authors")?,
            genres: count("SELECT COUNT(*) FROM genres")?,
            books: count("SELECT COUNT(*) FROM books")?,
            members: count("SELECT COUNT(*) FROM members")?,
            staff: count("SELECT COUNT(*) FROM staff")?,
            open_borrowings: count(
                "SELECT COUNT(*) FROM borrowings WHERE status IN ('Borrowed', 'Overdue')",
            )?,
            pending_fines: count("SELECT COUNT(*) FROM fines WHERE status = 'Pending'")?,
            pending_reservations: count(
                "SELECT COUNT(*) FROM reservations WHERE status = 'Pending'",
            )?,
            audit_entries: count("SELECT COUNT(*) FROM audit_log")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        // Verify migrations table exists
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1); // One migration applied
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::open_in_memory().unwrap();
        let enabled: i64 = db
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quire.db");

        drop(Database::open(&path).unwrap());
        // Re-opening must apply nothing new
        let db = Database::open(&path).unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_stats_on_empty_database() {
        let db = Database::open_in_memory().unwrap();
        let stats = db.stats().unwrap();
        assert_eq!(stats.books, 0);
        assert_eq!(stats.members, 0);
        assert_eq!(stats.open_borrowings, 0);
        assert_eq!(stats.audit_entries, 0);
    }
}
