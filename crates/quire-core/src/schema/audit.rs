//! The append-only audit log.
//!
//! Entries are written by callers around their own mutations; nothing in
//! this crate writes them implicitly, and no update or delete surface
//! exists for the table.

use chrono::Utc;
use rusqlite::params;

use crate::error::Result;
use crate::model::{AuditEntry, AuditEntryId, NewAuditEntry};

use super::db::Database;

impl Database {
    /// Append an audit entry, returning its assigned id.
    pub fn append_audit(&self, entry: &NewAuditEntry) -> Result<AuditEntryId> {
        let old_values = entry
            .old_values
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let new_values = entry
            .new_values
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.conn.execute(
            "INSERT INTO audit_log (table_name, record_id, action, changed_at, old_values, new_values)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.table_name,
                entry.record_id,
                entry.action,
                Utc::now(),
                old_values,
                new_values,
            ],
        )?;
        Ok(AuditEntryId::new(self.conn.last_insert_rowid()))
    }

    /// All audit entries recorded for one row, oldest first.
    pub fn audit_trail(&self, table_name: &str, record_id: i64) -> Result<Vec<AuditEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, table_name, record_id, action, changed_at, old_values, new_values
             FROM audit_log
             WHERE table_name = ?1 AND record_id = ?2
             ORDER BY changed_at, id",
        )?;
        let entries = stmt
            .query_map(params![table_name, record_id], row_to_audit_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// The most recent audit entries across all tables, newest first.
    pub fn recent_audit(&self, limit: u32) -> Result<Vec<AuditEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, table_name, record_id, action, changed_at, old_values, new_values
             FROM audit_log
             ORDER BY changed_at DESC, id DESC
             LIMIT ?1",
        )?;
        let entries = stmt
            .query_map([limit], row_to_audit_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

fn row_to_audit_entry(row: &rusqlite::Row) -> rusqlite::Result<AuditEntry> {
    let old_values: Option<String> = row.get(5)?;
    let new_values: Option<String> = row.get(6)?;

    Ok(AuditEntry {
        id: row.get(0)?,
        table_name: row.get(1)?,
        record_id: row.get(2)?,
        action: row.get(3)?,
        changed_at: row.get(4)?,
        old_values: parse_snapshot(old_values, 5)?,
        new_values: parse_snapshot(new_values, 6)?,
    })
}

fn parse_snapshot(
    raw: Option<String>,
    column: usize,
) -> rusqlite::Result<Option<serde_json::Value>> {
    raw.map(|text| {
        serde_json::from_str(&text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AuditAction;

    #[test]
    fn test_audit_round_trip() {
        let db = Database::open_in_memory().unwrap();

        db.append_audit(
            &NewAuditEntry::new("books", 7, AuditAction::Update)
                .with_old_values(serde_json::json!({"available_quantity": 5}))
                .with_new_values(serde_json::json!({"available_quantity": 4})),
        )
        .unwrap();

        let trail = db.audit_trail("books", 7).unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].action, AuditAction::Update);
        assert_eq!(
            trail[0].old_values,
            Some(serde_json::json!({"available_quantity": 5}))
        );
        assert_eq!(
            trail[0].new_values,
            Some(serde_json::json!({"available_quantity": 4}))
        );
    }

    #[test]
    fn test_audit_trail_is_scoped_to_one_row() {
        let db = Database::open_in_memory().unwrap();
        db.append_audit(&NewAuditEntry::new("books", 1, AuditAction::Insert))
            .unwrap();
        db.append_audit(&NewAuditEntry::new("books", 2, AuditAction::Insert))
            .unwrap();
        db.append_audit(&NewAuditEntry::new("members", 1, AuditAction::Insert))
            .unwrap();

        assert_eq!(db.audit_trail("books", 1).unwrap().len(), 1);
        assert_eq!(db.audit_trail("members", 1).unwrap().len(), 1);
        assert_eq!(db.audit_trail("fines", 1).unwrap().len(), 0);
    }

    #[test]
    fn test_audit_entries_need_no_live_row() {
        // The (table_name, record_id) pair is not a foreign key; entries
        // can describe rows that never existed or were deleted.
        let db = Database::open_in_memory().unwrap();
        db.append_audit(
            &NewAuditEntry::new("books", 999, AuditAction::Delete)
                .with_old_values(serde_json::json!({"title": "Gone"})),
        )
        .unwrap();

        assert_eq!(db.audit_trail("books", 999).unwrap().len(), 1);
    }

    #[test]
    fn test_recent_audit_ordering_and_limit() {
        let db = Database::open_in_memory().unwrap();
        for record_id in 1..=5 {
            db.append_audit(&NewAuditEntry::new("books", record_id, AuditAction::Insert))
                .unwrap();
        }

        let recent = db.recent_audit(3).unwrap();
        assert_eq!(recent.len(), 3);
        // Newest first
        assert_eq!(recent[0].record_id, 5);
        assert_eq!(recent[2].record_id, 3);
    }
}
