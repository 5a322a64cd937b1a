use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::AuditEntryId;

/// The data-mutating action an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    Insert,
    Update,
    Delete,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for AuditAction {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AuditAction {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Self::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown audit action: {s}").into()))
    }
}

/// An append-only record of a data-mutating action.
///
/// The `(table_name, record_id)` pair is a deliberately untyped reference:
/// it can point at a row of any table, with no foreign key behind it, so
/// entries survive the deletion of what they describe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub table_name: String,
    pub record_id: i64,
    pub action: AuditAction,
    pub changed_at: DateTime<Utc>,

    /// Row snapshot before the change (absent for inserts).
    pub old_values: Option<serde_json::Value>,

    /// Row snapshot after the change (absent for deletes).
    pub new_values: Option<serde_json::Value>,
}

/// Insert payload for an audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub table_name: String,
    pub record_id: i64,
    pub action: AuditAction,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
}

impl NewAuditEntry {
    #[must_use]
    pub fn new(table_name: impl Into<String>, record_id: i64, action: AuditAction) -> Self {
        Self {
            table_name: table_name.into(),
            record_id,
            action,
            old_values: None,
            new_values: None,
        }
    }

    #[must_use]
    pub fn with_old_values(mut self, values: serde_json::Value) -> Self {
        self.old_values = Some(values);
        self
    }

    #[must_use]
    pub fn with_new_values(mut self, values: serde_json::Value) -> Self {
        self.new_values = Some(values);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_action_round_trip() {
        for action in [AuditAction::Insert, AuditAction::Update, AuditAction::Delete] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::parse("UPSERT"), None);
    }

    #[test]
    fn test_new_audit_entry_builder() {
        let entry = NewAuditEntry::new("books", 7, AuditAction::Update)
            .with_old_values(serde_json::json!({"available_quantity": 5}))
            .with_new_values(serde_json::json!({"available_quantity": 4}));

        assert_eq!(entry.table_name, "books");
        assert!(entry.old_values.is_some());
        assert!(entry.new_values.is_some());
    }
}
