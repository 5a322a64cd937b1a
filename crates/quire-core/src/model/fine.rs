use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::{BorrowingId, FineId, MemberId};

/// Settlement state of a fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FineStatus {
    Pending,
    Paid,
    Waived,
}

impl FineStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Waived => "Waived",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Paid" => Some(Self::Paid),
            "Waived" => Some(Self::Waived),
            _ => None,
        }
    }
}

impl fmt::Display for FineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for FineStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for FineStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Self::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown fine status: {s}").into()))
    }
}

/// A monetary fine charged to a member, optionally tied to a borrowing.
///
/// How amounts are computed is an application concern; the store only
/// records them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fine {
    pub id: FineId,
    pub member_id: MemberId,

    /// The borrowing that caused the fine, when there is one.
    pub borrowing_id: Option<BorrowingId>,

    /// Non-negative.
    pub amount: f64,

    pub reason: Option<String>,
    pub issued_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: FineStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a fine. New fines start `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFine {
    pub member_id: MemberId,
    pub borrowing_id: Option<BorrowingId>,
    pub amount: f64,
    pub reason: Option<String>,
    pub issued_date: NaiveDate,
}

impl NewFine {
    #[must_use]
    pub const fn new(member_id: MemberId, amount: f64, issued_date: NaiveDate) -> Self {
        Self {
            member_id,
            borrowing_id: None,
            amount,
            reason: None,
            issued_date,
        }
    }

    #[must_use]
    pub const fn with_borrowing(mut self, borrowing_id: BorrowingId) -> Self {
        self.borrowing_id = Some(borrowing_id);
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
