use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::{BookId, BorrowingId, MemberId, StaffId};

/// State of a borrowing record.
///
/// No transition order is enforced beyond what keeps book availability
/// consistent: a borrowing that already left the `Borrowed`/`Overdue`
/// states cannot be returned again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorrowingStatus {
    Borrowed,
    Returned,
    Overdue,
    Lost,
}

impl BorrowingStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Borrowed => "Borrowed",
            Self::Returned => "Returned",
            Self::Overdue => "Overdue",
            Self::Lost => "Lost",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Borrowed" => Some(Self::Borrowed),
            "Returned" => Some(Self::Returned),
            "Overdue" => Some(Self::Overdue),
            "Lost" => Some(Self::Lost),
            _ => None,
        }
    }

    /// Whether the borrowed copy is still out of the library.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Borrowed | Self::Overdue)
    }
}

impl fmt::Display for BorrowingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for BorrowingStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BorrowingStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Self::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown borrowing status: {s}").into()))
    }
}

/// A circulation record: one copy of a book lent to a member, handled by
/// a staff member at the desk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrowing {
    pub id: BorrowingId,
    pub book_id: BookId,
    pub member_id: MemberId,

    /// Staff member who handled the checkout.
    pub staff_id: StaffId,

    pub borrow_date: NaiveDate,

    /// Never earlier than `borrow_date`.
    pub due_date: NaiveDate,

    /// Set when the copy comes back; never earlier than `borrow_date`.
    pub return_date: Option<NaiveDate>,

    /// Late fee assessed on return, non-negative.
    pub late_fee: f64,

    pub status: BorrowingStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrowing_status_round_trip() {
        for status in [
            BorrowingStatus::Borrowed,
            BorrowingStatus::Returned,
            BorrowingStatus::Overdue,
            BorrowingStatus::Lost,
        ] {
            assert_eq!(BorrowingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BorrowingStatus::parse("Misplaced"), None);
    }

    #[test]
    fn test_borrowing_status_is_open() {
        assert!(BorrowingStatus::Borrowed.is_open());
        assert!(BorrowingStatus::Overdue.is_open());
        assert!(!BorrowingStatus::Returned.is_open());
        assert!(!BorrowingStatus::Lost.is_open());
    }
}
