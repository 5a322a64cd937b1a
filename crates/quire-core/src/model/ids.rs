use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        ///
        /// Wraps the engine-assigned row id so references to different
        /// entities cannot be mixed up.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn as_i64(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map(Self)
            }
        }
    };
}

define_id!(PublisherId, "Unique identifier for a publisher.");
define_id!(AuthorId, "Unique identifier for an author.");
define_id!(GenreId, "Unique identifier for a genre.");
define_id!(BookId, "Unique identifier for a catalog book.");
define_id!(MemberId, "Unique identifier for a library member.");
define_id!(StaffId, "Unique identifier for a staff member.");
define_id!(BorrowingId, "Unique identifier for a borrowing record.");
define_id!(FineId, "Unique identifier for a fine.");
define_id!(ReservationId, "Unique identifier for a reservation.");
define_id!(AuditEntryId, "Unique identifier for an audit log entry.");
