//! Circulation operations: borrowings, fines, and reservations.
//!
//! Borrow and return are multi-statement operations and run inside a
//! single transaction so `books.available_quantity` stays consistent with
//! the set of open borrowings.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};

use crate::error::{Error, Result};
use crate::model::{
    BookId, Borrowing, BorrowingId, BorrowingStatus, Fine, FineId, FineStatus, MemberId, NewFine,
    Reservation, ReservationId, ReservationStatus, StaffId,
};

use super::db::Database;

const BORROWING_COLUMNS: &str = "id, book_id, member_id, staff_id, borrow_date, due_date,
    return_date, late_fee, status, created_at, updated_at";

// Borrowings
impl Database {
    /// Check a copy out to a member: decrement the book's available count
    /// and insert the borrowing record, atomically. The new row takes the
    /// schema default status, `Borrowed`.
    pub fn borrow_book(
        &mut self,
        book_id: BookId,
        member_id: MemberId,
        staff_id: StaffId,
        borrow_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<BorrowingId> {
        let tx = self.conn.transaction()?;
        let now = Utc::now();

        let decremented = tx.execute(
            "UPDATE books
             SET available_quantity = available_quantity - 1, updated_at = ?2
             WHERE id = ?1 AND available_quantity > 0",
            params![book_id, now],
        )?;
        if decremented == 0 {
            let exists: i64 = tx.query_row(
                "SELECT COUNT(*) FROM books WHERE id = ?1",
                [book_id],
                |row| row.get(0),
            )?;
            return Err(if exists == 0 {
                Error::NotFound {
                    entity: "book",
                    id: book_id.to_string(),
                }
            } else {
                Error::NoAvailableCopies(book_id.as_i64())
            });
        }

        tx.execute(
            "INSERT INTO borrowings (
                book_id, member_id, staff_id, borrow_date, due_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![book_id, member_id, staff_id, borrow_date, due_date, now],
        )?;
        let id = BorrowingId::new(tx.last_insert_rowid());

        tx.commit()?;
        Ok(id)
    }

    /// Take a copy back: set return date, late fee, and status, and
    /// increment the book's available count, atomically. Rejected when the
    /// borrowing is not open, so the count is never incremented twice.
    pub fn return_book(
        &mut self,
        borrowing_id: BorrowingId,
        return_date: NaiveDate,
        late_fee: f64,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        let now = Utc::now();

        let row = tx
            .query_row(
                "SELECT book_id, status FROM borrowings WHERE id = ?1",
                [borrowing_id],
                |row| {
                    Ok((
                        row.get::<_, BookId>(0)?,
                        row.get::<_, BorrowingStatus>(1)?,
                    ))
                },
            )
            .optional()?;
        let Some((book_id, status)) = row else {
            return Err(Error::NotFound {
                entity: "borrowing",
                id: borrowing_id.to_string(),
            });
        };
        if !status.is_open() {
            return Err(Error::InvalidData(format!(
                "borrowing {borrowing_id} is already {status}"
            )));
        }

        tx.execute(
            "UPDATE borrowings
             SET return_date = ?2, late_fee = ?3, status = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                borrowing_id,
                return_date,
                late_fee,
                BorrowingStatus::Returned,
                now,
            ],
        )?;
        tx.execute(
            "UPDATE books
             SET available_quantity = available_quantity + 1, updated_at = ?2
             WHERE id = ?1",
            params![book_id, now],
        )?;

        tx.commit()?;
        Ok(())
    }

    pub fn get_borrowing(&self, id: BorrowingId) -> Result<Borrowing> {
        self.conn
            .query_row(
                &format!("SELECT {BORROWING_COLUMNS} FROM borrowings WHERE id = ?1"),
                [id],
                row_to_borrowing,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "borrowing",
                id: id.to_string(),
            })
    }

    pub fn list_borrowings_for_member(&self, member_id: MemberId) -> Result<Vec<Borrowing>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BORROWING_COLUMNS} FROM borrowings
             WHERE member_id = ?1 ORDER BY borrow_date DESC, id DESC"
        ))?;
        let borrowings = stmt
            .query_map([member_id], row_to_borrowing)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(borrowings)
    }

    /// Borrowings whose copy is still out (`Borrowed` or `Overdue`).
    pub fn list_open_borrowings(&self) -> Result<Vec<Borrowing>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BORROWING_COLUMNS} FROM borrowings
             WHERE status IN ('Borrowed', 'Overdue') ORDER BY due_date, id"
        ))?;
        let borrowings = stmt
            .query_map([], row_to_borrowing)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(borrowings)
    }

    /// Open borrowings past due as of the given date.
    pub fn list_overdue_borrowings(&self, as_of: NaiveDate) -> Result<Vec<Borrowing>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BORROWING_COLUMNS} FROM borrowings
             WHERE status IN ('Borrowed', 'Overdue') AND due_date < ?1
             ORDER BY due_date, id"
        ))?;
        let borrowings = stmt
            .query_map([as_of], row_to_borrowing)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(borrowings)
    }

    /// Transition a borrowing's status directly, for `Overdue` and `Lost`
    /// marking. Returns should go through [`Database::return_book`], which
    /// also restores the book's available count.
    pub fn set_borrowing_status(&self, id: BorrowingId, status: BorrowingStatus) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE borrowings SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status, Utc::now()],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "borrowing",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// Fines
impl Database {
    /// Record a fine against a member. New fines start `Pending`.
    pub fn issue_fine(&self, fine: &NewFine) -> Result<FineId> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO fines (
                member_id, borrowing_id, amount, reason, issued_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                fine.member_id,
                fine.borrowing_id,
                fine.amount,
                fine.reason,
                fine.issued_date,
                now,
            ],
        )?;
        Ok(FineId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_fine(&self, id: FineId) -> Result<Fine> {
        self.conn
            .query_row(
                "SELECT id, member_id, borrowing_id, amount, reason, issued_date,
                        paid_date, status, created_at, updated_at
                 FROM fines WHERE id = ?1",
                [id],
                row_to_fine,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "fine",
                id: id.to_string(),
            })
    }

    pub fn list_fines_for_member(&self, member_id: MemberId) -> Result<Vec<Fine>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, member_id, borrowing_id, amount, reason, issued_date,
                    paid_date, status, created_at, updated_at
             FROM fines WHERE member_id = ?1 ORDER BY issued_date DESC, id DESC",
        )?;
        let fines = stmt
            .query_map([member_id], row_to_fine)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(fines)
    }

    /// Settle a pending fine as paid.
    pub fn pay_fine(&self, id: FineId, paid_date: NaiveDate) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE fines SET status = ?2, paid_date = ?3, updated_at = ?4
             WHERE id = ?1 AND status = 'Pending'",
            params![id, FineStatus::Paid, paid_date, Utc::now()],
        )?;
        if affected == 0 {
            return self.fine_settle_failure(id);
        }
        Ok(())
    }

    /// Settle a pending fine as waived.
    pub fn waive_fine(&self, id: FineId) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE fines SET status = ?2, updated_at = ?3
             WHERE id = ?1 AND status = 'Pending'",
            params![id, FineStatus::Waived, Utc::now()],
        )?;
        if affected == 0 {
            return self.fine_settle_failure(id);
        }
        Ok(())
    }

    fn fine_settle_failure(&self, id: FineId) -> Result<()> {
        let status = self
            .conn
            .query_row(
                "SELECT status FROM fines WHERE id = ?1",
                [id],
                |row| row.get::<_, FineStatus>(0),
            )
            .optional()?;
        match status {
            None => Err(Error::NotFound {
                entity: "fine",
                id: id.to_string(),
            }),
            Some(status) => Err(Error::InvalidData(format!(
                "fine {id} is already {status}"
            ))),
        }
    }
}

// Reservations
impl Database {
    /// Place a hold on a book. New reservations start `Pending`; the
    /// expiry must be strictly later than the reservation time.
    pub fn place_reservation(
        &self,
        book_id: BookId,
        member_id: MemberId,
        reserved_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<ReservationId> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO reservations (
                book_id, member_id, reserved_at, expires_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![book_id, member_id, reserved_at, expires_at, now],
        )?;
        Ok(ReservationId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_reservation(&self, id: ReservationId) -> Result<Reservation> {
        self.conn
            .query_row(
                "SELECT id, book_id, member_id, reserved_at, expires_at, status,
                        created_at, updated_at
                 FROM reservations WHERE id = ?1",
                [id],
                row_to_reservation,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "reservation",
                id: id.to_string(),
            })
    }

    pub fn list_reservations_for_member(&self, member_id: MemberId) -> Result<Vec<Reservation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, book_id, member_id, reserved_at, expires_at, status,
                    created_at, updated_at
             FROM reservations WHERE member_id = ?1 ORDER BY reserved_at DESC, id DESC",
        )?;
        let reservations = stmt
            .query_map([member_id], row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reservations)
    }

    pub fn list_reservations_for_book(&self, book_id: BookId) -> Result<Vec<Reservation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, book_id, member_id, reserved_at, expires_at, status,
                    created_at, updated_at
             FROM reservations WHERE book_id = ?1 ORDER BY reserved_at, id",
        )?;
        let reservations = stmt
            .query_map([book_id], row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reservations)
    }

    /// Transition a reservation's status (fulfil, cancel, or expire).
    pub fn set_reservation_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE reservations SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status, Utc::now()],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "reservation",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn row_to_borrowing(row: &rusqlite::Row) -> rusqlite::Result<Borrowing> {
    Ok(Borrowing {
        id: row.get(0)?,
        book_id: row.get(1)?,
        member_id: row.get(2)?,
        staff_id: row.get(3)?,
        borrow_date: row.get(4)?,
        due_date: row.get(5)?,
        return_date: row.get(6)?,
        late_fee: row.get(7)?,
        status: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn row_to_fine(row: &rusqlite::Row) -> rusqlite::Result<Fine> {
    Ok(Fine {
        id: row.get(0)?,
        member_id: row.get(1)?,
        borrowing_id: row.get(2)?,
        amount: row.get(3)?,
        reason: row.get(4)?,
        issued_date: row.get(5)?,
        paid_date: row.get(6)?,
        status: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn row_to_reservation(row: &rusqlite::Row) -> rusqlite::Result<Reservation> {
    Ok(Reservation {
        id: row.get(0)?,
        book_id: row.get(1)?,
        member_id: row.get(2)?,
        reserved_at: row.get(3)?,
        expires_at: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
