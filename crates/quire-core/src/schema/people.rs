//! CRUD operations for members and staff.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::error::{Error, Result};
use crate::model::{
    Member, MemberId, MembershipStatus, NewMember, NewStaff, Staff, StaffId,
};

use super::db::Database;

// Member CRUD
impl Database {
    /// Insert a new member, returning the assigned id. Membership status
    /// takes the schema default, `Active`.
    pub fn insert_member(&self, member: &NewMember) -> Result<MemberId> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO members (
                library_card_number, first_name, last_name, date_of_birth,
                address, phone, email, registration_date, expiry_date,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            params![
                member.library_card_number,
                member.first_name,
                member.last_name,
                member.date_of_birth,
                member.address,
                member.phone,
                member.email,
                member.registration_date,
                member.expiry_date,
                now,
            ],
        )?;
        Ok(MemberId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_member(&self, id: MemberId) -> Result<Member> {
        self.conn
            .query_row(
                "SELECT id, library_card_number, first_name, last_name, date_of_birth,
                        address, phone, email, registration_date, expiry_date,
                        membership_status, created_at, updated_at
                 FROM members WHERE id = ?1",
                [id],
                row_to_member,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "member",
                id: id.to_string(),
            })
    }

    /// Look up a member by the unique printed card number.
    pub fn find_member_by_card(&self, library_card_number: &str) -> Result<Option<Member>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, library_card_number, first_name, last_name, date_of_birth,
                        address, phone, email, registration_date, expiry_date,
                        membership_status, created_at, updated_at
                 FROM members WHERE library_card_number = ?1",
                [library_card_number],
                row_to_member,
            )
            .optional()?)
    }

    pub fn list_members(&self) -> Result<Vec<Member>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, library_card_number, first_name, last_name, date_of_birth,
                    address, phone, email, registration_date, expiry_date,
                    membership_status, created_at, updated_at
             FROM members ORDER BY last_name, first_name",
        )?;
        let members = stmt
            .query_map([], row_to_member)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(members)
    }

    pub fn update_member(&self, member: &Member) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE members SET
                library_card_number = ?2, first_name = ?3, last_name = ?4,
                date_of_birth = ?5, address = ?6, phone = ?7, email = ?8,
                registration_date = ?9, expiry_date = ?10, membership_status = ?11,
                updated_at = ?12
             WHERE id = ?1",
            params![
                member.id,
                member.library_card_number,
                member.first_name,
                member.last_name,
                member.date_of_birth,
                member.address,
                member.phone,
                member.email,
                member.registration_date,
                member.expiry_date,
                member.membership_status,
                Utc::now(),
            ],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "member",
                id: member.id.to_string(),
            });
        }
        Ok(())
    }

    /// Transition a member's membership status.
    pub fn set_membership_status(&self, id: MemberId, status: MembershipStatus) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE members SET membership_status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status, Utc::now()],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "member",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete a member. Borrowings, fines, or reservations referencing the
    /// member block the delete.
    pub fn delete_member(&self, id: MemberId) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM members WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "member",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// Staff CRUD
impl Database {
    /// Insert a new staff member, returning the assigned id. New staff
    /// start active.
    pub fn insert_staff(&self, staff: &NewStaff) -> Result<StaffId> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO staff (
                first_name, last_name, position, username, password_hash,
                email, hire_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                staff.first_name,
                staff.last_name,
                staff.position,
                staff.username,
                staff.password_hash,
                staff.email,
                staff.hire_date,
                now,
            ],
        )?;
        Ok(StaffId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_staff(&self, id: StaffId) -> Result<Staff> {
        self.conn
            .query_row(
                "SELECT id, first_name, last_name, position, username, password_hash,
                        email, hire_date, is_active, created_at, updated_at
                 FROM staff WHERE id = ?1",
                [id],
                row_to_staff,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "staff",
                id: id.to_string(),
            })
    }

    pub fn list_staff(&self) -> Result<Vec<Staff>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, last_name, position, username, password_hash,
                    email, hire_date, is_active, created_at, updated_at
             FROM staff ORDER BY last_name, first_name",
        )?;
        let staff = stmt
            .query_map([], row_to_staff)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(staff)
    }

    pub fn update_staff(&self, staff: &Staff) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE staff SET
                first_name = ?2, last_name = ?3, position = ?4, username = ?5,
                password_hash = ?6, email = ?7, hire_date = ?8, is_active = ?9,
                updated_at = ?10
             WHERE id = ?1",
            params![
                staff.id,
                staff.first_name,
                staff.last_name,
                staff.position,
                staff.username,
                staff.password_hash,
                staff.email,
                staff.hire_date,
                staff.is_active,
                Utc::now(),
            ],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "staff",
                id: staff.id.to_string(),
            });
        }
        Ok(())
    }

    /// Activate or deactivate a staff member.
    pub fn set_staff_active(&self, id: StaffId, active: bool) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE staff SET is_active = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, active, Utc::now()],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "staff",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete a staff member. Borrowings they handled block the delete.
    pub fn delete_staff(&self, id: StaffId) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM staff WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "staff",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn row_to_member(row: &rusqlite::Row) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        library_card_number: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        date_of_birth: row.get(4)?,
        address: row.get(5)?,
        phone: row.get(6)?,
        email: row.get(7)?,
        registration_date: row.get(8)?,
        expiry_date: row.get(9)?,
        membership_status: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn row_to_staff(row: &rusqlite::Row) -> rusqlite::Result<Staff> {
    Ok(Staff {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        position: row.get(3)?,
        username: row.get(4)?,
        password_hash: row.get(5)?,
        email: row.get(6)?,
        hire_date: row.get(7)?,
        is_active: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn sample_member(card: &str, email: &str) -> NewMember {
        NewMember::new(
            card,
            "Ada",
            "Okafor",
            email,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_member_round_trip_defaults_active() {
        let db = db();
        let id = db
            .insert_member(&sample_member("LIB-000451", "ada@example.org"))
            .unwrap();

        let member = db.get_member(id).unwrap();
        assert_eq!(member.library_card_number, "LIB-000451");
        assert_eq!(member.membership_status, MembershipStatus::Active);
    }

    #[test]
    fn test_member_email_rules() {
        let db = db();
        // Empty email
        assert!(db.insert_member(&sample_member("C-1", "")).is_err());
        // Missing "@"
        assert!(db
            .insert_member(&sample_member("C-2", "ada.example.org"))
            .is_err());

        db.insert_member(&sample_member("C-3", "ada@example.org"))
            .unwrap();
        // Duplicate email
        assert!(db
            .insert_member(&sample_member("C-4", "ada@example.org"))
            .is_err());
    }

    #[test]
    fn test_member_card_number_unique() {
        let db = db();
        db.insert_member(&sample_member("C-1", "a@example.org"))
            .unwrap();
        assert!(db
            .insert_member(&sample_member("C-1", "b@example.org"))
            .is_err());
    }

    #[test]
    fn test_member_expiry_not_before_registration() {
        let db = db();
        let mut member = sample_member("C-1", "ada@example.org");
        member.expiry_date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert!(db.insert_member(&member).is_err());

        // Equal dates are allowed
        member.expiry_date = member.registration_date;
        assert!(db.insert_member(&member).is_ok());
    }

    #[test]
    fn test_find_member_by_card() {
        let db = db();
        let id = db
            .insert_member(&sample_member("LIB-000451", "ada@example.org"))
            .unwrap();

        let found = db.find_member_by_card("LIB-000451").unwrap();
        assert_eq!(found.map(|m| m.id), Some(id));
        assert!(db.find_member_by_card("LIB-999999").unwrap().is_none());
    }

    #[test]
    fn test_set_membership_status() {
        let db = db();
        let id = db
            .insert_member(&sample_member("C-1", "ada@example.org"))
            .unwrap();

        db.set_membership_status(id, MembershipStatus::Suspended)
            .unwrap();
        assert_eq!(
            db.get_member(id).unwrap().membership_status,
            MembershipStatus::Suspended
        );
    }

    #[test]
    fn test_staff_round_trip_defaults_active() {
        let db = db();
        let id = db
            .insert_staff(&NewStaff::new(
                "June",
                "Park",
                "Circulation Clerk",
                "jpark",
                "june@library.example.org",
            ))
            .unwrap();

        let staff = db.get_staff(id).unwrap();
        assert!(staff.is_active);
        assert_eq!(staff.position, "Circulation Clerk");

        db.set_staff_active(id, false).unwrap();
        assert!(!db.get_staff(id).unwrap().is_active);
    }

    #[test]
    fn test_staff_email_and_username_unique() {
        let db = db();
        db.insert_staff(&NewStaff::new(
            "June",
            "Park",
            "Clerk",
            "jpark",
            "june@library.example.org",
        ))
        .unwrap();

        // Same username
        assert!(db
            .insert_staff(&NewStaff::new(
                "Jin",
                "Park",
                "Clerk",
                "jpark",
                "jin@library.example.org",
            ))
            .is_err());
        // Same email
        assert!(db
            .insert_staff(&NewStaff::new(
                "Jin",
                "Park",
                "Clerk",
                "jpark2",
                "june@library.example.org",
            ))
            .is_err());
        // Malformed email
        assert!(db
            .insert_staff(&NewStaff::new("Jin", "Park", "Clerk", "jpark3", "june"))
            .is_err());
    }

    #[test]
    fn test_missing_member_is_not_found() {
        let db = db();
        let err = db.get_member(MemberId::new(999)).unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "member", .. }));
    }
}
