use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::StaffId;

/// A staff member who handles circulation desk operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub first_name: String,
    pub last_name: String,

    /// Job title ("Librarian", "Circulation Clerk", ...).
    pub position: String,

    /// Login name, unique.
    pub username: String,

    /// Hashed credential; never the plain password.
    pub password_hash: Option<String>,

    /// Unique; must contain "@" and ".".
    pub email: String,

    pub hire_date: Option<NaiveDate>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a staff member. New staff start active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStaff {
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub username: String,
    pub password_hash: Option<String>,
    pub email: String,
    pub hire_date: Option<NaiveDate>,
}

impl NewStaff {
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        position: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            position: position.into(),
            username: username.into(),
            password_hash: None,
            email: email.into(),
            hire_date: None,
        }
    }

    #[must_use]
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    #[must_use]
    pub const fn with_hire_date(mut self, date: NaiveDate) -> Self {
        self.hire_date = Some(date);
        self
    }
}
