use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::MemberId;

/// Membership lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MembershipStatus {
    Active,
    Expired,
    Suspended,
}

impl MembershipStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expired => "Expired",
            Self::Suspended => "Suspended",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Self::Active),
            "Expired" => Some(Self::Expired),
            "Suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for MembershipStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MembershipStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Self::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown membership status: {s}").into()))
    }
}

/// A registered library member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,

    /// Printed card number, unique per member.
    pub library_card_number: String,

    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,

    /// Unique; must contain "@" and ".".
    pub email: String,

    pub registration_date: NaiveDate,

    /// Never earlier than `registration_date`.
    pub expiry_date: NaiveDate,

    pub membership_status: MembershipStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a member. New members start `Active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMember {
    pub library_card_number: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub registration_date: NaiveDate,
    pub expiry_date: NaiveDate,
}

impl NewMember {
    #[must_use]
    pub fn new(
        library_card_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        registration_date: NaiveDate,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            library_card_number: library_card_number.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth: None,
            address: None,
            phone: None,
            email: email.into(),
            registration_date,
            expiry_date,
        }
    }

    #[must_use]
    pub const fn with_date_of_birth(mut self, date: NaiveDate) -> Self {
        self.date_of_birth = Some(date);
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_status_round_trip() {
        for status in [
            MembershipStatus::Active,
            MembershipStatus::Expired,
            MembershipStatus::Suspended,
        ] {
            assert_eq!(MembershipStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(MembershipStatus::parse("Revoked"), None);
    }

    #[test]
    fn test_new_member() {
        let member = NewMember::new(
            "LIB-000451",
            "Ada",
            "Okafor",
            "ada.okafor@example.org",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .with_phone("+1-555-0199");

        assert_eq!(member.library_card_number, "LIB-000451");
        assert_eq!(member.phone, Some("+1-555-0199".to_string()));
        assert!(member.date_of_birth.is_none());
    }
}
