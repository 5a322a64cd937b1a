use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::AuthorId;

/// A person credited on catalog books.
///
/// The (first_name, last_name) pair is unique across the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Author {
    /// Full display name, "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Insert payload for an author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
}

impl NewAuthor {
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date: None,
            nationality: None,
        }
    }

    #[must_use]
    pub const fn with_birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_nationality(mut self, nationality: impl Into<String>) -> Self {
        self.nationality = Some(nationality.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_author() {
        let author = NewAuthor::new("Ursula", "Le Guin");
        assert_eq!(author.first_name, "Ursula");
        assert_eq!(author.last_name, "Le Guin");
        assert!(author.birth_date.is_none());
    }

    #[test]
    fn test_new_author_builder() {
        let author = NewAuthor::new("Jorge Luis", "Borges")
            .with_birth_date(NaiveDate::from_ymd_opt(1899, 8, 24).unwrap())
            .with_nationality("Argentine");

        assert_eq!(author.nationality, Some("Argentine".to_string()));
    }
}
