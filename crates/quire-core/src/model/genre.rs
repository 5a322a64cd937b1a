use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::GenreId;

/// A genre classification, linked to books through a junction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,

    /// Display name, unique across the catalog.
    pub name: String,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGenre {
    pub name: String,
    pub description: Option<String>,
}

impl NewGenre {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_genre() {
        let genre = NewGenre::new("Speculative Fiction");
        assert_eq!(genre.name, "Speculative Fiction");
        assert!(genre.description.is_none());
    }
}
