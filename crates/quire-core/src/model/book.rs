use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::author::Author;
use crate::model::ids::{BookId, PublisherId};

/// A catalog book.
///
/// `available_quantity` counts copies currently on the shelf and is kept
/// between 0 and `stock_quantity`; the circulation operations maintain it
/// as borrowings open and close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,

    /// ISBN-10 or ISBN-13, unique, at least ten characters.
    pub isbn: String,

    pub title: String,
    pub publisher_id: Option<PublisherId>,
    pub publication_year: Option<i32>,
    pub shelf_location: Option<String>,

    /// Total copies owned by the library.
    pub stock_quantity: i64,

    /// Copies currently available for borrowing.
    pub available_quantity: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub publisher_id: Option<PublisherId>,
    pub publication_year: Option<i32>,
    pub shelf_location: Option<String>,
    pub stock_quantity: i64,
    pub available_quantity: i64,
}

impl NewBook {
    #[must_use]
    pub fn new(isbn: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            publisher_id: None,
            publication_year: None,
            shelf_location: None,
            stock_quantity: 0,
            available_quantity: 0,
        }
    }

    #[must_use]
    pub const fn with_publisher(mut self, publisher_id: PublisherId) -> Self {
        self.publisher_id = Some(publisher_id);
        self
    }

    #[must_use]
    pub const fn with_publication_year(mut self, year: i32) -> Self {
        self.publication_year = Some(year);
        self
    }

    #[must_use]
    pub fn with_shelf_location(mut self, location: impl Into<String>) -> Self {
        self.shelf_location = Some(location.into());
        self
    }

    /// Set the initial stock; all copies start available.
    #[must_use]
    pub const fn with_stock(mut self, copies: i64) -> Self {
        self.stock_quantity = copies;
        self.available_quantity = copies;
        self
    }
}

/// An author credit on a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookCredit {
    pub author: Author,

    /// Kind of contribution ("Author", "Editor", "Translator", ...).
    pub contribution_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book() {
        let book = NewBook::new("9780441007318", "The Left Hand of Darkness");
        assert_eq!(book.isbn, "9780441007318");
        assert_eq!(book.stock_quantity, 0);
        assert_eq!(book.available_quantity, 0);
    }

    #[test]
    fn test_new_book_builder() {
        let book = NewBook::new("9780441007318", "The Left Hand of Darkness")
            .with_publisher(PublisherId::new(1))
            .with_publication_year(1969)
            .with_shelf_location("SF-LEG-01")
            .with_stock(5);

        assert_eq!(book.publisher_id, Some(PublisherId::new(1)));
        assert_eq!(book.stock_quantity, 5);
        assert_eq!(book.available_quantity, 5);
    }
}
