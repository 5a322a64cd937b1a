//! CRUD operations for the catalog: publishers, authors, genres, books,
//! and the two junction tables linking books to authors and genres.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::error::{Error, Result};
use crate::model::{
    Author, AuthorId, Book, BookCredit, BookId, Genre, GenreId, NewAuthor, NewBook, NewGenre,
    NewPublisher, Publisher, PublisherId,
};

use super::db::Database;

// Publisher CRUD
impl Database {
    /// Insert a new publisher, returning its assigned id.
    pub fn insert_publisher(&self, publisher: &NewPublisher) -> Result<PublisherId> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO publishers (name, address, phone, email, established_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                publisher.name,
                publisher.address,
                publisher.phone,
                publisher.email,
                publisher.established_date,
                now,
            ],
        )?;
        Ok(PublisherId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_publisher(&self, id: PublisherId) -> Result<Publisher> {
        self.conn
            .query_row(
                "SELECT id, name, address, phone, email, established_date, created_at, updated_at
                 FROM publishers WHERE id = ?1",
                [id],
                row_to_publisher,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "publisher",
                id: id.to_string(),
            })
    }

    pub fn list_publishers(&self) -> Result<Vec<Publisher>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, address, phone, email, established_date, created_at, updated_at
             FROM publishers ORDER BY name",
        )?;
        let publishers = stmt
            .query_map([], row_to_publisher)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(publishers)
    }

    /// Update an existing publisher's attributes.
    pub fn update_publisher(&self, publisher: &Publisher) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE publishers SET
                name = ?2, address = ?3, phone = ?4, email = ?5,
                established_date = ?6, updated_at = ?7
             WHERE id = ?1",
            params![
                publisher.id,
                publisher.name,
                publisher.address,
                publisher.phone,
                publisher.email,
                publisher.established_date,
                Utc::now(),
            ],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "publisher",
                id: publisher.id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete a publisher. Fails with a foreign-key violation while any
    /// book still references it.
    pub fn delete_publisher(&self, id: PublisherId) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM publishers WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "publisher",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// Author CRUD
impl Database {
    /// Insert a new author. The (first_name, last_name) pair is unique;
    /// a duplicate fails with a constraint violation.
    pub fn insert_author(&self, author: &NewAuthor) -> Result<AuthorId> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO authors (first_name, last_name, birth_date, nationality, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                author.first_name,
                author.last_name,
                author.birth_date,
                author.nationality,
                now,
            ],
        )?;
        Ok(AuthorId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_author(&self, id: AuthorId) -> Result<Author> {
        self.conn
            .query_row(
                "SELECT id, first_name, last_name, birth_date, nationality, created_at, updated_at
                 FROM authors WHERE id = ?1",
                [id],
                row_to_author,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "author",
                id: id.to_string(),
            })
    }

    /// Look up an author by the unique (first, last) name pair.
    pub fn find_author_by_name(&self, first_name: &str, last_name: &str) -> Result<Option<Author>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, first_name, last_name, birth_date, nationality, created_at, updated_at
                 FROM authors WHERE first_name = ?1 AND last_name = ?2",
                params![first_name, last_name],
                row_to_author,
            )
            .optional()?)
    }

    pub fn list_authors(&self) -> Result<Vec<Author>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, last_name, birth_date, nationality, created_at, updated_at
             FROM authors ORDER BY last_name, first_name",
        )?;
        let authors = stmt
            .query_map([], row_to_author)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(authors)
    }

    pub fn update_author(&self, author: &Author) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE authors SET
                first_name = ?2, last_name = ?3, birth_date = ?4,
                nationality = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                author.id,
                author.first_name,
                author.last_name,
                author.birth_date,
                author.nationality,
                Utc::now(),
            ],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "author",
                id: author.id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete an author. Junction rows cascade; books themselves stay.
    pub fn delete_author(&self, id: AuthorId) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM authors WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "author",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// Genre CRUD
impl Database {
    /// Insert a new genre. Names are unique.
    pub fn insert_genre(&self, genre: &NewGenre) -> Result<GenreId> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO genres (name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            params![genre.name, genre.description, now],
        )?;
        Ok(GenreId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_genre(&self, id: GenreId) -> Result<Genre> {
        self.conn
            .query_row(
                "SELECT id, name, description, created_at, updated_at
                 FROM genres WHERE id = ?1",
                [id],
                row_to_genre,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "genre",
                id: id.to_string(),
            })
    }

    pub fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, description, created_at, updated_at
                 FROM genres WHERE name = ?1",
                [name],
                row_to_genre,
            )
            .optional()?)
    }

    pub fn list_genres(&self) -> Result<Vec<Genre>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, created_at, updated_at
             FROM genres ORDER BY name",
        )?;
        let genres = stmt
            .query_map([], row_to_genre)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(genres)
    }

    pub fn update_genre(&self, genre: &Genre) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE genres SET name = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
            params![genre.id, genre.name, genre.description, Utc::now()],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "genre",
                id: genre.id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete a genre. Junction rows cascade; books themselves stay.
    pub fn delete_genre(&self, id: GenreId) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM genres WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "genre",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// Book CRUD and junction management
impl Database {
    /// Insert a new book, returning its assigned id.
    pub fn insert_book(&self, book: &NewBook) -> Result<BookId> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO books (
                isbn, title, publisher_id, publication_year, shelf_location,
                stock_quantity, available_quantity, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                book.isbn,
                book.title,
                book.publisher_id,
                book.publication_year,
                book.shelf_location,
                book.stock_quantity,
                book.available_quantity,
                now,
            ],
        )?;
        Ok(BookId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_book(&self, id: BookId) -> Result<Book> {
        self.conn
            .query_row(
                "SELECT id, isbn, title, publisher_id, publication_year, shelf_location,
                        stock_quantity, available_quantity, created_at, updated_at
                 FROM books WHERE id = ?1",
                [id],
                row_to_book,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "book",
                id: id.to_string(),
            })
    }

    /// Look up a book by its unique ISBN.
    pub fn find_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, isbn, title, publisher_id, publication_year, shelf_location,
                        stock_quantity, available_quantity, created_at, updated_at
                 FROM books WHERE isbn = ?1",
                [isbn],
                row_to_book,
            )
            .optional()?)
    }

    pub fn list_books(&self) -> Result<Vec<Book>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, isbn, title, publisher_id, publication_year, shelf_location,
                    stock_quantity, available_quantity, created_at, updated_at
             FROM books ORDER BY title",
        )?;
        let books = stmt
            .query_map([], row_to_book)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(books)
    }

    /// Update an existing book's attributes, including its quantities.
    /// The stored invariant 0 <= available <= stock still applies.
    pub fn update_book(&self, book: &Book) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE books SET
                isbn = ?2, title = ?3, publisher_id = ?4, publication_year = ?5,
                shelf_location = ?6, stock_quantity = ?7, available_quantity = ?8,
                updated_at = ?9
             WHERE id = ?1",
            params![
                book.id,
                book.isbn,
                book.title,
                book.publisher_id,
                book.publication_year,
                book.shelf_location,
                book.stock_quantity,
                book.available_quantity,
                Utc::now(),
            ],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "book",
                id: book.id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete a book. Junction rows cascade; borrowings and reservations
    /// referencing the book block the delete.
    pub fn delete_book(&self, id: BookId) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM books WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "book",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Credit an author on a book. `None` contribution takes the schema
    /// default, "Author".
    pub fn add_book_author(
        &self,
        book_id: BookId,
        author_id: AuthorId,
        contribution_type: Option<&str>,
    ) -> Result<()> {
        match contribution_type {
            Some(kind) => self.conn.execute(
                "INSERT INTO book_authors (book_id, author_id, contribution_type)
                 VALUES (?1, ?2, ?3)",
                params![book_id, author_id, kind],
            )?,
            None => self.conn.execute(
                "INSERT INTO book_authors (book_id, author_id) VALUES (?1, ?2)",
                params![book_id, author_id],
            )?,
        };
        Ok(())
    }

    pub fn remove_book_author(&self, book_id: BookId, author_id: AuthorId) -> Result<()> {
        let affected = self.conn.execute(
            "DELETE FROM book_authors WHERE book_id = ?1 AND author_id = ?2",
            params![book_id, author_id],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "book-author link",
                id: format!("{book_id}/{author_id}"),
            });
        }
        Ok(())
    }

    /// All author credits on a book.
    pub fn authors_of(&self, book_id: BookId) -> Result<Vec<BookCredit>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.first_name, a.last_name, a.birth_date, a.nationality,
                    a.created_at, a.updated_at, ba.contribution_type
             FROM authors a
             JOIN book_authors ba ON ba.author_id = a.id
             WHERE ba.book_id = ?1
             ORDER BY a.last_name, a.first_name",
        )?;
        let credits = stmt
            .query_map([book_id], |row| {
                Ok(BookCredit {
                    author: row_to_author(row)?,
                    contribution_type: row.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(credits)
    }

    /// All books an author is credited on.
    pub fn books_by_author(&self, author_id: AuthorId) -> Result<Vec<Book>> {
        let mut stmt = self.conn.prepare(
            "SELECT b.id, b.isbn, b.title, b.publisher_id, b.publication_year,
                    b.shelf_location, b.stock_quantity, b.available_quantity,
                    b.created_at, b.updated_at
             FROM books b
             JOIN book_authors ba ON ba.book_id = b.id
             WHERE ba.author_id = ?1
             ORDER BY b.title",
        )?;
        let books = stmt
            .query_map([author_id], row_to_book)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(books)
    }

    pub fn add_book_genre(&self, book_id: BookId, genre_id: GenreId) -> Result<()> {
        self.conn.execute(
            "INSERT INTO book_genres (book_id, genre_id) VALUES (?1, ?2)",
            params![book_id, genre_id],
        )?;
        Ok(())
    }

    pub fn remove_book_genre(&self, book_id: BookId, genre_id: GenreId) -> Result<()> {
        let affected = self.conn.execute(
            "DELETE FROM book_genres WHERE book_id = ?1 AND genre_id = ?2",
            params![book_id, genre_id],
        )?;
        if affected == 0 {
            return Err(Error::NotFound {
                entity: "book-genre link",
                id: format!("{book_id}/{genre_id}"),
            });
        }
        Ok(())
    }

    /// All genres a book is classified under.
    pub fn genres_of(&self, book_id: BookId) -> Result<Vec<Genre>> {
        let mut stmt = self.conn.prepare(
            "SELECT g.id, g.name, g.description, g.created_at, g.updated_at
             FROM genres g
             JOIN book_genres bg ON bg.genre_id = g.id
             WHERE bg.book_id = ?1
             ORDER BY g.name",
        )?;
        let genres = stmt
            .query_map([book_id], row_to_genre)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(genres)
    }
}

fn row_to_publisher(row: &rusqlite::Row) -> rusqlite::Result<Publisher> {
    Ok(Publisher {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        established_date: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn row_to_author(row: &rusqlite::Row) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        birth_date: row.get(3)?,
        nationality: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn row_to_genre(row: &rusqlite::Row) -> rusqlite::Result<Genre> {
    Ok(Genre {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn row_to_book(row: &rusqlite::Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        isbn: row.get(1)?,
        title: row.get(2)?,
        publisher_id: row.get(3)?,
        publication_year: row.get(4)?,
        shelf_location: row.get(5)?,
        stock_quantity: row.get(6)?,
        available_quantity: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_publisher_round_trip() {
        let db = db();
        let id = db
            .insert_publisher(&NewPublisher::new("Acme Press").with_email("contact@acme.com"))
            .unwrap();

        let publisher = db.get_publisher(id).unwrap();
        assert_eq!(publisher.name, "Acme Press");
        assert_eq!(publisher.email, Some("contact@acme.com".to_string()));
    }

    #[test]
    fn test_publisher_email_must_be_well_formed() {
        let db = db();
        // Missing "@"
        assert!(db
            .insert_publisher(&NewPublisher::new("Bad").with_email("contact.acme.com"))
            .is_err());
        // Empty string
        assert!(db
            .insert_publisher(&NewPublisher::new("Bad").with_email(""))
            .is_err());
        // Missing "."
        assert!(db
            .insert_publisher(&NewPublisher::new("Bad").with_email("contact@acme"))
            .is_err());
    }

    #[test]
    fn test_publisher_update() {
        let db = db();
        let id = db.insert_publisher(&NewPublisher::new("Acme")).unwrap();
        let mut publisher = db.get_publisher(id).unwrap();
        publisher.phone = Some("+1-555-0100".to_string());
        db.update_publisher(&publisher).unwrap();

        assert_eq!(
            db.get_publisher(id).unwrap().phone,
            Some("+1-555-0100".to_string())
        );
    }

    #[test]
    fn test_duplicate_author_name_rejected() {
        let db = db();
        db.insert_author(&NewAuthor::new("Ursula", "Le Guin"))
            .unwrap();
        let err = db.insert_author(&NewAuthor::new("Ursula", "Le Guin"));
        assert!(err.is_err());
    }

    #[test]
    fn test_find_author_by_name() {
        let db = db();
        let id = db
            .insert_author(&NewAuthor::new("Jorge Luis", "Borges").with_nationality("Argentine"))
            .unwrap();

        let found = db.find_author_by_name("Jorge Luis", "Borges").unwrap();
        assert_eq!(found.map(|a| a.id), Some(id));
        assert!(db.find_author_by_name("J. L.", "Borges").unwrap().is_none());
    }

    #[test]
    fn test_genre_name_unique() {
        let db = db();
        db.insert_genre(&NewGenre::new("Poetry")).unwrap();
        assert!(db.insert_genre(&NewGenre::new("Poetry")).is_err());
    }

    #[test]
    fn test_book_isbn_rules() {
        let db = db();
        // Too short
        assert!(db.insert_book(&NewBook::new("123456789", "Short")).is_err());

        db.insert_book(&NewBook::new("9780441007318", "First"))
            .unwrap();
        // Duplicate ISBN
        assert!(db
            .insert_book(&NewBook::new("9780441007318", "Second"))
            .is_err());
    }

    #[test]
    fn test_available_quantity_bounded_by_stock() {
        let db = db();
        let mut book = NewBook::new("9780441007318", "Left Hand").with_stock(3);
        book.available_quantity = 4;
        assert!(db.insert_book(&book).is_err());

        book.available_quantity = -1;
        assert!(db.insert_book(&book).is_err());

        book.available_quantity = 3;
        let id = db.insert_book(&book).unwrap();

        // The same bound holds on update
        let mut stored = db.get_book(id).unwrap();
        stored.available_quantity = 5;
        assert!(db.update_book(&stored).is_err());
    }

    #[test]
    fn test_book_lookup_by_isbn() {
        let db = db();
        let id = db
            .insert_book(&NewBook::new("9780441007318", "Left Hand"))
            .unwrap();
        let found = db.find_book_by_isbn("9780441007318").unwrap();
        assert_eq!(found.map(|b| b.id), Some(id));
        assert!(db.find_book_by_isbn("9999999999").unwrap().is_none());
    }

    #[test]
    fn test_deleting_author_removes_only_junction_rows() {
        let db = db();
        let book_id = db
            .insert_book(&NewBook::new("9780441007318", "Left Hand"))
            .unwrap();
        let author_id = db.insert_author(&NewAuthor::new("Ursula", "Le Guin")).unwrap();
        db.add_book_author(book_id, author_id, None).unwrap();

        db.delete_author(author_id).unwrap();

        // Junction row is gone, book remains
        assert!(db.authors_of(book_id).unwrap().is_empty());
        assert_eq!(db.get_book(book_id).unwrap().title, "Left Hand");
    }

    #[test]
    fn test_deleting_genre_removes_only_junction_rows() {
        let db = db();
        let book_id = db
            .insert_book(&NewBook::new("9780441007318", "Left Hand"))
            .unwrap();
        let genre_id = db.insert_genre(&NewGenre::new("Science Fiction")).unwrap();
        db.add_book_genre(book_id, genre_id).unwrap();

        db.delete_genre(genre_id).unwrap();

        assert!(db.genres_of(book_id).unwrap().is_empty());
        assert!(db.get_book(book_id).is_ok());
    }

    #[test]
    fn test_deleting_book_cascades_junctions_both_ways() {
        let db = db();
        let book_id = db
            .insert_book(&NewBook::new("9780441007318", "Left Hand"))
            .unwrap();
        let author_id = db.insert_author(&NewAuthor::new("Ursula", "Le Guin")).unwrap();
        let genre_id = db.insert_genre(&NewGenre::new("Science Fiction")).unwrap();
        db.add_book_author(book_id, author_id, Some("Author")).unwrap();
        db.add_book_genre(book_id, genre_id).unwrap();

        db.delete_book(book_id).unwrap();

        // Authors and genres survive, with no dangling credits
        assert!(db.get_author(author_id).is_ok());
        assert!(db.get_genre(genre_id).is_ok());
        assert!(db.books_by_author(author_id).unwrap().is_empty());
    }

    #[test]
    fn test_publisher_delete_restricted_while_referenced() {
        let db = db();
        let publisher_id = db.insert_publisher(&NewPublisher::new("Acme")).unwrap();
        db.insert_book(&NewBook::new("9780441007318", "Left Hand").with_publisher(publisher_id))
            .unwrap();

        assert!(db.delete_publisher(publisher_id).is_err());
    }

    #[test]
    fn test_default_contribution_type() {
        let db = db();
        let book_id = db
            .insert_book(&NewBook::new("9780441007318", "Left Hand"))
            .unwrap();
        let author_id = db.insert_author(&NewAuthor::new("Ursula", "Le Guin")).unwrap();
        db.add_book_author(book_id, author_id, None).unwrap();

        let credits = db.authors_of(book_id).unwrap();
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].contribution_type, "Author");
    }

    #[test]
    fn test_explicit_contribution_type() {
        let db = db();
        let book_id = db
            .insert_book(&NewBook::new("9780156949606", "The Waves"))
            .unwrap();
        let author_id = db.insert_author(&NewAuthor::new("Jorge Luis", "Borges")).unwrap();
        db.add_book_author(book_id, author_id, Some("Translator"))
            .unwrap();

        let credits = db.authors_of(book_id).unwrap();
        assert_eq!(credits[0].contribution_type, "Translator");
    }
}
