//! Core domain model and storage for quire.
//!
//! This crate defines the library catalog data model (publishers, authors,
//! genres, books and their junctions), the people and circulation records
//! (members, staff, borrowings, fines, reservations), the append-only audit
//! log, the SQLite schema that backs them, and the [`schema::Database`]
//! handle exposing the CRUD and circulation operations.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod schema;

pub use error::{Error, Result};
