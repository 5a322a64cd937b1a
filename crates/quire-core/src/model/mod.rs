pub mod audit;
pub mod author;
pub mod book;
pub mod borrowing;
pub mod fine;
pub mod genre;
pub mod ids;
pub mod member;
pub mod publisher;
pub mod reservation;
pub mod staff;

pub use audit::{AuditAction, AuditEntry, NewAuditEntry};
pub use author::{Author, NewAuthor};
pub use book::{Book, BookCredit, NewBook};
pub use borrowing::{Borrowing, BorrowingStatus};
pub use fine::{Fine, FineStatus, NewFine};
pub use genre::{Genre, NewGenre};
pub use ids::{
    AuditEntryId, AuthorId, BookId, BorrowingId, FineId, GenreId, MemberId, PublisherId,
    ReservationId, StaffId,
};
pub use member::{Member, MembershipStatus, NewMember};
pub use publisher::{NewPublisher, Publisher};
pub use reservation::{Reservation, ReservationStatus};
pub use staff::{NewStaff, Staff};
