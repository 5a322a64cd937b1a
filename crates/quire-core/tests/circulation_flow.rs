//! End-to-end circulation flow against an on-disk database.

use chrono::NaiveDate;
use quire_core::model::{
    BorrowingStatus, MembershipStatus, NewBook, NewMember, NewPublisher, NewStaff,
};
use quire_core::schema::Database;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_full_checkout_flow() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("library.db");
    let mut db = Database::open(&db_path).expect("Failed to open database");

    // Publisher with a valid contact email
    let publisher_id = db
        .insert_publisher(&NewPublisher::new("Acme Press").with_email("contact@acmepress.com"))
        .unwrap();

    // A 13-character ISBN referencing the publisher, five copies on hand
    let book_id = db
        .insert_book(
            &NewBook::new("9780441007318", "The Left Hand of Darkness")
                .with_publisher(publisher_id)
                .with_stock(5),
        )
        .unwrap();

    let member_id = db
        .insert_member(&NewMember::new(
            "LIB-000451",
            "Ada",
            "Okafor",
            "ada.okafor@example.org",
            date(2024, 1, 1),
            date(2025, 1, 1),
        ))
        .unwrap();
    assert_eq!(
        db.get_member(member_id).unwrap().membership_status,
        MembershipStatus::Active
    );

    let staff_id = db
        .insert_staff(&NewStaff::new(
            "June",
            "Park",
            "Circulation Clerk",
            "jpark",
            "june.park@library.example.org",
        ))
        .unwrap();

    let borrowing_id = db
        .borrow_book(book_id, member_id, staff_id, date(2024, 6, 1), date(2024, 6, 15))
        .unwrap();

    // The row is readable and took the default status
    let borrowing = db.get_borrowing(borrowing_id).unwrap();
    assert_eq!(borrowing.status, BorrowingStatus::Borrowed);
    assert_eq!(borrowing.book_id, book_id);
    assert_eq!(borrowing.member_id, member_id);
    assert_eq!(borrowing.staff_id, staff_id);
    assert_eq!(db.get_book(book_id).unwrap().available_quantity, 4);

    let stats = db.stats().unwrap();
    assert_eq!(stats.books, 1);
    assert_eq!(stats.members, 1);
    assert_eq!(stats.open_borrowings, 1);

    // Return the copy and verify the counts settle
    db.return_book(borrowing_id, date(2024, 6, 10), 0.0).unwrap();
    assert_eq!(db.get_book(book_id).unwrap().available_quantity, 5);
    assert_eq!(db.stats().unwrap().open_borrowings, 0);
}

#[test]
fn test_reopening_preserves_data() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("library.db");

    {
        let db = Database::open(&db_path).unwrap();
        db.insert_publisher(&NewPublisher::new("Acme Press")).unwrap();
    }

    let db = Database::open(&db_path).unwrap();
    let publishers = db.list_publishers().unwrap();
    assert_eq!(publishers.len(), 1);
    assert_eq!(publishers[0].name, "Acme Press");
}
