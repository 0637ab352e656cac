//! Integration tests for the checked booking insert and the availability
//! queries built on the conflict predicate.

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use rentfleet_core::booking::BookingWindow;
use rentfleet_core::roles::Role;
use rentfleet_core::status::{BookingStatus, MachineStatus};
use rentfleet_core::types::{DbId, Timestamp};
use rentfleet_db::models::booking::CreateBooking;
use rentfleet_db::models::machine::CreateMachine;
use rentfleet_db::models::user::CreateUser;
use rentfleet_db::repositories::{BookingInsert, BookingRepo, MachineRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(day: u32, hour: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2031, 1, day, hour, 0, 0).unwrap()
}

fn window(day: u32, from: u32, to: u32) -> BookingWindow {
    BookingWindow::new(at(day, from), at(day, to)).unwrap()
}

async fn customer(pool: &PgPool, name: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            role: Role::Customer,
        },
    )
    .await
    .unwrap()
    .id
}

async fn machine(pool: &PgPool, model: &str) -> DbId {
    MachineRepo::create(
        pool,
        &CreateMachine {
            model: model.to_string(),
            serial_number: None,
            manufacturer: None,
            year_of_manufacture: Some(2020),
            location: Some("Yard A".to_string()),
            description: None,
            hourly_rate_cents: Some(10_000),
            status: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn booking(customer_id: DbId, machine_id: DbId, w: BookingWindow) -> CreateBooking {
    CreateBooking {
        customer_id,
        machine_id,
        window: w,
        total_cost_cents: None,
        notes: None,
    }
}

async fn insert(pool: &PgPool, input: &CreateBooking) -> BookingInsert {
    BookingRepo::create_checked(pool, input).await.unwrap()
}

// ---------------------------------------------------------------------------
// Checked insert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_overlapping_booking_rejected(pool: PgPool) {
    let c = customer(&pool, "alice").await;
    let m = machine(&pool, "3CX").await;

    let first = insert(&pool, &booking(c, m, window(10, 10, 12))).await;
    let first = assert_matches!(first, BookingInsert::Created(b) => b);
    assert_eq!(first.status, BookingStatus::Pending);

    let second = insert(&pool, &booking(c, m, window(10, 11, 13))).await;
    assert_matches!(second, BookingInsert::Conflict(existing) if existing.id == first.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_touching_windows_conflict(pool: PgPool) {
    let c = customer(&pool, "alice").await;
    let m = machine(&pool, "3CX").await;

    assert_matches!(insert(&pool, &booking(c, m, window(10, 10, 12))).await, BookingInsert::Created(_));
    assert_matches!(
        insert(&pool, &booking(c, m, window(10, 12, 14))).await,
        BookingInsert::Conflict(_)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_other_machine_or_disjoint_window_allowed(pool: PgPool) {
    let c = customer(&pool, "alice").await;
    let m1 = machine(&pool, "3CX").await;
    let m2 = machine(&pool, "JS220").await;

    assert_matches!(insert(&pool, &booking(c, m1, window(10, 9, 17))).await, BookingInsert::Created(_));
    assert_matches!(insert(&pool, &booking(c, m2, window(10, 9, 17))).await, BookingInsert::Created(_));
    assert_matches!(insert(&pool, &booking(c, m1, window(11, 9, 17))).await, BookingInsert::Created(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancelled_booking_frees_window(pool: PgPool) {
    let c = customer(&pool, "alice").await;
    let m = machine(&pool, "3CX").await;

    let first = assert_matches!(
        insert(&pool, &booking(c, m, window(10, 9, 17))).await,
        BookingInsert::Created(b) => b
    );
    BookingRepo::update_status(&pool, first.id, BookingStatus::Cancelled)
        .await
        .unwrap()
        .unwrap();

    assert_matches!(insert(&pool, &booking(c, m, window(10, 9, 17))).await, BookingInsert::Created(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_machine_reported(pool: PgPool) {
    let c = customer(&pool, "alice").await;
    assert_matches!(
        insert(&pool, &booking(c, 9_999, window(10, 9, 17))).await,
        BookingInsert::MachineNotFound
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_has_conflict_excludes_self(pool: PgPool) {
    let c = customer(&pool, "alice").await;
    let m = machine(&pool, "3CX").await;
    let w = window(10, 9, 17);
    let b = assert_matches!(insert(&pool, &booking(c, m, w)).await, BookingInsert::Created(b) => b);

    assert!(BookingRepo::has_conflict(&pool, m, &w, None).await.unwrap());
    assert!(!BookingRepo::has_conflict(&pool, m, &w, Some(b.id)).await.unwrap());
}

/// Reactivating a cancelled booking into an occupied window trips the
/// exclusion constraint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_exclusion_constraint_backstops_direct_writes(pool: PgPool) {
    let c = customer(&pool, "alice").await;
    let m = machine(&pool, "3CX").await;

    let old = assert_matches!(
        insert(&pool, &booking(c, m, window(10, 9, 17))).await,
        BookingInsert::Created(b) => b
    );
    BookingRepo::update_status(&pool, old.id, BookingStatus::Cancelled).await.unwrap();
    assert_matches!(insert(&pool, &booking(c, m, window(10, 12, 18))).await, BookingInsert::Created(_));

    let err = BookingRepo::update_status(&pool, old.id, BookingStatus::Pending)
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23P01"));
    assert_eq!(db_err.constraint(), Some("excl_bookings_machine_window"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_inserts_admit_exactly_one(pool: PgPool) {
    let c = customer(&pool, "alice").await;
    let m = machine(&pool, "3CX").await;

    let a = booking(c, m, window(10, 9, 17));
    let b = booking(c, m, window(10, 12, 20));
    let (ra, rb) = tokio::join!(
        BookingRepo::create_checked(&pool, &a),
        BookingRepo::create_checked(&pool, &b),
    );

    let created = [ra.unwrap(), rb.unwrap()]
        .iter()
        .filter(|r| matches!(r, BookingInsert::Created(_)))
        .count();
    assert_eq!(created, 1);
}

// ---------------------------------------------------------------------------
// Availability queries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_book_then_cancel_availability(pool: PgPool) {
    let c = customer(&pool, "alice").await;
    let m = machine(&pool, "3CX").await;
    let lookahead = BookingWindow::new(at(1, 0), at(1, 0) + Duration::days(365)).unwrap();

    let ids = |ms: Vec<rentfleet_db::models::machine::Machine>| -> Vec<DbId> {
        ms.into_iter().map(|m| m.id).collect()
    };

    assert_eq!(ids(MachineRepo::list_available(&pool, &lookahead).await.unwrap()), vec![m]);

    let b = assert_matches!(
        insert(&pool, &booking(c, m, window(10, 9, 17))).await,
        BookingInsert::Created(b) => b
    );
    assert!(MachineRepo::list_available(&pool, &lookahead).await.unwrap().is_empty());
    assert_eq!(ids(MachineRepo::list_booked(&pool, &lookahead).await.unwrap()), vec![m]);
    assert_eq!(MachineRepo::count_available(&pool, &lookahead).await.unwrap(), 0);

    BookingRepo::update_status(&pool, b.id, BookingStatus::Cancelled).await.unwrap();
    assert_eq!(ids(MachineRepo::list_available(&pool, &lookahead).await.unwrap()), vec![m]);
    assert!(MachineRepo::list_booked(&pool, &lookahead).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_change_drives_availability_flag(pool: PgPool) {
    let m = machine(&pool, "3CX").await;

    let updated = MachineRepo::update_status(&pool, m, MachineStatus::OutOfService)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, MachineStatus::OutOfService);
    assert!(!updated.availability);

    let updated = MachineRepo::update_status(&pool, m, MachineStatus::Available)
        .await
        .unwrap()
        .unwrap();
    assert!(updated.availability);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_machine_with_bookings_cannot_be_deleted(pool: PgPool) {
    let c = customer(&pool, "alice").await;
    let m = machine(&pool, "3CX").await;
    insert(&pool, &booking(c, m, window(10, 9, 17))).await;

    assert_eq!(MachineRepo::count_bookings(&pool, m).await.unwrap(), 1);
    let err = MachineRepo::delete(&pool, m).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23503"));
}
