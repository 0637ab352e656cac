//! Repository for the `bookings` table.
//!
//! [`BookingRepo::create_checked`] is the only way bookings are inserted: it
//! locks the machine row, runs the conflict query and inserts inside one
//! transaction. The `excl_bookings_machine_window` exclusion constraint
//! backs this up for writers that bypass the lock.

use rentfleet_core::booking::BookingWindow;
use rentfleet_core::status::BookingStatus;
use rentfleet_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::booking::{Booking, CreateBooking};
use crate::repositories::MachineRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, customer_id, machine_id, start_at, end_at, status_id, total_cost_cents, \
                        notes, payment_verified, payment_verified_at, created_at, updated_at";

/// Outcome of a checked booking insert.
#[derive(Debug)]
pub enum BookingInsert {
    Created(Booking),
    MachineNotFound,
    /// An existing non-cancelled booking overlaps the requested window.
    Conflict(Booking),
}

pub struct BookingRepo;

impl BookingRepo {
    /// Insert a PENDING booking unless it would overlap another active
    /// booking on the same machine.
    pub async fn create_checked(
        pool: &PgPool,
        input: &CreateBooking,
    ) -> Result<BookingInsert, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !MachineRepo::lock(&mut *tx, input.machine_id).await? {
            return Ok(BookingInsert::MachineNotFound);
        }

        if let Some(existing) =
            Self::find_conflict(&mut *tx, input.machine_id, &input.window, None).await?
        {
            return Ok(BookingInsert::Conflict(existing));
        }

        let query = format!(
            "INSERT INTO bookings
                (customer_id, machine_id, start_at, end_at, status_id, total_cost_cents, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(input.customer_id)
            .bind(input.machine_id)
            .bind(input.window.start)
            .bind(input.window.end)
            .bind(BookingStatus::Pending.id())
            .bind(input.total_cost_cents)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(BookingInsert::Created(booking))
    }

    /// First non-cancelled booking on `machine_id` overlapping `window`
    /// (inclusive), skipping `exclude`.
    pub async fn find_conflict(
        conn: &mut PgConnection,
        machine_id: DbId,
        window: &BookingWindow,
        exclude: Option<DbId>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE machine_id = $1
               AND status_id <> $2
               AND start_at <= $4
               AND end_at >= $3
               AND ($5::BIGINT IS NULL OR id <> $5)
             ORDER BY start_at ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(machine_id)
            .bind(BookingStatus::Cancelled.id())
            .bind(window.start)
            .bind(window.end)
            .bind(exclude)
            .fetch_optional(conn)
            .await
    }

    /// Pool-level convenience over [`find_conflict`](Self::find_conflict).
    pub async fn has_conflict(
        pool: &PgPool,
        machine_id: DbId,
        window: &BookingWindow,
        exclude: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Ok(Self::find_conflict(&mut *conn, machine_id, window, exclude)
            .await?
            .is_some())
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A customer's bookings, newest first.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE customer_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// All bookings, optionally filtered by status, newest first.
    pub async fn list(
        pool: &PgPool,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE ($1::SMALLINT IS NULL OR status_id = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(status.map(BookingStatus::id))
            .fetch_all(pool)
            .await
    }

    /// Active bookings on a machine overlapping `window`, earliest first.
    pub async fn list_active_for_machine(
        pool: &PgPool,
        machine_id: DbId,
        window: &BookingWindow,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE machine_id = $1
               AND status_id <> $2
               AND start_at <= $4
               AND end_at >= $3
             ORDER BY start_at ASC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(machine_id)
            .bind(BookingStatus::Cancelled.id())
            .bind(window.start)
            .bind(window.end)
            .fetch_all(pool)
            .await
    }

    /// Set a booking's status. Returns `None` if the booking does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_optional(pool)
            .await
    }

    /// Mark a booking's payment as verified.
    pub async fn mark_payment_verified(
        conn: &mut PgConnection,
        id: DbId,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bookings SET payment_verified = true, payment_verified_at = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
