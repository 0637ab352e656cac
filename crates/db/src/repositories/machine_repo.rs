//! Repository for the `machines` table, including the availability queries.
//!
//! The availability predicates here mirror `rentfleet_core::availability`:
//! status AVAILABLE, flag set, and no non-cancelled booking overlapping the
//! lookahead window (inclusive bounds).

use rentfleet_core::availability::availability_flag_for;
use rentfleet_core::booking::BookingWindow;
use rentfleet_core::maintenance::MachineState;
use rentfleet_core::status::{BookingStatus, MachineStatus};
use rentfleet_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::machine::{CreateMachine, Machine, UpdateMachine};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, model, serial_number, manufacturer, year_of_manufacture, location, \
                        description, hourly_rate_cents, status_id, availability, created_at, updated_at";

/// Correlated `EXISTS` for a non-cancelled booking on the outer machine row
/// overlapping `[start, end]`.
fn active_booking_exists(start: &str, end: &str, cancelled: &str) -> String {
    format!(
        "EXISTS (
            SELECT 1 FROM bookings b
            WHERE b.machine_id = machines.id
              AND b.status_id <> {cancelled}
              AND b.start_at <= {end}
              AND b.end_at >= {start}
         )"
    )
}

pub struct MachineRepo;

impl MachineRepo {
    pub async fn create(pool: &PgPool, input: &CreateMachine) -> Result<Machine, sqlx::Error> {
        let status = input.status.unwrap_or(MachineStatus::Available);
        let query = format!(
            "INSERT INTO machines
                (model, serial_number, manufacturer, year_of_manufacture, location,
                 description, hourly_rate_cents, status_id, availability)
             VALUES ($1, $2, COALESCE($3, 'JCB'), $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(&input.model)
            .bind(&input.serial_number)
            .bind(&input.manufacturer)
            .bind(input.year_of_manufacture)
            .bind(&input.location)
            .bind(&input.description)
            .bind(input.hourly_rate_cents)
            .bind(status.id())
            .bind(availability_flag_for(status))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Machine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM machines WHERE id = $1");
        sqlx::query_as::<_, Machine>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List machines, optionally restricted to one status, ordered by id.
    pub async fn list(
        pool: &PgPool,
        status: Option<MachineStatus>,
    ) -> Result<Vec<Machine>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM machines
             WHERE ($1::SMALLINT IS NULL OR status_id = $1)
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(status.map(MachineStatus::id))
            .fetch_all(pool)
            .await
    }

    /// Machines that can be booked right now: status AVAILABLE, flag set, and
    /// no active booking inside `window`.
    pub async fn list_available(
        pool: &PgPool,
        window: &BookingWindow,
    ) -> Result<Vec<Machine>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM machines
             WHERE status_id = $1
               AND availability = true
               AND NOT {}
             ORDER BY id ASC",
            active_booking_exists("$2", "$3", "$4")
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(MachineStatus::Available.id())
            .bind(window.start)
            .bind(window.end)
            .bind(BookingStatus::Cancelled.id())
            .fetch_all(pool)
            .await
    }

    /// Machines marked BOOKED or holding an active booking inside `window`.
    pub async fn list_booked(
        pool: &PgPool,
        window: &BookingWindow,
    ) -> Result<Vec<Machine>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM machines
             WHERE status_id = $1
                OR {}
             ORDER BY id ASC",
            active_booking_exists("$2", "$3", "$4")
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(MachineStatus::Booked.id())
            .bind(window.start)
            .bind(window.end)
            .bind(BookingStatus::Cancelled.id())
            .fetch_all(pool)
            .await
    }

    /// Machines in MAINTENANCE that have no maintenance record at all.
    pub async fn list_needing_attention(pool: &PgPool) -> Result<Vec<Machine>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM machines
             WHERE status_id = $1
               AND NOT EXISTS (
                   SELECT 1 FROM maintenance_records r WHERE r.machine_id = machines.id
               )
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(MachineStatus::Maintenance.id())
            .fetch_all(pool)
            .await
    }

    /// Count machines that [`list_available`](Self::list_available) would return.
    pub async fn count_available(pool: &PgPool, window: &BookingWindow) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM machines
             WHERE status_id = $1
               AND availability = true
               AND NOT {}",
            active_booking_exists("$2", "$3", "$4")
        );
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(MachineStatus::Available.id())
            .bind(window.start)
            .bind(window.end)
            .bind(BookingStatus::Cancelled.id())
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMachine,
    ) -> Result<Option<Machine>, sqlx::Error> {
        let query = format!(
            "UPDATE machines SET
                model = COALESCE($2, model),
                serial_number = COALESCE($3, serial_number),
                manufacturer = COALESCE($4, manufacturer),
                year_of_manufacture = COALESCE($5, year_of_manufacture),
                location = COALESCE($6, location),
                description = COALESCE($7, description),
                hourly_rate_cents = COALESCE($8, hourly_rate_cents)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(id)
            .bind(&input.model)
            .bind(&input.serial_number)
            .bind(&input.manufacturer)
            .bind(input.year_of_manufacture)
            .bind(&input.location)
            .bind(&input.description)
            .bind(input.hourly_rate_cents)
            .fetch_optional(pool)
            .await
    }

    /// Explicitly set a machine's status. The availability flag follows it.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: MachineStatus,
    ) -> Result<Option<Machine>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::set_state(
            &mut *conn,
            id,
            MachineState {
                status,
                availability: availability_flag_for(status),
            },
        )
        .await
    }

    /// Write status and availability together on an existing connection or
    /// transaction.
    pub async fn set_state(
        conn: &mut PgConnection,
        id: DbId,
        state: MachineState,
    ) -> Result<Option<Machine>, sqlx::Error> {
        let query = format!(
            "UPDATE machines SET status_id = $2, availability = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(id)
            .bind(state.status.id())
            .bind(state.availability)
            .fetch_optional(conn)
            .await
    }

    /// Lock a machine row for the rest of the transaction. Returns `false`
    /// if the machine does not exist.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM machines WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row.is_some())
    }

    /// Number of bookings (any status) referencing the machine.
    pub async fn count_bookings(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE machine_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Delete a machine. Its maintenance records cascade; bookings block the
    /// delete at the foreign key.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM machines WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
