//! Repository for the `maintenance_records` table.
//!
//! Opening and completing a repair also rewrites the machine's status, so
//! both run in a transaction holding the machine row lock.

use rentfleet_core::maintenance::{is_open, on_repair_completed, on_repair_opened};
use rentfleet_core::status::MachineStatus;
use rentfleet_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::models::maintenance::{
    CreateMaintenanceRecord, MachineMaintenanceStatus, MaintenanceRecord,
};
use crate::repositories::MachineRepo;

const COLUMNS: &str = "id, machine_id, description, start_at, end_at, next_due_at, created_by, \
                        created_at, updated_at";

/// Result of completing a maintenance record.
#[derive(Debug, Serialize)]
pub struct RepairCompletion {
    pub record: MaintenanceRecord,
    /// Other records on the same machine still open after this one closed.
    pub remaining_open: i64,
    /// Whether the machine was returned to AVAILABLE.
    pub machine_released: bool,
}

/// Outcome of [`MaintenanceRepo::complete`].
#[derive(Debug)]
pub enum CompletionOutcome {
    Completed(RepairCompletion),
    /// The record was already closed; nothing was changed.
    AlreadyCompleted(MaintenanceRecord),
    NotFound,
}

pub struct MaintenanceRepo;

impl MaintenanceRepo {
    /// Open a repair: put the machine into MAINTENANCE and insert the record.
    ///
    /// Returns `None` if the machine does not exist.
    pub async fn open_repair(
        pool: &PgPool,
        input: &CreateMaintenanceRecord,
    ) -> Result<Option<MaintenanceRecord>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !MachineRepo::lock(&mut *tx, input.machine_id).await? {
            return Ok(None);
        }
        MachineRepo::set_state(&mut *tx, input.machine_id, on_repair_opened()).await?;

        let query = format!(
            "INSERT INTO maintenance_records
                (machine_id, description, start_at, end_at, next_due_at, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(input.machine_id)
            .bind(&input.description)
            .bind(input.start_at)
            .bind(input.end_at)
            .bind(input.next_due_at)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    /// Close a record at `now`. If it was the machine's last open record the
    /// machine goes back to AVAILABLE.
    ///
    /// A record that is already closed is left untouched, so a repeated call
    /// cannot move its end date or override a later machine status.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        now: Timestamp,
    ) -> Result<CompletionOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let machine_id: Option<(DbId,)> =
            sqlx::query_as("SELECT machine_id FROM maintenance_records WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((machine_id,)) = machine_id else {
            return Ok(CompletionOutcome::NotFound);
        };
        MachineRepo::lock(&mut *tx, machine_id).await?;

        let query = format!("SELECT {COLUMNS} FROM maintenance_records WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(CompletionOutcome::NotFound);
        };
        if !is_open(current.end_at, now) {
            return Ok(CompletionOutcome::AlreadyCompleted(current));
        }

        let query = format!(
            "UPDATE maintenance_records SET end_at = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(id)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        let remaining_open = Self::count_open(&mut *tx, machine_id, Some(id), now).await?;
        let next_state = on_repair_completed(remaining_open);
        if let Some(state) = next_state {
            MachineRepo::set_state(&mut *tx, machine_id, state).await?;
        }

        tx.commit().await?;
        Ok(CompletionOutcome::Completed(RepairCompletion {
            record,
            remaining_open,
            machine_released: next_state.is_some(),
        }))
    }

    /// Count open records (no end, or end at or after `now`) for a machine.
    pub async fn count_open(
        conn: &mut PgConnection,
        machine_id: DbId,
        exclude: Option<DbId>,
        now: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM maintenance_records
             WHERE machine_id = $1
               AND ($2::BIGINT IS NULL OR id <> $2)
               AND (end_at IS NULL OR end_at >= $3)",
        )
        .bind(machine_id)
        .bind(exclude)
        .bind(now)
        .fetch_one(conn)
        .await?;
        Ok(count)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MaintenanceRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_records WHERE id = $1");
        sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List records, newest start first, optionally for one machine.
    pub async fn list(
        pool: &PgPool,
        machine_id: Option<DbId>,
    ) -> Result<Vec<MaintenanceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_records
             WHERE ($1::BIGINT IS NULL OR machine_id = $1)
             ORDER BY start_at DESC, id DESC"
        );
        sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(machine_id)
            .fetch_all(pool)
            .await
    }

    /// Per-machine open/total record counts for every machine.
    pub async fn status_overview(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<MachineMaintenanceStatus>, sqlx::Error> {
        sqlx::query_as::<_, MachineMaintenanceStatus>(
            "SELECT m.id AS machine_id, m.model, m.status_id, m.availability,
                    COUNT(r.id) FILTER (WHERE r.end_at IS NULL OR r.end_at >= $1) AS open_records,
                    COUNT(r.id) AS total_records
             FROM machines m
             LEFT JOIN maintenance_records r ON r.machine_id = m.id
             GROUP BY m.id
             ORDER BY (m.status_id = $2) DESC, m.id ASC",
        )
        .bind(now)
        .bind(MachineStatus::Maintenance.id())
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM maintenance_records WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
