//! Maintenance record model and DTOs.

use rentfleet_core::status::MachineStatus;
use rentfleet_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `maintenance_records` table.
///
/// `end_at` holds the expected end while the repair is running and the
/// actual completion time once it is closed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceRecord {
    pub id: DbId,
    pub machine_id: DbId,
    pub description: String,
    pub start_at: Timestamp,
    pub end_at: Option<Timestamp>,
    pub next_due_at: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateMaintenanceRecord {
    pub machine_id: DbId,
    pub description: String,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub next_due_at: Option<Timestamp>,
    pub created_by: DbId,
}

/// Per-machine maintenance summary for the supervisor overview.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MachineMaintenanceStatus {
    pub machine_id: DbId,
    pub model: String,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: MachineStatus,
    pub availability: bool,
    pub open_records: i64,
    pub total_records: i64,
}
