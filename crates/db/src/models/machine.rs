//! Machine (inventory) entity model and DTOs.

use rentfleet_core::status::MachineStatus;
use rentfleet_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `machines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Machine {
    pub id: DbId,
    pub model: String,
    pub serial_number: Option<String>,
    pub manufacturer: String,
    pub year_of_manufacture: Option<i32>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub hourly_rate_cents: Option<Cents>,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: MachineStatus,
    pub availability: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a machine to the inventory.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMachine {
    #[validate(length(min = 1, max = 200, message = "Model is required"))]
    pub model: String,
    pub serial_number: Option<String>,
    /// Defaults to `JCB` when omitted.
    pub manufacturer: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year_of_manufacture: Option<i32>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Hourly rate cannot be negative"))]
    pub hourly_rate_cents: Option<Cents>,
    /// Defaults to `available`.
    pub status: Option<MachineStatus>,
}

/// DTO for editing machine details. Status has its own endpoint so that the
/// availability flag stays in step with it.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMachine {
    #[validate(length(min = 1, max = 200))]
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year_of_manufacture: Option<i32>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub hourly_rate_cents: Option<Cents>,
}

/// Resolved availability of a single machine.
#[derive(Debug, Clone, Serialize)]
pub struct MachineAvailability {
    pub machine_id: DbId,
    pub available: bool,
    pub status: MachineStatus,
    pub availability_flag: bool,
    pub has_conflicting_booking: bool,
    pub window_start: Timestamp,
    pub window_end: Timestamp,
}
