//! Maintenance lifecycle rules.
//!
//! A machine is in maintenance while at least one of its records is open
//! (no end date, or an end date still in the future). Opening a repair moves
//! the machine to MAINTENANCE; closing the last open record returns it to
//! AVAILABLE.

use chrono::Duration;

use crate::error::CoreError;
use crate::status::MachineStatus;
use crate::types::Timestamp;

/// How far in the past a repair start may be, to absorb form-submission lag.
pub const START_GRACE_SECS: i64 = 60;

/// Machine status plus availability flag, written together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineState {
    pub status: MachineStatus,
    pub availability: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenancePhase {
    NotInMaintenance,
    InMaintenance,
}

pub fn phase(open_records: i64) -> MaintenancePhase {
    if open_records > 0 {
        MaintenancePhase::InMaintenance
    } else {
        MaintenancePhase::NotInMaintenance
    }
}

pub fn is_open(end: Option<Timestamp>, now: Timestamp) -> bool {
    match end {
        None => true,
        Some(end) => end >= now,
    }
}

/// Validate the dates of a new repair and return `(start, expected_end)`.
pub fn validate_repair_window(
    start: Option<Timestamp>,
    expected_end: Option<Timestamp>,
    now: Timestamp,
) -> Result<(Timestamp, Timestamp), CoreError> {
    let (Some(start), Some(end)) = (start, expected_end) else {
        return Err(CoreError::Validation(
            "Start date and expected end date are required".into(),
        ));
    };
    if end < start {
        return Err(CoreError::Validation(
            "Expected end date cannot be before start date".into(),
        ));
    }
    if start < now - Duration::seconds(START_GRACE_SECS) {
        return Err(CoreError::Validation(
            "Start date cannot be in the past".into(),
        ));
    }
    Ok((start, end))
}

/// Machine state after a repair is opened on it.
pub fn on_repair_opened() -> MachineState {
    MachineState {
        status: MachineStatus::Maintenance,
        availability: false,
    }
}

/// Machine state after a record is completed, given how many open records
/// remain. `None` leaves the machine untouched.
pub fn on_repair_completed(remaining_open: i64) -> Option<MachineState> {
    match phase(remaining_open) {
        MaintenancePhase::NotInMaintenance => Some(MachineState {
            status: MachineStatus::Available,
            availability: true,
        }),
        MaintenancePhase::InMaintenance => None,
    }
}

/// Only completed records (end date set and not in the future) may be deleted.
pub fn ensure_deletable(end: Option<Timestamp>, now: Timestamp) -> Result<(), CoreError> {
    match end {
        Some(end) if end <= now => Ok(()),
        _ => Err(CoreError::Validation(
            "Only completed maintenance records can be deleted. Mark the record as completed first."
                .into(),
        )),
    }
}
