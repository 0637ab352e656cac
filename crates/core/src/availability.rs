//! Machine availability resolution.
//!
//! A machine is bookable only when its explicit status, its availability flag
//! and its booking calendar all agree. The calendar is checked over a
//! lookahead window starting now.

use chrono::Duration;

use crate::booking::{has_conflict, BookingWindow, ExistingBooking};
use crate::error::CoreError;
use crate::status::MachineStatus;
use crate::types::Timestamp;

/// Default lookahead for "no foreseeable booking", in days.
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 365;

/// Largest accepted lookahead, in days.
pub const MAX_LOOKAHEAD_DAYS: i64 = 3650;

/// The three signals availability is derived from.
#[derive(Debug, Clone, Copy)]
pub struct MachineSignals {
    pub status: MachineStatus,
    pub availability_flag: bool,
    pub has_conflicting_booking: bool,
}

/// The `[now, now + days]` window used to look for upcoming bookings.
///
/// Non-positive `days` collapse to a one-second window so the result is
/// always a valid interval; `days` above [`MAX_LOOKAHEAD_DAYS`] are capped.
pub fn lookahead_window(now: Timestamp, days: i64) -> BookingWindow {
    let end = if days > 0 {
        now + Duration::days(days.min(MAX_LOOKAHEAD_DAYS))
    } else {
        now + Duration::seconds(1)
    };
    BookingWindow { start: now, end }
}

/// Check a configured lookahead lies in `1..=MAX_LOOKAHEAD_DAYS`.
pub fn validate_lookahead_days(days: i64) -> Result<i64, CoreError> {
    if !(1..=MAX_LOOKAHEAD_DAYS).contains(&days) {
        return Err(CoreError::Validation(format!(
            "Lookahead must be between 1 and {MAX_LOOKAHEAD_DAYS} days, got {days}"
        )));
    }
    Ok(days)
}

pub fn is_available(signals: &MachineSignals) -> bool {
    signals.status == MachineStatus::Available
        && signals.availability_flag
        && !signals.has_conflicting_booking
}

/// Resolve availability from a machine's status, flag and booking list.
pub fn resolve(
    status: MachineStatus,
    availability_flag: bool,
    bookings: &[ExistingBooking],
    window: &BookingWindow,
) -> bool {
    is_available(&MachineSignals {
        status,
        availability_flag,
        has_conflicting_booking: has_conflict(bookings, window, None),
    })
}

/// The availability flag that goes with an explicitly set status.
pub fn availability_flag_for(status: MachineStatus) -> bool {
    status == MachineStatus::Available
}
