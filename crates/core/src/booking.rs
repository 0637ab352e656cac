//! Booking windows, conflict detection and booking lifecycle guards.
//!
//! Overlap is inclusive at both ends: a booking ending at 12:00 conflicts
//! with one starting at 12:00 on the same machine. The database exclusion
//! constraint uses the matching `'[]'` range bounds.

use chrono::Duration;

use crate::error::CoreError;
use crate::status::BookingStatus;
use crate::types::{Cents, DbId, Timestamp};

/// A closed `[start, end]` time interval on a single machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl BookingWindow {
    /// Build a window, rejecting one whose end is not after its start.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, CoreError> {
        if end <= start {
            return Err(CoreError::Validation(
                "End date must be after start date".into(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Inclusive overlap test. Symmetric.
    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Number of whole hours in the window (partial hours are dropped).
    pub fn whole_hours(&self) -> i64 {
        self.duration().num_hours()
    }
}

/// The parts of an existing booking row that conflict detection needs.
#[derive(Debug, Clone, Copy)]
pub struct ExistingBooking {
    pub id: DbId,
    pub status: BookingStatus,
    pub window: BookingWindow,
}

/// Whether a booking in this status still holds its machine.
pub fn holds_machine(status: BookingStatus) -> bool {
    status != BookingStatus::Cancelled
}

/// Return the first non-cancelled booking overlapping `candidate`.
///
/// `exclude` skips the booking being re-validated so it does not conflict
/// with itself.
pub fn find_conflict<'a>(
    existing: &'a [ExistingBooking],
    candidate: &BookingWindow,
    exclude: Option<DbId>,
) -> Option<&'a ExistingBooking> {
    existing.iter().find(|b| {
        Some(b.id) != exclude && holds_machine(b.status) && b.window.overlaps(candidate)
    })
}

pub fn has_conflict(
    existing: &[ExistingBooking],
    candidate: &BookingWindow,
    exclude: Option<DbId>,
) -> bool {
    find_conflict(existing, candidate, exclude).is_some()
}

/// Validate a customer's requested window at creation time.
pub fn validate_new_booking(
    start: Timestamp,
    end: Timestamp,
    now: Timestamp,
) -> Result<BookingWindow, CoreError> {
    if start < now {
        return Err(CoreError::Validation(
            "Start date cannot be in the past".into(),
        ));
    }
    BookingWindow::new(start, end)
}

/// Total cost for a window: hourly rate times whole hours.
///
/// Returns `Ok(None)` when the machine has no hourly rate, and a validation
/// error when the total does not fit in [`Cents`].
pub fn total_cost_cents(
    hourly_rate_cents: Option<Cents>,
    window: &BookingWindow,
) -> Result<Option<Cents>, CoreError> {
    let Some(rate) = hourly_rate_cents else {
        return Ok(None);
    };
    rate.checked_mul(window.whole_hours())
        .map(Some)
        .ok_or_else(|| CoreError::Validation("Booking cost is too large".into()))
}

/// Reject the action unless `user_id` owns the booking.
pub fn ensure_owner(customer_id: DbId, user_id: DbId, action: &str) -> Result<(), CoreError> {
    if customer_id != user_id {
        return Err(CoreError::Forbidden(format!(
            "You can only {action} your own bookings"
        )));
    }
    Ok(())
}

pub fn ensure_cancellable(status: BookingStatus) -> Result<(), CoreError> {
    match status {
        BookingStatus::Completed | BookingStatus::Cancelled => Err(CoreError::Validation(
            format!("Cannot cancel a {} booking", status.as_str()),
        )),
        BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::InProgress => Ok(()),
    }
}

/// Approval and rejection only apply to bookings awaiting review.
pub fn ensure_pending(status: BookingStatus, action: &str) -> Result<(), CoreError> {
    if status != BookingStatus::Pending {
        return Err(CoreError::Conflict(format!(
            "Only pending bookings can be {action}; this one is {}",
            status.as_str()
        )));
    }
    Ok(())
}

pub fn ensure_deletable(status: BookingStatus) -> Result<(), CoreError> {
    if status != BookingStatus::Cancelled {
        return Err(CoreError::Validation(
            "Only cancelled bookings can be deleted".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(day: u32, hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
    }

    fn window(day: u32, from: u32, to: u32) -> BookingWindow {
        BookingWindow::new(at(day, from), at(day, to)).unwrap()
    }

    fn booking(id: DbId, status: BookingStatus, w: BookingWindow) -> ExistingBooking {
        ExistingBooking { id, status, window: w }
    }

    #[test]
    fn partial_overlap_conflicts_both_ways() {
        let a = window(10, 10, 12);
        let b = window(10, 11, 13);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_endpoints_conflict() {
        let a = window(10, 10, 12);
        let b = window(10, 12, 14);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn disjoint_windows_do_not_conflict() {
        let a = window(10, 9, 11);
        let b = window(10, 13, 17);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn containment_conflicts() {
        let outer = window(10, 8, 18);
        let inner = window(10, 12, 13);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn empty_or_reversed_window_rejected() {
        assert_matches!(
            BookingWindow::new(at(10, 12), at(10, 12)),
            Err(CoreError::Validation(msg)) if msg.contains("after start")
        );
        assert!(BookingWindow::new(at(10, 13), at(10, 12)).is_err());
    }

    #[test]
    fn cancelled_bookings_never_conflict() {
        let existing = [booking(1, BookingStatus::Cancelled, window(10, 9, 17))];
        assert!(!has_conflict(&existing, &window(10, 10, 11), None));
    }

    #[test]
    fn every_active_status_holds_the_machine() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
            BookingStatus::Completed,
        ] {
            let existing = [booking(1, status, window(10, 9, 17))];
            assert!(
                has_conflict(&existing, &window(10, 16, 18), None),
                "{status} should block"
            );
        }
    }

    #[test]
    fn excluded_booking_does_not_conflict_with_itself() {
        let w = window(10, 9, 17);
        let existing = [booking(7, BookingStatus::Confirmed, w)];
        assert!(has_conflict(&existing, &w, None));
        assert!(!has_conflict(&existing, &w, Some(7)));
    }

    #[test]
    fn find_conflict_returns_the_blocking_booking() {
        let existing = [
            booking(1, BookingStatus::Cancelled, window(10, 9, 17)),
            booking(2, BookingStatus::Pending, window(11, 9, 17)),
            booking(3, BookingStatus::Confirmed, window(10, 14, 15)),
        ];
        let found = find_conflict(&existing, &window(10, 13, 16), None).unwrap();
        assert_eq!(found.id, 3);
    }

    #[test]
    fn start_in_the_past_rejected() {
        let now = at(10, 12);
        assert_matches!(
            validate_new_booking(at(10, 11), at(10, 15), now),
            Err(CoreError::Validation(msg)) if msg == "Start date cannot be in the past"
        );
        assert!(validate_new_booking(at(10, 12), at(10, 15), now).is_ok());
    }

    #[test]
    fn cost_truncates_partial_hours() {
        let w = BookingWindow::new(at(10, 9), at(10, 11) + Duration::minutes(59)).unwrap();
        assert_eq!(w.whole_hours(), 2);
        assert_eq!(total_cost_cents(Some(12_500), &w).unwrap(), Some(25_000));
        assert_eq!(total_cost_cents(None, &w).unwrap(), None);
    }

    #[test]
    fn oversized_cost_rejected() {
        let w = BookingWindow::new(at(10, 9), at(10, 9) + Duration::days(3650)).unwrap();
        assert_matches!(
            total_cost_cents(Some(i64::MAX / 1000), &w),
            Err(CoreError::Validation(msg)) if msg == "Booking cost is too large"
        );
    }

    #[test]
    fn only_owner_may_act() {
        assert!(ensure_owner(5, 5, "cancel").is_ok());
        assert_matches!(
            ensure_owner(5, 6, "delete"),
            Err(CoreError::Forbidden(msg)) if msg == "You can only delete your own bookings"
        );
    }

    #[test]
    fn finished_bookings_cannot_be_cancelled() {
        assert!(ensure_cancellable(BookingStatus::Pending).is_ok());
        assert!(ensure_cancellable(BookingStatus::InProgress).is_ok());
        assert_matches!(
            ensure_cancellable(BookingStatus::Completed),
            Err(CoreError::Validation(msg)) if msg == "Cannot cancel a completed booking"
        );
        assert!(ensure_cancellable(BookingStatus::Cancelled).is_err());
    }

    #[test]
    fn review_requires_pending() {
        assert!(ensure_pending(BookingStatus::Pending, "approved").is_ok());
        assert_matches!(
            ensure_pending(BookingStatus::Confirmed, "approved"),
            Err(CoreError::Conflict(msg)) if msg == "Only pending bookings can be approved; this one is confirmed"
        );
    }

    #[test]
    fn only_cancelled_bookings_are_deletable() {
        assert!(ensure_deletable(BookingStatus::Cancelled).is_ok());
        assert!(ensure_deletable(BookingStatus::Pending).is_err());
        assert!(ensure_deletable(BookingStatus::Completed).is_err());
    }
}
