//! Dashboard count models.

use serde::Serialize;
use sqlx::FromRow;

/// Headline counts for the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminDashboard {
    pub total_users: i64,
    pub total_bookings: i64,
    pub total_tickets: i64,
    pub flagged_tickets: i64,
    pub total_machines: i64,
    /// Slips still UPLOADED or PENDING.
    pub pending_payment_slips: i64,
}

/// Counts for the booking manager dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingDashboard {
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub available_machines: i64,
}
