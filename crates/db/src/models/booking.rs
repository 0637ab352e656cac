//! Booking entity model and DTOs.

use rentfleet_core::booking::{BookingWindow, ExistingBooking};
use rentfleet_core::status::BookingStatus;
use rentfleet_core::types::{Cents, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub customer_id: DbId,
    pub machine_id: DbId,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: BookingStatus,
    pub total_cost_cents: Option<Cents>,
    pub notes: Option<String>,
    pub payment_verified: bool,
    pub payment_verified_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    pub fn window(&self) -> BookingWindow {
        BookingWindow {
            start: self.start_at,
            end: self.end_at,
        }
    }

    pub fn as_existing(&self) -> ExistingBooking {
        ExistingBooking {
            id: self.id,
            status: self.status,
            window: self.window(),
        }
    }
}

/// Insert DTO. Cost and window are computed and validated by the caller.
#[derive(Debug)]
pub struct CreateBooking {
    pub customer_id: DbId,
    pub machine_id: DbId,
    pub window: BookingWindow,
    pub total_cost_cents: Option<Cents>,
    pub notes: Option<String>,
}
