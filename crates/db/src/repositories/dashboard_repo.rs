//! Aggregate counts for the dashboards.

use rentfleet_core::booking::BookingWindow;
use rentfleet_core::status::{BookingStatus, PaymentSlipStatus};
use sqlx::PgPool;

use crate::models::dashboard::{AdminDashboard, BookingDashboard};
use crate::repositories::MachineRepo;

pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn admin(pool: &PgPool) -> Result<AdminDashboard, sqlx::Error> {
        sqlx::query_as::<_, AdminDashboard>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM bookings) AS total_bookings,
                (SELECT COUNT(*) FROM tickets) AS total_tickets,
                (SELECT COUNT(*) FROM tickets WHERE flagged = true) AS flagged_tickets,
                (SELECT COUNT(*) FROM machines) AS total_machines,
                (SELECT COUNT(*) FROM payment_slips WHERE status_id IN ($1, $2))
                    AS pending_payment_slips",
        )
        .bind(PaymentSlipStatus::Uploaded.id())
        .bind(PaymentSlipStatus::Pending.id())
        .fetch_one(pool)
        .await
    }

    /// Booking counts plus machines available over `window`.
    pub async fn bookings(
        pool: &PgPool,
        window: &BookingWindow,
    ) -> Result<BookingDashboard, sqlx::Error> {
        let (total_bookings, pending_bookings): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status_id = $1) FROM bookings",
        )
        .bind(BookingStatus::Pending.id())
        .fetch_one(pool)
        .await?;

        let available_machines = MachineRepo::count_available(pool, window).await?;

        Ok(BookingDashboard {
            total_bookings,
            pending_bookings,
            available_machines,
        })
    }
}
