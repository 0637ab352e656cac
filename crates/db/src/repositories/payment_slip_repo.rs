//! Repository for the `payment_slips` table.

use rentfleet_core::status::PaymentSlipStatus;
use rentfleet_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::payment_slip::{CreatePaymentSlip, PaymentSlip};
use crate::repositories::BookingRepo;

const COLUMNS: &str = "id, booking_id, file_path, status_id, uploaded_by, uploaded_at, verified_at, \
                        verified_by, remarks, created_at, updated_at";

pub struct PaymentSlipRepo;

impl PaymentSlipRepo {
    pub async fn create(pool: &PgPool, input: &CreatePaymentSlip) -> Result<PaymentSlip, sqlx::Error> {
        let query = format!(
            "INSERT INTO payment_slips (booking_id, file_path, status_id, uploaded_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentSlip>(&query)
            .bind(input.booking_id)
            .bind(&input.file_path)
            .bind(PaymentSlipStatus::Uploaded.id())
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PaymentSlip>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payment_slips WHERE id = $1");
        sqlx::query_as::<_, PaymentSlip>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_booking(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Vec<PaymentSlip>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payment_slips WHERE booking_id = $1 ORDER BY uploaded_at DESC, id DESC"
        );
        sqlx::query_as::<_, PaymentSlip>(&query)
            .bind(booking_id)
            .fetch_all(pool)
            .await
    }

    /// All slips, optionally filtered by status, newest upload first.
    pub async fn list(
        pool: &PgPool,
        status: Option<PaymentSlipStatus>,
    ) -> Result<Vec<PaymentSlip>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payment_slips
             WHERE ($1::SMALLINT IS NULL OR status_id = $1)
             ORDER BY uploaded_at DESC, id DESC"
        );
        sqlx::query_as::<_, PaymentSlip>(&query)
            .bind(status.map(PaymentSlipStatus::id))
            .fetch_all(pool)
            .await
    }

    /// Record a review decision. Only slips still UPLOADED or PENDING are
    /// touched; `None` means the slip was already reviewed (or is gone).
    /// A VERIFIED decision also marks the booking's payment as verified.
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        status: PaymentSlipStatus,
        reviewer_id: DbId,
        remarks: Option<&str>,
        at: Timestamp,
    ) -> Result<Option<PaymentSlip>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE payment_slips SET
                status_id = $2,
                verified_by = $3,
                remarks = $4,
                verified_at = $5
             WHERE id = $1 AND status_id IN ($6, $7)
             RETURNING {COLUMNS}"
        );
        let slip = sqlx::query_as::<_, PaymentSlip>(&query)
            .bind(id)
            .bind(status.id())
            .bind(reviewer_id)
            .bind(remarks)
            .bind(at)
            .bind(PaymentSlipStatus::Uploaded.id())
            .bind(PaymentSlipStatus::Pending.id())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(slip) = slip else {
            return Ok(None);
        };
        if status == PaymentSlipStatus::Verified {
            BookingRepo::mark_payment_verified(&mut *tx, slip.booking_id, at).await?;
        }

        tx.commit().await?;
        Ok(Some(slip))
    }
}
