//! Payment slip model and DTOs.

use rentfleet_core::status::PaymentSlipStatus;
use rentfleet_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `payment_slips` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentSlip {
    pub id: DbId,
    pub booking_id: DbId,
    pub file_path: String,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: PaymentSlipStatus,
    pub uploaded_by: Option<DbId>,
    pub uploaded_at: Timestamp,
    pub verified_at: Option<Timestamp>,
    pub verified_by: Option<DbId>,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreatePaymentSlip {
    pub booking_id: DbId,
    pub file_path: String,
    pub uploaded_by: DbId,
}

/// Review decision for a slip.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentSlip {
    pub status: PaymentSlipStatus,
    pub remarks: Option<String>,
}
