//! Handlers for payment slips.
//!
//! Customers upload a slip against their own booking; finance officers
//! review it. A slip is reviewed exactly once.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rentfleet_core::booking::ensure_owner;
use rentfleet_core::error::CoreError;
use rentfleet_core::payment::{slip_extension, slip_file_name, validate_verification};
use rentfleet_core::status::PaymentSlipStatus;
use rentfleet_core::types::DbId;
use rentfleet_db::models::payment_slip::{CreatePaymentSlip, PaymentSlip, VerifyPaymentSlip};
use rentfleet_db::repositories::PaymentSlipRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::bookings::{ensure_can_view, find_booking};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireFinance;
use crate::query::StatusFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/bookings/{id}/payment-slips
///
/// Multipart form with a required `file` field (pdf, png, jpg or jpeg).
/// The file is written to the configured upload directory as
/// `booking_{id}_{millis}.{ext}`.
pub async fn upload_slip(
    State(state): State<AppState>,
    user: AuthUser,
    Path(booking_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<PaymentSlip>>)> {
    let booking = find_booking(&state, booking_id).await?;
    ensure_owner(booking.customer_id, user.user_id, "upload payment slips for")?;

    let mut file_data: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file_data = Some((filename, data.to_vec()));
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    let ext = slip_extension(&filename)?;

    let now = Utc::now();
    let storage_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(storage_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let file_path = storage_dir.join(slip_file_name(booking_id, now.timestamp_millis(), &ext));
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let created = PaymentSlipRepo::create(
        &state.pool,
        &CreatePaymentSlip {
            booking_id,
            file_path: file_path.to_string_lossy().to_string(),
            uploaded_by: user.user_id,
        },
    )
    .await;
    let slip = match created {
        Ok(slip) => slip,
        Err(e) => {
            if let Err(io) = tokio::fs::remove_file(&file_path).await {
                tracing::warn!(
                    path = %file_path.display(),
                    error = %io,
                    "Failed to remove orphaned payment slip file"
                );
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = user.user_id,
        booking_id,
        slip_id = slip.id,
        size_bytes = data.len(),
        "Payment slip uploaded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: slip })))
}

/// GET /api/v1/bookings/{id}/payment-slips
pub async fn list_for_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(booking_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PaymentSlip>>>> {
    let booking = find_booking(&state, booking_id).await?;
    ensure_can_view(&booking, &user)?;
    let slips = PaymentSlipRepo::list_for_booking(&state.pool, booking_id).await?;
    Ok(Json(DataResponse { data: slips }))
}

/// GET /api/v1/payment-slips
///
/// Review queue for finance. Supports `?status=`.
pub async fn list_slips(
    State(state): State<AppState>,
    RequireFinance(_user): RequireFinance,
    Query(filter): Query<StatusFilter>,
) -> AppResult<Json<DataResponse<Vec<PaymentSlip>>>> {
    let status = filter.parse::<PaymentSlipStatus>()?;
    let slips = PaymentSlipRepo::list(&state.pool, status).await?;
    Ok(Json(DataResponse { data: slips }))
}

/// GET /api/v1/payment-slips/{id}
pub async fn get_slip(
    State(state): State<AppState>,
    RequireFinance(_user): RequireFinance,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PaymentSlip>>> {
    let slip = find_slip(&state, id).await?;
    Ok(Json(DataResponse { data: slip }))
}

/// POST /api/v1/payment-slips/{id}/verify
///
/// Mark a slip verified or rejected. Verifying also flags the booking's
/// payment as verified. A second review returns 409.
pub async fn verify_slip(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Path(id): Path<DbId>,
    Json(input): Json<VerifyPaymentSlip>,
) -> AppResult<Json<DataResponse<PaymentSlip>>> {
    let slip = find_slip(&state, id).await?;
    validate_verification(slip.status, input.status)?;

    let remarks = input.remarks.as_deref().map(str::trim).filter(|r| !r.is_empty());
    let slip = PaymentSlipRepo::review(
        &state.pool,
        id,
        input.status,
        user.user_id,
        remarks,
        Utc::now(),
    )
    .await?
    .ok_or_else(|| {
        // Another reviewer got there between the read and the update.
        AppError::Core(CoreError::Conflict(
            "Payment slip has already been reviewed".into(),
        ))
    })?;

    tracing::info!(
        user_id = user.user_id,
        slip_id = id,
        booking_id = slip.booking_id,
        status = %slip.status,
        "Payment slip reviewed"
    );
    Ok(Json(DataResponse { data: slip }))
}

async fn find_slip(state: &AppState, id: DbId) -> AppResult<PaymentSlip> {
    PaymentSlipRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PaymentSlip",
            id,
        }))
}
