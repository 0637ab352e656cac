//! Handlers for the `/bookings` resource.
//!
//! Customers create, cancel and delete their own bookings. Booking managers
//! review pending ones. Overlap checks happen inside
//! [`BookingRepo::create_checked`] under the machine row lock.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rentfleet_core::booking::{self, total_cost_cents, validate_new_booking};
use rentfleet_core::error::CoreError;
use rentfleet_core::roles::{Permission, Role};
use rentfleet_core::status::BookingStatus;
use rentfleet_core::types::{DbId, Timestamp};
use rentfleet_db::models::booking::{Booking, CreateBooking};
use rentfleet_db::repositories::{BookingInsert, BookingRepo, MachineRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireBookingCreator, RequireBookingReview};
use crate::query::StatusFilter;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /bookings`.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub machine_id: DbId,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub notes: Option<String>,
}

/// Request body for `PUT /bookings/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/bookings
///
/// Create a PENDING booking. Returns 409 when the machine already has an
/// active booking overlapping the requested window (endpoints inclusive).
pub async fn create_booking(
    State(state): State<AppState>,
    RequireBookingCreator(user): RequireBookingCreator,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Booking>>)> {
    let window = validate_new_booking(input.start_at, input.end_at, Utc::now())?;

    let machine = MachineRepo::find_by_id(&state.pool, input.machine_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id: input.machine_id,
        }))?;

    let create = CreateBooking {
        customer_id: user.user_id,
        machine_id: machine.id,
        window,
        total_cost_cents: total_cost_cents(machine.hourly_rate_cents, &window)?,
        notes: input.notes.filter(|n| !n.trim().is_empty()),
    };

    match BookingRepo::create_checked(&state.pool, &create).await? {
        BookingInsert::Created(booking) => {
            tracing::info!(
                user_id = user.user_id,
                booking_id = booking.id,
                machine_id = booking.machine_id,
                start_at = %booking.start_at,
                end_at = %booking.end_at,
                "Booking created"
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
        }
        BookingInsert::MachineNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id: input.machine_id,
        })),
        BookingInsert::Conflict(existing) => {
            tracing::debug!(
                machine_id = existing.machine_id,
                conflicting_booking_id = existing.id,
                "Booking rejected: overlapping window"
            );
            Err(AppError::Core(CoreError::Conflict(format!(
                "Machine is already booked from {} to {}",
                existing.start_at, existing.end_at
            ))))
        }
    }
}

/// GET /api/v1/bookings
///
/// Customers see their own bookings; booking, finance and admin staff see
/// all of them. Supports `?status=`.
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<StatusFilter>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let status = filter.parse::<BookingStatus>()?;

    let bookings = if user.role == Role::Customer {
        BookingRepo::list_for_customer(&state.pool, user.user_id)
            .await?
            .into_iter()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .collect()
    } else {
        user.role.require(Permission::ViewAllBookings)?;
        BookingRepo::list(&state.pool, status).await?
    };

    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/bookings/pending
pub async fn list_pending(
    State(state): State<AppState>,
    RequireBookingReview(_user): RequireBookingReview,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let bookings = BookingRepo::list(&state.pool, Some(BookingStatus::Pending)).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = find_booking(&state, id).await?;
    ensure_can_view(&booking, &user)?;
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/v1/bookings/{id}/approve
pub async fn approve_booking(
    State(state): State<AppState>,
    RequireBookingReview(user): RequireBookingReview,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    review(&state, &user, id, BookingStatus::Confirmed, "approved").await
}

/// POST /api/v1/bookings/{id}/reject
pub async fn reject_booking(
    State(state): State<AppState>,
    RequireBookingReview(user): RequireBookingReview,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    review(&state, &user, id, BookingStatus::Cancelled, "rejected").await
}

/// PUT /api/v1/bookings/{id}/status
///
/// Set any status. Re-activating a cancelled booking that now overlaps
/// another is refused by the exclusion constraint (409).
pub async fn update_status(
    State(state): State<AppState>,
    RequireBookingReview(user): RequireBookingReview,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBookingStatusRequest>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let status: BookingStatus = input.status.parse()?;
    let booking = BookingRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    tracing::info!(
        user_id = user.user_id,
        booking_id = id,
        status = %status,
        "Booking status changed"
    );
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/v1/bookings/{id}/cancel
///
/// Owner-only. Completed and already-cancelled bookings cannot be cancelled.
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = find_booking(&state, id).await?;
    booking::ensure_owner(booking.customer_id, user.user_id, "cancel")?;
    booking::ensure_cancellable(booking.status)?;

    let booking = BookingRepo::update_status(&state.pool, id, BookingStatus::Cancelled)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    tracing::info!(user_id = user.user_id, booking_id = id, "Booking cancelled");
    Ok(Json(DataResponse { data: booking }))
}

/// DELETE /api/v1/bookings/{id}
///
/// Owner-only, and only once the booking is cancelled.
pub async fn delete_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let booking = find_booking(&state, id).await?;
    booking::ensure_owner(booking.customer_id, user.user_id, "delete")?;
    booking::ensure_deletable(booking.status)?;

    if !BookingRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }));
    }
    tracing::info!(user_id = user.user_id, booking_id = id, "Booking deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn find_booking(state: &AppState, id: DbId) -> AppResult<Booking> {
    BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))
}

/// The owner and staff who see all bookings may view one.
pub(crate) fn ensure_can_view(booking: &Booking, user: &AuthUser) -> Result<(), CoreError> {
    if booking.customer_id == user.user_id || user.role.grants(Permission::ViewAllBookings) {
        return Ok(());
    }
    Err(CoreError::Forbidden(
        "You do not have access to this booking".into(),
    ))
}

async fn review(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    target: BookingStatus,
    action: &str,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = find_booking(state, id).await?;
    booking::ensure_pending(booking.status, action)?;

    let booking = BookingRepo::update_status(&state.pool, id, target)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    tracing::info!(
        user_id = user.user_id,
        booking_id = id,
        status = %target,
        action,
        "Booking reviewed"
    );
    Ok(Json(DataResponse { data: booking }))
}
