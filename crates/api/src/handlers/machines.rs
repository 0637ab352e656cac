//! Handlers for the `/machines` resource (inventory and availability).
//!
//! Reads are open to any signed-in user. Writes require the inventory
//! manager (or admin) role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rentfleet_core::availability::{self, lookahead_window};
use rentfleet_core::booking::{has_conflict, BookingWindow, ExistingBooking};
use rentfleet_core::error::CoreError;
use rentfleet_core::status::MachineStatus;
use rentfleet_core::types::DbId;
use rentfleet_db::models::machine::{CreateMachine, Machine, MachineAvailability, UpdateMachine};
use rentfleet_db::repositories::{BookingRepo, MachineRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireInventory;
use crate::query::StatusFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /machines/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateMachineStatusRequest {
    pub status: String,
}

/// GET /api/v1/machines
///
/// All machines, optionally filtered with `?status=`.
pub async fn list_machines(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filter): Query<StatusFilter>,
) -> AppResult<Json<DataResponse<Vec<Machine>>>> {
    let status = filter.parse::<MachineStatus>()?;
    let machines = MachineRepo::list(&state.pool, status).await?;
    Ok(Json(DataResponse { data: machines }))
}

/// GET /api/v1/machines/available
///
/// Machines that are AVAILABLE, flagged available, and free of active
/// bookings over the lookahead window.
pub async fn list_available(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Machine>>>> {
    let window = current_window(&state);
    let machines = MachineRepo::list_available(&state.pool, &window).await?;
    Ok(Json(DataResponse { data: machines }))
}

/// GET /api/v1/machines/booked
///
/// Machines flagged BOOKED or holding an active booking in the lookahead
/// window.
pub async fn list_booked(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Machine>>>> {
    let window = current_window(&state);
    let machines = MachineRepo::list_booked(&state.pool, &window).await?;
    Ok(Json(DataResponse { data: machines }))
}

/// GET /api/v1/machines/{id}
pub async fn get_machine(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Machine>>> {
    let machine = find_machine(&state, id).await?;
    Ok(Json(DataResponse { data: machine }))
}

/// GET /api/v1/machines/{id}/availability
pub async fn get_availability(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MachineAvailability>>> {
    let machine = find_machine(&state, id).await?;
    let window = current_window(&state);

    let bookings: Vec<ExistingBooking> =
        BookingRepo::list_active_for_machine(&state.pool, id, &window)
            .await?
            .iter()
            .map(|b| b.as_existing())
            .collect();

    let data = MachineAvailability {
        machine_id: machine.id,
        available: availability::resolve(machine.status, machine.availability, &bookings, &window),
        status: machine.status,
        availability_flag: machine.availability,
        has_conflicting_booking: has_conflict(&bookings, &window, None),
        window_start: window.start,
        window_end: window.end,
    };
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/machines
pub async fn create_machine(
    State(state): State<AppState>,
    RequireInventory(user): RequireInventory,
    Json(input): Json<CreateMachine>,
) -> AppResult<(StatusCode, Json<DataResponse<Machine>>)> {
    input.validate()?;
    let machine = MachineRepo::create(&state.pool, &input).await?;
    tracing::info!(
        user_id = user.user_id,
        machine_id = machine.id,
        model = %machine.model,
        "Machine added to inventory"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: machine })))
}

/// PUT /api/v1/machines/{id}
pub async fn update_machine(
    State(state): State<AppState>,
    RequireInventory(user): RequireInventory,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMachine>,
) -> AppResult<Json<DataResponse<Machine>>> {
    input.validate()?;
    let machine = MachineRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id,
        }))?;
    tracing::info!(user_id = user.user_id, machine_id = id, "Machine updated");
    Ok(Json(DataResponse { data: machine }))
}

/// PUT /api/v1/machines/{id}/status
///
/// Set the explicit status. The availability flag follows it.
pub async fn update_status(
    State(state): State<AppState>,
    RequireInventory(user): RequireInventory,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMachineStatusRequest>,
) -> AppResult<Json<DataResponse<Machine>>> {
    let status: MachineStatus = input.status.parse()?;
    let machine = MachineRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id,
        }))?;
    tracing::info!(
        user_id = user.user_id,
        machine_id = id,
        status = %status,
        availability = machine.availability,
        "Machine status changed"
    );
    Ok(Json(DataResponse { data: machine }))
}

/// DELETE /api/v1/machines/{id}
///
/// Refused with 409 while any booking references the machine.
pub async fn delete_machine(
    State(state): State<AppState>,
    RequireInventory(user): RequireInventory,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_machine(&state, id).await?;

    let bookings = MachineRepo::count_bookings(&state.pool, id).await?;
    if bookings > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot delete machine: it has {bookings} booking(s)"
        ))));
    }

    if !MachineRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id,
        }));
    }
    tracing::info!(user_id = user.user_id, machine_id = id, "Machine deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_machine(state: &AppState, id: DbId) -> AppResult<Machine> {
    MachineRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id,
        }))
}

/// Lookahead window starting now, sized from configuration.
pub(crate) fn current_window(state: &AppState) -> BookingWindow {
    lookahead_window(Utc::now(), state.config.availability_lookahead_days)
}
