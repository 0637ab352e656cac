//! Handlers for the `/maintenance` resource.
//!
//! All routes require the maintenance supervisor (or admin) role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rentfleet_core::error::CoreError;
use rentfleet_core::maintenance::{ensure_deletable, validate_repair_window};
use rentfleet_core::types::{DbId, Timestamp};
use rentfleet_db::models::machine::Machine;
use rentfleet_db::models::maintenance::{
    CreateMaintenanceRecord, MachineMaintenanceStatus, MaintenanceRecord,
};
use rentfleet_db::repositories::{
    CompletionOutcome, MachineRepo, MaintenanceRepo, RepairCompletion,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireMaintenance;
use crate::query::MachineFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /maintenance/records`.
#[derive(Debug, Deserialize, Validate)]
pub struct OpenRepairRequest {
    pub machine_id: DbId,
    #[validate(length(min = 1, max = 2000, message = "Description is required"))]
    pub description: String,
    pub start_at: Option<Timestamp>,
    pub expected_end_at: Option<Timestamp>,
    pub next_due_at: Option<Timestamp>,
}

/// GET /api/v1/maintenance/records
///
/// Optionally filtered with `?machine_id=`.
pub async fn list_records(
    State(state): State<AppState>,
    RequireMaintenance(_user): RequireMaintenance,
    Query(filter): Query<MachineFilter>,
) -> AppResult<Json<DataResponse<Vec<MaintenanceRecord>>>> {
    let records = MaintenanceRepo::list(&state.pool, filter.machine_id).await?;
    Ok(Json(DataResponse { data: records }))
}

/// POST /api/v1/maintenance/records
///
/// Open a repair. The machine moves to MAINTENANCE and stops being
/// bookable.
pub async fn open_repair(
    State(state): State<AppState>,
    RequireMaintenance(user): RequireMaintenance,
    Json(input): Json<OpenRepairRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<MaintenanceRecord>>)> {
    input.validate()?;
    let (start_at, end_at) =
        validate_repair_window(input.start_at, input.expected_end_at, Utc::now())?;

    let create = CreateMaintenanceRecord {
        machine_id: input.machine_id,
        description: input.description.trim().to_string(),
        start_at,
        end_at,
        next_due_at: input.next_due_at,
        created_by: user.user_id,
    };

    let record = MaintenanceRepo::open_repair(&state.pool, &create)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id: input.machine_id,
        }))?;

    tracing::info!(
        user_id = user.user_id,
        machine_id = record.machine_id,
        record_id = record.id,
        "Repair opened, machine in maintenance"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// POST /api/v1/maintenance/records/{id}/complete
///
/// Close a record now. The machine returns to AVAILABLE only when no other
/// record on it is still open. Completing a closed record is a conflict.
pub async fn complete_record(
    State(state): State<AppState>,
    RequireMaintenance(user): RequireMaintenance,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RepairCompletion>>> {
    let completion = match MaintenanceRepo::complete(&state.pool, id, Utc::now()).await? {
        CompletionOutcome::Completed(completion) => completion,
        CompletionOutcome::AlreadyCompleted(record) => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Maintenance record {} is already completed",
                record.id
            ))));
        }
        CompletionOutcome::NotFound => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "MaintenanceRecord",
                id,
            }));
        }
    };

    tracing::info!(
        user_id = user.user_id,
        record_id = id,
        machine_id = completion.record.machine_id,
        remaining_open = completion.remaining_open,
        machine_released = completion.machine_released,
        "Maintenance record completed"
    );
    Ok(Json(DataResponse { data: completion }))
}

/// DELETE /api/v1/maintenance/records/{id}
///
/// Only completed records can be deleted.
pub async fn delete_record(
    State(state): State<AppState>,
    RequireMaintenance(user): RequireMaintenance,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let record = MaintenanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaintenanceRecord",
            id,
        }))?;
    ensure_deletable(record.end_at, Utc::now())?;

    MaintenanceRepo::delete(&state.pool, id).await?;
    tracing::info!(user_id = user.user_id, record_id = id, "Maintenance record deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/maintenance/alerts
///
/// Machines in MAINTENANCE with no maintenance record at all.
pub async fn list_alerts(
    State(state): State<AppState>,
    RequireMaintenance(_user): RequireMaintenance,
) -> AppResult<Json<DataResponse<Vec<Machine>>>> {
    let machines = MachineRepo::list_needing_attention(&state.pool).await?;
    Ok(Json(DataResponse { data: machines }))
}

/// GET /api/v1/maintenance/status
pub async fn status_overview(
    State(state): State<AppState>,
    RequireMaintenance(_user): RequireMaintenance,
) -> AppResult<Json<DataResponse<Vec<MachineMaintenanceStatus>>>> {
    let overview = MaintenanceRepo::status_overview(&state.pool, Utc::now()).await?;
    Ok(Json(DataResponse { data: overview }))
}
