//! Handlers for the `/tickets` resource (support tickets and responses).
//!
//! Per-ticket access goes through `rentfleet_core::ticket`: the raising
//! customer, the assigned staff member and admins may open a ticket.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rentfleet_core::error::CoreError;
use rentfleet_core::roles::Role;
use rentfleet_core::status::{TicketCategory, TicketStatus};
use rentfleet_core::ticket;
use rentfleet_core::types::DbId;
use rentfleet_db::models::ticket::{CreateTicket, Ticket, TicketDetail, TicketResponse};
use rentfleet_db::repositories::{TicketRepo, TicketResponseRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireFlaggedTickets, RequireTicketRaiser};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /tickets`.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub subject: String,
    pub description: String,
    /// `payment` or `booking`; defaults to `booking`.
    pub category: Option<String>,
}

/// Request body for `POST /tickets/{id}/responses`.
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub message: String,
}

/// Request body for `PUT /tickets/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateTicketStatusRequest {
    pub status: String,
}

/// Request body for `POST /tickets/{id}/reassign`.
#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    pub staff_id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/tickets
///
/// Raise a ticket. It is assigned to the first active booking manager, or
/// left unassigned when there is none.
pub async fn create_ticket(
    State(state): State<AppState>,
    RequireTicketRaiser(user): RequireTicketRaiser,
    Json(input): Json<CreateTicketRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Ticket>>)> {
    ticket::validate_ticket_fields(&input.subject, &input.description)?;

    let category = match input.category.as_deref().map(str::trim) {
        None | Some("") => TicketCategory::Booking,
        Some(raw) => raw.parse()?,
    };

    let assignee = UserRepo::first_with_role(&state.pool, Role::BookingManager)
        .await?
        .map(|u| u.id);

    let created = TicketRepo::create(
        &state.pool,
        &CreateTicket {
            customer_id: user.user_id,
            assigned_staff_id: assignee,
            subject: input.subject.trim().to_string(),
            description: input.description.trim().to_string(),
            category,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.user_id,
        ticket_id = created.id,
        assigned_staff_id = ?created.assigned_staff_id,
        category = %created.category,
        "Ticket raised"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/tickets
///
/// Customers see their own tickets, booking managers their assigned and
/// unassigned ones, everyone else all tickets.
pub async fn list_tickets(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Ticket>>>> {
    let scope = ticket::list_scope(user.user_id, user.role);
    let tickets = TicketRepo::list_for_scope(&state.pool, scope).await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/tickets/flagged
pub async fn list_flagged(
    State(state): State<AppState>,
    RequireFlaggedTickets(_user): RequireFlaggedTickets,
) -> AppResult<Json<DataResponse<Vec<Ticket>>>> {
    let tickets = TicketRepo::list_flagged(&state.pool).await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/tickets/{id}
///
/// The ticket with its responses, oldest first.
pub async fn get_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TicketDetail>>> {
    let found = find_ticket(&state, id).await?;
    ticket::ensure_can_access(&found.parties(), user.user_id, user.role)?;

    let responses = TicketResponseRepo::list_for_ticket(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: TicketDetail {
            ticket: found,
            responses,
        },
    }))
}

/// POST /api/v1/tickets/{id}/responses
pub async fn respond(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TicketResponse>>)> {
    let found = find_ticket(&state, id).await?;
    ticket::ensure_can_access(&found.parties(), user.user_id, user.role)?;
    let message = ticket::normalize_message(&input.message)?;

    let response = TicketResponseRepo::create(&state.pool, id, user.user_id, &message).await?;
    tracing::info!(
        user_id = user.user_id,
        ticket_id = id,
        response_id = response.id,
        "Ticket response added"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// PUT /api/v1/tickets/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTicketStatusRequest>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    ticket::ensure_can_update_status(user.role)?;
    let status: TicketStatus = input.status.parse()?;

    let updated = TicketRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Ticket", id }))?;
    tracing::info!(user_id = user.user_id, ticket_id = id, status = %status, "Ticket status changed");
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/tickets/{id}/flag
///
/// Booking managers escalate a ticket to admins.
pub async fn flag_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    ticket::ensure_can_flag(user.role)?;
    set_flag(&state, user, id, true).await
}

/// POST /api/v1/tickets/{id}/unflag
pub async fn unflag_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    ticket::ensure_can_unflag(user.role)?;
    set_flag(&state, user, id, false).await
}

/// POST /api/v1/tickets/{id}/reassign
///
/// Admin hands a ticket to another booking manager.
pub async fn reassign_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReassignRequest>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    ticket::ensure_can_reassign(user.role)?;

    let target = UserRepo::find_by_id(&state.pool, input.staff_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.staff_id,
        }))?;
    ticket::ensure_reassign_target(target.role)?;

    let updated = TicketRepo::reassign(&state.pool, id, target.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Ticket", id }))?;
    tracing::info!(
        user_id = user.user_id,
        ticket_id = id,
        assigned_staff_id = target.id,
        "Ticket reassigned"
    );
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/tickets/{id}
///
/// Customers delete their own tickets; responses cascade.
pub async fn delete_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let found = find_ticket(&state, id).await?;
    ticket::ensure_can_delete(&found.parties(), user.user_id)?;

    TicketRepo::delete(&state.pool, id).await?;
    tracing::info!(user_id = user.user_id, ticket_id = id, "Ticket deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_ticket(state: &AppState, id: DbId) -> AppResult<Ticket> {
    TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Ticket", id }))
}

async fn set_flag(
    state: &AppState,
    user: AuthUser,
    id: DbId,
    flagged: bool,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let updated = TicketRepo::set_flagged(&state.pool, id, flagged)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Ticket", id }))?;
    tracing::info!(user_id = user.user_id, ticket_id = id, flagged, "Ticket flag changed");
    Ok(Json(DataResponse { data: updated }))
}
