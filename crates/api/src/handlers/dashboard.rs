//! Dashboard summary handlers.

use axum::extract::State;
use axum::Json;
use rentfleet_db::models::dashboard::{AdminDashboard, BookingDashboard};
use rentfleet_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::handlers::machines::current_window;
use crate::middleware::rbac::{RequireAdminDashboard, RequireBookingDashboard};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/admin
pub async fn admin_dashboard(
    State(state): State<AppState>,
    RequireAdminDashboard(_user): RequireAdminDashboard,
) -> AppResult<Json<DataResponse<AdminDashboard>>> {
    let data = DashboardRepo::admin(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/dashboard/bookings
///
/// Booking totals plus how many machines are bookable right now.
pub async fn booking_dashboard(
    State(state): State<AppState>,
    RequireBookingDashboard(_user): RequireBookingDashboard,
) -> AppResult<Json<DataResponse<BookingDashboard>>> {
    let data = DashboardRepo::bookings(&state.pool, &current_window(&state)).await?;
    Ok(Json(DataResponse { data }))
}
