//! Route definitions for the `/dashboard` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// ```text
/// GET /admin     -> admin_dashboard
/// GET /bookings  -> booking_dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard::admin_dashboard))
        .route("/bookings", get(dashboard::booking_dashboard))
}
