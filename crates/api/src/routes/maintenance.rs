//! Route definitions for the `/maintenance` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::maintenance;
use crate::state::AppState;

/// Routes mounted at `/maintenance`.
///
/// ```text
/// GET    /records                -> list_records (?machine_id=)
/// POST   /records                -> open_repair
/// POST   /records/{id}/complete  -> complete_record
/// DELETE /records/{id}           -> delete_record
/// GET    /alerts                 -> list_alerts
/// GET    /status                 -> status_overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/records",
            get(maintenance::list_records).post(maintenance::open_repair),
        )
        .route("/records/{id}", delete(maintenance::delete_record))
        .route("/records/{id}/complete", post(maintenance::complete_record))
        .route("/alerts", get(maintenance::list_alerts))
        .route("/status", get(maintenance::status_overview))
}
