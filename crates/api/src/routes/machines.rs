//! Route definitions for the `/machines` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::machines;
use crate::state::AppState;

/// Routes mounted at `/machines`.
///
/// ```text
/// GET    /                    -> list_machines (?status=)
/// POST   /                    -> create_machine
/// GET    /available           -> list_available
/// GET    /booked              -> list_booked
/// GET    /{id}                -> get_machine
/// PUT    /{id}                -> update_machine
/// DELETE /{id}                -> delete_machine
/// PUT    /{id}/status         -> update_status
/// GET    /{id}/availability   -> get_availability
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(machines::list_machines).post(machines::create_machine),
        )
        .route("/available", get(machines::list_available))
        .route("/booked", get(machines::list_booked))
        .route(
            "/{id}",
            get(machines::get_machine)
                .put(machines::update_machine)
                .delete(machines::delete_machine),
        )
        .route("/{id}/status", put(machines::update_status))
        .route("/{id}/availability", get(machines::get_availability))
}
