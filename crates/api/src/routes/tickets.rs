//! Route definitions for the `/tickets` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// GET    /                 -> list_tickets
/// POST   /                 -> create_ticket
/// GET    /flagged          -> list_flagged
/// GET    /{id}             -> get_ticket
/// DELETE /{id}             -> delete_ticket
/// POST   /{id}/responses   -> respond
/// PUT    /{id}/status      -> update_status
/// POST   /{id}/flag        -> flag_ticket
/// POST   /{id}/unflag      -> unflag_ticket
/// POST   /{id}/reassign    -> reassign_ticket
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list_tickets).post(tickets::create_ticket))
        .route("/flagged", get(tickets::list_flagged))
        .route(
            "/{id}",
            get(tickets::get_ticket).delete(tickets::delete_ticket),
        )
        .route("/{id}/responses", post(tickets::respond))
        .route("/{id}/status", put(tickets::update_status))
        .route("/{id}/flag", post(tickets::flag_ticket))
        .route("/{id}/unflag", post(tickets::unflag_ticket))
        .route("/{id}/reassign", post(tickets::reassign_ticket))
}
