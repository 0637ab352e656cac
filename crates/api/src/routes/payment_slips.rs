//! Route definitions for the `/payment-slips` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payment_slips;
use crate::state::AppState;

/// Routes mounted at `/payment-slips`. Finance officers and admins only.
///
/// ```text
/// GET  /             -> list_slips (?status=)
/// GET  /{id}         -> get_slip
/// POST /{id}/verify  -> verify_slip
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(payment_slips::list_slips))
        .route("/{id}", get(payment_slips::get_slip))
        .route("/{id}/verify", post(payment_slips::verify_slip))
}
