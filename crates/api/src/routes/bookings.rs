//! Route definitions for the `/bookings` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{bookings, payment_slips};
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /                      -> list_bookings (?status=)
/// POST   /                      -> create_booking
/// GET    /pending               -> list_pending
/// GET    /{id}                  -> get_booking
/// DELETE /{id}                  -> delete_booking
/// POST   /{id}/approve          -> approve_booking
/// POST   /{id}/reject           -> reject_booking
/// POST   /{id}/cancel           -> cancel_booking
/// PUT    /{id}/status           -> update_status
/// GET    /{id}/payment-slips    -> payment_slips::list_for_booking
/// POST   /{id}/payment-slips    -> payment_slips::upload_slip (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/pending", get(bookings::list_pending))
        .route(
            "/{id}",
            get(bookings::get_booking).delete(bookings::delete_booking),
        )
        .route("/{id}/approve", post(bookings::approve_booking))
        .route("/{id}/reject", post(bookings::reject_booking))
        .route("/{id}/cancel", post(bookings::cancel_booking))
        .route("/{id}/status", put(bookings::update_status))
        .route(
            "/{id}/payment-slips",
            get(payment_slips::list_for_booking).post(payment_slips::upload_slip),
        )
}
