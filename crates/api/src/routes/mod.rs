pub mod account;
pub mod admin;
pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod health;
pub mod machines;
pub mod maintenance;
pub mod payment_slips;
pub mod tickets;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register | /login | /refresh | /logout     public except logout
/// /account                                          own profile
///
/// /admin/users                                      list, create (admin only)
/// /admin/users/{id}                                 get, update, deactivate
/// /admin/users/{id}/reset-password                  reset password
/// /admin/roles                                      seeded roles
///
/// /statuses                                         status and role labels (public)
///
/// /machines                                         list, create
/// /machines/available | /booked                     availability views
/// /machines/{id}                                    get, update, delete
/// /machines/{id}/status | /availability             status write, resolved availability
///
/// /bookings                                         list, create
/// /bookings/pending                                 review queue
/// /bookings/{id}                                    get, delete
/// /bookings/{id}/approve | /reject | /cancel        lifecycle
/// /bookings/{id}/status                             explicit status
/// /bookings/{id}/payment-slips                      list, upload
///
/// /payment-slips                                    finance review queue
/// /payment-slips/{id} | /{id}/verify                get, review
///
/// /maintenance/records                              list, open repair
/// /maintenance/records/{id} | /{id}/complete        delete, complete
/// /maintenance/alerts | /status                     attention list, overview
///
/// /tickets                                          list, create
/// /tickets/flagged                                  admin escalations
/// /tickets/{id}                                     get, delete
/// /tickets/{id}/responses | /status | /flag | /unflag | /reassign
///
/// /dashboard/admin | /bookings                      summary counts
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/account", account::router())
        .nest("/admin", admin::router())
        .route("/statuses", get(handlers::reference::list_statuses))
        .nest("/machines", machines::router())
        .nest("/bookings", bookings::router())
        .nest("/payment-slips", payment_slips::router())
        .nest("/maintenance", maintenance::router())
        .nest("/tickets", tickets::router())
        .nest("/dashboard", dashboard::router())
}
