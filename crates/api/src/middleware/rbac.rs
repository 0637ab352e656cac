//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects the request with 403 unless
//! the user's role is granted the matching [`Permission`]. The permission
//! matrix itself lives in `rentfleet_core::roles`.
//!
//! ```ignore
//! async fn create_machine(RequireInventory(user): RequireInventory) -> AppResult<Json<()>> {
//!     // user is an inventory manager or admin here
//!     Ok(Json(()))
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rentfleet_core::roles::Permission;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

macro_rules! permission_extractor {
    ($(#[$meta:meta])* $name:ident => $permission:expr) => {
        $(#[$meta])*
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let user = AuthUser::from_request_parts(parts, state).await?;
                user.role.require($permission)?;
                Ok($name(user))
            }
        }
    };
}

permission_extractor! {
    /// User administration. Admin only.
    RequireAdmin => Permission::ManageUsers
}

permission_extractor! {
    RequireAdminDashboard => Permission::ViewAdminDashboard
}

permission_extractor! {
    RequireBookingDashboard => Permission::ViewBookingDashboard
}

permission_extractor! {
    /// Machine inventory writes.
    RequireInventory => Permission::ManageInventory
}

permission_extractor! {
    /// Maintenance records, alerts and overview.
    RequireMaintenance => Permission::ManageMaintenance
}

permission_extractor! {
    RequireBookingCreator => Permission::CreateBookings
}

permission_extractor! {
    /// Approving, rejecting and re-statusing bookings.
    RequireBookingReview => Permission::ReviewBookings
}

permission_extractor! {
    RequireFinance => Permission::VerifyPayments
}

permission_extractor! {
    /// Raising support tickets. Customers only.
    RequireTicketRaiser => Permission::RaiseTickets
}

permission_extractor! {
    RequireFlaggedTickets => Permission::ViewFlaggedTickets
}
