//! User roles and the role-permission matrix.
//!
//! Role ids and names must match the seed data in
//! `20260301000002_create_roles_table.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::types::DbId;

/// The closed set of roles a user can hold. Every user holds exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Customer,
    BookingManager,
    InventoryManager,
    MaintenanceSupervisor,
    FinanceOfficer,
}

impl Role {
    pub const ALL: &'static [Role] = &[
        Role::Admin,
        Role::Customer,
        Role::BookingManager,
        Role::InventoryManager,
        Role::MaintenanceSupervisor,
        Role::FinanceOfficer,
    ];

    /// Seeded primary key in the `roles` table.
    pub fn id(self) -> DbId {
        match self {
            Role::Admin => 1,
            Role::Customer => 2,
            Role::BookingManager => 3,
            Role::InventoryManager => 4,
            Role::MaintenanceSupervisor => 5,
            Role::FinanceOfficer => 6,
        }
    }

    /// Look up a role by its seeded primary key.
    pub fn from_id(id: DbId) -> Option<Self> {
        Role::ALL.iter().copied().find(|r| r.id() == id)
    }

    /// Role name as stored in `roles.name` and embedded in JWT claims.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
            Role::BookingManager => "booking_manager",
            Role::InventoryManager => "inventory_manager",
            Role::MaintenanceSupervisor => "maintenance_supervisor",
            Role::FinanceOfficer => "finance_officer",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Customer => "Customer",
            Role::BookingManager => "Booking Manager",
            Role::InventoryManager => "Inventory Manager",
            Role::MaintenanceSupervisor => "Maintenance Supervisor",
            Role::FinanceOfficer => "Finance Officer",
        }
    }

    /// Whether this role is granted `permission`.
    pub fn grants(self, permission: Permission) -> bool {
        permission.allowed_roles().contains(&self)
    }

    /// Return `Ok(())` if this role is granted `permission`, otherwise a
    /// [`CoreError::Forbidden`] naming the roles that are.
    pub fn require(self, permission: Permission) -> Result<(), CoreError> {
        if self.grants(permission) {
            return Ok(());
        }
        let allowed: Vec<&str> = permission
            .allowed_roles()
            .iter()
            .map(|r| r.label())
            .collect();
        Err(CoreError::Forbidden(format!(
            "{} role required",
            allowed.join(" or ")
        )))
    }
}

impl TryFrom<DbId> for Role {
    type Error = CoreError;

    fn try_from(id: DbId) -> Result<Self, Self::Error> {
        Role::from_id(id).ok_or_else(|| CoreError::Internal(format!("Unknown role id {id}")))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(' ', "_");
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| CoreError::Validation(format!("Invalid role '{s}'")))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ManageUsers,
    ViewAdminDashboard,
    ViewBookingDashboard,
    ManageInventory,
    ManageMaintenance,
    CreateBookings,
    ViewAllBookings,
    ReviewBookings,
    VerifyPayments,
    RaiseTickets,
    UpdateTicketStatus,
    FlagTickets,
    UnflagTickets,
    ReassignTickets,
    ViewFlaggedTickets,
}

impl Permission {
    /// The permission matrix. One arm per permission so adding a permission
    /// forces a decision here.
    pub fn allowed_roles(self) -> &'static [Role] {
        use Role::*;
        match self {
            Permission::ManageUsers => &[Admin],
            Permission::ViewAdminDashboard => &[Admin],
            Permission::ViewBookingDashboard => &[BookingManager, Admin],
            Permission::ManageInventory => &[InventoryManager, Admin],
            Permission::ManageMaintenance => &[MaintenanceSupervisor, Admin],
            Permission::CreateBookings => &[Customer, Admin],
            Permission::ViewAllBookings => &[BookingManager, FinanceOfficer, Admin],
            Permission::ReviewBookings => &[BookingManager, Admin],
            Permission::VerifyPayments => &[FinanceOfficer, Admin],
            Permission::RaiseTickets => &[Customer],
            Permission::UpdateTicketStatus => &[BookingManager, Admin],
            Permission::FlagTickets => &[BookingManager],
            Permission::UnflagTickets => &[Admin],
            Permission::ReassignTickets => &[Admin],
            Permission::ViewFlaggedTickets => &[Admin],
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn role_ids_match_seed_data() {
        assert_eq!(Role::Admin.id(), 1);
        assert_eq!(Role::Customer.id(), 2);
        assert_eq!(Role::BookingManager.id(), 3);
        assert_eq!(Role::InventoryManager.id(), 4);
        assert_eq!(Role::MaintenanceSupervisor.id(), 5);
        assert_eq!(Role::FinanceOfficer.id(), 6);
    }

    #[test]
    fn from_id_round_trips_every_role() {
        for role in Role::ALL {
            assert_eq!(Role::from_id(role.id()), Some(*role));
        }
        assert_eq!(Role::from_id(99), None);
    }

    #[test]
    fn parse_accepts_legacy_spellings() {
        assert_eq!("BOOKING_MANAGER".parse::<Role>().unwrap(), Role::BookingManager);
        assert_eq!("finance officer".parse::<Role>().unwrap(), Role::FinanceOfficer);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn only_booking_managers_flag_tickets() {
        for role in Role::ALL {
            assert_eq!(
                role.grants(Permission::FlagTickets),
                *role == Role::BookingManager,
                "{role} flag permission"
            );
        }
    }

    #[test]
    fn admin_cannot_raise_tickets_but_can_book() {
        assert!(!Role::Admin.grants(Permission::RaiseTickets));
        assert!(Role::Admin.grants(Permission::CreateBookings));
    }

    #[test]
    fn finance_officer_sees_bookings_but_cannot_review() {
        assert!(Role::FinanceOfficer.grants(Permission::ViewAllBookings));
        assert!(Role::FinanceOfficer.grants(Permission::VerifyPayments));
        assert!(!Role::FinanceOfficer.grants(Permission::ReviewBookings));
    }

    #[test]
    fn customer_has_no_staff_permissions() {
        for permission in [
            Permission::ManageInventory,
            Permission::ManageMaintenance,
            Permission::ViewAllBookings,
            Permission::VerifyPayments,
            Permission::UpdateTicketStatus,
        ] {
            assert!(!Role::Customer.grants(permission), "{permission:?}");
        }
    }

    #[test]
    fn require_reports_allowed_roles() {
        let err = Role::Customer
            .require(Permission::ManageInventory)
            .unwrap_err();
        assert_matches!(err, CoreError::Forbidden(msg) if msg == "Inventory Manager or Admin role required");
        assert!(Role::InventoryManager.require(Permission::ManageInventory).is_ok());
    }
}
