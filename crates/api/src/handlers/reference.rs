//! Reference data: every status vocabulary and role with its display label.
//!
//! Lets clients render labels without hard-coding them.

use axum::Json;
use rentfleet_core::roles::Role;
use rentfleet_core::status::{
    BookingStatus, MachineStatus, PaymentSlipStatus, StatusId, TicketCategory, TicketStatus,
};
use rentfleet_core::types::DbId;
use serde::Serialize;

use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct StatusEntry {
    pub id: StatusId,
    pub name: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RoleEntry {
    pub id: DbId,
    pub name: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReferenceData {
    pub machine_statuses: Vec<StatusEntry>,
    pub booking_statuses: Vec<StatusEntry>,
    pub ticket_statuses: Vec<StatusEntry>,
    pub ticket_categories: Vec<StatusEntry>,
    pub payment_slip_statuses: Vec<StatusEntry>,
    pub roles: Vec<RoleEntry>,
}

macro_rules! entries {
    ($ty:ty) => {
        <$ty>::ALL
            .iter()
            .map(|s| StatusEntry {
                id: s.id(),
                name: s.as_str(),
                label: s.label(),
            })
            .collect()
    };
}

/// GET /api/v1/statuses
pub async fn list_statuses() -> Json<DataResponse<ReferenceData>> {
    Json(DataResponse {
        data: ReferenceData {
            machine_statuses: entries!(MachineStatus),
            booking_statuses: entries!(BookingStatus),
            ticket_statuses: entries!(TicketStatus),
            ticket_categories: entries!(TicketCategory),
            payment_slip_statuses: entries!(PaymentSlipStatus),
            roles: Role::ALL
                .iter()
                .map(|r| RoleEntry {
                    id: r.id(),
                    name: r.as_str(),
                    label: r.label(),
                })
                .collect(),
        },
    })
}
