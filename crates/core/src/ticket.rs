//! Support ticket access rules.
//!
//! A ticket may be opened by its customer, its assigned staff member, or an
//! admin. Listings are broader: booking managers also see unassigned tickets
//! so they can pick them up, and non-booking staff see every ticket.

use crate::error::CoreError;
use crate::roles::{Permission, Role};
use crate::types::DbId;

/// The two users a ticket is tied to.
#[derive(Debug, Clone, Copy)]
pub struct TicketParties {
    pub customer_id: DbId,
    pub assigned_staff_id: Option<DbId>,
}

/// Which tickets a user sees when listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketScope {
    /// Tickets raised by this customer.
    Own(DbId),
    /// Tickets assigned to this booking manager plus unassigned ones.
    AssignedOrUnassigned(DbId),
    All,
}

pub fn list_scope(user_id: DbId, role: Role) -> TicketScope {
    match role {
        Role::Customer => TicketScope::Own(user_id),
        Role::BookingManager => TicketScope::AssignedOrUnassigned(user_id),
        _ => TicketScope::All,
    }
}

pub fn can_access(parties: &TicketParties, user_id: DbId, role: Role) -> bool {
    role == Role::Admin
        || parties.customer_id == user_id
        || parties.assigned_staff_id == Some(user_id)
}

pub fn ensure_can_access(parties: &TicketParties, user_id: DbId, role: Role) -> Result<(), CoreError> {
    if can_access(parties, user_id, role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "You do not have access to this ticket".into(),
        ))
    }
}

pub fn ensure_can_update_status(role: Role) -> Result<(), CoreError> {
    role.require(Permission::UpdateTicketStatus)
}

pub fn ensure_can_flag(role: Role) -> Result<(), CoreError> {
    role.require(Permission::FlagTickets)
}

pub fn ensure_can_unflag(role: Role) -> Result<(), CoreError> {
    role.require(Permission::UnflagTickets)
}

pub fn ensure_can_reassign(role: Role) -> Result<(), CoreError> {
    role.require(Permission::ReassignTickets)
}

/// Tickets can only be handed to booking managers.
pub fn ensure_reassign_target(target_role: Role) -> Result<(), CoreError> {
    if target_role != Role::BookingManager {
        return Err(CoreError::Validation(
            "Can only assign tickets to booking managers".into(),
        ));
    }
    Ok(())
}

/// Only the customer who raised a ticket may delete it.
pub fn ensure_can_delete(parties: &TicketParties, user_id: DbId) -> Result<(), CoreError> {
    if parties.customer_id != user_id {
        return Err(CoreError::Forbidden(
            "You can only delete your own tickets".into(),
        ));
    }
    Ok(())
}

/// Trim a response message, rejecting blank ones.
pub fn normalize_message(message: &str) -> Result<String, CoreError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Message is required".into()));
    }
    Ok(trimmed.to_string())
}

pub fn validate_ticket_fields(subject: &str, description: &str) -> Result<(), CoreError> {
    if subject.trim().is_empty() || description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Subject and description are required".into(),
        ));
    }
    Ok(())
}
