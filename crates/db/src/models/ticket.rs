//! Support ticket and ticket response models.

use rentfleet_core::status::{TicketCategory, TicketStatus};
use rentfleet_core::ticket::TicketParties;
use rentfleet_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub customer_id: DbId,
    pub assigned_staff_id: Option<DbId>,
    pub subject: String,
    pub description: String,
    #[sqlx(rename = "category_id", try_from = "i16")]
    pub category: TicketCategory,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: TicketStatus,
    pub flagged: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Ticket {
    pub fn parties(&self) -> TicketParties {
        TicketParties {
            customer_id: self.customer_id,
            assigned_staff_id: self.assigned_staff_id,
        }
    }
}

#[derive(Debug)]
pub struct CreateTicket {
    pub customer_id: DbId,
    pub assigned_staff_id: Option<DbId>,
    pub subject: String,
    pub description: String,
    pub category: TicketCategory,
}

/// A row from the `ticket_responses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketResponse {
    pub id: DbId,
    pub ticket_id: DbId,
    pub author_id: DbId,
    pub message: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A ticket together with its responses, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub responses: Vec<TicketResponse>,
}
