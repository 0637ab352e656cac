//! Repositories for `tickets` and `ticket_responses`.

use rentfleet_core::status::TicketStatus;
use rentfleet_core::ticket::TicketScope;
use rentfleet_core::types::DbId;
use sqlx::PgPool;

use crate::models::ticket::{CreateTicket, Ticket, TicketResponse};

const COLUMNS: &str = "id, customer_id, assigned_staff_id, subject, description, category_id, \
                        status_id, flagged, created_at, updated_at";

pub struct TicketRepo;

impl TicketRepo {
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets (customer_id, assigned_staff_id, subject, description, category_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(input.customer_id)
            .bind(input.assigned_staff_id)
            .bind(&input.subject)
            .bind(&input.description)
            .bind(input.category.id())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Tickets visible in a listing for the given scope, newest first.
    pub async fn list_for_scope(
        pool: &PgPool,
        scope: TicketScope,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let (filter, user_id) = match scope {
            TicketScope::Own(id) => ("WHERE customer_id = $1", Some(id)),
            TicketScope::AssignedOrUnassigned(id) => (
                "WHERE assigned_staff_id = $1 OR assigned_staff_id IS NULL",
                Some(id),
            ),
            TicketScope::All => ("", None),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM tickets {filter} ORDER BY created_at DESC, id DESC"
        );
        let mut q = sqlx::query_as::<_, Ticket>(&query);
        if let Some(id) = user_id {
            q = q.bind(id);
        }
        q.fetch_all(pool).await
    }

    pub async fn list_flagged(pool: &PgPool) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets WHERE flagged = true ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Ticket>(&query).fetch_all(pool).await
    }

    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: TicketStatus,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("UPDATE tickets SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_optional(pool)
            .await
    }

    pub async fn set_flagged(
        pool: &PgPool,
        id: DbId,
        flagged: bool,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("UPDATE tickets SET flagged = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(flagged)
            .fetch_optional(pool)
            .await
    }

    pub async fn reassign(
        pool: &PgPool,
        id: DbId,
        staff_id: DbId,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET assigned_staff_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(staff_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a ticket. Its responses cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

const RESPONSE_COLUMNS: &str = "id, ticket_id, author_id, message, created_at, updated_at";

pub struct TicketResponseRepo;

impl TicketResponseRepo {
    /// Append a response and touch the parent ticket's `updated_at`.
    pub async fn create(
        pool: &PgPool,
        ticket_id: DbId,
        author_id: DbId,
        message: &str,
    ) -> Result<TicketResponse, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO ticket_responses (ticket_id, author_id, message)
             VALUES ($1, $2, $3)
             RETURNING {RESPONSE_COLUMNS}"
        );
        let response = sqlx::query_as::<_, TicketResponse>(&query)
            .bind(ticket_id)
            .bind(author_id)
            .bind(message)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE tickets SET updated_at = NOW() WHERE id = $1")
            .bind(ticket_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(response)
    }

    /// Responses on a ticket, oldest first.
    pub async fn list_for_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM ticket_responses
             WHERE ticket_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, TicketResponse>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }
}
