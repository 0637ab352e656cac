//! Repository for the seeded `roles` table.

use sqlx::PgPool;

use crate::models::role::RoleRow;

const COLUMNS: &str = "id, name, description, created_at, updated_at";

pub struct RoleRepo;

impl RoleRepo {
    /// List all roles ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<RoleRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles ORDER BY id ASC");
        sqlx::query_as::<_, RoleRow>(&query).fetch_all(pool).await
    }
}
