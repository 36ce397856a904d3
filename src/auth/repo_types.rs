use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,                      // surrogate id, assigned on insert
    pub name: String,
    pub email: String,                // stored lowercased, unique on lower(email)
    pub password_hash: String,        // Argon2 PHC string, never leaves the service
    pub created_at: OffsetDateTime,
}

/// Fields needed to insert a user; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
