use sqlx::FromRow;
use time::OffsetDateTime;

/// Favorite record in the database. `(user_id, event_id)` is unique.
#[derive(Debug, Clone, FromRow)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub event_id: String,           // at most 64 chars
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewFavorite {
    pub user_id: i64,
    pub event_id: String,
}
