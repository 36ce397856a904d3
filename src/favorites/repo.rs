use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::StoreError;
use crate::favorites::repo_types::{Favorite, NewFavorite};

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Event ids of a user's favorites, oldest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<String>, StoreError>;
    async fn exists_for_user_and_event(&self, user_id: i64, event_id: &str) -> Result<bool, StoreError>;
    /// Inserts the pair. An existing pair surfaces as `StoreError::UniqueViolation`.
    async fn save(&self, favorite: NewFavorite) -> Result<Favorite, StoreError>;
    /// Returns the number of rows removed, 0 or 1.
    async fn delete_by_user_and_event(&self, user_id: i64, event_id: &str) -> Result<u64, StoreError>;
}

#[derive(Clone)]
pub struct PgFavoriteStore {
    db: PgPool,
}

impl PgFavoriteStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteStore for PgFavoriteStore {
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query_scalar::<_, String>(
            r#"
            SELECT event_id
              FROM user_favorites
             WHERE user_id = $1
             ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn exists_for_user_and_event(&self, user_id: i64, event_id: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM user_favorites WHERE user_id = $1 AND event_id = $2)"#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }

    async fn save(&self, favorite: NewFavorite) -> Result<Favorite, StoreError> {
        let row = sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO user_favorites (user_id, event_id)
            VALUES ($1, $2)
            RETURNING id, user_id, event_id, created_at
            "#,
        )
        .bind(favorite.user_id)
        .bind(favorite.event_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete_by_user_and_event(&self, user_id: i64, event_id: &str) -> Result<u64, StoreError> {
        let res = sqlx::query(r#"DELETE FROM user_favorites WHERE user_id = $1 AND event_id = $2"#)
            .bind(user_id)
            .bind(event_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}
