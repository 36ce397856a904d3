use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::auth::repo::UserStore;
use crate::db::StoreError;
use crate::error::{AppError, FieldError};
use crate::favorites::{dto::FavoriteStatus, repo::FavoriteStore, repo_types::NewFavorite};

const EVENT_ID_MAX: usize = 64;

/// Per-user favorites. Every operation first checks that the user exists.
#[derive(Clone)]
pub struct FavoritesService {
    users: Arc<dyn UserStore>,
    favorites: Arc<dyn FavoriteStore>,
}

impl FavoritesService {
    pub fn new(users: Arc<dyn UserStore>, favorites: Arc<dyn FavoriteStore>) -> Self {
        Self { users, favorites }
    }

    async fn ensure_user(&self, user_id: i64) -> Result<(), AppError> {
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => {
                debug!(user_id, "user not found");
                Err(AppError::UserNotFound)
            }
        }
    }

    /// Inserts unless already present. Losing an insert race to the unique constraint counts as success.
    async fn insert_if_absent(&self, user_id: i64, event_id: &str) -> Result<bool, AppError> {
        if self
            .favorites
            .exists_for_user_and_event(user_id, event_id)
            .await?
        {
            return Ok(false);
        }
        let new = NewFavorite {
            user_id,
            event_id: event_id.to_string(),
        };
        match self.favorites.save(new).await {
            Ok(fav) => {
                debug!(
                    favorite_id = fav.id,
                    user_id = fav.user_id,
                    event_id = %fav.event_id,
                    created_at = %fav.created_at,
                    "favorite row inserted"
                );
                Ok(true)
            }
            Err(StoreError::UniqueViolation(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, user_id: i64) -> Result<Vec<String>, AppError> {
        self.ensure_user(user_id).await?;
        Ok(self.favorites.list_by_user(user_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn add(&self, user_id: i64, event_id: &str) -> Result<FavoriteStatus, AppError> {
        self.ensure_user(user_id).await?;
        let event_id = checked_event_id(event_id)?;
        if self.insert_if_absent(user_id, &event_id).await? {
            info!(user_id, %event_id, "favorite added");
        }
        Ok(FavoriteStatus {
            event_id,
            saved: true,
        })
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: i64, event_id: &str) -> Result<FavoriteStatus, AppError> {
        self.ensure_user(user_id).await?;
        let event_id = checked_event_id(event_id)?;
        let removed = self
            .favorites
            .delete_by_user_and_event(user_id, &event_id)
            .await?;
        if removed > 0 {
            info!(user_id, %event_id, "favorite removed");
        }
        Ok(FavoriteStatus {
            event_id,
            saved: false,
        })
    }

    /// Adds every id not yet favorited and returns the user's full list afterwards.
    #[instrument(skip(self, event_ids), fields(count = event_ids.len()))]
    pub async fn bulk_add(
        &self,
        user_id: i64,
        event_ids: Vec<Option<String>>,
    ) -> Result<Vec<String>, AppError> {
        self.ensure_user(user_id).await?;
        let ids = normalize_event_ids(event_ids);
        if ids.iter().any(|id| id.chars().count() > EVENT_ID_MAX) {
            return Err(AppError::Validation(vec![FieldError::new(
                "eventIds",
                "entries must be at most 64 characters",
            )]));
        }

        let mut added = 0usize;
        for id in &ids {
            if self.insert_if_absent(user_id, id).await? {
                added += 1;
            }
        }
        info!(user_id, added, "bulk favorites merged");

        Ok(self.favorites.list_by_user(user_id).await?)
    }
}

fn checked_event_id(raw: &str) -> Result<String, AppError> {
    let id = raw.trim();
    let len = id.chars().count();
    if len == 0 || len > EVENT_ID_MAX {
        return Err(AppError::Validation(vec![FieldError::new(
            "eventId",
            "must be between 1 and 64 characters",
        )]));
    }
    Ok(id.to_string())
}

/// Trims, drops null and blank entries, dedupes keeping first-seen order.
fn normalize_event_ids(raw: Vec<Option<String>>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .flatten()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
