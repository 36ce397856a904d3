//! In-memory stores for tests. They enforce the same uniqueness rules as the Postgres schema.

use std::fmt;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use sqlx::error::{DatabaseError, ErrorKind};
use time::OffsetDateTime;

use crate::auth::{
    repo::UserStore,
    repo_types::{NewUser, User},
};
use crate::db::StoreError;
use crate::favorites::{
    repo::FavoriteStore,
    repo_types::{Favorite, NewFavorite},
};

fn injected_failure() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

/// Stand-in for a driver-level database error, so constraint handling goes through `From<sqlx::Error>`.
#[derive(Debug)]
pub struct FakeDbError {
    pub kind: FakeDbErrorKind,
    pub constraint: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub enum FakeDbErrorKind {
    Unique,
    ForeignKey,
    Other,
}

impl fmt::Display for FakeDbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fake database error ({:?})", self.kind)
    }
}

impl std::error::Error for FakeDbError {}

impl DatabaseError for FakeDbError {
    fn message(&self) -> &str {
        "fake database error"
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn constraint(&self) -> Option<&str> {
        self.constraint
    }

    fn kind(&self) -> ErrorKind {
        match self.kind {
            FakeDbErrorKind::Unique => ErrorKind::UniqueViolation,
            FakeDbErrorKind::ForeignKey => ErrorKind::ForeignKeyViolation,
            FakeDbErrorKind::Other => ErrorKind::Other,
        }
    }
}

pub fn db_error(kind: FakeDbErrorKind, constraint: Option<&'static str>) -> sqlx::Error {
    sqlx::Error::Database(Box::new(FakeDbError { kind, constraint }))
}

pub fn unique_violation(constraint: &'static str) -> sqlx::Error {
    db_error(FakeDbErrorKind::Unique, Some(constraint))
}

#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
    blind_exists: AtomicBool,
    fail_next: AtomicBool,
}

impl MemoryUserStore {
    pub fn snapshot(&self) -> Vec<User> {
        self.rows.lock().unwrap().clone()
    }

    /// Makes `exists_by_email` always answer false, so only the insert-time constraint is left.
    pub fn hide_from_exists_check(&self) {
        self.blind_exists.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_call(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(injected_failure());
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        self.check_failure()?;
        if self.blind_exists.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self.rows.lock().unwrap().iter().any(|u| u.email == email))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check_failure()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.check_failure()?;
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn save(&self, user: NewUser) -> Result<User, StoreError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(unique_violation("uk_app_users_email").into());
        }
        let row = User {
            id: rows.len() as i64 + 1,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(row.clone());
        Ok(row)
    }
}

#[derive(Default)]
pub struct MemoryFavoriteStore {
    rows: Mutex<Vec<Favorite>>,
    next_id: Mutex<i64>,
    blind_exists: AtomicBool,
    fail_next: AtomicBool,
}

impl MemoryFavoriteStore {
    pub fn snapshot(&self) -> Vec<Favorite> {
        self.rows.lock().unwrap().clone()
    }

    pub fn hide_from_exists_check(&self) {
        self.blind_exists.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_call(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(injected_failure());
        }
        Ok(())
    }
}

#[async_trait]
impl FavoriteStore for MemoryFavoriteStore {
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<String>, StoreError> {
        self.check_failure()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.event_id.clone())
            .collect())
    }

    async fn exists_for_user_and_event(&self, user_id: i64, event_id: &str) -> Result<bool, StoreError> {
        self.check_failure()?;
        if self.blind_exists.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|f| f.user_id == user_id && f.event_id == event_id))
    }

    async fn save(&self, favorite: NewFavorite) -> Result<Favorite, StoreError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|f| f.user_id == favorite.user_id && f.event_id == favorite.event_id)
        {
            return Err(unique_violation("uk_user_favorites_user_event").into());
        }
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let row = Favorite {
            id: *next_id,
            user_id: favorite.user_id,
            event_id: favorite.event_id,
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn delete_by_user_and_event(&self, user_id: i64, event_id: &str) -> Result<u64, StoreError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|f| !(f.user_id == user_id && f.event_id == event_id));
        Ok((before - rows.len()) as u64)
    }
}
