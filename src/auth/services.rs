use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{PublicUser, SignInRequest, SignUpRequest},
    password::{hash_password_blocking, verify_password_blocking},
    repo::UserStore,
    repo_types::NewUser,
    validation::normalize_email,
};
use crate::db::StoreError;
use crate::error::AppError;

/// Sign-up and sign-in on top of a [`UserStore`].
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    #[instrument(skip(self, req), fields(email = %req.email.trim()))]
    pub async fn sign_up(&self, req: SignUpRequest) -> Result<PublicUser, AppError> {
        let email = normalize_email(&req.email);
        let name = req.name.trim().to_string();

        // Early exit only; the unique index on email is what actually guards races.
        if self.users.exists_by_email(&email).await? {
            warn!("email already registered");
            return Err(AppError::EmailAlreadyExists);
        }

        let password_hash = hash_password_blocking(req.password).await?;

        let user = match self
            .users
            .save(NewUser {
                name,
                email,
                password_hash,
            })
            .await
        {
            Ok(u) => u,
            Err(StoreError::UniqueViolation(constraint)) => {
                warn!(%constraint, "email claimed concurrently");
                return Err(AppError::EmailAlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = user.id, created_at = %user.created_at, "user registered");
        Ok(user.into())
    }

    #[instrument(skip(self, req), fields(email = %req.email.trim()))]
    pub async fn sign_in(&self, req: SignInRequest) -> Result<PublicUser, AppError> {
        let email = normalize_email(&req.email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("sign-in rejected: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let ok = verify_password_blocking(req.password, user.password_hash.clone()).await?;
        if !ok {
            warn!(user_id = user.id, "sign-in rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        info!(user_id = user.id, "user signed in");
        Ok(user.into())
    }
}
