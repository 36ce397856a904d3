use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{PublicUser, SignInRequest, SignUpRequest},
        validation::{validate_sign_in, validate_sign_up},
    },
    error::{deny_all, AppError},
    state::AppState,
};

/// Auth paths accept POST only; any other method is denied like an unmapped route.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(sign_up).fallback(deny_all))
        .route("/auth/signin", post(sign_in).fallback(deny_all))
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, AppError> {
    let Json(req) = payload?;
    validate_sign_up(&req)?;
    let user = state.auth.sign_up(req).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, AppError> {
    let Json(req) = payload?;
    validate_sign_in(&req)?;
    let user = state.auth.sign_in(req).await?;
    Ok(Json(user))
}
