use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::{AppError, FieldError},
    favorites::dto::{BulkFavoritesRequest, FavoriteStatus},
    state::AppState,
};

pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/favorites/:user_id", get(list_favorites))
        // static segment wins over :event_id
        .route("/favorites/:user_id/bulk", post(bulk_add_favorites))
        .route(
            "/favorites/:user_id/:event_id",
            post(add_favorite).delete(remove_favorite),
        )
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<String>>, AppError> {
    let Path(user_id) = path?;
    Ok(Json(state.favorites.list(user_id).await?))
}

#[instrument(skip(state))]
pub async fn add_favorite(
    State(state): State<AppState>,
    path: Result<Path<(i64, String)>, PathRejection>,
) -> Result<Json<FavoriteStatus>, AppError> {
    let Path((user_id, event_id)) = path?;
    Ok(Json(state.favorites.add(user_id, &event_id).await?))
}

#[instrument(skip(state))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    path: Result<Path<(i64, String)>, PathRejection>,
) -> Result<Json<FavoriteStatus>, AppError> {
    let Path((user_id, event_id)) = path?;
    Ok(Json(state.favorites.remove(user_id, &event_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn bulk_add_favorites(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BulkFavoritesRequest>, JsonRejection>,
) -> Result<Json<Vec<String>>, AppError> {
    let Path(user_id) = path?;
    let Json(req) = payload?;
    let Some(event_ids) = req.event_ids else {
        return Err(AppError::Validation(vec![FieldError::new(
            "eventIds",
            "must not be null",
        )]));
    };
    Ok(Json(state.favorites.bulk_add(user_id, event_ids).await?))
}
