//! Favorites HTTP handlers.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::{ApiError, AppState};
use dictation_core::{SetFavoriteRequest, TargetId};

/// Query parameters for reading favorites.
#[derive(Debug, Deserialize)]
pub struct FavoritesQuery {
    #[serde(default)]
    pub account: String,
}

/// Favorites of an account that still exist in the catalog.
///
/// Always 200; unknown accounts get an empty array.
pub async fn get_favorites(
    State(state): State<AppState>,
    Query(query): Query<FavoritesQuery>,
) -> Json<Vec<TargetId>> {
    Json(state.favorites.favorites(&query.account).await)
}

/// Add or remove one favorite.
///
/// # Request Body
/// `{"account": "...", "target": "...", "value": true}`
///
/// # Returns
/// - 200 OK with `{"message": "success"}`
/// - 400 Bad Request on a malformed body or empty account/target
/// - 500 Internal Server Error if the store write fails
pub async fn set_favorite(
    State(state): State<AppState>,
    body: Result<Json<SetFavoriteRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(req) = body.map_err(|e| {
        debug!(subsystem = "api", op = "set_favorite", error = %e, "Rejected request body");
        ApiError::BadRequest("invalid request body".to_string())
    })?;

    state
        .favorites
        .set_favorite(&req.account, &req.target, req.value)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "success",
    })))
}
