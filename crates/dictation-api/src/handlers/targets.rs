//! Target HTTP handlers.
//!
//! Serves the target catalog: full listing, random previews, raw target
//! text and media assets.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{ApiError, AppState};
use dictation_core::TargetId;

/// Query parameters for previews.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// Number of targets wanted. Kept as text so a missing or non-numeric
    /// value gets the same 400 as a non-positive one.
    pub count: Option<String>,
}

/// List every target id, sorted.
///
/// # Returns
/// - 200 OK with a JSON array of ids
/// - 500 Internal Server Error if the targets directory is unreadable
pub async fn list_targets(
    State(state): State<AppState>,
) -> Result<Json<Vec<TargetId>>, ApiError> {
    let mut targets = state.catalog.list_targets().await?;
    targets.sort();
    Ok(Json(targets))
}

/// Random preview of up to `count` targets.
///
/// # Query Parameters
/// - `count`: positive integer, required
///
/// # Returns
/// - 200 OK with a JSON array of at most `count` distinct ids
/// - 400 Bad Request if `count` is missing, not a number or not positive
/// - 500 Internal Server Error if the targets directory is unreadable
pub async fn preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<Vec<TargetId>>, ApiError> {
    let count = query
        .count
        .as_deref()
        .and_then(|c| c.trim().parse::<i64>().ok())
        .filter(|c| *c > 0)
        .ok_or_else(|| ApiError::BadRequest("count is required".to_string()))?;

    let targets = state.sampler.sample(count).await?;
    Ok(Json(targets))
}

/// Raw text of one target.
///
/// # Returns
/// - 200 OK with `text/plain; charset=utf-8` body
/// - 400 Bad Request if the id is not a plain file name
/// - 500 Internal Server Error if the file cannot be read
pub async fn get_target(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let text = state.catalog.read_target(&id).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}

/// One media asset with its content type.
///
/// # Returns
/// - 200 OK with the file bytes
/// - 400 Bad Request if the name is not a plain file name
/// - 500 Internal Server Error if the file cannot be read
pub async fn get_asset(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let asset = state.catalog.read_asset(&file).await?;
    Ok(([(header::CONTENT_TYPE, asset.content_type)], asset.data))
}
