//! dictation-api - HTTP API for practice targets and favorites
//!
//! | Route | Method | Handler |
//! |-------|--------|---------|
//! | `/health` | GET | [`handlers::health_check`] |
//! | `/targets` | GET | [`handlers::targets::list_targets`] |
//! | `/targets/preview` | GET | [`handlers::targets::preview`] |
//! | `/targets/:id` | GET | [`handlers::targets::get_target`] |
//! | `/assets/:file` | GET | [`handlers::targets::get_asset`] |
//! | `/favorites` | GET, POST | [`handlers::favorites`] |

pub mod config;
pub mod handlers;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, request::Parts, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use dictation_core::{FavoritesRepository, FavoritesService, PreviewSampler, TargetCatalog};

pub use config::Config;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: TargetCatalog,
    pub sampler: PreviewSampler,
    pub favorites: FavoritesService,
}

impl AppState {
    pub fn new(data_root: &Path, store: Arc<dyn FavoritesRepository>) -> Self {
        let catalog = TargetCatalog::new(data_root);
        Self {
            sampler: PreviewSampler::new(catalog.clone()),
            favorites: FavoritesService::new(catalog.clone(), store),
            catalog,
        }
    }
}

/// Build the application router with tracing and CORS layers.
pub fn router(state: AppState, frontend_url: &str) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/targets", get(handlers::targets::list_targets))
        .route("/targets/preview", get(handlers::targets::preview))
        .route("/targets/:id", get(handlers::targets::get_target))
        .route("/assets/:file", get(handlers::targets::get_asset))
        .route(
            "/favorites",
            get(handlers::favorites::get_favorites).post(handlers::favorites::set_favorite),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(frontend_url))
        .with_state(state)
}

/// CORS policy: the configured frontend plus local development servers on
/// any port.
pub fn cors_layer(frontend_url: &str) -> CorsLayer {
    let frontend = frontend_url.trim_end_matches('/').to_string();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &Parts| {
                origin
                    .to_str()
                    .map(|o| is_allowed_origin(o, &frontend))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Whether a browser `Origin` may call the API.
pub fn is_allowed_origin(origin: &str, frontend_url: &str) -> bool {
    if origin == frontend_url.trim_end_matches('/') {
        return true;
    }
    ["http://localhost", "http://127.0.0.1"].iter().any(|base| {
        origin.strip_prefix(*base).is_some_and(|rest| {
            rest.is_empty()
                || rest.strip_prefix(':').is_some_and(|port| {
                    !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
                })
        })
    })
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// Error returned by handlers, rendered as `{"message": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(dictation_core::Error),
}

impl From<dictation_core::Error> for ApiError {
    fn from(err: dictation_core::Error) -> Self {
        match err {
            dictation_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(err) => {
                error!(subsystem = "api", error = %err, "Request failed");
                let message = match err {
                    dictation_core::Error::Io(_) => "read file error",
                    dictation_core::Error::Database(_) => "database error",
                    _ => "internal error",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        let body = Json(serde_json::json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}
