//! HTTP server for the script studio
//!
//! Serves the form page and a JSON endpoint the page posts to.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{ADVISORY_REQUESTS_PER_DAY, ADVISORY_REQUESTS_PER_MINUTE};
use crate::models::{Audience, Genre, MovieRequest, Runtime};
use crate::studio::ScriptStudio;
use crate::ui;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct ScriptRequest {
    #[serde(flatten)]
    pub movie: MovieRequest,
    /// Per-render opt-in to see provider error details.
    #[serde(default)]
    pub show_error_details: bool,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub studio: ScriptStudio,
}

/// =============================
/// Health & Form
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn index() -> Html<&'static str> {
    Html(ui::INDEX_HTML)
}

async fn options(State(state): State<ApiState>) -> Json<ApiResponse> {
    Json(ApiResponse::success(serde_json::json!({
        "genres": Genre::ALL.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "audiences": Audience::ALL.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "runtime": {
            "min": Runtime::MIN,
            "max": Runtime::MAX,
            "default": Runtime::DEFAULT,
        },
        "advisory_limits": {
            "requests_per_minute": ADVISORY_REQUESTS_PER_MINUTE,
            "requests_per_day": ADVISORY_REQUESTS_PER_DAY,
        },
        "dev_mode": state.studio.gate().dev_mode(),
    })))
}

/// =============================
/// Script Endpoint
/// =============================

async fn generate_script(
    State(state): State<ApiState>,
    payload: Result<Json<ScriptRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse>) {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("Rejected script request: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(rejection.body_text())),
            );
        }
    };

    info!(
        idea_len = req.movie.idea.len(),
        show_error_details = req.show_error_details,
        "Received script request"
    );

    let rendered = state
        .studio
        .generate(&req.movie, req.show_error_details)
        .await;

    (StatusCode::OK, Json(ApiResponse::success(rendered)))
}

/// =============================
/// Router
/// =============================

pub fn create_router(studio: ScriptStudio) -> Router {
    let state = ApiState { studio };

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/options", get(options))
        .route("/api/script", post(generate_script))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    studio: ScriptStudio,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(studio);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("Script studio listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
