//! # Skillboard HTTP API Module
//!
//! JSON REST API for the dashboard, built on axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `/api/team-members`, `/api/skills` - list, create, get, update, delete
//! - `/api/snapshots` - weekly snapshots plus `current` and `previous`
//! - `/api/assessments` - upsert, filter by snapshot or member, update
//! - `/api/skill-matrix`, `/api/weekly-comparison`, `/api/growth-per-skill`,
//!   `/api/team-stats`, `/api/top-skills` - dashboard aggregates
//! - `/api/reports/weekly`, `/api/reports/monthly` - team reports
//! - `/api/settings` - key/value settings
//!
//! ## Configuration
//!
//! CORS origins, the global rate limit and the body limit come from
//! [`ServerConfig`].

mod error;
mod handlers;
mod middleware;
mod types;
mod views;

pub use error::{ApiError, ErrorBody};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{AssessmentQuery, HealthResponse, SettingBody, SnapshotQuery};

use crate::config::ServerConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, patch},
};
use skillboard_core::{Board, SkillboardError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PATCH,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the board.
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<RwLock<Board>>,
}

impl AppState {
    /// Create new app state around a board.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board: Arc::new(RwLock::new(board)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - any `"*"` entry: allows all origins
/// - `None` or no valid origin: localhost only
/// - otherwise: exactly the listed origins
pub fn build_cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some(origins) if origins.iter().any(|o| o.trim() == "*") => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
                    Ok(value) => {
                        tracing::info!("CORS: Allowing origin: {}", origin);
                        Some(value)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed)
                    .allow_methods(ALLOWED_METHODS)
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Restrictive CORS layer for local dashboard development servers.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate limiting (if enabled)
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = build_cors_layer(config.cors_origins.as_deref());

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        // Team members
        .route(
            "/api/team-members",
            get(handlers::list_team_members).post(handlers::create_team_member),
        )
        .route(
            "/api/team-members/{id}",
            get(handlers::get_team_member)
                .patch(handlers::update_team_member)
                .delete(handlers::delete_team_member),
        )
        // Skills
        .route(
            "/api/skills",
            get(handlers::list_skills).post(handlers::create_skill),
        )
        .route(
            "/api/skills/{id}",
            get(handlers::get_skill)
                .patch(handlers::update_skill)
                .delete(handlers::delete_skill),
        )
        // Snapshots (static segments win over `{id}`)
        .route(
            "/api/snapshots",
            get(handlers::list_snapshots).post(handlers::create_snapshot),
        )
        .route("/api/snapshots/current", get(handlers::current_snapshot))
        .route("/api/snapshots/previous", get(handlers::previous_snapshot))
        .route(
            "/api/snapshots/{id}",
            get(handlers::get_snapshot)
                .patch(handlers::update_snapshot)
                .delete(handlers::delete_snapshot),
        )
        // Assessments
        .route(
            "/api/assessments",
            get(handlers::list_assessments).post(handlers::upsert_assessment),
        )
        .route(
            "/api/assessments/snapshot/{id}",
            get(handlers::assessments_by_snapshot),
        )
        .route(
            "/api/assessments/team-member/{id}",
            get(handlers::assessments_by_team_member),
        )
        .route("/api/assessments/{id}", patch(handlers::update_assessment))
        // Aggregates
        .route("/api/skill-matrix", get(views::skill_matrix))
        .route("/api/weekly-comparison", get(views::weekly_comparison))
        .route("/api/growth-per-skill", get(views::growth_per_skill))
        .route("/api/team-stats", get(views::team_stats))
        .route("/api/top-skills", get(views::top_skills))
        .route("/api/reports/weekly", get(views::weekly_report))
        .route("/api/reports/monthly", get(views::monthly_report))
        // Settings
        .route("/api/settings", get(handlers::list_settings))
        .route(
            "/api/settings/{key}",
            get(handlers::get_setting).put(handlers::put_setting),
        );

    match create_rate_limiter(config.rate_limit) {
        Some(limiter) => {
            tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit);
            router = router.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::rate_limit_middleware,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(config.body_limit)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Serve the board until Ctrl-C.
pub async fn run_server(config: &ServerConfig, board: Board) -> Result<(), SkillboardError> {
    let router = create_router(AppState::new(board), config);
    let addr = config.addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SkillboardError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Skillboard HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SkillboardError::IoError(format!("Server error: {}", e)))?;

    tracing::info!("Skillboard HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::warn!("Cannot listen for shutdown signal: {}", e),
    }
}
