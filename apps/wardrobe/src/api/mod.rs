//! # Wardrobe HTTP API Module
//!
//! This module implements the HTTP JSON API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/settypes` - All categories
//! - `GET /api/sets?type=&gender=` - Items of one category
//! - `GET /api/palette?id=` - Colors of one palette
//! - `POST /api/figure` - Encode parts into a figure string
//! - `POST /api/random` - Generate a random avatar
//! - `GET /api/render?figure=&...` - Render through the imager
//!
//! ## Security Configuration
//!
//! - `cors_origins` / `WARDROBE_CORS_ORIGINS`: comma-separated origins, or "*" for all (default: localhost only)
//! - `rate_limit` / `WARDROBE_RATE_LIMIT`: requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use handlers::{
    CATALOG_CACHE_CONTROL, IMAGE_CACHE_CONTROL, PALETTE_CACHE_CONTROL, figure_handler,
    health_handler, palette_handler, random_handler, render_handler, render_request,
    set_types_handler, sets_handler, status_for,
};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    ErrorResponse, FigureRequest, FigureResponse, HealthResponse, ImagerErrorResponse,
    PaletteQuery, PaletteResponse, RandomRequest, RandomResponse, SetTypesResponse, SetsQuery,
    SetsResponse,
};

use crate::config::{ENV_CORS_ORIGINS, ServerSettings, Settings};
use crate::imager::ImagerClient;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use wardrobe_core::{Wardrobe, WardrobeError};

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// Query façade over the catalog.
    pub wardrobe: Arc<Wardrobe>,
    /// Imager bridge, `None` when no imager is configured.
    pub imager: Option<ImagerClient>,
    /// Listener, CORS and rate-limit settings.
    pub server: Arc<ServerSettings>,
}

impl AppState {
    /// Create app state with default server settings and no imager.
    #[must_use]
    pub fn new(wardrobe: Wardrobe) -> Self {
        Self {
            wardrobe: Arc::new(wardrobe),
            imager: None,
            server: Arc::new(ServerSettings::default()),
        }
    }

    /// Build app state from resolved settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.wardrobe())
            .with_imager(settings.imager())
            .with_server(settings.server.clone())
    }

    #[must_use]
    pub fn with_imager(mut self, imager: Option<ImagerClient>) -> Self {
        self.imager = imager;
        self
    }

    #[must_use]
    pub fn with_server(mut self, server: ServerSettings) -> Self {
        self.server = Arc::new(server);
        self
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer.
///
/// - `Some("*")`: allows all origins (development mode)
/// - `None`: localhost only
/// - otherwise: the comma-separated list of origins
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins.map(str::trim) {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins ({}=*). This is insecure for production!",
                ENV_CORS_ORIGINS
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|s| match s.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", s);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", s, e);
                        None
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
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
/// 3. Rate Limiting - global request budget (if enabled)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(state.server.cors_origins.as_deref());

    let rate_limit = state.server.rate_limit;
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    if state.imager.is_none() {
        tracing::warn!("No imager configured - /api/render will answer 500");
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/settypes", get(handlers::set_types_handler))
        .route("/api/sets", get(handlers::sets_handler))
        .route("/api/palette", get(handlers::palette_handler))
        .route("/api/figure", post(handlers::figure_handler))
        .route("/api/random", post(handlers::random_handler))
        .route("/api/render", get(handlers::render_handler));

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(256 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(settings: &Settings) -> Result<(), WardrobeError> {
    let addr = settings.server.addr();
    let state = AppState::from_settings(settings);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WardrobeError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Wardrobe HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| WardrobeError::Io(format!("Server error: {}", e)))
}
