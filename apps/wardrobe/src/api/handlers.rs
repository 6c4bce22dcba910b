//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Catalog queries may block on file I/O, so they run on the blocking pool.

use super::{
    AppState,
    types::{
        ErrorResponse, FigureRequest, FigureResponse, HealthResponse, ImagerErrorResponse,
        PaletteQuery, PaletteResponse, RandomRequest, RandomResponse, SetTypesResponse, SetsQuery,
        SetsResponse,
    },
};
use crate::config::ENV_IMAGER_URL;
use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::collections::BTreeMap;
use std::sync::Arc;
use wardrobe_core::{RenderOptions, RenderRequest, RngDraw, Wardrobe, WardrobeError};

/// Shared-cache policy of the set-type and set listings.
pub const CATALOG_CACHE_CONTROL: &str = "s-maxage=600, stale-while-revalidate=3600";

/// Shared-cache policy of palette listings.
pub const PALETTE_CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate=86400";

/// Rendered images never change for a given query.
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// HTTP status of an error.
#[must_use]
pub fn status_for(err: &WardrobeError) -> StatusCode {
    match err {
        WardrobeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        WardrobeError::UpstreamRender { .. } | WardrobeError::UpstreamUnavailable(_) => {
            StatusCode::BAD_GATEWAY
        }
        WardrobeError::Config(_)
        | WardrobeError::SourceRead(_)
        | WardrobeError::Parse(_)
        | WardrobeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: WardrobeError) -> Response {
    let status = status_for(&err);
    let message = match err {
        WardrobeError::InvalidRequest(msg) => {
            tracing::warn!("Rejected request: {}", msg);
            msg
        }
        other => {
            tracing::error!("Request failed: {}", other);
            other.to_string()
        }
    };
    (status, Json(ErrorResponse::new(message))).into_response()
}

/// Run a façade query on the blocking pool.
async fn run_query<T, F>(state: &AppState, query: F) -> Result<T, WardrobeError>
where
    T: Send + 'static,
    F: FnOnce(&Wardrobe) -> Result<T, WardrobeError> + Send + 'static,
{
    let wardrobe = Arc::clone(&state.wardrobe);
    tokio::task::spawn_blocking(move || query(&wardrobe))
        .await
        .map_err(|e| WardrobeError::Io(format!("Query task failed: {}", e)))?
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CATALOG HANDLERS
// =============================================================================

/// List all categories.
pub async fn set_types_handler(State(state): State<AppState>) -> Response {
    match run_query(&state, |w| w.list_set_types()).await {
        Ok(set_types) => (
            [(header::CACHE_CONTROL, CATALOG_CACHE_CONTROL)],
            Json(SetTypesResponse { set_types }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// List the items of one category.
pub async fn sets_handler(
    State(state): State<AppState>,
    Query(query): Query<SetsQuery>,
) -> Response {
    let set_type = match query.set_type() {
        Ok(t) => t.to_string(),
        Err(e) => return error_response(e),
    };
    let gender = query.gender();

    match run_query(&state, move |w| w.list_sets(&set_type, gender)).await {
        Ok(sets) => (
            [(header::CACHE_CONTROL, CATALOG_CACHE_CONTROL)],
            Json(SetsResponse { sets }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// List the colors of one palette.
pub async fn palette_handler(
    State(state): State<AppState>,
    Query(query): Query<PaletteQuery>,
) -> Response {
    let palette_id = match query.palette_id() {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match run_query(&state, move |w| w.list_palette_colors(palette_id)).await {
        Ok(colors) => (
            [(header::CACHE_CONTROL, PALETTE_CACHE_CONTROL)],
            Json(PaletteResponse { colors }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

// =============================================================================
// FIGURE HANDLERS
// =============================================================================

/// Encode parts into a figure string.
pub async fn figure_handler(
    State(state): State<AppState>,
    Json(request): Json<FigureRequest>,
) -> impl IntoResponse {
    let figure = state.wardrobe.encode_figure(&request.parts);
    Json(FigureResponse { figure })
}

/// Generate a random avatar.
pub async fn random_handler(
    State(state): State<AppState>,
    Json(request): Json<RandomRequest>,
) -> Response {
    let gender = request.gender();
    let preferred = request.preferred_types;

    let result = run_query(&state, move |w| {
        w.random_composition(gender, preferred.as_deref(), &mut RngDraw::thread())
    })
    .await;

    match result {
        Ok(composition) => Json(RandomResponse::from(composition)).into_response(),
        Err(e) => error_response(e),
    }
}

// =============================================================================
// RENDER HANDLER
// =============================================================================

/// Build a render request from query parameters.
pub fn render_request(
    params: &BTreeMap<String, String>,
    max_direction: u8,
) -> Result<RenderRequest, WardrobeError> {
    let figure = params
        .get("figure")
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .ok_or_else(|| WardrobeError::InvalidRequest("missing figure".to_string()))?;
    let options = RenderOptions::from_params(params, max_direction)?;
    RenderRequest::new(figure, options)
}

/// Proxy a render request to the imager.
pub async fn render_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let Some(imager) = state.imager.clone() else {
        tracing::error!("Render requested but {} is not configured", ENV_IMAGER_URL);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("{} is not configured", ENV_IMAGER_URL))),
        )
            .into_response();
    };

    let request = match render_request(&params, imager.max_direction()) {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };

    match imager.render(&request).await {
        Ok(image) => (
            [
                (header::CONTENT_TYPE, image.content_type),
                (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
            ],
            image.bytes,
        )
            .into_response(),
        Err(WardrobeError::UpstreamRender { status, detail }) => (
            StatusCode::BAD_GATEWAY,
            Json(ImagerErrorResponse::rejected(status, detail)),
        )
            .into_response(),
        Err(WardrobeError::UpstreamUnavailable(msg)) => {
            tracing::warn!("Imager unreachable: {}", msg);
            (StatusCode::BAD_GATEWAY, Json(ImagerErrorResponse::unreachable())).into_response()
        }
        Err(e) => error_response(e),
    }
}
