//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API. Field names
//! are camelCase on the wire.

use serde::{Deserialize, Serialize};
use wardrobe_core::{
    Composition, FigurePart, Gender, PaletteColor, SetInfo, SetTypeInfo, WardrobeError,
};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// CATALOG RESPONSES
// =============================================================================

/// `GET /api/settypes` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTypesResponse {
    pub set_types: Vec<SetTypeInfo>,
}

/// `GET /api/sets` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetsQuery {
    #[serde(rename = "type")]
    pub set_type: Option<String>,
    pub gender: Option<String>,
}

impl SetsQuery {
    /// Category key, rejecting a missing or blank value.
    pub fn set_type(&self) -> Result<&str, WardrobeError> {
        self.set_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| WardrobeError::InvalidRequest("missing type".to_string()))
    }

    /// Requested gender, unisex when absent.
    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender.as_deref().map(Gender::parse).unwrap_or_default()
    }
}

/// `GET /api/sets` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetsResponse {
    pub sets: Vec<SetInfo>,
}

/// `GET /api/palette` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaletteQuery {
    pub id: Option<String>,
}

impl PaletteQuery {
    /// Palette id, rejecting a missing, zero or non-numeric value.
    pub fn palette_id(&self) -> Result<i64, WardrobeError> {
        self.id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|id| *id != 0)
            .ok_or_else(|| WardrobeError::InvalidRequest("missing id".to_string()))
    }
}

/// `GET /api/palette` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteResponse {
    pub colors: Vec<PaletteColor>,
}

// =============================================================================
// FIGURE REQUEST/RESPONSE
// =============================================================================

/// `POST /api/figure` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureRequest {
    #[serde(default)]
    pub parts: Vec<FigurePart>,
}

/// `POST /api/figure` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureResponse {
    pub figure: String,
}

// =============================================================================
// RANDOM REQUEST/RESPONSE
// =============================================================================

/// `POST /api/random` request. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomRequest {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub preferred_types: Option<Vec<String>>,
}

impl RandomRequest {
    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender.as_deref().map(Gender::parse).unwrap_or_default()
    }
}

/// `POST /api/random` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomResponse {
    pub parts: Vec<FigurePart>,
    pub figure: String,
}

impl From<Composition> for RandomResponse {
    fn from(composition: Composition) -> Self {
        Self {
            figure: composition.figure_string(),
            parts: composition.parts(),
        }
    }
}

// =============================================================================
// ERROR RESPONSES
// =============================================================================

/// Generic error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Error body of a failed render proxy call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagerErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ImagerErrorResponse {
    /// The imager answered with a failure status.
    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        Self {
            error: "imager_error".to_string(),
            status: Some(status),
            detail: Some(detail.into()),
        }
    }

    /// The imager could not be reached.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            error: "imager_unreachable".to_string(),
            status: None,
            detail: None,
        }
    }
}
