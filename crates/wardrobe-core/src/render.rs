//! # Render Contract
//!
//! Options understood by the external imager and the request built from them.
//!
//! Rendering itself happens elsewhere; this module only guarantees that the
//! figure string and options handed over are well-formed and complete.
//!
//! | option         | default          | imager parameter |
//! |----------------|------------------|------------------|
//! | format         | `png`            | `img_format`     |
//! | action         | `std`            | `action`         |
//! | gesture        | `std`            | `gesture`        |
//! | direction      | `2`              | `direction`      |
//! | head direction | same as direction| `head_direction` |
//! | size           | `n`              | `size`           |

use crate::codec::is_well_formed;
use crate::{Composition, WardrobeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Default body/head rotation.
pub const DEFAULT_DIRECTION: u8 = 2;

/// Default action and gesture token.
pub const DEFAULT_POSE: &str = "std";

// =============================================================================
// OPTION VALUES
// =============================================================================

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Gif,
}

impl ImageFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    /// MIME type the imager answers with.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = WardrobeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            other => Err(WardrobeError::InvalidRequest(format!(
                "unsupported image format '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    #[default]
    Normal,
    Small,
}

impl ImageSize {
    /// Code used by the imager.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Normal => "n",
            Self::Small => "s",
        }
    }
}

impl FromStr for ImageSize {
    type Err = WardrobeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "normal" => Ok(Self::Normal),
            "s" | "small" => Ok(Self::Small),
            other => Err(WardrobeError::InvalidRequest(format!(
                "unsupported image size '{}'",
                other
            ))),
        }
    }
}

fn parse_direction(name: &str, raw: &str, max: u8) -> Result<u8, WardrobeError> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|d| *d <= max)
        .ok_or_else(|| {
            WardrobeError::InvalidRequest(format!(
                "{} must be a rotation index 0-{}, got '{}'",
                name, max, raw
            ))
        })
}

fn parse_pose(name: &str, raw: &str) -> Result<String, WardrobeError> {
    let token = raw.trim();
    let valid = token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, ',' | '_' | '='));
    if valid {
        Ok(token.to_string())
    } else {
        Err(WardrobeError::InvalidRequest(format!(
            "{} contains unsupported characters: '{}'",
            name, raw
        )))
    }
}

// =============================================================================
// RENDER OPTIONS
// =============================================================================

/// Rendering options with their documented defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub format: ImageFormat,
    pub action: String,
    pub gesture: String,
    pub direction: u8,
    /// Follows `direction` when unset.
    pub head_direction: Option<u8>,
    pub size: ImageSize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::default(),
            action: DEFAULT_POSE.to_string(),
            gesture: DEFAULT_POSE.to_string(),
            direction: DEFAULT_DIRECTION,
            head_direction: None,
            size: ImageSize::default(),
        }
    }
}

impl RenderOptions {
    /// Parse options from query parameters. Missing or blank values keep their default.
    ///
    /// Recognized keys: `img_format` (or `format`), `action`, `gesture`,
    /// `direction`, `head_direction`, `size`. Other keys are ignored.
    /// Directions above `max_direction` are rejected.
    pub fn from_params(
        params: &BTreeMap<String, String>,
        max_direction: u8,
    ) -> Result<Self, WardrobeError> {
        let get = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let mut options = Self::default();
        if let Some(v) = get("img_format").or_else(|| get("format")) {
            options.format = v.parse()?;
        }
        if let Some(v) = get("action") {
            options.action = parse_pose("action", v)?;
        }
        if let Some(v) = get("gesture") {
            options.gesture = parse_pose("gesture", v)?;
        }
        if let Some(v) = get("direction") {
            options.direction = parse_direction("direction", v, max_direction)?;
        }
        if let Some(v) = get("head_direction") {
            options.head_direction = Some(parse_direction("head_direction", v, max_direction)?);
        }
        if let Some(v) = get("size") {
            options.size = v.parse()?;
        }
        Ok(options)
    }

    /// Effective head rotation.
    #[must_use]
    pub fn effective_head_direction(&self) -> u8 {
        self.head_direction.unwrap_or(self.direction)
    }
}

// =============================================================================
// RENDER REQUEST
// =============================================================================

/// A figure string plus options, ready to hand to the imager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    figure: String,
    options: RenderOptions,
}

impl RenderRequest {
    /// Build a request. The figure must follow the figure-string grammar.
    pub fn new(figure: impl Into<String>, options: RenderOptions) -> Result<Self, WardrobeError> {
        let figure = figure.into();
        if !is_well_formed(&figure) {
            return Err(WardrobeError::InvalidRequest(format!(
                "malformed figure string '{}'",
                figure
            )));
        }
        Ok(Self { figure, options })
    }

    /// Build a request for a composition.
    pub fn for_composition(
        composition: &Composition,
        options: RenderOptions,
    ) -> Result<Self, WardrobeError> {
        Self::new(composition.figure_string(), options)
    }

    #[must_use]
    pub fn figure(&self) -> &str {
        &self.figure
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Query parameters for the imager, in a stable order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let o = &self.options;
        vec![
            ("figure", self.figure.clone()),
            ("img_format", o.format.as_str().to_string()),
            ("action", o.action.clone()),
            ("gesture", o.gesture.clone()),
            ("direction", o.direction.to_string()),
            ("head_direction", o.effective_head_direction().to_string()),
            ("size", o.size.code().to_string()),
        ]
    }
}

// =============================================================================
// TESTS
// =============================================================================
