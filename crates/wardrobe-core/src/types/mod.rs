//! # Core Type Definitions
//!
//! This module contains the value objects shared across Wardrobe:
//! - Catalog entities (`SetTypeInfo`, `SetInfo`, `PaletteColor`)
//! - Composition elements (`FigurePart`, `Composition`)
//! - Error types (`WardrobeError`)
//!
//! ## Immutability
//!
//! Catalog entities are recomputed from the cached raw document on every query
//! cache miss and never mutated afterwards. Only `Composition` is edited in
//! place, by its owner.

use crate::primitives::MAX_UPSTREAM_DETAIL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// GENDER
// =============================================================================

/// Gender an item is drawn for. `U` (unisex) matches every query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[default]
    #[serde(rename = "U")]
    Unisex,
}

impl Gender {
    /// Normalize a free-form gender string.
    ///
    /// `M`/`MALE` and `F`/`FEMALE` are recognized case-insensitively,
    /// everything else is unisex.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Self::Male,
            "F" | "FEMALE" => Self::Female,
            _ => Self::Unisex,
        }
    }

    /// Single-letter code used on the wire.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unisex => "U",
        }
    }

    /// Whether an item drawn for `item` is offered to a query for `self`.
    #[must_use]
    pub fn admits(self, item: Gender) -> bool {
        self == Self::Unisex || item == Self::Unisex || item == self
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// CATALOG ENTITIES
// =============================================================================

/// One avatar category (head, hair, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTypeInfo {
    /// Short category code, unique within a catalog snapshot.
    #[serde(rename = "type")]
    pub set_type: String,
    /// Palette the category draws its colors from, if any.
    pub palette_id: Option<i64>,
    /// Whether every avatar must carry this category.
    pub mandatory: bool,
}

/// One choosable item within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInfo {
    pub id: i64,
    pub gender: Gender,
    /// 0 is free, higher values require that membership tier.
    pub club: i64,
    pub selectable: bool,
    /// Number of color slots the item exposes, at least 1.
    pub colors_count: i64,
}

/// One color of a palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteColor {
    pub id: i64,
    /// Display order; `id` is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_code: Option<String>,
}

impl PaletteColor {
    /// A color without a selectable flag counts as selectable.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.selectable != Some(false)
    }

    /// Sort key: display index, falling back to the id.
    #[must_use]
    pub fn order(&self) -> i64 {
        self.index.unwrap_or(self.id)
    }

    /// Hex code as a CSS color (`#rrggbb`).
    ///
    /// Accepts an optional `#` or `0x` prefix and 3 to 8 hex digits.
    /// Anything else yields `None`.
    #[must_use]
    pub fn css_hex(&self) -> Option<String> {
        let raw = self.hex_code.as_deref()?.trim();
        let digits = raw
            .strip_prefix('#')
            .or_else(|| raw.strip_prefix("0x"))
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw)
            .trim();

        let valid = (3..=8).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_hexdigit());
        valid.then(|| format!("#{}", digits))
    }
}

/// Display label of a club tier: empty for free items.
#[must_use]
pub fn club_label(club: i64) -> String {
    match club {
        c if c <= 0 => String::new(),
        1 => "HC".to_string(),
        2 => "VIP".to_string(),
        c => format!("CL{}", c),
    }
}

// =============================================================================
// COMPOSITION
// =============================================================================

/// The selection made for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigurePart {
    #[serde(rename = "type")]
    pub set_type: String,
    pub set_id: i64,
    /// Color ids, one per color slot.
    #[serde(default)]
    pub colors: Vec<i64>,
}

impl FigurePart {
    /// Create a new part.
    #[must_use]
    pub fn new(set_type: impl Into<String>, set_id: i64, colors: Vec<i64>) -> Self {
        Self {
            set_type: set_type.into(),
            set_id,
            colors,
        }
    }

}

/// An avatar: at most one part per category.
///
/// Owned by the caller and edited incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Composition {
    parts: BTreeMap<String, FigurePart>,
}

impl Composition {
    /// Create an empty composition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a part, replacing any previous selection for its category.
    pub fn insert(&mut self, part: FigurePart) -> Option<FigurePart> {
        self.parts.insert(part.set_type.clone(), part)
    }

    /// Selection for a category.
    #[must_use]
    pub fn get(&self, set_type: &str) -> Option<&FigurePart> {
        self.parts.get(set_type)
    }

    pub(crate) fn get_mut(&mut self, set_type: &str) -> Option<&mut FigurePart> {
        self.parts.get_mut(set_type)
    }

    /// Whether a category is selected.
    #[must_use]
    pub fn contains(&self, set_type: &str) -> bool {
        self.parts.contains_key(set_type)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// All parts, ordered by category.
    #[must_use]
    pub fn parts(&self) -> Vec<FigurePart> {
        self.parts.values().cloned().collect()
    }

    /// Canonical figure string of this composition.
    #[must_use]
    pub fn figure_string(&self) -> String {
        crate::codec::encode(self.parts.values())
    }
}

impl FromIterator<FigurePart> for Composition {
    fn from_iter<I: IntoIterator<Item = FigurePart>>(iter: I) -> Self {
        let mut composition = Self::new();
        for part in iter {
            composition.insert(part);
        }
        composition
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in Wardrobe.
///
/// - Missing catalog data is NOT an error: queries return empty results
/// - Loading failures propagate unchanged to the query boundary
/// - Nothing here is retried internally
#[derive(Debug, Error)]
pub enum WardrobeError {
    /// Required configuration (catalog location, imager URL) is missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The catalog source could not be read.
    #[error("Catalog read failed: {0}")]
    SourceRead(String),

    /// The catalog content is not valid JSON.
    #[error("Catalog parse failed: {0}")]
    Parse(String),

    /// The imager answered with a failure status.
    #[error("Imager responded {status}: {detail}")]
    UpstreamRender { status: u16, detail: String },

    /// The imager could not be reached.
    #[error("Imager unreachable: {0}")]
    UpstreamUnavailable(String),

    /// Caller input was rejected at the boundary.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An I/O error outside catalog loading (bind, serve).
    #[error("I/O error: {0}")]
    Io(String),
}

impl WardrobeError {
    /// Build an upstream render error, truncating the diagnostic body.
    #[must_use]
    pub fn upstream_render(status: u16, body: &str) -> Self {
        Self::UpstreamRender {
            status,
            detail: body.chars().take(MAX_UPSTREAM_DETAIL).collect(),
        }
    }

}

// =============================================================================
// TESTS
// =============================================================================
