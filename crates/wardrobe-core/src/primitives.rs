//! # Primitives
//!
//! Fixed constants of the Wardrobe core.
//!
//! ## Groups
//!
//! 1. **Freshness windows**: how long the raw catalog and each query result stay valid.
//! 2. **Catalog keys**: the ordered alternative key names probed for every field.
//! 3. **Randomizer defaults**: category heuristics used when no override is configured.
//! 4. **Limits**: bounds on input sizes.

use std::time::Duration;

// =============================================================================
// FRESHNESS WINDOWS
// =============================================================================

/// Time-to-live of the raw catalog document in the catalog store.
pub const CATALOG_TTL: Duration = Duration::from_secs(10 * 60);

/// Freshness window of the set-type list.
pub const SET_TYPES_TTL: Duration = Duration::from_secs(10 * 60);

/// Freshness window of per-type item lists.
pub const SETS_TTL: Duration = Duration::from_secs(10 * 60);

/// Freshness window of palette color lists.
///
/// Palettes change far less often than item lists.
pub const PALETTE_TTL: Duration = Duration::from_secs(60 * 60);

// =============================================================================
// CATALOG KEYS
// =============================================================================

/// Wrapper object some catalogs nest everything under.
pub const FIGUREDATA_KEYS: &[&str] = &["figuredata"];

/// Root of the set-type container.
pub const SET_TYPE_ROOT_KEYS: &[&str] = &["settype", "setType", "settypes", "setTypes"];

/// List wrapper inside the set-type root. Probed in a different order than the root.
pub const SET_TYPE_LIST_KEYS: &[&str] = &["settypes", "setTypes", "settype", "setType"];

/// Category key of a set-type record.
pub const SET_TYPE_KEY_KEYS: &[&str] = &["type", "id", "name"];

/// Palette id referenced by a set-type record.
pub const SET_TYPE_PALETTE_KEYS: &[&str] = &["paletteid", "paletteId", "palette"];

/// Mandatory flag of a set-type record.
pub const MANDATORY_KEYS: &[&str] = &["mandatory", "isMandatory"];

/// Item list of a set-type record.
pub const SET_LIST_KEYS: &[&str] = &["sets", "set", "figureparts", "figureParts"];

/// Id of an item record.
pub const SET_ID_KEYS: &[&str] = &["id", "setid", "setId"];

/// Gender of an item record.
pub const GENDER_KEYS: &[&str] = &["gender", "sex"];

/// Selectable flag of an item record.
pub const SET_SELECTABLE_KEYS: &[&str] = &["selectable", "isSelectable"];

/// Club level of an item or color record.
pub const CLUB_KEYS: &[&str] = &["club", "clublevel", "clubLevel"];

/// Drawable part list of an item record.
pub const PART_LIST_KEYS: &[&str] = &["parts", "part", "figurepart", "figurePart"];

/// Color-slot index of a part record.
pub const COLOR_INDEX_KEYS: &[&str] = &["colorindex", "colorIndex"];

/// Root of the palette container.
pub const PALETTE_ROOT_KEYS: &[&str] = &["palette", "palettes"];

/// List wrapper inside the palette root.
pub const PALETTE_LIST_KEYS: &[&str] = &["palettes", "palette"];

/// Id of a palette record.
pub const PALETTE_ID_KEYS: &[&str] = &["id", "paletteid", "paletteId"];

/// Color list of a palette record.
pub const COLOR_LIST_KEYS: &[&str] = &["colors", "color", "colours", "colour"];

/// Id of a color record.
pub const COLOR_ID_KEYS: &[&str] = &["id", "colorid", "colorId"];

/// Display order of a color record.
pub const COLOR_ORDER_KEYS: &[&str] = &["index"];

/// Selectable flag of a color record.
pub const COLOR_SELECTABLE_KEYS: &[&str] = &["selectable"];

/// Hex code of a color record.
pub const HEX_CODE_KEYS: &[&str] = &["hexCode", "hexcode"];

// =============================================================================
// RANDOMIZER DEFAULTS
// =============================================================================

/// Categories every avatar needs: head, torso, legs, shoes.
pub const BASELINE_TYPES: &[&str] = &["hd", "ch", "lg", "sh"];

/// Optional categories drawn with the higher inclusion probability: hair, hat.
pub const FAVOURED_TYPES: &[&str] = &["hr", "ha"];

/// Inclusion probability of favoured optional categories.
pub const FAVOURED_PROBABILITY: f64 = 0.65;

/// Inclusion probability of every other optional category.
pub const DEFAULT_PROBABILITY: f64 = 0.45;

/// Category visiting order when the caller does not provide one.
pub const DEFAULT_PREFERRED_TYPES: &[&str] = &[
    "hd", "ch", "lg", "sh", "hr", "ha", "he", "ea", "fa", "cc", "ca", "wa",
];

/// Category whose primary color is a skin tone.
pub const HEAD_TYPE: &str = "hd";

/// Skin tone substituted when the head resolved to the placeholder color.
pub const HEAD_FALLBACK_COLOR: i64 = 1;

/// Color emitted for a part without any usable color.
pub const PLACEHOLDER_COLOR: i64 = 0;

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum catalog document size accepted by the file source (64 MiB).
pub const MAX_CATALOG_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Maximum number of characters of an upstream error body kept for diagnostics.
pub const MAX_UPSTREAM_DETAIL: usize = 400;

/// Highest rotation index accepted for render directions by default.
///
/// The imager draws eight rotations (0-7). Deployments whose imager only
/// knows fewer lower it through `[imager] max_direction`.
pub const DEFAULT_MAX_DIRECTION: u8 = 7;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_part_of_default_order() {
        for t in BASELINE_TYPES {
            assert!(DEFAULT_PREFERRED_TYPES.contains(t));
        }
    }

    #[test]
    fn probabilities_are_valid() {
        assert!((0.0..=1.0).contains(&FAVOURED_PROBABILITY));
        assert!((0.0..=1.0).contains(&DEFAULT_PROBABILITY));
        assert!(FAVOURED_PROBABILITY > DEFAULT_PROBABILITY);
    }

    #[test]
    fn palettes_outlive_item_lists() {
        assert!(PALETTE_TTL > SETS_TTL);
    }
}
