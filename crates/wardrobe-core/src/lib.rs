//! # wardrobe-core
//!
//! Figure-data catalog engine for Wardrobe - THE LOGIC.
//!
//! The catalog document is authored externally and its shape is not fixed:
//! field names drift (`paletteid` / `paletteId` / `palette`), containers are
//! sometimes arrays and sometimes keyed objects. This crate reads it tolerantly
//! and exposes stable typed results.
//!
//! ## Layers
//!
//! - `catalog` → loads and caches the raw document (only storage access)
//! - `lookup` / `normalize` → schema-tolerant extraction
//! - `query` → the read façade with per-operation freshness caches
//! - `codec` → canonical figure strings
//! - `randomizer` → plausible random compositions
//! - `render` → option contract of the external imager
//!
//! ## Architectural Constraints
//!
//! - NO async, NO network dependencies (pure Rust)
//! - Structural gaps in the catalog yield empty results, never errors
//! - Randomness is injected through [`Draw`]

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod codec;
pub mod lookup;
pub mod normalize;
pub mod primitives;
pub mod query;
pub mod randomizer;
pub mod render;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Composition, FigurePart, Gender, PaletteColor, SetInfo, SetTypeInfo, WardrobeError,
    club_label,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use catalog::{
    CatalogSource, CatalogStore, Clock, FileSource, ManualClock, MemorySource, RawCatalog,
    SharedClock, SystemClock,
};
pub use codec::{encode, is_well_formed};
pub use query::{QueryTtls, Wardrobe};
pub use randomizer::{Draw, Randomizer, RandomizerConfig, RngDraw, generate};
pub use render::{ImageFormat, ImageSize, RenderOptions, RenderRequest};
