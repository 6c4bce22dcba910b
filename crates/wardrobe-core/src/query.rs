//! # Query Façade
//!
//! The three read operations of Wardrobe, composed from the catalog store and
//! the schema normalizer:
//!
//! - `list_set_types()`
//! - `list_sets(type, gender)`
//! - `list_palette_colors(palette_id)`
//!
//! Each operation keeps its own freshness cache on top of the catalog store's
//! cache. Loading failures propagate unchanged and are never cached.
//!
//! Cache keys come from callers, so only non-empty results are stored: a
//! category or palette the catalog does not contain never takes a slot.
//! Storing a result also drops every expired entry.

use crate::catalog::{CatalogStore, SharedClock};
use crate::primitives::{PALETTE_TTL, SET_TYPES_TTL, SETS_TTL};
use crate::randomizer::{Draw, Randomizer};
use crate::{
    Composition, FigurePart, Gender, PaletteColor, SetInfo, SetTypeInfo, WardrobeError, codec,
    normalize,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// =============================================================================
// FRESHNESS WINDOWS
// =============================================================================

/// Freshness window of each query operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTtls {
    pub set_types: Duration,
    pub sets: Duration,
    pub palette: Duration,
}

impl Default for QueryTtls {
    fn default() -> Self {
        Self {
            set_types: SET_TYPES_TTL,
            sets: SETS_TTL,
            palette: PALETTE_TTL,
        }
    }
}

// =============================================================================
// RESULT CACHE
// =============================================================================

/// Keyed result cache with per-entry timestamps.
struct ResultCache<K, T> {
    entries: Mutex<BTreeMap<K, (Instant, Vec<T>)>>,
}

impl<K: Ord, T: Clone> ResultCache<K, T> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    fn get(&self, key: &K, now: Instant, ttl: Duration) -> Option<Vec<T>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|(at, _)| now.saturating_duration_since(*at) < ttl)
            .map(|(_, v)| v.clone())
    }

    fn put(&self, key: K, value: Vec<T>, now: Instant, ttl: Duration) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, (at, _)| now.saturating_duration_since(*at) < ttl);
        if !value.is_empty() {
            entries.insert(key, (now, value));
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}

// =============================================================================
// FAÇADE
// =============================================================================

/// Read façade over one catalog.
pub struct Wardrobe {
    store: CatalogStore,
    clock: SharedClock,
    ttls: QueryTtls,
    randomizer: Randomizer,
    set_types: ResultCache<(), SetTypeInfo>,
    sets: ResultCache<(String, Gender), SetInfo>,
    palettes: ResultCache<i64, PaletteColor>,
}

impl Wardrobe {
    /// Create a façade sharing the store's clock.
    #[must_use]
    pub fn new(store: CatalogStore) -> Self {
        let clock = store.clock();
        Self {
            store,
            clock,
            ttls: QueryTtls::default(),
            randomizer: Randomizer::default(),
            set_types: ResultCache::new(),
            sets: ResultCache::new(),
            palettes: ResultCache::new(),
        }
    }

    /// Replace the per-operation freshness windows.
    #[must_use]
    pub fn with_ttls(mut self, ttls: QueryTtls) -> Self {
        self.ttls = ttls;
        self
    }

    /// Replace the randomizer heuristics.
    #[must_use]
    pub fn with_randomizer(mut self, randomizer: Randomizer) -> Self {
        self.randomizer = randomizer;
        self
    }

    #[must_use]
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    #[must_use]
    pub fn randomizer(&self) -> &Randomizer {
        &self.randomizer
    }

    fn cached<K: Ord, T: Clone>(
        &self,
        cache: &ResultCache<K, T>,
        key: K,
        ttl: Duration,
        compute: impl FnOnce(&Value) -> Vec<T>,
    ) -> Result<Vec<T>, WardrobeError> {
        let now = self.clock.now();
        if let Some(hit) = cache.get(&key, now, ttl) {
            return Ok(hit);
        }

        let raw = self.store.load()?;
        let value = compute(raw.as_ref());
        cache.put(key, value.clone(), now, ttl);
        Ok(value)
    }

    /// All categories, sorted by key.
    pub fn list_set_types(&self) -> Result<Vec<SetTypeInfo>, WardrobeError> {
        self.cached(&self.set_types, (), self.ttls.set_types, normalize::set_types)
    }

    /// Items of one category visible to `gender`. Unknown categories are empty.
    pub fn list_sets(&self, set_type: &str, gender: Gender) -> Result<Vec<SetInfo>, WardrobeError> {
        self.cached(
            &self.sets,
            (set_type.to_string(), gender),
            self.ttls.sets,
            |raw| normalize::sets_for_type(raw, set_type, gender),
        )
    }

    /// Colors of one palette. Unknown palettes are empty.
    pub fn list_palette_colors(&self, palette_id: i64) -> Result<Vec<PaletteColor>, WardrobeError> {
        self.cached(&self.palettes, palette_id, self.ttls.palette, |raw| {
            normalize::palette_colors(raw, palette_id)
        })
    }

    /// Canonical figure string of `parts`.
    #[must_use]
    pub fn encode_figure(&self, parts: &[FigurePart]) -> String {
        codec::encode(parts)
    }

    /// Generate a random avatar from the current catalog.
    ///
    /// `preferred` falls back to the randomizer's configured order. Only the
    /// categories and palettes the randomizer may touch are queried.
    pub fn random_composition(
        &self,
        gender: Gender,
        preferred: Option<&[String]>,
        draw: &mut dyn Draw,
    ) -> Result<Composition, WardrobeError> {
        let config = self.randomizer.config();
        let preferred = preferred.unwrap_or(config.preferred.as_slice());
        let set_types = self.list_set_types()?;

        let mut wanted = self.randomizer.candidates(&set_types, preferred);
        wanted.extend(config.baseline.iter().cloned());

        let mut sets_by_type = BTreeMap::new();
        let mut palette_by_id = BTreeMap::new();
        for info in set_types.iter().filter(|s| wanted.contains(&s.set_type)) {
            if !sets_by_type.contains_key(&info.set_type) {
                sets_by_type.insert(info.set_type.clone(), self.list_sets(&info.set_type, gender)?);
            }
            if let Some(id) = info.palette_id {
                if !palette_by_id.contains_key(&id) {
                    palette_by_id.insert(id, self.list_palette_colors(id)?);
                }
            }
        }

        let composition = self.randomizer.generate(
            gender,
            &set_types,
            &sets_by_type,
            &palette_by_id,
            preferred,
            draw,
        );
        tracing::debug!(
            gender = %gender,
            parts = composition.len(),
            figure = %composition.figure_string(),
            "random composition generated"
        );
        Ok(composition)
    }

    /// Number of cached query results across all operations.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.set_types.len() + self.sets.len() + self.palettes.len()
    }

    /// Drop every cached result and the cached catalog.
    pub fn invalidate(&self) {
        self.set_types.clear();
        self.sets.clear();
        self.palettes.clear();
        self.store.invalidate();
        tracing::info!("catalog caches invalidated");
    }
}

// =============================================================================
// TESTS
// =============================================================================
