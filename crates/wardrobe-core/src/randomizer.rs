//! # Randomizer
//!
//! Builds a plausible complete avatar from normalized catalog data.
//!
//! 1. Candidates: mandatory categories, then the preferred order, deduplicated
//!    and restricted to categories present in the catalog.
//! 2. Baseline categories (head, torso, legs, shoes) and mandatory ones are
//!    always included; other categories pass an independent probability draw.
//! 3. Items and colors are picked uniformly among selectable entries.
//! 4. Baseline categories missed by the main pass are forced in.
//! 5. A head left with the placeholder color gets skin tone 1.
//!
//! Output is intentionally non-deterministic; the [`Draw`] source is injected
//! so tests can script it.

use crate::primitives::{
    BASELINE_TYPES, DEFAULT_PREFERRED_TYPES, DEFAULT_PROBABILITY, FAVOURED_PROBABILITY,
    FAVOURED_TYPES, HEAD_FALLBACK_COLOR, HEAD_TYPE, PLACEHOLDER_COLOR,
};
use crate::{Composition, FigurePart, Gender, PaletteColor, SetInfo, SetTypeInfo};
use rand::Rng;
use rand::rngs::ThreadRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// DRAW SOURCE
// =============================================================================

/// Source of uniform random decisions.
pub trait Draw {
    /// Uniform index in `0..len`. Callers never pass `0`.
    fn index(&mut self, len: usize) -> usize;

    /// `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool;
}

/// [`Draw`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngDraw<R>(pub R);

impl RngDraw<ThreadRng> {
    /// Draw from the thread-local generator.
    #[must_use]
    pub fn thread() -> Self {
        Self(rand::rng())
    }
}

impl<R: Rng> Draw for RngDraw<R> {
    fn index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }

    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            false
        } else if probability >= 1.0 {
            true
        } else {
            self.0.random_bool(probability)
        }
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Category heuristics. Defaults come from `primitives`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizerConfig {
    /// Categories every avatar needs.
    pub baseline: Vec<String>,
    /// Optional categories drawn with `favoured_probability`.
    pub favoured: Vec<String>,
    pub favoured_probability: f64,
    /// Inclusion probability of the remaining optional categories.
    pub default_probability: f64,
    /// Visiting order used when the caller has no preference.
    pub preferred: Vec<String>,
}

impl Default for RandomizerConfig {
    fn default() -> Self {
        Self {
            baseline: to_owned(BASELINE_TYPES),
            favoured: to_owned(FAVOURED_TYPES),
            favoured_probability: FAVOURED_PROBABILITY,
            default_probability: DEFAULT_PROBABILITY,
            preferred: to_owned(DEFAULT_PREFERRED_TYPES),
        }
    }
}

fn to_owned(types: &[&str]) -> Vec<String> {
    types.iter().map(|t| (*t).to_string()).collect()
}

impl RandomizerConfig {
    fn is_baseline(&self, set_type: &str) -> bool {
        self.baseline.iter().any(|t| t == set_type)
    }

    fn inclusion_probability(&self, set_type: &str) -> f64 {
        if self.favoured.iter().any(|t| t == set_type) {
            self.favoured_probability
        } else {
            self.default_probability
        }
    }
}

// =============================================================================
// GENERATION
// =============================================================================

/// Avatar generator with configurable heuristics.
#[derive(Debug, Clone, Default)]
pub struct Randomizer {
    config: RandomizerConfig,
}

impl Randomizer {
    #[must_use]
    pub fn new(config: RandomizerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RandomizerConfig {
        &self.config
    }

    /// Categories the main pass visits, in order.
    #[must_use]
    pub fn candidates(&self, set_types: &[SetTypeInfo], preferred: &[String]) -> Vec<String> {
        let present: BTreeSet<&str> = set_types.iter().map(|s| s.set_type.as_str()).collect();
        let mut seen = BTreeSet::new();

        set_types
            .iter()
            .filter(|s| s.mandatory)
            .map(|s| s.set_type.as_str())
            .chain(preferred.iter().map(String::as_str))
            .filter(|t| present.contains(t))
            .filter(|t| seen.insert(*t))
            .map(str::to_string)
            .collect()
    }

    /// Generate a composition.
    ///
    /// `sets_by_type` and `palette_by_id` only need entries for the categories
    /// and palettes the candidates reference; missing entries count as empty.
    pub fn generate(
        &self,
        gender: Gender,
        set_types: &[SetTypeInfo],
        sets_by_type: &BTreeMap<String, Vec<SetInfo>>,
        palette_by_id: &BTreeMap<i64, Vec<PaletteColor>>,
        preferred: &[String],
        draw: &mut dyn Draw,
    ) -> Composition {
        let by_type: BTreeMap<&str, &SetTypeInfo> = set_types
            .iter()
            .map(|s| (s.set_type.as_str(), s))
            .rev()
            .collect();
        let mut composition = Composition::new();

        for set_type in self.candidates(set_types, preferred) {
            let Some(info) = by_type.get(set_type.as_str()) else {
                continue;
            };
            let sets = selectable_sets(sets_by_type, &set_type, gender);
            if sets.is_empty() {
                continue;
            }

            let required = info.mandatory || self.config.is_baseline(&set_type);
            if !required && !draw.chance(self.config.inclusion_probability(&set_type)) {
                continue;
            }

            let chosen = sets[draw.index(sets.len())];
            let colors = selectable_colors(palette_by_id, info);
            let mut picked = vec![pick_color(&colors, draw)];
            if chosen.colors_count >= 2 && !colors.is_empty() {
                picked.push(pick_color(&colors, draw));
            }

            composition.insert(FigurePart::new(set_type.as_str(), chosen.id, picked));
        }

        for set_type in &self.config.baseline {
            if composition.contains(set_type) {
                continue;
            }
            let Some(info) = by_type.get(set_type.as_str()) else {
                continue;
            };
            let sets = selectable_sets(sets_by_type, set_type, gender);
            if sets.is_empty() {
                continue;
            }

            tracing::debug!(set_type = %set_type, "forcing baseline category");
            let chosen = sets[draw.index(sets.len())];
            let colors = selectable_colors(palette_by_id, info);
            let color = pick_color(&colors, draw);
            composition.insert(FigurePart::new(set_type.as_str(), chosen.id, vec![color]));
        }

        if let Some(first) = composition
            .get_mut(HEAD_TYPE)
            .and_then(|head| head.colors.first_mut())
        {
            if *first == PLACEHOLDER_COLOR {
                *first = HEAD_FALLBACK_COLOR;
            }
        }

        composition
    }
}

/// Generate a composition with the default heuristics.
pub fn generate(
    gender: Gender,
    set_types: &[SetTypeInfo],
    sets_by_type: &BTreeMap<String, Vec<SetInfo>>,
    palette_by_id: &BTreeMap<i64, Vec<PaletteColor>>,
    preferred: &[String],
    draw: &mut dyn Draw,
) -> Composition {
    Randomizer::default().generate(gender, set_types, sets_by_type, palette_by_id, preferred, draw)
}

fn selectable_sets<'a>(
    sets_by_type: &'a BTreeMap<String, Vec<SetInfo>>,
    set_type: &str,
    gender: Gender,
) -> Vec<&'a SetInfo> {
    sets_by_type
        .get(set_type)
        .map(|sets| {
            sets.iter()
                .filter(|s| s.selectable && gender.admits(s.gender))
                .collect()
        })
        .unwrap_or_default()
}

fn selectable_colors<'a>(
    palette_by_id: &'a BTreeMap<i64, Vec<PaletteColor>>,
    info: &SetTypeInfo,
) -> Vec<&'a PaletteColor> {
    info.palette_id
        .and_then(|id| palette_by_id.get(&id))
        .map(|colors| colors.iter().filter(|c| c.is_selectable()).collect())
        .unwrap_or_default()
}

fn pick_color(colors: &[&PaletteColor], draw: &mut dyn Draw) -> i64 {
    if colors.is_empty() {
        PLACEHOLDER_COLOR
    } else {
        colors[draw.index(colors.len())].id
    }
}

// =============================================================================
// TESTS
// =============================================================================
