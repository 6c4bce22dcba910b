//! # Figure Codec
//!
//! Canonical serialization of a composition into a figure string:
//!
//! ```text
//! type-setId-color[-color2].type-setId-color...
//! ```
//!
//! - Parts whose type is not ASCII alphanumeric, or whose set id is not
//!   positive, are dropped
//! - Non-positive colors are dropped; a part left without colors gets `0`
//! - Parts are sorted by type, then set id, then colors, so input order
//!   never changes the output
//!
//! Encoding is one-way. `is_well_formed` only checks the grammar.

use crate::FigurePart;
use crate::primitives::PLACEHOLDER_COLOR;

/// Encode parts into the canonical figure string.
pub fn encode<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a FigurePart>,
{
    let mut clean: Vec<(&str, i64, Vec<i64>)> = parts
        .into_iter()
        .filter(|p| is_type_code(&p.set_type) && p.set_id > 0)
        .map(|p| {
            let colors: Vec<i64> = p.colors.iter().copied().filter(|&c| c > 0).collect();
            (p.set_type.as_str(), p.set_id, colors)
        })
        .collect();

    clean.sort();

    clean
        .into_iter()
        .map(|(set_type, set_id, colors)| {
            let colors = if colors.is_empty() {
                vec![PLACEHOLDER_COLOR]
            } else {
                colors
            };
            let mut fields = vec![set_type.to_string(), set_id.to_string()];
            fields.extend(colors.iter().map(i64::to_string));
            fields.join("-")
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Whether `figure` follows the figure-string grammar.
///
/// Every part needs a type, a numeric set id and at least one numeric color.
#[must_use]
pub fn is_well_formed(figure: &str) -> bool {
    !figure.is_empty() && figure.split('.').all(is_well_formed_part)
}

fn is_well_formed_part(part: &str) -> bool {
    let mut fields = part.split('-');
    let type_ok = fields.next().is_some_and(is_type_code);
    let set_ok = fields.next().is_some_and(is_number);

    let mut colors = 0usize;
    for field in fields {
        if !is_number(field) {
            return false;
        }
        colors += 1;
    }

    type_ok && set_ok && colors > 0
}

fn is_type_code(set_type: &str) -> bool {
    !set_type.is_empty() && set_type.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_number(field: &str) -> bool {
    !field.is_empty() && field.chars().all(|c| c.is_ascii_digit())
}

// =============================================================================
// TESTS
// =============================================================================
