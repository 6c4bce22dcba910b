//! # Schema Normalizer
//!
//! Extracts typed query surfaces from a raw catalog document.
//!
//! - Every field is read through an ordered list of candidate keys
//! - Containers may be arrays or keyed objects
//! - Structural gaps yield empty results, never errors
//!
//! These functions are pure: the caller supplies the parsed document.

use crate::lookup::{Record, pick};
use crate::primitives::{
    CLUB_KEYS, COLOR_ID_KEYS, COLOR_INDEX_KEYS, COLOR_LIST_KEYS, COLOR_ORDER_KEYS,
    COLOR_SELECTABLE_KEYS, FIGUREDATA_KEYS, GENDER_KEYS, HEX_CODE_KEYS, MANDATORY_KEYS,
    PALETTE_ID_KEYS, PALETTE_LIST_KEYS, PALETTE_ROOT_KEYS, PART_LIST_KEYS, SET_ID_KEYS,
    SET_LIST_KEYS, SET_SELECTABLE_KEYS, SET_TYPE_KEY_KEYS, SET_TYPE_LIST_KEYS,
    SET_TYPE_PALETTE_KEYS, SET_TYPE_ROOT_KEYS,
};
use crate::{Gender, PaletteColor, SetInfo, SetTypeInfo};
use serde_json::Value;
use std::collections::BTreeSet;

// =============================================================================
// CONTAINER RESOLUTION
// =============================================================================

/// Locate a top-level container, either at the document root or under `figuredata`.
fn root<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    pick(raw, keys).or_else(|| pick(raw, FIGUREDATA_KEYS).and_then(|fd| pick(fd, keys)))
}

/// Records of a container that may wrap its list one level deeper.
fn records<'a>(raw: &'a Value, root_keys: &[&str], list_keys: &[&str]) -> Vec<Record<'a>> {
    let Some(container) = root(raw, root_keys) else {
        return Vec::new();
    };
    let list = pick(container, list_keys).unwrap_or(container);
    crate::lookup::as_sequence(Some(list))
        .into_iter()
        .map(Record)
        .collect()
}

fn set_type_records(raw: &Value) -> Vec<Record<'_>> {
    records(raw, SET_TYPE_ROOT_KEYS, SET_TYPE_LIST_KEYS)
}

fn palette_records(raw: &Value) -> Vec<Record<'_>> {
    records(raw, PALETTE_ROOT_KEYS, PALETTE_LIST_KEYS)
}

// =============================================================================
// SET TYPES
// =============================================================================

fn set_type_info(record: Record<'_>) -> SetTypeInfo {
    SetTypeInfo {
        set_type: record.text(SET_TYPE_KEY_KEYS),
        palette_id: record.opt_int(SET_TYPE_PALETTE_KEYS),
        mandatory: record.flag(MANDATORY_KEYS) || record.int(&MANDATORY_KEYS[..1], 0) == 1,
    }
}

/// All categories of the catalog.
///
/// Records without a key are dropped, duplicates keep their first occurrence,
/// and the result is sorted by category key.
#[must_use]
pub fn set_types(raw: &Value) -> Vec<SetTypeInfo> {
    let mut seen = BTreeSet::new();
    let mut out: Vec<SetTypeInfo> = set_type_records(raw)
        .into_iter()
        .map(set_type_info)
        .filter(|info| !info.set_type.is_empty())
        .filter(|info| seen.insert(info.set_type.clone()))
        .collect();

    out.sort_by(|a, b| a.set_type.cmp(&b.set_type));
    out
}

// =============================================================================
// SETS
// =============================================================================

/// Highest positive color-slot index among the item's parts, at least 1.
fn colors_count(item: Record<'_>) -> i64 {
    item.list(PART_LIST_KEYS)
        .into_iter()
        .map(|part| part.int(COLOR_INDEX_KEYS, 0))
        .filter(|&n| n > 0)
        .max()
        .unwrap_or(1)
        .max(1)
}

fn set_info(item: Record<'_>) -> SetInfo {
    SetInfo {
        id: item.int(SET_ID_KEYS, 0),
        gender: item.gender(GENDER_KEYS),
        club: item.int(CLUB_KEYS, 0),
        selectable: item.flag(SET_SELECTABLE_KEYS) || item.int(&SET_SELECTABLE_KEYS[..1], 0) == 1,
        colors_count: colors_count(item),
    }
}

/// Items of one category visible to `gender`.
///
/// An unknown category yields an empty list. Selectable items come first,
/// then ascending id.
#[must_use]
pub fn sets_for_type(raw: &Value, set_type: &str, gender: Gender) -> Vec<SetInfo> {
    let Some(category) = set_type_records(raw)
        .into_iter()
        .find(|r| r.text(SET_TYPE_KEY_KEYS) == set_type)
    else {
        return Vec::new();
    };

    let mut out: Vec<SetInfo> = category
        .list(SET_LIST_KEYS)
        .into_iter()
        .map(set_info)
        .filter(|s| s.id != 0)
        .filter(|s| gender.admits(s.gender))
        .collect();

    out.sort_by(|a, b| b.selectable.cmp(&a.selectable).then(a.id.cmp(&b.id)));
    out
}

// =============================================================================
// PALETTES
// =============================================================================

fn palette_color(record: Record<'_>) -> PaletteColor {
    PaletteColor {
        id: record.int(COLOR_ID_KEYS, 0),
        index: record.opt_int(COLOR_ORDER_KEYS),
        club: record.opt_int(CLUB_KEYS),
        selectable: record.opt_flag(COLOR_SELECTABLE_KEYS),
        hex_code: record.opt_text(HEX_CODE_KEYS),
    }
}

/// Colors of one palette, in display order.
///
/// An unknown palette yields an empty list; colors without an id are dropped.
#[must_use]
pub fn palette_colors(raw: &Value, palette_id: i64) -> Vec<PaletteColor> {
    let Some(palette) = palette_records(raw)
        .into_iter()
        .find(|r| r.int(PALETTE_ID_KEYS, 0) == palette_id)
    else {
        return Vec::new();
    };

    let mut out: Vec<PaletteColor> = palette
        .list(COLOR_LIST_KEYS)
        .into_iter()
        .map(palette_color)
        .filter(|c| c.id != 0)
        .collect();

    out.sort_by_key(PaletteColor::order);
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "settype": {
                "settypes": [
                    { "type": "hd", "paletteid": 1, "mandatory": "1",
                      "sets": [
                        { "id": 180, "gender": "M", "club": 0, "selectable": true,
                          "parts": [{ "colorindex": 1 }] },
                        { "id": 100, "gender": "U", "selectable": 1 }
                      ] },
                    { "type": "ch", "paletteId": 3, "mandatory": false,
                      "sets": {
                        "210": { "id": 210, "gender": "F", "selectable": "true",
                                 "parts": { "a": { "colorIndex": "2" }, "b": { "colorindex": 1 } } },
                        "215": { "id": 215, "gender": "M", "selectable": 0 },
                        "220": { "setId": 220, "sex": "female", "isSelectable": true, "clubLevel": 2 }
                      } },
                    { "type": "hd", "paletteid": 9 },
                    { "type": "  " },
                    { "name": "ca" }
                ]
            },
            "palette": {
                "palettes": [
                    { "id": 1, "colors": [
                        { "id": 5, "index": 2, "selectable": "1", "hexCode": "FFCB98" },
                        { "id": 6, "index": 1, "selectable": "0" },
                        { "id": 0, "index": 0 },
                        { "colorId": 4, "club": 2 }
                    ] },
                    { "paletteId": 3, "colours": { "x": { "id": 61 } } }
                ]
            }
        })
    }

    #[test]
    fn set_types_are_deduplicated_and_sorted() {
        let types = set_types(&sample());
        let keys: Vec<&str> = types.iter().map(|t| t.set_type.as_str()).collect();
        assert_eq!(keys, vec!["ca", "ch", "hd"]);

        let hd = &types[2];
        assert_eq!(hd.palette_id, Some(1));
        assert!(hd.mandatory);
        assert_eq!(types[0].palette_id, None);
        assert!(!types[1].mandatory);
    }

    #[test]
    fn sets_sorted_selectable_first_then_id() {
        let sets = sets_for_type(&sample(), "ch", Gender::Unisex);
        let ids: Vec<i64> = sets.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![210, 220, 215]);
    }

    #[test]
    fn colors_count_uses_highest_part_index() {
        let sets = sets_for_type(&sample(), "ch", Gender::Female);
        let by_id = |id| sets.iter().find(|s| s.id == id).expect("set present");
        assert_eq!(by_id(210).colors_count, 2);
        assert_eq!(by_id(220).colors_count, 1);
        assert_eq!(by_id(220).club, 2);
    }

    #[test]
    fn gender_filter_keeps_unisex() {
        let male = sets_for_type(&sample(), "hd", Gender::Male);
        assert_eq!(male.len(), 2);

        let female = sets_for_type(&sample(), "hd", Gender::Female);
        let ids: Vec<i64> = female.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![100]);
        assert!(female.iter().all(|s| s.gender != Gender::Male));
    }

    #[test]
    fn unknown_type_is_empty() {
        assert!(sets_for_type(&sample(), "zz", Gender::Unisex).is_empty());
        assert!(sets_for_type(&json!({}), "hd", Gender::Unisex).is_empty());
    }

    #[test]
    fn palette_sorted_by_index_then_id() {
        let colors = palette_colors(&sample(), 1);
        let ids: Vec<i64> = colors.iter().map(|c| c.id).collect();
        // 6 (index 1), 5 (index 2), 4 (no index, id 4 sorts after 2)
        assert_eq!(ids, vec![6, 5, 4]);
        assert_eq!(colors[1].hex_code.as_deref(), Some("FFCB98"));
        assert_eq!(colors[1].selectable, Some(true));
        assert_eq!(colors[0].selectable, Some(false));
        assert_eq!(colors[2].selectable, None);
        assert_eq!(colors[2].club, Some(2));
    }

    #[test]
    fn palette_keyed_colours_container() {
        let colors = palette_colors(&sample(), 3);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].id, 61);
    }

    #[test]
    fn unknown_palette_is_empty() {
        assert!(palette_colors(&sample(), 42).is_empty());
    }

    #[test]
    fn figuredata_wrapper_and_flat_list() {
        let raw = json!({
            "figuredata": {
                "setTypes": [{ "type": "lg", "palette": "3", "isMandatory": true }],
                "palettes": [{ "id": 3, "color": [{ "id": 1 }] }]
            }
        });
        let types = set_types(&raw);
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].palette_id, Some(3));
        assert!(types[0].mandatory);
        assert_eq!(palette_colors(&raw, 3).len(), 1);
    }

    #[test]
    fn numeric_strings_count_as_flags() {
        let raw = json!({
            "settypes": [{ "type": "sh", "mandatory": "1.0",
                           "sets": [{ "id": 3, "selectable": " 1 " }] }]
        });
        assert!(set_types(&raw)[0].mandatory);
        assert!(sets_for_type(&raw, "sh", Gender::Unisex)[0].selectable);
    }

    #[test]
    fn padded_flag_strings_only_count_through_numeric_fallback() {
        let raw = json!({
            "settypes": [{ "type": "sh", "isMandatory": " 1 ",
                           "sets": [{ "id": 3, "isSelectable": " 1 " }] }],
            "palettes": [{ "id": 1, "colors": [{ "id": 4, "selectable": " 1 " }] }]
        });
        // the integer fallback only reads the primary key
        assert!(!set_types(&raw)[0].mandatory);
        assert!(!sets_for_type(&raw, "sh", Gender::Unisex)[0].selectable);
        assert_eq!(palette_colors(&raw, 1)[0].selectable, Some(false));
    }

    #[test]
    fn malformed_containers_yield_empty() {
        let raw = json!({ "settype": 12, "palette": "nope" });
        assert!(set_types(&raw).is_empty());
        assert!(palette_colors(&raw, 1).is_empty());
        assert!(set_types(&json!([1, 2, 3])).is_empty());
    }
}
