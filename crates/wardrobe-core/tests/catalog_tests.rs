//! # Catalog Tests
//!
//! End-to-end checks over a catalog file on disk.
//!
//! ## Groups
//! - Loading: file source, freshness window, error mapping
//! - Queries: the worked example and schema drift
//! - Randomizer: compositions built from a real catalog

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use wardrobe_core::{
    CatalogStore, FigurePart, FileSource, Gender, ManualClock, QueryTtls, Wardrobe, WardrobeError,
};

const FIGUREDATA: &str = r#"{
    "figuredata": {
        "settypes": [
            { "type": "hd", "paletteid": 1, "mandatory": 1,
              "sets": [{ "id": 100, "gender": "U", "selectable": 1 }] },
            { "type": "ch", "paletteId": "3",
              "sets": { "210": { "id": 210, "gender": "M", "selectable": true,
                                 "parts": [{ "colorindex": 1 }, { "colorindex": 2 }] },
                        "211": { "id": 211, "gender": "F", "selectable": true } } },
            { "type": "lg", "palette": 3, "sets": [{ "setId": 270, "selectable": "true" }] },
            { "type": "sh", "paletteid": 3, "sets": [{ "id": 290, "isSelectable": 1 }] }
        ],
        "palettes": [
            { "id": 1, "colors": [{ "id": 5, "index": 0, "selectable": 1, "hexCode": "FFCB98" }] },
            { "id": 3, "colors": { "62": { "id": 62, "index": 1 }, "66": { "id": 66, "index": 0 } } }
        ]
    }
}"#;

fn catalog_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write");
    file.flush().expect("flush");
    file
}

fn wardrobe_for(file: &NamedTempFile) -> (Wardrobe, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let store = CatalogStore::new(FileSource::new(Some(file.path().to_path_buf())))
        .with_clock(clock.clone());
    (Wardrobe::new(store), clock)
}

// =============================================================================
// LOADING
// =============================================================================

mod loading {
    use super::*;

    #[test]
    fn file_catalog_is_loaded() {
        let file = catalog_file(FIGUREDATA);
        let (wardrobe, _) = wardrobe_for(&file);

        let types = wardrobe.list_set_types().expect("types");
        let keys: Vec<&str> = types.iter().map(|t| t.set_type.as_str()).collect();
        assert_eq!(keys, vec!["ch", "hd", "lg", "sh"]);
        assert!(wardrobe.store().loaded_at().is_some());
    }

    #[test]
    fn file_changes_invisible_until_expiry() {
        let file = catalog_file(FIGUREDATA);
        let (wardrobe, clock) = wardrobe_for(&file);
        let no_cache = QueryTtls {
            set_types: Duration::ZERO,
            sets: Duration::ZERO,
            palette: Duration::ZERO,
        };
        let wardrobe = wardrobe.with_ttls(no_cache);
        assert_eq!(wardrobe.list_set_types().expect("types").len(), 4);

        std::fs::write(file.path(), r#"{ "settypes": [{ "type": "hr" }] }"#).expect("rewrite");
        assert_eq!(wardrobe.list_set_types().expect("types").len(), 4);

        clock.advance(Duration::from_secs(10 * 60));
        let types = wardrobe.list_set_types().expect("types");
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].set_type, "hr");
    }

    #[test]
    fn invalidate_picks_up_new_file_content() {
        let file = catalog_file(FIGUREDATA);
        let (wardrobe, _) = wardrobe_for(&file);
        wardrobe.list_set_types().expect("types");

        std::fs::write(file.path(), "{}").expect("rewrite");
        wardrobe.invalidate();
        assert!(wardrobe.list_set_types().expect("types").is_empty());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let file = catalog_file("<figuredata/>");
        let (wardrobe, _) = wardrobe_for(&file);
        let err = wardrobe.list_palette_colors(1).expect_err("parse error");
        assert!(matches!(err, WardrobeError::Parse(_)));
    }

    #[test]
    fn removed_file_is_read_error_after_expiry() {
        let file = catalog_file(FIGUREDATA);
        let path = file.path().to_path_buf();
        let (wardrobe, clock) = wardrobe_for(&file);
        wardrobe.list_set_types().expect("types");

        drop(file);
        assert!(!path.exists());
        wardrobe.list_set_types().expect("still cached");

        clock.advance(Duration::from_secs(60 * 60));
        assert!(matches!(wardrobe.list_set_types(), Err(WardrobeError::SourceRead(_))));
    }

    #[test]
    fn unconfigured_path_is_config_error() {
        let wardrobe = Wardrobe::new(CatalogStore::new(FileSource::new(None)));
        assert!(matches!(wardrobe.list_set_types(), Err(WardrobeError::Config(_))));
    }
}

// =============================================================================
// QUERIES
// =============================================================================

mod queries {
    use super::*;

    #[test]
    fn worked_example_encodes_head() {
        let file = catalog_file(FIGUREDATA);
        let (wardrobe, _) = wardrobe_for(&file);

        let head = wardrobe.list_sets("hd", Gender::Male).expect("sets");
        assert_eq!(head.len(), 1);
        let colors = wardrobe.list_palette_colors(1).expect("palette");
        assert_eq!(colors[0].css_hex().as_deref(), Some("#FFCB98"));

        let part = FigurePart::new("hd", head[0].id, vec![colors[0].id]);
        assert_eq!(wardrobe.encode_figure(&[part]), "hd-100-5");
    }

    #[test]
    fn drifted_field_names_resolve() {
        let file = catalog_file(FIGUREDATA);
        let (wardrobe, _) = wardrobe_for(&file);

        let types = wardrobe.list_set_types().expect("types");
        let palette_of = |t: &str| types.iter().find(|s| s.set_type == t).and_then(|s| s.palette_id);
        assert_eq!(palette_of("ch"), Some(3));
        assert_eq!(palette_of("lg"), Some(3));

        let legs = wardrobe.list_sets("lg", Gender::Unisex).expect("sets");
        assert_eq!(legs[0].id, 270);
        assert!(legs[0].selectable);
        assert!(wardrobe.list_sets("sh", Gender::Unisex).expect("sets")[0].selectable);
    }

    #[test]
    fn keyed_palette_sorted_by_index() {
        let file = catalog_file(FIGUREDATA);
        let (wardrobe, _) = wardrobe_for(&file);

        let ids: Vec<i64> = wardrobe
            .list_palette_colors(3)
            .expect("palette")
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![66, 62]);
    }

    #[test]
    fn sets_filtered_by_gender() {
        let file = catalog_file(FIGUREDATA);
        let (wardrobe, _) = wardrobe_for(&file);

        let male = wardrobe.list_sets("ch", Gender::Male).expect("sets");
        assert_eq!(male.iter().map(|s| s.id).collect::<Vec<_>>(), vec![210]);
        assert_eq!(male[0].colors_count, 2);

        let all = wardrobe.list_sets("ch", Gender::Unisex).expect("sets");
        assert_eq!(all.len(), 2);
    }
}

// =============================================================================
// RANDOMIZER
// =============================================================================

mod randomizer {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use wardrobe_core::RngDraw;

    #[test]
    fn random_female_avatar_is_complete() {
        let file = catalog_file(FIGUREDATA);
        let (wardrobe, _) = wardrobe_for(&file);
        let mut draw = RngDraw(ChaCha8Rng::seed_from_u64(11));

        for _ in 0..20 {
            let composition = wardrobe
                .random_composition(Gender::Female, None, &mut draw)
                .expect("random");
            assert_eq!(composition.get("ch").map(|p| p.set_id), Some(211));
            assert_eq!(composition.get("hd").map(|p| p.colors.clone()), Some(vec![5]));
            assert!(composition.contains("lg"));
            assert!(composition.contains("sh"));
        }
    }

    #[test]
    fn preferred_types_override_config() {
        let file = catalog_file(FIGUREDATA);
        let (wardrobe, _) = wardrobe_for(&file);
        let preferred = vec!["lg".to_string()];
        let mut draw = RngDraw(ChaCha8Rng::seed_from_u64(5));

        let composition = wardrobe
            .random_composition(Gender::Male, Some(&preferred), &mut draw)
            .expect("random");
        // baseline categories are still forced in
        assert_eq!(composition.len(), 4);
    }
}
