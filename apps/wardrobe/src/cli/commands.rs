//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::Settings;
use wardrobe_core::{FigurePart, Gender, RngDraw, WardrobeError, club_label, encode};

// =============================================================================
// PART TOKENS
// =============================================================================

/// Parse a `type-setId-color[-color2...]` token.
///
/// Colors may be omitted; the codec then writes the placeholder.
pub fn parse_part_token(token: &str) -> Result<FigurePart, WardrobeError> {
    let invalid = || {
        WardrobeError::InvalidRequest(format!(
            "invalid part '{}', expected type-setId-color[-color2]",
            token
        ))
    };

    let mut fields = token.trim().split('-');
    let set_type = fields
        .next()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(invalid)?;
    let set_id = fields
        .next()
        .and_then(|f| f.trim().parse::<i64>().ok())
        .ok_or_else(invalid)?;
    let colors = fields
        .map(|f| f.trim().parse::<i64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FigurePart::new(set_type, set_id, colors))
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(settings: &Settings) -> Result<(), WardrobeError> {
    let catalog = settings
        .catalog
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<not configured>".to_string());
    let imager = settings.imager.url.as_deref().unwrap_or("<not configured>");

    println!("Wardrobe Avatar Catalog Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:  {}", settings.server.addr());
    println!("  Catalog:  {}", catalog);
    println!("  Imager:   {}", imager);
    println!();
    println!("Endpoints:");
    println!("  GET  /api/settypes - List categories");
    println!("  GET  /api/sets     - List items of a category");
    println!("  GET  /api/palette  - List palette colors");
    println!("  POST /api/figure   - Encode a figure string");
    println!("  POST /api/random   - Random avatar");
    println!("  GET  /api/render   - Render through the imager");
    println!("  GET  /health       - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(settings).await
}

// =============================================================================
// CATALOG COMMANDS
// =============================================================================

/// List all categories.
pub fn cmd_set_types(settings: &Settings, json: bool) -> Result<(), WardrobeError> {
    let set_types = settings.wardrobe().list_set_types()?;

    if json {
        print_json(&serde_json::json!({ "setTypes": set_types }));
        return Ok(());
    }

    println!("Categories ({})", set_types.len());
    println!("==========");
    for info in &set_types {
        let palette = info
            .palette_id
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mandatory = if info.mandatory { "mandatory" } else { "" };
        println!("  {:<4} palette {:<6} {}", info.set_type, palette, mandatory);
    }

    Ok(())
}

/// List the items of one category.
pub fn cmd_sets(
    settings: &Settings,
    json: bool,
    set_type: &str,
    gender: &str,
) -> Result<(), WardrobeError> {
    let gender = Gender::parse(gender);
    let sets = settings.wardrobe().list_sets(set_type, gender)?;

    if json {
        print_json(&serde_json::json!({ "sets": sets }));
        return Ok(());
    }

    println!("Items of '{}' for gender {} ({})", set_type, gender, sets.len());
    println!("==========");
    for set in &sets {
        let selectable = if set.selectable { "" } else { "hidden" };
        println!(
            "  {:<6} {} colors={} {:<4} {}",
            set.id,
            set.gender,
            set.colors_count,
            club_label(set.club),
            selectable
        );
    }

    Ok(())
}

/// List the colors of one palette.
pub fn cmd_palette(settings: &Settings, json: bool, palette_id: i64) -> Result<(), WardrobeError> {
    let colors = settings.wardrobe().list_palette_colors(palette_id)?;

    if json {
        print_json(&serde_json::json!({ "colors": colors }));
        return Ok(());
    }

    println!("Palette {} ({} colors)", palette_id, colors.len());
    println!("==========");
    for color in &colors {
        let hex = color.css_hex().unwrap_or_else(|| "-".to_string());
        let selectable = if color.is_selectable() { "" } else { "hidden" };
        println!(
            "  {:<6} {:<9} {:<4} {}",
            color.id,
            hex,
            club_label(color.club.unwrap_or(0)),
            selectable
        );
    }

    Ok(())
}

// =============================================================================
// FIGURE COMMANDS
// =============================================================================

/// Encode part tokens into a figure string.
pub fn cmd_encode(json: bool, tokens: &[String]) -> Result<(), WardrobeError> {
    let parts = tokens
        .iter()
        .map(|t| parse_part_token(t))
        .collect::<Result<Vec<_>, _>>()?;
    let figure = encode(&parts);

    if json {
        print_json(&serde_json::json!({ "figure": figure }));
    } else {
        println!("{}", figure);
    }
    Ok(())
}

/// Generate a random avatar.
pub fn cmd_random(
    settings: &Settings,
    json: bool,
    gender: &str,
    types: Option<&[String]>,
) -> Result<(), WardrobeError> {
    let gender = Gender::parse(gender);
    let composition =
        settings
            .wardrobe()
            .random_composition(gender, types, &mut RngDraw::thread())?;

    if json {
        print_json(&serde_json::json!({
            "parts": composition.parts(),
            "figure": composition.figure_string(),
        }));
        return Ok(());
    }

    println!("Random avatar ({})", gender);
    println!("==========");
    for part in composition.parts() {
        let colors: Vec<String> = part.colors.iter().map(i64::to_string).collect();
        println!("  {:<4} {:<6} colors {}", part.set_type, part.set_id, colors.join(","));
    }
    println!();
    println!("{}", composition.figure_string());

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
