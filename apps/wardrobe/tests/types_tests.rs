//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use wardrobe::api::{
    ErrorResponse, FigureRequest, HealthResponse, ImagerErrorResponse, PaletteQuery,
    RandomRequest, RandomResponse, SetsQuery, render_request, status_for,
};
use wardrobe_core::primitives::DEFAULT_MAX_DIRECTION;
use wardrobe_core::{Composition, FigurePart, Gender, ImageFormat, WardrobeError};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

// =============================================================================
// QUERY STRING TESTS
// =============================================================================

#[test]
fn test_sets_query_gender_defaults_to_unisex() {
    let query: SetsQuery = serde_json::from_str(r#"{"type":"hd"}"#).unwrap();
    assert_eq!(query.set_type().unwrap(), "hd");
    assert_eq!(query.gender(), Gender::Unisex);
}

#[test]
fn test_sets_query_gender_is_lenient() {
    for (raw, expected) in [
        ("m", Gender::Male),
        ("FEMALE", Gender::Female),
        ("x", Gender::Unisex),
    ] {
        let query = SetsQuery {
            set_type: Some("hd".to_string()),
            gender: Some(raw.to_string()),
        };
        assert_eq!(query.gender(), expected, "gender {raw}");
    }
}

#[test]
fn test_sets_query_blank_type_rejected() {
    let query = SetsQuery {
        set_type: Some(" ".to_string()),
        gender: None,
    };
    assert!(matches!(query.set_type(), Err(WardrobeError::InvalidRequest(m)) if m == "missing type"));
}

#[test]
fn test_palette_query_id() {
    let query = |id: Option<&str>| PaletteQuery {
        id: id.map(str::to_string),
    };
    assert_eq!(query(Some(" 7 ")).palette_id().unwrap(), 7);
    assert!(query(None).palette_id().is_err());
    assert!(query(Some("0")).palette_id().is_err());
    assert!(query(Some("1.5")).palette_id().is_err());
}

// =============================================================================
// FIGURE / RANDOM TESTS
// =============================================================================

#[test]
fn test_figure_request_deserialization() {
    let json = r#"{"parts":[{"type":"hd","setId":180,"colors":[1]},{"type":"ha","setId":1002}]}"#;
    let request: FigureRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.parts.len(), 2);
    assert_eq!(request.parts[0], FigurePart::new("hd", 180, vec![1]));
    assert!(request.parts[1].colors.is_empty());
}

#[test]
fn test_random_request_all_optional() {
    let request: RandomRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(request.gender(), Gender::Unisex);
    assert!(request.preferred_types.is_none());

    let request: RandomRequest =
        serde_json::from_str(r#"{"gender":"F","preferredTypes":["hr","ha"]}"#).unwrap();
    assert_eq!(request.gender(), Gender::Female);
    assert_eq!(request.preferred_types.unwrap(), vec!["hr", "ha"]);
}

#[test]
fn test_random_response_from_composition() {
    let composition: Composition = [
        FigurePart::new("lg", 270, vec![82]),
        FigurePart::new("hd", 180, vec![1]),
    ]
    .into_iter()
    .collect();

    let response = RandomResponse::from(composition);
    assert_eq!(response.figure, "hd-180-1.lg-270-82");
    assert_eq!(response.parts[0].set_type, "hd");

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["parts"][1]["setId"], 270);
}

// =============================================================================
// ERROR TESTS
// =============================================================================

#[test]
fn test_error_status_mapping() {
    let cases = [
        (WardrobeError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
        (WardrobeError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (WardrobeError::SourceRead("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (WardrobeError::Parse("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (WardrobeError::upstream_render(500, "boom"), StatusCode::BAD_GATEWAY),
        (WardrobeError::UpstreamUnavailable("x".into()), StatusCode::BAD_GATEWAY),
    ];
    for (err, status) in cases {
        assert_eq!(status_for(&err), status, "{err}");
    }
}

#[test]
fn test_error_response_serialization() {
    let json = serde_json::to_string(&ErrorResponse::new("missing id")).unwrap();
    assert_eq!(json, r#"{"error":"missing id"}"#);
}

#[test]
fn test_imager_error_serialization() {
    let json = serde_json::to_value(ImagerErrorResponse::rejected(404, "not found")).unwrap();
    assert_eq!(json["error"], "imager_error");
    assert_eq!(json["status"], 404);
    assert_eq!(json["detail"], "not found");

    let json = serde_json::to_string(&ImagerErrorResponse::unreachable()).unwrap();
    assert_eq!(json, r#"{"error":"imager_unreachable"}"#);
}

// =============================================================================
// RENDER REQUEST TESTS
// =============================================================================

#[test]
fn test_render_request_from_params() {
    let params = [
        ("figure", "hd-180-1"),
        ("format", "gif"),
        ("head_direction", "6"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let request = render_request(&params, DEFAULT_MAX_DIRECTION).unwrap();
    assert_eq!(request.figure(), "hd-180-1");
    assert_eq!(request.options().format, ImageFormat::Gif);
    assert_eq!(request.options().direction, 2);
    assert_eq!(request.options().effective_head_direction(), 6);
}

#[test]
fn test_render_request_honours_direction_limit() {
    let params = [("figure", "hd-180-1"), ("direction", "5")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    assert_eq!(render_request(&params, DEFAULT_MAX_DIRECTION).unwrap().options().direction, 5);
    assert!(matches!(
        render_request(&params, 2),
        Err(WardrobeError::InvalidRequest(_))
    ));
}

#[test]
fn test_render_request_requires_figure() {
    let params = [("figure".to_string(), " ".to_string())].into_iter().collect();
    assert!(matches!(
        render_request(&params, DEFAULT_MAX_DIRECTION),
        Err(WardrobeError::InvalidRequest(m)) if m == "missing figure"
    ));
}
