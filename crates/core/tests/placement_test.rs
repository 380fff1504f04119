//! Tests for signature placement math: scaling, corner anchoring, and
//! the keyword-mode centering behavior.

use rubrica_core::placement::{
    Corner, EDGE_MARGIN, PageGeometry, Placement, PlacementConfig, compute_draw_instructions,
};

const PAGE: PageGeometry = PageGeometry {
    width: 600.0,
    height: 800.0,
};

fn config(placement: Placement, corner: Corner, size_percent: f64) -> PlacementConfig {
    PlacementConfig {
        placement,
        corner,
        size_percent,
    }
}

// ============================================================================
// Scaling
// ============================================================================

#[test]
fn test_size_percent_scales_width_and_preserves_aspect() {
    // 20% of a 600pt page with a 2:1 source image
    let instructions = compute_draw_instructions(
        PAGE,
        (300, 150),
        &config(Placement::Corners, Corner::BottomRight, 20.0),
    );
    assert_eq!(instructions.len(), 1);
    assert_eq!(instructions[0].width, 120.0);
    assert_eq!(instructions[0].height, 60.0);
}

#[test]
fn test_tall_signature_grows_downward_from_width() {
    let instructions = compute_draw_instructions(
        PAGE,
        (100, 400),
        &config(Placement::Corners, Corner::BottomLeft, 10.0),
    );
    assert_eq!(instructions[0].width, 60.0);
    assert_eq!(instructions[0].height, 240.0);
}

#[test]
fn test_degenerate_size_is_tolerated() {
    // no internal clamping: 0% yields a zero-width rectangle, not an error
    let zero = compute_draw_instructions(
        PAGE,
        (300, 150),
        &config(Placement::Corners, Corner::BottomRight, 0.0),
    );
    assert_eq!(zero[0].width, 0.0);
    assert_eq!(zero[0].height, 0.0);

    let oversized = compute_draw_instructions(
        PAGE,
        (300, 150),
        &config(Placement::Corners, Corner::BottomRight, 200.0),
    );
    assert_eq!(oversized[0].width, 1200.0);
}

// ============================================================================
// Corner anchoring
// ============================================================================

#[test]
fn test_bottom_left_anchors_at_margin() {
    let instructions = compute_draw_instructions(
        PAGE,
        (300, 150),
        &config(Placement::Corners, Corner::BottomLeft, 20.0),
    );
    assert_eq!(instructions.len(), 1);
    assert_eq!(instructions[0].x, EDGE_MARGIN);
    assert_eq!(instructions[0].y, EDGE_MARGIN);
}

#[test]
fn test_bottom_right_anchors_against_right_edge() {
    let instructions = compute_draw_instructions(
        PAGE,
        (300, 150),
        &config(Placement::Corners, Corner::BottomRight, 20.0),
    );
    assert_eq!(instructions.len(), 1);
    assert_eq!(instructions[0].x, 600.0 - EDGE_MARGIN - 120.0);
    assert_eq!(instructions[0].y, EDGE_MARGIN);
}

#[test]
fn test_bottom_both_yields_symmetric_pair() {
    let instructions = compute_draw_instructions(
        PAGE,
        (300, 150),
        &config(Placement::Corners, Corner::BottomBoth, 20.0),
    );
    assert_eq!(instructions.len(), 2);
    let (left, right) = (instructions[0], instructions[1]);
    assert_eq!(left.x, EDGE_MARGIN);
    assert_eq!(right.x, PAGE.width - EDGE_MARGIN - right.width);
    // symmetric around the page center
    assert_eq!(left.x + left.width / 2.0, PAGE.width - (right.x + right.width / 2.0));
    assert_eq!(left.y, EDGE_MARGIN);
    assert_eq!(right.y, EDGE_MARGIN);
}

// ============================================================================
// Keyword mode
// ============================================================================

#[test]
fn test_keyword_centers_horizontally_at_bottom() {
    let instructions = compute_draw_instructions(
        PAGE,
        (300, 150),
        &config(Placement::Keyword, Corner::BottomRight, 20.0),
    );
    assert_eq!(instructions.len(), 1);
    assert_eq!(instructions[0].x, 300.0 - 60.0);
    assert_eq!(instructions[0].y, EDGE_MARGIN);
}

#[test]
fn test_keyword_ignores_corner_selection() {
    for corner in [Corner::BottomLeft, Corner::BottomRight, Corner::BottomBoth] {
        let instructions = compute_draw_instructions(
            PAGE,
            (300, 150),
            &config(Placement::Keyword, corner, 20.0),
        );
        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].x, 240.0);
    }
}

// ============================================================================
// Option parsing defaults
// ============================================================================

#[test]
fn test_string_parsing_defaults() {
    assert_eq!(Placement::parse("keyword"), Placement::Keyword);
    assert_eq!(Placement::parse("corners"), Placement::Corners);
    assert_eq!(Placement::parse("anything"), Placement::Corners);

    assert_eq!(Corner::parse("bottom-left"), Corner::BottomLeft);
    assert_eq!(Corner::parse("bottom-both"), Corner::BottomBoth);
    assert_eq!(Corner::parse("bottom-right"), Corner::BottomRight);
    assert_eq!(Corner::parse("top-left"), Corner::BottomRight);

    let defaults = PlacementConfig::default();
    assert_eq!(defaults.placement, Placement::Corners);
    assert_eq!(defaults.corner, Corner::BottomRight);
    assert_eq!(defaults.size_percent, 20.0);
}
