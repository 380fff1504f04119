//! Signature placement - computes where on a page the signature image
//! is drawn.
//!
//! All coordinates are in PDF points with the origin at the bottom-left
//! of the page, matching the page geometry read from the MediaBox.

/// Top-level placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Nominally "near a keyword"; in practice the signature is centered
    /// at the bottom margin. Keyword text detection was never built and
    /// the centered-bottom behavior is what users of the original
    /// service rely on, so it is reproduced as-is.
    Keyword,
    /// One or both bottom corners (default).
    #[default]
    Corners,
}

impl Placement {
    /// Parse a placement name, defaulting to `Corners`.
    pub fn parse(value: &str) -> Self {
        match value {
            "keyword" => Self::Keyword,
            _ => Self::Corners,
        }
    }
}

/// Which bottom corner(s) receive the signature. There is no top-corner
/// option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Corner {
    BottomLeft,
    #[default]
    BottomRight,
    BottomBoth,
}

impl Corner {
    /// Parse a corner name, defaulting to `BottomRight`.
    pub fn parse(value: &str) -> Self {
        match value {
            "bottom-left" => Self::BottomLeft,
            "bottom-both" => Self::BottomBoth,
            _ => Self::BottomRight,
        }
    }
}

/// Placement parameters for one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementConfig {
    pub placement: Placement,
    pub corner: Corner,
    /// Rendered signature width as a percentage of the page width.
    /// The boundary is expected to keep this in `[5, 50]`; any numeric
    /// value is tolerated here and simply produces degenerate geometry.
    pub size_percent: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            corner: Corner::default(),
            size_percent: 20.0,
        }
    }
}

/// Page dimensions in points, read from the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

/// One image draw on a page: destination rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawInstruction {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Distance in points between the signature and any page edge it touches.
pub const EDGE_MARGIN: f64 = 24.0;

/// Compute the destination rectangles for the signature on one page.
///
/// `intrinsic_px` is the signature image's native pixel size; the
/// rendered height is always derived from it so the aspect ratio is
/// preserved. Returns one instruction, or two for `Corner::BottomBoth`
/// (left first, then right).
pub fn compute_draw_instructions(
    page: PageGeometry,
    intrinsic_px: (u32, u32),
    config: &PlacementConfig,
) -> Vec<DrawInstruction> {
    let sig_width = config.size_percent / 100.0 * page.width;
    let sig_height = sig_width * f64::from(intrinsic_px.1) / f64::from(intrinsic_px.0);

    let at = |x: f64| DrawInstruction {
        x,
        y: EDGE_MARGIN,
        width: sig_width,
        height: sig_height,
    };

    if config.placement == Placement::Keyword {
        return vec![at(page.width / 2.0 - sig_width / 2.0)];
    }

    let right_x = page.width - EDGE_MARGIN - sig_width;
    match config.corner {
        Corner::BottomBoth => vec![at(EDGE_MARGIN), at(right_x)],
        Corner::BottomLeft => vec![at(EDGE_MARGIN)],
        Corner::BottomRight => vec![at(right_x)],
    }
}
