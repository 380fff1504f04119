//! Preview watermark - a fixed diagonal "PREVIEW ONLY" overlay.
//!
//! The watermark is drawn after the signature on each page that received
//! one, so it visually sits above the signature. It is a plain text run
//! under a low-alpha ExtGState, which keeps it trivially removable by
//! re-running the job without the preview flag.

use lopdf::content::Operation;
use lopdf::{Document, Object, ObjectId, StringFormat, dictionary};

use crate::placement::PageGeometry;

/// Watermark text, fixed by product design.
pub const WATERMARK_TEXT: &str = "PREVIEW ONLY";

const FONT_SIZE: f32 = 44.0;
const OPACITY: f32 = 0.18;
const FILL_RGB: [f32; 3] = [0.96, 0.62, 0.04];

/// Resource name for the watermark font in page resource dictionaries.
pub(crate) const FONT_NAME: &str = "WmFont";
/// Resource name for the watermark graphics state.
pub(crate) const GSTATE_NAME: &str = "WmGS";

/// Document-level objects backing the watermark, created once per
/// document and referenced from every watermarked page.
pub(crate) struct WatermarkResources {
    pub font_id: ObjectId,
    pub gstate_id: ObjectId,
}

pub(crate) fn add_watermark_resources(doc: &mut Document) -> WatermarkResources {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let gstate_id = doc.add_object(dictionary! {
        "Type" => "ExtGState",
        "ca" => Object::Real(OPACITY.into()),
        "CA" => Object::Real(OPACITY.into()),
    });
    WatermarkResources { font_id, gstate_id }
}

/// Content operations drawing the watermark centered on a page,
/// rotated -45 degrees.
pub(crate) fn watermark_operations(page: PageGeometry) -> Vec<Operation> {
    // Text matrix for a -45 degree rotation anchored near the page center.
    let cos = std::f64::consts::FRAC_1_SQRT_2 as f32;
    let sin = -cos;
    let x = (page.width / 2.0 - 100.0) as f32;
    let y = (page.height / 2.0) as f32;

    vec![
        Operation::new("q", vec![]),
        Operation::new("gs", vec![GSTATE_NAME.into()]),
        Operation::new("BT", vec![]),
        Operation::new(
            "rg",
            FILL_RGB.iter().map(|&c| Object::Real(c.into())).collect(),
        ),
        Operation::new("Tf", vec![FONT_NAME.into(), Object::Real(FONT_SIZE.into())]),
        Operation::new(
            "Tm",
            vec![
                Object::Real(cos.into()),
                Object::Real(sin.into()),
                Object::Real((-sin).into()),
                Object::Real(cos.into()),
                Object::Real(x.into()),
                Object::Real(y.into()),
            ],
        ),
        Operation::new(
            "Tj",
            vec![Object::String(
                WATERMARK_TEXT.as_bytes().to_vec(),
                StringFormat::Literal,
            )],
        ),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
    ]
}
