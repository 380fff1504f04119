//! rubrica - signature stamping for PDF documents.
//!
//! Given a PDF, a signature image (PNG or JPEG), and a handful of
//! placement parameters, rubrica selects target pages, composites the
//! signature onto each at a computed position and scale, and optionally
//! overlays a removable preview watermark. Page selection and placement
//! math are pure functions; one [`assemble::assemble`] call is one
//! self-contained request.

pub mod assemble;
pub mod error;
pub mod pages;
pub mod payment;
pub mod placement;
pub mod retention;
pub mod signature;
pub mod upi;
pub mod util;
pub mod watermark;

pub use assemble::{AssembleOptions, SignedDocument, assemble};
pub use error::{Result, SignError};
pub use pages::{PageMode, select_pages};
pub use placement::{
    Corner, DrawInstruction, EDGE_MARGIN, PageGeometry, Placement, PlacementConfig,
    compute_draw_instructions,
};
pub use signature::{SignatureFormat, SignatureImage};
