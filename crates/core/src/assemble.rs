//! Document assembly - stamps a signature image onto the selected pages
//! of a PDF and serializes the result.
//!
//! One call is one request: the document is loaded, mutated in memory,
//! and saved, with no state shared across invocations. Failures abort
//! the whole job; there is never partial output.

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::error::{Result, SignError};
use crate::pages::{PageMode, select_pages};
use crate::placement::{DrawInstruction, PageGeometry, PlacementConfig, compute_draw_instructions};
use crate::retention;
use crate::signature::SignatureImage;
use crate::watermark;

/// Resource name under which the signature XObject is registered on
/// each target page.
const SIGNATURE_NAME: &str = "SigStamp";

/// Cap on /Parent hops when resolving inherited page attributes, so a
/// malformed cyclic page tree cannot loop forever.
const MAX_TREE_DEPTH: usize = 32;

/// Options for one assembly job.
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Which pages receive the signature.
    pub pages: PageMode,
    /// Range string, consulted only for `PageMode::Custom`.
    pub custom_pages: String,
    /// Where and how large the signature is drawn.
    pub placement: PlacementConfig,
    /// Add the removable preview watermark to every signed page.
    pub preview: bool,
}

/// A finished signing job: output bytes plus the metadata the storage
/// collaborator needs.
#[derive(Debug)]
pub struct SignedDocument {
    /// Serialized PDF.
    pub bytes: Vec<u8>,
    /// When the stored artifact should be swept (24 h from generation).
    pub expires_at: DateTime<Utc>,
    /// `"preview_"` or `"signed_"`, from the preview flag alone.
    pub filename_prefix: &'static str,
    /// How many pages actually received the signature.
    pub pages_signed: usize,
}

impl SignedDocument {
    /// Download filename suggested to the user.
    pub fn suggested_filename(&self) -> String {
        format!("{}document.pdf", self.filename_prefix)
    }
}

/// Stamp `signature_bytes` onto `document_bytes` per `options`.
///
/// An empty page selection is not an error: the document is still
/// re-serialized, just with nothing drawn. See the crate error type for
/// the failure classification.
pub fn assemble(
    document_bytes: &[u8],
    signature_bytes: &[u8],
    options: &AssembleOptions,
) -> Result<SignedDocument> {
    if document_bytes.is_empty() {
        return Err(SignError::MissingInput("document bytes"));
    }
    if signature_bytes.is_empty() {
        return Err(SignError::MissingInput("signature image bytes"));
    }

    let mut doc = Document::load_mem(document_bytes)
        .map_err(|err| SignError::MalformedDocument(err.to_string()))?;
    let signature = SignatureImage::decode(signature_bytes)?;

    let page_table = doc.get_pages();
    let total_pages = page_table.len();
    let targets = select_pages(options.pages, &options.custom_pages, total_pages);
    debug!(
        total_pages,
        targets = targets.len(),
        preview = options.preview,
        "assembling signed document"
    );

    if !targets.is_empty() {
        let image_id = signature.embed(&mut doc)?;
        let wm_resources = options
            .preview
            .then(|| watermark::add_watermark_resources(&mut doc));

        for &index in &targets {
            let page_number = (index + 1) as u32;
            let page_id = *page_table
                .get(&page_number)
                .ok_or(SignError::InvalidPageTarget(index))?;

            let geometry = page_geometry(&doc, page_id)?;
            let instructions =
                compute_draw_instructions(geometry, signature.intrinsic(), &options.placement);
            debug!(page = page_number, draws = instructions.len(), "stamping page");

            let mut ops = signature_operations(&instructions);
            set_page_resource(&mut doc, page_id, "XObject", SIGNATURE_NAME, image_id)?;

            // Watermark ops come after the signature ops so the overlay
            // sits on top of it.
            if let Some(wm) = &wm_resources {
                ops.extend(watermark::watermark_operations(geometry));
                set_page_resource(&mut doc, page_id, "Font", watermark::FONT_NAME, wm.font_id)?;
                set_page_resource(
                    &mut doc,
                    page_id,
                    "ExtGState",
                    watermark::GSTATE_NAME,
                    wm.gstate_id,
                )?;
            }

            append_content(&mut doc, page_id, ops)?;
        }
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| SignError::SerializationFailure(err.to_string()))?;

    Ok(SignedDocument {
        bytes,
        expires_at: retention::expires_at(Utc::now()),
        filename_prefix: if options.preview {
            "preview_"
        } else {
            "signed_"
        },
        pages_signed: targets.len(),
    })
}

/// One `q cm Do Q` group per destination rectangle.
fn signature_operations(instructions: &[DrawInstruction]) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(instructions.len() * 4);
    for inst in instructions {
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![
                Object::Real((inst.width as f32).into()),
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real((inst.height as f32).into()),
                Object::Real((inst.x as f32).into()),
                Object::Real((inst.y as f32).into()),
            ],
        ));
        ops.push(Operation::new("Do", vec![SIGNATURE_NAME.into()]));
        ops.push(Operation::new("Q", vec![]));
    }
    ops
}

fn malformed(err: lopdf::Error) -> SignError {
    SignError::MalformedDocument(err.to_string())
}

/// Look up a page attribute, walking up the page tree via /Parent when
/// the page itself does not carry it.
fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut current = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc
            .get_object(current)
            .and_then(|obj| obj.as_dict())
            .map_err(malformed)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent") {
            Ok(parent) => current = parent.as_reference().map_err(malformed)?,
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

fn object_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}

/// Read a page's size from its (possibly inherited) MediaBox.
fn page_geometry(doc: &Document, page_id: ObjectId) -> Result<PageGeometry> {
    let media_box = resolve_inherited(doc, page_id, b"MediaBox")?
        .ok_or_else(|| SignError::MalformedDocument("page has no MediaBox".into()))?;
    let array = match media_box {
        Object::Reference(id) => doc
            .get_object(*id)
            .and_then(|obj| obj.as_array())
            .map_err(malformed)?,
        other => other.as_array().map_err(malformed)?,
    };
    if array.len() != 4 {
        return Err(SignError::MalformedDocument(format!(
            "MediaBox has {} elements, expected 4",
            array.len()
        )));
    }
    let coords = array
        .iter()
        .map(object_to_f64)
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| SignError::MalformedDocument("MediaBox contains non-numbers".into()))?;
    Ok(PageGeometry {
        width: coords[2] - coords[0],
        height: coords[3] - coords[1],
    })
}

/// Register `name -> target` under the given resource category
/// (`XObject`, `Font`, `ExtGState`) of one page.
///
/// Shared or inherited resource dictionaries are cloned onto the page
/// first so the mutation cannot leak into other pages. A page that
/// inherits nothing gets a fresh inline dictionary.
fn set_page_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &str,
    name: &str,
    target: ObjectId,
) -> Result<()> {
    let materialized: Option<Dictionary> = {
        let page = doc
            .get_object(page_id)
            .and_then(|obj| obj.as_dict())
            .map_err(malformed)?;
        match page.get(b"Resources") {
            Ok(Object::Dictionary(_)) => None,
            Ok(Object::Reference(id)) => Some(
                doc.get_object(*id)
                    .and_then(|obj| obj.as_dict())
                    .map_err(malformed)?
                    .clone(),
            ),
            Ok(_) => Some(Dictionary::new()),
            Err(_) => match resolve_inherited(doc, page_id, b"Resources")? {
                Some(Object::Dictionary(dict)) => Some(dict.clone()),
                Some(Object::Reference(id)) => Some(
                    doc.get_object(*id)
                        .and_then(|obj| obj.as_dict())
                        .map_err(malformed)?
                        .clone(),
                ),
                _ => Some(Dictionary::new()),
            },
        }
    };

    let page = doc
        .get_object_mut(page_id)
        .map_err(malformed)?
        .as_dict_mut()
        .map_err(malformed)?;
    if let Some(dict) = materialized {
        page.set("Resources", Object::Dictionary(dict));
    }

    let resources = page
        .get_mut(b"Resources")
        .map_err(malformed)?
        .as_dict_mut()
        .map_err(malformed)?;
    if !resources.has(category.as_bytes()) {
        resources.set(category, Object::Dictionary(Dictionary::new()));
    }
    resources
        .get_mut(category.as_bytes())
        .map_err(malformed)?
        .as_dict_mut()
        .map_err(malformed)?
        .set(name, Object::Reference(target));
    Ok(())
}

/// Append a content stream to a page, preserving whatever Contents shape
/// it already has (single reference, array, or none).
fn append_content(doc: &mut Document, page_id: ObjectId, ops: Vec<Operation>) -> Result<()> {
    let encoded = Content { operations: ops }
        .encode()
        .map_err(|err| SignError::SerializationFailure(err.to_string()))?;
    let stream_id = doc.add_object(lopdf::Stream::new(Dictionary::new(), encoded));

    let page = doc
        .get_object_mut(page_id)
        .map_err(malformed)?
        .as_dict_mut()
        .map_err(malformed)?;
    let contents = match page.remove(b"Contents") {
        Some(Object::Reference(existing)) => Object::Array(vec![
            Object::Reference(existing),
            Object::Reference(stream_id),
        ]),
        Some(Object::Array(mut array)) => {
            array.push(Object::Reference(stream_id));
            Object::Array(array)
        }
        _ => Object::Reference(stream_id),
    };
    page.set("Contents", contents);
    Ok(())
}
