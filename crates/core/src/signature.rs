//! Signature image handling - format sniffing, decoding, and embedding
//! as a PDF image XObject.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{ColorType, DynamicImage, GenericImageView};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::error::{Result, SignError};

/// Wire format of an uploaded signature image.
///
/// Detection uses magic bytes only. Declared content types and file
/// names are untrusted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureFormat {
    Png,
    Jpeg,
}

impl SignatureFormat {
    /// Sniff the format from the first two bytes: `0x89 0x50` means PNG,
    /// anything else is treated as JPEG.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.len() >= 2 && bytes[0] == 0x89 && bytes[1] == 0x50 {
            Self::Png
        } else {
            Self::Jpeg
        }
    }
}

/// A decoded signature image ready to be embedded into a document.
#[derive(Debug)]
pub struct SignatureImage {
    format: SignatureFormat,
    width: u32,
    height: u32,
    raw: Vec<u8>,
    decoded: DynamicImage,
}

impl SignatureImage {
    /// Sniff and decode signature bytes.
    ///
    /// Bytes that do not decode as the sniffed format (truncated files,
    /// or formats that are neither PNG nor JPEG-compatible) fail with
    /// `UnsupportedImageFormat`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let format = SignatureFormat::sniff(bytes);
        let decoded = image::load_from_memory(bytes)
            .map_err(|err| SignError::UnsupportedImageFormat(err.to_string()))?;
        let (width, height) = decoded.dimensions();
        Ok(Self {
            format,
            width,
            height,
            raw: bytes.to_vec(),
            decoded,
        })
    }

    pub fn format(&self) -> SignatureFormat {
        self.format
    }

    /// Intrinsic pixel size `(width, height)`.
    pub fn intrinsic(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Embed the image as an XObject in the document's object table and
    /// return its id. Called once per document; target pages reference
    /// the same object.
    pub(crate) fn embed(&self, doc: &mut Document) -> Result<ObjectId> {
        match self.format {
            SignatureFormat::Png => self.embed_png(doc),
            SignatureFormat::Jpeg => Ok(self.embed_jpeg(doc)),
        }
    }

    /// PNG path: flatten to an RGB stream plus a DeviceGray SMask carrying
    /// the alpha channel, both zlib-compressed.
    fn embed_png(&self, doc: &mut Document) -> Result<ObjectId> {
        let rgba = self.decoded.to_rgba8();
        let pixel_count = (self.width as usize) * (self.height as usize);
        let mut rgb_buf = Vec::with_capacity(pixel_count * 3);
        let mut alpha_buf = Vec::with_capacity(pixel_count);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            rgb_buf.extend_from_slice(&[r, g, b]);
            alpha_buf.push(a);
        }

        let smask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => self.width as i64,
                "Height" => self.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(&alpha_buf)?,
        ));

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => self.width as i64,
                "Height" => self.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
                "SMask" => Object::Reference(smask_id),
            },
            deflate(&rgb_buf)?,
        ));
        Ok(image_id)
    }

    /// JPEG path: the original bitstream passes through untouched with a
    /// DCTDecode filter, so no transcoding loss occurs.
    fn embed_jpeg(&self, doc: &mut Document) -> ObjectId {
        let color_space = match self.decoded.color() {
            ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => "DeviceGray",
            _ => "DeviceRGB",
        };
        doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => self.width as i64,
                "Height" => self.height as i64,
                "ColorSpace" => color_space,
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            self.raw.clone(),
        ))
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
