// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — page text layers and embedded page images from existing PDF
// documents using the `lopdf` crate.
//
// Image XObjects are decoded when their filter chain is made of filters
// lopdf can undo (Flate, LZW, ASCII85), optionally ending in DCTDecode.
// CCITT, JBIG2 and JPEG 2000 scans are skipped with a log line.

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use lipiwerk_core::error::LipiwerkError;
use tracing::{debug, instrument, warn};

/// Bound on `/Parent` hops when looking for inherited page resources.
const MAX_TREE_DEPTH: usize = 32;

/// Filters `Stream::get_plain_content` can undo.
const LOSSLESS_FILTERS: [&[u8]; 3] = [b"FlateDecode", b"LZWDecode", b"ASCII85Decode"];

/// Reads text and scanned images out of a PDF held in memory.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Create a reader from raw PDF bytes.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, LipiwerkError> {
        let document = Document::load_mem(data).map_err(|err| {
            LipiwerkError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// 1-indexed page numbers in document order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.document.get_pages().keys().copied().collect()
    }

    // -- Extraction -----------------------------------------------------------

    /// Text layer of one page (1-indexed). Scanned pages usually come back
    /// blank rather than as an error.
    pub fn page_text(&self, page_number: u32) -> Result<String, LipiwerkError> {
        self.document.extract_text(&[page_number]).map_err(|err| {
            LipiwerkError::PdfError(format!(
                "failed to extract text from page {}: {}",
                page_number, err
            ))
        })
    }

    /// Every decodable image XObject on a page, in resource-dictionary order.
    ///
    /// An image that cannot be decoded is logged and left out; only a missing
    /// page is an error.
    #[instrument(skip(self), fields(page_number))]
    pub fn page_images(&self, page_number: u32) -> Result<Vec<DynamicImage>, LipiwerkError> {
        let pages = self.document.get_pages();
        let page_id = *pages.get(&page_number).ok_or_else(|| {
            LipiwerkError::PdfError(format!(
                "page {} not found (document has {} pages)",
                page_number,
                pages.len()
            ))
        })?;

        let Some(xobjects) = self
            .inherited_resources(page_id)
            .and_then(|resources| resources.get(b"XObject").ok())
            .and_then(|xobjects| self.resolve_dict(xobjects))
        else {
            return Ok(Vec::new());
        };

        let mut images = Vec::new();
        for (name, value) in xobjects.iter() {
            let Some(stream) = self
                .document
                .dereference(value)
                .ok()
                .and_then(|(_, object)| object.as_stream().ok())
                .filter(|stream| is_image(stream))
            else {
                continue;
            };
            let name = String::from_utf8_lossy(name);
            match self.decode_image(stream) {
                Ok(Some(image)) => images.push(image),
                Ok(None) => {}
                Err(err) => warn!(page_number, xobject = %name, %err, "Page image skipped"),
            }
        }

        debug!(page_number, images = images.len(), "Page images collected");
        Ok(images)
    }

    // -- Helpers --------------------------------------------------------------

    /// The page's `/Resources`, falling back to the nearest ancestor that
    /// carries one.
    fn inherited_resources(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let mut node = self.document.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(resources) = node.get(b"Resources") {
                return self.resolve_dict(resources);
            }
            let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
            node = self.document.get_dictionary(parent).ok()?;
        }
        None
    }

    fn resolve_dict<'a>(&'a self, object: &'a Object) -> Option<&'a Dictionary> {
        let (_, resolved) = self.document.dereference(object).ok()?;
        resolved.as_dict().ok()
    }

    /// `Ok(None)` for encodings without a decoder here.
    fn decode_image(&self, stream: &Stream) -> Result<Option<DynamicImage>, LipiwerkError> {
        match image_encoding(stream) {
            ImageEncoding::Jpeg => {
                let jpeg = strip_lossless_filters(stream)?;
                image::load_from_memory(&jpeg)
                    .map(Some)
                    .map_err(|err| LipiwerkError::PdfError(format!("bad embedded JPEG: {err}")))
            }
            ImageEncoding::Raw => {
                let samples = stream.get_plain_content().map_err(|err| {
                    LipiwerkError::PdfError(format!("failed to decompress image: {err}"))
                })?;
                let layout = self.sample_layout(&stream.dict)?;
                raster(&layout, &samples).map(Some)
            }
            ImageEncoding::Unsupported(filter) => {
                debug!(%filter, "No decoder for image filter");
                Ok(None)
            }
        }
    }

    fn sample_layout(&self, dict: &Dictionary) -> Result<SampleLayout, LipiwerkError> {
        let width = self.dimension(dict, b"Width")?;
        let height = self.dimension(dict, b"Height")?;

        if matches!(dict.get(b"ImageMask"), Ok(Object::Boolean(true))) {
            return Ok(SampleLayout {
                width,
                height,
                bits: 1,
                channels: 1,
                inverted: decode_inverted(dict),
            });
        }

        let bits = dict
            .get(b"BitsPerComponent")
            .and_then(Object::as_i64)
            .unwrap_or(8);
        Ok(SampleLayout {
            width,
            height,
            bits: u8::try_from(bits).unwrap_or(0),
            channels: self.colour_channels(dict)?,
            inverted: decode_inverted(dict),
        })
    }

    fn dimension(&self, dict: &Dictionary, key: &[u8]) -> Result<u32, LipiwerkError> {
        dict.get(key)
            .ok()
            .and_then(|object| self.document.dereference(object).ok())
            .and_then(|(_, object)| object.as_i64().ok())
            .and_then(|value| u32::try_from(value).ok())
            .filter(|&value| value > 0)
            .ok_or_else(|| {
                LipiwerkError::PdfError(format!(
                    "image has no usable /{}",
                    String::from_utf8_lossy(key)
                ))
            })
    }

    /// Components per sample for the image's `/ColorSpace`.
    fn colour_channels(&self, dict: &Dictionary) -> Result<u8, LipiwerkError> {
        let unsupported =
            |what: &str| LipiwerkError::PdfError(format!("unsupported colour space {what}"));

        let space = dict
            .get(b"ColorSpace")
            .ok()
            .and_then(|object| self.document.dereference(object).ok())
            .map(|(_, object)| object)
            .ok_or_else(|| unsupported("(missing)"))?;

        let (family, parameter) = match space {
            Object::Name(name) => (name.as_slice(), None),
            Object::Array(parts) => match parts.as_slice() {
                [Object::Name(name), rest @ ..] => (name.as_slice(), rest.first()),
                _ => return Err(unsupported("(empty array)")),
            },
            _ => return Err(unsupported("(not a name)")),
        };

        match family {
            b"DeviceGray" | b"CalGray" => Ok(1),
            b"DeviceRGB" | b"CalRGB" => Ok(3),
            b"DeviceCMYK" => Ok(4),
            b"ICCBased" => parameter
                .and_then(|profile| self.document.dereference(profile).ok())
                .and_then(|(_, profile)| profile.as_stream().ok())
                .and_then(|profile| profile.dict.get(b"N").and_then(Object::as_i64).ok())
                .and_then(|n| u8::try_from(n).ok())
                .filter(|n| matches!(*n, 1 | 3 | 4))
                .ok_or_else(|| unsupported("ICCBased without /N")),
            other => Err(unsupported(String::from_utf8_lossy(other).as_ref())),
        }
    }
}

fn is_image(stream: &Stream) -> bool {
    matches!(
        stream.dict.get(b"Subtype"),
        Ok(Object::Name(subtype)) if subtype.as_slice() == b"Image"
    )
}

/// How an image XObject's samples are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ImageEncoding {
    /// A complete JPEG file once any lossless filters are undone.
    Jpeg,
    /// Raw samples once any lossless filters are undone.
    Raw,
    /// The first filter nothing here can undo.
    Unsupported(String),
}

fn image_encoding(stream: &Stream) -> ImageEncoding {
    if stream.dict.get(b"Filter").is_err() {
        return ImageEncoding::Raw;
    }
    let filters = match stream.filters() {
        Ok(filters) => filters,
        Err(_) => return ImageEncoding::Unsupported("(malformed /Filter)".into()),
    };

    let (last, leading) = match filters.split_last() {
        Some((last, leading)) => (*last, leading),
        None => return ImageEncoding::Raw,
    };
    if let Some(filter) = leading.iter().find(|f| !LOSSLESS_FILTERS.contains(*f)) {
        return ImageEncoding::Unsupported(String::from_utf8_lossy(filter).into_owned());
    }
    if last == b"DCTDecode" {
        ImageEncoding::Jpeg
    } else if LOSSLESS_FILTERS.contains(&last) {
        ImageEncoding::Raw
    } else {
        ImageEncoding::Unsupported(String::from_utf8_lossy(last).into_owned())
    }
}

/// Content of a JPEG stream with any filters ahead of `DCTDecode` undone.
fn strip_lossless_filters(stream: &Stream) -> Result<Vec<u8>, LipiwerkError> {
    let leading: Vec<Object> = match stream.filters() {
        Ok(filters) if filters.len() > 1 => filters[..filters.len() - 1]
            .iter()
            .map(|name| Object::Name(name.to_vec()))
            .collect(),
        _ => return Ok(stream.content.clone()),
    };
    let mut inner = stream.clone();
    inner.dict.set("Filter", Object::Array(leading));
    inner
        .get_plain_content()
        .map_err(|err| LipiwerkError::PdfError(format!("failed to decompress JPEG: {err}")))
}

/// `/Decode [1 0]`: a zero sample means white.
fn decode_inverted(dict: &Dictionary) -> bool {
    dict.get(b"Decode")
        .and_then(Object::as_array)
        .ok()
        .and_then(|range| range.first())
        .and_then(|low| low.as_float().ok())
        .is_some_and(|low| low > 0.5)
}

/// Geometry of an uncompressed sample buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SampleLayout {
    width: u32,
    height: u32,
    bits: u8,
    channels: u8,
    inverted: bool,
}

/// Build an image from raw samples: 1-bit gray (bilevel scans) or 8-bit
/// gray, RGB, and CMYK. Rows are byte-aligned.
fn raster(layout: &SampleLayout, samples: &[u8]) -> Result<DynamicImage, LipiwerkError> {
    let SampleLayout {
        width,
        height,
        bits,
        channels,
        inverted,
    } = *layout;
    let too_short = |expected: usize| {
        LipiwerkError::PdfError(format!(
            "image data too short: {} bytes, expected {} for {}x{} at {} bits x {} channels",
            samples.len(),
            expected,
            width,
            height,
            bits,
            channels
        ))
    };

    let (w, h) = (width as usize, height as usize);
    match (bits, channels) {
        (1, 1) => {
            let stride = w.div_ceil(8);
            let expected = stride * h;
            if samples.len() < expected {
                return Err(too_short(expected));
            }
            let image = GrayImage::from_fn(width, height, |x, y| {
                let byte = samples[y as usize * stride + x as usize / 8];
                let set = byte & (0x80 >> (x % 8)) != 0;
                image::Luma([if set != inverted { 255 } else { 0 }])
            });
            Ok(DynamicImage::ImageLuma8(image))
        }
        (8, 1) => {
            let expected = w * h;
            let mut pixels = samples.get(..expected).ok_or_else(|| too_short(expected))?.to_vec();
            if inverted {
                pixels.iter_mut().for_each(|value| *value = 255 - *value);
            }
            GrayImage::from_raw(width, height, pixels)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(|| too_short(expected))
        }
        (8, 3) => {
            let expected = w * h * 3;
            let pixels = samples.get(..expected).ok_or_else(|| too_short(expected))?.to_vec();
            RgbImage::from_raw(width, height, pixels)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(|| too_short(expected))
        }
        (8, 4) => {
            let expected = w * h * 4;
            let cmyk = samples.get(..expected).ok_or_else(|| too_short(expected))?;
            let pixels: Vec<u8> = cmyk
                .chunks_exact(4)
                .flat_map(|px| {
                    let white = 255 - u16::from(px[3]);
                    [px[0], px[1], px[2]].map(|ink| ((255 - u16::from(ink)) * white / 255) as u8)
                })
                .collect();
            RgbImage::from_raw(width, height, pixels)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(|| too_short(expected))
        }
        _ => Err(LipiwerkError::PdfError(format!(
            "unsupported image layout: {bits} bits x {channels} channels"
        ))),
    }
}
