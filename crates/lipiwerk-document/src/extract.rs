// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document extraction — uploaded bytes to `ExtractedDocument`.
//
// Extraction never fails into the caller. An undecodable image, a broken PDF,
// or a missing OCR engine all log a warning and produce empty text; deciding
// whether empty text is acceptable is the pipeline's job.

use image::DynamicImage;
use lipiwerk_core::error::LipiwerkError;
use lipiwerk_core::types::{DocumentType, ExtractedDocument};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use crate::image::processor::ImageProcessor;
use crate::pdf::reader::PdfReader;

/// Anything that can turn a page image into text.
pub trait TextRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, LipiwerkError>;
}

/// Knobs for image preparation and OCR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Passed through to the recognizer's logs; the bundled models are
    /// language-agnostic.
    pub language_hint: String,
    /// Longest side in pixels before OCR; 0 disables downscaling.
    pub max_image_dimension: u32,
    /// Otsu-binarize page images before recognition.
    pub binarize: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            language_hint: "eng".into(),
            max_image_dimension: 4096,
            binarize: false,
        }
    }
}

/// Decode plain-text bytes as UTF-8, or as Latin-1 when they are not valid
/// UTF-8 (each byte becomes the codepoint of equal value).
pub fn decode_plain_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => {
            debug!(len = bytes.len(), "Not UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

/// Hex SHA-256 of the uploaded bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Turns uploads into text, using an optional OCR engine for scanned content.
pub struct DocumentExtractor {
    recognizer: Option<Box<dyn TextRecognizer>>,
    options: ExtractOptions,
}

impl DocumentExtractor {
    /// An extractor without OCR: images and scanned PDF pages yield no text.
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            recognizer: None,
            options,
        }
    }

    pub fn with_recognizer(mut self, recognizer: Box<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn has_recognizer(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the text of one upload, dispatching on its filename extension.
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len()))]
    pub fn extract(&self, filename: &str, bytes: &[u8]) -> ExtractedDocument {
        let language_hint = self.options.language_hint.as_str();
        let document_type = DocumentType::from_filename(filename);
        let text = match document_type {
            DocumentType::PlainText => decode_plain_text(bytes),
            DocumentType::Pdf => self.extract_text_from_pdf(bytes, language_hint),
            DocumentType::Image => self.extract_text_from_image(bytes, language_hint),
        };
        info!(
            document_type = ?document_type,
            chars = text.chars().count(),
            "Document extracted"
        );
        ExtractedDocument::new(filename, text).with_source_hash(fingerprint(bytes))
    }

    /// OCR a scanned image. Any failure yields `""`.
    pub fn extract_text_from_image(&self, bytes: &[u8], language_hint: &str) -> String {
        match ImageProcessor::from_bytes(bytes) {
            Ok(processor) => self.recognize(processor.into_dynamic(), language_hint),
            Err(err) => {
                warn!(%err, "Image could not be decoded, no text extracted");
                String::new()
            }
        }
    }

    /// Text of every page in order, joined with `"\n"`. Pages without a text
    /// layer fall back to OCR of their embedded images.
    pub fn extract_text_from_pdf(&self, bytes: &[u8], language_hint: &str) -> String {
        let reader = match PdfReader::from_bytes(bytes) {
            Ok(reader) => reader,
            Err(err) => {
                warn!(%err, "PDF could not be parsed, no text extracted");
                return String::new();
            }
        };

        let pages: Vec<String> = reader
            .page_numbers()
            .into_iter()
            .map(|page| self.pdf_page_text(&reader, page, language_hint))
            .collect();
        pages.join("\n")
    }

    fn pdf_page_text(&self, reader: &PdfReader, page: u32, language_hint: &str) -> String {
        match reader.page_text(page) {
            Ok(text) if !text.trim().is_empty() => return text,
            Ok(_) => debug!(page, "Page has no text layer"),
            Err(err) => debug!(page, %err, "Page text layer unreadable"),
        }

        let images = match reader.page_images(page) {
            Ok(images) => images,
            Err(err) => {
                warn!(page, %err, "Page images unreadable");
                return String::new();
            }
        };

        let texts: Vec<String> = images
            .into_iter()
            .map(|image| self.recognize(image, language_hint))
            .collect();
        texts.join("\n")
    }

    fn recognize(&self, image: DynamicImage, language_hint: &str) -> String {
        let Some(recognizer) = self.recognizer.as_deref() else {
            warn!("OCR is not available, no text extracted from image");
            return String::new();
        };

        let mut processor = ImageProcessor::from_dynamic(image)
            .grayscale()
            .limit_dimension(self.options.max_image_dimension);
        if self.options.binarize {
            processor = processor.binarize_otsu();
        }

        debug!(language_hint, "Running OCR");
        match recognizer.recognize(processor.as_dynamic()) {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "OCR failed, no text extracted");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::tests::{PageContent, jpeg_bytes, make_test_pdf};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Recognizer that returns canned text and records what it saw.
    struct FixedRecognizer {
        text: &'static str,
        seen: Rc<RefCell<Vec<(u32, u32)>>>,
    }

    impl TextRecognizer for FixedRecognizer {
        fn recognize(&self, image: &DynamicImage) -> Result<String, LipiwerkError> {
            self.seen.borrow_mut().push((image.width(), image.height()));
            Ok(self.text.to_owned())
        }
    }

    struct FailingRecognizer;

    impl TextRecognizer for FailingRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> Result<String, LipiwerkError> {
            Err(LipiwerkError::OcrError("model exploded".into()))
        }
    }

    fn with_fixed(text: &'static str) -> (DocumentExtractor, Rc<RefCell<Vec<(u32, u32)>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let extractor = DocumentExtractor::new(ExtractOptions::default()).with_recognizer(
            Box::new(FixedRecognizer {
                text,
                seen: Rc::clone(&seen),
            }),
        );
        (extractor, seen)
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut buffer),
                image::ImageFormat::Png,
            )
            .unwrap();
        buffer
    }

    #[test]
    fn utf8_text_decodes() {
        assert_eq!(decode_plain_text("rāmaḥ".as_bytes()), "rāmaḥ");
    }

    #[test]
    fn latin1_fallback() {
        // "café" in Latin-1: 0xE9 alone is not valid UTF-8.
        assert_eq!(decode_plain_text(&[0x63, 0x61, 0x66, 0xE9]), "café");
    }

    #[test]
    fn fingerprint_is_sha256_hex() {
        assert_eq!(
            fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn plain_text_upload() {
        let extractor = DocumentExtractor::new(ExtractOptions::default());
        let doc = extractor.extract("notes.TXT", "dharma".as_bytes());
        assert_eq!(doc.document_type, DocumentType::PlainText);
        assert_eq!(doc.text, "dharma");
        assert_eq!(doc.source_hash, fingerprint(b"dharma"));
    }

    #[test]
    fn image_without_ocr_is_empty() {
        let extractor = DocumentExtractor::new(ExtractOptions::default());
        let doc = extractor.extract("scan.png", &png_bytes(4, 4));
        assert_eq!(doc.document_type, DocumentType::Image);
        assert!(!doc.has_text());
    }

    #[test]
    fn image_goes_through_recognizer() {
        let (extractor, seen) = with_fixed("धर्म");
        let doc = extractor.extract("scan.png", &png_bytes(4, 4));
        assert_eq!(doc.text, "धर्म");
        assert_eq!(seen.borrow().as_slice(), &[(4, 4)]);
    }

    #[test]
    fn large_images_are_bounded() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let options = ExtractOptions {
            max_image_dimension: 10,
            ..ExtractOptions::default()
        };
        let extractor = DocumentExtractor::new(options).with_recognizer(Box::new(
            FixedRecognizer {
                text: "x",
                seen: Rc::clone(&seen),
            },
        ));
        extractor.extract_text_from_image(&png_bytes(40, 20), "eng");
        assert_eq!(seen.borrow().as_slice(), &[(10, 5)]);
    }

    #[test]
    fn undecodable_image_is_empty() {
        let (extractor, seen) = with_fixed("never");
        assert_eq!(extractor.extract_text_from_image(b"\x00\x01junk", "eng"), "");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn ocr_failure_is_empty() {
        let extractor = DocumentExtractor::new(ExtractOptions::default())
            .with_recognizer(Box::new(FailingRecognizer));
        assert_eq!(extractor.extract_text_from_image(&png_bytes(4, 4), "eng"), "");
    }

    #[test]
    fn broken_pdf_is_empty() {
        let (extractor, _) = with_fixed("never");
        let doc = extractor.extract("paper.pdf", b"%PDF-1.4 truncated");
        assert_eq!(doc.document_type, DocumentType::Pdf);
        assert_eq!(doc.text, "");
    }

    #[test]
    fn pdf_text_layer_then_ocr_fallback() {
        let jpeg = jpeg_bytes();
        let pdf = make_test_pdf(&[PageContent::Text("Hello"), PageContent::Jpeg(&jpeg)]);
        let (extractor, seen) = with_fixed("scanned page");

        let text = extractor.extract_text_from_pdf(&pdf, "eng");
        let pages: Vec<&str> = text.split('\n').collect();
        assert!(pages.first().is_some_and(|p| p.contains("Hello")), "got {text:?}");
        assert_eq!(pages.last(), Some(&"scanned page"));
        // Only the scanned page reached the recognizer.
        assert_eq!(seen.borrow().as_slice(), &[(8, 8)]);
    }

    #[test]
    fn flate_scanned_page_is_recognized() {
        let pixels = vec![200u8; 8 * 8];
        let pdf = make_test_pdf(&[PageContent::FlateGray {
            width: 8,
            height: 8,
            pixels: &pixels,
        }]);
        let (extractor, seen) = with_fixed("recognised");

        assert_eq!(extractor.extract_text_from_pdf(&pdf, "eng"), "recognised");
        assert_eq!(seen.borrow().as_slice(), &[(8, 8)]);
    }
}
