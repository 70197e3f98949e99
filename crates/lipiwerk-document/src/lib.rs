// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lipiwerk-document — Text extraction for the Lipiwerk transliteration pipeline.
//
// Turns uploaded bytes into text: plain-text decoding with a Latin-1 fallback,
// the PDF text layer with OCR of embedded page images where it is missing, and
// OCR of scanned images (grayscale, size bounding, optional binarization).

pub mod extract;
pub mod image;
pub mod pdf;
pub mod scan;

// Re-export the primary items so callers can use `lipiwerk_document::DocumentExtractor` etc.
pub use extract::{
    DocumentExtractor, ExtractOptions, TextRecognizer, decode_plain_text, fingerprint,
};
pub use image::processor::ImageProcessor;
pub use pdf::reader::PdfReader;

#[cfg(feature = "ocr")]
pub use scan::ocr::{OcrConfig, OcrEngine};
