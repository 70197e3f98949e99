// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Builds the document extractor from settings, attaching OCR when available.

use lipiwerk_core::AppConfig;
use lipiwerk_core::types::DocumentType;
use lipiwerk_document::{DocumentExtractor, ExtractOptions};
use tracing::{info, warn};

/// Extraction options taken from `config`.
pub fn extract_options(config: &AppConfig) -> ExtractOptions {
    ExtractOptions {
        language_hint: config.ocr_language.clone(),
        max_image_dimension: config.max_image_dimension,
        binarize: config.binarize_before_ocr,
    }
}

/// An extractor for `config`. When the OCR models cannot be loaded the
/// extractor still handles plain text and PDF text layers.
#[cfg(feature = "ocr")]
pub fn build_extractor(config: &AppConfig) -> DocumentExtractor {
    use lipiwerk_document::{OcrConfig, OcrEngine};

    let extractor = DocumentExtractor::new(extract_options(config));
    match OcrEngine::new(OcrConfig::from_optional_dir(config.ocr_model_dir.as_deref())) {
        Ok(engine) => {
            info!("OCR enabled");
            extractor.with_recognizer(Box::new(engine))
        }
        Err(err) => {
            warn!(%err, "OCR unavailable, images will yield no text");
            extractor
        }
    }
}

#[cfg(not(feature = "ocr"))]
pub fn build_extractor(config: &AppConfig) -> DocumentExtractor {
    info!("built without the `ocr` feature, images will yield no text");
    DocumentExtractor::new(extract_options(config))
}

/// Filenames that go through OCR when `extractor` has no engine to run.
/// PDFs count since their scanned pages need one.
pub fn ocr_gaps<'f>(extractor: &DocumentExtractor, filenames: &[&'f str]) -> Vec<&'f str> {
    if extractor.has_recognizer() {
        return Vec::new();
    }
    filenames
        .iter()
        .copied()
        .filter(|name| DocumentType::from_filename(name) != DocumentType::PlainText)
        .collect()
}

/// Log one warning per file that will only yield text from a text layer.
pub fn warn_ocr_gaps(extractor: &DocumentExtractor, filenames: &[&str]) {
    for filename in ocr_gaps(extractor, filenames) {
        warn!(%filename, "no OCR engine, only a PDF text layer can yield text");
    }
}
