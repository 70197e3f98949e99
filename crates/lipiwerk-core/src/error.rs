// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Lipiwerk.
//
// Conversion failures inside the transliteration library are not errors; they
// travel as `TransliterationResult::Failed`.

use thiserror::Error;

/// Top-level error type for all Lipiwerk operations.
#[derive(Debug, Error)]
pub enum LipiwerkError {
    // -- Request errors (rejected before any work is done) --
    #[error("unknown scheme: {0}")]
    UnknownScheme(String),

    #[error("no text extracted from {0}")]
    NoTextExtracted(String),

    #[error("no target schemes requested")]
    NoTargets,

    #[error("duplicate archive entry: {0}")]
    DuplicateEntry(String),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    // -- Packaging --
    #[error("archive creation failed: {0}")]
    Archive(String),

    // -- Storage / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LipiwerkError {
    /// HTTP-style status class for adapters: 400 for problems with the
    /// request itself, 500 for everything else.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownScheme(_)
            | Self::NoTextExtracted(_)
            | Self::NoTargets
            | Self::DuplicateEntry(_) => 400,
            _ => 500,
        }
    }

    /// Whether the caller sent something we cannot process as given.
    pub fn is_request_error(&self) -> bool {
        self.status_code() < 500
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LipiwerkError>;
