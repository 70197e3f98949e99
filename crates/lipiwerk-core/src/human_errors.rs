// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for adapters.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Nothing here is retried: the severity only tells the adapter whether the
// user can fix the request themselves.

use crate::error::LipiwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change the request (pick another scheme, another file).
    ActionRequired,
    /// The input can't be processed as-is (damaged PDF, unreadable image).
    Permanent,
    /// Something went wrong on our side.
    Internal,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// HTTP-style status class (400 or 500).
    pub status: u16,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `LipiwerkError` into a `HumanError` suitable for display.
pub fn humanize_error(err: &LipiwerkError) -> HumanError {
    let status = err.status_code();
    match err {
        // -- Request errors --
        LipiwerkError::UnknownScheme(id) => HumanError {
            message: format!("\"{id}\" isn't a scheme we know."),
            suggestion: "Run `lipiwerk schemes` to see the available schemes, or use \"Auto\" to let us guess the input scheme.".into(),
            status,
            severity: Severity::ActionRequired,
        },

        LipiwerkError::NoTextExtracted(name) => HumanError {
            message: format!("We couldn't find any text in {name}."),
            suggestion: "If this is a scan, try a sharper image or a higher resolution. For Indic scripts, make sure the right OCR language is selected.".into(),
            status,
            severity: Severity::ActionRequired,
        },

        LipiwerkError::NoTargets => HumanError {
            message: "No target scheme was chosen.".into(),
            suggestion: "Choose at least one target scheme, for example DEVANAGARI or IAST.".into(),
            status,
            severity: Severity::ActionRequired,
        },

        LipiwerkError::DuplicateEntry(name) => HumanError {
            message: format!("Two outputs would both be called {name}."),
            suggestion: "Rename one of the files (files that differ only by extension collide), or list each target scheme once.".into(),
            status,
            severity: Severity::ActionRequired,
        },

        // -- Document errors --
        LipiwerkError::PdfError(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged. Try opening it on a computer first to check it works, or try a different file.".into(),
            status,
            severity: Severity::Permanent,
        },

        LipiwerkError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            status,
            severity: Severity::Permanent,
        },

        LipiwerkError::OcrError(_) => HumanError {
            message: "Text recognition isn't working.".into(),
            suggestion: "The OCR models may be missing. Run `ocrs-cli` once to download them, or set `ocr_model_dir` in the config file.".into(),
            status,
            severity: Severity::Internal,
        },

        // -- Packaging --
        LipiwerkError::Archive(_) => HumanError {
            message: "We couldn't build the download archive.".into(),
            suggestion: "Try again with fewer files or targets. If this keeps happening, please report it.".into(),
            status,
            severity: Severity::Internal,
        },

        // -- Storage --
        LipiwerkError::Config(detail) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: format!("Fix or delete the settings file; defaults will be used until then. ({detail})"),
            status,
            severity: Severity::ActionRequired,
        },

        LipiwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    status,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or try copying the file to a different location first.".into(),
                    status,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    status,
                    severity: Severity::Internal,
                }
            }
        }

        LipiwerkError::Serialization(_) => HumanError {
            message: "We had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            status,
            severity: Severity::Internal,
        },
    }
}
