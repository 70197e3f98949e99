// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Lipiwerk.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Input value that asks for the scheme guesser instead of a fixed scheme.
pub const AUTO_SCHEME: &str = "Auto";

/// Prefix of the inline text that replaces a failed conversion.
pub const TRANSLIT_ERROR_PREFIX: &str = "[TRANSLIT ERROR]";

/// Well-known scheme identifiers.
pub mod scheme {
    pub const DEVANAGARI: &str = "DEVANAGARI";
    pub const BENGALI: &str = "BENGALI";
    pub const GURMUKHI: &str = "GURMUKHI";
    pub const GUJARATI: &str = "GUJARATI";
    pub const ORIYA: &str = "ORIYA";
    pub const TAMIL: &str = "TAMIL";
    pub const TELUGU: &str = "TELUGU";
    pub const KANNADA: &str = "KANNADA";
    pub const MALAYALAM: &str = "MALAYALAM";
    pub const IAST: &str = "IAST";
    pub const ITRANS: &str = "ITRANS";
    pub const SLP1: &str = "SLP1";
    pub const VELTHUIS: &str = "VELTHUIS";
    pub const HK: &str = "HK";
    pub const WX: &str = "WX";
    pub const ISO: &str = "ISO";

    /// Targets offered by default in adapters.
    pub const COMMON_TARGETS: [&str; 12] = [
        DEVANAGARI, BENGALI, GUJARATI, ORIYA, TAMIL, TELUGU, KANNADA, MALAYALAM, IAST, ITRANS,
        SLP1, VELTHUIS,
    ];
}

/// A Unicode block category recognised by the script detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    Devanagari,
    Bengali,
    Gurmukhi,
    Gujarati,
    Oriya,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Latin,
    Arabic,
    Hebrew,
    Cyrillic,
    /// No character fell into any known block.
    Unknown,
}

impl Script {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Devanagari => "Devanagari",
            Self::Bengali => "Bengali",
            Self::Gurmukhi => "Gurmukhi",
            Self::Gujarati => "Gujarati",
            Self::Oriya => "Oriya",
            Self::Tamil => "Tamil",
            Self::Telugu => "Telugu",
            Self::Kannada => "Kannada",
            Self::Malayalam => "Malayalam",
            Self::Latin => "Latin",
            Self::Arabic => "Arabic",
            Self::Hebrew => "Hebrew",
            Self::Cyrillic => "Cyrillic",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which scheme the input text is written in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceScheme {
    /// Guess from the text itself.
    #[default]
    Auto,
    /// Use this identifier as given (validated later by the registry).
    Fixed(String),
}

impl SourceScheme {
    /// Parse user input. Only the exact string `"Auto"` selects guessing.
    pub fn parse(value: &str) -> Self {
        if value == AUTO_SCHEME {
            Self::Auto
        } else {
            Self::Fixed(value.to_owned())
        }
    }
}

impl std::fmt::Display for SourceScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => f.write_str(AUTO_SCHEME),
            Self::Fixed(id) => f.write_str(id),
        }
    }
}

/// How an uploaded document's bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    PlainText,
    Pdf,
    /// Anything that is not `.txt` or `.pdf` is handed to OCR as an image.
    Image,
}

impl DocumentType {
    /// Classify by file extension, case-insensitively.
    pub fn from_filename(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("txt") => Self::PlainText,
            Some("pdf") => Self::Pdf,
            _ => Self::Image,
        }
    }
}

/// Text pulled out of one uploaded file.
///
/// `text` is empty when extraction failed; it is never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub filename: String,
    pub text: String,
    pub document_type: DocumentType,
    /// SHA-256 of the uploaded bytes, hex encoded.
    pub source_hash: String,
}

impl ExtractedDocument {
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        let filename = filename.into();
        let document_type = DocumentType::from_filename(&filename);
        Self {
            filename,
            text: text.into(),
            document_type,
            source_hash: String::new(),
        }
    }

    pub fn with_source_hash(mut self, hash: impl Into<String>) -> Self {
        self.source_hash = hash.into();
        self
    }

    /// Whether extraction produced anything worth transliterating.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Outcome of one conversion: the converted text, or the failure reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransliterationResult {
    Converted(String),
    Failed(String),
}

impl TransliterationResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The text written to outputs: converted text or the error sentinel.
    pub fn into_text(self) -> String {
        match self {
            Self::Converted(text) => text,
            Self::Failed(message) => format!("{TRANSLIT_ERROR_PREFIX} {message}"),
        }
    }
}

impl std::fmt::Display for TransliterationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Converted(text) => f.write_str(text),
            Self::Failed(message) => write!(f, "{TRANSLIT_ERROR_PREFIX} {message}"),
        }
    }
}

/// Byte encoding for written output files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputEncoding {
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    /// UTF-8 with a leading byte-order mark.
    #[serde(rename = "utf-8-sig")]
    Utf8Bom,
    /// Characters above U+00FF are written as `?`.
    #[serde(rename = "latin-1")]
    Latin1,
}

impl OutputEncoding {
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf8Bom => {
                let mut out = Vec::with_capacity(text.len() + 3);
                out.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
                out.extend_from_slice(text.as_bytes());
                out
            }
            Self::Latin1 => text
                .chars()
                .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
                .collect(),
        }
    }
}

impl FromStr for OutputEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-8-sig" | "utf8-sig" => Ok(Self::Utf8Bom),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Self::Latin1),
            other => Err(format!("unsupported output encoding: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_is_case_sensitive() {
        assert_eq!(SourceScheme::parse("Auto"), SourceScheme::Auto);
        assert_eq!(SourceScheme::parse("auto"), SourceScheme::Fixed("auto".into()));
        assert_eq!(SourceScheme::parse("IAST"), SourceScheme::Fixed("IAST".into()));
    }

    #[test]
    fn document_type_from_extension() {
        assert_eq!(DocumentType::from_filename("notes.TXT"), DocumentType::PlainText);
        assert_eq!(DocumentType::from_filename("scan.pdf"), DocumentType::Pdf);
        assert_eq!(DocumentType::from_filename("page.png"), DocumentType::Image);
        assert_eq!(DocumentType::from_filename("no_extension"), DocumentType::Image);
    }

    #[test]
    fn failed_result_renders_sentinel() {
        let failed = TransliterationResult::Failed("bad input".into());
        assert!(failed.is_failed());
        assert_eq!(failed.to_string(), "[TRANSLIT ERROR] bad input");
        assert_eq!(failed.into_text(), "[TRANSLIT ERROR] bad input");
    }

    #[test]
    fn converted_result_is_verbatim() {
        let ok = TransliterationResult::Converted("संस्कृतम्".into());
        assert_eq!(ok.into_text(), "संस्कृतम्");
    }

    #[test]
    fn blank_document_has_no_text() {
        assert!(!ExtractedDocument::new("a.png", "  \n\t").has_text());
        assert!(ExtractedDocument::new("a.txt", "rAma").has_text());
    }

    #[test]
    fn encodings() {
        assert_eq!(OutputEncoding::Utf8.encode("ā"), "ā".as_bytes());
        assert_eq!(OutputEncoding::Utf8Bom.encode("a"), vec![0xEF, 0xBB, 0xBF, b'a']);
        assert_eq!(OutputEncoding::Latin1.encode("é"), vec![0xE9]);
        assert_eq!(OutputEncoding::Latin1.encode("राम"), b"???".to_vec());
        assert_eq!("utf-8-sig".parse::<OutputEncoding>(), Ok(OutputEncoding::Utf8Bom));
        assert!("utf-16".parse::<OutputEncoding>().is_err());
    }

    #[test]
    fn script_display_names() {
        assert_eq!(Script::Devanagari.to_string(), "Devanagari");
        assert_eq!(Script::Unknown.name(), "Unknown");
    }
}
