// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LipiwerkError, Result};
use crate::types::{AUTO_SCHEME, OutputEncoding, scheme};

/// Name of the persisted settings file inside the config directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language hint handed to OCR (Tesseract-style code, e.g. "eng", "hin").
    pub ocr_language: String,
    /// Encoding of written output files.
    pub output_encoding: OutputEncoding,
    /// Targets used when the caller names none.
    pub default_targets: Vec<String>,
    /// Source scheme used when the caller names none (`"Auto"` guesses).
    pub default_source: String,
    /// File name for multi-output archives.
    pub archive_name: String,
    /// Directory holding the OCR detection/recognition models.
    pub ocr_model_dir: Option<PathBuf>,
    /// Longest image side handed to OCR; larger images are downscaled.
    pub max_image_dimension: u32,
    /// Apply Otsu binarization before OCR.
    pub binarize_before_ocr: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ocr_language: "eng".into(),
            output_encoding: OutputEncoding::Utf8,
            default_targets: vec![scheme::DEVANAGARI.into(), scheme::BENGALI.into()],
            default_source: AUTO_SCHEME.into(),
            archive_name: "transliterations.zip".into(),
            ocr_model_dir: None,
            max_image_dimension: 4096,
            binarize_before_ocr: false,
        }
    }
}

impl AppConfig {
    /// Load settings from `dir/config.json`.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        serde_json::from_str(&raw).map_err(|err| {
            LipiwerkError::Config(format!("{} is not valid: {}", path.display(), err))
        })
    }

    /// Write settings to `dir/config.json`, creating `dir` if needed.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILENAME), json)?;
        Ok(())
    }
}
