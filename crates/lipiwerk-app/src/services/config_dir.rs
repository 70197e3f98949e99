// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware config directory resolution and loading.

use std::path::{Path, PathBuf};

use lipiwerk_core::AppConfig;
use tracing::{info, warn};

/// `$XDG_CONFIG_HOME/lipiwerk`, falling back to `~/.config/lipiwerk`.
///
/// The directory is not created; a missing config is not an error.
pub fn config_dir() -> PathBuf {
    base_dir().join("lipiwerk")
}

fn base_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}

/// Load the config in `dir`, falling back to defaults when it is unreadable.
pub fn load_config(dir: &Path) -> AppConfig {
    match AppConfig::load(dir) {
        Ok(config) => config,
        Err(err) => {
            warn!(path = %dir.display(), %err, "config unusable, using defaults");
            AppConfig::default()
        }
    }
}

/// Write the default config into `dir` unless one already exists.
pub fn init_config(dir: &Path) -> lipiwerk_core::error::Result<PathBuf> {
    let path = dir.join(lipiwerk_core::config::CONFIG_FILENAME);
    if !path.exists() {
        AppConfig::default().save(dir)?;
        info!(path = %path.display(), "default config written");
    }
    Ok(path)
}
