// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub backend — a deterministic `Transliterator` for tests and dry runs.
//
// Conversions are rendered as `"{FROM}->{TO}:{text}"` so callers can see which
// pair ran, and individual targets can be told to fail.

use std::collections::HashSet;

use lipiwerk_core::types::scheme;

use crate::backend::{ConversionError, Transliterator};

/// A backend that tags text instead of converting it.
#[derive(Debug, Clone)]
pub struct StubBackend {
    ids: Vec<String>,
    failing_targets: HashSet<String>,
}

impl StubBackend {
    /// Stub exposing the common targets plus HK.
    pub fn new() -> Self {
        let mut ids: Vec<&str> = scheme::COMMON_TARGETS.to_vec();
        ids.push(scheme::HK);
        Self::with_schemes(&ids)
    }

    /// Stub exposing exactly `ids` (uppercase filtering is the registry's job).
    pub fn with_schemes(ids: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(|id| (*id).to_owned()).collect(),
            failing_targets: HashSet::new(),
        }
    }

    /// Make every conversion into `target` fail.
    pub fn failing_on(mut self, target: &str) -> Self {
        self.failing_targets.insert(target.to_owned());
        self
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Transliterator for StubBackend {
    type Handle = usize;

    fn schemes(&self) -> Vec<(String, usize)> {
        self.ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect()
    }

    fn convert(&self, text: &str, from: usize, to: usize) -> Result<String, ConversionError> {
        let from_id = self.ids.get(from).map(String::as_str).unwrap_or("?");
        let to_id = self.ids.get(to).map(String::as_str).unwrap_or("?");
        if self.failing_targets.contains(to_id) {
            return Err(ConversionError(format!(
                "no mapping from {from_id} to {to_id}"
            )));
        }
        Ok(format!("{from_id}->{to_id}:{text}"))
    }
}
