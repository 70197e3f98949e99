// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection reports for `lipiwerk detect`.

use std::collections::BTreeMap;

use lipiwerk_core::types::ExtractedDocument;
use lipiwerk_translit::script::script_histogram;
use lipiwerk_translit::{detect_script, guess_input_scheme};
use serde::Serialize;

/// What the detector and guesser make of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectReport {
    pub filename: String,
    pub script: &'static str,
    pub guessed_scheme: &'static str,
    /// Characters per recognised script; scripts with no hits are left out.
    pub histogram: BTreeMap<&'static str, usize>,
    pub source_hash: String,
}

impl DetectReport {
    pub fn for_document(document: &ExtractedDocument) -> Self {
        Self {
            filename: document.filename.clone(),
            script: detect_script(&document.text).name(),
            guessed_scheme: guess_input_scheme(&document.text),
            histogram: script_histogram(&document.text)
                .into_iter()
                .map(|(script, count)| (script.name(), count))
                .collect(),
            source_hash: document.source_hash.clone(),
        }
    }

    /// One tab-separated line: filename, script, guessed scheme.
    pub fn to_line(&self) -> String {
        format!("{}\t{}\t{}", self.filename, self.script, self.guessed_scheme)
    }
}
