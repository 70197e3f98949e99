// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lipiwerk-translit — Script detection and transliteration for Lipiwerk.
//
// Classifies text by Unicode block, guesses the romanization scheme it is
// written in, resolves scheme identifiers against a registry discovered once
// at startup, dispatches conversions to the transliteration backend, and
// packages multi-file/multi-target results into a zip archive.

pub mod backend;
pub mod batch;
pub mod dispatch;
pub mod guess;
pub mod registry;
pub mod script;
pub mod stub;

// Re-export the primary items so callers can use `lipiwerk_translit::Dispatcher` etc.
pub use backend::{ConversionError, LipiBackend, Transliterator};
pub use batch::{BatchPackager, entry_name};
pub use dispatch::Dispatcher;
pub use guess::{guess_input_scheme, source_for};
pub use registry::SchemeRegistry;
pub use script::detect_script;
