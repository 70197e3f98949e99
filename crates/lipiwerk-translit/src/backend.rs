// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transliteration backend — the seam between Lipiwerk and the library that
// owns the character-mapping tables.
//
// The production backend wraps `vidyut_lipi::Lipika`. Lipiwerk never
// implements conversion tables itself; it only picks scheme handles and
// forwards text.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

use lipiwerk_core::types::scheme;
use thiserror::Error;
use vidyut_lipi::{Lipika, Scheme};

/// A failure raised by the conversion library for one (text, from, to) triple.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConversionError(pub String);

/// A transliteration capability: a set of named schemes and a conversion
/// between any two of them.
pub trait Transliterator {
    /// Opaque per-scheme value handed back to [`convert`](Self::convert).
    type Handle: Copy + std::fmt::Debug;

    /// Every scheme the capability exposes, keyed by identifier.
    fn schemes(&self) -> Vec<(String, Self::Handle)>;

    /// Convert `text` from one scheme to another.
    fn convert(
        &self,
        text: &str,
        from: Self::Handle,
        to: Self::Handle,
    ) -> Result<String, ConversionError>;
}

/// Scheme identifiers exposed by [`LipiBackend`].
const LIPI_SCHEMES: [(&str, Scheme); 16] = [
    (scheme::DEVANAGARI, Scheme::Devanagari),
    (scheme::BENGALI, Scheme::Bengali),
    (scheme::GURMUKHI, Scheme::Gurmukhi),
    (scheme::GUJARATI, Scheme::Gujarati),
    (scheme::ORIYA, Scheme::Odia),
    (scheme::TAMIL, Scheme::Tamil),
    (scheme::TELUGU, Scheme::Telugu),
    (scheme::KANNADA, Scheme::Kannada),
    (scheme::MALAYALAM, Scheme::Malayalam),
    (scheme::IAST, Scheme::Iast),
    (scheme::ITRANS, Scheme::Itrans),
    (scheme::SLP1, Scheme::Slp1),
    (scheme::VELTHUIS, Scheme::Velthuis),
    (scheme::HK, Scheme::HarvardKyoto),
    (scheme::WX, Scheme::Wx),
    (scheme::ISO, Scheme::Iso15919),
];

/// Backend over `vidyut-lipi`.
///
/// `Lipika` caches compiled mappings and needs `&mut self`, so it sits behind
/// a mutex; the backend itself is shared by reference.
pub struct LipiBackend {
    lipika: Mutex<Lipika>,
}

impl LipiBackend {
    pub fn new() -> Self {
        Self {
            lipika: Mutex::new(Lipika::new()),
        }
    }
}

impl Default for LipiBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Transliterator for LipiBackend {
    type Handle = Scheme;

    fn schemes(&self) -> Vec<(String, Scheme)> {
        LIPI_SCHEMES
            .iter()
            .map(|(id, scheme)| ((*id).to_owned(), *scheme))
            .collect()
    }

    fn convert(&self, text: &str, from: Scheme, to: Scheme) -> Result<String, ConversionError> {
        let mut lipika = match self.lipika.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // A previous conversion panicked mid-update; start from a
                // fresh mapping cache.
                let mut guard = poisoned.into_inner();
                *guard = Lipika::new();
                self.lipika.clear_poison();
                guard
            }
        };

        panic::catch_unwind(AssertUnwindSafe(|| lipika.transliterate(text, from, to)))
            .map_err(|payload| ConversionError(panic_message(payload.as_ref())))
    }
}

/// Best-effort text of a caught panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "transliteration library panicked".to_owned()
    }
}
