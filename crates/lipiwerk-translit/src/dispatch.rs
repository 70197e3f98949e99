// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transliteration dispatcher.
//
// Unknown identifiers are hard errors returned to the caller. Failures inside
// the backend are not: they come back as `TransliterationResult::Failed` so a
// batch keeps going past one bad target.

use lipiwerk_core::error::Result;
use lipiwerk_core::types::TransliterationResult;

use crate::backend::Transliterator;
use crate::registry::SchemeRegistry;

/// Validates scheme identifiers and forwards conversions to the backend.
pub struct Dispatcher<'a, T: Transliterator> {
    backend: &'a T,
    registry: &'a SchemeRegistry<T::Handle>,
}

impl<'a, T: Transliterator> Dispatcher<'a, T> {
    pub fn new(backend: &'a T, registry: &'a SchemeRegistry<T::Handle>) -> Self {
        Self { backend, registry }
    }

    pub fn registry(&self) -> &'a SchemeRegistry<T::Handle> {
        self.registry
    }

    /// Convert `text` from `source` to `target`.
    ///
    /// # Errors
    ///
    /// [`LipiwerkError::UnknownScheme`](lipiwerk_core::LipiwerkError::UnknownScheme)
    /// if either identifier is not registered; nothing is converted then.
    pub fn transliterate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TransliterationResult> {
        let from = self.registry.resolve(source)?;
        let to = self.registry.resolve(target)?;
        Ok(self.convert_resolved(text, from, to))
    }

    /// Run one conversion on handles that already passed the registry.
    pub(crate) fn convert_resolved(
        &self,
        text: &str,
        from: T::Handle,
        to: T::Handle,
    ) -> TransliterationResult {
        match self.backend.convert(text, from, to) {
            Ok(converted) => TransliterationResult::Converted(converted),
            Err(err) => TransliterationResult::Failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LipiBackend;
    use crate::stub::StubBackend;
    use lipiwerk_core::LipiwerkError;

    #[test]
    fn unknown_source_fails_before_conversion() {
        let backend = StubBackend::new();
        let registry = SchemeRegistry::discover(&backend);
        let dispatcher = Dispatcher::new(&backend, &registry);

        let result = dispatcher.transliterate("text", "BOGUS", "IAST");
        assert!(matches!(result, Err(LipiwerkError::UnknownScheme(id)) if id == "BOGUS"));
    }

    #[test]
    fn unknown_target_fails() {
        let backend = StubBackend::new();
        let registry = SchemeRegistry::discover(&backend);
        let dispatcher = Dispatcher::new(&backend, &registry);

        let result = dispatcher.transliterate("text", "IAST", "KLINGON");
        assert!(matches!(result, Err(LipiwerkError::UnknownScheme(id)) if id == "KLINGON"));
    }

    #[test]
    fn backend_failure_becomes_sentinel() {
        let backend = StubBackend::new().failing_on("TAMIL");
        let registry = SchemeRegistry::discover(&backend);
        let dispatcher = Dispatcher::new(&backend, &registry);

        let result = dispatcher.transliterate("rAma", "ITRANS", "TAMIL").unwrap();
        assert!(result.is_failed());
        assert_eq!(
            result.into_text(),
            "[TRANSLIT ERROR] no mapping from ITRANS to TAMIL"
        );
    }

    #[test]
    fn text_passes_through_unaltered() {
        let backend = StubBackend::new();
        let registry = SchemeRegistry::discover(&backend);
        let dispatcher = Dispatcher::new(&backend, &registry);

        let text = "  line one\n\tline two  \n";
        let result = dispatcher.transliterate(text, "ITRANS", "IAST").unwrap();
        assert_eq!(
            result,
            TransliterationResult::Converted(format!("ITRANS->IAST:{text}"))
        );
    }

    #[test]
    fn round_trip_through_devanagari() {
        let backend = LipiBackend::new();
        let registry = SchemeRegistry::discover(&backend);
        let dispatcher = Dispatcher::new(&backend, &registry);

        let original = "saṃskṛtam";
        let deva = dispatcher
            .transliterate(original, "IAST", "DEVANAGARI")
            .unwrap()
            .into_text();
        assert_eq!(deva, "संस्कृतम्");
        let back = dispatcher
            .transliterate(&deva, "DEVANAGARI", "IAST")
            .unwrap()
            .into_text();
        assert_eq!(back, original);
    }
}
