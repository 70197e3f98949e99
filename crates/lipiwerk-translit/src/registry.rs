// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scheme registry — identifier → backend handle, discovered once per process.

use std::collections::BTreeMap;

use lipiwerk_core::error::{LipiwerkError, Result};
use tracing::debug;

use crate::backend::Transliterator;

/// Immutable map of every scheme identifier the backend exposes.
///
/// Build it once at startup with [`SchemeRegistry::discover`] and pass it by
/// reference; there is no way to add or remove schemes afterwards.
#[derive(Debug, Clone)]
pub struct SchemeRegistry<H> {
    schemes: BTreeMap<String, H>,
}

impl<H: Copy> SchemeRegistry<H> {
    /// Enumerate the backend's schemes, keeping only uppercase identifiers.
    pub fn discover<T>(backend: &T) -> Self
    where
        T: Transliterator<Handle = H>,
    {
        let schemes: BTreeMap<String, H> = backend
            .schemes()
            .into_iter()
            .filter(|(id, _)| is_scheme_identifier(id))
            .collect();
        debug!(count = schemes.len(), "scheme registry built");
        Self { schemes }
    }

    /// Look up the handle for `id`.
    ///
    /// # Errors
    ///
    /// [`LipiwerkError::UnknownScheme`] when `id` was not discovered. Lookup
    /// is exact: `"iast"` does not resolve to `"IAST"`.
    pub fn resolve(&self, id: &str) -> Result<H> {
        self.schemes
            .get(id)
            .copied()
            .ok_or_else(|| LipiwerkError::UnknownScheme(id.to_owned()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.schemes.contains_key(id)
    }

    /// Identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schemes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

/// Whether `id` looks like a scheme constant: at least one cased character
/// and no lowercase ones.
pub fn is_scheme_identifier(id: &str) -> bool {
    id.chars().any(char::is_uppercase) && !id.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LipiBackend;
    use crate::stub::StubBackend;

    #[test]
    fn resolves_discovered_ids() {
        let registry = SchemeRegistry::discover(&LipiBackend::new());
        assert!(registry.resolve("IAST").is_ok());
        assert!(registry.resolve("DEVANAGARI").is_ok());
        assert!(registry.contains("SLP1"));
        assert_eq!(registry.len(), 16);
    }

    #[test]
    fn unknown_ids_fail() {
        let registry = SchemeRegistry::discover(&LipiBackend::new());
        for id in ["BOGUS", "iast", "Auto", "", " IAST"] {
            match registry.resolve(id) {
                Err(LipiwerkError::UnknownScheme(got)) => assert_eq!(got, id),
                other => panic!("expected UnknownScheme for {id:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn non_uppercase_names_are_not_schemes() {
        let backend = StubBackend::with_schemes(&["IAST", "Helper", "lower", "SLP1", "123"]);
        let registry = SchemeRegistry::discover(&backend);
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["IAST", "SLP1"]);
    }

    #[test]
    fn identifier_rule() {
        assert!(is_scheme_identifier("SLP1"));
        assert!(is_scheme_identifier("ISO_15919"));
        assert!(!is_scheme_identifier("Iast"));
        assert!(!is_scheme_identifier("1234"));
        assert!(!is_scheme_identifier(""));
    }

    #[test]
    fn ids_are_sorted() {
        let registry = SchemeRegistry::discover(&LipiBackend::new());
        let ids: Vec<&str> = registry.ids().collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }
}
