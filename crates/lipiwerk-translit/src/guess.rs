// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input scheme guessing.
//
// A fixed cascade, not a confidence score: IAST diacritics beat native-script
// detection, which beats the ASCII fallback.

use lipiwerk_core::types::{Script, SourceScheme, scheme};

use crate::script::detect_script;

/// Characters that only appear in IAST romanization.
pub const IAST_DIACRITICS: [char; 21] = [
    'ā', 'ī', 'ū', 'ṛ', 'ṝ', 'ṅ', 'ñ', 'ṭ', 'ḍ', 'ṇ', 'ś', 'ṣ', 'ḥ', 'ṃ', 'Ā', 'Ī', 'Ū', 'Ṛ', 'Ṝ',
    'Ḷ', 'Ḹ',
];

/// Whether `text` contains any IAST diacritic.
pub fn has_iast_diacritics(text: &str) -> bool {
    text.chars().any(|ch| IAST_DIACRITICS.contains(&ch))
}

/// Guess which scheme `text` is written in.
pub fn guess_input_scheme(text: &str) -> &'static str {
    if has_iast_diacritics(text) {
        return scheme::IAST;
    }
    match detect_script(text) {
        Script::Devanagari => scheme::DEVANAGARI,
        Script::Bengali => scheme::BENGALI,
        _ => scheme::ITRANS,
    }
}

/// The scheme identifier to convert `text` from: the fixed one as given, or
/// a guess when the source is [`SourceScheme::Auto`].
pub fn source_for<'a>(source: &'a SourceScheme, text: &str) -> &'a str {
    match source {
        SourceScheme::Auto => guess_input_scheme(text),
        SourceScheme::Fixed(id) => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diacritics_mean_iast() {
        assert_eq!(guess_input_scheme("rāmaḥ"), "IAST");
        assert_eq!(guess_input_scheme("Ṛgveda"), "IAST");
        assert_eq!(guess_input_scheme("kḸpta"), "IAST");
    }

    #[test]
    fn diacritics_override_native_script() {
        // Mostly Devanagari, a single macron still wins.
        assert_eq!(guess_input_scheme("संस्कृतम् संस्कृतम् ā"), "IAST");
        assert_eq!(guess_input_scheme("বাংলা ś"), "IAST");
    }

    #[test]
    fn native_scripts() {
        assert_eq!(guess_input_scheme("संस्कृतम्"), "DEVANAGARI");
        assert_eq!(guess_input_scheme("বাংলা ভাষা"), "BENGALI");
    }

    #[test]
    fn everything_else_is_itrans() {
        assert_eq!(guess_input_scheme("saMskRtam"), "ITRANS");
        assert_eq!(guess_input_scheme("தமிழ்"), "ITRANS");
        assert_eq!(guess_input_scheme(""), "ITRANS");
        assert_eq!(guess_input_scheme("12345"), "ITRANS");
    }

    #[test]
    fn dominant_script_decides() {
        // More Latin letters than Devanagari: falls through to ITRANS.
        assert_eq!(guess_input_scheme("rama and sita र"), "ITRANS");
    }

    #[test]
    fn source_for_fixed_and_auto() {
        let fixed = SourceScheme::Fixed("SLP1".into());
        assert_eq!(source_for(&fixed, "rāma"), "SLP1");
        assert_eq!(source_for(&SourceScheme::Auto, "rāma"), "IAST");
    }
}
