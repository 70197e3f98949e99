// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Script detection by Unicode block counting.
//
// Equal counts are settled by table order, not by which script appears first
// in the text: "aर" is Devanagari because Devanagari is listed before Latin.
// Earlier Python tooling picked the first script met in the text instead.

use lipiwerk_core::types::Script;

/// Number of entries in [`SCRIPT_RANGES`].
pub const SCRIPT_COUNT: usize = 13;

/// Known Unicode blocks as inclusive codepoint ranges.
///
/// Order matters: it breaks ties between equally frequent scripts. Ranges are
/// not assumed to be disjoint; a character counts towards every range that
/// contains it.
pub const SCRIPT_RANGES: [(Script, u32, u32); SCRIPT_COUNT] = [
    (Script::Devanagari, 0x0900, 0x097F),
    (Script::Bengali, 0x0980, 0x09FF),
    (Script::Gurmukhi, 0x0A00, 0x0A7F),
    (Script::Gujarati, 0x0A80, 0x0AFF),
    (Script::Oriya, 0x0B00, 0x0B7F),
    (Script::Tamil, 0x0B80, 0x0BFF),
    (Script::Telugu, 0x0C00, 0x0C7F),
    (Script::Kannada, 0x0C80, 0x0CFF),
    (Script::Malayalam, 0x0D00, 0x0D7F),
    (Script::Latin, 0x0041, 0x007A),
    (Script::Arabic, 0x0600, 0x06FF),
    (Script::Hebrew, 0x0590, 0x05FF),
    (Script::Cyrillic, 0x0400, 0x04FF),
];

/// Per-script character counts, indexed like [`SCRIPT_RANGES`].
pub fn count_scripts(text: &str) -> [usize; SCRIPT_COUNT] {
    let mut counts = [0usize; SCRIPT_COUNT];
    for ch in text.chars() {
        let cp = u32::from(ch);
        for (slot, (_, lo, hi)) in counts.iter_mut().zip(SCRIPT_RANGES.iter()) {
            if (*lo..=*hi).contains(&cp) {
                *slot += 1;
            }
        }
    }
    counts
}

/// Return the script with the most characters in `text`.
///
/// Ties go to the script listed first in [`SCRIPT_RANGES`]. Text with no
/// character in any listed block is [`Script::Unknown`].
pub fn detect_script(text: &str) -> Script {
    let counts = count_scripts(text);

    let mut best = Script::Unknown;
    let mut best_count = 0usize;
    for (count, (script, _, _)) in counts.iter().zip(SCRIPT_RANGES.iter()) {
        if *count > best_count {
            best = *script;
            best_count = *count;
        }
    }
    best
}

/// Non-zero script counts in table order, for diagnostics.
pub fn script_histogram(text: &str) -> Vec<(Script, usize)> {
    count_scripts(text)
        .iter()
        .zip(SCRIPT_RANGES.iter())
        .filter(|(count, _)| **count > 0)
        .map(|(count, (script, _, _))| (*script, *count))
        .collect()
}
