// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch packager — one zip entry per (file × target) pair.
//
// Entries are ordered files-outer, targets-inner, following input order. The
// archive is built fully in memory: every identifier and entry name is checked
// before the first byte is written, so a caller either gets the whole archive
// or an error.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use lipiwerk_core::error::{LipiwerkError, Result};
use lipiwerk_core::types::{ExtractedDocument, OutputEncoding, SourceScheme};
use tracing::debug;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::backend::Transliterator;
use crate::dispatch::Dispatcher;
use crate::guess::source_for;

/// Archive entry name for `filename` converted to `target`:
/// `{stem}__{target}.txt`, where the stem drops directories and the final
/// extension.
pub fn entry_name(filename: &str, target: &str) -> String {
    format!("{}__{}.txt", file_stem(filename), target)
}

fn file_stem(filename: &str) -> &str {
    let base = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);
    // Leading dots belong to the name (".profile" has no extension).
    match base.rfind('.') {
        Some(dot) if base[..dot].chars().any(|c| c != '.') => &base[..dot],
        _ => base,
    }
}

/// One planned archive entry with its handles already resolved.
struct PlannedEntry<'t, H> {
    name: String,
    text: &'t str,
    from: H,
    to: H,
}

/// Packages converted texts into a deflate-compressed zip archive.
pub struct BatchPackager<'a, T: Transliterator> {
    dispatcher: Dispatcher<'a, T>,
    encoding: OutputEncoding,
}

impl<'a, T: Transliterator> BatchPackager<'a, T> {
    pub fn new(dispatcher: Dispatcher<'a, T>) -> Self {
        Self {
            dispatcher,
            encoding: OutputEncoding::Utf8,
        }
    }

    /// Encode entry contents with `encoding` instead of UTF-8.
    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Convert every `(filename, text)` pair from `source` into every target.
    ///
    /// # Errors
    ///
    /// - [`LipiwerkError::UnknownScheme`] if `source` or any target is not
    ///   registered.
    /// - [`LipiwerkError::DuplicateEntry`] if two pairs map to the same entry
    ///   name.
    /// - [`LipiwerkError::Archive`] if the zip writer fails.
    ///
    /// Conversion failures do not error; their sentinel text is written as the
    /// entry's content.
    pub fn package<'t, I, N, S>(&self, files: I, source: &str, targets: &[S]) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = (N, &'t str)>,
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let registry = self.dispatcher.registry();
        let from = registry.resolve(source)?;
        let resolved = self.resolve_targets(targets)?;

        let mut plan = Vec::new();
        for (filename, text) in files {
            for (target, to) in &resolved {
                plan.push(PlannedEntry {
                    name: entry_name(filename.as_ref(), target),
                    text,
                    from,
                    to: *to,
                });
            }
        }
        self.write_archive(plan)
    }

    /// Like [`package`](Self::package), but an `Auto` source is guessed per
    /// document.
    pub fn package_documents<S: AsRef<str>>(
        &self,
        documents: &[ExtractedDocument],
        source: &SourceScheme,
        targets: &[S],
    ) -> Result<Vec<u8>> {
        let registry = self.dispatcher.registry();
        let resolved = self.resolve_targets(targets)?;

        let mut plan = Vec::with_capacity(documents.len() * resolved.len());
        for document in documents {
            let from = registry.resolve(source_for(source, &document.text))?;
            for (target, to) in &resolved {
                plan.push(PlannedEntry {
                    name: entry_name(&document.filename, target),
                    text: document.text.as_str(),
                    from,
                    to: *to,
                });
            }
        }
        self.write_archive(plan)
    }

    fn resolve_targets<'s, S: AsRef<str>>(
        &self,
        targets: &'s [S],
    ) -> Result<Vec<(&'s str, T::Handle)>> {
        let registry = self.dispatcher.registry();
        targets
            .iter()
            .map(|target| {
                let target = target.as_ref();
                registry.resolve(target).map(|handle| (target, handle))
            })
            .collect()
    }

    fn write_archive(&self, plan: Vec<PlannedEntry<'_, T::Handle>>) -> Result<Vec<u8>> {
        let mut seen = HashSet::with_capacity(plan.len());
        for entry in &plan {
            if !seen.insert(entry.name.as_str()) {
                return Err(LipiwerkError::DuplicateEntry(entry.name.clone()));
            }
        }

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut failed = 0usize;

        for entry in &plan {
            let result = self
                .dispatcher
                .convert_resolved(entry.text, entry.from, entry.to);
            if result.is_failed() {
                failed += 1;
            }
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            writer
                .start_file(entry.name.as_str(), options)
                .map_err(|err| LipiwerkError::Archive(format!("{}: {}", entry.name, err)))?;
            writer.write_all(&self.encoding.encode(&result.into_text()))?;
        }

        let cursor = writer
            .finish()
            .map_err(|err| LipiwerkError::Archive(err.to_string()))?;
        let bytes = cursor.into_inner();

        debug!(
            entries = plan.len(),
            failed,
            archive_bytes = bytes.len(),
            "batch archive built"
        );
        Ok(bytes)
    }
}
