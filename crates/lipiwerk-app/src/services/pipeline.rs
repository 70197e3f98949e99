// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request pipeline — uploads in, one converted text or one zip archive out.
//
// Steps, in order:
// 1. an empty target list is rejected;
// 2. every upload is extracted, and a document with blank text fails the request;
// 3. the source scheme is fixed or guessed per document;
// 4. a single file converted to a single target comes back as text, anything
//    else as an archive.

use lipiwerk_core::error::{LipiwerkError, Result};
use lipiwerk_core::types::{ExtractedDocument, OutputEncoding, SourceScheme, TransliterationResult};
use lipiwerk_document::DocumentExtractor;
use lipiwerk_translit::{BatchPackager, Dispatcher, SchemeRegistry, Transliterator, source_for};
use tracing::{debug, info, instrument};

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// What a request produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Single file, single target. A conversion failure is carried as
    /// `Failed`; its sentinel text is what gets written.
    Text {
        filename: String,
        target: String,
        result: TransliterationResult,
    },
    /// Zip archive bytes, entries already encoded.
    Archive(Vec<u8>),
}

impl Output {
    /// Bytes to write out. Text is encoded here; archive entries were
    /// encoded when the archive was built.
    pub fn into_bytes(self, encoding: OutputEncoding) -> Vec<u8> {
        match self {
            Self::Text { result, .. } => encoding.encode(&result.into_text()),
            Self::Archive(bytes) => bytes,
        }
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Archive(_))
    }
}

/// Everything one request needs, borrowed from process-wide state.
pub struct Pipeline<'a, T: Transliterator> {
    extractor: &'a DocumentExtractor,
    backend: &'a T,
    registry: &'a SchemeRegistry<T::Handle>,
    encoding: OutputEncoding,
}

impl<'a, T: Transliterator> Pipeline<'a, T> {
    pub fn new(
        extractor: &'a DocumentExtractor,
        backend: &'a T,
        registry: &'a SchemeRegistry<T::Handle>,
    ) -> Self {
        Self {
            extractor,
            backend,
            registry,
            encoding: OutputEncoding::Utf8,
        }
    }

    /// Encoding for archive entries.
    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Run one request.
    ///
    /// # Errors
    ///
    /// - [`LipiwerkError::NoTargets`] when `targets` is empty.
    /// - [`LipiwerkError::NoTextExtracted`] naming the first upload whose
    ///   extracted text is blank.
    /// - [`LipiwerkError::UnknownScheme`] for an unregistered source or target.
    /// - [`LipiwerkError::DuplicateEntry`] / [`LipiwerkError::Archive`] from
    ///   archive packaging.
    #[instrument(skip_all, fields(uploads = uploads.len(), targets = targets.len(), source = %source))]
    pub fn run<S: AsRef<str>>(
        &self,
        uploads: &[Upload],
        source: &SourceScheme,
        targets: &[S],
    ) -> Result<Output> {
        if targets.is_empty() {
            return Err(LipiwerkError::NoTargets);
        }

        let documents = self.extract_all(uploads)?;
        let dispatcher = Dispatcher::new(self.backend, self.registry);

        if let ([document], [target]) = (documents.as_slice(), targets) {
            let target = target.as_ref();
            let from = source_for(source, &document.text);
            debug!(from, to = target, "single conversion");
            let result = dispatcher.transliterate(&document.text, from, target)?;
            info!(failed = result.is_failed(), "Pipeline produced text");
            return Ok(Output::Text {
                filename: document.filename.clone(),
                target: target.to_owned(),
                result,
            });
        }

        let archive = BatchPackager::new(dispatcher)
            .with_encoding(self.encoding)
            .package_documents(&documents, source, targets)?;
        info!(bytes = archive.len(), "Pipeline produced archive");
        Ok(Output::Archive(archive))
    }

    /// Extract every upload, failing on the first one with no usable text.
    pub fn extract_all(&self, uploads: &[Upload]) -> Result<Vec<ExtractedDocument>> {
        uploads
            .iter()
            .map(|upload| {
                let document = self.extractor.extract(&upload.filename, &upload.bytes);
                if document.has_text() {
                    Ok(document)
                } else {
                    Err(LipiwerkError::NoTextExtracted(upload.filename.clone()))
                }
            })
            .collect()
    }
}
