// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline integration tests: uploads through extraction, scheme resolution,
// dispatch, and packaging, checked by reading the archives back.

use std::io::{Cursor, Read};

use lipiwerk_app::{Output, Pipeline, Upload};
use lipiwerk_core::error::LipiwerkError;
use lipiwerk_core::types::{OutputEncoding, SourceScheme, TransliterationResult};
use lipiwerk_document::{DocumentExtractor, ExtractOptions};
use lipiwerk_translit::stub::StubBackend;
use lipiwerk_translit::{LipiBackend, SchemeRegistry};

fn txt(name: &str, text: &str) -> Upload {
    Upload::new(name, text.as_bytes())
}

fn extractor() -> DocumentExtractor {
    DocumentExtractor::new(ExtractOptions::default())
}

/// Entry names and contents in archive order.
fn read_archive(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            (entry.name().to_owned(), content)
        })
        .collect()
}

fn archive_of(output: Output) -> Vec<u8> {
    match output {
        Output::Archive(bytes) => bytes,
        other => panic!("expected an archive, got {other:?}"),
    }
}

// =============================================================================
// Output shape
// =============================================================================

#[test]
fn two_files_two_targets_make_four_entries() {
    let extractor = extractor();
    let backend = StubBackend::new();
    let registry = SchemeRegistry::discover(&backend);
    let pipeline = Pipeline::new(&extractor, &backend, &registry);

    let output = pipeline
        .run(
            &[txt("a.txt", "rAma"), txt("b.txt", "sItA")],
            &SourceScheme::parse("ITRANS"),
            &["IAST", "DEVANAGARI"],
        )
        .unwrap();
    let names: Vec<String> = read_archive(&archive_of(output))
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        names,
        vec![
            "a__IAST.txt",
            "a__DEVANAGARI.txt",
            "b__IAST.txt",
            "b__DEVANAGARI.txt"
        ]
    );
}

#[test]
fn one_file_many_targets_is_archive() {
    let extractor = extractor();
    let backend = StubBackend::new();
    let registry = SchemeRegistry::discover(&backend);
    let pipeline = Pipeline::new(&extractor, &backend, &registry);

    let output = pipeline
        .run(&[txt("a.txt", "rAma")], &SourceScheme::Auto, &["IAST", "SLP1"])
        .unwrap();
    assert!(output.is_archive());
}

#[test]
fn many_files_one_target_is_archive() {
    let extractor = extractor();
    let backend = StubBackend::new();
    let registry = SchemeRegistry::discover(&backend);
    let pipeline = Pipeline::new(&extractor, &backend, &registry);

    let output = pipeline
        .run(
            &[txt("a.txt", "rAma"), txt("b.txt", "sItA")],
            &SourceScheme::Auto,
            &["IAST"],
        )
        .unwrap();
    assert!(output.is_archive());
}

// =============================================================================
// Source resolution
// =============================================================================

#[test]
fn auto_source_is_guessed_per_document() {
    let extractor = extractor();
    let backend = StubBackend::new();
    let registry = SchemeRegistry::discover(&backend);
    let pipeline = Pipeline::new(&extractor, &backend, &registry);

    let output = pipeline
        .run(
            &[txt("deva.txt", "राम"), txt("iast.txt", "rāma"), txt("plain.txt", "rAma")],
            &SourceScheme::Auto,
            &["TAMIL"],
        )
        .unwrap();
    let contents: Vec<String> = read_archive(&archive_of(output))
        .into_iter()
        .map(|(_, content)| String::from_utf8(content).unwrap())
        .collect();
    assert_eq!(
        contents,
        vec![
            "DEVANAGARI->TAMIL:राम",
            "IAST->TAMIL:rāma",
            "ITRANS->TAMIL:rAma"
        ]
    );
}

#[test]
fn lowercase_auto_is_an_unknown_scheme() {
    let extractor = extractor();
    let backend = StubBackend::new();
    let registry = SchemeRegistry::discover(&backend);
    let pipeline = Pipeline::new(&extractor, &backend, &registry);

    let result = pipeline.run(&[txt("a.txt", "rAma")], &SourceScheme::parse("auto"), &["IAST"]);
    assert!(matches!(result, Err(LipiwerkError::UnknownScheme(id)) if id == "auto"));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn blank_document_is_request_fatal() {
    let extractor = extractor();
    let backend = StubBackend::new();
    let registry = SchemeRegistry::discover(&backend);
    let pipeline = Pipeline::new(&extractor, &backend, &registry);

    let err = pipeline
        .run(
            &[txt("a.txt", "rAma"), txt("empty.txt", " \n\t ")],
            &SourceScheme::Auto,
            &["IAST"],
        )
        .unwrap_err();
    assert!(matches!(&err, LipiwerkError::NoTextExtracted(name) if name == "empty.txt"));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn image_without_ocr_is_request_fatal() {
    let extractor = extractor();
    let backend = StubBackend::new();
    let registry = SchemeRegistry::discover(&backend);
    let pipeline = Pipeline::new(&extractor, &backend, &registry);

    let result = pipeline.run(
        &[Upload::new("scan.png", b"\x89PNG not really".to_vec())],
        &SourceScheme::Auto,
        &["IAST"],
    );
    assert!(matches!(result, Err(LipiwerkError::NoTextExtracted(name)) if name == "scan.png"));
}

#[test]
fn failing_target_keeps_other_entries() {
    let extractor = extractor();
    let backend = StubBackend::new().failing_on("DEVANAGARI");
    let registry = SchemeRegistry::discover(&backend);
    let pipeline = Pipeline::new(&extractor, &backend, &registry);

    let output = pipeline
        .run(
            &[txt("a.txt", "rAma")],
            &SourceScheme::parse("ITRANS"),
            &["IAST", "DEVANAGARI", "SLP1"],
        )
        .unwrap();
    let entries = read_archive(&archive_of(output));
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].1, b"ITRANS->IAST:rAma");
    assert!(entries[1].1.starts_with(b"[TRANSLIT ERROR]"));
    assert_eq!(entries[2].1, b"ITRANS->SLP1:rAma");
}

#[test]
fn failing_single_conversion_is_sentinel_text() {
    let extractor = extractor();
    let backend = StubBackend::new().failing_on("IAST");
    let registry = SchemeRegistry::discover(&backend);
    let pipeline = Pipeline::new(&extractor, &backend, &registry);

    let output = pipeline
        .run(&[txt("a.txt", "rAma")], &SourceScheme::Auto, &["IAST"])
        .unwrap();
    assert_eq!(
        output.into_bytes(OutputEncoding::Utf8),
        b"[TRANSLIT ERROR] no mapping from ITRANS to IAST".to_vec()
    );
}

#[test]
fn duplicate_stems_are_rejected() {
    let extractor = extractor();
    let backend = StubBackend::new();
    let registry = SchemeRegistry::discover(&backend);
    let pipeline = Pipeline::new(&extractor, &backend, &registry);

    let result = pipeline.run(
        &[txt("notes/a.txt", "rAma"), txt("other/a.txt", "sItA")],
        &SourceScheme::Auto,
        &["IAST"],
    );
    assert!(matches!(result, Err(LipiwerkError::DuplicateEntry(name)) if name == "a__IAST.txt"));
}

// =============================================================================
// Real backend
// =============================================================================

#[test]
fn iast_to_devanagari_end_to_end() {
    let extractor = extractor();
    let backend = LipiBackend::new();
    let registry = SchemeRegistry::discover(&backend);
    let pipeline = Pipeline::new(&extractor, &backend, &registry);

    let output = pipeline
        .run(&[txt("word.txt", "saṃskṛtam")], &SourceScheme::Auto, &["DEVANAGARI"])
        .unwrap();
    match output {
        Output::Text { result, .. } => {
            assert_eq!(result, TransliterationResult::Converted("संस्कृतम्".into()));
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn archive_entries_use_configured_encoding() {
    let extractor = extractor();
    let backend = StubBackend::new();
    let registry = SchemeRegistry::discover(&backend);
    let pipeline =
        Pipeline::new(&extractor, &backend, &registry).with_encoding(OutputEncoding::Utf8Bom);

    let output = pipeline
        .run(&[txt("a.txt", "rAma")], &SourceScheme::Auto, &["IAST", "SLP1"])
        .unwrap();
    for (_, content) in read_archive(&archive_of(output)) {
        assert!(content.starts_with(&[0xEF, 0xBB, 0xBF]));
    }
}
