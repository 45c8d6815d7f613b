//! Shared fixtures for integration tests: a small fixed versification and
//! in-memory editions covering the passages the scenarios navigate.

use std::sync::Arc;

use lectern_core::{
    provider::{InMemorySource, VerseData},
    versekey::{BookCode, VerseKey},
    versification::TableVersification,
};

pub fn book(s: &str) -> BookCode {
    s.parse().unwrap()
}

pub fn key(s: &str) -> VerseKey {
    s.parse().unwrap()
}

pub fn test_versification() -> Arc<TableVersification> {
    let jeremiah: Vec<u16> = vec![20; 31];
    Arc::new(
        TableVersification::new()
            .with_book(book("GEN"), &[10, 8])
            .with_book(book("JER"), &jeremiah)
            .with_book(book("MAT"), &[25, 23, 17, 25, 48])
            .with_book(book("MRK"), &[45, 28])
            .with_book(book("LUK"), &[80, 52, 38, 44])
            .with_book(book("JHN"), &[51, 34]),
    )
}

/// An edition holding every passage the broadcast scenarios visit.
pub fn scenario_source() -> Arc<InMemorySource> {
    let mut source = InMemorySource::new();
    for reference in [
        "GEN 1:1",
        "MAT 2:18",
        "MAT 3:13",
        "MAT 5:1",
        "MRK 1:9",
        "LUK 3:21",
        "JHN 1:32",
        "JER 31:15",
    ] {
        source.insert(key(reference), VerseData::verse(format!("{reference} text")));
    }
    Arc::new(source)
}
