//! Shared test utilities: a small fixed versification and content fixtures.

use std::sync::Arc;

use crate::{
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

/// A fixed-size versification covering the books the suites navigate:
/// a short Genesis, the Gospels, and the quotation targets.
pub fn test_versification() -> Arc<TableVersification> {
    let jeremiah: Vec<u16> = vec![20; 31];
    Arc::new(
        TableVersification::new()
            .with_book(book("GEN"), &[10, 8])
            .with_book(book("PSA"), &[6, 12, 8])
            .with_book(book("JER"), &jeremiah)
            .with_book(book("MAT"), &[25, 23, 17, 25, 48])
            .with_book(book("MRK"), &[45, 28])
            .with_book(book("LUK"), &[80, 52, 38, 44])
            .with_book(book("JHN"), &[51, 34]),
    )
}

/// Genesis 1 and 2 fully populated, introductions included.
pub fn genesis_source() -> Arc<InMemorySource> {
    let mut source = InMemorySource::new();
    source.insert(key("GEN 0:0"), VerseData::plain("about this book"));
    source.insert(key("GEN 1:0"), VerseData::plain("chapter one introduction"));
    for verse in 1..=10u16 {
        source.insert(
            VerseKey::new(book("GEN"), 1, verse),
            VerseData::verse(format!("GEN 1:{verse} text")),
        );
    }
    for verse in 1..=8u16 {
        source.insert(
            VerseKey::new(book("GEN"), 2, verse),
            VerseData::verse(format!("GEN 2:{verse} text")),
        );
    }
    Arc::new(source)
}
