//! Versification systems and the per-window conversion bridge.
//!
//! Different Bible editions chapter/verse their text differently (Psalm
//! numbering being the classic case). Navigation between windows is
//! coordinated in a single shared *reference* versification; each window owns
//! a [VersificationBridge] that converts reference keys into the local system
//! of its underlying text and back. The bridge also provides the verse-by-
//! verse stepping used when a context view walks across chapter and book
//! boundaries.

use std::{collections::BTreeMap, sync::Arc};

use crate::versekey::{BookCode, VerseKey};

/// Verse ceiling for introduction pseudo-chapters. Introduction material has
/// no natural verse count, so conversions clamp against this sentinel instead
/// of a table lookup.
pub const MAX_PSEUDOVERSES: u16 = 99;

/// Chapter/verse bounds, book ordering and reference-system conversion for
/// one versification scheme.
///
/// Implementations are read-only. Lookups return `None` for unknown
/// books/chapters; callers decide whether that is expected (introduction
/// pseudo-chapters) or a data problem worth logging.
pub trait VersificationSystem: Send + Sync {
    /// Number of real chapters in `book`, excluding the chapter-0
    /// introduction. `None` when the book is absent from this system.
    fn num_chapters(&self, book: BookCode) -> Option<u16>;

    /// Number of real verses in `(book, chapter)`, excluding the verse-0
    /// introduction. `None` when the book or chapter is absent.
    fn num_verses(&self, book: BookCode, chapter: u16) -> Option<u16>;

    fn first_book(&self) -> Option<BookCode>;

    fn previous_book(&self, book: BookCode) -> Option<BookCode>;

    fn next_book(&self, book: BookCode) -> Option<BookCode>;

    fn is_valid(&self, key: &VerseKey) -> bool {
        let Some(chapters) = self.num_chapters(key.book) else {
            return false;
        };
        if key.chapter > chapters {
            return false;
        }
        if key.chapter == 0 {
            return key.verse <= MAX_PSEUDOVERSES;
        }
        match self.num_verses(key.book, key.chapter) {
            Some(verses) => key.verse <= verses,
            None => key.verse == 0,
        }
    }

    /// Translate a key of this system into the shared reference system.
    /// Identity unless the edition's numbering diverges.
    fn convert_to_reference(&self, key: VerseKey) -> VerseKey {
        key
    }

    /// Translate a reference-system key into this system.
    fn convert_from_reference(&self, key: VerseKey) -> VerseKey {
        key
    }
}

/// Table-driven [VersificationSystem], the in-process backend for on-disk
/// editions and the fixture of choice in tests.
///
/// Books are held in canonical order; per-book verse counts are indexed by
/// chapter (chapter 1 at index 0). Divergences from the reference system are
/// sparse exception maps — any key not present converts as identity.
#[derive(Debug, Clone, Default)]
pub struct TableVersification {
    books: Vec<BookCode>,
    verse_counts: BTreeMap<BookCode, Vec<u16>>,
    to_reference: BTreeMap<VerseKey, VerseKey>,
    from_reference: BTreeMap<VerseKey, VerseKey>,
}

impl TableVersification {
    pub fn new() -> Self {
        TableVersification::default()
    }

    /// Append `book` with the given per-chapter verse counts (chapter 1
    /// first). Books are ordered by insertion.
    pub fn with_book(mut self, book: BookCode, counts: &[u16]) -> Self {
        self.books.push(book);
        self.verse_counts.insert(book, counts.to_vec());
        self
    }

    /// Record that `local` in this system corresponds to `reference` in the
    /// shared reference system. Registers both directions.
    pub fn with_mapping(mut self, local: VerseKey, reference: VerseKey) -> Self {
        self.to_reference.insert(local, reference);
        self.from_reference.insert(reference, local);
        self
    }
}

impl VersificationSystem for TableVersification {
    fn num_chapters(&self, book: BookCode) -> Option<u16> {
        self.verse_counts.get(&book).map(|c| c.len() as u16)
    }

    fn num_verses(&self, book: BookCode, chapter: u16) -> Option<u16> {
        if chapter == 0 {
            return None;
        }
        self.verse_counts
            .get(&book)?
            .get(chapter as usize - 1)
            .copied()
    }

    fn first_book(&self) -> Option<BookCode> {
        self.books.first().copied()
    }

    fn previous_book(&self, book: BookCode) -> Option<BookCode> {
        let pos = self.books.iter().position(|b| *b == book)?;
        pos.checked_sub(1).map(|p| self.books[p])
    }

    fn next_book(&self, book: BookCode) -> Option<BookCode> {
        let pos = self.books.iter().position(|b| *b == book)?;
        self.books.get(pos + 1).copied()
    }

    fn convert_to_reference(&self, key: VerseKey) -> VerseKey {
        match self.to_reference.get(&key.base()) {
            Some(mapped) => VerseKey {
                suffix: key.suffix,
                ..*mapped
            },
            None => key,
        }
    }

    fn convert_from_reference(&self, key: VerseKey) -> VerseKey {
        match self.from_reference.get(&key.base()) {
            Some(mapped) => VerseKey {
                suffix: key.suffix,
                ..*mapped
            },
            None => key,
        }
    }
}

/// Per-window conversion and stepping over one [VersificationSystem].
#[derive(Clone)]
pub struct VersificationBridge {
    system: Arc<dyn VersificationSystem>,
}

impl VersificationBridge {
    pub fn new(system: Arc<dyn VersificationSystem>) -> Self {
        VersificationBridge { system }
    }

    pub fn system(&self) -> &Arc<dyn VersificationSystem> {
        &self.system
    }

    /// Convert a shared reference-system key into this window's local system.
    pub fn to_local(&self, reference: VerseKey) -> VerseKey {
        self.system.convert_from_reference(reference)
    }

    /// Convert a local key back into the shared reference system, used when
    /// this window itself initiates navigation.
    pub fn to_reference(&self, local: VerseKey) -> VerseKey {
        self.system.convert_to_reference(local)
    }

    /// Upper verse bound used when clamping converted keys. Introduction
    /// pseudo-chapters have no natural verse count, so chapter 0 answers the
    /// [MAX_PSEUDOVERSES] sentinel without a lookup.
    pub fn verse_ceiling(&self, book: BookCode, chapter: u16) -> u16 {
        if chapter == 0 {
            return MAX_PSEUDOVERSES;
        }
        self.num_verses_or_zero(book, chapter)
    }

    /// Verse count with not-found recovered as zero. Missing chapter 0 is
    /// the expected case (no introduction material); anything else is a data
    /// problem in the underlying tables, logged but never fatal — navigation
    /// must not halt on a bad lookup.
    pub fn num_verses_or_zero(&self, book: BookCode, chapter: u16) -> u16 {
        match self.system.num_verses(book, chapter) {
            Some(verses) => verses,
            None if chapter == 0 => {
                tracing::debug!("No verse count for {book} introduction, treating as empty");
                0
            }
            None => {
                tracing::error!("No verse count for {book} {chapter}, treating as empty");
                0
            }
        }
    }

    /// Step one verse backward, rolling over chapter and book boundaries.
    ///
    /// Verse 1 steps to the previous chapter's last verse (pseudo-verse 0 is
    /// not visited); chapter 1 steps to the previous book's last chapter and
    /// verse. `None` once the walk runs off the front of the first book.
    pub fn previous_verse(&self, key: VerseKey) -> Option<VerseKey> {
        if key.verse > 1 {
            return Some(key.at(key.chapter, key.verse - 1));
        }
        let mut chapter = key.chapter;
        while chapter > 1 {
            chapter -= 1;
            let verses = self.num_verses_or_zero(key.book, chapter);
            if verses > 0 {
                return Some(key.at(chapter, verses));
            }
        }
        let previous = self.system.previous_book(key.book)?;
        let mut chapter = self.system.num_chapters(previous)?;
        while chapter > 0 {
            let verses = self.num_verses_or_zero(previous, chapter);
            if verses > 0 {
                return Some(VerseKey::new(previous, chapter, verses));
            }
            chapter -= 1;
        }
        None
    }

    /// Step one verse forward, rolling over into the next chapter. An
    /// unknown verse count reads as an empty chapter, forcing the rollover.
    /// `None` past the last chapter of the book — forward stepping does not
    /// cross book boundaries.
    pub fn next_verse(&self, key: VerseKey) -> Option<VerseKey> {
        let verses = self.num_verses_or_zero(key.book, key.chapter);
        if key.verse < verses {
            return Some(key.at(key.chapter, key.verse + 1));
        }
        let chapters = self.system.num_chapters(key.book)?;
        let mut chapter = key.chapter;
        while chapter < chapters {
            chapter += 1;
            if self.num_verses_or_zero(key.book, chapter) > 0 {
                return Some(key.at(chapter, 1));
            }
        }
        None
    }
}

impl std::fmt::Debug for VersificationBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("VersificationBridge").finish_non_exhaustive()
    }
}
