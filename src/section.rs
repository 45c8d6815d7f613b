//! Locating the editorial section that encloses a verse.
//!
//! "By section" context views need the nearest section-heading boundaries
//! around the current verse. Headings live inside verse content (markers
//! `s`/`s1`..`s4`), so finding them is a content scan: backward for the start,
//! forward for the end, each clamped to one chapter so a heading-free text
//! cannot send the scan through the whole book. All probes go through the
//! window's [VerseCache], which makes repeated section lookups near a
//! position cheap.

use crate::{
    cache::VerseCache,
    provider::ContentSource,
    versekey::VerseKey,
    versification::VersificationBridge,
};

/// The enclosing section of a queried verse.
///
/// `start` is the first verse of the section. `end` is the first verse of
/// the *next* section — an exclusive upper bound — or the one-chapter-forward
/// boundary when no further heading exists in range. Neither bound is ever
/// more than one chapter away from the queried verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBounds {
    pub start: VerseKey,
    pub end: VerseKey,
}

/// Scans cached verse content for the section boundaries around a verse.
pub struct SectionFinder<'a> {
    bridge: &'a VersificationBridge,
    source: &'a dyn ContentSource,
}

impl<'a> SectionFinder<'a> {
    pub fn new(bridge: &'a VersificationBridge, source: &'a dyn ContentSource) -> Self {
        SectionFinder { bridge, source }
    }

    /// Find the section enclosing `key`, probing content through `cache`.
    pub fn find(&self, cache: &mut VerseCache, key: VerseKey) -> SectionBounds {
        let key = key.base();
        let start = self.find_start(cache, key);
        let end = self.find_end(cache, key);
        tracing::debug!("Section around {key}: {start} .. {end}");
        SectionBounds { start, end }
    }

    /// Scan backward from `key` (inclusive) for the nearest verse whose
    /// content opens a section. The scan covers at most the current chapter
    /// and the one before it, and never runs past the book introduction.
    /// Without a hit the section is taken to start at the one-chapter-back
    /// boundary's introduction.
    fn find_start(&self, cache: &mut VerseCache, key: VerseKey) -> VerseKey {
        let floor = key.chapter.saturating_sub(1);
        let mut chapter = key.chapter;
        let mut verse = key.verse;
        loop {
            let candidate = key.at(chapter, verse);
            if self.opens_section(cache, candidate) {
                return candidate;
            }
            if verse > 0 {
                verse -= 1;
                continue;
            }
            // Verse 0 of the clamp chapter (or of the introduction) ends the
            // scan.
            if chapter <= floor {
                break;
            }
            chapter -= 1;
            verse = self.bridge.num_verses_or_zero(key.book, chapter);
        }
        key.at(floor, 0)
    }

    /// Scan forward from the verse after `key` for the next section heading,
    /// covering at most the current chapter and the one after it (bounded by
    /// the book's chapter count). Without a hit the section is taken to end
    /// at the one-chapter-forward boundary's last verse.
    fn find_end(&self, cache: &mut VerseCache, key: VerseKey) -> VerseKey {
        let chapters = self
            .bridge
            .system()
            .num_chapters(key.book)
            .unwrap_or(key.chapter);
        let ceiling = key.chapter.saturating_add(1).min(chapters.max(key.chapter));
        let mut chapter = key.chapter;
        let mut verse = key.verse + 1;
        loop {
            let limit = self.bridge.num_verses_or_zero(key.book, chapter);
            while verse <= limit {
                let candidate = key.at(chapter, verse);
                if self.opens_section(cache, candidate) {
                    return candidate;
                }
                verse += 1;
            }
            if chapter >= ceiling {
                break;
            }
            chapter += 1;
            verse = 0;
        }
        key.at(ceiling, self.bridge.num_verses_or_zero(key.book, ceiling))
    }

    fn opens_section(&self, cache: &mut VerseCache, candidate: VerseKey) -> bool {
        cache
            .get_or_fetch(candidate, |k| self.source.get_context_verse_data(k))
            .map(|content| content.has_section_heading())
            .unwrap_or(false)
    }
}
