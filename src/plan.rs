//! Context-view planning: which verses a window shows, in order.
//!
//! A window's context-view mode decides how much text surrounds the current
//! verse — the verse alone, a sliding before/after window, the enclosing
//! editorial section, the whole chapter or the whole book. Given a local-
//! versification verse key, the [ContextViewPlanner] resolves the mode into a
//! flat display-ordered list of [PlannedVerse] rows, filling the window's
//! [VerseCache] along the way so the renderer never touches the backend.

use serde::{Deserialize, Serialize};

use crate::{
    cache::VerseCache,
    provider::{BackendKind, ContentSource, VerseData},
    section::SectionFinder,
    versekey::VerseKey,
    versification::VersificationBridge,
};

/// Default count of verses shown before the current verse.
pub const DEFAULT_VERSES_BEFORE: u16 = 2;

/// Default count of verses shown after the current verse.
pub const DEFAULT_VERSES_AFTER: u16 = 6;

/// How much surrounding text a window shows around the current verse.
///
/// Plain mode flags, not a state machine: any mode may be selected from any
/// other, and a window keeps its mode until the user changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ContextViewMode {
    #[default]
    BeforeAndAfter,
    BySection,
    ByVerse,
    ByBook,
    ByChapter,
}

impl std::fmt::Display for ContextViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ContextViewMode::BeforeAndAfter => write!(f, "BeforeAndAfter"),
            ContextViewMode::BySection => write!(f, "BySection"),
            ContextViewMode::ByVerse => write!(f, "ByVerse"),
            ContextViewMode::ByBook => write!(f, "ByBook"),
            ContextViewMode::ByChapter => write!(f, "ByChapter"),
        }
    }
}

/// One display row of a planned view.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedVerse {
    pub key: VerseKey,
    /// `None` renders as nothing (empty introduction, missing key).
    pub content: Option<VerseData>,
    /// True for exactly the row answering the queried verse.
    pub is_current: bool,
}

/// Resolves a context-view mode and a queried verse into display rows.
pub struct ContextViewPlanner<'a> {
    bridge: &'a VersificationBridge,
    source: &'a dyn ContentSource,
    backend: BackendKind,
    verses_before: u16,
    verses_after: u16,
}

impl<'a> ContextViewPlanner<'a> {
    pub fn new(
        bridge: &'a VersificationBridge,
        source: &'a dyn ContentSource,
        backend: BackendKind,
    ) -> Self {
        ContextViewPlanner {
            bridge,
            source,
            backend,
            verses_before: DEFAULT_VERSES_BEFORE,
            verses_after: DEFAULT_VERSES_AFTER,
        }
    }

    /// Configure the before/after counts used by
    /// [ContextViewMode::BeforeAndAfter].
    pub fn with_context(mut self, verses_before: u16, verses_after: u16) -> Self {
        self.verses_before = verses_before;
        self.verses_after = verses_after;
        self
    }

    /// The mode actually planned for this window's backend. Whole-book and
    /// whole-chapter views would hammer a rate-limited remote backend with
    /// one request per verse, so those are quietly narrowed to single-verse.
    pub fn effective_mode(&self, mode: ContextViewMode) -> ContextViewMode {
        match mode {
            ContextViewMode::ByBook | ContextViewMode::ByChapter
                if self.backend.is_rate_limited() =>
            {
                tracing::warn!(
                    "{mode} is unavailable on the rate-limited {} backend, showing ByVerse",
                    self.backend
                );
                ContextViewMode::ByVerse
            }
            other => other,
        }
    }

    /// Plan the view for `key` (already in this window's local
    /// versification), fetching any missing content through `cache`.
    pub fn plan(
        &self,
        cache: &mut VerseCache,
        mode: ContextViewMode,
        key: VerseKey,
    ) -> Vec<PlannedVerse> {
        let key = key.base();
        match self.effective_mode(mode) {
            ContextViewMode::ByVerse => self.plan_by_verse(cache, key),
            ContextViewMode::BeforeAndAfter => self.plan_before_and_after(cache, key),
            ContextViewMode::BySection => self.plan_by_section(cache, key),
            ContextViewMode::ByBook => self.plan_by_book(cache, key),
            ContextViewMode::ByChapter => self.plan_by_chapter(cache, key),
        }
    }

    fn fetch(&self, cache: &mut VerseCache, key: VerseKey) -> Option<VerseData> {
        cache
            .get_or_fetch(key, |k| self.source.get_context_verse_data(k))
            .cloned()
    }

    /// Single-verse plan with verse-bridge recovery: when the exact verse has
    /// no content the start of a covering bridge is sought at progressively
    /// earlier verse numbers in the same chapter.
    fn plan_by_verse(&self, cache: &mut VerseCache, key: VerseKey) -> Vec<PlannedVerse> {
        let mut candidate = key;
        loop {
            if let Some(content) = self.fetch(cache, candidate) {
                if candidate != key {
                    tracing::debug!("{key} resolved to bridge start {candidate}");
                }
                return vec![PlannedVerse {
                    key: candidate,
                    content: Some(content),
                    is_current: true,
                }];
            }
            if candidate.verse <= 1 {
                break;
            }
            candidate = candidate.at(candidate.chapter, candidate.verse - 1);
        }
        tracing::error!("No content found for {key} or any earlier verse in its chapter");
        vec![PlannedVerse {
            key,
            content: None,
            is_current: true,
        }]
    }

    fn plan_before_and_after(&self, cache: &mut VerseCache, key: VerseKey) -> Vec<PlannedVerse> {
        let mut keys = Vec::with_capacity(self.verses_before as usize + 1);
        let mut cursor = key;
        for _ in 0..self.verses_before {
            match self.bridge.previous_verse(cursor) {
                Some(previous) => {
                    keys.push(previous);
                    cursor = previous;
                }
                // Off the front of the first book: the before-list is
                // simply shorter.
                None => break,
            }
        }
        keys.reverse();
        keys.push(key);
        let mut cursor = key;
        for _ in 0..self.verses_after {
            match self.bridge.next_verse(cursor) {
                Some(next) => {
                    keys.push(next);
                    cursor = next;
                }
                None => break,
            }
        }
        keys.into_iter()
            .map(|k| PlannedVerse {
                key: k,
                content: self.fetch(cache, k),
                is_current: k == key,
            })
            .collect()
    }

    fn plan_by_section(&self, cache: &mut VerseCache, key: VerseKey) -> Vec<PlannedVerse> {
        let bounds = SectionFinder::new(self.bridge, self.source).find(cache, key);
        let mut rows = Vec::new();
        for chapter in bounds.start.chapter..=bounds.end.chapter {
            let first = if chapter == bounds.start.chapter {
                bounds.start.verse
            } else {
                0
            };
            let last = if chapter == bounds.end.chapter {
                bounds.end.verse
            } else {
                self.bridge.num_verses_or_zero(key.book, chapter)
            };
            for verse in first..=last {
                let row_key = key.at(chapter, verse);
                rows.push(PlannedVerse {
                    key: row_key,
                    content: self.fetch(cache, row_key),
                    is_current: row_key.same_verse(&key),
                });
            }
        }
        rows
    }

    /// Every verse of every chapter, introductions included: chapter 0 is
    /// the book introduction and verse 0 each chapter's introduction, each
    /// visited exactly once.
    fn plan_by_book(&self, cache: &mut VerseCache, key: VerseKey) -> Vec<PlannedVerse> {
        let chapters = self.bridge.system().num_chapters(key.book).unwrap_or(0);
        let mut rows = Vec::new();
        for chapter in 0..=chapters {
            self.push_chapter_rows(cache, key, chapter, &mut rows);
        }
        rows
    }

    fn plan_by_chapter(&self, cache: &mut VerseCache, key: VerseKey) -> Vec<PlannedVerse> {
        let mut rows = Vec::new();
        self.push_chapter_rows(cache, key, key.chapter, &mut rows);
        rows
    }

    fn push_chapter_rows(
        &self,
        cache: &mut VerseCache,
        key: VerseKey,
        chapter: u16,
        rows: &mut Vec<PlannedVerse>,
    ) {
        let last = self.bridge.num_verses_or_zero(key.book, chapter);
        for verse in 0..=last {
            let row_key = key.at(chapter, verse);
            rows.push(PlannedVerse {
                key: row_key,
                content: self.fetch(cache, row_key),
                is_current: row_key.same_verse(&key),
            });
        }
    }
}
