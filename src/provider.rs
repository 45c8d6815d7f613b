//! Verse content model and the provider seam.
//!
//! Windows never talk to a Bible backend directly; they go through the
//! [ContentSource] trait, with the backend family named by the closed
//! [BackendKind] set. Content itself is opaque to the synchronization core:
//! either a sequence of marker/text entries or a plain string, inspected only
//! for section-heading markers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{versekey::VerseKey, LecternError};

/// Markers that open an editorial section in structured content.
pub const SECTION_MARKERS: [&str; 5] = ["s", "s1", "s2", "s3", "s4"];

/// Section-heading markup as it appears embedded in unstructured content.
const PLAIN_SECTION_MARKERS: [&str; 4] = ["\\s ", "\\s1", "\\s2", "\\s3"];

/// One marker/text pair of structured verse content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseEntry {
    pub marker: String,
    pub text: String,
}

impl VerseEntry {
    pub fn new(marker: impl Into<String>, text: impl Into<String>) -> Self {
        VerseEntry {
            marker: marker.into(),
            text: text.into(),
        }
    }
}

/// Displayable content for one verse key, as delivered by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerseData {
    /// Structured marker/text entries.
    Entries(Vec<VerseEntry>),
    /// Unstructured text with embedded markup.
    Plain(String),
}

impl VerseData {
    pub fn plain(text: impl Into<String>) -> Self {
        VerseData::Plain(text.into())
    }

    /// A single-entry structured verse.
    pub fn verse(text: impl Into<String>) -> Self {
        VerseData::Entries(vec![VerseEntry::new("v", text)])
    }

    /// A section heading followed by one verse of text.
    pub fn heading_and_verse(heading: impl Into<String>, text: impl Into<String>) -> Self {
        VerseData::Entries(vec![
            VerseEntry::new("s1", heading),
            VerseEntry::new("v", text),
        ])
    }

    /// Whether this content opens an editorial section: any entry marker in
    /// [SECTION_MARKERS] for structured content, or section markup appearing
    /// anywhere in the text for unstructured content.
    pub fn has_section_heading(&self) -> bool {
        match self {
            VerseData::Entries(entries) => entries
                .iter()
                .any(|entry| SECTION_MARKERS.contains(&entry.marker.as_str())),
            VerseData::Plain(text) => PLAIN_SECTION_MARKERS
                .iter()
                .any(|marker| text.contains(marker)),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            VerseData::Entries(entries) => entries.is_empty(),
            VerseData::Plain(text) => text.is_empty(),
        }
    }
}

/// A Bible content backend, queried one verse key at a time.
///
/// `Ok(None)` means the backend has no displayable content for the key —
/// common for introductions and just past book boundaries, and never an
/// error. `Err` covers backend failures (missing module, network fault); the
/// caching layer recovers these as no-content.
pub trait ContentSource: Send + Sync {
    fn get_context_verse_data(&self, key: &VerseKey) -> Result<Option<VerseData>, LecternError>;
}

/// The closed set of backend families a window can be wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BackendKind {
    /// On-disk edition loaded into the process.
    #[default]
    Internal,
    /// Locally installed Sword module.
    Sword,
    /// Online Digital Bible Platform content.
    DigitalBiblePlatform,
    /// Hebrew interlinear with per-word glossing.
    HebrewInterlinear,
}

impl BackendKind {
    /// Remote, rate-limited backends must not be asked for whole books or
    /// chapters; the planner downgrades those view modes to single-verse.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, BackendKind::DigitalBiblePlatform)
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BackendKind::Internal => write!(f, "Internal"),
            BackendKind::Sword => write!(f, "Sword"),
            BackendKind::DigitalBiblePlatform => write!(f, "DBP"),
            BackendKind::HebrewInterlinear => write!(f, "HebrewInterlinear"),
        }
    }
}

/// Map-backed [ContentSource]: the Internal backend's storage and the test
/// fixture. Keys are held suffixless; a bridge's content lives under its
/// first verse number.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    verses: BTreeMap<VerseKey, VerseData>,
}

impl InMemorySource {
    pub fn new() -> Self {
        InMemorySource::default()
    }

    pub fn with_verse(mut self, key: VerseKey, data: VerseData) -> Self {
        self.verses.insert(key.base(), data);
        self
    }

    pub fn insert(&mut self, key: VerseKey, data: VerseData) {
        self.verses.insert(key.base(), data);
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

impl ContentSource for InMemorySource {
    fn get_context_verse_data(&self, key: &VerseKey) -> Result<Option<VerseData>, LecternError> {
        Ok(self.verses.get(&key.base()).cloned())
    }
}
