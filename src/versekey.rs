//! [crate::versekey] contains the [BookCode] and [VerseKey] value types used to
//! address a location in Bible text, plus the reference-string parsing used to
//! turn user input like `MAT 2:18b` into keys.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::LecternError;

/// Canonical 3-character book code (`GEN`, `PSA`, `MAT`, `CO1`).
///
/// Codes are uppercase ASCII letters/digits. Which codes exist, and their
/// canonical order, is owned by the active
/// [`VersificationSystem`](crate::versification::VersificationSystem) — this
/// type only enforces the lexical shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookCode([u8; 3]);

impl BookCode {
    pub fn as_str(&self) -> &str {
        // Constructors only admit ASCII, so this cannot fail.
        std::str::from_utf8(&self.0).expect("book codes are ASCII")
    }
}

impl TryFrom<&str> for BookCode {
    type Error = LecternError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let trimmed = s.trim();
        if trimmed.len() != 3
            || !trimmed
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(LecternError::Reference(format!(
                "'{s}' is not a 3-character canonical book code"
            )));
        }
        let bytes = trimmed.as_bytes();
        Ok(BookCode([bytes[0], bytes[1], bytes[2]]))
    }
}

impl TryFrom<String> for BookCode {
    type Error = LecternError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        BookCode::try_from(s.as_str())
    }
}

impl From<BookCode> for String {
    fn from(code: BookCode) -> String {
        code.as_str().to_string()
    }
}

impl FromStr for BookCode {
    type Err = LecternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookCode::try_from(s)
    }
}

impl Display for BookCode {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable book/chapter/verse reference.
///
/// Chapter 0 is the book-introduction pseudo-chapter and verse 0 the
/// chapter-introduction pseudo-verse; real chapters and verses count from 1.
/// The optional suffix marks a subverse or the start of a verse bridge
/// (`MAT 2:18b`). Equality, ordering and hashing include the suffix; within a
/// book the derived ordering is (chapter, verse, suffix). Cross-book ordering
/// requires the versification system's book-order table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct VerseKey {
    pub book: BookCode,
    pub chapter: u16,
    pub verse: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<char>,
}

impl Default for BookCode {
    fn default() -> Self {
        BookCode(*b"GEN")
    }
}

static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z0-9]{3})[ .]?(\d{1,3})[:.](\d{1,3})([a-z])?$")
        .expect("reference pattern is valid")
});

impl VerseKey {
    pub fn new(book: BookCode, chapter: u16, verse: u16) -> Self {
        VerseKey {
            book,
            chapter,
            verse,
            suffix: None,
        }
    }

    pub fn with_suffix(mut self, suffix: char) -> Self {
        self.suffix = Some(suffix);
        self
    }

    /// The same position with any subverse suffix removed. Mapping tables and
    /// cross-reference stores are keyed on suffixless positions.
    pub fn base(mut self) -> Self {
        self.suffix = None;
        self
    }

    /// Chapter 0 addresses the book introduction.
    pub fn is_book_intro(&self) -> bool {
        self.chapter == 0
    }

    /// Verse 0 of a real chapter addresses that chapter's introduction.
    pub fn is_chapter_intro(&self) -> bool {
        self.chapter > 0 && self.verse == 0
    }

    /// True when `other` addresses the same chapter and verse numbers,
    /// ignoring any subverse suffix. Used to flag the current row in plans.
    pub fn same_verse(&self, other: &VerseKey) -> bool {
        self.book == other.book && self.chapter == other.chapter && self.verse == other.verse
    }

    pub fn at(&self, chapter: u16, verse: u16) -> VerseKey {
        VerseKey::new(self.book, chapter, verse)
    }
}

impl FromStr for VerseKey {
    type Err = LecternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = REFERENCE_RE.captures(s.trim()).ok_or_else(|| {
            LecternError::Reference(format!("'{s}' is not a BOOK C:V reference"))
        })?;
        let book = BookCode::try_from(&caps[1])?;
        let chapter: u16 = caps[2]
            .parse()
            .map_err(|_| LecternError::Reference(format!("chapter out of range in '{s}'")))?;
        let verse: u16 = caps[3]
            .parse()
            .map_err(|_| LecternError::Reference(format!("verse out of range in '{s}'")))?;
        let suffix = caps.get(4).and_then(|m| m.as_str().chars().next());
        Ok(VerseKey {
            book,
            chapter,
            verse,
            suffix,
        })
    }
}

impl Display for VerseKey {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)?;
        if let Some(suffix) = self.suffix {
            write!(f, "{suffix}")?;
        }
        Ok(())
    }
}
