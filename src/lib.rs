//! # lectern-core
//!
//! A Rust library implementing the verse-reference synchronization and
//! caching core of a multi-window Bible study application.
//!
//! ## Overview
//!
//! A Bible study desktop shows many resource windows at once — translations,
//! original-language texts, commentaries, cross-reference panes. One user
//! navigation (a click, a keypress, a reference typed into an entry box)
//! produces a single book/chapter/verse key that every interested window must
//! follow, even though each window has its own versification system, its own
//! context-view mode and its own content backend. lectern-core is that
//! coordination layer, with no GUI types anywhere in it.
//!
//! ### Key Features
//!
//! - **Group navigation**: four independent navigation tracks (A–D) that
//!   windows subscribe to, fanned out by [`broadcast::GroupBroadcaster`]
//! - **Update policies**: direct tracking, NT→OT quotation following,
//!   synoptic parallels, and full related-passage lookups
//! - **Versification bridging**: [`versification::VersificationBridge`]
//!   converts between the shared reference versification and each window's
//!   local scheme
//! - **Context views**: [`plan::ContextViewPlanner`] turns a mode (single
//!   verse, before/after, section, chapter, book) into an ordered display
//!   plan
//! - **Bounded caching**: a per-window LRU [`cache::VerseCache`] so
//!   revisited verses and section scans never re-fetch from the backend
//! - **Section discovery**: [`section::SectionFinder`] locates editorial
//!   section boundaries from heading markers in cached content
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use lectern_core::{
//!     broadcast::{GroupBroadcaster, WindowGroup},
//!     crossref::{CrossReferenceContext, InMemoryCrossReferences},
//!     provider::{BackendKind, InMemorySource, VerseData},
//!     versification::TableVersification,
//!     window::{BibleWindow, ResourceWindow},
//! };
//!
//! fn main() -> Result<(), lectern_core::LecternError> {
//!     // One tiny in-process edition.
//!     let system = Arc::new(TableVersification::new().with_book("MAT".parse()?, &[25, 23]));
//!     let bible = Arc::new(InMemorySource::new().with_verse(
//!         "MAT 2:18".parse()?,
//!         VerseData::verse("A voice was heard in Ramah..."),
//!     ));
//!
//!     // A window tracking navigation group A.
//!     let mut window = ResourceWindow::new("matthew", BackendKind::Internal, bible, system);
//!     window.go_to("MAT 2:18".parse()?)?;
//!     assert!(window.plan().iter().any(|row| row.is_current));
//!
//!     // Further navigation fans out through a broadcaster.
//!     let crossref = CrossReferenceContext::new(Arc::new(InMemoryCrossReferences::new()));
//!     let mut broadcaster = GroupBroadcaster::new(crossref);
//!     broadcaster.register(Box::new(window));
//!     broadcaster.broadcast(WindowGroup::A, "MAT 2:17".parse()?, None);
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Reference versification
//!
//! Windows coordinate in one shared *reference* versification. A window's
//! [`versification::VersificationBridge`] converts incoming reference keys
//! to the local scheme of its text and converts outgoing keys back when the
//! window itself initiates navigation. Chapter 0 addresses a book's
//! introduction and verse 0 a chapter's introduction.
//!
//! ### Caching model
//!
//! Each window owns one bounded [`cache::VerseCache`]; "no content for this
//! key" is itself a cached fact. There is no invalidation — a window whose
//! underlying text is edited must be rebuilt with a fresh cache.
//!
//! ### Concurrency
//!
//! The core is synchronous and single-threaded by design: navigation,
//! cache access and fan-out all run on the host's event thread. The one
//! process-wide structure, the cross-reference store, is loaded at most once
//! behind a write-once cell and read-only afterward.
//!
//! ## Module Guide
//!
//! Start with [`window::ResourceWindow`] for a single window's behavior,
//! then [`broadcast::GroupBroadcaster`] for multi-window coordination. See
//! [`config`] for persisting window setups.

pub mod broadcast;
pub mod cache;
pub mod config;
pub mod crossref;
pub mod error;
pub mod event;
pub mod plan;
pub mod provider;
pub mod section;
#[cfg(test)]
mod tests;
pub mod versekey;
pub mod versification;
pub mod window;

pub use error::*;
