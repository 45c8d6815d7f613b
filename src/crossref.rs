//! Process-wide cross-reference data.
//!
//! Windows in "References" mode show every passage related to the current
//! verse. The backing dataset is large and shared by all windows, so it is
//! loaded at most once per process into a [CrossReferenceContext] that the
//! [GroupBroadcaster](crate::broadcast::GroupBroadcaster) holds explicitly.
//! The store is write-once: after `ensure_loaded` succeeds it is read-only
//! for the life of the process, which keeps it safe to share if a host
//! introduces worker threads.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};

use crate::{versekey::VerseKey, LecternError};

/// One related passage: a typed link to a verse or verse range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedPassage {
    /// Link kind as recorded in the dataset (`QuotedBy`, `SeeAlso`, ...).
    /// Opaque to the core.
    pub link_type: String,
    pub key: VerseKey,
    /// Set when the link addresses a range rather than a single verse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<VerseKey>,
}

impl RelatedPassage {
    pub fn to_verse(link_type: impl Into<String>, key: VerseKey) -> Self {
        RelatedPassage {
            link_type: link_type.into(),
            key,
            end: None,
        }
    }
}

pub type CrossRefTable = BTreeMap<VerseKey, Vec<RelatedPassage>>;

/// Loads the cross-reference dataset. Implemented by the host over whatever
/// storage it has; called at most once per process.
pub trait CrossReferenceSource: Send + Sync {
    fn load(&self) -> Result<CrossRefTable, LecternError>;
}

/// Map-backed [CrossReferenceSource] for hosts with in-process data and for
/// tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCrossReferences {
    table: CrossRefTable,
}

impl InMemoryCrossReferences {
    pub fn new() -> Self {
        InMemoryCrossReferences::default()
    }

    pub fn with_passages(mut self, key: VerseKey, passages: Vec<RelatedPassage>) -> Self {
        self.table.insert(key.base(), passages);
        self
    }
}

impl CrossReferenceSource for InMemoryCrossReferences {
    fn load(&self) -> Result<CrossRefTable, LecternError> {
        Ok(self.table.clone())
    }
}

/// The shared, load-once cross-reference store.
pub struct CrossReferenceContext {
    loader: Arc<dyn CrossReferenceSource>,
    store: OnceCell<CrossRefTable>,
}

impl CrossReferenceContext {
    pub fn new(loader: Arc<dyn CrossReferenceSource>) -> Self {
        CrossReferenceContext {
            loader,
            store: OnceCell::new(),
        }
    }

    /// Load the dataset if it has not been loaded yet. Hosts may call this
    /// eagerly at startup; lookups call it on first use.
    pub fn ensure_loaded(&self) -> Result<(), LecternError> {
        self.store
            .get_or_try_init(|| {
                tracing::info!("Loading cross-reference dataset");
                self.loader.load()
            })
            .map(|table| {
                tracing::debug!("Cross-reference dataset holds {} keys", table.len());
            })
    }

    pub fn is_loaded(&self) -> bool {
        self.store.get().is_some()
    }

    /// All passages related to `key` (suffix ignored). An unloaded dataset
    /// that fails to load, or a key with no entry, both answer an empty
    /// list — References windows then simply show nothing.
    pub fn related_passages(&self, key: &VerseKey) -> Vec<RelatedPassage> {
        if let Err(e) = self.ensure_loaded() {
            tracing::error!("Cross-reference dataset unavailable: {e}");
            return Vec::new();
        }
        self.store
            .get()
            .and_then(|table| table.get(&key.base()).cloned())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for CrossReferenceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("CrossReferenceContext")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use test_log::test;

    fn key(s: &str) -> VerseKey {
        s.parse().unwrap()
    }

    struct CountingSource {
        loads: AtomicU32,
        inner: InMemoryCrossReferences,
    }

    impl CrossReferenceSource for CountingSource {
        fn load(&self) -> Result<CrossRefTable, LecternError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.load()
        }
    }

    #[test]
    fn test_loads_at_most_once() {
        let source = Arc::new(CountingSource {
            loads: AtomicU32::new(0),
            inner: InMemoryCrossReferences::new().with_passages(
                key("MAT 2:18"),
                vec![RelatedPassage::to_verse("QuotedFrom", key("JER 31:15"))],
            ),
        });
        let context = CrossReferenceContext::new(source.clone());
        assert!(!context.is_loaded());

        let first = context.related_passages(&key("MAT 2:18"));
        let again = context.related_passages(&key("MAT 2:18"));
        let missing = context.related_passages(&key("GEN 1:1"));

        assert_eq!(first.len(), 1);
        assert_eq!(first, again);
        assert!(missing.is_empty());
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
        assert!(context.is_loaded());
    }

    #[test]
    fn test_suffix_is_ignored_in_lookups() {
        let context = CrossReferenceContext::new(Arc::new(
            InMemoryCrossReferences::new().with_passages(
                key("MAT 2:18"),
                vec![RelatedPassage::to_verse("QuotedFrom", key("JER 31:15"))],
            ),
        ));
        let passages = context.related_passages(&key("MAT 2:18").with_suffix('b'));
        assert_eq!(passages.len(), 1);
    }
}
