//! Tests for context-view plan computation.

use super::helpers::*;
use crate::{
    cache::VerseCache,
    plan::{ContextViewMode, ContextViewPlanner},
    provider::{BackendKind, InMemorySource, VerseData},
    versification::VersificationBridge,
};
use test_log::test;

fn bridge() -> VersificationBridge {
    VersificationBridge::new(test_versification())
}

#[test]
fn test_by_verse_plans_the_queried_verse() {
    let bridge = bridge();
    let source = genesis_source();
    let planner = ContextViewPlanner::new(&bridge, source.as_ref(), BackendKind::Internal);
    let mut cache = VerseCache::with_capacity(300);

    let plan = planner.plan(&mut cache, ContextViewMode::ByVerse, key("GEN 1:3"));
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].key, key("GEN 1:3"));
    assert!(plan[0].is_current);
    assert_eq!(plan[0].content, Some(VerseData::verse("GEN 1:3 text")));
}

#[test]
fn test_by_verse_recovers_bridge_start() {
    let bridge = bridge();
    // Verses 3-5 are bridged: content lives under verse 3 only.
    let source = InMemorySource::new()
        .with_verse(key("GEN 1:3"), VerseData::verse("bridged 3-5 text"));
    let planner = ContextViewPlanner::new(&bridge, &source, BackendKind::Internal);
    let mut cache = VerseCache::with_capacity(300);

    let plan = planner.plan(&mut cache, ContextViewMode::ByVerse, key("GEN 1:5"));
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].key, key("GEN 1:3"));
    assert_eq!(plan[0].content, Some(VerseData::verse("bridged 3-5 text")));
    assert!(plan[0].is_current);
}

#[test]
fn test_by_verse_with_no_content_anywhere() {
    let bridge = bridge();
    let source = InMemorySource::new();
    let planner = ContextViewPlanner::new(&bridge, &source, BackendKind::Internal);
    let mut cache = VerseCache::with_capacity(300);

    // The update must not fail; it plans an empty current row.
    let plan = planner.plan(&mut cache, ContextViewMode::ByVerse, key("GEN 1:5"));
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].key, key("GEN 1:5"));
    assert!(plan[0].content.is_none());
    assert!(plan[0].is_current);
}

#[test]
fn test_before_and_after_window() {
    let bridge = bridge();
    let source = genesis_source();
    let planner = ContextViewPlanner::new(&bridge, source.as_ref(), BackendKind::Internal)
        .with_context(2, 6);
    let mut cache = VerseCache::with_capacity(300);

    let plan = planner.plan(&mut cache, ContextViewMode::BeforeAndAfter, key("GEN 1:3"));
    let keys: Vec<_> = plan.iter().map(|row| row.key).collect();
    let expected: Vec<_> = (1..=9u16).map(|v| key(&format!("GEN 1:{v}"))).collect();
    // Exactly GEN 1:1..1:9 — the before-walk decrements past verse 1 only by
    // chapter rollover, and chapter 1 has no previous book to roll into.
    assert_eq!(keys, expected);
    let current: Vec<_> = plan.iter().filter(|row| row.is_current).collect();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].key, key("GEN 1:3"));
}

#[test]
fn test_before_and_after_truncates_at_book_front() {
    let bridge = bridge();
    let source = genesis_source();
    let planner = ContextViewPlanner::new(&bridge, source.as_ref(), BackendKind::Internal)
        .with_context(3, 1);
    let mut cache = VerseCache::with_capacity(300);

    let plan = planner.plan(&mut cache, ContextViewMode::BeforeAndAfter, key("GEN 1:2"));
    let keys: Vec<_> = plan.iter().map(|row| row.key).collect();
    // Only one verse exists before GEN 1:2; the before-list shrinks.
    assert_eq!(keys, vec![key("GEN 1:1"), key("GEN 1:2"), key("GEN 1:3")]);
}

#[test]
fn test_before_and_after_crosses_chapters() {
    let bridge = bridge();
    let source = genesis_source();
    let planner = ContextViewPlanner::new(&bridge, source.as_ref(), BackendKind::Internal)
        .with_context(2, 2);
    let mut cache = VerseCache::with_capacity(300);

    let plan = planner.plan(&mut cache, ContextViewMode::BeforeAndAfter, key("GEN 2:1"));
    let keys: Vec<_> = plan.iter().map(|row| row.key).collect();
    assert_eq!(
        keys,
        vec![
            key("GEN 1:9"),
            key("GEN 1:10"),
            key("GEN 2:1"),
            key("GEN 2:2"),
            key("GEN 2:3"),
        ]
    );
}

#[test]
fn test_by_chapter_includes_introduction() {
    let bridge = bridge();
    let source = genesis_source();
    let planner = ContextViewPlanner::new(&bridge, source.as_ref(), BackendKind::Internal);
    let mut cache = VerseCache::with_capacity(300);

    let plan = planner.plan(&mut cache, ContextViewMode::ByChapter, key("GEN 1:3"));
    // Verse 0 (introduction) through verse 10.
    assert_eq!(plan.len(), 11);
    assert_eq!(plan[0].key, key("GEN 1:0"));
    assert_eq!(plan.last().unwrap().key, key("GEN 1:10"));
    assert!(plan[3].is_current);
    assert_eq!(plan.iter().filter(|row| row.is_current).count(), 1);
}

#[test]
fn test_by_book_visits_every_chapter_once() {
    let bridge = bridge();
    let source = genesis_source();
    let planner = ContextViewPlanner::new(&bridge, source.as_ref(), BackendKind::Internal);
    let mut cache = VerseCache::with_capacity(300);

    let plan = planner.plan(&mut cache, ContextViewMode::ByBook, key("GEN 2:5"));
    // Book introduction (1 row) + chapter 1 (11 rows) + chapter 2 (9 rows).
    assert_eq!(plan.len(), 21);
    assert_eq!(plan[0].key, key("GEN 0:0"));
    assert_eq!(plan[0].content, Some(VerseData::plain("about this book")));
    assert_eq!(plan.iter().filter(|row| row.is_current).count(), 1);
    assert!(plan.iter().any(|row| row.key == key("GEN 2:5") && row.is_current));
}

#[test]
fn test_rate_limited_backend_downgrades_whole_book_views() {
    let bridge = bridge();
    let source = genesis_source();
    let planner =
        ContextViewPlanner::new(&bridge, source.as_ref(), BackendKind::DigitalBiblePlatform);
    let mut cache = VerseCache::with_capacity(30);

    assert_eq!(
        planner.effective_mode(ContextViewMode::ByBook),
        ContextViewMode::ByVerse
    );
    assert_eq!(
        planner.effective_mode(ContextViewMode::ByChapter),
        ContextViewMode::ByVerse
    );
    assert_eq!(
        planner.effective_mode(ContextViewMode::BySection),
        ContextViewMode::BySection
    );

    let plan = planner.plan(&mut cache, ContextViewMode::ByBook, key("GEN 1:3"));
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].key, key("GEN 1:3"));
}

#[test]
fn test_by_section_plan_covers_the_section() {
    let bridge = bridge();
    let mut source = InMemorySource::new();
    source.insert(key("MAT 3:1"), VerseData::heading_and_verse("John", "In those days"));
    for verse in 2..=12u16 {
        source.insert(key(&format!("MAT 3:{verse}")), VerseData::verse("text"));
    }
    source.insert(key("MAT 3:13"), VerseData::heading_and_verse("Baptism", "Then Jesus came"));
    let planner = ContextViewPlanner::new(&bridge, &source, BackendKind::Internal);
    let mut cache = VerseCache::with_capacity(300);

    let plan = planner.plan(&mut cache, ContextViewMode::BySection, key("MAT 3:5"));
    assert_eq!(plan.first().unwrap().key, key("MAT 3:1"));
    assert_eq!(plan.last().unwrap().key, key("MAT 3:13"));
    assert_eq!(plan.len(), 13);
    assert!(plan.iter().any(|row| row.key == key("MAT 3:5") && row.is_current));
}

#[test]
fn test_plans_share_the_window_cache() {
    let bridge = bridge();
    let source = genesis_source();
    let planner = ContextViewPlanner::new(&bridge, source.as_ref(), BackendKind::Internal);
    let mut cache = VerseCache::with_capacity(300);

    planner.plan(&mut cache, ContextViewMode::ByChapter, key("GEN 1:3"));
    let cached = cache.len();
    // Replanning the same chapter adds nothing new.
    planner.plan(&mut cache, ContextViewMode::ByChapter, key("GEN 1:7"));
    assert_eq!(cache.len(), cached);
}
