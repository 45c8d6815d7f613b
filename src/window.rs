//! The non-GUI state of one Bible resource window.
//!
//! A desktop shell wraps each [ResourceWindow] in whatever widget tree it
//! uses; everything the synchronization core needs — group membership,
//! update policy, view mode, the versification bridge, the verse cache and
//! the last computed plan — lives here, composed from the other modules with
//! no UI types involved.

use std::sync::Arc;

use crate::{
    broadcast::{UpdatePolicy, WindowGroup},
    cache::{VerseCache, RESOURCE_WINDOW_CACHE_SIZE},
    config::WindowSettings,
    crossref::RelatedPassage,
    plan::{ContextViewMode, ContextViewPlanner, PlannedVerse},
    provider::{BackendKind, ContentSource},
    versekey::VerseKey,
    versification::{VersificationBridge, VersificationSystem},
    LecternError,
};

/// What the [GroupBroadcaster](crate::broadcast::GroupBroadcaster) needs
/// from a window: identity, membership, and the two update entry points.
pub trait BibleWindow {
    fn name(&self) -> &str;

    fn group(&self) -> WindowGroup;

    fn policy(&self) -> UpdatePolicy;

    /// Show the passage at `reference_key` (reference versification)
    /// according to this window's view mode.
    fn go_to(&mut self, reference_key: VerseKey) -> Result<(), LecternError>;

    /// Show a list of related passages (References policy). The list may be
    /// empty, in which case the window shows nothing.
    fn show_passages(&mut self, passages: &[RelatedPassage]) -> Result<(), LecternError>;

    /// The key this window currently displays, expressed in the shared
    /// reference versification. `None` before the first navigation and
    /// while showing a passage list.
    fn current_reference(&self) -> Option<VerseKey>;
}

/// A resource window's displayable state: one backend, one versification,
/// one cache, one plan.
pub struct ResourceWindow {
    name: String,
    backend: BackendKind,
    source: Arc<dyn ContentSource>,
    bridge: VersificationBridge,
    cache: VerseCache,
    group: WindowGroup,
    policy: UpdatePolicy,
    view_mode: ContextViewMode,
    verses_before: u16,
    verses_after: u16,
    current: Option<VerseKey>,
    plan: Vec<PlannedVerse>,
    passages: Vec<RelatedPassage>,
}

impl ResourceWindow {
    /// A window with default membership (group A, Normal policy,
    /// BeforeAndAfter view, full-window cache).
    pub fn new(
        name: impl Into<String>,
        backend: BackendKind,
        source: Arc<dyn ContentSource>,
        system: Arc<dyn VersificationSystem>,
    ) -> Self {
        ResourceWindow {
            name: name.into(),
            backend,
            source,
            bridge: VersificationBridge::new(system),
            cache: VerseCache::with_capacity(RESOURCE_WINDOW_CACHE_SIZE),
            group: WindowGroup::default(),
            policy: UpdatePolicy::default(),
            view_mode: ContextViewMode::default(),
            verses_before: crate::plan::DEFAULT_VERSES_BEFORE,
            verses_after: crate::plan::DEFAULT_VERSES_AFTER,
            current: None,
            plan: Vec::new(),
            passages: Vec::new(),
        }
    }

    /// Reconstruct a window from persisted settings.
    pub fn from_settings(
        name: impl Into<String>,
        settings: &WindowSettings,
        source: Arc<dyn ContentSource>,
        system: Arc<dyn VersificationSystem>,
    ) -> Self {
        let mut window = ResourceWindow::new(name, settings.backend, source, system);
        window.cache = VerseCache::with_capacity(settings.cache_capacity);
        window.group = settings.group;
        window.policy = settings.policy;
        window.view_mode = settings.view_mode;
        window.verses_before = settings.verses_before;
        window.verses_after = settings.verses_after;
        window
    }

    pub fn with_group(mut self, group: WindowGroup) -> Self {
        self.group = group;
        self
    }

    pub fn with_policy(mut self, policy: UpdatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_view_mode(mut self, mode: ContextViewMode) -> Self {
        self.view_mode = mode;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = VerseCache::with_capacity(capacity);
        self
    }

    /// Group membership and policy are user-changeable at runtime.
    pub fn set_group(&mut self, group: WindowGroup) {
        self.group = group;
    }

    pub fn set_policy(&mut self, policy: UpdatePolicy) {
        self.policy = policy;
    }

    /// Change the context-view mode. The new mode takes effect on the next
    /// navigation; callers wanting an immediate redraw re-issue `go_to` with
    /// the current reference.
    pub fn set_view_mode(&mut self, mode: ContextViewMode) {
        self.view_mode = mode;
    }

    pub fn set_context(&mut self, verses_before: u16, verses_after: u16) {
        self.verses_before = verses_before;
        self.verses_after = verses_after;
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn view_mode(&self) -> ContextViewMode {
        self.view_mode
    }

    pub fn bridge(&self) -> &VersificationBridge {
        &self.bridge
    }

    pub fn cache(&self) -> &VerseCache {
        &self.cache
    }

    /// The rows last planned for display, in order.
    pub fn plan(&self) -> &[PlannedVerse] {
        &self.plan
    }

    /// The related passages last shown (References policy).
    pub fn passages(&self) -> &[RelatedPassage] {
        &self.passages
    }

    /// The last displayed key, in this window's local versification.
    pub fn current(&self) -> Option<VerseKey> {
        self.current
    }

    /// The settings record describing this window's current configuration.
    pub fn settings(&self) -> WindowSettings {
        WindowSettings {
            group: self.group,
            policy: self.policy,
            view_mode: self.view_mode,
            verses_before: self.verses_before,
            verses_after: self.verses_after,
            backend: self.backend,
            cache_capacity: self.cache.capacity(),
        }
    }
}

impl BibleWindow for ResourceWindow {
    fn name(&self) -> &str {
        &self.name
    }

    fn group(&self) -> WindowGroup {
        self.group
    }

    fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    fn go_to(&mut self, reference_key: VerseKey) -> Result<(), LecternError> {
        let local = self.bridge.to_local(reference_key);
        tracing::debug!(
            "Window '{}' showing {local} ({} view)",
            self.name,
            self.view_mode
        );
        let planner = ContextViewPlanner::new(&self.bridge, self.source.as_ref(), self.backend)
            .with_context(self.verses_before, self.verses_after);
        self.plan = planner.plan(&mut self.cache, self.view_mode, local);
        self.current = Some(local);
        self.passages.clear();
        Ok(())
    }

    fn show_passages(&mut self, passages: &[RelatedPassage]) -> Result<(), LecternError> {
        let planner = ContextViewPlanner::new(&self.bridge, self.source.as_ref(), self.backend);
        let mut rows = Vec::new();
        for passage in passages {
            let local = self.bridge.to_local(passage.key);
            for mut row in planner.plan(&mut self.cache, ContextViewMode::ByVerse, local) {
                row.is_current = false;
                rows.push(row);
            }
        }
        self.plan = rows;
        self.passages = passages.to_vec();
        self.current = None;
        Ok(())
    }

    fn current_reference(&self) -> Option<VerseKey> {
        self.current.map(|key| self.bridge.to_reference(key))
    }
}

impl std::fmt::Debug for ResourceWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ResourceWindow")
            .field("name", &self.name)
            .field("backend", &self.backend)
            .field("group", &self.group)
            .field("policy", &self.policy)
            .field("view_mode", &self.view_mode)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
