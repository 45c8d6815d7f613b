//! Group membership and the navigation fan-out.
//!
//! Every Bible-displaying window belongs to one of four navigation groups
//! (A–D) and carries an update policy saying which broadcasts it reacts to
//! and how. A single user navigation produces one reference-versification
//! key for one group; the [GroupBroadcaster] fans that event out to every
//! registered window in registration order. Window updates are independent:
//! a window that fails to update is logged and skipped, never blocking the
//! rest of the fan-out, and re-broadcasting the same key is idempotent.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    str::FromStr,
    sync::mpsc::Sender,
};

use crate::{
    crossref::CrossReferenceContext,
    event::NavEvent,
    versekey::VerseKey,
    window::BibleWindow,
    LecternError,
};

/// One of the four independent navigation tracks windows can subscribe to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum WindowGroup {
    #[default]
    A,
    B,
    C,
    D,
}

impl WindowGroup {
    /// Position of a non-A group in parallel-table rows (B, C, D in order).
    fn parallel_index(&self) -> Option<usize> {
        match self {
            WindowGroup::A => None,
            WindowGroup::B => Some(0),
            WindowGroup::C => Some(1),
            WindowGroup::D => Some(2),
        }
    }
}

impl Display for WindowGroup {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            WindowGroup::A => write!(f, "A"),
            WindowGroup::B => write!(f, "B"),
            WindowGroup::C => write!(f, "C"),
            WindowGroup::D => write!(f, "D"),
        }
    }
}

impl FromStr for WindowGroup {
    type Err = LecternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" => Ok(WindowGroup::A),
            "B" => Ok(WindowGroup::B),
            "C" => Ok(WindowGroup::C),
            "D" => Ok(WindowGroup::D),
            other => Err(LecternError::Config(format!(
                "'{other}' is not a window group (A-D)"
            ))),
        }
    }
}

/// How a window reacts to group broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UpdatePolicy {
    /// Follow broadcasts for the window's own group directly.
    #[default]
    Normal,
    /// In group B, follow group A through the fixed NT→OT quotation table.
    Reference,
    /// In groups B–D, follow group A through the synoptic-parallel table.
    Parallel,
    /// Follow group A by showing every related passage of the current verse.
    References,
}

impl Display for UpdatePolicy {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            UpdatePolicy::Normal => write!(f, "Normal"),
            UpdatePolicy::Reference => write!(f, "Reference"),
            UpdatePolicy::Parallel => write!(f, "Parallel"),
            UpdatePolicy::References => write!(f, "References"),
        }
    }
}

fn key(s: &str) -> VerseKey {
    s.parse().expect("mapping table references parse")
}

/// NT→OT quotation pairs driving [UpdatePolicy::Reference] windows.
///
/// TODO: replace with the full quotation dataset once the data package
/// carrying it is wired up; these rows cover the common demonstration
/// passages.
static REFERENCE_MAP: Lazy<BTreeMap<VerseKey, VerseKey>> = Lazy::new(|| {
    BTreeMap::from([
        (key("MAT 1:23"), key("ISA 7:14")),
        (key("MAT 2:6"), key("MIC 5:2")),
        (key("MAT 2:15"), key("HOS 11:1")),
        (key("MAT 2:18"), key("JER 31:15")),
        (key("MAT 3:3"), key("ISA 40:3")),
        (key("MAT 4:4"), key("DEU 8:3")),
        (key("MAT 21:42"), key("PSA 118:22")),
        (key("ROM 1:17"), key("HAB 2:4")),
    ])
});

/// Synoptic parallels driving [UpdatePolicy::Parallel] windows: each row maps
/// a group-A passage to its counterparts for groups B, C and D.
static PARALLEL_MAP: Lazy<BTreeMap<VerseKey, [Option<VerseKey>; 3]>> = Lazy::new(|| {
    BTreeMap::from([
        (
            key("MAT 3:13"),
            [Some(key("MRK 1:9")), Some(key("LUK 3:21")), Some(key("JHN 1:32"))],
        ),
        (
            key("MAT 4:1"),
            [Some(key("MRK 1:12")), Some(key("LUK 4:1")), None],
        ),
        (
            key("MAT 14:13"),
            [Some(key("MRK 6:32")), Some(key("LUK 9:10")), Some(key("JHN 6:1"))],
        ),
        (
            key("MAT 17:1"),
            [Some(key("MRK 9:2")), Some(key("LUK 9:28")), None],
        ),
        (
            key("MAT 21:1"),
            [Some(key("MRK 11:1")), Some(key("LUK 19:28")), Some(key("JHN 12:12"))],
        ),
    ])
});

/// The quotation-table counterpart of a reference key, if any.
pub fn reference_mapping(reference_key: &VerseKey) -> Option<VerseKey> {
    REFERENCE_MAP.get(&reference_key.base()).copied()
}

/// The synoptic parallel of a reference key for one group, if any.
pub fn parallel_mapping(reference_key: &VerseKey, group: WindowGroup) -> Option<VerseKey> {
    let row = PARALLEL_MAP.get(&reference_key.base())?;
    row[group.parallel_index()?]
}

/// Fans a single navigation event out to every interested window.
pub struct GroupBroadcaster {
    windows: Vec<Box<dyn BibleWindow>>,
    crossref: CrossReferenceContext,
    events: Option<Sender<NavEvent>>,
}

impl GroupBroadcaster {
    pub fn new(crossref: CrossReferenceContext) -> Self {
        GroupBroadcaster {
            windows: Vec::new(),
            crossref,
            events: None,
        }
    }

    /// Stream [NavEvent]s to `sink`. A dropped receiver is ignored.
    pub fn with_event_sink(mut self, sink: Sender<NavEvent>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Register a window for fan-out. Windows are updated in registration
    /// order; the returned index addresses the window in [Self::window] and
    /// [Self::window_mut].
    pub fn register(&mut self, window: Box<dyn BibleWindow>) -> usize {
        tracing::info!(
            "Registering window '{}' (group {}, {} policy)",
            window.name(),
            window.group(),
            window.policy()
        );
        self.windows.push(window);
        self.windows.len() - 1
    }

    pub fn window(&self, index: usize) -> Option<&dyn BibleWindow> {
        self.windows.get(index).map(Box::as_ref)
    }

    pub fn window_mut(&mut self, index: usize) -> Option<&mut Box<dyn BibleWindow>> {
        self.windows.get_mut(index)
    }

    pub fn windows(&self) -> impl Iterator<Item = &dyn BibleWindow> {
        self.windows.iter().map(Box::as_ref)
    }

    pub fn crossref(&self) -> &CrossReferenceContext {
        &self.crossref
    }

    /// Fan `reference_key` (a reference-versification key navigated on
    /// `group`) out to every registered window.
    ///
    /// `originator` names the window that triggered the event, for logging
    /// only — the originator is not excluded from the fan-out, since
    /// re-applying its own current key is idempotent.
    pub fn broadcast(
        &mut self,
        group: WindowGroup,
        reference_key: VerseKey,
        originator: Option<&str>,
    ) {
        tracing::info!(
            "Broadcasting {reference_key} on group {group}{}",
            originator
                .map(|o| format!(" (from '{o}')"))
                .unwrap_or_default()
        );
        self.emit(NavEvent::BroadcastStarted {
            group,
            key: reference_key,
        });
        for index in 0..self.windows.len() {
            self.update_window(index, group, reference_key);
        }
    }

    /// Decide and apply one window's reaction to a broadcast. Failures are
    /// contained here so one window can never block the rest.
    fn update_window(&mut self, index: usize, group: WindowGroup, reference_key: VerseKey) {
        let window = &self.windows[index];
        let name = window.name().to_string();
        let policy = window.policy();
        let window_group = window.group();

        enum Reaction {
            Goto(VerseKey),
            Passages,
            Skip,
            NotInterested,
        }

        let reaction = match policy {
            UpdatePolicy::Normal if window_group == group => Reaction::Goto(reference_key),
            UpdatePolicy::Reference
                if group == WindowGroup::A && window_group == WindowGroup::B =>
            {
                match reference_mapping(&reference_key) {
                    Some(mapped) => Reaction::Goto(mapped),
                    None => Reaction::Skip,
                }
            }
            UpdatePolicy::Parallel
                if group == WindowGroup::A && window_group != WindowGroup::A =>
            {
                match parallel_mapping(&reference_key, window_group) {
                    Some(mapped) => Reaction::Goto(mapped),
                    None => Reaction::Skip,
                }
            }
            UpdatePolicy::References if group == WindowGroup::A => Reaction::Passages,
            _ => Reaction::NotInterested,
        };

        match reaction {
            Reaction::Goto(target) => {
                match self.windows[index].go_to(target) {
                    Ok(()) => {
                        tracing::debug!("Window '{name}' moved to {target}");
                        self.emit(NavEvent::WindowUpdated {
                            window: name,
                            key: target,
                        });
                    }
                    Err(e) => {
                        tracing::error!("Window '{name}' failed to show {target}: {e}");
                        self.emit(NavEvent::WindowFailed {
                            window: name,
                            error: e.to_string(),
                        });
                    }
                }
            }
            Reaction::Passages => {
                let passages = self.crossref.related_passages(&reference_key);
                let count = passages.len();
                match self.windows[index].show_passages(&passages) {
                    Ok(()) => {
                        tracing::debug!("Window '{name}' showing {count} related passages");
                        self.emit(NavEvent::PassagesShown {
                            window: name,
                            count,
                        });
                    }
                    Err(e) => {
                        tracing::error!("Window '{name}' failed to show passages: {e}");
                        self.emit(NavEvent::WindowFailed {
                            window: name,
                            error: e.to_string(),
                        });
                    }
                }
            }
            Reaction::Skip => {
                tracing::debug!("No mapping of {reference_key} for window '{name}', keeping display");
                self.emit(NavEvent::WindowSkipped { window: name });
            }
            Reaction::NotInterested => {}
        }
    }

    fn emit(&self, event: NavEvent) {
        if let Some(sink) = &self.events {
            sink.send(event).ok();
        }
    }
}

impl std::fmt::Debug for GroupBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("GroupBroadcaster")
            .field("windows", &self.windows.len())
            .field("crossref", &self.crossref)
            .finish_non_exhaustive()
    }
}
