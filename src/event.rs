use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{broadcast::WindowGroup, versekey::VerseKey};

/// Navigation events emitted by the
/// [GroupBroadcaster](crate::broadcast::GroupBroadcaster) for host
/// observability (status bars, debug panes). Purely informational — windows
/// are updated directly, not through this stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavEvent {
    /// A navigation fan-out began for a group.
    BroadcastStarted { group: WindowGroup, key: VerseKey },
    /// A window was updated to a new key.
    WindowUpdated { window: String, key: VerseKey },
    /// A References window received a (possibly empty) passage list.
    PassagesShown { window: String, count: usize },
    /// A window's mapping had no entry for the key; it keeps its display.
    WindowSkipped { window: String },
    /// A window's update failed; the fan-out continued without it.
    WindowFailed { window: String, error: String },
}

impl Display for NavEvent {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            NavEvent::BroadcastStarted { group, key } => {
                write!(f, "BroadcastStarted({group}, {key})")
            }
            NavEvent::WindowUpdated { window, key } => write!(f, "WindowUpdated({window}, {key})"),
            NavEvent::PassagesShown { window, count } => {
                write!(f, "PassagesShown({window}, {count})")
            }
            NavEvent::WindowSkipped { window } => write!(f, "WindowSkipped({window})"),
            NavEvent::WindowFailed { window, error } => {
                write!(f, "WindowFailed({window}: {error})")
            }
        }
    }
}
