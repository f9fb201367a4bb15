//! Per-path change debouncing.
//!
//! Editors typically emit several events per save (truncate, write, chmod,
//! or write-temp-then-rename). The debouncer folds them into one change per
//! path that is released once the path has been quiet for the debounce
//! duration.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Kind of filesystem change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

/// A settled change ready to broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Change {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

struct Pending {
    kind: ChangeKind,
    deadline: Instant,
}

/// Thread-safe change debouncer.
pub(crate) struct EventDebouncer {
    pending: Mutex<HashMap<PathBuf, Pending>>,
    quiet_period: Duration,
}

impl EventDebouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            quiet_period,
        }
    }

    /// Record a raw change, restarting the path's quiet period.
    pub fn record(&self, path: PathBuf, kind: ChangeKind) {
        let deadline = Instant::now() + self.quiet_period;
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        match pending.entry(path) {
            Entry::Vacant(slot) => {
                slot.insert(Pending { kind, deadline });
            }
            Entry::Occupied(mut slot) => match Self::coalesce(slot.get().kind, kind) {
                Some(merged) => {
                    let entry = slot.get_mut();
                    entry.kind = merged;
                    entry.deadline = deadline;
                }
                // Created then removed within the window: nothing happened
                None => {
                    slot.remove();
                }
            },
        }
    }

    /// Fold a new change into a pending one. `None` drops both.
    fn coalesce(existing: ChangeKind, new: ChangeKind) -> Option<ChangeKind> {
        use ChangeKind::{Created, Modified, Removed};

        match (existing, new) {
            (Created, Removed) => None,
            (Created, _) => Some(Created),
            (Modified, kind) => Some(kind),
            (Removed, Created) => Some(Modified),
            (Removed, _) => Some(Removed),
        }
    }

    /// Take every change whose quiet period has elapsed.
    pub fn drain_ready(&self) -> Vec<Change> {
        let now = Instant::now();
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        pending
            .extract_if(|_, p| p.deadline <= now)
            .map(|(path, p)| Change { path, kind: p.kind })
            .collect()
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.values().map(|p| p.deadline).min()
    }
}
