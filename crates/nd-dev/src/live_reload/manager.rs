//! Live reload manager.
//!
//! Watches the asset directory and broadcasts a [`ReloadEvent`] for every
//! settled change.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::debouncer::{Change, ChangeKind, EventDebouncer};

/// What the browser should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ReloadKind {
    /// Reload the page.
    Reload,
    /// Re-fetch stylesheets only.
    Css,
}

/// Event sent to connected WebSocket clients when files change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct ReloadEvent {
    #[serde(rename = "type")]
    pub(crate) kind: ReloadKind,
    /// URL path of the changed file, relative to the watched directory.
    pub(crate) path: String,
}

const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Upper bound on how long the drain task sleeps.
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Manages file watching and broadcasting reload events.
pub(crate) struct LiveReloadManager {
    watch_dir: PathBuf,
    watch_patterns: Vec<String>,
    broadcaster: broadcast::Sender<ReloadEvent>,
    watcher: Option<RecommendedWatcher>,
    tasks: Vec<JoinHandle<()>>,
    debounce_ms: u64,
}

impl LiveReloadManager {
    /// Create a manager for `watch_dir`.
    ///
    /// `watch_patterns` are globs relative to `watch_dir`; everything is
    /// watched when `None`.
    #[must_use]
    pub(crate) fn new(
        watch_dir: PathBuf,
        watch_patterns: Option<Vec<String>>,
        broadcaster: broadcast::Sender<ReloadEvent>,
    ) -> Self {
        Self {
            watch_dir,
            watch_patterns: watch_patterns.unwrap_or_else(|| vec!["**/*".to_owned()]),
            broadcaster,
            watcher: None,
            tasks: Vec::new(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }

    #[must_use]
    pub(crate) fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Start watching.
    ///
    /// Spawns a task that records raw events and one that broadcasts settled
    /// changes. Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist or the watcher cannot
    /// be created.
    pub(crate) fn start(&mut self) -> Result<(), notify::Error> {
        // Events carry canonical paths on some platforms
        let watch_dir = std::fs::canonicalize(&self.watch_dir)
            .map_err(|e| notify::Error::io(e).add_path(self.watch_dir.clone()))?;

        let (tx, mut rx) = mpsc::channel::<Event>(100);
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                // Callback runs on notify's thread
                Ok(event) => {
                    let _ = tx.blocking_send(event);
                }
                Err(e) => tracing::warn!(error = %e, "File watcher error"),
            }
        })?;
        watcher.watch(&watch_dir, RecursiveMode::Recursive)?;
        self.watcher = Some(watcher);
        self.watch_dir.clone_from(&watch_dir);

        let debouncer = Arc::new(EventDebouncer::new(Duration::from_millis(self.debounce_ms)));

        let recorder = Arc::clone(&debouncer);
        let patterns = self.compile_patterns();
        let record_dir = watch_dir.clone();
        let record_task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                Self::record_event(&event, &record_dir, &patterns, &recorder);
            }
        });

        let broadcaster = self.broadcaster.clone();
        let drain_task = tokio::spawn(async move {
            loop {
                let wait = debouncer.next_deadline().map_or(MAX_POLL_INTERVAL, |deadline| {
                    deadline
                        .saturating_duration_since(Instant::now())
                        .min(MAX_POLL_INTERVAL)
                });
                tokio::time::sleep(wait).await;

                for change in debouncer.drain_ready() {
                    Self::broadcast_change(&change, &watch_dir, &broadcaster);
                }
            }
        });

        self.tasks = vec![record_task, drain_task];

        tracing::info!(
            dir = %self.watch_dir.display(),
            patterns = ?self.watch_patterns,
            debounce_ms = self.debounce_ms,
            "Watching for changes"
        );
        Ok(())
    }

    fn compile_patterns(&self) -> Vec<glob::Pattern> {
        self.watch_patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(pattern = %p, error = %e, "Ignoring invalid watch pattern");
                    None
                }
            })
            .collect()
    }

    fn record_event(
        event: &Event,
        watch_dir: &Path,
        patterns: &[glob::Pattern],
        debouncer: &EventDebouncer,
    ) {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Modify(_) => ChangeKind::Modified,
            EventKind::Remove(_) => ChangeKind::Removed,
            _ => return,
        };

        for path in &event.paths {
            if Self::matches_patterns(path, watch_dir, patterns) {
                debouncer.record(path.clone(), kind);
                tracing::debug!(path = %path.display(), ?kind, "Recorded filesystem event");
            }
        }
    }

    fn broadcast_change(
        change: &Change,
        watch_dir: &Path,
        broadcaster: &broadcast::Sender<ReloadEvent>,
    ) {
        let Some(path) = Self::url_path(&change.path, watch_dir) else {
            return;
        };

        let kind = if change.kind != ChangeKind::Removed
            && change.path.extension().is_some_and(|ext| ext == "css")
        {
            ReloadKind::Css
        } else {
            ReloadKind::Reload
        };

        // Err only means no client is connected right now
        let clients = broadcaster
            .send(ReloadEvent {
                kind,
                path: path.clone(),
            })
            .unwrap_or(0);

        tracing::info!(path = %path, change = ?change.kind, ?kind, clients, "Live reload");
    }

    /// Map a file under `watch_dir` to the URL path it is served at.
    fn url_path(file: &Path, watch_dir: &Path) -> Option<String> {
        let relative = file.strip_prefix(watch_dir).ok()?;
        let segments: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect();
        Some(format!("/{}", segments.join("/")))
    }

    fn matches_patterns(path: &Path, watch_dir: &Path, patterns: &[glob::Pattern]) -> bool {
        let Ok(relative) = path.strip_prefix(watch_dir) else {
            return false;
        };
        let relative = relative.to_string_lossy();
        patterns.iter().any(|p| p.matches(&relative))
    }

    /// Get a receiver for reload events.
    #[must_use]
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.broadcaster.subscribe()
    }
}

impl Drop for LiveReloadManager {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}
