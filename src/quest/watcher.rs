//! Quest Hot-Reload
//!
//! Watches the quest directory and swaps the catalog when a quest file
//! changes. A reload that fails validation leaves the live catalog alone.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{error, info};

use super::catalog::QuestCatalog;

/// Events from the hot-reload watcher
#[derive(Debug, Clone)]
pub enum HotReloadEvent {
    /// Catalog reloaded after a change to this file
    Reloaded { path: String, quests: usize },
    /// Reload failed; the previous catalog is still live
    Error(String),
}

/// Only quest data files trigger a reload
fn is_quest_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("toml")
}

/// Start watching `dir` and reload `catalog` on change.
///
/// Must be called from within a tokio runtime. The watcher thread exits once
/// the returned receiver is dropped and another change arrives.
pub fn spawn_catalog_watcher(
    catalog: Arc<QuestCatalog>,
    dir: PathBuf,
) -> Result<mpsc::Receiver<HotReloadEvent>, String> {
    let rt = tokio::runtime::Handle::try_current()
        .map_err(|e| format!("Quest watcher needs a tokio runtime: {}", e))?;
    let (tx, rx) = mpsc::channel(32);
    let (notify_tx, notify_rx) = std::sync::mpsc::channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = notify_tx.send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| format!("Failed to create file watcher: {}", e))?;

    watcher
        .watch(&dir, RecursiveMode::Recursive)
        .map_err(|e| format!("Failed to watch quest directory {:?}: {}", dir, e))?;

    info!("Quest hot-reload watcher started for {:?}", dir);

    std::thread::spawn(move || {
        // Keep the watcher alive for as long as this thread runs
        let _watcher = watcher;

        while let Ok(event) = notify_rx.recv() {
            if tx.is_closed() {
                break;
            }
            if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                continue;
            }
            let Some(path) = event.paths.iter().find(|p| is_quest_file(p)).cloned() else {
                continue;
            };

            info!("Detected change in {:?}, triggering reload", path);
            let catalog = Arc::clone(&catalog);
            let dir = dir.clone();
            let tx = tx.clone();

            rt.spawn(async move {
                let report = match catalog.reload_from_directory(&dir).await {
                    Ok(quests) => HotReloadEvent::Reloaded {
                        path: path.to_string_lossy().to_string(),
                        quests,
                    },
                    Err(e) => {
                        error!("Hot-reload failed: {}", e);
                        HotReloadEvent::Error(e.to_string())
                    }
                };
                let _ = tx.send(report).await;
            });
        }
    });

    Ok(rx)
}
