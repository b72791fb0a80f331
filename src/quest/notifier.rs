//! Progress Notifier
//!
//! Shows a short-lived progress bar per player. A new update replaces the bar
//! and restarts its expiry; a stale expiry never removes a newer bar.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::store::PlayerId;

/// How long a progress bar stays up without further updates
pub const DEFAULT_INDICATOR_TTL: Duration = Duration::from_secs(3);

/// Fraction of `requirement` reached, clamped to [0, 1]
pub fn completion_fraction(progress: u32, requirement: u32) -> f64 {
    if requirement == 0 {
        return 0.0;
    }
    (progress as f64 / requirement as f64).clamp(0.0, 1.0)
}

/// What a player sees while a quest advances
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressIndicator {
    pub quest_id: String,
    pub progress: u32,
    pub requirement: u32,
    pub fraction: f64,
}

impl ProgressIndicator {
    pub fn new(quest_id: &str, progress: u32, requirement: u32) -> Self {
        Self {
            quest_id: quest_id.to_string(),
            progress,
            requirement,
            fraction: completion_fraction(progress, requirement),
        }
    }
}

/// Display resource that renders indicators (a boss bar, an overlay, ...)
pub trait IndicatorSurface: Send + Sync {
    fn attach(&self, player_id: PlayerId, indicator: &ProgressIndicator);
    /// Release whatever `attach` allocated for the player
    fn detach(&self, player_id: PlayerId);
}

/// Surface that only logs, for headless runs
pub struct TracingSurface;

impl IndicatorSurface for TracingSurface {
    fn attach(&self, player_id: PlayerId, indicator: &ProgressIndicator) {
        info!(
            "[{}] {} {}/{} ({:.0}%)",
            player_id,
            indicator.quest_id,
            indicator.progress,
            indicator.requirement,
            indicator.fraction * 100.0
        );
    }

    fn detach(&self, player_id: PlayerId) {
        debug!("[{}] progress bar hidden", player_id);
    }
}

struct ActiveIndicator {
    generation: u64,
    expiry: JoinHandle<()>,
}

type ActiveMap = Arc<DashMap<PlayerId, ActiveIndicator>>;

pub struct ProgressNotifier {
    surface: Arc<dyn IndicatorSurface>,
    active: ActiveMap,
    ttl: Duration,
    next_generation: AtomicU64,
}

impl ProgressNotifier {
    pub fn new(surface: Arc<dyn IndicatorSurface>, ttl: Duration) -> Self {
        Self {
            surface,
            active: Arc::new(DashMap::new()),
            ttl,
            next_generation: AtomicU64::new(0),
        }
    }

    /// Show progress, replacing any bar the player already has.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&self, player_id: PlayerId, quest_id: &str, progress: u32, requirement: u32) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let indicator = ProgressIndicator::new(quest_id, progress, requirement);

        if let Some((_, previous)) = self.active.remove(&player_id) {
            previous.expiry.abort();
            self.surface.detach(player_id);
        }

        self.surface.attach(player_id, &indicator);
        let expiry = self.schedule_expiry(player_id, generation);
        self.active.insert(player_id, ActiveIndicator { generation, expiry });
    }

    /// Remove the player's bar now. Returns false if none was showing.
    pub fn dismiss(&self, player_id: PlayerId) -> bool {
        match self.active.remove(&player_id) {
            Some((_, active)) => {
                active.expiry.abort();
                self.surface.detach(player_id);
                true
            }
            None => false,
        }
    }

    pub fn is_showing(&self, player_id: PlayerId) -> bool {
        self.active.contains_key(&player_id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    fn schedule_expiry(&self, player_id: PlayerId, generation: u64) -> JoinHandle<()> {
        let active = Arc::clone(&self.active);
        let surface = Arc::clone(&self.surface);
        let ttl = self.ttl;

        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let expired = active
                .remove_if(&player_id, |_, current| current.generation == generation)
                .is_some();
            if expired {
                surface.detach(player_id);
            }
        })
    }
}
