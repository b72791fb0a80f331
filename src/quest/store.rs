//! Player Progress Store
//!
//! Session-scoped progress keyed by player. Each player's state sits behind
//! its own async mutex so updates for one player are serialized while other
//! players proceed independently.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::state::PlayerProgressState;

pub type PlayerId = Uuid;

/// Handle to one player's state; lock it to read or mutate
pub type SharedProgress = Arc<Mutex<PlayerProgressState>>;

#[derive(Default)]
pub struct PlayerProgressStore {
    players: DashMap<PlayerId, SharedProgress>,
}

impl PlayerProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player_id: PlayerId) -> Option<SharedProgress> {
        self.players.get(&player_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn get_or_create(&self, player_id: PlayerId) -> SharedProgress {
        let entry = self
            .players
            .entry(player_id)
            .or_insert_with(|| Arc::new(Mutex::new(PlayerProgressState::new())));
        Arc::clone(entry.value())
    }

    pub fn remove(&self, player_id: PlayerId) -> Option<SharedProgress> {
        self.players.remove(&player_id).map(|(_, state)| state)
    }

    /// Copy out every handle so callers can lock them without holding the map
    pub fn handles(&self) -> Vec<(PlayerId, SharedProgress)> {
        self.players
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
