//! Quest Progress Engine
//!
//! Matches interactions against each player's active quest, advances progress,
//! completes quests and grants the pool bonus. Per-player state is mutated
//! under that player's lock only. Notifications are emitted under the same
//! lock so they arrive in state order; reward commands go out after it is
//! released.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::catalog::{CatalogError, CatalogSnapshot, QuestCatalog};
use super::definition::{QuestDefinition, QuestType, substitute_all};
use super::events::{InteractionEvent, PlayerRef};
use super::notifier::ProgressNotifier;
use super::sinks::{NotificationSink, RewardSink};
use super::state::PlayerProgressState;
use super::store::{PlayerId, PlayerProgressStore};
use crate::config::EngineConfig;
use crate::crafting::resolve_craft_quantity;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignError {
    #[error("quest {0} is not in the current catalog")]
    UnknownQuest(String),
    #[error("quest {0} was already completed this cycle")]
    AlreadyCompleted(String),
}

/// How reward templates are filled and what the pool bonus grants
#[derive(Debug, Clone)]
pub struct RewardSettings {
    pub player_placeholder: String,
    pub bonus_commands: Vec<String>,
}

impl RewardSettings {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            player_placeholder: config.player_placeholder.clone(),
            bonus_commands: config.bonus.commands.clone(),
        }
    }
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Result of an interaction that advanced a quest
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressOutcome {
    pub quest: Arc<QuestDefinition>,
    /// Progress to display, capped at the requirement
    pub progress: u32,
    pub requirement: u32,
    /// The quest was completed by this interaction
    pub completed: bool,
    /// This completion finished the whole pool for the first time this cycle
    pub bonus: bool,
}

/// Advance `state` by `quantity` if the interaction matches its active quest.
///
/// Returns `None` without touching state for every "no match" case: no
/// active quest, quest missing from the catalog, wrong type or target.
pub fn apply_progress(
    state: &mut PlayerProgressState,
    catalog: &CatalogSnapshot,
    quest_type: QuestType,
    key: &str,
    quantity: u32,
) -> Option<ProgressOutcome> {
    if quantity == 0 {
        return None;
    }

    let quest = catalog.lookup(state.current_quest_id()?)?;
    if !quest.matches(quest_type, key) {
        return None;
    }
    let requirement = catalog.requirement(&quest.id)?;

    let progress = state.add_progress(quantity)?;
    let completed = progress >= requirement && state.complete_current().is_some();
    let bonus = completed && state.try_grant_bonus(catalog.active_quest_count());

    Some(ProgressOutcome {
        quest,
        progress: progress.min(requirement),
        requirement,
        completed,
        bonus,
    })
}

pub struct ProgressEngine {
    catalog: Arc<QuestCatalog>,
    store: PlayerProgressStore,
    notifier: Arc<ProgressNotifier>,
    notifications: Arc<dyn NotificationSink>,
    rewards: Arc<dyn RewardSink>,
    settings: RewardSettings,
}

impl ProgressEngine {
    pub fn new(
        catalog: Arc<QuestCatalog>,
        notifier: Arc<ProgressNotifier>,
        notifications: Arc<dyn NotificationSink>,
        rewards: Arc<dyn RewardSink>,
        settings: RewardSettings,
    ) -> Self {
        Self {
            catalog,
            store: PlayerProgressStore::new(),
            notifier,
            notifications,
            rewards,
            settings,
        }
    }

    pub fn catalog(&self) -> &Arc<QuestCatalog> {
        &self.catalog
    }

    pub fn store(&self) -> &PlayerProgressStore {
        &self.store
    }

    pub fn notifier(&self) -> &Arc<ProgressNotifier> {
        &self.notifier
    }

    /// Resolve a raw interaction to a quantity and record it
    pub async fn handle_event(&self, event: &InteractionEvent) -> Option<ProgressOutcome> {
        let quantity = match event {
            InteractionEvent::BlockBreak { count, .. } => *count,
            InteractionEvent::Crafting { craft, .. } => resolve_craft_quantity(craft),
        };

        if quantity == 0 {
            debug!(
                "Ignoring {} interaction from {}: nothing produced",
                event.event_type(),
                event.player().id
            );
            return None;
        }

        self.record_interaction(event.player(), event.quest_type(), event.associated_key(), quantity)
            .await
    }

    /// Handle an interaction on a background task; the caller never waits
    pub fn spawn_event(self: &Arc<Self>, event: InteractionEvent) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            engine.handle_event(&event).await;
        })
    }

    pub async fn record_interaction(
        &self,
        player: &PlayerRef,
        quest_type: QuestType,
        key: &str,
        quantity: u32,
    ) -> Option<ProgressOutcome> {
        let Some(handle) = self.store.get(player.id) else {
            debug!("No quest state for player {}", player.id);
            return None;
        };
        let catalog = self.catalog.snapshot().await;

        let outcome = {
            let mut state = handle.lock().await;
            let outcome = apply_progress(&mut state, &catalog, quest_type, key, quantity)?;
            // Bar and notifications go out under the lock so they follow the
            // order of the state changes and a concurrent leave cannot orphan
            // the bar
            self.notifier
                .show(player.id, &outcome.quest.id, outcome.progress, outcome.requirement);
            self.notify(player, &outcome);
            outcome
        };

        self.grant_rewards(player, &outcome);
        Some(outcome)
    }

    /// Sinks must not block; they run inside the player's critical section
    fn notify(&self, player: &PlayerRef, outcome: &ProgressOutcome) {
        let quest_id = outcome.quest.id.as_str();
        debug!(
            "Player {} progress on quest {}: {}/{}",
            player.id, quest_id, outcome.progress, outcome.requirement
        );
        self.notifications
            .on_progress(player.id, quest_id, outcome.progress, outcome.requirement);

        if outcome.completed {
            info!("Player {} ({}) completed quest {}", player.name, player.id, quest_id);
            self.notifications.on_complete(player.id, quest_id);
        }

        if outcome.bonus {
            info!(
                "Player {} ({}) completed every quest this cycle",
                player.name, player.id
            );
            self.notifications.on_all_quests_complete(player.id);
        }
    }

    fn grant_rewards(&self, player: &PlayerRef, outcome: &ProgressOutcome) {
        let placeholder = &self.settings.player_placeholder;

        if outcome.completed {
            self.dispatch_rewards(player, outcome.quest.reward_commands(placeholder, &player.name));
        }

        if outcome.bonus {
            let bonus = substitute_all(&self.settings.bonus_commands, placeholder, &player.name);
            self.dispatch_rewards(player, bonus);
        }
    }

    /// Failures are logged only; completion stands regardless of delivery
    fn dispatch_rewards(&self, player: &PlayerRef, commands: Vec<String>) {
        for command in commands {
            if let Err(e) = self.rewards.dispatch(&command) {
                warn!("Failed to dispatch reward '{}' for {}: {}", command, player.name, e);
            }
        }
    }

    /// Make `quest_id` the player's active quest (NotStarted -> InProgress)
    pub async fn assign_quest(&self, player_id: PlayerId, quest_id: &str) -> Result<(), AssignError> {
        if self.catalog.lookup(quest_id).await.is_none() {
            return Err(AssignError::UnknownQuest(quest_id.to_string()));
        }

        let handle = self.store.get_or_create(player_id);
        let mut state = handle.lock().await;
        if !state.assign(quest_id) {
            return Err(AssignError::AlreadyCompleted(quest_id.to_string()));
        }

        info!("Player {} started quest {}", player_id, quest_id);
        Ok(())
    }

    /// Copy of a player's current state
    pub async fn progress_of(&self, player_id: PlayerId) -> Option<PlayerProgressState> {
        let handle = self.store.get(player_id)?;
        let state = handle.lock().await;
        Some(state.clone())
    }

    pub fn on_player_join(&self, player_id: PlayerId) {
        self.store.get_or_create(player_id);
        debug!("Tracking quest state for player {}", player_id);
    }

    /// Drop the player's state and release their progress bar
    pub async fn on_player_leave(&self, player_id: PlayerId) {
        match self.store.remove(player_id) {
            Some(handle) => {
                // In-flight interactions holding the handle see an ended session
                let mut state = handle.lock().await;
                state.end_session();
                self.notifier.dismiss(player_id);
            }
            None => {
                self.notifier.dismiss(player_id);
            }
        }
        debug!("Released quest state for player {}", player_id);
    }

    /// Swap in a new quest pool. Player state is kept; stale quest ids stop
    /// matching.
    pub async fn reload_catalog(
        &self,
        definitions: impl IntoIterator<Item = QuestDefinition>,
    ) -> Result<usize, CatalogError> {
        self.catalog.reload(definitions).await
    }

    /// Swap in a new pool and clear every player's cycle progress
    pub async fn begin_cycle(
        &self,
        definitions: impl IntoIterator<Item = QuestDefinition>,
    ) -> Result<usize, CatalogError> {
        let count = self.catalog.reload(definitions).await?;

        let handles = self.store.handles();
        for (_, handle) in &handles {
            handle.lock().await.reset_cycle();
        }

        info!("Started new quest cycle: {} quests, {} players reset", count, handles.len());
        Ok(count)
    }
}
