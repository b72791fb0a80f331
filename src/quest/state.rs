//! Quest State Tracking
//!
//! Per-player progress for the current cycle: the active quest, how far along
//! it is, which quests are done and whether the pool bonus was granted.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a quest for a player within the current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestStatus {
    NotStarted,
    InProgress,
    /// Terminal until the next cycle
    Completed,
}

impl QuestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::NotStarted => "not_started",
            QuestStatus::InProgress => "in_progress",
            QuestStatus::Completed => "completed",
        }
    }
}

/// All quest state for a single player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerProgressState {
    current_quest_id: Option<String>,
    progress: u32,
    completed_quests: HashSet<String>,
    /// When the current quest was assigned
    started_at: Option<DateTime<Utc>>,
    /// Set once the whole pool is done; guards the bonus against re-firing
    bonus_granted_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    session_ended: bool,
}

impl PlayerProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_quest_id(&self) -> Option<&str> {
        self.current_quest_id.as_deref()
    }

    /// Raw progress on the current quest; may exceed the requirement
    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn completed_quests(&self) -> &HashSet<String> {
        &self.completed_quests
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn is_quest_completed(&self, quest_id: &str) -> bool {
        self.completed_quests.contains(quest_id)
    }

    pub fn status_of(&self, quest_id: &str) -> QuestStatus {
        if self.is_quest_completed(quest_id) {
            QuestStatus::Completed
        } else if self.current_quest_id.as_deref() == Some(quest_id) {
            QuestStatus::InProgress
        } else {
            QuestStatus::NotStarted
        }
    }

    /// Make `quest_id` the active quest with zero progress.
    ///
    /// Returns false if the quest was already completed this cycle.
    pub fn assign(&mut self, quest_id: &str) -> bool {
        if self.is_quest_completed(quest_id) {
            return false;
        }
        self.current_quest_id = Some(quest_id.to_string());
        self.progress = 0;
        self.started_at = Some(Utc::now());
        true
    }

    /// Add progress to the active quest and return the new total.
    ///
    /// Returns `None` (and changes nothing) when there is no active quest, the
    /// active quest is already completed or the session has ended.
    pub fn add_progress(&mut self, amount: u32) -> Option<u32> {
        if self.session_ended {
            return None;
        }
        let quest_id = self.current_quest_id.as_deref()?;
        if self.completed_quests.contains(quest_id) {
            return None;
        }
        self.progress = self.progress.saturating_add(amount);
        Some(self.progress)
    }

    /// Close out the active quest. Returns its id if it was newly completed.
    pub fn complete_current(&mut self) -> Option<String> {
        let quest_id = self.current_quest_id.take()?;
        self.progress = 0;
        self.started_at = None;
        if self.completed_quests.insert(quest_id.clone()) {
            Some(quest_id)
        } else {
            None
        }
    }

    /// Grant the pool bonus if every quest is done and it was not granted yet.
    ///
    /// Checked and set in one step so later interactions never re-trigger it.
    pub fn try_grant_bonus(&mut self, pool_size: usize) -> bool {
        if self.bonus_granted_at.is_some() || self.completed_quests.len() < pool_size {
            return false;
        }
        self.bonus_granted_at = Some(Utc::now());
        true
    }

    pub fn bonus_granted(&self) -> bool {
        self.bonus_granted_at.is_some()
    }

    /// Start a fresh cycle: nothing active, nothing completed, bonus available
    pub fn reset_cycle(&mut self) {
        self.current_quest_id = None;
        self.progress = 0;
        self.completed_quests.clear();
        self.started_at = None;
        self.bonus_granted_at = None;
    }

    /// Mark the owning session as gone; later interactions become no-ops
    pub fn end_session(&mut self) {
        self.session_ended = true;
    }

    pub fn session_ended(&self) -> bool {
        self.session_ended
    }
}
