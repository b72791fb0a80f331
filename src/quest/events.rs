//! Quest Event Types
//!
//! Interactions that can advance a quest, and the notifications the engine
//! emits in response.

use serde::{Deserialize, Serialize};

use super::definition::QuestType;
use super::store::PlayerId;
use crate::crafting::CraftInteraction;

/// The player behind an interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    /// Substituted into reward commands
    pub name: String,
}

impl PlayerRef {
    pub fn new(id: PlayerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

fn default_count() -> u32 {
    1
}

/// Events that can trigger quest progress
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    /// Player broke a block
    BlockBreak {
        player: PlayerRef,
        /// Block kind (e.g., "STONE", "oak_log")
        block: String,
        #[serde(default = "default_count")]
        count: u32,
    },

    /// Player took items out of a crafting result slot
    Crafting {
        player: PlayerRef,
        craft: CraftInteraction,
    },
}

impl InteractionEvent {
    pub fn player(&self) -> &PlayerRef {
        match self {
            InteractionEvent::BlockBreak { player, .. } => player,
            InteractionEvent::Crafting { player, .. } => player,
        }
    }

    pub fn quest_type(&self) -> QuestType {
        match self {
            InteractionEvent::BlockBreak { .. } => QuestType::BlockBreak,
            InteractionEvent::Crafting { .. } => QuestType::Crafting,
        }
    }

    /// Key compared against a quest's target
    pub fn associated_key(&self) -> &str {
        match self {
            InteractionEvent::BlockBreak { block, .. } => block,
            InteractionEvent::Crafting { craft, .. } => &craft.result.item_id,
        }
    }

    /// Get event type as string (for logging/debugging)
    pub fn event_type(&self) -> &'static str {
        self.quest_type().as_str()
    }
}

/// Outbound notification for UI layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestNotification {
    Progress {
        player_id: PlayerId,
        quest_id: String,
        /// Never exceeds `requirement`
        progress: u32,
        requirement: u32,
    },
    Completed {
        player_id: PlayerId,
        quest_id: String,
    },
    AllQuestsCompleted {
        player_id: PlayerId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_parse_block_break_event() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{ "type": "block_break", "player": {{ "id": "{}", "name": "Alex" }}, "block": "STONE" }}"#,
            id
        );

        let event: InteractionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event.quest_type(), QuestType::BlockBreak);
        assert_eq!(event.associated_key(), "STONE");
        assert_eq!(event.player().id, id);
        assert!(matches!(event, InteractionEvent::BlockBreak { count: 1, .. }));
    }

    #[test]
    fn test_crafting_key_is_result_item() {
        let json = format!(
            r#"{{
                "type": "crafting",
                "player": {{ "id": "{}", "name": "Alex" }},
                "craft": {{ "click": "left", "result": {{ "item_id": "torch", "quantity": 4 }} }}
            }}"#,
            Uuid::new_v4()
        );

        let event: InteractionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event.event_type(), "crafting");
        assert_eq!(event.associated_key(), "torch");
    }
}
