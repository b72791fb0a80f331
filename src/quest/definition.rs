//! Quest Definition Structures
//!
//! These structures are deserialized from TOML quest files and validated
//! before they can enter the live catalog.

use serde::{Deserialize, Serialize};

use super::catalog::CatalogError;

/// Quest data file: one or more `[[quests]]` tables
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuestFile {
    #[serde(default)]
    pub quests: Vec<RawQuest>,
}

/// Raw quest data as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuest {
    pub id: String,
    #[serde(rename = "type")]
    pub quest_type: String,
    /// Block or item kind the quest counts
    pub target: String,
    pub requirement: i64,
    /// Console commands run on completion, `%player%` is substituted
    #[serde(default)]
    pub rewards: Vec<String>,
}

// ============================================================================
// Resolved Quest Structures (after validation)
// ============================================================================

/// Quest types supported by the progress engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    /// Break X blocks of type Y
    BlockBreak,
    /// Craft X items of type Y
    Crafting,
}

impl QuestType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "block_break" | "break" => Some(QuestType::BlockBreak),
            "crafting" | "craft" => Some(QuestType::Crafting),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestType::BlockBreak => "block_break",
            QuestType::Crafting => "crafting",
        }
    }
}

/// A validated quest definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestDefinition {
    pub id: String,
    pub quest_type: QuestType,
    /// Block/item kind, compared case-insensitively
    pub target: String,
    /// Units needed to complete, always positive
    pub requirement: u32,
    /// Reward command templates in the order they are dispatched
    pub rewards: Vec<String>,
}

impl QuestDefinition {
    pub fn new(
        id: &str,
        quest_type: QuestType,
        target: &str,
        requirement: u32,
        rewards: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CatalogError::EmptyId);
        }
        let target = target.trim();
        if target.is_empty() {
            return Err(CatalogError::EmptyTarget { id: id.to_string() });
        }
        if requirement == 0 {
            return Err(CatalogError::InvalidRequirement {
                id: id.to_string(),
                value: 0,
            });
        }

        Ok(Self {
            id: id.to_string(),
            quest_type,
            target: target.to_string(),
            requirement,
            rewards,
        })
    }

    /// Create a QuestDefinition from raw TOML data
    pub fn from_raw(raw: &RawQuest) -> Result<Self, CatalogError> {
        let quest_type =
            QuestType::from_str(&raw.quest_type).ok_or_else(|| CatalogError::UnknownQuestType {
                id: raw.id.clone(),
                value: raw.quest_type.clone(),
            })?;

        let requirement = u32::try_from(raw.requirement)
            .ok()
            .filter(|r| *r > 0)
            .ok_or_else(|| CatalogError::InvalidRequirement {
                id: raw.id.clone(),
                value: raw.requirement,
            })?;

        Self::new(&raw.id, quest_type, &raw.target, requirement, raw.rewards.clone())
    }

    /// Whether an interaction of `quest_type` on `key` counts for this quest
    pub fn matches(&self, quest_type: QuestType, key: &str) -> bool {
        self.quest_type == quest_type && self.target.eq_ignore_ascii_case(key.trim())
    }

    /// Reward commands with the player placeholder filled in, in order
    pub fn reward_commands(&self, placeholder: &str, player_name: &str) -> Vec<String> {
        substitute_all(&self.rewards, placeholder, player_name)
    }
}

/// Fill `placeholder` with the player name in every template.
pub fn substitute_all(templates: &[String], placeholder: &str, player_name: &str) -> Vec<String> {
    templates
        .iter()
        .map(|template| {
            if placeholder.is_empty() {
                template.clone()
            } else {
                template.replace(placeholder, player_name)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(quest_type: &str, target: &str, requirement: i64) -> RawQuest {
        RawQuest {
            id: "mine_stone".to_string(),
            quest_type: quest_type.to_string(),
            target: target.to_string(),
            requirement,
            rewards: vec!["eco give %player% 100".to_string()],
        }
    }

    #[test]
    fn test_quest_type_parsing() {
        assert_eq!(QuestType::from_str("BLOCK_BREAK"), Some(QuestType::BlockBreak));
        assert_eq!(QuestType::from_str("break"), Some(QuestType::BlockBreak));
        assert_eq!(QuestType::from_str("Crafting"), Some(QuestType::Crafting));
        assert_eq!(QuestType::from_str("fishing"), None);
    }

    #[test]
    fn test_from_raw_validates() {
        let quest = QuestDefinition::from_raw(&raw("block_break", "STONE", 32)).unwrap();
        assert_eq!(quest.quest_type, QuestType::BlockBreak);
        assert_eq!(quest.requirement, 32);

        assert!(matches!(
            QuestDefinition::from_raw(&raw("block_break", "STONE", 0)),
            Err(CatalogError::InvalidRequirement { value: 0, .. })
        ));
        assert!(matches!(
            QuestDefinition::from_raw(&raw("block_break", "STONE", -4)),
            Err(CatalogError::InvalidRequirement { value: -4, .. })
        ));
        assert!(matches!(
            QuestDefinition::from_raw(&raw("block_break", "   ", 4)),
            Err(CatalogError::EmptyTarget { .. })
        ));
        assert!(matches!(
            QuestDefinition::from_raw(&raw("smelting", "iron_ingot", 4)),
            Err(CatalogError::UnknownQuestType { .. })
        ));
    }

    #[test]
    fn test_matches_ignores_case() {
        let quest = QuestDefinition::from_raw(&raw("block_break", "STONE", 32)).unwrap();
        assert!(quest.matches(QuestType::BlockBreak, "stone"));
        assert!(quest.matches(QuestType::BlockBreak, "Stone"));
        assert!(!quest.matches(QuestType::Crafting, "stone"));
        assert!(!quest.matches(QuestType::BlockBreak, "cobblestone"));
    }

    #[test]
    fn test_reward_commands_substitute_every_placeholder() {
        let mut quest = QuestDefinition::from_raw(&raw("crafting", "torch", 16)).unwrap();
        quest.rewards = vec![
            "eco give %player% 100".to_string(),
            "msg %player% well done %player%".to_string(),
        ];

        assert_eq!(
            quest.reward_commands("%player%", "Steve"),
            vec!["eco give Steve 100", "msg Steve well done Steve"]
        );
    }
}
