use serde::Deserialize;

use crate::quest::{InteractionEvent, PlayerId, PlayerRef, QuestNotification};

// ============================================================================
// Console -> Engine Messages
// ============================================================================

/// One line of newline-delimited JSON read by the console driver
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ConsoleCommand {
    /// Player session started
    #[serde(rename = "join")]
    Join { player: PlayerRef },

    /// Give a player their active quest
    #[serde(rename = "assign")]
    Assign { player_id: PlayerId, quest_id: String },

    /// Forward a world interaction to the engine
    #[serde(rename = "interact")]
    Interact { event: InteractionEvent },

    /// Player session ended
    #[serde(rename = "leave")]
    Leave { player_id: PlayerId },

    /// Reload the quest directory
    #[serde(rename = "reload")]
    Reload,

    /// Reload the quest directory and reset every player's cycle
    #[serde(rename = "newCycle")]
    NewCycle,

    /// Print a player's progress
    #[serde(rename = "status")]
    Status { player_id: PlayerId },
}

pub fn decode_console_command(line: &str) -> Result<ConsoleCommand, String> {
    serde_json::from_str(line).map_err(|e| format!("Invalid console command: {}", e))
}

// ============================================================================
// Engine -> Console Messages
// ============================================================================

pub fn encode_notification(notification: &QuestNotification) -> Result<String, String> {
    serde_json::to_string(notification).map_err(|e| format!("Failed to encode notification: {}", e))
}
