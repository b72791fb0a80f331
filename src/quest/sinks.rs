//! Outbound Sinks
//!
//! Boundaries the engine talks to: a privileged command executor for rewards
//! and a notification consumer for UI layers. Both are fire-and-forget.

use tokio::sync::mpsc;

use super::events::QuestNotification;
use super::store::PlayerId;

/// Executes fully substituted reward commands
pub trait RewardSink: Send + Sync {
    fn dispatch(&self, command: &str) -> Result<(), String>;
}

/// Receives progress, completion and pool-bonus notifications.
///
/// Called while the player's progress is locked, so implementations must not
/// block.
pub trait NotificationSink: Send + Sync {
    fn on_progress(&self, player_id: PlayerId, quest_id: &str, progress: u32, requirement: u32);
    fn on_complete(&self, player_id: PlayerId, quest_id: &str);
    fn on_all_quests_complete(&self, player_id: PlayerId);
}

/// Queues reward commands for an executor task
pub struct CommandQueue {
    tx: mpsc::UnboundedSender<String>,
}

impl CommandQueue {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RewardSink for CommandQueue {
    fn dispatch(&self, command: &str) -> Result<(), String> {
        self.tx
            .send(command.to_string())
            .map_err(|e| format!("Command executor is gone, dropped '{}'", e.0))
    }
}

/// Forwards notifications over a channel
pub struct ChannelNotifications {
    tx: mpsc::UnboundedSender<QuestNotification>,
}

impl ChannelNotifications {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<QuestNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, notification: QuestNotification) {
        // Ignore send errors (no receivers)
        let _ = self.tx.send(notification);
    }
}

impl NotificationSink for ChannelNotifications {
    fn on_progress(&self, player_id: PlayerId, quest_id: &str, progress: u32, requirement: u32) {
        self.send(QuestNotification::Progress {
            player_id,
            quest_id: quest_id.to_string(),
            progress,
            requirement,
        });
    }

    fn on_complete(&self, player_id: PlayerId, quest_id: &str) {
        self.send(QuestNotification::Completed {
            player_id,
            quest_id: quest_id.to_string(),
        });
    }

    fn on_all_quests_complete(&self, player_id: PlayerId) {
        self.send(QuestNotification::AllQuestsCompleted { player_id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_command_queue_preserves_order() {
        let (queue, mut rx) = CommandQueue::new();
        queue.dispatch("eco give Alex 100").unwrap();
        queue.dispatch("crate key give Alex daily 1").unwrap();

        assert_eq!(rx.recv().await.as_deref(), Some("eco give Alex 100"));
        assert_eq!(rx.recv().await.as_deref(), Some("crate key give Alex daily 1"));
    }

    #[test]
    fn test_command_queue_reports_closed_executor() {
        let (queue, rx) = CommandQueue::new();
        drop(rx);
        assert!(queue.dispatch("eco give Alex 100").is_err());
    }

    #[tokio::test]
    async fn test_channel_notifications() {
        let (sink, mut rx) = ChannelNotifications::new();
        let player = Uuid::new_v4();

        sink.on_progress(player, "mine_stone", 3, 10);
        sink.on_complete(player, "mine_stone");
        sink.on_all_quests_complete(player);

        assert_eq!(
            rx.recv().await,
            Some(QuestNotification::Progress {
                player_id: player,
                quest_id: "mine_stone".to_string(),
                progress: 3,
                requirement: 10,
            })
        );
        assert!(matches!(rx.recv().await, Some(QuestNotification::Completed { .. })));
        assert_eq!(
            rx.recv().await,
            Some(QuestNotification::AllQuestsCompleted { player_id: player })
        );
    }
}
