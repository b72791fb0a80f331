//! Quest System Module
//!
//! Daily quest pool, per-player progress tracking and the engine that turns
//! block breaks and crafts into quest progress, completions and rewards.

pub mod catalog;
pub mod definition;
pub mod engine;
pub mod events;
pub mod notifier;
pub mod sinks;
pub mod state;
pub mod store;
pub mod watcher;

pub use catalog::{CatalogError, CatalogSnapshot, QuestCatalog, load_definitions};
pub use definition::{QuestDefinition, QuestType};
pub use engine::{AssignError, ProgressEngine, ProgressOutcome, RewardSettings, apply_progress};
pub use events::{InteractionEvent, PlayerRef, QuestNotification};
pub use notifier::{IndicatorSurface, ProgressIndicator, ProgressNotifier, TracingSurface};
pub use sinks::{ChannelNotifications, CommandQueue, NotificationSink, RewardSink};
pub use state::{PlayerProgressState, QuestStatus};
pub use store::{PlayerId, PlayerProgressStore};
pub use watcher::{HotReloadEvent, spawn_catalog_watcher};
