use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use daily_quests::config::EngineConfig;
use daily_quests::protocol::{ConsoleCommand, decode_console_command, encode_notification};
use daily_quests::quest::{
    self, ChannelNotifications, CommandQueue, HotReloadEvent, ProgressEngine, ProgressNotifier,
    QuestCatalog, QuestNotification, RewardSettings, TracingSurface,
};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("daily_quests=info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("quests.toml"));
    let config = match EngineConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            EngineConfig::default()
        }
    };

    // Load quest catalog from TOML files
    let catalog = Arc::new(QuestCatalog::new());
    if let Err(e) = catalog.reload_from_directory(&config.quest_dir).await {
        error!("Failed to load quest catalog: {}", e);
    }

    // Reward commands are executed by a single consumer in dispatch order
    let (rewards, mut reward_rx) = CommandQueue::new();
    tokio::spawn(async move {
        while let Some(command) = reward_rx.recv().await {
            info!("Executing reward command: {}", command);
        }
    });

    let (notifications, mut notification_rx) = ChannelNotifications::new();
    let bonus_message = config.bonus.message.clone();
    tokio::spawn(async move {
        while let Some(notification) = notification_rx.recv().await {
            if let QuestNotification::AllQuestsCompleted { player_id } = &notification {
                info!("[{}] {}", player_id, bonus_message);
            }
            match encode_notification(&notification) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("{}", e),
            }
        }
    });

    let notifier = Arc::new(ProgressNotifier::new(Arc::new(TracingSurface), config.indicator_ttl()));
    let engine = Arc::new(ProgressEngine::new(
        catalog.clone(),
        notifier,
        Arc::new(notifications),
        Arc::new(rewards),
        RewardSettings::from_config(&config),
    ));

    if config.hot_reload {
        match quest::spawn_catalog_watcher(catalog.clone(), config.quest_dir.clone()) {
            Ok(mut rx) => {
                // Spawn task to log reload events
                tokio::spawn(async move {
                    while let Some(event) = rx.recv().await {
                        match event {
                            HotReloadEvent::Reloaded { path, quests } => {
                                info!("Quest hot-reload: {} ({} quests)", path, quests);
                            }
                            HotReloadEvent::Error(e) => {
                                error!("Quest hot-reload error: {}", e);
                            }
                        }
                    }
                });
                info!("Quest hot-reload enabled");
            }
            Err(e) => {
                warn!("Failed to start quest hot-reload: {}", e);
            }
        }
    }

    let snapshot = catalog.snapshot().await;
    info!(
        "Quest engine ready with {} quests (loaded {}), reading commands from stdin",
        snapshot.active_quest_count(),
        snapshot.loaded_at().format("%Y-%m-%d %H:%M:%S")
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match decode_console_command(&line) {
            Ok(command) => handle_command(&engine, &config, command).await,
            Err(e) => warn!("{}", e),
        }
    }

    info!("Input closed, shutting down");
}

async fn handle_command(engine: &Arc<ProgressEngine>, config: &EngineConfig, command: ConsoleCommand) {
    match command {
        ConsoleCommand::Join { player } => {
            engine.on_player_join(player.id);
            info!("{} ({}) joined", player.name, player.id);
        }
        ConsoleCommand::Assign { player_id, quest_id } => {
            if let Err(e) = engine.assign_quest(player_id, &quest_id).await {
                warn!("Cannot assign quest to {}: {}", player_id, e);
            }
        }
        ConsoleCommand::Interact { event } => {
            engine.spawn_event(event);
        }
        ConsoleCommand::Leave { player_id } => {
            engine.on_player_leave(player_id).await;
        }
        ConsoleCommand::Reload => match quest::load_definitions(&config.quest_dir) {
            Ok(definitions) => {
                if let Err(e) = engine.reload_catalog(definitions).await {
                    error!("Quest reload rejected: {}", e);
                }
            }
            Err(e) => error!("Quest reload rejected: {}", e),
        },
        ConsoleCommand::NewCycle => match quest::load_definitions(&config.quest_dir) {
            Ok(definitions) => {
                if let Err(e) = engine.begin_cycle(definitions).await {
                    error!("New cycle rejected: {}", e);
                }
            }
            Err(e) => error!("New cycle rejected: {}", e),
        },
        ConsoleCommand::Status { player_id } => match engine.progress_of(player_id).await {
            Some(state) => {
                let current = state.current_quest_id().unwrap_or("none");
                let status = state
                    .current_quest_id()
                    .map(|id| state.status_of(id).as_str())
                    .unwrap_or("idle");
                info!(
                    "[{}] quest={} status={} progress={} completed={} bonus={}",
                    player_id,
                    current,
                    status,
                    state.progress(),
                    state.completed_quests().len(),
                    state.bonus_granted()
                );
            }
            None => info!("[{}] no quest state", player_id),
        },
    }
}
