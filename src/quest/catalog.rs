//! Quest Catalog
//!
//! Loads, validates and caches the current cycle's quest pool. A reload builds
//! a complete new snapshot and swaps it in, so readers holding the previous
//! snapshot keep a consistent view until they drop it.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::definition::{QuestDefinition, RawQuestFile};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read quest data from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse quest file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("quest definition has an empty id")]
    EmptyId,
    #[error("duplicate quest id {id}")]
    Duplicate { id: String },
    #[error("quest {id} has an empty target")]
    EmptyTarget { id: String },
    #[error("quest {id} has invalid requirement {value}, expected a positive count")]
    InvalidRequirement { id: String, value: i64 },
    #[error("quest {id} has unknown type '{value}'")]
    UnknownQuestType { id: String, value: String },
}

/// An immutable view of one cycle's quest pool
#[derive(Debug)]
pub struct CatalogSnapshot {
    quests: HashMap<String, Arc<QuestDefinition>>,
    loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn empty() -> Self {
        Self {
            quests: HashMap::new(),
            loaded_at: Utc::now(),
        }
    }

    /// Build a snapshot, rejecting duplicate ids
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = QuestDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut quests = HashMap::new();
        for quest in definitions {
            if quests.contains_key(&quest.id) {
                return Err(CatalogError::Duplicate { id: quest.id });
            }
            quests.insert(quest.id.clone(), Arc::new(quest));
        }

        Ok(Self {
            quests,
            loaded_at: Utc::now(),
        })
    }

    pub fn lookup(&self, quest_id: &str) -> Option<Arc<QuestDefinition>> {
        self.quests.get(quest_id).cloned()
    }

    pub fn requirement(&self, quest_id: &str) -> Option<u32> {
        self.quests.get(quest_id).map(|q| q.requirement)
    }

    /// Size of the quest pool; completing this many earns the cycle bonus
    pub fn active_quest_count(&self) -> usize {
        self.quests.len()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Shared handle to the live quest pool
pub struct QuestCatalog {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl QuestCatalog {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::empty())),
        }
    }

    pub fn with_definitions(
        definitions: impl IntoIterator<Item = QuestDefinition>,
    ) -> Result<Self, CatalogError> {
        let snapshot = CatalogSnapshot::from_definitions(definitions)?;
        Ok(Self {
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// The current snapshot. Stays valid across later reloads.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().await.clone()
    }

    pub async fn lookup(&self, quest_id: &str) -> Option<Arc<QuestDefinition>> {
        self.current.read().await.lookup(quest_id)
    }

    pub async fn active_quest_count(&self) -> usize {
        self.current.read().await.active_quest_count()
    }

    /// Replace the whole pool. On error the live catalog is left untouched.
    pub async fn reload(
        &self,
        definitions: impl IntoIterator<Item = QuestDefinition>,
    ) -> Result<usize, CatalogError> {
        let snapshot = Arc::new(CatalogSnapshot::from_definitions(definitions)?);
        let count = snapshot.active_quest_count();

        *self.current.write().await = snapshot;
        info!("Quest catalog reloaded with {} quests", count);
        Ok(count)
    }

    pub async fn reload_from_directory(&self, dir: &Path) -> Result<usize, CatalogError> {
        let definitions = load_definitions(dir)?;
        self.reload(definitions).await
    }
}

impl Default for QuestCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Read and validate every quest file under `dir`.
///
/// Any invalid file fails the whole load so a broken edit never half-applies.
pub fn load_definitions(dir: &Path) -> Result<Vec<QuestDefinition>, CatalogError> {
    info!("Loading quests from {:?}", dir);

    let mut paths = Vec::new();
    collect_quest_files(dir, &mut paths)?;
    paths.sort();

    let mut definitions = Vec::new();
    for path in paths {
        let content = std::fs::read_to_string(&path).map_err(|source| CatalogError::Read {
            path: path.clone(),
            source,
        })?;
        let raw: RawQuestFile = toml::from_str(&content).map_err(|source| CatalogError::Parse {
            path: path.clone(),
            source,
        })?;

        for raw_quest in &raw.quests {
            let quest = QuestDefinition::from_raw(raw_quest)?;
            debug!(
                "Loaded quest: {} ({} {} x{})",
                quest.id,
                quest.quest_type.as_str(),
                quest.target,
                quest.requirement
            );
            definitions.push(quest);
        }
    }

    info!("Loaded {} quest definitions", definitions.len());
    Ok(definitions)
}

fn collect_quest_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), CatalogError> {
    let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_quest_files(&path, paths)?;
        } else if path.extension().map_or(false, |ext| ext == "toml") {
            paths.push(path);
        }
    }

    Ok(())
}
