//! Filesystem data lake operations.
//!
//! Handles reading and writing to the local data directory:
//! - The match log (JSONL, one match document per line)
//! - The cached player list used by sync
//! - Static translation files

mod jsonl;
mod translations;

pub use jsonl::*;
pub use translations::*;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed line {line} in {path:?}: {source}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Append-only log of fetched matches.
    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join("matches.jsonl")
    }

    /// Player name -> puuid cache written by sync.
    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join("players.json")
    }

    pub fn translations_dir(&self) -> PathBuf {
        self.data_dir.join("translations")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Read the cached player list. Missing file means no players yet.
pub fn read_players(config: &StorageConfig) -> Result<BTreeMap<String, String>, StorageError> {
    let path = config.players_path();
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let contents = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Replace the cached player list.
pub fn write_players(
    config: &StorageConfig,
    players: &BTreeMap<String, String>,
) -> Result<(), StorageError> {
    fs::create_dir_all(&config.data_dir)?;
    let json = serde_json::to_string_pretty(players)?;
    fs::write(config.players_path(), json)?;
    info!("Wrote {} players to {:?}", players.len(), config.players_path());
    Ok(())
}
