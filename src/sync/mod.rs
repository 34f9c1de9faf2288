//! Sync orchestrator.
//!
//! Collects ranked matches into the local match log:
//! 1. Resolve the challenger ladder to player uuids (cached in `players.json`)
//! 2. List each player's recent match ids
//! 3. Fetch every match not already in the log
//! 4. Append the raw match document to `matches.jsonl`

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::fetch::{FetchError, LadderEntry, RiotClient};
use crate::models::MatchMetadata;
use crate::storage::{read_players, write_players, JsonlReader, JsonlWriter, StorageConfig};

/// Errors that can occur during sync.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    #[error("No players to sync")]
    NoPlayers,
}

/// Where matches come from.
#[async_trait]
pub trait MatchSource: Send + Sync {
    async fn challenger_ladder(&self) -> Result<Vec<LadderEntry>, FetchError>;

    async fn puuid_for_summoner(&self, summoner_id: &str) -> Result<Option<String>, FetchError>;

    async fn match_ids(&self, puuid: &str, count: u32) -> Result<Vec<String>, FetchError>;

    async fn match_document(&self, match_id: &str) -> Result<serde_json::Value, FetchError>;
}

#[async_trait]
impl MatchSource for RiotClient {
    async fn challenger_ladder(&self) -> Result<Vec<LadderEntry>, FetchError> {
        RiotClient::challenger_ladder(self).await
    }

    async fn puuid_for_summoner(&self, summoner_id: &str) -> Result<Option<String>, FetchError> {
        RiotClient::puuid_for_summoner(self, summoner_id).await
    }

    async fn match_ids(&self, puuid: &str, count: u32) -> Result<Vec<String>, FetchError> {
        RiotClient::match_ids(self, puuid, count).await
    }

    async fn match_document(&self, match_id: &str) -> Result<serde_json::Value, FetchError> {
        RiotClient::match_document(self, match_id).await
    }
}

/// Configuration for sync operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Match ids requested per player
    pub matches_per_player: u32,

    /// Only walk the first N players
    pub max_players: Option<usize>,

    /// Ignore the player cache and rebuild it from the ladder
    pub refresh_players: bool,

    /// Dry run mode (fetch but don't store)
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            matches_per_player: 20,
            max_players: None,
            refresh_players: false,
            dry_run: false,
        }
    }
}

/// Result of a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    pub players: usize,
    pub matches_written: u32,
    pub matches_skipped: u32,
    pub errors: Vec<String>,
    pub duration: Duration,
}

/// Just enough of a logged match to know its id.
#[derive(Debug, Deserialize)]
struct LoggedMatch {
    metadata: MatchMetadata,
}

/// Sync orchestrator.
pub struct SyncOrchestrator {
    config: SyncConfig,
    source: Arc<dyn MatchSource>,
}

impl SyncOrchestrator {
    /// Create a new sync orchestrator.
    pub fn new(config: SyncConfig, source: Arc<dyn MatchSource>) -> Self {
        Self { config, source }
    }

    /// Run a single sync operation.
    ///
    /// Failures for one player or one match are recorded and skipped;
    /// failures reading or writing local files abort the run.
    pub async fn sync_once(&self) -> Result<SyncResult, SyncError> {
        let start = std::time::Instant::now();
        info!("Starting sync operation");

        let mut players = self.players().await?;
        if let Some(max) = self.config.max_players {
            players.truncate(max);
        }
        if players.is_empty() {
            return Err(SyncError::NoPlayers);
        }

        let mut seen = self.logged_match_ids()?;
        let writer: JsonlWriter<serde_json::Value> =
            JsonlWriter::new(self.config.storage.matches_path());

        let mut result = SyncResult {
            players: players.len(),
            ..SyncResult::default()
        };

        for (name, puuid) in &players {
            let ids = match self
                .source
                .match_ids(puuid, self.config.matches_per_player)
                .await
            {
                Ok(ids) => ids,
                Err(e) => {
                    error!("Error listing matches for {}: {}", name, e);
                    result.errors.push(format!("{}: {}", name, e));
                    continue;
                }
            };

            for match_id in ids {
                if seen.contains(&match_id) {
                    result.matches_skipped += 1;
                    continue;
                }

                match self.source.match_document(&match_id).await {
                    Ok(document) => {
                        if !self.config.dry_run {
                            writer.append(&document)?;
                        }
                        seen.insert(match_id);
                        result.matches_written += 1;
                    }
                    Err(e) => {
                        warn!("Error fetching match {}: {}", match_id, e);
                        result.errors.push(format!("{}: {}", match_id, e));
                    }
                }
            }
        }

        result.duration = start.elapsed();
        info!(
            "Sync completed: {} players, {} new matches, {} already logged in {:?}",
            result.players, result.matches_written, result.matches_skipped, result.duration
        );

        Ok(result)
    }

    /// Players to walk, in name order. Uses the cache unless asked to refresh.
    async fn players(&self) -> Result<Vec<(String, String)>, SyncError> {
        if !self.config.refresh_players {
            let cached = read_players(&self.config.storage)?;
            if !cached.is_empty() {
                info!("Using {} cached players", cached.len());
                return Ok(cached.into_iter().collect());
            }
        }

        let ladder = self.source.challenger_ladder().await?;
        let mut players = BTreeMap::new();

        for entry in ladder {
            let Some(name) = entry.display_name().map(str::to_string) else {
                continue;
            };

            let puuid = match (&entry.puuid, &entry.summoner_id) {
                (Some(puuid), _) => Some(puuid.clone()),
                (None, Some(summoner_id)) => {
                    match self.source.puuid_for_summoner(summoner_id).await {
                        Ok(puuid) => puuid,
                        Err(e) => {
                            warn!("Could not resolve {}: {}", name, e);
                            None
                        }
                    }
                }
                (None, None) => None,
            };

            if let Some(puuid) = puuid {
                players.insert(name, puuid);
            }
        }

        if !self.config.dry_run {
            write_players(&self.config.storage, &players)?;
        }

        Ok(players.into_iter().collect())
    }

    fn logged_match_ids(&self) -> Result<HashSet<String>, SyncError> {
        let reader: JsonlReader<LoggedMatch> = JsonlReader::new(self.config.storage.matches_path());
        Ok(reader
            .read_all()?
            .into_iter()
            .map(|m| m.metadata.match_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    use crate::storage::read_matches;

    #[derive(Default)]
    struct MockSource {
        ladder: Vec<LadderEntry>,
        summoners: HashMap<String, String>,
        histories: HashMap<String, Vec<String>>,
        failing_matches: HashSet<String>,
        fetched: Mutex<Vec<String>>,
    }

    impl MockSource {
        fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MatchSource for MockSource {
        async fn challenger_ladder(&self) -> Result<Vec<LadderEntry>, FetchError> {
            Ok(self.ladder.clone())
        }

        async fn puuid_for_summoner(&self, summoner_id: &str) -> Result<Option<String>, FetchError> {
            Ok(self.summoners.get(summoner_id).cloned())
        }

        async fn match_ids(&self, puuid: &str, count: u32) -> Result<Vec<String>, FetchError> {
            Ok(self
                .histories
                .get(puuid)
                .map(|ids| ids.iter().take(count as usize).cloned().collect())
                .unwrap_or_default())
        }

        async fn match_document(&self, match_id: &str) -> Result<serde_json::Value, FetchError> {
            if self.failing_matches.contains(match_id) {
                return Err(FetchError::HttpStatus {
                    status: 404,
                    message: "Not Found".to_string(),
                });
            }
            self.fetched.lock().unwrap().push(match_id.to_string());
            Ok(serde_json::json!({
                "metadata": {"match_id": match_id},
                "info": {"participants": []}
            }))
        }
    }

    fn entry(name: &str, summoner_id: &str, puuid: Option<&str>) -> LadderEntry {
        LadderEntry {
            summoner_id: Some(summoner_id.to_string()),
            summoner_name: Some(name.to_string()),
            puuid: puuid.map(str::to_string),
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn source() -> MockSource {
        let mut source = MockSource {
            ladder: vec![entry("Alice", "s-alice", Some("p-alice")), entry("Bob", "s-bob", None)],
            ..MockSource::default()
        };
        source.summoners.insert("s-bob".to_string(), "p-bob".to_string());
        source
            .histories
            .insert("p-alice".to_string(), ids(&["NA1_1", "NA1_2"]));
        source
            .histories
            .insert("p-bob".to_string(), ids(&["NA1_2", "NA1_3"]));
        source
    }

    fn test_config(temp_dir: &TempDir) -> SyncConfig {
        SyncConfig {
            storage: StorageConfig::new(temp_dir.path().to_path_buf()),
            ..SyncConfig::default()
        }
    }

    #[tokio::test]
    async fn test_sync_writes_each_match_once() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let source = Arc::new(source());

        let orchestrator = SyncOrchestrator::new(config.clone(), source.clone());
        let result = orchestrator.sync_once().await.unwrap();

        assert_eq!(result.players, 2);
        assert_eq!(result.matches_written, 3);
        assert_eq!(result.matches_skipped, 1);
        assert!(result.errors.is_empty());
        assert_eq!(source.fetched(), ids(&["NA1_1", "NA1_2", "NA1_3"]));

        let logged: Vec<_> = read_matches(&config.storage)
            .unwrap()
            .iter()
            .map(|m| m.match_id().to_string())
            .collect();
        assert_eq!(logged, ids(&["NA1_1", "NA1_2", "NA1_3"]));
    }

    #[tokio::test]
    async fn test_sync_caches_players() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        SyncOrchestrator::new(config.clone(), Arc::new(source()))
            .sync_once()
            .await
            .unwrap();

        let players = read_players(&config.storage).unwrap();
        assert_eq!(players.get("Alice").map(String::as_str), Some("p-alice"));
        assert_eq!(players.get("Bob").map(String::as_str), Some("p-bob"));
    }

    #[tokio::test]
    async fn test_second_sync_skips_logged_matches() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        SyncOrchestrator::new(config.clone(), Arc::new(source()))
            .sync_once()
            .await
            .unwrap();

        // The cached players are used, so an empty ladder is never consulted.
        let mut second = source();
        second.ladder.clear();
        let second = Arc::new(second);
        let result = SyncOrchestrator::new(config, second.clone())
            .sync_once()
            .await
            .unwrap();

        assert_eq!(result.matches_written, 0);
        assert_eq!(result.matches_skipped, 4);
        assert!(second.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.dry_run = true;

        let result = SyncOrchestrator::new(config.clone(), Arc::new(source()))
            .sync_once()
            .await
            .unwrap();

        assert_eq!(result.matches_written, 3);
        assert!(!config.storage.matches_path().exists());
        assert!(!config.storage.players_path().exists());
    }

    #[tokio::test]
    async fn test_max_players_limits_walk() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.max_players = Some(1);

        let source = Arc::new(source());
        let result = SyncOrchestrator::new(config, source.clone())
            .sync_once()
            .await
            .unwrap();

        assert_eq!(result.players, 1);
        assert_eq!(source.fetched(), ids(&["NA1_1", "NA1_2"]));
    }

    #[tokio::test]
    async fn test_failed_match_is_recorded_and_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let mut source = source();
        source.failing_matches.insert("NA1_2".to_string());

        let result = SyncOrchestrator::new(config, Arc::new(source))
            .sync_once()
            .await
            .unwrap();

        assert_eq!(result.matches_written, 2);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].starts_with("NA1_2"));
    }

    #[tokio::test]
    async fn test_empty_ladder_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let result = SyncOrchestrator::new(config, Arc::new(MockSource::default()))
            .sync_once()
            .await;

        assert!(matches!(result, Err(SyncError::NoPlayers)));
    }
}
