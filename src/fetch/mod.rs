//! Riot API client.
//!
//! Thin wrapper over `reqwest` that builds TFT endpoint URLs, sends the API
//! key header, spaces requests out and retries after rate-limit responses.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::RiotConfig;

const API_KEY_HEADER: &str = "x-riot-token";
const RANKED_QUEUE: &str = "RANKED_TFT";
const DEFAULT_RETRY_AFTER_SECS: u64 = 10;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No API key configured")]
    MissingApiKey,

    #[error("API key is not a valid header value")]
    InvalidApiKey,

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which routing host an endpoint lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Per-shard host such as `na1`, used by league endpoints
    Platform,
    /// Regional host such as `americas`, used by match endpoints
    Regional,
}

/// One entry on the challenger ladder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LadderEntry {
    #[serde(default)]
    pub summoner_id: Option<String>,

    #[serde(default)]
    pub summoner_name: Option<String>,

    #[serde(default)]
    pub puuid: Option<String>,
}

impl LadderEntry {
    /// Name used as the key in the player cache.
    pub fn display_name(&self) -> Option<&str> {
        self.summoner_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.summoner_id.as_deref())
            .or(self.puuid.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct League {
    #[serde(default)]
    entries: Vec<LadderEntry>,
}

/// Settings for the Riot client.
#[derive(Debug, Clone)]
pub struct RiotClientConfig {
    pub api_key: String,
    pub platform: String,
    pub region: String,
    pub request_delay: Duration,
    pub max_retries: u32,
    pub timeout: Duration,
}

impl RiotClientConfig {
    /// Build client settings from the application config. The key is taken
    /// from the environment first.
    pub fn from_config(riot: &RiotConfig) -> Result<Self, FetchError> {
        let api_key = riot.resolved_api_key().ok_or(FetchError::MissingApiKey)?;
        Ok(Self {
            api_key,
            platform: riot.platform.clone(),
            region: riot.region.clone(),
            request_delay: Duration::from_millis(riot.request_delay_ms),
            max_retries: riot.max_retries,
            timeout: Duration::from_secs(riot.timeout_seconds),
        })
    }
}

/// Rate-limited Riot API client.
pub struct RiotClient {
    client: Client,
    config: RiotClientConfig,
}

impl RiotClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RiotClientConfig) -> Result<Self, FetchError> {
        let mut key = HeaderValue::from_str(&config.api_key).map_err(|_| FetchError::InvalidApiKey)?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Absolute URL for `path` on the given routing host.
    pub fn endpoint(&self, routing: Routing, path: &str) -> Result<Url, FetchError> {
        let host = match routing {
            Routing::Platform => &self.config.platform,
            Routing::Regional => &self.config.region,
        };
        let base = format!("https://{}.api.riotgames.com/", host);
        Url::parse(&base)
            .and_then(|u| u.join(path))
            .map_err(|e| FetchError::InvalidUrl(format!("{}{}: {}", base, path, e)))
    }

    pub fn ladder_url(&self) -> Result<Url, FetchError> {
        let mut url = self.endpoint(Routing::Platform, "tft/league/v1/challenger")?;
        url.query_pairs_mut().append_pair("queue", RANKED_QUEUE);
        Ok(url)
    }

    pub fn entries_url(&self, summoner_id: &str) -> Result<Url, FetchError> {
        self.endpoint(
            Routing::Platform,
            &format!("tft/league/v1/entries/by-summoner/{}", summoner_id),
        )
    }

    pub fn match_ids_url(&self, puuid: &str, count: u32) -> Result<Url, FetchError> {
        let mut url = self.endpoint(
            Routing::Regional,
            &format!("tft/match/v1/matches/by-puuid/{}/ids", puuid),
        )?;
        url.query_pairs_mut()
            .append_pair("start", "0")
            .append_pair("count", &count.to_string());
        Ok(url)
    }

    pub fn match_url(&self, match_id: &str) -> Result<Url, FetchError> {
        self.endpoint(Routing::Regional, &format!("tft/match/v1/matches/{}", match_id))
    }

    /// GET a JSON document, retrying after 429 responses.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let mut attempt = 0;
        loop {
            match self.get_once(url).await {
                Err(FetchError::RateLimited {
                    host,
                    retry_after_secs,
                }) => {
                    if attempt >= self.config.max_retries {
                        return Err(FetchError::RateLimited {
                            host,
                            retry_after_secs,
                        });
                    }
                    attempt += 1;
                    warn!(
                        "Rate limited by {}, retrying in {}s (attempt {}/{})",
                        host, retry_after_secs, attempt, self.config.max_retries
                    );
                    sleep(Duration::from_secs(retry_after_secs)).await;
                }
                other => {
                    sleep(self.config.request_delay).await;
                    return other;
                }
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        debug!("GET {}", url.path());

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after_secs(response.headers()),
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Current challenger ladder.
    pub async fn challenger_ladder(&self) -> Result<Vec<LadderEntry>, FetchError> {
        let league: League = self.get_json(&self.ladder_url()?).await?;
        info!("Fetched {} challenger entries", league.entries.len());
        Ok(league.entries)
    }

    /// Player uuid for a summoner id, from their ranked entries.
    pub async fn puuid_for_summoner(&self, summoner_id: &str) -> Result<Option<String>, FetchError> {
        let entries: Vec<LadderEntry> = self.get_json(&self.entries_url(summoner_id)?).await?;
        Ok(entries.into_iter().find_map(|e| e.puuid))
    }

    pub async fn match_ids(&self, puuid: &str, count: u32) -> Result<Vec<String>, FetchError> {
        self.get_json(&self.match_ids_url(puuid, count)?).await
    }

    /// Full match document, kept as raw JSON so the log stores it verbatim.
    pub async fn match_document(&self, match_id: &str) -> Result<serde_json::Value, FetchError> {
        self.get_json(&self.match_url(match_id)?).await
    }
}

/// Seconds to wait from a `Retry-After` header.
fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}
