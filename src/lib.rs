//! # TFT Meta
//!
//! A local Teamfight Tactics meta tracker: collects ranked matches,
//! aggregates them into placement tables and suggests team builds.
//!
//! ## Architecture
//!
//! - **models**: Match records and aggregated table types
//! - **lookup**: Raw identifier to display name resolution
//! - **calculate**: Classification, aggregation, ranked queries, suggestions
//! - **snapshot**: Immutable aggregated view of the match log
//! - **storage**: Filesystem data operations (JSONL match log, translations)
//! - **fetch**: Riot API client
//! - **sync**: Match collection pipeline
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod lookup;
pub mod models;
pub mod snapshot;
pub mod storage;
pub mod sync;

#[cfg(test)]
pub(crate) mod fixtures;

pub use models::*;
