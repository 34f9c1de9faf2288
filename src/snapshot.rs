//! Loading the match log into an immutable, queryable snapshot.
//!
//! A snapshot is always built in full. Callers that serve queries keep it
//! behind an `Arc` and replace the whole pointer on rebuild.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::calculate::{aggregate, AggregateError};
use crate::lookup::Translations;
use crate::models::{MatchDocument, SummaryTables};
use crate::storage::{load_translations, read_matches, StorageConfig, StorageError};

/// Errors that can occur while building a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),
}

/// Summary of what a snapshot was built from.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotStats {
    pub matches: usize,
    pub records: usize,
    pub compositions: usize,
    pub units: usize,
    pub built_at: DateTime<Utc>,
}

/// Aggregated tables plus the translations they were resolved with.
#[derive(Debug, Clone)]
pub struct MetaSnapshot {
    pub tables: SummaryTables,
    pub translations: Translations,
    pub matches: usize,
    pub records: usize,
    pub built_at: DateTime<Utc>,
}

impl MetaSnapshot {
    /// Aggregate a set of matches. Fails without producing any tables if a
    /// single record is unusable.
    pub fn build(
        matches: &[MatchDocument],
        translations: Translations,
    ) -> Result<Self, SnapshotError> {
        let records = matches.iter().flat_map(|m| m.info.participants.iter());
        let tables = aggregate(records, &translations)?;
        let record_count = tables.record_count() as usize;

        Ok(Self {
            tables,
            translations,
            matches: matches.len(),
            records: record_count,
            built_at: Utc::now(),
        })
    }

    /// Load translations and the match log from disk and aggregate them.
    pub fn load(storage: &StorageConfig) -> Result<Self, SnapshotError> {
        let translations = load_translations(storage)?;
        let matches = read_matches(storage)?;
        let snapshot = Self::build(&matches, translations)?;

        info!(
            "Built snapshot: {} matches, {} records, {} compositions",
            snapshot.matches,
            snapshot.records,
            snapshot.tables.compositions.len()
        );
        Ok(snapshot)
    }

    /// An empty snapshot, used before the first successful load.
    pub fn empty() -> Self {
        Self {
            tables: SummaryTables::default(),
            translations: Translations::new(),
            matches: 0,
            records: 0,
            built_at: Utc::now(),
        }
    }

    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats {
            matches: self.matches,
            records: self.records,
            compositions: self.tables.compositions.len(),
            units: self.tables.unit_compositions.len(),
            built_at: self.built_at,
        }
    }
}
