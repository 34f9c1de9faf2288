use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::api::state::{AppState, SharedSnapshot};
use crate::api::ApiError;
use crate::snapshot::{MetaSnapshot, SnapshotStats};
use crate::storage::StorageConfig;

// ── Types ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RefreshState {
    pub status: RefreshStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Stats of the snapshot built by the last successful refresh
    #[serde(skip_deserializing)]
    pub snapshot: Option<SnapshotStats>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RefreshStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

// ── Start ────────────────────────────────────────────────────────

/// Rebuild the snapshot from disk in the background.
pub async fn start_refresh(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let accepted = {
        let mut refresh = state.refresh_state.write().await;
        if refresh.status == RefreshStatus::Running {
            return Err(ApiError::Conflict("Refresh already running".to_string()));
        }
        *refresh = RefreshState {
            status: RefreshStatus::Running,
            started_at: Some(Utc::now()),
            ..RefreshState::default()
        };
        refresh.clone()
    };

    let refresh_state = state.refresh_state.clone();
    let storage = state.storage.clone();
    let snapshot = state.snapshot.clone();

    tokio::spawn(async move {
        run_refresh(refresh_state, storage, snapshot).await;
    });

    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

// ── Status ───────────────────────────────────────────────────────

pub async fn status(State(state): State<AppState>) -> Json<RefreshState> {
    let current = state.refresh_state.read().await;
    Json(current.clone())
}

// ── Background Rebuild ───────────────────────────────────────────

async fn run_refresh(
    refresh_state: Arc<RwLock<RefreshState>>,
    storage: Arc<StorageConfig>,
    snapshot: SharedSnapshot,
) {
    let built = tokio::task::spawn_blocking(move || MetaSnapshot::load(&storage)).await;

    let outcome = match built {
        Ok(Ok(fresh)) => {
            let stats = fresh.stats();
            *snapshot.write().await = Arc::new(fresh);
            info!(
                "Refresh complete: {} matches, {} compositions",
                stats.matches, stats.compositions
            );
            Ok(stats)
        }
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("Refresh task failed: {}", e)),
    };

    let mut state = refresh_state.write().await;
    state.completed_at = Some(Utc::now());
    match outcome {
        Ok(stats) => {
            state.status = RefreshStatus::Completed;
            state.snapshot = Some(stats);
        }
        Err(message) => {
            error!("Refresh failed, keeping previous snapshot: {}", message);
            state.status = RefreshStatus::Failed;
            state.errors.push(message);
        }
    }
}
