use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::routes::refresh::RefreshStatus;
use crate::api::state::AppState;
use crate::lookup::LookupKind;
use crate::snapshot::SnapshotStats;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub snapshot: SnapshotStats,
    pub refresh_status: RefreshStatus,
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let snapshot = state.snapshot().await.stats();
    let refresh_status = state.refresh_state.read().await.status;
    Json(StatusResponse {
        snapshot,
        refresh_status,
    })
}

/// Sorted display names of one translation namespace.
#[derive(Debug, Serialize)]
pub struct NamesResponse {
    pub kind: LookupKind,
    pub names: Vec<String>,
}

async fn names(state: &AppState, kind: LookupKind) -> Json<NamesResponse> {
    let snapshot = state.snapshot().await;
    Json(NamesResponse {
        kind,
        names: snapshot.translations.display_names(kind),
    })
}

pub async fn items(State(state): State<AppState>) -> Json<NamesResponse> {
    names(&state, LookupKind::Item).await
}

pub async fn augments(State(state): State<AppState>) -> Json<NamesResponse> {
    names(&state, LookupKind::Augment).await
}

pub async fn units(State(state): State<AppState>) -> Json<NamesResponse> {
    names(&state, LookupKind::Unit).await
}
