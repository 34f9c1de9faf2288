use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{
    average_placements, damage_curves, modifiers_for, top_compositions, DamageCurve,
    ModifierLookup, ModifierRanking, Ranked,
};

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub most_played: Vec<Ranked<u32>>,
    pub highest_placing: Vec<Ranked<f64>>,
}

/// Most played compositions and their mean placements.
pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> Json<OverviewResponse> {
    let top = state.analysis.clamp_top(params.top);
    let snapshot = state.snapshot().await;
    let table = &snapshot.tables.compositions;

    Json(OverviewResponse {
        most_played: top_compositions(table, top),
        highest_placing: average_placements(table, top),
    })
}

#[derive(Debug, Deserialize)]
pub struct AugmentParams {
    pub comp: Option<String>,
    pub search: Option<usize>,
}

/// Best augments for one composition.
pub async fn augments(
    State(state): State<AppState>,
    Query(params): Query<AugmentParams>,
) -> Result<Json<ModifierRanking>, ApiError> {
    let composition = params
        .comp
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing 'comp' parameter".to_string()))?;
    let search = state.analysis.clamp_top(params.search);
    let snapshot = state.snapshot().await;

    match modifiers_for(&snapshot.tables.compositions, &composition, search) {
        ModifierLookup::Found(ranking) => Ok(Json(ranking)),
        ModifierLookup::NotInRange {
            composition,
            search,
        } => Err(ApiError::NotFound(format!(
            "Composition '{}' is not among the {} most played",
            composition, search
        ))),
    }
}

/// Mean damage per round for the most played compositions.
pub async fn damage(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> Json<Vec<DamageCurve>> {
    let top = state.analysis.clamp_top(params.top);
    let snapshot = state.snapshot().await;
    Json(damage_curves(
        &snapshot.tables.compositions,
        &snapshot.tables.damage_rounds,
        top,
    ))
}
