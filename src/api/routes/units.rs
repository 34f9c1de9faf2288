use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::routes::compositions::TopParams;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{unit_affinity, Affinity};

#[derive(Debug, Serialize)]
pub struct UnitDetail {
    pub unit: String,
    pub compositions: Affinity,
    pub items: Affinity,
}

/// Compositions and items a unit is played with.
pub async fn unit_detail(
    State(state): State<AppState>,
    Path(unit): Path<String>,
    Query(params): Query<TopParams>,
) -> Result<Json<UnitDetail>, ApiError> {
    let top = state.analysis.clamp_top(params.top);
    let snapshot = state.snapshot().await;
    let not_found = || ApiError::NotFound(format!("Unit '{}'", unit));

    let compositions =
        unit_affinity(&snapshot.tables.unit_compositions, &unit, top).ok_or_else(not_found)?;
    let items = unit_affinity(&snapshot.tables.unit_items, &unit, top).ok_or_else(not_found)?;

    Ok(Json(UnitDetail {
        unit,
        compositions,
        items,
    }))
}
