use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{suggest as build_suggestions, SuggestError, SuggestRequest};
use crate::models::Suggestion;

#[derive(Debug, Deserialize)]
pub struct SuggestionBody {
    #[serde(default)]
    pub augments: Vec<String>,
    pub units: Vec<String>,
    #[serde(default)]
    pub items: Vec<String>,
    pub search: Option<usize>,
}

impl From<SuggestError> for ApiError {
    fn from(err: SuggestError) -> Self {
        match err {
            SuggestError::UnknownUnit(_) => ApiError::NotFound(err.to_string()),
            SuggestError::EmptySearch => ApiError::BadRequest(err.to_string()),
        }
    }
}

/// One suggestion per requested unit, in request order.
pub async fn suggest(
    State(state): State<AppState>,
    Json(body): Json<SuggestionBody>,
) -> Result<Json<Vec<Suggestion>>, ApiError> {
    if body.units.is_empty() {
        return Err(ApiError::BadRequest("At least one unit is required".to_string()));
    }

    let request = SuggestRequest {
        augments: body.augments.into_iter().collect(),
        units: body.units,
        items: body.items.into_iter().collect(),
        search: state.analysis.clamp_top(body.search),
    };

    let snapshot = state.snapshot().await;
    Ok(Json(build_suggestions(&snapshot.tables, &request)?))
}
