//! Team-build suggestions.
//!
//! For each requested unit: the composition it is most often played in,
//! how well the caller's augments rank with that composition, and how many
//! of the unit's usual items the caller has.

use std::collections::HashSet;

use thiserror::Error;

use crate::calculate::query::{ranked_augments, unit_affinity};
use crate::models::{AugmentMatch, Suggestion, SummaryTables};

/// Most-equipped items compared against the caller's items.
pub const ITEMS_COMPARED: usize = 5;

/// Errors that can occur while building suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestError {
    #[error("Unit not found in match data: {0}")]
    UnknownUnit(String),

    #[error("Search range must cover at least one entry")]
    EmptySearch,
}

/// Caller preferences for a suggestion request.
#[derive(Debug, Clone, Default)]
pub struct SuggestRequest {
    pub augments: HashSet<String>,
    /// Units in the order suggestions should be returned
    pub units: Vec<String>,
    pub items: HashSet<String>,
    /// How many entries to search per unit
    pub search: usize,
}

/// One suggestion per requested unit, in request order.
pub fn suggest(
    tables: &SummaryTables,
    request: &SuggestRequest,
) -> Result<Vec<Suggestion>, SuggestError> {
    if request.search == 0 {
        return Err(SuggestError::EmptySearch);
    }
    request
        .units
        .iter()
        .map(|unit| suggest_for_unit(tables, request, unit))
        .collect()
}

fn suggest_for_unit(
    tables: &SummaryTables,
    request: &SuggestRequest,
    unit: &str,
) -> Result<Suggestion, SuggestError> {
    let unknown = || SuggestError::UnknownUnit(unit.to_string());

    let compositions =
        unit_affinity(&tables.unit_compositions, unit, request.search).ok_or_else(unknown)?;
    let composition = compositions.most_played.first().ok_or_else(unknown)?;

    let average_placement = compositions
        .best_placing
        .iter()
        .find(|entry| entry.name == composition.name)
        .map(|entry| round3(entry.value))
        .ok_or_else(unknown)?;

    let augments = ranked_augments(&tables.compositions, &composition.name);
    let augment = augments
        .iter()
        .position(|entry| request.augments.contains(&entry.name))
        .map(|index| AugmentMatch::Ranked {
            name: augments[index].name.clone(),
            rank: index as u32 + 1,
        })
        .unwrap_or(AugmentMatch::NotFound);

    let matched_items = unit_affinity(&tables.unit_items, unit, request.search)
        .map(|items| {
            items
                .most_played
                .iter()
                .take(ITEMS_COMPARED)
                .filter(|entry| request.items.contains(&entry.name))
                .count() as u32
        })
        .unwrap_or(0);

    Ok(Suggestion {
        unit: unit.to_string(),
        composition: composition.name.clone(),
        average_placement,
        augment,
        matched_items,
    })
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
