//! Statistics calculation engine.
//!
//! Computes derived metrics from stored match data:
//! - Composition naming from a board's traits
//! - Single-pass aggregation into the four summary tables
//! - Ranked views (most played, best placing, top augments, damage curves)
//! - Per-unit team-build suggestions

pub mod aggregate;
pub mod classify;
pub mod query;
pub mod suggest;

pub use aggregate::{aggregate, AggregateError, TableBuilder};
pub use classify::{classify, BUILT_DIFFERENT};
pub use query::{
    average_placements, damage_curves, modifiers_for, ranked_augments, top_compositions,
    top_modifiers, unit_affinity, Affinity, DamageCurve, DamagePoint, ModifierLookup,
    ModifierRanking, Ranked,
};
pub use suggest::{suggest, SuggestError, SuggestRequest};
