//! Core data models for match records and aggregated statistics.

mod participant;
mod stats;
mod suggestion;

pub use participant::*;
pub use stats::*;
pub use suggestion::*;
