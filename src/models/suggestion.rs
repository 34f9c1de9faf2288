//! Team-build suggestion output.

use serde::{Deserialize, Serialize};

/// Label shown when none of the requested augments were seen with a composition.
pub const NO_AUGMENT_MATCH: &str = "None in the searched range";

/// Best requested augment for a recommended composition.
///
/// Serialized as `{"name", "rank"}` where a miss is the not-found label
/// with rank 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "AugmentMatchRecord", from = "AugmentMatchRecord")]
pub enum AugmentMatch {
    /// Requested augment with the best top-4 rank (1-based).
    Ranked { name: String, rank: u32 },

    /// No requested augment was observed with the composition.
    NotFound,
}

impl AugmentMatch {
    /// Display label: the augment name, or the not-found label.
    pub fn label(&self) -> &str {
        match self {
            AugmentMatch::Ranked { name, .. } => name,
            AugmentMatch::NotFound => NO_AUGMENT_MATCH,
        }
    }

    /// Rank of the matched augment, 0 when none matched.
    pub fn rank(&self) -> u32 {
        match self {
            AugmentMatch::Ranked { rank, .. } => *rank,
            AugmentMatch::NotFound => 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AugmentMatchRecord {
    name: String,
    rank: u32,
}

impl From<AugmentMatch> for AugmentMatchRecord {
    fn from(m: AugmentMatch) -> Self {
        Self {
            name: m.label().to_string(),
            rank: m.rank(),
        }
    }
}

impl From<AugmentMatchRecord> for AugmentMatch {
    fn from(r: AugmentMatchRecord) -> Self {
        match r.rank {
            0 => AugmentMatch::NotFound,
            rank => AugmentMatch::Ranked { name: r.name, rank },
        }
    }
}

/// Recommendation for one requested unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub unit: String,

    /// Composition the unit is most often played in
    pub composition: String,

    /// Mean placement of the unit in that composition, 3 decimal places
    pub average_placement: f64,

    pub augment: AugmentMatch,

    /// How many of the unit's five most-equipped items were requested
    pub matched_items: u32,
}
