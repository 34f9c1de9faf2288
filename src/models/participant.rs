//! Match documents as returned by the TFT match endpoint.

use serde::{Deserialize, Serialize};

/// An active trait on a player's final board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTrait {
    /// Internal trait identifier (e.g. "Set9_Bruiser")
    pub name: String,

    /// Threshold style reached (0 = inactive, higher = stronger)
    pub style: u32,

    /// Number of threshold breakpoints the trait has
    pub tier_total: u32,
}

/// A unit fielded on a player's final board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldedUnit {
    /// Internal champion identifier (e.g. "TFT9_Sett")
    pub character_id: String,

    /// Internal identifiers of the equipped items
    #[serde(rename = "itemNames", default)]
    pub item_names: Vec<String>,
}

/// One player's outcome in one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub traits: Vec<ActiveTrait>,

    /// Chosen augments, primary first. Absent in sets without augments.
    #[serde(default)]
    pub augments: Vec<String>,

    pub units: Vec<FieldedUnit>,

    /// Final placement (1 = first, 8 = last)
    pub placement: u32,

    /// Last round the player was alive for
    pub last_round: u32,

    /// Total damage dealt to opposing players
    pub total_damage_to_players: u32,
}

impl ParticipantRecord {
    /// The primary augment identifier, if any was chosen.
    pub fn primary_augment(&self) -> Option<&str> {
        self.augments.first().map(String::as_str)
    }
}

/// Match metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub match_id: String,
}

/// Match info block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub participants: Vec<ParticipantRecord>,
}

/// A full match document, one per line in the match log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDocument {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

impl MatchDocument {
    pub fn match_id(&self) -> &str {
        &self.metadata.match_id
    }
}
