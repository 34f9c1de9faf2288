//! Derived statistics models.
//!
//! The four summary tables produced by one aggregation pass, and the
//! counters they are built from.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Lowest (best) placement.
pub const FIRST_PLACE: u32 = 1;

/// Highest (worst) placement in an eight-player lobby.
pub const LAST_PLACE: u32 = 8;

/// Placements counted as a "win" for top-4 frequency.
pub const TOP_FOUR: u32 = 4;

/// Canonical composition name, e.g. "Bruiser 3 Mystic 2".
pub type CompositionKey = String;

/// Occurrence count per final placement 1..=8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementHistogram {
    counts: [u32; LAST_PLACE as usize],
}

impl PlacementHistogram {
    /// Record one outcome. Returns `false` for placements outside 1..=8.
    pub fn record(&mut self, placement: u32) -> bool {
        if !(FIRST_PLACE..=LAST_PLACE).contains(&placement) {
            return false;
        }
        self.counts[(placement - 1) as usize] += 1;
        true
    }

    /// Count for a single placement (0 for out-of-range placements).
    pub fn count(&self, placement: u32) -> u32 {
        if (FIRST_PLACE..=LAST_PLACE).contains(&placement) {
            self.counts[(placement - 1) as usize]
        } else {
            0
        }
    }

    /// Number of outcomes recorded.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Number of outcomes with placement <= 4.
    pub fn top_four(&self) -> u32 {
        self.counts[..TOP_FOUR as usize].iter().sum()
    }

    /// Sum of placement x count.
    pub fn placement_sum(&self) -> u64 {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as u64 + 1) * c as u64)
            .sum()
    }

    /// `(placement, count)` pairs for 1..=8.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as u32 + 1, c))
    }
}

impl AddAssign for PlacementHistogram {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.counts.iter_mut().zip(rhs.counts) {
            *a += b;
        }
    }
}

/// Occurrence count and cumulative placement for one pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub count: u32,
    pub placement_sum: u64,
}

impl Tally {
    pub fn record(&mut self, placement: u32) {
        self.count += 1;
        self.placement_sum += placement as u64;
    }

    /// Arithmetic mean placement. `None` when nothing was recorded.
    pub fn mean_placement(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.placement_sum as f64 / self.count as f64)
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.count += rhs.count;
        self.placement_sum += rhs.placement_sum;
    }
}

/// Composition -> augment display name -> placement histogram.
pub type CompositionOutcomeTable = BTreeMap<CompositionKey, BTreeMap<String, PlacementHistogram>>;

/// Unit display name -> composition -> tally.
pub type UnitCompositionTable = BTreeMap<String, BTreeMap<CompositionKey, Tally>>;

/// Unit display name -> item display name -> tally.
pub type UnitItemTable = BTreeMap<String, BTreeMap<String, Tally>>;

/// Composition -> last round reached -> damage dealt, in record order.
pub type DamageRoundTable = BTreeMap<CompositionKey, BTreeMap<u32, Vec<u32>>>;

/// The four tables from a single aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTables {
    pub compositions: CompositionOutcomeTable,
    pub unit_compositions: UnitCompositionTable,
    pub unit_items: UnitItemTable,
    pub damage_rounds: DamageRoundTable,
}

impl SummaryTables {
    /// Number of records folded into the composition table.
    pub fn record_count(&self) -> u32 {
        self.compositions
            .values()
            .flat_map(|augments| augments.values())
            .map(PlacementHistogram::total)
            .sum()
    }
}

/// Sum of every augment histogram for a composition.
pub fn composition_histogram(
    table: &CompositionOutcomeTable,
    composition: &str,
) -> Option<PlacementHistogram> {
    table.get(composition).map(|augments| {
        augments.values().fold(PlacementHistogram::default(), |mut acc, h| {
            acc += *h;
            acc
        })
    })
}
