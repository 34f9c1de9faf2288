//! Ranked views over the summary tables.
//!
//! All functions are pure. Ties always break by ascending key so results
//! never depend on map traversal order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{
    composition_histogram, CompositionKey, CompositionOutcomeTable, DamageRoundTable,
    PlacementHistogram, Tally,
};

/// Augments kept per composition in the top-modifier view.
pub const TOP_MODIFIERS: usize = 5;

/// A `(name, value)` row ready for tabular rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    pub name: String,
    pub value: T,
}

impl<T> Ranked<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Top augments for one composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifierRanking {
    pub composition: CompositionKey,
    /// Augments by top-4 count, best first
    pub augments: Vec<Ranked<u32>>,
}

/// Outcome of looking up one composition's augments.
#[derive(Debug, Clone, PartialEq)]
pub enum ModifierLookup {
    Found(ModifierRanking),

    /// Composition is not among the `search` most played.
    NotInRange { composition: String, search: usize },
}

/// Mean damage per last round reached for one composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageCurve {
    pub composition: CompositionKey,
    pub points: Vec<DamagePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamagePoint {
    pub round: u32,
    pub mean_damage: f64,
}

/// A unit's two affinity views over one of its tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Affinity {
    /// Entries by occurrence count, highest first
    pub most_played: Vec<Ranked<u32>>,
    /// Entries by mean placement, lowest first
    pub best_placing: Vec<Ranked<f64>>,
}

fn desc_count_then_name(a: &Ranked<u32>, b: &Ranked<u32>) -> Ordering {
    b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name))
}

fn asc_mean_then_name(a: &Ranked<f64>, b: &Ranked<f64>) -> Ordering {
    a.value.total_cmp(&b.value).then_with(|| a.name.cmp(&b.name))
}

fn histogram_mean(h: &PlacementHistogram) -> Option<f64> {
    match h.total() {
        0 => None,
        total => Some(h.placement_sum() as f64 / total as f64),
    }
}

/// The `top` compositions by total games played.
pub fn top_compositions(table: &CompositionOutcomeTable, top: usize) -> Vec<Ranked<u32>> {
    let mut ranked: Vec<Ranked<u32>> = table
        .iter()
        .map(|(comp, augments)| {
            Ranked::new(comp, augments.values().map(|h| h.total()).sum::<u32>())
        })
        .collect();
    ranked.sort_by(desc_count_then_name);
    ranked.truncate(top);
    ranked
}

/// Mean placement for the `top` most played compositions, best first.
pub fn average_placements(table: &CompositionOutcomeTable, top: usize) -> Vec<Ranked<f64>> {
    let mut ranked: Vec<Ranked<f64>> = top_compositions(table, top)
        .into_iter()
        .filter_map(|entry| {
            let merged = composition_histogram(table, &entry.name)?;
            histogram_mean(&merged).map(|mean| Ranked::new(entry.name, mean))
        })
        .collect();
    ranked.sort_by(asc_mean_then_name);
    ranked
}

/// Every augment seen with a composition, by top-4 count.
pub fn ranked_augments(table: &CompositionOutcomeTable, composition: &str) -> Vec<Ranked<u32>> {
    let Some(augments) = table.get(composition) else {
        return Vec::new();
    };
    let mut ranked: Vec<Ranked<u32>> = augments
        .iter()
        .map(|(augment, h)| Ranked::new(augment, h.top_four()))
        .collect();
    ranked.sort_by(desc_count_then_name);
    ranked
}

/// The five best augments for each of the `top` most played compositions,
/// in most-played order.
pub fn top_modifiers(table: &CompositionOutcomeTable, top: usize) -> Vec<ModifierRanking> {
    top_compositions(table, top)
        .into_iter()
        .map(|entry| {
            let mut augments = ranked_augments(table, &entry.name);
            augments.truncate(TOP_MODIFIERS);
            ModifierRanking {
                composition: entry.name,
                augments,
            }
        })
        .collect()
}

/// Top augments for one composition, searched within the `search` most played.
pub fn modifiers_for(
    table: &CompositionOutcomeTable,
    composition: &str,
    search: usize,
) -> ModifierLookup {
    top_modifiers(table, search)
        .into_iter()
        .find(|m| m.composition == composition)
        .map(ModifierLookup::Found)
        .unwrap_or_else(|| ModifierLookup::NotInRange {
            composition: composition.to_string(),
            search,
        })
}

/// Mean damage per round for the `top` most played compositions.
pub fn damage_curves(
    compositions: &CompositionOutcomeTable,
    damage: &DamageRoundTable,
    top: usize,
) -> Vec<DamageCurve> {
    top_compositions(compositions, top)
        .into_iter()
        .map(|entry| {
            let points = damage
                .get(&entry.name)
                .into_iter()
                .flatten()
                .filter(|(_, values)| !values.is_empty())
                .map(|(&round, values)| DamagePoint {
                    round,
                    mean_damage: values.iter().map(|&v| v as f64).sum::<f64>()
                        / values.len() as f64,
                })
                .collect();
            DamageCurve {
                composition: entry.name,
                points,
            }
        })
        .collect()
}

/// Most played and best placing entries for one unit.
///
/// Best-placing candidates are the unit's `top` most played entries, so a
/// single lucky game cannot top the list. Returns `None` for unknown units.
pub fn unit_affinity(
    table: &BTreeMap<String, BTreeMap<String, Tally>>,
    unit: &str,
    top: usize,
) -> Option<Affinity> {
    let entries = table.get(unit)?;

    let mut most_played: Vec<Ranked<u32>> = entries
        .iter()
        .map(|(name, tally)| Ranked::new(name, tally.count))
        .collect();
    most_played.sort_by(desc_count_then_name);
    most_played.truncate(top);

    let mut best_placing: Vec<Ranked<f64>> = most_played
        .iter()
        .filter_map(|entry| {
            let mean = entries.get(&entry.name)?.mean_placement()?;
            Some(Ranked::new(entry.name.clone(), mean))
        })
        .collect();
    best_placing.sort_by(asc_mean_then_name);

    Some(Affinity {
        most_played,
        best_placing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn histogram(placements: &[u32]) -> PlacementHistogram {
        let mut h = PlacementHistogram::default();
        for &p in placements {
            h.record(p);
        }
        h
    }

    fn table() -> CompositionOutcomeTable {
        let mut t = CompositionOutcomeTable::new();
        let a = t.entry("Bruiser 4".to_string()).or_default();
        a.insert("Stand United".to_string(), histogram(&[1, 2, 5]));
        a.insert("Jeweled Lotus".to_string(), histogram(&[3, 7]));
        a.insert(String::new(), histogram(&[8]));

        let b = t.entry("Zaun 4".to_string()).or_default();
        b.insert("Jeweled Lotus".to_string(), histogram(&[1, 1, 2]));

        let c = t.entry("Yordle 6".to_string()).or_default();
        c.insert("Stand United".to_string(), histogram(&[4, 6, 6]));

        let d = t.entry("Built Different".to_string()).or_default();
        d.insert(String::new(), histogram(&[5]));
        t
    }

    #[test]
    fn test_top_compositions_by_frequency() {
        let top = top_compositions(&table(), 3);
        assert_eq!(
            top,
            vec![
                Ranked::new("Bruiser 4", 6),
                Ranked::new("Yordle 6", 3),
                Ranked::new("Zaun 4", 3),
            ]
        );
    }

    #[test]
    fn test_top_compositions_ties_by_ascending_key() {
        let top = top_compositions(&table(), 10);
        let names: Vec<_> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bruiser 4", "Yordle 6", "Zaun 4", "Built Different"]);
    }

    #[test]
    fn test_average_placements() {
        let avg = average_placements(&table(), 3);
        let names: Vec<_> = avg.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zaun 4", "Bruiser 4", "Yordle 6"]);

        // (1 + 2 + 5 + 3 + 7 + 8) / 6
        assert!((avg[1].value - 26.0 / 6.0).abs() < 1e-9);
        assert!((avg[0].value - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_placements_only_over_top_set() {
        let avg = average_placements(&table(), 1);
        assert_eq!(avg.len(), 1);
        assert_eq!(avg[0].name, "Bruiser 4");
    }

    #[test]
    fn test_top_modifiers_by_top_four() {
        let mods = top_modifiers(&table(), 2);
        assert_eq!(mods.len(), 2);
        assert_eq!(mods[0].composition, "Bruiser 4");
        assert_eq!(
            mods[0].augments,
            vec![
                Ranked::new("Stand United", 2),
                Ranked::new("Jeweled Lotus", 1),
                Ranked::new("", 0),
            ]
        );
    }

    #[test]
    fn test_top_modifiers_keeps_five() {
        let mut t = CompositionOutcomeTable::new();
        let comp = t.entry("Bruiser 4".to_string()).or_default();
        for i in 0..8 {
            comp.insert(format!("Augment {}", i), histogram(&[1]));
        }
        let mods = top_modifiers(&t, 1);
        assert_eq!(mods[0].augments.len(), TOP_MODIFIERS);
        assert_eq!(mods[0].augments[0].name, "Augment 0");
    }

    #[test]
    fn test_modifiers_for_within_and_outside_range() {
        match modifiers_for(&table(), "Zaun 4", 3) {
            ModifierLookup::Found(m) => {
                assert_eq!(m.augments, vec![Ranked::new("Jeweled Lotus", 3)])
            }
            other => panic!("expected Found, got {:?}", other),
        }

        assert_eq!(
            modifiers_for(&table(), "Built Different", 3),
            ModifierLookup::NotInRange {
                composition: "Built Different".to_string(),
                search: 3
            }
        );
    }

    #[test]
    fn test_damage_curves() {
        let mut damage = DamageRoundTable::new();
        let rounds = damage.entry("Bruiser 4".to_string()).or_default();
        rounds.insert(30, vec![10, 20]);
        rounds.insert(25, vec![6]);

        let curves = damage_curves(&table(), &damage, 2);
        assert_eq!(curves.len(), 2);
        assert_eq!(
            curves[0].points,
            vec![
                DamagePoint {
                    round: 25,
                    mean_damage: 6.0
                },
                DamagePoint {
                    round: 30,
                    mean_damage: 15.0
                },
            ]
        );
        assert!(curves[1].points.is_empty());
    }

    fn unit_table() -> BTreeMap<String, BTreeMap<String, Tally>> {
        let mut t = BTreeMap::new();
        let sett: &mut BTreeMap<String, Tally> = t.entry("Sett".to_string()).or_default();
        sett.insert(
            "Bruiser 4".to_string(),
            Tally {
                count: 10,
                placement_sum: 45,
            },
        );
        sett.insert(
            "Zaun 4".to_string(),
            Tally {
                count: 4,
                placement_sum: 10,
            },
        );
        sett.insert(
            "Yordle 6".to_string(),
            Tally {
                count: 1,
                placement_sum: 1,
            },
        );
        t
    }

    #[test]
    fn test_unit_affinity_two_lists() {
        let affinity = unit_affinity(&unit_table(), "Sett", 2).unwrap();

        assert_eq!(
            affinity.most_played,
            vec![Ranked::new("Bruiser 4", 10), Ranked::new("Zaun 4", 4)]
        );
        assert_eq!(
            affinity.best_placing,
            vec![Ranked::new("Zaun 4", 2.5), Ranked::new("Bruiser 4", 4.5)]
        );
    }

    #[test]
    fn test_unit_affinity_unknown_unit() {
        assert!(unit_affinity(&unit_table(), "Ekko", 5).is_none());
    }
}
