//! Shared test data: a small translation set and two matches.

use std::fs;

use serde_json::{json, Value};

use crate::lookup::{LookupKind, Translations};
use crate::models::MatchDocument;
use crate::storage::StorageConfig;

pub fn translations() -> Translations {
    Translations::new()
        .with(LookupKind::Trait, "Set9_Bruiser", "Bruiser")
        .with(LookupKind::Trait, "Set9_Sorcerer", "Sorcerer")
        .with(LookupKind::Trait, "Set9_Zaun", "Zaun")
        .with(LookupKind::Augment, "TFT9_Augment_StandUnited", "Stand United")
        .with(LookupKind::Augment, "TFT9_Augment_JeweledLotus", "Jeweled Lotus")
        .with(LookupKind::Unit, "TFT9_Sett", "Sett")
        .with(LookupKind::Unit, "TFT9_Ekko", "Ekko")
        .with(LookupKind::Item, "TFT_Item_Warmogs", "Warmog's Armor")
        .with(LookupKind::Item, "TFT_Item_BrambleVest", "Bramble Vest")
}

pub fn write_translation_files(config: &StorageConfig) {
    let dir = config.translations_dir();
    fs::create_dir_all(&dir).unwrap();

    let files = [
        (
            "tft-trait.json",
            json!({"type": "tft-trait", "data": {
                "Set9_Bruiser": {"id": "Set9_Bruiser", "name": "Bruiser"},
                "Set9_Sorcerer": {"id": "Set9_Sorcerer", "name": "Sorcerer"},
                "Set9_Zaun": {"id": "Set9_Zaun", "name": "Zaun"}
            }}),
        ),
        (
            "tft-augments.json",
            json!({"data": {
                "TFT9_Augment_StandUnited": {"id": "TFT9_Augment_StandUnited", "name": "Stand United"},
                "TFT9_Augment_JeweledLotus": {"id": "TFT9_Augment_JeweledLotus", "name": "Jeweled Lotus"}
            }}),
        ),
        (
            "tft-champion.json",
            json!({"data": {
                "TFT9_Sett": {"id": "TFT9_Sett", "name": "Sett"},
                "TFT9_Ekko": {"id": "TFT9_Ekko", "name": "Ekko"}
            }}),
        ),
        (
            "tft-item.json",
            json!({"data": {
                "44": {"id": "TFT_Item_Warmogs", "name": "Warmog's Armor"},
                "45": {"id": "TFT_Item_BrambleVest", "name": "Bramble Vest"}
            }}),
        ),
    ];

    for (name, value) in files {
        fs::write(dir.join(name), value.to_string()).unwrap();
    }
}

fn participant(
    traits: Value,
    augments: Value,
    units: Value,
    placement: u32,
    last_round: u32,
    damage: u32,
) -> Value {
    json!({
        "traits": traits,
        "augments": augments,
        "units": units,
        "placement": placement,
        "last_round": last_round,
        "total_damage_to_players": damage,
        "level": 8
    })
}

/// Two matches, four participants.
///
/// Compositions: "Bruiser 3 Sorcerer 2" x2 (placements 1, 4), "Zaun 4" x1
/// (5), "Built Different" x1 (8).
pub fn match_values() -> Vec<Value> {
    let bruiser_sorcerer = json!([
        {"name": "Set9_Bruiser", "style": 3, "tier_total": 4},
        {"name": "Set9_Sorcerer", "style": 2, "tier_total": 3},
        {"name": "Set9_Zaun", "style": 0, "tier_total": 4}
    ]);

    vec![
        json!({
            "metadata": {"match_id": "NA1_1"},
            "info": {"participants": [
                participant(
                    bruiser_sorcerer.clone(),
                    json!(["TFT9_Augment_StandUnitedHR"]),
                    json!([
                        {"character_id": "TFT9_Sett", "itemNames": ["TFT_Item_Warmogs", "TFT_Item_BrambleVest"]},
                        {"character_id": "TFT9_Ekko", "itemNames": []}
                    ]),
                    1, 35, 120,
                ),
                participant(
                    json!([{"name": "Set9_Zaun", "style": 4, "tier_total": 4}]),
                    json!(["TFT9_Augment_JeweledLotus"]),
                    json!([{"character_id": "TFT9_Ekko", "itemNames": ["TFT_Item_Warmogs"]}]),
                    5, 30, 60,
                ),
            ]}
        }),
        json!({
            "metadata": {"match_id": "NA1_2"},
            "info": {"participants": [
                participant(
                    bruiser_sorcerer,
                    json!(["TFT9_Augment_JeweledLotus"]),
                    json!([{"character_id": "TFT9_Sett", "itemNames": ["TFT_Item_Warmogs"]}]),
                    4, 33, 80,
                ),
                participant(
                    json!([]),
                    json!([]),
                    json!([{"character_id": "TFT9_Sett"}]),
                    8, 20, 10,
                ),
            ]}
        }),
    ]
}

pub fn matches() -> Vec<MatchDocument> {
    match_values()
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
}

/// Write the translation files and the match log into `config`.
pub fn write_dataset(config: &StorageConfig) {
    write_translation_files(config);
    let lines: Vec<String> = match_values().iter().map(Value::to_string).collect();
    fs::write(config.matches_path(), lines.join("\n") + "\n").unwrap();
}
