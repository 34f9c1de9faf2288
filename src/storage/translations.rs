//! Static translation files.
//!
//! Each file follows the Data Dragon layout:
//! `{"data": {"<key>": {"id": "...", "name": "..."}}}`.
//! Traits, augments and champions are keyed by the map key; items by `id`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::{StorageConfig, StorageError};
use crate::lookup::{LookupKind, Translations};

#[derive(Debug, Deserialize)]
struct DataFile {
    data: HashMap<String, DataEntry>,
}

#[derive(Debug, Deserialize)]
struct DataEntry {
    #[serde(default)]
    id: Option<String>,
    name: String,
}

/// File name for each lookup namespace.
pub fn translation_file(kind: LookupKind) -> &'static str {
    match kind {
        LookupKind::Trait => "tft-trait.json",
        LookupKind::Augment => "tft-augments.json",
        LookupKind::Unit => "tft-champion.json",
        LookupKind::Item => "tft-item.json",
    }
}

fn read_data_file(path: &Path) -> Result<DataFile, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Load all four translation files from the translations directory.
pub fn load_translations(config: &StorageConfig) -> Result<Translations, StorageError> {
    let dir = config.translations_dir();
    let mut translations = Translations::new();

    for kind in LookupKind::ALL {
        let file = read_data_file(&dir.join(translation_file(kind)))?;
        for (key, entry) in file.data {
            let id = match (kind, entry.id) {
                (LookupKind::Item, Some(id)) => id,
                _ => key,
            };
            translations.insert(kind, id, entry.name);
        }
        info!("Loaded {} {} translations", translations.len(kind), kind);
    }

    Ok(translations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::write_translation_files;
    use crate::lookup::Resolver;
    use tempfile::TempDir;

    #[test]
    fn test_load_translations() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());
        write_translation_files(&config);

        let t = load_translations(&config).unwrap();
        assert_eq!(t.resolve(LookupKind::Trait, "Set9_Bruiser").unwrap(), "Bruiser");
        assert_eq!(t.resolve(LookupKind::Unit, "TFT9_Sett").unwrap(), "Sett");
        assert_eq!(
            t.resolve(LookupKind::Augment, "TFT9_Augment_StandUnited").unwrap(),
            "Stand United"
        );
    }

    #[test]
    fn test_items_are_keyed_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());
        write_translation_files(&config);

        let t = load_translations(&config).unwrap();
        assert_eq!(
            t.resolve(LookupKind::Item, "TFT_Item_Warmogs").unwrap(),
            "Warmog's Armor"
        );
        assert!(t.resolve(LookupKind::Item, "44").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());

        assert!(matches!(
            load_translations(&config),
            Err(StorageError::PathNotFound(_))
        ));
    }
}
