//! Display-name lookup for internal game identifiers.
//!
//! Traits, augments, units and items each live in their own namespace.
//! A miss is an error: it means the translation files are stale or belong
//! to a different set than the match data.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    Trait,
    Augment,
    Unit,
    Item,
}

impl LookupKind {
    pub const ALL: [LookupKind; 4] = [
        LookupKind::Trait,
        LookupKind::Augment,
        LookupKind::Unit,
        LookupKind::Item,
    ];
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Trait => write!(f, "trait"),
            LookupKind::Augment => write!(f, "augment"),
            LookupKind::Unit => write!(f, "unit"),
            LookupKind::Item => write!(f, "item"),
        }
    }
}

/// Lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Unknown {kind} identifier: {id}")]
    Missing { kind: LookupKind, id: String },
}

/// Resolves internal identifiers to display names.
pub trait Resolver {
    fn resolve(&self, kind: LookupKind, id: &str) -> Result<&str, LookupError>;
}

/// In-memory translation tables, one map per namespace.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    traits: HashMap<String, String>,
    augments: HashMap<String, String>,
    units: HashMap<String, String>,
    items: HashMap<String, String>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: LookupKind) -> &HashMap<String, String> {
        match kind {
            LookupKind::Trait => &self.traits,
            LookupKind::Augment => &self.augments,
            LookupKind::Unit => &self.units,
            LookupKind::Item => &self.items,
        }
    }

    fn table_mut(&mut self, kind: LookupKind) -> &mut HashMap<String, String> {
        match kind {
            LookupKind::Trait => &mut self.traits,
            LookupKind::Augment => &mut self.augments,
            LookupKind::Unit => &mut self.units,
            LookupKind::Item => &mut self.items,
        }
    }

    /// Add or replace one translation.
    pub fn insert(
        &mut self,
        kind: LookupKind,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> &mut Self {
        self.table_mut(kind).insert(id.into(), name.into());
        self
    }

    /// Builder-style variant of [`Translations::insert`].
    pub fn with(mut self, kind: LookupKind, id: &str, name: &str) -> Self {
        self.insert(kind, id, name);
        self
    }

    /// Number of identifiers in a namespace.
    pub fn len(&self, kind: LookupKind) -> usize {
        self.table(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        LookupKind::ALL.iter().all(|k| self.table(*k).is_empty())
    }

    /// Distinct display names in a namespace, sorted.
    pub fn display_names(&self, kind: LookupKind) -> Vec<String> {
        self.table(kind)
            .values()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Resolver for Translations {
    fn resolve(&self, kind: LookupKind, id: &str) -> Result<&str, LookupError> {
        self.table(kind)
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| LookupError::Missing {
                kind,
                id: id.to_string(),
            })
    }
}
