//! Composition naming.
//!
//! A composition is named after the two strongest leveled traits on the
//! board. Boards without any leveled trait fall back to their unique traits,
//! and boards with neither are "Built Different".

use std::cmp::Reverse;

use crate::lookup::{LookupError, LookupKind, Resolver};
use crate::models::{CompositionKey, ParticipantRecord};

/// Name used when a board has no active trait worth naming.
pub const BUILT_DIFFERENT: &str = "Built Different";

/// Suffix marking the higher-rank variant of an augment id.
const AUGMENT_RANK_SUFFIX: &str = "HR";

/// Traits shown in a composition name.
const NAMED_TRAITS: usize = 2;

/// Derive the composition key and primary augment display name for a record.
///
/// The augment is the empty string when no augment was chosen; that is a
/// valid key of its own.
pub fn classify<R: Resolver + ?Sized>(
    record: &ParticipantRecord,
    resolver: &R,
) -> Result<(CompositionKey, String), LookupError> {
    Ok((composition_key(record, resolver)?, augment_name(record, resolver)?))
}

/// Composition key for a record's trait list.
pub fn composition_key<R: Resolver + ?Sized>(
    record: &ParticipantRecord,
    resolver: &R,
) -> Result<CompositionKey, LookupError> {
    let mut leveled: Vec<(u32, &str)> = Vec::new();
    let mut unique: Vec<&str> = Vec::new();

    for t in record.traits.iter().filter(|t| t.style > 1) {
        if t.tier_total > 1 {
            leveled.push((t.style, t.name.as_str()));
        } else {
            unique.push(t.name.as_str());
        }
    }

    leveled.sort_by_key(|&(style, name)| Reverse((style, name)));

    let named = leveled
        .iter()
        .take(NAMED_TRAITS)
        .map(|(style, id)| {
            resolver
                .resolve(LookupKind::Trait, id)
                .map(|name| format!("{} {}", name, style))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !named.is_empty() {
        return Ok(named.join(" "));
    }

    unique.sort_unstable();
    let joined = unique.join(" ");
    if joined.is_empty() {
        Ok(BUILT_DIFFERENT.to_string())
    } else {
        Ok(joined)
    }
}

/// Display name of the record's primary augment, or "" when none was chosen.
pub fn augment_name<R: Resolver + ?Sized>(
    record: &ParticipantRecord,
    resolver: &R,
) -> Result<String, LookupError> {
    let Some(id) = record.primary_augment() else {
        return Ok(String::new());
    };
    let id = id.strip_suffix(AUGMENT_RANK_SUFFIX).unwrap_or(id);
    resolver
        .resolve(LookupKind::Augment, id)
        .map(str::to_string)
}
