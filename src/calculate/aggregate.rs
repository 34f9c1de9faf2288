//! Single-pass aggregation of participant records into summary tables.

use std::collections::HashSet;

use thiserror::Error;

use crate::calculate::classify::classify;
use crate::lookup::{LookupError, LookupKind, Resolver};
use crate::models::{ParticipantRecord, SummaryTables};

/// Errors that abort an aggregation pass.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Record {index} has placement {placement}, expected 1-8")]
    InvalidPlacement { index: usize, placement: u32 },
}

/// Owns the tables while a pass is in progress.
///
/// Nothing is observable until [`TableBuilder::finish`] hands the tables
/// off; a failed pass drops the builder along with its partial state.
pub struct TableBuilder<'a, R: Resolver + ?Sized> {
    resolver: &'a R,
    tables: SummaryTables,
    records: usize,
}

impl<'a, R: Resolver + ?Sized> TableBuilder<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Self {
            resolver,
            tables: SummaryTables::default(),
            records: 0,
        }
    }

    /// Fold one record into every table.
    pub fn ingest(&mut self, record: &ParticipantRecord) -> Result<(), AggregateError> {
        let index = self.records;
        let placement = record.placement;
        if !(1..=8).contains(&placement) {
            return Err(AggregateError::InvalidPlacement { index, placement });
        }

        let resolver = self.resolver;
        let (composition, augment) = classify(record, resolver)?;

        // Resolve everything before touching the tables so a lookup miss
        // leaves them consistent.
        let mut units = Vec::with_capacity(record.units.len());
        for unit in &record.units {
            let name = resolver.resolve(LookupKind::Unit, &unit.character_id)?;
            let items = unit
                .item_names
                .iter()
                .map(|id| resolver.resolve(LookupKind::Item, id))
                .collect::<Result<Vec<_>, _>>()?;
            units.push((name, items));
        }

        self.tables
            .damage_rounds
            .entry(composition.clone())
            .or_default()
            .entry(record.last_round)
            .or_default()
            .push(record.total_damage_to_players);

        self.tables
            .compositions
            .entry(composition.clone())
            .or_default()
            .entry(augment)
            .or_default()
            .record(placement);

        // A unit fielded twice counts once per record; its items count per copy.
        let mut counted = HashSet::with_capacity(units.len());
        for (unit, items) in units {
            if counted.insert(unit) {
                self.tables
                    .unit_compositions
                    .entry(unit.to_string())
                    .or_default()
                    .entry(composition.clone())
                    .or_default()
                    .record(placement);
            }

            let unit_items = self.tables.unit_items.entry(unit.to_string()).or_default();
            for item in items {
                unit_items.entry(item.to_string()).or_default().record(placement);
            }
        }

        self.records += 1;
        Ok(())
    }

    /// Hand off the completed tables.
    pub fn finish(self) -> SummaryTables {
        self.tables
    }
}

/// Build all four summary tables from a full record set.
pub fn aggregate<'r, R, I>(records: I, resolver: &R) -> Result<SummaryTables, AggregateError>
where
    R: Resolver + ?Sized,
    I: IntoIterator<Item = &'r ParticipantRecord>,
{
    let mut builder = TableBuilder::new(resolver);
    for record in records {
        builder.ingest(record)?;
    }
    Ok(builder.finish())
}
