//! Subsidiary and ship selection for the dashboard.
//! A ship selection, when one is made, replaces the subsidiary selection instead of narrowing it.

use crate::*;   // To use everything from the crate
use std::collections::BTreeSet;

/// Current filter selection. Empty sets select everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    /// Subsidiary display names, e.g. "Regent Seven Seas"
    pub subsidiaries: BTreeSet<String>,
    pub ships: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new<S: Into<String>>(subsidiaries: impl IntoIterator<Item = S>, ships: impl IntoIterator<Item = S>) -> FilterSelection {
        FilterSelection {
            subsidiaries: subsidiaries.into_iter().map(Into::into).collect(),
            ships: ships.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a selection from user input. Subsidiary names are matched case-insensitively and stored in
    /// their display spelling, an unknown subsidiary is an InvalidArgument error.
    pub fn parse<S: AsRef<str>>(subsidiaries: &[S], ships: &[S]) -> Result<FilterSelection> {
        let subsidiaries = subsidiaries
            .iter()
            .map(|name| name.as_ref().parse::<Subsidiary>().map(|s| s.name()))
            .collect::<Result<Vec<&str>>>()?;
        let ships = ships.iter().map(|name| name.as_ref().trim());
        Ok(FilterSelection::new(subsidiaries, ships))
    }

    pub fn is_empty(&self) -> bool {
        self.subsidiaries.is_empty() && self.ships.is_empty()
    }
}

/// Records of the given subsidiaries, in their original order. An empty set returns every record.
pub fn filter_by_subsidiary(records: &[AnalyzedRecord], subsidiaries: &BTreeSet<String>) -> Vec<AnalyzedRecord> {
    if subsidiaries.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| subsidiaries.contains(r.record.subsidiary.name()))
        .copied()
        .collect()
}

/// Records of the given ships, in their original order. An empty set returns every record.
pub fn filter_by_ship(records: &[AnalyzedRecord], ships: &BTreeSet<String>) -> Vec<AnalyzedRecord> {
    if ships.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| ships.contains(r.record.ship_name))
        .copied()
        .collect()
}

/// Applies a selection to the records.
/// If any ships are selected only the ship filter is applied and the subsidiary selection is ignored,
/// otherwise the subsidiary filter is applied.
pub fn apply_filters(records: &[AnalyzedRecord], selection: &FilterSelection) -> Vec<AnalyzedRecord> {
    let filtered = if !selection.ships.is_empty() {
        filter_by_ship(records, &selection.ships)
    } else {
        filter_by_subsidiary(records, &selection.subsidiaries)
    };

    if !selection.ships.is_empty() && !selection.subsidiaries.is_empty() {
        let outside = ships_outside_subsidiaries(records, selection);
        if !outside.is_empty() {
            tracing::warn!(?outside, subsidiaries = ?selection.subsidiaries, "selected ships are not offered for the selected subsidiaries, the ship selection is applied anyway");
        }
    }

    if filtered.is_empty() && !records.is_empty() {
        tracing::warn!(?selection, "filter selection matches no voyages");
    }
    return filtered;
}

/// Ships offered for selection: the distinct ships of the selected subsidiaries in order of first appearance,
/// or of all records when no subsidiary is selected
pub fn available_ships(records: &[AnalyzedRecord], subsidiaries: &BTreeSet<String>) -> Vec<&'static str> {
    let mut ships: Vec<&'static str> = Vec::new();
    for record in filter_by_subsidiary(records, subsidiaries) {
        if !ships.contains(&record.record.ship_name) {
            ships.push(record.record.ship_name);
        }
    }
    return ships;
}

/// Selected ships that are not among the available ships of the selected subsidiaries
pub fn ships_outside_subsidiaries(records: &[AnalyzedRecord], selection: &FilterSelection) -> Vec<String> {
    let offered = available_ships(records, &selection.subsidiaries);
    selection
        .ships
        .iter()
        .filter(|ship| !offered.contains(&ship.as_str()))
        .cloned()
        .collect()
}
