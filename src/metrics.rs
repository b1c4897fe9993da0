//! Warm-up efficiency metrics for the voyage records.
//! Derives the warm-up status, extra fuel wasted and financial loss of every voyage and aggregates them into the
//! totals and grouped tables the dashboard charts are drawn from.
//!
//! Every function here is pure: same input, same output, no state kept between calls.
//! Grouped tables list groups in ascending order of the group value, and within a group Optimal comes before
//! Non-Optimal.

use crate::*;   // To use everything from the crate
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

// Structs and enums
//----------------------------------------------------
/// Whether the engine warm-up stayed within the optimal time
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WarmupStatus {
    /// Warm-up of 15 minutes or less
    Optimal,
    /// Warm-up longer than 15 minutes
    NonOptimal,
}

impl WarmupStatus {
    pub const ALL: [WarmupStatus; 2] = [WarmupStatus::Optimal, WarmupStatus::NonOptimal];

    /// Classifies a warm-up time in minutes
    pub fn classify(engine_warmup_minutes: u32) -> WarmupStatus {
        if engine_warmup_minutes <= OPTIMAL_WARMUP_MINUTES {
            WarmupStatus::Optimal
        } else {
            WarmupStatus::NonOptimal
        }
    }

    /// Short name, "Optimal" or "Non-Optimal"
    pub fn name(&self) -> &'static str {
        match self {
            WarmupStatus::Optimal => "Optimal",
            WarmupStatus::NonOptimal => "Non-Optimal",
        }
    }

    /// Label used in charts and exported tables
    pub fn label(&self) -> &'static str {
        match self {
            WarmupStatus::Optimal => "Optimal (≤15 mins)",
            WarmupStatus::NonOptimal => "Non-Optimal (>15 mins)",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for WarmupStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A voyage record with its derived warm-up metrics attached
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AnalyzedRecord {
    pub record: Record,
    pub warmup_status: WarmupStatus,
    /// Extra fuel burnt in metric tons because the warm-up took longer than optimal. Never negative.
    pub extra_fuel_wasted: f64,
    /// Cost of the extra fuel in USD. Never negative.
    pub financial_loss: f64,
}

impl AnalyzedRecord {
    /// Derives the warm-up metrics of a single record
    pub fn from_record(record: Record) -> AnalyzedRecord {
        let warmup_status = WarmupStatus::classify(record.engine_warmup_minutes);

        // Every minute above optimal burns one percent of the voyage fuel
        let extra_fuel_wasted = match warmup_status {
            WarmupStatus::NonOptimal => {
                (record.engine_warmup_minutes - OPTIMAL_WARMUP_MINUTES) as f64 * (record.fuel_used_metric_tons / 100.0)
            }
            WarmupStatus::Optimal => 0.0,
        };
        let financial_loss = extra_fuel_wasted * record.fuel_cost_per_ton as f64;

        AnalyzedRecord {
            record,
            warmup_status,
            extra_fuel_wasted,
            financial_loss,
        }
    }

    /// Extra fuel wasted as a typed mass
    pub fn extra_fuel(&self) -> uom::si::f64::Mass {
        uom::si::f64::Mass::new::<uom::si::mass::ton>(self.extra_fuel_wasted)
    }
}

/// Column the grouped tables are aggregated by
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    ShipName,
    Subsidiary,
    PortCountry,
}

impl GroupKey {
    pub const ALL: [GroupKey; 3] = [GroupKey::ShipName, GroupKey::Subsidiary, GroupKey::PortCountry];

    /// Key as accepted by aggregate_warmup and aggregate_fuel
    pub fn name(&self) -> &'static str {
        match self {
            GroupKey::ShipName => "ship_name",
            GroupKey::Subsidiary => "subsidiary",
            GroupKey::PortCountry => "port_country",
        }
    }

    /// Column title used in chart titles and axes
    pub fn column_title(&self) -> &'static str {
        match self {
            GroupKey::ShipName => "Ship_Name",
            GroupKey::Subsidiary => "Subsidiary",
            GroupKey::PortCountry => "Port_Country",
        }
    }

    /// The group a record falls in
    pub fn value_of(&self, record: &AnalyzedRecord) -> &'static str {
        match self {
            GroupKey::ShipName => record.record.ship_name,
            GroupKey::Subsidiary => record.record.subsidiary.name(),
            GroupKey::PortCountry => record.record.port_country.name(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GroupKey {
    type Err = AnalyticsError;

    /// Accepts both ship_name and Ship_Name spellings
    fn from_str(s: &str) -> Result<GroupKey> {
        GroupKey::ALL
            .iter()
            .find(|key| key.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| AnalyticsError::UnknownGroupKey(s.to_string()))
    }
}

/// Percentage of voyages per warm-up status, for every group with at least one voyage
pub type WarmupTable = BTreeMap<&'static str, BTreeMap<WarmupStatus, f64>>;

/// Fuel used by the voyages of one group with one warm-up status
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FuelUsageRow {
    pub group: &'static str,
    pub warmup_status: WarmupStatus,
    /// Sum of fuel used in metric tons
    pub total_fuel_used: f64,
    /// Number of voyages summed
    pub count: usize,
}

impl FuelUsageRow {
    pub fn total_fuel(&self) -> uom::si::f64::Mass {
        uom::si::f64::Mass::new::<uom::si::mass::ton>(self.total_fuel_used)
    }
}

/// Headline numbers of the dashboard
#[derive(Debug, Copy, Clone)]
pub struct MetricsSummary {
    pub record_count: usize,
    pub non_optimal_count: usize,
    pub total_extra_fuel_wasted: uom::si::f64::Mass,
    /// USD
    pub total_financial_loss: f64,
}

impl fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "voyages: {}, non-optimal warm-ups: {}, extra fuel wasted: {:.2} t, financial loss: {:.2} USD",
            self.record_count,
            self.non_optimal_count,
            self.total_extra_fuel_wasted.get::<uom::si::mass::ton>(),
            self.total_financial_loss
        )
    }
}


// Functions
//----------------------------------------------------
/// Attaches warm-up status, extra fuel wasted and financial loss to every record, keeping the order
pub fn derive(records: &[Record]) -> Vec<AnalyzedRecord> {
    records.iter().map(|record| AnalyzedRecord::from_record(*record)).collect()
}

/// Sum of extra fuel wasted in metric tons. Zero for no records.
pub fn total_extra_fuel_wasted(records: &[AnalyzedRecord]) -> f64 {
    records.iter().map(|r| r.extra_fuel_wasted).sum()
}

/// Sum of financial loss in USD. Zero for no records.
pub fn total_financial_loss(records: &[AnalyzedRecord]) -> f64 {
    records.iter().map(|r| r.financial_loss).sum()
}

/// Collects the headline numbers
pub fn summarize(records: &[AnalyzedRecord]) -> MetricsSummary {
    MetricsSummary {
        record_count: records.len(),
        non_optimal_count: records.iter().filter(|r| r.warmup_status == WarmupStatus::NonOptimal).count(),
        total_extra_fuel_wasted: uom::si::f64::Mass::new::<uom::si::mass::ton>(total_extra_fuel_wasted(records)),
        total_financial_loss: total_financial_loss(records),
    }
}

/// Warm-up efficiency table for the group key given by name.
/// Fails with UnknownGroupKey if group_key is not ship_name, subsidiary or port_country.
pub fn aggregate_warmup(records: &[AnalyzedRecord], group_key: &str) -> Result<WarmupTable> {
    let key: GroupKey = group_key.parse()?;
    Ok(warmup_percentages(records, key))
}

/// Share of voyages in percent per warm-up status for every group.
/// Both statuses are listed for each group, so the percentages of a group add up to 100.
/// Groups without voyages are not listed.
pub fn warmup_percentages(records: &[AnalyzedRecord], key: GroupKey) -> WarmupTable {
    // Count voyages per group and status, indexed by WarmupStatus::index
    let mut counts: BTreeMap<&'static str, [usize; 2]> = BTreeMap::new();
    for record in records {
        counts.entry(key.value_of(record)).or_insert([0, 0])[record.warmup_status.index()] += 1;
    }

    let mut table = WarmupTable::new();
    for (group, status_counts) in counts {
        let group_total: usize = status_counts.iter().sum();
        if group_total == 0 {
            continue;
        }
        let shares = WarmupStatus::ALL
            .iter()
            .map(|status| (*status, 100.0 * status_counts[status.index()] as f64 / group_total as f64))
            .collect();
        table.insert(group, shares);
    }

    tracing::debug!(group_key = %key, groups = table.len(), "aggregated warm-up efficiency");
    return table;
}

/// Fuel usage table for the group key given by name.
/// Fails with UnknownGroupKey if group_key is not ship_name, subsidiary or port_country.
pub fn aggregate_fuel(records: &[AnalyzedRecord], group_key: &str) -> Result<Vec<FuelUsageRow>> {
    let key: GroupKey = group_key.parse()?;
    Ok(fuel_usage(records, key))
}

/// Total fuel used and number of voyages per group and warm-up status.
/// Only combinations with at least one voyage are listed.
pub fn fuel_usage(records: &[AnalyzedRecord], key: GroupKey) -> Vec<FuelUsageRow> {
    let mut sums: BTreeMap<(&'static str, WarmupStatus), (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = sums.entry((key.value_of(record), record.warmup_status)).or_insert((0.0, 0));
        entry.0 += record.record.fuel_used_metric_tons;
        entry.1 += 1;
    }

    let rows: Vec<FuelUsageRow> = sums
        .into_iter()
        .map(|((group, warmup_status), (total_fuel_used, count))| FuelUsageRow {
            group,
            warmup_status,
            total_fuel_used,
            count,
        })
        .collect();

    tracing::debug!(group_key = %key, rows = rows.len(), "aggregated fuel usage");
    return rows;
}


#[cfg(test)]
mod tests {
    use super::*;

    /// Record with the given ship and warm-up, everything else fixed
    fn voyage(subsidiary: Subsidiary, ship_name: &'static str, engine_warmup_minutes: u32, fuel_used_metric_tons: f64) -> Record {
        Record {
            subsidiary,
            ship_name,
            port_country: PortCountry::Norway,
            port_name: PortCountry::Norway.port_name(),
            port_status: PortStatus::Normal,
            fuel_used_metric_tons,
            fuel_cost_per_ton: 700,
            engine_warmup_minutes,
            optimal_warmup_minutes: OPTIMAL_WARMUP_MINUTES,
            sailing_delay: false,
        }
    }

    #[test]
    fn single_generated_record_matches_hand_computation() {
        let records = generate(1, DEFAULT_SEED).unwrap();
        let raw = records[0];
        assert_eq!(raw.subsidiary, Subsidiary::Oceania);
        assert_eq!(raw.ship_name, "Sirena");
        assert_eq!(raw.port_country, PortCountry::Germany);
        assert_eq!(raw.port_status, PortStatus::Normal);
        assert_eq!(raw.fuel_used_metric_tons, 5.5);
        assert_eq!(raw.fuel_cost_per_ton, 680);
        assert_eq!(raw.engine_warmup_minutes, 18);
        assert!(!raw.sailing_delay);

        // 3 minutes over optimal at 1% of 5.5 t per minute, priced at 680 USD per ton
        let analyzed = derive(&records)[0];
        assert_eq!(analyzed.record, raw);
        assert_eq!(analyzed.warmup_status, WarmupStatus::NonOptimal);
        assert!((analyzed.extra_fuel_wasted - 0.165).abs() < 1e-12);
        assert!((analyzed.financial_loss - 112.2).abs() < 1e-9);
    }

    #[test]
    fn derivation_by_hand() {
        let analyzed = AnalyzedRecord::from_record(voyage(Subsidiary::Ncl, "Norwegian Joy", 20, 10.0));
        assert_eq!(analyzed.warmup_status, WarmupStatus::NonOptimal);
        assert!((analyzed.extra_fuel_wasted - 0.5).abs() < 1e-12);
        assert!((analyzed.financial_loss - 350.0).abs() < 1e-9);
        assert!((analyzed.extra_fuel().get::<uom::si::mass::kilogram>() - 500.0).abs() < 1e-9);

        // Exactly 15 minutes is still optimal
        let analyzed = AnalyzedRecord::from_record(voyage(Subsidiary::Ncl, "Norwegian Joy", 15, 10.0));
        assert_eq!(analyzed.warmup_status, WarmupStatus::Optimal);
        assert_eq!(analyzed.extra_fuel_wasted, 0.0);
        assert_eq!(analyzed.financial_loss, 0.0);
    }

    #[test]
    fn derived_fields_hold_for_generated_dataset() {
        for analyzed in derive(&generate(500, DEFAULT_SEED).unwrap()) {
            let raw = analyzed.record;
            if raw.engine_warmup_minutes <= 15 {
                assert_eq!(analyzed.extra_fuel_wasted, 0.0);
            } else {
                assert!(analyzed.extra_fuel_wasted > 0.0);
            }
            assert!(analyzed.financial_loss >= 0.0);
            assert_eq!(analyzed.financial_loss, analyzed.extra_fuel_wasted * raw.fuel_cost_per_ton as f64);
        }
    }

    #[test]
    fn two_optimal_two_non_optimal_is_fifty_fifty() {
        let records = derive(&[
            voyage(Subsidiary::Oceania, "Marina", 10, 8.0),
            voyage(Subsidiary::Oceania, "Marina", 15, 9.0),
            voyage(Subsidiary::Oceania, "Marina", 18, 10.0),
            voyage(Subsidiary::Oceania, "Marina", 28, 11.0),
        ]);
        let table = aggregate_warmup(&records, "ship_name").unwrap();

        let mut expected = WarmupTable::new();
        expected.insert("Marina", BTreeMap::from([(WarmupStatus::Optimal, 50.0), (WarmupStatus::NonOptimal, 50.0)]));
        assert_eq!(table, expected);
    }

    #[test]
    fn group_percentages_sum_to_hundred() {
        let records = derive(&generate(150, DEFAULT_SEED).unwrap());
        for key in GroupKey::ALL {
            let table = warmup_percentages(&records, key);
            assert!(!table.is_empty());
            for (group, shares) in &table {
                let total: f64 = shares.values().sum();
                assert!((total - 100.0).abs() < 1e-9, "{} sums to {}", group, total);
            }
        }
    }

    #[test]
    fn groups_are_sorted() {
        let records = derive(&generate(150, DEFAULT_SEED).unwrap());
        let groups: Vec<&str> = warmup_percentages(&records, GroupKey::PortCountry).keys().copied().collect();
        let mut sorted = groups.clone();
        sorted.sort();
        assert_eq!(groups, sorted);
    }

    #[test]
    fn fuel_table_sums_and_counts() {
        let records = derive(&[
            voyage(Subsidiary::Ncl, "Norwegian Joy", 10, 8.0),
            voyage(Subsidiary::Ncl, "Norwegian Pearl", 12, 9.5),
            voyage(Subsidiary::Ncl, "Norwegian Joy", 25, 10.0),
            voyage(Subsidiary::Oceania, "Sirena", 22, 6.5),
        ]);
        let rows = aggregate_fuel(&records, "subsidiary").unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].group, rows[0].warmup_status, rows[0].count), ("NCL", WarmupStatus::Optimal, 2));
        assert!((rows[0].total_fuel_used - 17.5).abs() < 1e-9);
        assert_eq!((rows[1].group, rows[1].warmup_status, rows[1].count), ("NCL", WarmupStatus::NonOptimal, 1));
        assert_eq!((rows[2].group, rows[2].warmup_status, rows[2].count), ("Oceania", WarmupStatus::NonOptimal, 1));
        assert!((rows[2].total_fuel().get::<uom::si::mass::ton>() - 6.5).abs() < 1e-9);
    }

    #[test]
    fn fuel_table_covers_every_record() {
        let records = derive(&generate(150, DEFAULT_SEED).unwrap());
        let rows = fuel_usage(&records, GroupKey::ShipName);
        let count: usize = rows.iter().map(|r| r.count).sum();
        let fuel: f64 = rows.iter().map(|r| r.total_fuel_used).sum();
        let expected_fuel: f64 = records.iter().map(|r| r.record.fuel_used_metric_tons).sum();
        assert_eq!(count, 150);
        assert!((fuel - expected_fuel).abs() < 1e-6);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(total_extra_fuel_wasted(&[]), 0.0);
        assert_eq!(total_financial_loss(&[]), 0.0);
        assert!(aggregate_warmup(&[], "port_country").unwrap().is_empty());
        assert!(aggregate_fuel(&[], "port_country").unwrap().is_empty());
        let summary = summarize(&[]);
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.total_financial_loss, 0.0);
    }

    #[test]
    fn unknown_group_key_is_rejected() {
        let records = derive(&generate(10, DEFAULT_SEED).unwrap());
        assert!(matches!(aggregate_warmup(&records, "port_name"), Err(AnalyticsError::UnknownGroupKey(_))));
        assert!(matches!(aggregate_fuel(&records, ""), Err(AnalyticsError::UnknownGroupKey(_))));
    }

    #[test]
    fn group_key_accepts_column_spelling() {
        assert_eq!("Ship_Name".parse::<GroupKey>().unwrap(), GroupKey::ShipName);
        assert_eq!("port_country".parse::<GroupKey>().unwrap(), GroupKey::PortCountry);
        assert_eq!("Subsidiary".parse::<GroupKey>().unwrap(), GroupKey::Subsidiary);
    }

    #[test]
    fn summary_totals_match_sums() {
        let records = derive(&generate(150, DEFAULT_SEED).unwrap());
        let summary = summarize(&records);
        assert_eq!(summary.record_count, 150);
        assert_eq!(summary.non_optimal_count, records.iter().filter(|r| r.extra_fuel_wasted > 0.0).count());
        assert!((summary.total_extra_fuel_wasted.get::<uom::si::mass::ton>() - total_extra_fuel_wasted(&records)).abs() < 1e-9);
        assert_eq!(summary.total_financial_loss, total_financial_loss(&records));
    }
}
