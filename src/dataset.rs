//! Everything about the synthetic voyage records: the cruise lines, their fleets, the ports of call and the
//! seeded generator that draws the mock dataset.

use crate::*;   // To use everything from the crate
use rand::{Rng, SeedableRng};
use std::{fmt, str::FromStr};

// Constants
//----------------------------------------------------
/// Number of records the dashboard generates when nothing else is requested
pub const DEFAULT_NUM_ENTRIES: usize = 150;
/// Seed of the random source, fixed so the demo numbers are stable between runs
pub const DEFAULT_SEED: u64 = 42;
/// Warm-up time in minutes considered optimal for every ship
pub const OPTIMAL_WARMUP_MINUTES: u32 = 15;

/// Probability weights of Busy and Normal port status, in that order
const PORT_STATUS_WEIGHTS: [f64; 2] = [0.4, 0.6];
/// Fuel price points in USD per metric ton
const FUEL_COST_PER_TON: [u32; 10] = [650, 670, 700, 660, 680, 720, 640, 690, 710, 655];
/// Possible engine warm-up times in minutes
const WARMUP_MINUTES: [u32; 8] = [10, 12, 15, 18, 20, 22, 25, 28];
const WARMUP_WEIGHTS: [f64; 8] = [0.1, 0.1, 0.5, 0.1, 0.1, 0.05, 0.03, 0.02];
/// Fuel used per voyage in metric tons, lower bound inclusive and upper bound exclusive
const FUEL_USED_MIN: f64 = 5.0;
const FUEL_USED_MAX: f64 = 20.0;
/// A busy port delays the sailing when a uniform draw is above this
const SAILING_DELAY_THRESHOLD: f64 = 0.3;


// Structs and enums
//----------------------------------------------------
/// Cruise line operating the ship
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subsidiary {
    Ncl,
    Oceania,
    RegentSevenSeas,
}

impl Subsidiary {
    /// All subsidiaries in the order the generator draws from
    pub const ALL: [Subsidiary; 3] = [Subsidiary::Ncl, Subsidiary::Oceania, Subsidiary::RegentSevenSeas];

    /// Display name as shown on the dashboard
    pub fn name(&self) -> &'static str {
        match self {
            Subsidiary::Ncl => "NCL",
            Subsidiary::Oceania => "Oceania",
            Subsidiary::RegentSevenSeas => "Regent Seven Seas",
        }
    }

    /// Ships sailing for this subsidiary
    pub fn fleet(&self) -> &'static [&'static str] {
        match self {
            Subsidiary::Ncl => &["Norwegian Escape", "Norwegian Joy", "Norwegian Getaway", "Norwegian Pearl"],
            Subsidiary::Oceania => &["Marina", "Riviera", "Sirena", "Nautica"],
            Subsidiary::RegentSevenSeas => &["Seven Seas Splendor", "Seven Seas Navigator", "Seven Seas Mariner"],
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Subsidiary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Subsidiary {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Subsidiary> {
        Subsidiary::ALL
            .iter()
            .find(|subsidiary| subsidiary.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| AnalyticsError::InvalidArgument(format!("Unknown subsidiary: '{}'", s)))
    }
}

/// Country of the port the voyage departs from. Every country has exactly one port in the dataset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PortCountry {
    Italy,
    Spain,
    Greece,
    France,
    Portugal,
    Uk,
    Germany,
    Norway,
    Croatia,
    Netherlands,
}

impl PortCountry {
    /// All countries in the order the generator draws from
    pub const ALL: [PortCountry; 10] = [
        PortCountry::Italy,
        PortCountry::Spain,
        PortCountry::Greece,
        PortCountry::France,
        PortCountry::Portugal,
        PortCountry::Uk,
        PortCountry::Germany,
        PortCountry::Norway,
        PortCountry::Croatia,
        PortCountry::Netherlands,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PortCountry::Italy => "Italy",
            PortCountry::Spain => "Spain",
            PortCountry::Greece => "Greece",
            PortCountry::France => "France",
            PortCountry::Portugal => "Portugal",
            PortCountry::Uk => "UK",
            PortCountry::Germany => "Germany",
            PortCountry::Norway => "Norway",
            PortCountry::Croatia => "Croatia",
            PortCountry::Netherlands => "Netherlands",
        }
    }

    /// The one port used for this country
    pub fn port_name(&self) -> &'static str {
        match self {
            PortCountry::Italy => "Port of Naples",
            PortCountry::Spain => "Port of Barcelona",
            PortCountry::Greece => "Port of Piraeus",
            PortCountry::France => "Port of Marseille",
            PortCountry::Portugal => "Port of Lisbon",
            PortCountry::Uk => "Port of Southampton",
            PortCountry::Germany => "Port of Hamburg",
            PortCountry::Norway => "Port of Oslo",
            PortCountry::Croatia => "Port of Dubrovnik",
            PortCountry::Netherlands => "Port of Rotterdam",
        }
    }
}

impl fmt::Display for PortCountry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Traffic at the port when the ship leaves
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PortStatus {
    Busy,
    Normal,
}

impl PortStatus {
    pub fn name(&self) -> &'static str {
        match self {
            PortStatus::Busy => "Busy",
            PortStatus::Normal => "Normal",
        }
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One voyage departure as generated, before any derived metrics are attached.
/// Records are never mutated after generation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Record {
    pub subsidiary: Subsidiary,
    /// Always one of subsidiary.fleet()
    pub ship_name: &'static str,
    pub port_country: PortCountry,
    /// Always port_country.port_name()
    pub port_name: &'static str,
    pub port_status: PortStatus,
    /// Fuel used in metric tons, rounded to one decimal
    pub fuel_used_metric_tons: f64,
    /// Fuel price in USD per metric ton
    pub fuel_cost_per_ton: u32,
    pub engine_warmup_minutes: u32,
    pub optimal_warmup_minutes: u32,
    /// Only ever true when port_status is Busy
    pub sailing_delay: bool,
}

impl Record {
    /// Fuel used as a typed mass
    pub fn fuel_used(&self) -> uom::si::f64::Mass {
        uom::si::f64::Mass::new::<uom::si::mass::ton>(self.fuel_used_metric_tons)
    }
}


// Functions
//----------------------------------------------------
/// Generates num_entries synthetic voyage records from a random source seeded with seed.
/// The same num_entries and seed always give the same records.
///
/// Draws happen in a fixed order for every record:
/// subsidiary, ship, country, port status, fuel used, fuel cost, warm-up minutes and finally the sailing delay
/// coin flip, which is only drawn when the port is busy.
/// # Example:
/// ```
/// let records = cruise_fuel_analytics::generate(150, 42).unwrap();
/// assert_eq!(records.len(), 150);
/// ```
pub fn generate(num_entries: usize, seed: u64) -> Result<Vec<Record>> {
    // Validate that at least one record is requested
    if num_entries == 0 {
        return Err(AnalyticsError::InvalidArgument("Number of records must be a positive integer".to_string()));
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    // Set up the distributions once, they are reused for every record
    let subsidiary_dist = Categorical::uniform(&Subsidiary::ALL)?;
    let fleet_dists = [
        Categorical::uniform(Subsidiary::Ncl.fleet())?,
        Categorical::uniform(Subsidiary::Oceania.fleet())?,
        Categorical::uniform(Subsidiary::RegentSevenSeas.fleet())?,
    ];
    let country_dist = Categorical::uniform(&PortCountry::ALL)?;
    let port_status_dist = Categorical::new(&[PortStatus::Busy, PortStatus::Normal], &PORT_STATUS_WEIGHTS)?;
    let fuel_cost_dist = Categorical::uniform(&FUEL_COST_PER_TON)?;
    let warmup_dist = Categorical::new(&WARMUP_MINUTES, &WARMUP_WEIGHTS)?;

    let mut records: Vec<Record> = Vec::with_capacity(num_entries);
    for _ in 0..num_entries {
        let subsidiary = subsidiary_dist.sample(&mut rng);
        let ship_name = fleet_dists[subsidiary.index()].sample(&mut rng);
        let port_country = country_dist.sample(&mut rng);
        let port_status = port_status_dist.sample(&mut rng);
        let fuel_used: f64 = rng.random_range(FUEL_USED_MIN..FUEL_USED_MAX);
        let fuel_cost_per_ton = fuel_cost_dist.sample(&mut rng);
        let engine_warmup_minutes = warmup_dist.sample(&mut rng);
        // Coin is only flipped for busy ports, a normal port never delays the sailing
        let sailing_delay = match port_status {
            PortStatus::Busy => rng.random::<f64>() > SAILING_DELAY_THRESHOLD,
            PortStatus::Normal => false,
        };

        records.push(Record {
            subsidiary,
            ship_name,
            port_country,
            port_name: port_country.port_name(),
            port_status,
            fuel_used_metric_tons: round_to_one_decimal(fuel_used),
            fuel_cost_per_ton,
            engine_warmup_minutes,
            optimal_warmup_minutes: OPTIMAL_WARMUP_MINUTES,
            sailing_delay,
        });
    }

    tracing::debug!(num_entries, seed, "generated synthetic voyage records");
    return Ok(records);
}

/// Rounds to one decimal place, e.g. 12.345 -> 12.3
fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
