//! Cruise fuel analytics generates synthetic cruise ship voyages and analyses how much fuel and money is lost
//! when engines are warmed up for longer than the optimal 15 minutes.
//!
//! The pipeline runs one way:
//! generate the voyages, derive the warm-up metrics, filter by subsidiary or ship, aggregate, render.
//! Everything up to the rendering is pure and works on an in-memory dataset that is never mutated, so the
//! same dataset can be shared read-only between any number of recomputations.
//!
//! # Example:
//! ```
//! use cruise_fuel_analytics::*;
//!
//! let records = derive(&generate(150, 42).unwrap());
//! let oceania = apply_filters(&records, &FilterSelection::new(["Oceania"], Vec::<&str>::new()));
//! let table = aggregate_warmup(&oceania, "ship_name").unwrap();
//! for shares in table.values() {
//!     let total: f64 = shares.values().sum();
//!     assert!((total - 100.0).abs() < 1e-9);
//! }
//! ```

// Internal modules
pub mod error;
pub use crate::error::*;
pub mod sampling;
pub use crate::sampling::*;
pub mod dataset;
pub use crate::dataset::*;
pub mod metrics;
pub use crate::metrics::*;
pub mod filters;
pub use crate::filters::*;
pub mod dashboard;
pub use crate::dashboard::*;


// Set up tests here
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    // The dataset is read-only after generation and can be shared between concurrent recomputations
    #[test]
    fn shared_dataset_recomputes_independently() {
        let records = Arc::new(derive(&generate(DEFAULT_NUM_ENTRIES, DEFAULT_SEED).unwrap()));
        let expected = warmup_percentages(&records, GroupKey::Subsidiary);

        let handles: Vec<_> = GroupKey::ALL
            .into_iter()
            .map(|key| {
                let records = Arc::clone(&records);
                std::thread::spawn(move || (key, warmup_percentages(&records, key), fuel_usage(&records, key)))
            })
            .collect();

        for handle in handles {
            let (key, warmup, fuel) = handle.join().unwrap();
            assert_eq!(warmup, warmup_percentages(&records, key));
            assert_eq!(fuel, fuel_usage(&records, key));
            if key == GroupKey::Subsidiary {
                assert_eq!(warmup, expected);
            }
        }
    }

    // Full pass as the dashboard runs it: filtered totals never exceed the unfiltered totals
    #[test]
    fn filtered_totals_are_bounded_by_full_totals() {
        let records = derive(&generate(DEFAULT_NUM_ENTRIES, DEFAULT_SEED).unwrap());
        let full_loss = total_financial_loss(&records);
        for subsidiary in Subsidiary::ALL {
            let selection = FilterSelection::new([subsidiary.name()], Vec::<&str>::new());
            let filtered = apply_filters(&records, &selection);
            assert!(total_financial_loss(&filtered) <= full_loss + 1e-9);
        }

        // The three subsidiaries together cover every voyage
        let by_subsidiary: f64 = Subsidiary::ALL
            .iter()
            .map(|s| total_extra_fuel_wasted(&filter_by_subsidiary(&records, &BTreeSet::from([s.name().to_string()]))))
            .sum();
        assert!((by_subsidiary - total_extra_fuel_wasted(&records)).abs() < 1e-9);
    }
}
