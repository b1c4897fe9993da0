//! Error type shared by the generator, the metrics pipeline and the dashboard writers.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// A caller supplied value is out of range, e.g. a record count of zero
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Grouping requested on a column that is not ship_name, subsidiary or port_country
    #[error("Unknown group key: '{0}'. Must be one of ship_name, subsidiary, port_country")]
    UnknownGroupKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
