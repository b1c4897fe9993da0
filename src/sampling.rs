//! Discrete distribution sampling for the synthetic data generator.
//! Every draw consumes exactly one uniform f64 from the random source, so the order of draws in the
//! generator fully determines the dataset for a given seed.

use crate::*;   // To use everything from the crate
use rand::Rng;

/// A categorical (discrete) distribution over a fixed set of values.
/// Sampling is a cumulative-weight search over a single uniform draw.
#[derive(Debug, Clone)]
pub struct Categorical<T> {
    values: Vec<T>,
    /// Running sum of the weights, same length as values
    cumulative: Vec<f64>,
}

impl<T: Copy> Categorical<T> {
    /// Creates a distribution where values[i] is drawn with probability weights[i] / sum(weights).
    /// Weights do not need to sum to 1.
    pub fn new(values: &[T], weights: &[f64]) -> Result<Categorical<T>> {
        if values.is_empty() {
            return Err(AnalyticsError::InvalidArgument("Categorical distribution needs at least one value".to_string()));
        }
        if values.len() != weights.len() {
            return Err(AnalyticsError::InvalidArgument(format!(
                "Got {} values but {} weights", values.len(), weights.len()
            )));
        }

        let mut cumulative: Vec<f64> = Vec::with_capacity(weights.len());
        let mut total: f64 = 0.0;
        for weight in weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(AnalyticsError::InvalidArgument(format!("Invalid weight: {}", weight)));
            }
            total += weight;
            cumulative.push(total);
        }
        if total <= 0.0 {
            return Err(AnalyticsError::InvalidArgument("Weights must sum to a positive number".to_string()));
        }

        Ok(Categorical {
            values: values.to_vec(),
            cumulative,
        })
    }

    /// Creates a distribution where every value is equally likely
    pub fn uniform(values: &[T]) -> Result<Categorical<T>> {
        let weights = vec![1.0; values.len()];
        Categorical::new(values, &weights)
    }

    /// Draws one value
    pub fn sample<R: Rng>(&self, rng: &mut R) -> T {
        let total = self.cumulative[self.cumulative.len() - 1];
        let draw: f64 = rng.random::<f64>() * total;

        // First index whose cumulative weight is strictly above the draw.
        // Zero weight entries share their cumulative value with the previous entry and are never picked.
        let index = self.cumulative.partition_point(|&c| c <= draw);
        self.values[index.min(self.values.len() - 1)]
    }
}
