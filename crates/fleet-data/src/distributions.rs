//! Sampling helpers shared by the generators.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use time::{Date, Duration};

use crate::errors::GenerationError;

/// Tolerance when checking that categorical weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// A fixed categorical distribution over a small set of outcomes.
#[derive(Debug, Clone)]
pub struct Categorical<T> {
    outcomes: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> Categorical<T> {
    /// Builds the distribution, rejecting weights that do not sum to 1.0.
    pub fn new(name: &'static str, table: &[(T, f64)]) -> Result<Self, GenerationError> {
        let sum: f64 = table.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(GenerationError::WeightsDoNotSumToOne { name, sum });
        }

        let index = WeightedIndex::new(table.iter().map(|(_, w)| *w))
            .map_err(|source| GenerationError::InvalidWeights { name, source })?;

        Ok(Self {
            outcomes: table.iter().map(|(o, _)| *o).collect(),
            index,
        })
    }

    pub fn sample(&self, rng: &mut impl Rng) -> T {
        self.outcomes[self.index.sample(rng)]
    }
}

/// Rounds to two decimals, the precision of every stored decimal column.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Draws a date uniformly from `from..=to`.
pub fn uniform_date(from: Date, to: Date, rng: &mut impl Rng) -> Date {
    let span = (to - from).whole_days();
    if span <= 0 {
        return from;
    }
    from + Duration::days(rng.gen_range(0..=span))
}

/// Duration of a whole number of (365-day) years.
pub fn years(n: i64) -> Duration {
    Duration::days(365 * n)
}

/// Rejects a `(lo, hi)` band that `gen_range` cannot sample from.
pub fn check_band<T>(name: &str, (lo, hi): (T, T)) -> Result<(), GenerationError>
where
    T: PartialOrd + std::fmt::Display,
{
    // Written so that NaN bounds fail too.
    if lo <= hi {
        Ok(())
    } else {
        Err(GenerationError::InvalidConfig(format!(
            "{name} band {lo}..={hi} is empty"
        )))
    }
}
