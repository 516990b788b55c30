//! Error types for dataset generation.

use thiserror::Error;

/// Failures raised before or during in-memory generation.
///
/// None of these can occur after storage has been touched: generation always
/// completes before the seeder opens its transaction.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Weights for {name} sum to {sum}, expected 1.0")]
    WeightsDoNotSumToOne { name: &'static str, sum: f64 },

    #[error("Invalid weights for {name}: {source}")]
    InvalidWeights {
        name: &'static str,
        #[source]
        source: rand::distributions::WeightedError,
    },

    #[error(
        "Cannot reconcile {units} units to {target}: reachable totals are {floor}..={ceiling}"
    )]
    Unreconcilable {
        units: usize,
        target: usize,
        floor: usize,
        ceiling: usize,
    },

    #[error("Unit {index} starts at {count}, outside bounds {min}..={max}")]
    UnitOutOfBounds {
        index: usize,
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("{table} row {id} not found")]
    UnknownReference { table: &'static str, id: i32 },

    #[error("{table} ids are not dense: expected {expected}, found {found}")]
    NonDenseIds {
        table: &'static str,
        expected: i32,
        found: i32,
    },

    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error("Time component out of range: {0}")]
    Time(#[from] time::error::ComponentRange),
}
