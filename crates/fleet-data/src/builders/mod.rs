//! Fluent builder APIs for FleetLogix scenarios.
//!
//! The [`ScenarioBuilder`] wraps a [`SeedConfig`](crate::config::SeedConfig)
//! and drives the generators, the seeder and the consistency audit.

mod scenario;

pub use scenario::{ScenarioBuilder, ScenarioMetrics, ScenarioResult};
