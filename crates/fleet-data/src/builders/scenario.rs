//! Fluent builder for generating and seeding FleetLogix datasets.

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::PgPool;
use time::{Date, PrimitiveDateTime};
use tracing::info;

use fleetlogix::consistency::{ConsistencyValidator, ValidationReport, ValidationWindow};
use fleetlogix::database::Database;
use fleetlogix::models::{Table, VehicleType};

use crate::config::{FleetAllocation, OperationalWindow, SeedConfig};
use crate::dataset::Dataset;
use crate::db::{SeedError, Seeder};
use crate::errors::GenerationError;
use crate::generators::{
    DeliveryGenerator, DriverGenConfig, DriverGenerator, MaintenanceGenConfig,
    MaintenanceGenerator, RouteGenerator, TripGenConfig, TripGenerator, VehicleGenConfig,
    VehicleGenerator,
};

/// Result of building (and possibly seeding) a scenario.
#[derive(Debug)]
pub struct ScenarioResult {
    pub dataset: Dataset,
    /// Timings and counts (populated if metrics tracking enabled).
    pub metrics: Option<ScenarioMetrics>,
    /// Post-load audit, present after `build` with validation enabled.
    pub report: Option<ValidationReport>,
}

/// Performance metrics from scenario generation.
#[derive(Debug, Clone)]
pub struct ScenarioMetrics {
    /// Time spent generating data (milliseconds).
    pub generation_time_ms: u64,
    /// Time spent seeding database (milliseconds, 0 if build_data used).
    pub seeding_time_ms: u64,
    /// Time spent running the consistency checks (milliseconds).
    pub validation_time_ms: u64,
    /// Rows generated per table, in load order.
    pub row_counts: Vec<(Table, usize)>,
    pub total_rows: usize,
}

/// Builder for complete FleetLogix datasets.
///
/// # Example
///
/// ```rust,ignore
/// let result = ScenarioBuilder::fleetlogix()
///     .with_seed(7)
///     .with_trips(20_000)
///     .with_deliveries(80_000)
///     .with_metrics(true)
///     .build(&pool)
///     .await?;
/// ```
pub struct ScenarioBuilder {
    config: SeedConfig,
    track_metrics: bool,
    validate: bool,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBuilder {
    /// Creates a builder with the full FleetLogix volumes.
    pub fn new() -> Self {
        Self::from_config(SeedConfig::default())
    }

    pub fn from_config(config: SeedConfig) -> Self {
        Self {
            config,
            track_metrics: false,
            validate: true,
        }
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Replaces the whole fleet composition.
    pub fn with_fleet_mix(mut self, mix: Vec<FleetAllocation>) -> Self {
        self.config.fleet_mix = mix;
        self
    }

    /// Sets the number of vehicles of one class, adding the class if absent.
    pub fn with_vehicles(mut self, vehicle_type: VehicleType, count: usize) -> Self {
        match self
            .config
            .fleet_mix
            .iter_mut()
            .find(|a| a.vehicle_type == vehicle_type)
        {
            Some(allocation) => allocation.count = count,
            None => self
                .config
                .fleet_mix
                .push(FleetAllocation::new(vehicle_type, count)),
        }
        self
    }

    pub fn with_drivers(mut self, count: usize) -> Self {
        self.config.driver_count = count;
        self
    }

    pub fn with_routes(mut self, count: usize) -> Self {
        self.config.route_count = count;
        self
    }

    pub fn with_trips(mut self, count: usize) -> Self {
        self.config.trip_count = count;
        self
    }

    /// Sets the exact number of deliveries across all trips.
    pub fn with_deliveries(mut self, target: usize) -> Self {
        self.config.delivery_target = target;
        self
    }

    /// Sets the exact number of maintenance records across all vehicles.
    pub fn with_maintenance(mut self, target: usize) -> Self {
        self.config.maintenance_target = target;
        self
    }

    pub fn with_window(mut self, start: PrimitiveDateTime, end: PrimitiveDateTime) -> Self {
        self.config.window = OperationalWindow::new(start, end);
        self
    }

    /// Sets the "today" that acquisition, hire and licence dates are relative to.
    pub fn with_reference_date(mut self, date: Date) -> Self {
        self.config.reference_date = date;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    /// Runs the consistency audit after loading (on by default).
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    /// Generates all six tables from an explicit random source.
    ///
    /// Tables are produced in load order; the order of draws is part of the
    /// output, so the same seed always yields the same dataset.
    pub fn generate(&self, rng: &mut StdRng) -> Result<Dataset, GenerationError> {
        self.config.validate()?;
        let config = &self.config;

        info!("Generating vehicles...");
        let vehicles = VehicleGenerator::with_config(VehicleGenConfig {
            fleet_mix: config.fleet_mix.clone(),
            reference_date: config.reference_date,
            ..Default::default()
        })
        .generate_batch(rng)?;

        info!("Generating drivers...");
        let drivers = DriverGenerator::with_config(DriverGenConfig {
            reference_date: config.reference_date,
            ..Default::default()
        })
        .generate_batch(config.driver_count, rng)?;

        info!("Generating routes...");
        let routes = RouteGenerator::new().generate_batch(config.route_count, rng)?;

        info!("Generating trips...");
        let trips = TripGenerator::with_config(TripGenConfig {
            window: config.window,
            ..Default::default()
        })
        .generate_batch(config.trip_count, &vehicles, &drivers, &routes, rng)?;

        info!("Generating deliveries...");
        let deliveries =
            DeliveryGenerator::new().generate_batch(&trips, config.delivery_target, rng)?;

        info!("Generating maintenance...");
        let maintenance = MaintenanceGenerator::with_config(MaintenanceGenConfig {
            window: config.window,
            ..Default::default()
        })
        .generate_batch(&vehicles, &trips, config.maintenance_target, rng)?;

        Ok(Dataset {
            vehicles,
            drivers,
            routes,
            trips,
            deliveries,
            maintenance,
        })
    }

    /// Generates the dataset in memory without touching the database.
    pub fn build_data(&self) -> Result<ScenarioResult, GenerationError> {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let dataset = self.generate(&mut rng)?;

        let metrics = self.track_metrics.then(|| ScenarioMetrics {
            generation_time_ms: start.elapsed().as_millis() as u64,
            seeding_time_ms: 0, // Set by build() if database seeding occurs
            validation_time_ms: 0,
            row_counts: Table::LOAD_ORDER
                .iter()
                .map(|t| (*t, dataset.row_count(*t)))
                .collect(),
            total_rows: dataset.total_rows(),
        });

        Ok(ScenarioResult {
            dataset,
            metrics,
            report: None,
        })
    }

    /// Verifies the schema, generates, loads and (optionally) audits the dataset.
    pub async fn build(&self, pool: &PgPool) -> Result<ScenarioResult, SeedError> {
        let seeder = Seeder::new(pool.clone()).with_batch_size(self.config.batch_size);
        seeder.verify_schema().await?;

        let mut result = self.build_data()?;

        let seed_start = Instant::now();
        seeder.load(&result.dataset).await?;
        let seeding_time_ms = seed_start.elapsed().as_millis() as u64;

        if self.validate {
            let validate_start = Instant::now();
            let window = ValidationWindow {
                start: self.config.window.start,
                end: self.config.window.end,
            };
            let report = ConsistencyValidator::new(Database::new(pool.clone()))
                .run(&window)
                .await?;
            result.report = Some(report);

            if let Some(metrics) = result.metrics.as_mut() {
                metrics.validation_time_ms = validate_start.elapsed().as_millis() as u64;
            }
        }

        if let Some(metrics) = result.metrics.as_mut() {
            metrics.seeding_time_ms = seeding_time_ms;
        }

        Ok(result)
    }
}

/// Preset scenarios.
impl ScenarioBuilder {
    /// The full FleetLogix volume: 200 vehicles, 400 drivers, 50 routes,
    /// 100,000 trips, 400,000 deliveries and 5,000 maintenance records.
    pub fn fleetlogix() -> Self {
        Self::new()
    }

    /// A tiny dataset: one vehicle per class, 2 drivers, 2 routes, 10 trips,
    /// 40 deliveries and 2 maintenance records.
    pub fn smoke_test() -> Self {
        Self::new()
            .with_fleet_mix(
                VehicleType::ALL
                    .iter()
                    .map(|t| FleetAllocation::new(*t, 1))
                    .collect(),
            )
            .with_drivers(2)
            .with_routes(2)
            .with_trips(10)
            .with_deliveries(40)
            .with_maintenance(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke_test_counts() {
        let result = ScenarioBuilder::smoke_test()
            .with_metrics(true)
            .build_data()
            .unwrap();
        let data = &result.dataset;

        assert_eq!(data.vehicles.len(), 4);
        assert_eq!(data.drivers.len(), 2);
        assert_eq!(data.routes.len(), 2);
        assert_eq!(data.trips.len(), 10);
        assert_eq!(data.deliveries.len(), 40);
        assert_eq!(data.maintenance.len(), 2);

        let metrics = result.metrics.unwrap();
        assert_eq!(metrics.total_rows, 4 + 2 + 2 + 10 + 40 + 2);
        assert_eq!(metrics.row_counts[0], (Table::Vehicles, 4));
        assert_eq!(metrics.seeding_time_ms, 0);
    }

    #[test]
    fn test_with_vehicles_updates_or_adds() {
        let builder = ScenarioBuilder::smoke_test()
            .with_vehicles(VehicleType::Van, 3)
            .with_fleet_mix(vec![FleetAllocation::new(VehicleType::Van, 1)])
            .with_vehicles(VehicleType::Motorcycle, 2);

        assert_eq!(builder.config().vehicle_count(), 3);
        assert_eq!(builder.config().fleet_mix.len(), 2);
    }

    #[test]
    fn test_invalid_config_fails_before_generation() {
        let result = ScenarioBuilder::smoke_test().with_deliveries(100).build_data();
        assert!(matches!(result, Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn test_metrics_off_by_default() {
        let result = ScenarioBuilder::smoke_test().build_data().unwrap();
        assert!(result.metrics.is_none());
        assert!(result.report.is_none());
    }
}
