//! Synthetic data generation for FleetLogix.
//!
//! Generates a referentially consistent fleet dataset (vehicles, drivers,
//! routes, trips, deliveries and maintenance) from a single seed, loads it
//! into Postgres and audits the result.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fleet_data::prelude::*;
//!
//! let result = ScenarioBuilder::fleetlogix()
//!     .with_seed(42)
//!     .with_metrics(true)
//!     .build(&pool)
//!     .await?;
//!
//! assert!(result.report.unwrap().passed());
//! ```

pub mod builders;
pub mod config;
pub mod dataset;
pub mod db;
pub mod demand;
pub mod distributions;
pub mod errors;
pub mod generators;
pub mod reconcile;

pub use errors::GenerationError;

// Re-export core types from the fleetlogix crate
pub use fleetlogix::models::{
    DeliveryStatus, DriverStatus, FuelType, MaintenanceType, Table, TripStatus, VehicleStatus,
    VehicleType,
};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{ScenarioBuilder, ScenarioMetrics, ScenarioResult};
    pub use crate::config::{FleetAllocation, OperationalWindow, SeedConfig};
    pub use crate::dataset::Dataset;
    pub use crate::db::{SeedError, Seeder};
    pub use crate::demand::HourlyDemand;
    pub use crate::errors::GenerationError;
    pub use crate::generators::{
        DeliveryGenerator, DriverGenerator, MaintenanceGenerator, RouteGenerator, TripGenerator,
        VehicleGenerator,
    };
    pub use crate::reconcile::reconcile;
    pub use crate::{
        DeliveryStatus, DriverStatus, FuelType, MaintenanceType, Table, TripStatus, VehicleStatus,
        VehicleType,
    };
}
