//! Configuration types for dataset generation.

use serde::{Deserialize, Serialize};
use time::macros::{date, datetime};
use time::{Date, Duration, PrimitiveDateTime};

use crate::errors::GenerationError;
use fleetlogix::models::VehicleType;

/// Largest insert batch accepted; keeps multi-row inserts under the bind limit.
pub const MAX_BATCH_SIZE: usize = 5000;

/// Minimum licence validity ahead of the reference date, in days.
pub const LICENSE_MIN_DAYS_AHEAD: i64 = 365;

/// Historical period over which transactional records are simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalWindow {
    /// First instant of the window (inclusive).
    pub start: PrimitiveDateTime,
    /// Last instant of the window (inclusive).
    pub end: PrimitiveDateTime,
}

impl OperationalWindow {
    /// Calendar years 2024 and 2025.
    pub const FLEETLOGIX: OperationalWindow = OperationalWindow {
        start: datetime!(2024-01-01 0:00),
        end: datetime!(2025-12-31 23:59:59),
    };

    pub fn new(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Self {
        Self { start, end }
    }

    /// Length of the window in whole seconds.
    pub fn total_seconds(&self) -> i64 {
        (self.end - self.start).whole_seconds()
    }

    pub fn start_date(&self) -> Date {
        self.start.date()
    }

    pub fn end_date(&self) -> Date {
        self.end.date()
    }

    pub fn contains(&self, instant: PrimitiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }
}

impl Default for OperationalWindow {
    fn default() -> Self {
        Self::FLEETLOGIX
    }
}

/// Number of vehicles of one class in the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetAllocation {
    pub vehicle_type: VehicleType,
    pub count: usize,
}

impl FleetAllocation {
    pub const fn new(vehicle_type: VehicleType, count: usize) -> Self {
        Self {
            vehicle_type,
            count,
        }
    }
}

/// Full configuration of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Seed for the single random generator threaded through every generator.
    pub seed: u64,

    /// Vehicles per class, allocated in this order.
    pub fleet_mix: Vec<FleetAllocation>,

    /// Number of drivers to generate.
    pub driver_count: usize,

    /// Number of routes to generate.
    pub route_count: usize,

    /// Number of trips to generate.
    pub trip_count: usize,

    /// Exact number of deliveries across all trips.
    pub delivery_target: usize,

    /// Exact number of maintenance records across all vehicles.
    pub maintenance_target: usize,

    /// Period covered by trips and maintenance.
    pub window: OperationalWindow,

    /// "Today" for relative dates (acquisitions, hires, licence expiries).
    pub reference_date: Date,

    /// Rows per insert statement.
    pub batch_size: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            fleet_mix: Self::reference_fleet_mix(),
            driver_count: 400,
            route_count: 50,
            trip_count: 100_000,
            delivery_target: 400_000,
            maintenance_target: 5_000,
            window: OperationalWindow::FLEETLOGIX,
            reference_date: date!(2026 - 01 - 01),
            batch_size: 1000,
        }
    }
}

impl SeedConfig {
    /// The fleet composition declared in the vehicle catalog.
    pub fn reference_fleet_mix() -> Vec<FleetAllocation> {
        VehicleType::ALL
            .iter()
            .map(|t| FleetAllocation::new(*t, t.spec().fleet_count))
            .collect()
    }

    /// Total number of vehicles across all classes.
    pub fn vehicle_count(&self) -> usize {
        self.fleet_mix.iter().map(|a| a.count).sum()
    }

    /// Checks every precondition that must hold before any draw is made.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let invalid = |msg: String| Err(GenerationError::InvalidConfig(msg));

        for (name, value) in [
            ("vehicle count", self.vehicle_count()),
            ("driver_count", self.driver_count),
            ("route_count", self.route_count),
            ("trip_count", self.trip_count),
            ("delivery_target", self.delivery_target),
            ("maintenance_target", self.maintenance_target),
            ("batch_size", self.batch_size),
        ] {
            if value == 0 {
                return invalid(format!("{name} must be positive"));
            }
        }

        for (i, allocation) in self.fleet_mix.iter().enumerate() {
            if self.fleet_mix[..i]
                .iter()
                .any(|a| a.vehicle_type == allocation.vehicle_type)
            {
                return invalid(format!(
                    "vehicle type {} listed twice in fleet_mix",
                    allocation.vehicle_type.as_str()
                ));
            }
        }

        if self.batch_size > MAX_BATCH_SIZE {
            return invalid(format!(
                "batch_size {} exceeds {MAX_BATCH_SIZE}",
                self.batch_size
            ));
        }

        let largest = [
            self.vehicle_count(),
            self.driver_count,
            self.route_count,
            self.trip_count,
            self.delivery_target,
            self.maintenance_target,
        ]
        .into_iter()
        .max()
        .unwrap_or(0);
        if largest > i32::MAX as usize {
            return invalid(format!("{largest} rows exceed the integer key space"));
        }

        if self.window.start >= self.window.end {
            return invalid("operational window start must precede its end".into());
        }

        let (min_deliveries, max_deliveries) = (self.trip_count * 2, self.trip_count * 6);
        if !(min_deliveries..=max_deliveries).contains(&self.delivery_target) {
            return invalid(format!(
                "delivery_target {} outside {min_deliveries}..={max_deliveries} for {} trips",
                self.delivery_target, self.trip_count
            ));
        }

        let earliest_expiry = self.reference_date + Duration::days(LICENSE_MIN_DAYS_AHEAD);
        if earliest_expiry < self.window.start_date() {
            return invalid(format!(
                "reference_date {} cannot guarantee licences valid from {}",
                self.reference_date,
                self.window.start_date()
            ));
        }

        Ok(())
    }
}
