//! Trip generation.
//!
//! Each trip picks a vehicle, driver and route uniformly, departs at a uniform
//! date with an hour drawn from the demand model, and derives its arrival from
//! the route's base duration. Arrival therefore follows departure for every
//! trip that keeps one.

use rand::Rng;
use serde::Serialize;
use time::{Duration, PrimitiveDateTime};
use tracing::{debug, info};

use fleetlogix::models::TripStatus;

use crate::config::OperationalWindow;
use crate::demand::HourlyDemand;
use crate::distributions::{Categorical, check_band, round2};
use crate::errors::GenerationError;
use crate::generators::driver::GeneratedDriver;
use crate::generators::index::{IdIndex, Keyed};
use crate::generators::route::GeneratedRoute;
use crate::generators::vehicle::GeneratedVehicle;

const PROGRESS_EVERY: usize = 10_000;

/// Generated trip ready for database insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedTrip {
    pub id: i32,
    pub vehicle_id: i32,
    pub driver_id: i32,
    pub route_id: i32,
    pub departure: PrimitiveDateTime,
    pub arrival: Option<PrimitiveDateTime>,
    pub fuel_consumed_liters: f64,
    pub total_weight_kg: f64,
    pub status: TripStatus,
}

impl Keyed for GeneratedTrip {
    const TABLE: &'static str = "trips";

    fn id(&self) -> i32 {
        self.id
    }
}

/// Configuration for trip generation.
#[derive(Debug, Clone)]
pub struct TripGenConfig {
    pub window: OperationalWindow,
    /// Actual duration as a multiple of the route's estimate.
    pub duration_factor: (f64, f64),
    /// Fuel burn as a multiple of distance / efficiency.
    pub fuel_factor: (f64, f64),
    /// Load as a share of vehicle capacity.
    pub load_factor: (f64, f64),
    /// Chance that a cancelled trip loses its arrival time.
    pub cancelled_without_arrival: f64,
}

impl Default for TripGenConfig {
    fn default() -> Self {
        Self {
            window: OperationalWindow::default(),
            duration_factor: (0.8, 1.2),
            fuel_factor: (0.9, 1.1),
            load_factor: (0.5, 0.95),
            cancelled_without_arrival: 0.5,
        }
    }
}

impl TripGenConfig {
    /// Checks that every sampling band is non-empty and the window is ordered.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.window.start >= self.window.end {
            return Err(GenerationError::InvalidConfig(
                "trip window start must precede its end".into(),
            ));
        }
        check_band("duration_factor", self.duration_factor)?;
        check_band("fuel_factor", self.fuel_factor)?;
        check_band("load_factor", self.load_factor)?;
        if !(0.0..=1.0).contains(&self.cancelled_without_arrival) {
            return Err(GenerationError::InvalidConfig(format!(
                "cancelled_without_arrival {} is not a probability",
                self.cancelled_without_arrival
            )));
        }
        Ok(())
    }
}

/// Generates trips against already generated master tables.
pub struct TripGenerator {
    config: TripGenConfig,
}

impl TripGenerator {
    /// Creates a trip generator over the default operational window.
    pub fn new() -> Self {
        Self {
            config: TripGenConfig::default(),
        }
    }

    /// Creates a trip generator with custom configuration.
    ///
    /// The configuration is checked when a batch is generated.
    pub fn with_config(config: TripGenConfig) -> Self {
        Self { config }
    }

    /// Generates `count` trips with ids 1..=count.
    pub fn generate_batch(
        &self,
        count: usize,
        vehicles: &[GeneratedVehicle],
        drivers: &[GeneratedDriver],
        routes: &[GeneratedRoute],
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedTrip>, GenerationError> {
        self.config.validate()?;
        let vehicles = IdIndex::build(vehicles)?;
        let drivers = IdIndex::build(drivers)?;
        let routes = IdIndex::build(routes)?;

        let demand = HourlyDemand::new()?;
        let status = Categorical::new(
            "trip status",
            &[
                (TripStatus::Completed, 0.95),
                (TripStatus::InProgress, 0.03),
                (TripStatus::Cancelled, 0.02),
            ],
        )?;

        let (dur_lo, dur_hi) = self.config.duration_factor;
        let (fuel_lo, fuel_hi) = self.config.fuel_factor;
        let (load_lo, load_hi) = self.config.load_factor;

        let mut trips = Vec::with_capacity(count);
        for i in 1..=count {
            let departure = self.departure(&demand, rng)?;

            let vehicle_id = vehicles.sample_id(rng)?;
            let driver_id = drivers.sample_id(rng)?;
            let route_id = routes.sample_id(rng)?;
            let route = routes.get(route_id)?;
            let vehicle = vehicles.get(vehicle_id)?;

            let hours = route.estimated_duration_hours * rng.gen_range(dur_lo..=dur_hi);
            let seconds = ((hours * 3600.0).round() as i64).max(1);
            let arrival = departure + Duration::seconds(seconds);

            let efficiency = vehicle.vehicle_type.spec().km_per_liter;
            let fuel_consumed_liters =
                round2(route.distance_km / efficiency * rng.gen_range(fuel_lo..=fuel_hi));
            let total_weight_kg = round2(vehicle.capacity_kg * rng.gen_range(load_lo..=load_hi));

            let status = status.sample(rng);
            let arrival = match status {
                TripStatus::Completed => Some(arrival),
                TripStatus::InProgress => None,
                TripStatus::Cancelled => {
                    if rng.gen_bool(self.config.cancelled_without_arrival) {
                        None
                    } else {
                        Some(arrival)
                    }
                }
            };

            trips.push(GeneratedTrip {
                id: i as i32,
                vehicle_id,
                driver_id,
                route_id,
                departure,
                arrival,
                fuel_consumed_liters,
                total_weight_kg,
                status,
            });

            if i % PROGRESS_EVERY == 0 {
                debug!("  {i}/{count} trips");
            }
        }

        let tally = |s: TripStatus| trips.iter().filter(|t| t.status == s).count();
        info!(
            "Generated {} trips ({} completed, {} in progress, {} cancelled)",
            trips.len(),
            tally(TripStatus::Completed),
            tally(TripStatus::InProgress),
            tally(TripStatus::Cancelled)
        );

        Ok(trips)
    }

    /// Uniform date, demand-weighted hour, uniform minute and second.
    ///
    /// Redraws in the rare case the hour override leaves a window that does
    /// not cover whole days.
    fn departure(
        &self,
        demand: &HourlyDemand,
        rng: &mut impl Rng,
    ) -> Result<PrimitiveDateTime, GenerationError> {
        let window = &self.config.window;
        loop {
            let offset = rng.gen_range(0..=window.total_seconds());
            let instant = (window.start + Duration::seconds(offset))
                .replace_hour(demand.sample_hour(rng))?
                .replace_minute(rng.gen_range(0..60))?
                .replace_second(rng.gen_range(0..60))?;
            if window.contains(instant) {
                return Ok(instant);
            }
        }
    }
}

impl Default for TripGenerator {
    fn default() -> Self {
        Self::new()
    }
}
