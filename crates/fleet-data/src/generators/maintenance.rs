//! Maintenance history generation.

use rand::Rng;
use serde::Serialize;
use time::{Date, Duration};
use tracing::info;

use fleetlogix::catalog::MAINTENANCE_PROVIDERS;
use fleetlogix::models::MaintenanceType;

use crate::config::OperationalWindow;
use crate::distributions::{Categorical, round2, uniform_date};
use crate::errors::GenerationError;
use crate::generators::index::IdIndex;
use crate::generators::trip::GeneratedTrip;
use crate::generators::vehicle::GeneratedVehicle;
use crate::reconcile::reconcile;

/// Generated maintenance record ready for database insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedMaintenance {
    pub id: i32,
    pub vehicle_id: i32,
    pub maintenance_date: Date,
    pub maintenance_type: MaintenanceType,
    pub description: String,
    pub cost: f64,
    pub next_maintenance_date: Date,
    pub performed_by: String,
}

/// Configuration for maintenance generation.
#[derive(Debug, Clone)]
pub struct MaintenanceGenConfig {
    /// Fallback span for vehicles that never made a trip.
    pub window: OperationalWindow,
    /// Days until the next service is due.
    pub next_due_days: (i64, i64),
}

impl Default for MaintenanceGenConfig {
    fn default() -> Self {
        Self {
            window: OperationalWindow::default(),
            next_due_days: (75, 105),
        }
    }
}

/// Generates maintenance records weighted by each vehicle's trip volume.
pub struct MaintenanceGenerator {
    config: MaintenanceGenConfig,
}

impl MaintenanceGenerator {
    /// Creates a new maintenance generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: MaintenanceGenConfig::default(),
        }
    }

    /// Creates a maintenance generator with custom configuration.
    pub fn with_config(config: MaintenanceGenConfig) -> Self {
        Self { config }
    }

    /// Records per vehicle, proportional to trip share, summing to `target`.
    ///
    /// Every vehicle gets at least one record when the target allows it.
    pub fn allocate(
        &self,
        vehicles: &[GeneratedVehicle],
        trips: &[GeneratedTrip],
        target: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<usize>, GenerationError> {
        let index = IdIndex::build(vehicles)?;
        let mut trip_counts = vec![0usize; vehicles.len()];
        for trip in trips {
            index.get(trip.vehicle_id)?;
            trip_counts[(trip.vehicle_id - 1) as usize] += 1;
        }

        let floor = usize::from(target >= vehicles.len());
        let total_trips = trips.len();
        let initial = trip_counts
            .iter()
            .map(|&c| {
                let share = if total_trips == 0 {
                    1.0 / vehicles.len() as f64
                } else {
                    c as f64 / total_trips as f64
                };
                ((target as f64 * share) as usize).max(floor)
            })
            .collect();

        reconcile(initial, target, floor, usize::MAX, rng)
    }

    /// Generates exactly `target` records, ids dense from 1, grouped by vehicle.
    pub fn generate_batch(
        &self,
        vehicles: &[GeneratedVehicle],
        trips: &[GeneratedTrip],
        target: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedMaintenance>, GenerationError> {
        let counts = self.allocate(vehicles, trips, target, rng)?;

        let kinds: Vec<(MaintenanceType, f64)> = MaintenanceType::ALL
            .iter()
            .map(|t| (*t, t.spec().probability))
            .collect();
        let kind = Categorical::new("maintenance type", &kinds)?;

        let fallback = (self.config.window.start_date(), self.config.window.end_date());
        let mut spans: Vec<Option<(Date, Date)>> = vec![None; vehicles.len()];
        for trip in trips {
            let day = trip.departure.date();
            let span = &mut spans[(trip.vehicle_id - 1) as usize];
            *span = Some(match *span {
                Some((first, last)) => (first.min(day), last.max(day)),
                None => (day, day),
            });
        }

        let (due_lo, due_hi) = self.config.next_due_days;
        let mut records = Vec::with_capacity(target);

        for (vehicle, (&count, span)) in vehicles.iter().zip(counts.iter().zip(&spans)) {
            let (first, last) = span.unwrap_or(fallback);

            for _ in 0..count {
                let maintenance_date = uniform_date(first, last, rng);
                let maintenance_type = kind.sample(rng);
                let (cost_lo, cost_hi) = maintenance_type.spec().cost_range;
                let cost = round2(rng.gen_range(cost_lo..=cost_hi));
                let next_maintenance_date =
                    maintenance_date + Duration::days(rng.gen_range(due_lo..=due_hi));
                let performed_by =
                    MAINTENANCE_PROVIDERS[rng.gen_range(0..MAINTENANCE_PROVIDERS.len())];

                records.push(GeneratedMaintenance {
                    id: records.len() as i32 + 1,
                    vehicle_id: vehicle.id,
                    maintenance_date,
                    maintenance_type,
                    description: format!(
                        "{} scheduled for vehicle #{}",
                        maintenance_type.as_str(),
                        vehicle.id
                    ),
                    cost,
                    next_maintenance_date,
                    performed_by: performed_by.to_string(),
                });
            }
        }

        let mut by_type: Vec<(MaintenanceType, usize)> = MaintenanceType::ALL
            .iter()
            .map(|t| (*t, records.iter().filter(|r| r.maintenance_type == *t).count()))
            .collect();
        by_type.sort_by(|a, b| b.1.cmp(&a.1));
        info!("Generated {} maintenance records", records.len());
        for (t, n) in by_type.iter().take(3) {
            info!("  {}: {}", t.as_str(), n);
        }

        Ok(records)
    }
}

impl Default for MaintenanceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FleetAllocation;
    use crate::generators::vehicle::VehicleGenConfig;
    use crate::generators::{DriverGenerator, RouteGenerator, TripGenerator, VehicleGenerator};
    use fleetlogix::models::VehicleType;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fleet(rng: &mut StdRng, trip_count: usize) -> (Vec<GeneratedVehicle>, Vec<GeneratedTrip>) {
        let vehicles = VehicleGenerator::new().generate_batch(rng).unwrap();
        let drivers = DriverGenerator::new().generate_batch(20, rng).unwrap();
        let routes = RouteGenerator::new().generate_batch(20, rng).unwrap();
        let trips = TripGenerator::new()
            .generate_batch(trip_count, &vehicles, &drivers, &routes, rng)
            .unwrap();
        (vehicles, trips)
    }

    #[test]
    fn test_exact_target_with_floor() {
        let mut rng = StdRng::seed_from_u64(42);
        let (vehicles, trips) = fleet(&mut rng, 4_000);

        let records = MaintenanceGenerator::new()
            .generate_batch(&vehicles, &trips, 500, &mut rng)
            .unwrap();

        assert_eq!(records.len(), 500);
        for v in &vehicles {
            assert!(records.iter().any(|r| r.vehicle_id == v.id), "vehicle {}", v.id);
        }
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.id, i as i32 + 1);
        }
    }

    #[test]
    fn test_dates_within_vehicle_history() {
        let mut rng = StdRng::seed_from_u64(31);
        let (vehicles, trips) = fleet(&mut rng, 3_000);
        let records = MaintenanceGenerator::new()
            .generate_batch(&vehicles, &trips, 400, &mut rng)
            .unwrap();

        for r in &records {
            let days: Vec<Date> = trips
                .iter()
                .filter(|t| t.vehicle_id == r.vehicle_id)
                .map(|t| t.departure.date())
                .collect();
            if let (Some(first), Some(last)) = (days.iter().min(), days.iter().max()) {
                assert!(r.maintenance_date >= *first && r.maintenance_date <= *last);
            }

            let gap = (r.next_maintenance_date - r.maintenance_date).whole_days();
            assert!((75..=105).contains(&gap));

            let (lo, hi) = r.maintenance_type.spec().cost_range;
            assert!(r.cost >= lo && r.cost <= hi);
            assert!(MAINTENANCE_PROVIDERS.contains(&r.performed_by.as_str()));
        }
    }

    #[test]
    fn test_busy_vehicles_get_more_service() {
        let mut rng = StdRng::seed_from_u64(32);
        let (vehicles, mut trips) = fleet(&mut rng, 2_000);
        // Vehicle 1 carries half of all trips.
        for t in trips.iter_mut().step_by(2) {
            t.vehicle_id = 1;
        }

        let counts = MaintenanceGenerator::new()
            .allocate(&vehicles, &trips, 1_000, &mut rng)
            .unwrap();
        assert_eq!(counts.iter().sum::<usize>(), 1_000);
        assert!(counts[0] > 400, "vehicle 1 got {}", counts[0]);
    }

    #[test]
    fn test_target_below_fleet_size() {
        let mut rng = StdRng::seed_from_u64(33);
        let config = VehicleGenConfig {
            fleet_mix: VehicleType::ALL
                .iter()
                .map(|t| FleetAllocation::new(*t, 1))
                .collect(),
            ..Default::default()
        };
        let vehicles = VehicleGenerator::with_config(config)
            .generate_batch(&mut rng)
            .unwrap();

        let records = MaintenanceGenerator::new()
            .generate_batch(&vehicles, &[], 2, &mut rng)
            .unwrap();
        assert_eq!(records.len(), 2);

        let window = OperationalWindow::default();
        for r in &records {
            assert!(r.maintenance_date >= window.start_date());
            assert!(r.maintenance_date <= window.end_date());
        }
    }

    #[test]
    fn test_dangling_vehicle_reference() {
        let mut rng = StdRng::seed_from_u64(34);
        let (vehicles, mut trips) = fleet(&mut rng, 10);
        trips[0].vehicle_id = 999;

        assert!(matches!(
            MaintenanceGenerator::new().generate_batch(&vehicles, &trips, 300, &mut rng),
            Err(GenerationError::UnknownReference { id: 999, .. })
        ));
    }
}
