//! Vehicle fleet generation.

use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;
use time::Date;
use tracing::info;

use fleetlogix::models::{FuelType, VehicleStatus, VehicleType};

use crate::config::FleetAllocation;
use crate::distributions::{Categorical, round2, uniform_date, years};
use crate::errors::GenerationError;
use crate::generators::index::Keyed;

/// Plate letters, without the easily confused I and O.
const PLATE_LETTERS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Generated vehicle ready for database insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedVehicle {
    pub id: i32,
    pub license_plate: String,
    pub vehicle_type: VehicleType,
    pub capacity_kg: f64,
    pub fuel_type: FuelType,
    pub acquisition_date: Date,
    pub status: VehicleStatus,
}

impl Keyed for GeneratedVehicle {
    const TABLE: &'static str = "vehicles";

    fn id(&self) -> i32 {
        self.id
    }
}

/// Configuration for vehicle generation.
#[derive(Debug, Clone)]
pub struct VehicleGenConfig {
    /// Vehicles per class, generated in this order.
    pub fleet_mix: Vec<FleetAllocation>,
    /// Anchor for the acquisition window.
    pub reference_date: Date,
    /// Acquisitions happen between this many years ago...
    pub oldest_years: i64,
    /// ...and this many years ago.
    pub newest_years: i64,
    /// Share of non-motorcycle vehicles running on diesel.
    pub diesel_share: f64,
}

impl Default for VehicleGenConfig {
    fn default() -> Self {
        let defaults = crate::config::SeedConfig::default();
        Self {
            fleet_mix: defaults.fleet_mix,
            reference_date: defaults.reference_date,
            oldest_years: 8,
            newest_years: 1,
            diesel_share: 0.8,
        }
    }
}

/// Generates the vehicle master table.
pub struct VehicleGenerator {
    config: VehicleGenConfig,
}

impl VehicleGenerator {
    /// Creates a new vehicle generator for the reference fleet mix.
    pub fn new() -> Self {
        Self {
            config: VehicleGenConfig::default(),
        }
    }

    /// Creates a vehicle generator with custom configuration.
    pub fn with_config(config: VehicleGenConfig) -> Self {
        Self { config }
    }

    /// Generates every vehicle of the fleet mix, ids dense from 1.
    pub fn generate_batch(
        &self,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedVehicle>, GenerationError> {
        let status = Categorical::new(
            "vehicle status",
            &[
                (VehicleStatus::Active, 0.90),
                (VehicleStatus::Inactive, 0.05),
                (VehicleStatus::Maintenance, 0.05),
            ],
        )?;
        let fuel = Categorical::new(
            "fuel type",
            &[
                (FuelType::Diesel, self.config.diesel_share),
                (FuelType::Gasoline, 1.0 - self.config.diesel_share),
            ],
        )?;

        let acquired_from = self.config.reference_date - years(self.config.oldest_years);
        let acquired_to = self.config.reference_date - years(self.config.newest_years);

        let total: usize = self.config.fleet_mix.iter().map(|a| a.count).sum();
        let mut plates = HashSet::with_capacity(total);
        let mut vehicles = Vec::with_capacity(total);

        for allocation in &self.config.fleet_mix {
            let spec = allocation.vehicle_type.spec();
            let (min_kg, max_kg) = spec.capacity_kg;

            for _ in 0..allocation.count {
                let license_plate = self.unique_plate(&mut plates, rng);
                let capacity_kg = round2(rng.gen_range(min_kg..=max_kg));
                let fuel_type = match allocation.vehicle_type {
                    VehicleType::Motorcycle => FuelType::Gasoline,
                    _ => fuel.sample(rng),
                };
                let acquisition_date = uniform_date(acquired_from, acquired_to, rng);

                vehicles.push(GeneratedVehicle {
                    id: vehicles.len() as i32 + 1,
                    license_plate,
                    vehicle_type: allocation.vehicle_type,
                    capacity_kg,
                    fuel_type,
                    acquisition_date,
                    status: status.sample(rng),
                });
            }
        }

        for allocation in &self.config.fleet_mix {
            info!(
                "  {}: {} vehicles",
                allocation.vehicle_type.as_str(),
                allocation.count
            );
        }
        info!("Generated {} vehicles", vehicles.len());

        Ok(vehicles)
    }

    /// Draws plates until one not yet issued comes up.
    fn unique_plate(&self, issued: &mut HashSet<String>, rng: &mut impl Rng) -> String {
        loop {
            let letter = PLATE_LETTERS[rng.gen_range(0..PLATE_LETTERS.len())] as char;
            let number: u32 = rng.gen_range(100_000..=999_999);
            let plate = format!("{letter}{number}");
            if issued.insert(plate.clone()) {
                return plate;
            }
        }
    }
}

impl Default for VehicleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_reference_fleet() {
        let mut rng = StdRng::seed_from_u64(42);
        let vehicles = VehicleGenerator::new().generate_batch(&mut rng).unwrap();

        assert_eq!(vehicles.len(), 200);
        for (i, v) in vehicles.iter().enumerate() {
            assert_eq!(v.id, i as i32 + 1);
        }

        let count = |t: VehicleType| vehicles.iter().filter(|v| v.vehicle_type == t).count();
        assert_eq!(count(VehicleType::LargeTruck), 60);
        assert_eq!(count(VehicleType::MediumTruck), 70);
        assert_eq!(count(VehicleType::Van), 50);
        assert_eq!(count(VehicleType::Motorcycle), 20);
    }

    #[test]
    fn test_capacity_within_type_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let vehicles = VehicleGenerator::new().generate_batch(&mut rng).unwrap();

        for v in &vehicles {
            let (min, max) = v.vehicle_type.spec().capacity_kg;
            assert!(v.capacity_kg >= min && v.capacity_kg <= max, "{v:?}");
        }
    }

    #[test]
    fn test_motorcycles_run_on_gasoline() {
        let mut rng = StdRng::seed_from_u64(2);
        let vehicles = VehicleGenerator::new().generate_batch(&mut rng).unwrap();

        assert!(
            vehicles
                .iter()
                .filter(|v| v.vehicle_type == VehicleType::Motorcycle)
                .all(|v| v.fuel_type == FuelType::Gasoline)
        );
        assert!(vehicles.iter().any(|v| v.fuel_type == FuelType::Diesel));
    }

    #[test]
    fn test_plates_unique_and_well_formed() {
        let mut rng = StdRng::seed_from_u64(3);
        let vehicles = VehicleGenerator::new().generate_batch(&mut rng).unwrap();

        let plates: HashSet<_> = vehicles.iter().map(|v| &v.license_plate).collect();
        assert_eq!(plates.len(), vehicles.len());

        for v in &vehicles {
            assert_eq!(v.license_plate.len(), 7);
            let first = v.license_plate.as_bytes()[0];
            assert!(PLATE_LETTERS.contains(&first));
            assert!(v.license_plate[1..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_acquisition_window() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = VehicleGenConfig::default();
        let reference = config.reference_date;
        let vehicles = VehicleGenerator::with_config(config)
            .generate_batch(&mut rng)
            .unwrap();

        for v in &vehicles {
            assert!(v.acquisition_date >= reference - years(8));
            assert!(v.acquisition_date <= reference - years(1));
        }
    }
}
