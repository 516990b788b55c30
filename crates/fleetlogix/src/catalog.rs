//! Static reference tables for the FleetLogix network.
//!
//! Everything here is plain data: the intercity distance matrix, the specs of
//! each vehicle class, the maintenance menu and the list of service providers.

use crate::models::{MaintenanceType, VehicleType};

/// Cities served by the network, in matrix order.
pub const CITIES: [&str; 5] = [
    "Santo Domingo",
    "Santiago de los Caballeros",
    "La Romana",
    "Puerto Plata",
    "Punta Cana",
];

/// Road distance in km between each pair of [`CITIES`]. Symmetric, zero diagonal.
pub const DISTANCE_MATRIX_KM: [[f64; 5]; 5] = [
    [0.0, 155.0, 115.0, 215.0, 180.0],
    [155.0, 0.0, 230.0, 65.0, 285.0],
    [115.0, 230.0, 0.0, 295.0, 65.0],
    [215.0, 65.0, 295.0, 0.0, 350.0],
    [180.0, 285.0, 65.0, 350.0, 0.0],
];

/// Returns the base distance between two cities by name.
pub fn base_distance_km(origin: &str, destination: &str) -> Option<f64> {
    let from = CITIES.iter().position(|c| *c == origin)?;
    let to = CITIES.iter().position(|c| *c == destination)?;
    Some(DISTANCE_MATRIX_KM[from][to])
}

/// Distinct ordered (origin, destination, base distance) triples, origin != destination.
pub fn city_pairs() -> impl Iterator<Item = (&'static str, &'static str, f64)> {
    CITIES.iter().enumerate().flat_map(|(i, &origin)| {
        CITIES
            .iter()
            .enumerate()
            .filter(move |(j, _)| *j != i)
            .map(move |(j, &destination)| (origin, destination, DISTANCE_MATRIX_KM[i][j]))
    })
}

/// Declared characteristics of a vehicle class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSpec {
    /// Inclusive payload range in kg.
    pub capacity_kg: (f64, f64),
    /// Fuel efficiency in km per liter.
    pub km_per_liter: f64,
    /// Units of this class in the reference fleet.
    pub fleet_count: usize,
}

impl VehicleType {
    pub fn spec(&self) -> VehicleSpec {
        match self {
            VehicleType::LargeTruck => VehicleSpec {
                capacity_kg: (8000.0, 12000.0),
                km_per_liter: 3.5,
                fleet_count: 60,
            },
            VehicleType::MediumTruck => VehicleSpec {
                capacity_kg: (4000.0, 8000.0),
                km_per_liter: 5.0,
                fleet_count: 70,
            },
            VehicleType::Van => VehicleSpec {
                capacity_kg: (1000.0, 2000.0),
                km_per_liter: 8.0,
                fleet_count: 50,
            },
            VehicleType::Motorcycle => VehicleSpec {
                capacity_kg: (50.0, 150.0),
                km_per_liter: 25.0,
                fleet_count: 20,
            },
        }
    }
}

/// Frequency and price band of a maintenance intervention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaintenanceSpec {
    pub probability: f64,
    pub cost_range: (f64, f64),
}

impl MaintenanceType {
    pub fn spec(&self) -> MaintenanceSpec {
        let (probability, cost_range) = match self {
            MaintenanceType::OilChange => (0.30, (50.0, 150.0)),
            MaintenanceType::BrakeInspection => (0.15, (100.0, 300.0)),
            MaintenanceType::TireReplacement => (0.10, (200.0, 800.0)),
            MaintenanceType::GeneralService => (0.20, (150.0, 500.0)),
            MaintenanceType::EngineInspection => (0.10, (200.0, 600.0)),
            MaintenanceType::AlignmentAndBalancing => (0.15, (50.0, 120.0)),
        };
        MaintenanceSpec {
            probability,
            cost_range,
        }
    }
}

/// Workshops that perform fleet maintenance.
pub const MAINTENANCE_PROVIDERS: [&str; 6] = [
    "Central Workshop Santo Domingo",
    "Quick Mechanics Santiago",
    "AutoService La Romana",
    "FleetLogix In-House Shop",
    "Express Service Puerto Plata",
    "24/7 Maintenance Punta Cana",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_matrix_is_symmetric() {
        for i in 0..CITIES.len() {
            assert_eq!(DISTANCE_MATRIX_KM[i][i], 0.0);
            for j in 0..CITIES.len() {
                assert_eq!(DISTANCE_MATRIX_KM[i][j], DISTANCE_MATRIX_KM[j][i]);
            }
        }
    }

    #[test]
    fn test_city_pairs() {
        let pairs: Vec<_> = city_pairs().collect();
        assert_eq!(pairs.len(), 20);
        assert!(pairs.iter().all(|(o, d, km)| o != d && *km > 0.0));
        assert_eq!(pairs[0], ("Santo Domingo", "Santiago de los Caballeros", 155.0));
        assert_eq!(base_distance_km("Puerto Plata", "Punta Cana"), Some(350.0));
        assert_eq!(base_distance_km("Puerto Plata", "Nowhere"), None);
    }

    #[test]
    fn test_maintenance_probabilities_sum_to_one() {
        let total: f64 = MaintenanceType::ALL.iter().map(|t| t.spec().probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_reference_fleet_size() {
        let total: usize = VehicleType::ALL.iter().map(|t| t.spec().fleet_count).sum();
        assert_eq!(total, 200);
    }
}
