//! Driver generation.

use std::collections::HashSet;

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;
use serde::Serialize;
use time::{Date, Duration};
use tracing::info;

use fleetlogix::models::DriverStatus;

use crate::distributions::{Categorical, uniform_date, years};
use crate::errors::GenerationError;
use crate::generators::index::Keyed;

/// Generated driver ready for database insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedDriver {
    pub id: i32,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub license_expiry: Date,
    pub phone: String,
    pub hire_date: Date,
    pub status: DriverStatus,
}

impl Keyed for GeneratedDriver {
    const TABLE: &'static str = "drivers";

    fn id(&self) -> i32 {
        self.id
    }
}

/// Configuration for driver generation.
#[derive(Debug, Clone)]
pub struct DriverGenConfig {
    /// Anchor for hire and licence windows.
    pub reference_date: Date,
    /// Licences expire between 1 and this many years after the reference date.
    pub license_years_ahead: i64,
    /// Hires happen up to this many years before the reference date.
    pub hire_years_back: i64,
    /// Most recent hire, in days before the reference date.
    pub newest_hire_days: i64,
}

impl Default for DriverGenConfig {
    fn default() -> Self {
        Self {
            reference_date: crate::config::SeedConfig::default().reference_date,
            license_years_ahead: 4,
            hire_years_back: 6,
            newest_hire_days: 30,
        }
    }
}

/// Generates the driver master table.
pub struct DriverGenerator {
    config: DriverGenConfig,
}

impl DriverGenerator {
    /// Creates a new driver generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: DriverGenConfig::default(),
        }
    }

    pub fn with_config(config: DriverGenConfig) -> Self {
        Self { config }
    }

    /// Generates `count` drivers with ids and employee codes 1..=count.
    pub fn generate_batch(
        &self,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedDriver>, GenerationError> {
        let status = Categorical::new(
            "driver status",
            &[
                (DriverStatus::Active, 0.92),
                (DriverStatus::Inactive, 0.05),
                (DriverStatus::OnLeave, 0.03),
            ],
        )?;

        let reference = self.config.reference_date;
        let expiry_from = reference + years(1);
        let expiry_to = reference + years(self.config.license_years_ahead);
        let hired_from = reference - years(self.config.hire_years_back);
        let hired_to = reference - Duration::days(self.config.newest_hire_days);

        let mut licenses = HashSet::with_capacity(count);
        let mut drivers = Vec::with_capacity(count);

        for i in 1..=count {
            let first_name: String = FirstName().fake_with_rng(rng);
            let last_name: String = LastName().fake_with_rng(rng);
            let license_number = loop {
                let candidate = format!("LIC-{}", rng.gen_range(100_000_000u32..=999_999_999));
                if licenses.insert(candidate.clone()) {
                    break candidate;
                }
            };
            let license_expiry = uniform_date(expiry_from, expiry_to, rng);
            let phone = format!(
                "+1-809-{}-{}",
                rng.gen_range(200..=999),
                rng.gen_range(1000..=9999)
            );
            let hire_date = uniform_date(hired_from, hired_to, rng);

            drivers.push(GeneratedDriver {
                id: i as i32,
                employee_code: format!("EMP-{i:04}"),
                first_name,
                last_name,
                license_number,
                license_expiry,
                phone,
                hire_date,
                status: status.sample(rng),
            });
        }

        let active = drivers
            .iter()
            .filter(|d| d.status == DriverStatus::Active)
            .count();
        info!("Generated {} drivers ({} active)", drivers.len(), active);

        Ok(drivers)
    }
}

impl Default for DriverGenerator {
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
    fn test_generate_drivers() {
        let mut rng = StdRng::seed_from_u64(42);
        let drivers = DriverGenerator::new().generate_batch(25, &mut rng).unwrap();

        assert_eq!(drivers.len(), 25);
        assert_eq!(drivers[0].employee_code, "EMP-0001");
        assert_eq!(drivers[24].employee_code, "EMP-0025");
        assert!(drivers.iter().all(|d| !d.first_name.is_empty()));
        assert!(drivers.iter().all(|d| d.phone.starts_with("+1-809-")));
    }

    #[test]
    fn test_license_numbers_unique() {
        let mut rng = StdRng::seed_from_u64(5);
        let drivers = DriverGenerator::new().generate_batch(400, &mut rng).unwrap();

        let licenses: HashSet<_> = drivers.iter().map(|d| &d.license_number).collect();
        assert_eq!(licenses.len(), 400);
        assert!(drivers.iter().all(|d| d.license_number.len() == 13));
    }

    #[test]
    fn test_license_and_hire_windows() {
        let mut rng = StdRng::seed_from_u64(6);
        let config = DriverGenConfig::default();
        let reference = config.reference_date;
        let drivers = DriverGenerator::with_config(config)
            .generate_batch(200, &mut rng)
            .unwrap();

        for d in &drivers {
            assert!(d.license_expiry >= reference + years(1));
            assert!(d.license_expiry <= reference + years(4));
            assert!(d.hire_date < reference);
            assert!(d.hire_date >= reference - years(6));
        }
    }

    #[test]
    fn test_status_mostly_active() {
        let mut rng = StdRng::seed_from_u64(7);
        let drivers = DriverGenerator::new()
            .generate_batch(1_000, &mut rng)
            .unwrap();

        let active = drivers
            .iter()
            .filter(|d| d.status == DriverStatus::Active)
            .count();
        assert!(active > 880 && active < 960, "active = {active}");
    }
}
