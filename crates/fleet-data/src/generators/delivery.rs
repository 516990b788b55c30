//! Delivery generation.
//!
//! Per-trip counts are sampled then reconciled so the table holds exactly the
//! configured number of rows. Each trip's cargo is split across its deliveries
//! with a symmetric Dirichlet draw.

use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StreetName};
use fake::faker::name::en::Name;
use rand::Rng;
use rand_distr::{Dirichlet, Distribution};
use serde::Serialize;
use time::{Duration, PrimitiveDateTime};
use tracing::{debug, info};

use fleetlogix::models::{DeliveryStatus, TripStatus};

use crate::distributions::{Categorical, check_band, round2};
use crate::errors::GenerationError;
use crate::generators::trip::GeneratedTrip;
use crate::reconcile::reconcile;

pub const MIN_PER_TRIP: usize = 2;
pub const MAX_PER_TRIP: usize = 6;

/// Smallest package weight in kg.
pub const MIN_PACKAGE_KG: f64 = 0.1;

const PROGRESS_EVERY: usize = 20_000;

/// Generated delivery ready for database insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedDelivery {
    pub id: i32,
    pub trip_id: i32,
    pub tracking_number: String,
    pub customer_name: String,
    pub delivery_address: String,
    pub package_weight_kg: f64,
    pub scheduled: PrimitiveDateTime,
    pub delivered: Option<PrimitiveDateTime>,
    pub status: DeliveryStatus,
    pub recipient_signature: bool,
}

/// Configuration for delivery generation.
#[derive(Debug, Clone)]
pub struct DeliveryGenConfig {
    /// Hours after departure for trips without an arrival time.
    pub open_trip_offset_hours: (i64, i64),
    /// Longest gap between the scheduled and delivered time, in minutes.
    pub max_delivery_delay_minutes: i64,
    /// Chance a delivered package carries a signature.
    pub signature_rate: f64,
}

impl Default for DeliveryGenConfig {
    fn default() -> Self {
        Self {
            open_trip_offset_hours: (1, 8),
            max_delivery_delay_minutes: 60,
            signature_rate: 0.85,
        }
    }
}

impl DeliveryGenConfig {
    /// Checks the offset band, delay and signature rate.
    pub fn validate(&self) -> Result<(), GenerationError> {
        check_band("open_trip_offset_hours", self.open_trip_offset_hours)?;
        if self.open_trip_offset_hours.0 < 0 {
            return Err(GenerationError::InvalidConfig(
                "open_trip_offset_hours must not precede departure".into(),
            ));
        }
        if self.max_delivery_delay_minutes < 0 {
            return Err(GenerationError::InvalidConfig(format!(
                "max_delivery_delay_minutes {} is negative",
                self.max_delivery_delay_minutes
            )));
        }
        if !(0.0..=1.0).contains(&self.signature_rate) {
            return Err(GenerationError::InvalidConfig(format!(
                "signature_rate {} is not a probability",
                self.signature_rate
            )));
        }
        Ok(())
    }
}

/// Draws an unreconciled delivery count for each of `trip_count` trips.
///
/// Counts are 2..=6 with weights 10/20/40/20/10 percent, so the mean is 4.
pub fn draw_counts(trip_count: usize, rng: &mut impl Rng) -> Result<Vec<usize>, GenerationError> {
    let per_trip = Categorical::new(
        "deliveries per trip",
        &[(2, 0.10), (3, 0.20), (4, 0.40), (5, 0.20), (6, 0.10)],
    )?;
    Ok((0..trip_count).map(|_| per_trip.sample(rng)).collect())
}

/// Status mix for the deliveries of a trip, keyed by the trip's own status.
struct StatusTables {
    completed: Categorical<DeliveryStatus>,
    in_progress: Categorical<DeliveryStatus>,
    cancelled: Categorical<DeliveryStatus>,
}

impl StatusTables {
    fn new() -> Result<Self, GenerationError> {
        use DeliveryStatus::*;
        Ok(Self {
            completed: Categorical::new(
                "delivery status (completed trip)",
                &[(Delivered, 0.85), (Pending, 0.10), (Failed, 0.05)],
            )?,
            in_progress: Categorical::new(
                "delivery status (trip in progress)",
                &[(Delivered, 0.30), (Pending, 0.70)],
            )?,
            cancelled: Categorical::new(
                "delivery status (cancelled trip)",
                &[(Pending, 0.60), (Failed, 0.40)],
            )?,
        })
    }

    fn for_trip(&self, status: TripStatus) -> &Categorical<DeliveryStatus> {
        match status {
            TripStatus::Completed => &self.completed,
            TripStatus::InProgress => &self.in_progress,
            TripStatus::Cancelled => &self.cancelled,
        }
    }
}

/// Generates deliveries for a finished trip table.
pub struct DeliveryGenerator {
    config: DeliveryGenConfig,
}

impl DeliveryGenerator {
    /// Creates a new delivery generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: DeliveryGenConfig::default(),
        }
    }

    /// Creates a delivery generator with custom configuration.
    pub fn with_config(config: DeliveryGenConfig) -> Self {
        Self { config }
    }

    /// Generates exactly `target` deliveries, 2 to 6 per trip.
    pub fn generate_batch(
        &self,
        trips: &[GeneratedTrip],
        target: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedDelivery>, GenerationError> {
        self.config.validate()?;
        let sampled = draw_counts(trips.len(), rng)?;
        let counts = reconcile(sampled, target, MIN_PER_TRIP, MAX_PER_TRIP, rng)?;

        let splits = (MIN_PER_TRIP..=MAX_PER_TRIP)
            .map(|k| Dirichlet::new_with_size(1.0, k))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| GenerationError::Distribution(e.to_string()))?;
        let statuses = StatusTables::new()?;

        let mut deliveries = Vec::with_capacity(target);
        for (n, (trip, &count)) in trips.iter().zip(&counts).enumerate() {
            let weights = split_weight(
                trip.total_weight_kg,
                splits[count - MIN_PER_TRIP].sample(rng),
            );
            let schedule = self.schedule(trip, count, rng);
            let status_mix = statuses.for_trip(trip.status);

            for (seq, (package_weight_kg, scheduled)) in
                weights.into_iter().zip(schedule).enumerate()
            {
                let tracking_number = format!(
                    "DOM{:06}{:02}{}",
                    trip.id,
                    seq + 1,
                    rng.gen_range(1000..=9999)
                );
                let customer_name: String = Name().fake_with_rng(rng);
                let delivery_address = fake_address(rng);

                let status = status_mix.sample(rng);
                let (delivered, recipient_signature) = if status == DeliveryStatus::Delivered {
                    let delay = rng.gen_range(0..=self.config.max_delivery_delay_minutes * 60);
                    (
                        Some(scheduled + Duration::seconds(delay)),
                        rng.gen_bool(self.config.signature_rate),
                    )
                } else {
                    (None, false)
                };

                deliveries.push(GeneratedDelivery {
                    id: deliveries.len() as i32 + 1,
                    trip_id: trip.id,
                    tracking_number,
                    customer_name,
                    delivery_address,
                    package_weight_kg,
                    scheduled,
                    delivered,
                    status,
                    recipient_signature,
                });
            }

            if (n + 1) % PROGRESS_EVERY == 0 {
                debug!("  deliveries for {}/{} trips", n + 1, trips.len());
            }
        }

        let tally = |s: DeliveryStatus| deliveries.iter().filter(|d| d.status == s).count();
        info!(
            "Generated {} deliveries ({:.2} per trip; {} delivered, {} pending, {} failed)",
            deliveries.len(),
            deliveries.len() as f64 / trips.len().max(1) as f64,
            tally(DeliveryStatus::Delivered),
            tally(DeliveryStatus::Pending),
            tally(DeliveryStatus::Failed)
        );

        Ok(deliveries)
    }

    /// Sorted scheduled times for the deliveries of one trip.
    fn schedule(
        &self,
        trip: &GeneratedTrip,
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<PrimitiveDateTime> {
        let mut offsets: Vec<i64> = match trip.arrival {
            Some(arrival) => {
                let elapsed = (arrival - trip.departure).whole_seconds().max(1);
                (0..count).map(|_| rng.gen_range(0..elapsed)).collect()
            }
            None => {
                let (lo, hi) = self.config.open_trip_offset_hours;
                (0..count)
                    .map(|_| rng.gen_range(lo * 3600..=hi * 3600))
                    .collect()
            }
        };
        offsets.sort_unstable();
        offsets
            .into_iter()
            .map(|s| trip.departure + Duration::seconds(s))
            .collect()
    }
}

impl Default for DeliveryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Scales Dirichlet shares to the trip weight, flooring each package.
///
/// Flooring can push the sum over the trip weight; the excess comes off the
/// largest package.
fn split_weight(total_kg: f64, shares: Vec<f64>) -> Vec<f64> {
    let mut weights: Vec<f64> = shares
        .into_iter()
        .map(|s| round2(s * total_kg).max(MIN_PACKAGE_KG))
        .collect();

    let excess = weights.iter().sum::<f64>() - total_kg;
    if excess > 0.0 {
        if let Some(largest) = weights.iter_mut().reduce(|a, b| if *b > *a { b } else { a }) {
            *largest = round2((*largest - excess).max(MIN_PACKAGE_KG));
        }
    }
    weights
}

fn fake_address(rng: &mut impl Rng) -> String {
    let number: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    let city: String = CityName().fake_with_rng(rng);
    format!("{number} {street}, {city}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{DriverGenerator, RouteGenerator, TripGenerator, VehicleGenerator};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    fn trips(count: usize, rng: &mut StdRng) -> Vec<GeneratedTrip> {
        let vehicles = VehicleGenerator::new().generate_batch(rng).unwrap();
        let drivers = DriverGenerator::new().generate_batch(20, rng).unwrap();
        let routes = RouteGenerator::new().generate_batch(20, rng).unwrap();
        TripGenerator::new()
            .generate_batch(count, &vehicles, &drivers, &routes, rng)
            .unwrap()
    }

    #[test]
    fn test_exact_target_and_per_trip_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let trips = trips(500, &mut rng);

        for target in [1_000, 2_000, 2_750, 3_000] {
            let deliveries = DeliveryGenerator::new()
                .generate_batch(&trips, target, &mut rng)
                .unwrap();
            assert_eq!(deliveries.len(), target);

            let mut per_trip: HashMap<i32, usize> = HashMap::new();
            for d in &deliveries {
                *per_trip.entry(d.trip_id).or_default() += 1;
            }
            assert_eq!(per_trip.len(), trips.len());
            assert!(per_trip.values().all(|c| (2..=6).contains(c)));
        }
    }

    #[test]
    fn test_weights_fit_trip_load() {
        let mut rng = StdRng::seed_from_u64(21);
        let trips = trips(400, &mut rng);
        let deliveries = DeliveryGenerator::new()
            .generate_batch(&trips, 1_600, &mut rng)
            .unwrap();

        let mut load: HashMap<i32, f64> = HashMap::new();
        for d in &deliveries {
            assert!(d.package_weight_kg >= MIN_PACKAGE_KG);
            *load.entry(d.trip_id).or_default() += d.package_weight_kg;
        }
        for t in &trips {
            assert!(load[&t.id] <= t.total_weight_kg * 1.01, "trip {}", t.id);
        }
    }

    #[test]
    fn test_times_and_statuses() {
        let mut rng = StdRng::seed_from_u64(22);
        let trips = trips(600, &mut rng);
        let deliveries = DeliveryGenerator::new()
            .generate_batch(&trips, 2_400, &mut rng)
            .unwrap();

        for d in &deliveries {
            let trip = &trips[(d.trip_id - 1) as usize];
            assert!(d.scheduled >= trip.departure);
            match trip.arrival {
                Some(arrival) => assert!(d.scheduled < arrival),
                None => assert!(d.scheduled <= trip.departure + Duration::hours(8)),
            }

            match d.status {
                DeliveryStatus::Delivered => {
                    let delivered = d.delivered.unwrap();
                    assert!(delivered >= d.scheduled);
                    assert!(delivered <= d.scheduled + Duration::minutes(60));
                    assert_ne!(trip.status, TripStatus::Cancelled);
                }
                _ => {
                    assert!(d.delivered.is_none());
                    assert!(!d.recipient_signature);
                }
            }
            if trip.status == TripStatus::Cancelled {
                assert_ne!(d.status, DeliveryStatus::Delivered);
            }
        }
    }

    #[test]
    fn test_schedule_sorted_within_trip() {
        let mut rng = StdRng::seed_from_u64(23);
        let trips = trips(300, &mut rng);
        let deliveries = DeliveryGenerator::new()
            .generate_batch(&trips, 1_200, &mut rng)
            .unwrap();

        for pair in deliveries.windows(2) {
            if pair[0].trip_id == pair[1].trip_id {
                assert!(pair[0].scheduled <= pair[1].scheduled);
            }
        }
    }

    #[test]
    fn test_tracking_numbers_unique() {
        let mut rng = StdRng::seed_from_u64(24);
        let trips = trips(300, &mut rng);
        let deliveries = DeliveryGenerator::new()
            .generate_batch(&trips, 1_500, &mut rng)
            .unwrap();

        let numbers: HashSet<_> = deliveries.iter().map(|d| &d.tracking_number).collect();
        assert_eq!(numbers.len(), deliveries.len());
        assert!(deliveries[0].tracking_number.starts_with("DOM00000101"));
        assert!(deliveries.iter().all(|d| d.tracking_number.len() == 15));
    }

    #[test]
    fn test_draw_counts_mean() {
        let mut rng = StdRng::seed_from_u64(25);
        let counts = draw_counts(20_000, &mut rng).unwrap();
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;

        assert!((mean - 4.0).abs() < 0.05, "mean = {mean}");
        assert!(counts.iter().all(|c| (2..=6).contains(c)));
    }

    #[test]
    fn test_split_weight_floor_and_clamp() {
        let weights = split_weight(0.25, vec![0.98, 0.01, 0.01]);
        assert!(weights.iter().all(|w| *w >= MIN_PACKAGE_KG));

        let weights = split_weight(1000.0, vec![0.5, 0.3, 0.2]);
        assert_eq!(weights, vec![500.0, 300.0, 200.0]);

        let weights = split_weight(10.0, vec![0.9995, 0.0005]);
        assert_eq!(weights[1], MIN_PACKAGE_KG);
        assert!(weights.iter().sum::<f64>() <= 10.0 + 1e-9);
    }

    #[test]
    fn test_unreachable_target() {
        let mut rng = StdRng::seed_from_u64(26);
        let trips = trips(10, &mut rng);
        assert!(
            DeliveryGenerator::new()
                .generate_batch(&trips, 61, &mut rng)
                .is_err()
        );
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut rng = StdRng::seed_from_u64(9);
        let trips = trips(20, &mut rng);

        let inverted = DeliveryGenerator::with_config(DeliveryGenConfig {
            open_trip_offset_hours: (8, 1),
            ..Default::default()
        });
        assert!(matches!(
            inverted.generate_batch(&trips, 80, &mut rng),
            Err(GenerationError::InvalidConfig(msg)) if msg.contains("open_trip_offset_hours")
        ));

        let negative_delay = DeliveryGenerator::with_config(DeliveryGenConfig {
            max_delivery_delay_minutes: -5,
            ..Default::default()
        });
        assert!(negative_delay.generate_batch(&trips, 80, &mut rng).is_err());
    }
}
