//! Route generation over the city distance table.

use rand::Rng;
use serde::Serialize;
use tracing::info;

use fleetlogix::catalog::city_pairs;

use crate::distributions::round2;
use crate::errors::GenerationError;
use crate::generators::index::Keyed;

/// Generated route ready for database insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedRoute {
    pub id: i32,
    pub route_code: String,
    pub origin_city: String,
    pub destination_city: String,
    pub distance_km: f64,
    pub estimated_duration_hours: f64,
    pub toll_cost: f64,
}

impl Keyed for GeneratedRoute {
    const TABLE: &'static str = "routes";

    fn id(&self) -> i32 {
        self.id
    }
}

/// Configuration for route generation.
#[derive(Debug, Clone)]
pub struct RouteGenConfig {
    /// Multiplicative band applied to the base city-pair distance.
    pub distance_jitter: (f64, f64),
    /// Average speed band in km/h.
    pub speed_kmh: (f64, f64),
    /// Toll per 50 km is drawn from this multiplier band.
    pub toll_multiplier: (f64, f64),
}

impl Default for RouteGenConfig {
    fn default() -> Self {
        Self {
            distance_jitter: (0.9, 1.1),
            speed_kmh: (55.0, 65.0),
            toll_multiplier: (0.5, 1.5),
        }
    }
}

/// Generates the route master table.
pub struct RouteGenerator {
    config: RouteGenConfig,
}

impl RouteGenerator {
    /// Creates a new route generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: RouteGenConfig::default(),
        }
    }

    /// Creates a route generator with custom sampling bands.
    pub fn with_config(config: RouteGenConfig) -> Self {
        Self { config }
    }

    /// Cycles through the ordered city pairs until `count` routes exist.
    pub fn generate_batch(
        &self,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedRoute>, GenerationError> {
        let pairs: Vec<_> = city_pairs().collect();
        if pairs.is_empty() {
            return Err(GenerationError::InvalidConfig(
                "distance table has no city pairs".into(),
            ));
        }

        let (jitter_lo, jitter_hi) = self.config.distance_jitter;
        let (speed_lo, speed_hi) = self.config.speed_kmh;
        let (toll_lo, toll_hi) = self.config.toll_multiplier;

        let mut routes = Vec::with_capacity(count);
        for (origin, destination, base_km) in pairs.iter().cycle().take(count) {
            let distance_km = round2(base_km * rng.gen_range(jitter_lo..=jitter_hi));
            let speed = rng.gen_range(speed_lo..=speed_hi);
            let toll_cost = round2(distance_km / 50.0 * rng.gen_range(toll_lo..=toll_hi));

            let id = routes.len() as i32 + 1;
            routes.push(GeneratedRoute {
                id,
                route_code: format!("RT-{id:03}"),
                origin_city: origin.to_string(),
                destination_city: destination.to_string(),
                distance_km,
                estimated_duration_hours: round2(distance_km / speed),
                toll_cost,
            });
        }

        if let (Some(shortest), Some(longest)) = (
            routes.iter().map(|r| r.distance_km).reduce(f64::min),
            routes.iter().map(|r| r.distance_km).reduce(f64::max),
        ) {
            info!(
                "Generated {} routes ({:.0}-{:.0} km)",
                routes.len(),
                shortest,
                longest
            );
        }

        Ok(routes)
    }
}

impl Default for RouteGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetlogix::catalog::base_distance_km;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_route_codes_and_pairs() {
        let mut rng = StdRng::seed_from_u64(42);
        let routes = RouteGenerator::new().generate_batch(50, &mut rng).unwrap();

        assert_eq!(routes.len(), 50);
        assert_eq!(routes[0].route_code, "RT-001");
        assert_eq!(routes[49].route_code, "RT-050");
        assert!(routes.iter().all(|r| r.origin_city != r.destination_city));

        // 20 ordered pairs, so route 21 repeats route 1's pair.
        assert_eq!(routes[0].origin_city, routes[20].origin_city);
        assert_eq!(routes[0].destination_city, routes[20].destination_city);
    }

    #[test]
    fn test_distance_near_base() {
        let mut rng = StdRng::seed_from_u64(8);
        let routes = RouteGenerator::new().generate_batch(40, &mut rng).unwrap();

        for r in &routes {
            let base = base_distance_km(&r.origin_city, &r.destination_city).unwrap();
            assert!(r.distance_km >= round2(base * 0.9) && r.distance_km <= round2(base * 1.1));
            assert!(r.distance_km > 0.0 && r.distance_km <= 500.0);
        }
    }

    #[test]
    fn test_duration_follows_speed_band() {
        let mut rng = StdRng::seed_from_u64(9);
        let routes = RouteGenerator::new().generate_batch(20, &mut rng).unwrap();

        for r in &routes {
            let speed = r.distance_km / r.estimated_duration_hours;
            assert!(speed > 54.0 && speed < 66.5, "speed {speed} for {r:?}");
            assert!(r.toll_cost > 0.0);
        }
    }
}
