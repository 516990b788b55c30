//! Hour-of-day demand model for trip departures.
//!
//! A fixed 24-bucket distribution with a dawn lull, a morning peak, a midday
//! trough, a lower afternoon peak and a taper into the night.

use rand::Rng;

use crate::distributions::Categorical;
use crate::errors::GenerationError;

/// Probability of a departure falling in each hour, 00:00 through 23:00.
pub const HOURLY_WEIGHTS: [f64; 24] = [
    0.005, 0.005, 0.005, 0.005, 0.010, 0.020, // 00-05 night
    0.080, 0.085, 0.085, 0.075, // 06-09 morning peak
    0.065, 0.055, // 10-11
    0.040, 0.040, // 12-13 lunch
    0.065, 0.070, 0.070, 0.060, // 14-17 afternoon peak
    0.045, 0.035, 0.025, 0.020, 0.0175, 0.0175, // 18-23 taper
];

/// Returns the hourly weights.
pub fn weights() -> &'static [f64; 24] {
    &HOURLY_WEIGHTS
}

/// Sampler over [`HOURLY_WEIGHTS`].
#[derive(Debug, Clone)]
pub struct HourlyDemand {
    hours: Categorical<u8>,
}

impl HourlyDemand {
    pub fn new() -> Result<Self, GenerationError> {
        let table: Vec<(u8, f64)> = (0u8..24).zip(HOURLY_WEIGHTS).collect();
        Ok(Self {
            hours: Categorical::new("hourly demand", &table)?,
        })
    }

    /// Draws an hour of day in `0..24`.
    pub fn sample_hour(&self, rng: &mut impl Rng) -> u8 {
        self.hours.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = weights().iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "sum = {total}");
        assert!(weights().iter().all(|w| *w >= 0.0));
    }

    #[test]
    fn test_bimodal_shape() {
        let w = weights();
        let argmax = |range: std::ops::Range<usize>| {
            range
                .max_by(|a, b| w[*a].partial_cmp(&w[*b]).unwrap())
                .unwrap()
        };

        let morning_peak = argmax(6..10);
        let afternoon_peak = argmax(14..18);

        // Morning peak is the global maximum, afternoon peak is lower.
        assert!(w[morning_peak] >= w.iter().cloned().fold(0.0, f64::max));
        assert!(w[afternoon_peak] < w[morning_peak]);

        // Midday trough sits below both peaks.
        assert!(w[12] < w[afternoon_peak] && w[13] < w[afternoon_peak]);

        // Pre-dawn hours are near zero.
        assert!(w[..4].iter().all(|x| *x <= 0.005));

        // Evening tapers monotonically.
        for hour in 18..23 {
            assert!(w[hour + 1] <= w[hour], "hour {hour} -> {}", hour + 1);
        }
    }

    #[test]
    fn test_sampled_hours_follow_demand() {
        let demand = HourlyDemand::new().unwrap();
        let mut rng = StdRng::seed_from_u64(12345);

        let mut counts = [0usize; 24];
        for _ in 0..50_000 {
            counts[demand.sample_hour(&mut rng) as usize] += 1;
        }

        let peak = counts[7] + counts[8];
        let night = counts[0] + counts[1] + counts[2] + counts[3];
        assert!(peak > night * 5, "peak {peak} vs night {night}");
        assert!(counts.iter().all(|c| *c > 0));
    }
}
