//! Exact-total reconciliation of per-unit counts.
//!
//! Sampled counts (deliveries per trip, maintenance records per vehicle) only
//! approximate their configured totals. [`reconcile`] nudges randomly chosen
//! units up or down by one until the sum hits the target exactly, never
//! leaving the `[min, max]` band.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::errors::GenerationError;

/// Adjusts `counts` so that they sum to exactly `target`.
///
/// Every unit must already lie in `min..=max`, and `target` must be reachable
/// (`n * min <= target <= n * max`). Units are chosen uniformly among those
/// still able to move, so no single unit absorbs the whole correction.
pub fn reconcile(
    mut counts: Vec<usize>,
    target: usize,
    min: usize,
    max: usize,
    rng: &mut impl Rng,
) -> Result<Vec<usize>, GenerationError> {
    if let Some((index, &count)) = counts
        .iter()
        .enumerate()
        .find(|(_, c)| **c < min || **c > max)
    {
        return Err(GenerationError::UnitOutOfBounds {
            index,
            count,
            min,
            max,
        });
    }

    let units = counts.len();
    let floor = units.saturating_mul(min);
    let ceiling = units.saturating_mul(max);
    if target < floor || target > ceiling {
        return Err(GenerationError::Unreconcilable {
            units,
            target,
            floor,
            ceiling,
        });
    }

    let mut total: usize = counts.iter().sum();

    while total < target {
        let mut open: Vec<usize> = (0..units).filter(|i| counts[*i] < max).collect();
        open.shuffle(rng);
        for i in open.into_iter().take(target - total) {
            counts[i] += 1;
            total += 1;
        }
    }

    while total > target {
        let mut open: Vec<usize> = (0..units).filter(|i| counts[*i] > min).collect();
        open.shuffle(rng);
        for i in open.into_iter().take(total - target) {
            counts[i] -= 1;
            total -= 1;
        }
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    #[test]
    fn test_raises_to_target() {
        let counts = reconcile(vec![2, 3, 4, 2], 20, 2, 6, &mut rng()).unwrap();
        assert_eq!(counts.iter().sum::<usize>(), 20);
        assert!(counts.iter().all(|c| (2..=6).contains(c)));
    }

    #[test]
    fn test_lowers_to_target() {
        let counts = reconcile(vec![6, 6, 5, 6], 9, 2, 6, &mut rng()).unwrap();
        assert_eq!(counts.iter().sum::<usize>(), 9);
        assert!(counts.iter().all(|c| (2..=6).contains(c)));
    }

    #[test]
    fn test_already_on_target_is_unchanged() {
        let counts = reconcile(vec![3, 4, 5], 12, 2, 6, &mut rng()).unwrap();
        assert_eq!(counts, vec![3, 4, 5]);
    }

    #[test]
    fn test_extremes_pin_every_unit() {
        assert_eq!(
            reconcile(vec![3, 4, 5], 18, 2, 6, &mut rng()).unwrap(),
            vec![6, 6, 6]
        );
        assert_eq!(
            reconcile(vec![3, 4, 5], 6, 2, 6, &mut rng()).unwrap(),
            vec![2, 2, 2]
        );
    }

    #[test]
    fn test_unbounded_ceiling() {
        let counts = reconcile(vec![1, 1, 1, 1], 2_000, 1, usize::MAX, &mut rng()).unwrap();
        assert_eq!(counts.iter().sum::<usize>(), 2_000);
        assert!(counts.iter().all(|c| *c >= 1));
    }

    #[test]
    fn test_correction_is_spread() {
        let counts = reconcile(vec![2; 100], 300, 2, 6, &mut rng()).unwrap();
        // A +100 correction over 100 units touches each unit exactly once.
        assert!(counts.iter().all(|c| *c == 3));
    }

    #[test]
    fn test_unreachable_target() {
        let result = reconcile(vec![2, 2], 13, 2, 6, &mut rng());
        assert!(matches!(
            result,
            Err(GenerationError::Unreconcilable {
                units: 2,
                target: 13,
                floor: 4,
                ceiling: 12
            })
        ));
        assert!(reconcile(vec![2, 2], 3, 2, 6, &mut rng()).is_err());
    }

    #[test]
    fn test_unit_out_of_bounds() {
        let result = reconcile(vec![2, 7, 3], 10, 2, 6, &mut rng());
        assert!(matches!(
            result,
            Err(GenerationError::UnitOutOfBounds { index: 1, count: 7, .. })
        ));
    }
}
