use rand::Rng;

/// Number of resampling draws used when the caller has no opinion.
/// Also the assumed sample size for the blender's confidence interval.
pub const DEFAULT_SIMULATIONS: usize = 20_000;

/// Empirical estimate of P(points > threshold) by resampling the player's
/// historical point totals uniformly with replacement.
///
/// Resampling keeps the irregular shape of real scoring distributions
/// (injuries, blowouts, role changes) instead of forcing a parametric fit.
/// Returns None for an empty history; callers must treat that as "no data",
/// not as a zero probability.
pub fn monte_carlo_over_probability(
    history: &[f64],
    threshold: f64,
    simulations: usize,
) -> Option<f64> {
    monte_carlo_with_rng(history, threshold, simulations, &mut rand::thread_rng())
}

/// Same as [`monte_carlo_over_probability`] with an injected random source,
/// so tests can run seeded.
pub fn monte_carlo_with_rng<R: Rng>(
    history: &[f64],
    threshold: f64,
    simulations: usize,
    rng: &mut R,
) -> Option<f64> {
    if history.is_empty() || simulations == 0 {
        return None;
    }

    let mut over = 0usize;
    for _ in 0..simulations {
        let draw = history[rng.gen_range(0..history.len())];
        if draw > threshold {
            over += 1;
        }
    }
    Some(over as f64 / simulations as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::poisson::poisson_over_probability;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_history_is_no_data() {
        assert!(monte_carlo_over_probability(&[], 15.0, 1000).is_none());
    }

    #[test]
    fn test_all_under_and_all_over() {
        let mut rng = StdRng::seed_from_u64(7);
        let low = monte_carlo_with_rng(&[5.0, 6.0, 7.0], 10.0, 5000, &mut rng).unwrap();
        assert_eq!(low, 0.0);
        let high = monte_carlo_with_rng(&[20.0, 25.0, 30.0], 10.0, 5000, &mut rng).unwrap();
        assert_eq!(high, 1.0);
    }

    #[test]
    fn test_threshold_comparison_is_strict() {
        // Every game landed exactly on the line, so nothing counts as over
        let mut rng = StdRng::seed_from_u64(11);
        let p = monte_carlo_with_rng(&[20.0, 20.0, 20.0], 20.0, 5000, &mut rng).unwrap();
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_matches_empirical_fraction() {
        // 6 of 11 values exceed 15, so the estimate should sit near 6/11
        let history = [
            10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0, 24.0, 26.0, 28.0, 30.0,
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let p = monte_carlo_with_rng(&history, 15.0, 20_000, &mut rng).unwrap();
        assert!((p - 6.0 / 11.0).abs() < 0.02, "p={}", p);
    }

    /// Draw one Poisson(lambda) sample via Knuth's product method
    fn sample_poisson(lambda: f64, rng: &mut StdRng) -> f64 {
        let limit = (-lambda).exp();
        let mut product: f64 = rng.gen();
        let mut count = 0u32;
        while product > limit {
            product *= rng.gen::<f64>();
            count += 1;
        }
        count as f64
    }

    #[test]
    fn test_converges_to_poisson_on_poisson_history() {
        // With history drawn from a true Poisson(20), the resampled tail
        // should land near the closed-form value at the same line
        let lambda = 20.0;
        let threshold = 18.0;
        let mut rng = StdRng::seed_from_u64(1234);
        let history: Vec<f64> = (0..5000).map(|_| sample_poisson(lambda, &mut rng)).collect();

        let mc = monte_carlo_with_rng(&history, threshold, 50_000, &mut rng).unwrap();
        let closed_form = poisson_over_probability(lambda, threshold).unwrap();
        assert!(
            (mc - closed_form).abs() < 0.03,
            "mc={} poisson={}",
            mc,
            closed_form
        );
    }
}
