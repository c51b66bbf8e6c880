use crate::error::AnalysisError;

/// Probability that a Poisson-distributed point total strictly exceeds
/// `threshold`, with the player's scoring average as the mean.
///
/// The tail is 1 minus the CDF summed inclusively to floor(threshold), so a
/// game landing exactly on an integer line does NOT count as over. For a
/// non-integer line like 24.5 this evaluates P(X >= 25). Negative thresholds
/// clamp to the zero term, collapsing to 1 - e^(-lambda).
///
/// Terms are accumulated with a running product rather than explicit
/// factorials, which stays finite for realistic scoring averages.
pub fn poisson_over_probability(
    average_points: f64,
    threshold: f64,
) -> Result<f64, AnalysisError> {
    if !average_points.is_finite() || average_points < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "scoring average must be a non-negative finite number, got {}",
            average_points
        )));
    }
    if !threshold.is_finite() {
        return Err(AnalysisError::InvalidInput(format!(
            "threshold must be finite, got {}",
            threshold
        )));
    }

    let k = threshold.floor().max(0.0) as u64;

    // term_i = e^(-lambda) * lambda^i / i!
    let mut term = (-average_points).exp();
    let mut cdf = term;
    for i in 1..=k {
        term *= average_points / i as f64;
        cdf += term;
    }

    Ok((1.0 - cdf).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_stays_in_unit_interval() {
        for lambda in [0.0, 0.5, 5.0, 25.0, 60.0] {
            for threshold in [-3.0, 0.0, 0.5, 10.0, 24.5, 100.0] {
                let p = poisson_over_probability(lambda, threshold).unwrap();
                assert!((0.0..=1.0).contains(&p), "p={} out of range", p);
            }
        }
    }

    #[test]
    fn test_monotone_non_increasing_in_threshold() {
        let lambda = 22.0;
        let mut prev = 1.0;
        for threshold in 0..60 {
            let p = poisson_over_probability(lambda, threshold as f64).unwrap();
            assert!(p <= prev + 1e-12);
            prev = p;
        }
    }

    #[test]
    fn test_zero_mean_never_goes_over() {
        for threshold in [0.0, 0.5, 1.0, 10.0] {
            let p = poisson_over_probability(0.0, threshold).unwrap();
            assert!(p.abs() < 1e-12);
        }
    }

    #[test]
    fn test_half_point_line_at_season_average() {
        // P(X > 24.5) = P(X >= 25) at lambda = 25; reference CDF
        // gives ppois(24, 25) = 0.4734, so the tail is 0.5266
        let p = poisson_over_probability(25.0, 24.5).unwrap();
        assert!((p - 0.5266).abs() < 0.005, "p={}", p);
    }

    #[test]
    fn test_integer_line_is_strict() {
        // At an integer line the exactly-at-threshold outcome is not over:
        // P(X > 25) = P(X >= 26) < P(X >= 25)
        let at_line = poisson_over_probability(25.0, 25.0).unwrap();
        let half_below = poisson_over_probability(25.0, 24.5).unwrap();
        assert!(at_line < half_below);
        // 1 - ppois(25, 25) = 1 - 0.5529
        assert!((at_line - 0.4471).abs() < 0.005, "p={}", at_line);
    }

    #[test]
    fn test_negative_threshold_collapses_to_one_minus_exp() {
        let lambda = 3.0;
        let p = poisson_over_probability(lambda, -2.0).unwrap();
        assert!((p - (1.0 - (-lambda).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_mean() {
        assert!(poisson_over_probability(-1.0, 10.0).is_err());
        assert!(poisson_over_probability(f64::NAN, 10.0).is_err());
        assert!(poisson_over_probability(f64::INFINITY, 10.0).is_err());
        assert!(poisson_over_probability(20.0, f64::NAN).is_err());
    }
}
