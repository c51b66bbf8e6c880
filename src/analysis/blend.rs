use crate::models::{BlendedResult, ConfidenceInterval, EstimatorKind, ProbabilityEstimate};

/// Weight given to the Monte Carlo estimate when both estimators produced
/// a probability. The empirical estimate is trusted slightly more than the
/// parametric one.
pub const DEFAULT_MC_WEIGHT: f64 = 0.6;

/// Weighted blend of the two component probabilities.
/// With only one present, that one is returned unweighted; with neither,
/// there is no signal to report.
pub fn blend_probabilities(
    poisson: Option<f64>,
    monte_carlo: Option<f64>,
    w_mc: f64,
) -> Option<f64> {
    match (poisson, monte_carlo) {
        (Some(p), Some(mc)) => Some(w_mc * mc + (1.0 - w_mc) * p),
        (Some(p), None) => Some(p),
        (None, Some(mc)) => Some(mc),
        (None, None) => None,
    }
}

/// Provenance-aware blend: estimates are routed to their slot by source tag
pub fn blend_estimates(estimates: &[ProbabilityEstimate], w_mc: f64) -> Option<f64> {
    let poisson = estimates
        .iter()
        .find(|e| e.source == EstimatorKind::Poisson)
        .map(|e| e.value);
    let monte_carlo = estimates
        .iter()
        .find(|e| e.source == EstimatorKind::MonteCarlo)
        .map(|e| e.value);
    blend_probabilities(poisson, monte_carlo, w_mc)
}

/// 95% Wald interval under the normal approximation, clamped to [0,1].
/// `n` is the assumed sample size behind the estimate (the Monte Carlo
/// simulation count). A rough band for display, not a rigorous guarantee.
pub fn wald_interval(p: f64, n: usize) -> ConfidenceInterval {
    let se = (p * (1.0 - p) / n as f64).sqrt();
    ConfidenceInterval {
        lower: (p - 1.96 * se).max(0.0),
        upper: (p + 1.96 * se).min(1.0),
    }
}

/// Blend the component probabilities and attach the confidence band
pub fn blend_with_interval(
    poisson: Option<f64>,
    monte_carlo: Option<f64>,
    w_mc: f64,
    sample_size: usize,
) -> Option<BlendedResult> {
    let mut estimates = Vec::with_capacity(2);
    if let Some(p) = poisson {
        estimates.push(ProbabilityEstimate {
            value: p,
            source: EstimatorKind::Poisson,
        });
    }
    if let Some(mc) = monte_carlo {
        estimates.push(ProbabilityEstimate {
            value: mc,
            source: EstimatorKind::MonteCarlo,
        });
    }
    let blended = blend_estimates(&estimates, w_mc)?;
    Some(BlendedResult {
        blended_probability: blended,
        confidence_interval: wald_interval(blended, sample_size),
        poisson_probability: poisson,
        monte_carlo_probability: monte_carlo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_weights_both_estimates() {
        // 0.6 * 0.5 + 0.4 * 0.7 = 0.58
        let blended = blend_probabilities(Some(0.7), Some(0.5), 0.6).unwrap();
        assert!((blended - 0.58).abs() < 1e-12);
    }

    #[test]
    fn test_blend_falls_back_to_single_estimate() {
        assert_eq!(blend_probabilities(None, Some(0.5), 0.6), Some(0.5));
        assert_eq!(blend_probabilities(Some(0.7), None, 0.6), Some(0.7));
        assert_eq!(blend_probabilities(None, None, 0.6), None);
    }

    #[test]
    fn test_blend_estimates_routes_by_provenance() {
        let estimates = [
            ProbabilityEstimate {
                value: 0.5,
                source: EstimatorKind::MonteCarlo,
            },
            ProbabilityEstimate {
                value: 0.7,
                source: EstimatorKind::Poisson,
            },
        ];
        let blended = blend_estimates(&estimates, 0.6).unwrap();
        assert!((blended - 0.58).abs() < 1e-12);
    }

    #[test]
    fn test_interval_brackets_the_estimate() {
        for p in [0.02, 0.25, 0.5, 0.75, 0.98] {
            let ci = wald_interval(p, 20_000);
            assert!(ci.lower <= p && p <= ci.upper);
            assert!(ci.lower >= 0.0 && ci.upper <= 1.0);
        }
    }

    #[test]
    fn test_interval_clamps_near_the_edges() {
        // Small n widens the band enough to hit both clamps
        let ci = wald_interval(0.98, 50);
        assert!((ci.upper - 1.0).abs() < 1e-12);
        let ci = wald_interval(0.02, 50);
        assert!(ci.lower.abs() < 1e-12);
    }

    #[test]
    fn test_blend_with_interval_carries_components() {
        let result = blend_with_interval(Some(0.7), Some(0.5), 0.6, 20_000).unwrap();
        assert!((result.blended_probability - 0.58).abs() < 1e-12);
        assert_eq!(result.poisson_probability, Some(0.7));
        assert_eq!(result.monte_carlo_probability, Some(0.5));
        assert!(result.confidence_interval.lower <= result.blended_probability);
        assert!(result.blended_probability <= result.confidence_interval.upper);
    }
}
