use tracing::warn;

use crate::analysis::blend::{blend_with_interval, DEFAULT_MC_WEIGHT};
use crate::analysis::monte_carlo::{monte_carlo_over_probability, DEFAULT_SIMULATIONS};
use crate::analysis::poisson::poisson_over_probability;
use crate::analysis::volatility::{
    forecast_volatility, MIN_DIFFERENCES, MIN_PLAYOFF_GAMES,
};
use crate::error::AnalysisError;
use crate::models::{BlendedResult, PlayerPropRequest, PropAnalysis, VolatilitySignal};

/// How many of the most recent games feed the Monte Carlo resampler
pub const RECENT_GAMES_WINDOW: usize = 50;

/// Function-call boundary for the probability half of the pipeline:
/// Poisson on the season average, Monte Carlo on the history, blended with
/// a confidence band. Returns Ok(None) when neither input is usable.
/// A malformed threshold or scoring average is a hard InvalidInput.
pub fn estimate_probability(
    threshold: f64,
    average_points: Option<f64>,
    history: Option<&[f64]>,
) -> Result<Option<BlendedResult>, AnalysisError> {
    if !threshold.is_finite() {
        return Err(AnalysisError::InvalidInput(format!(
            "threshold must be finite, got {}",
            threshold
        )));
    }
    if let Some(points) = history {
        if points.iter().any(|value| !value.is_finite()) {
            return Err(AnalysisError::InvalidInput(
                "scoring history contains non-finite values".to_string(),
            ));
        }
    }

    let poisson = match average_points {
        Some(avg) => Some(poisson_over_probability(avg, threshold)?),
        None => None,
    };
    let monte_carlo = history
        .and_then(|points| monte_carlo_over_probability(points, threshold, DEFAULT_SIMULATIONS));

    Ok(blend_with_interval(
        poisson,
        monte_carlo,
        DEFAULT_MC_WEIGHT,
        DEFAULT_SIMULATIONS,
    ))
}

/// Full per-player pipeline: probability blend plus regular-season and
/// (gated) playoff volatility.
///
/// Only a malformed threshold aborts the call. Every estimator-level
/// problem degrades its own field: a bad season average drops the Poisson
/// leg, an empty history drops the Monte Carlo leg, a failed GARCH fit
/// marks the volatility figure unavailable. The composite result is always
/// returned.
pub fn analyze_prop(request: &PlayerPropRequest) -> Result<PropAnalysis, AnalysisError> {
    if !request.threshold.is_finite() {
        return Err(AnalysisError::InvalidInput(format!(
            "threshold must be finite, got {}",
            request.threshold
        )));
    }

    let season_avg = request
        .season_avg_points
        .or_else(|| request.regular_season.average_points());

    let poisson = match season_avg {
        Some(avg) => match poisson_over_probability(avg, request.threshold) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(player = %request.player_name, error = %e, "skipping Poisson estimate");
                None
            }
        },
        None => None,
    };

    let recent = request.regular_season.recent_points(RECENT_GAMES_WINDOW);
    let monte_carlo =
        monte_carlo_over_probability(&recent, request.threshold, DEFAULT_SIMULATIONS);

    let probability = blend_with_interval(
        poisson,
        monte_carlo,
        DEFAULT_MC_WEIGHT,
        DEFAULT_SIMULATIONS,
    );

    let regular_season_volatility =
        volatility_signal(&request.regular_season.points(), &request.player_name);

    let playoff_volatility = if request.playoffs.len() >= MIN_PLAYOFF_GAMES {
        Some(volatility_signal(
            &request.playoffs.points(),
            &request.player_name,
        ))
    } else {
        None
    };

    Ok(PropAnalysis {
        player_name: request.player_name.clone(),
        threshold: request.threshold,
        probability,
        regular_season_volatility,
        playoff_volatility,
    })
}

/// Classify one volatility run: short series are the expected no-signal
/// case, fit failures are logged and marked unavailable
fn volatility_signal(points: &[f64], player_name: &str) -> VolatilitySignal {
    if points.len() < MIN_DIFFERENCES + 1 {
        return VolatilitySignal::NoSignal;
    }
    match forecast_volatility(points) {
        Ok(sigma) => VolatilitySignal::Forecast(sigma),
        Err(e) => {
            warn!(player = %player_name, error = %e, "volatility forecast failed");
            VolatilitySignal::Unavailable
        }
    }
}
