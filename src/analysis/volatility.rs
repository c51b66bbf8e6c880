use crate::error::AnalysisError;

/// Minimum number of game-to-game differences needed before a conditional
/// variance fit says anything; below this the forecast is the 0.0 sentinel.
pub const MIN_DIFFERENCES: usize = 10;

/// Playoff volatility is only forecast once a player has this many playoff
/// games. Below the gate the figure is omitted entirely, not zeroed.
pub const MIN_PLAYOFF_GAMES: usize = 5;

const VARIANCE_FLOOR: f64 = 1e-12;
const STATIONARITY_CAP: f64 = 0.995;

/// Consecutive game-to-game point differences (game[i] - game[i-1])
pub fn first_differences(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

/// Fitted GARCH(1,1) parameters: sigma2_t = omega + alpha * e_{t-1}^2 + beta * sigma2_{t-1}
#[derive(Debug, Clone, Copy)]
struct GarchParams {
    omega: f64,
    alpha: f64,
    beta: f64,
}

/// One-step-ahead volatility forecast for a chronologically ordered series
/// of per-game point totals.
///
/// The series is first-differenced and demeaned, then a GARCH(1,1) model is
/// fit by Gaussian maximum likelihood and the square root of the forecasted
/// conditional variance is returned. Fewer than 10 differences, or a series
/// with no variance at all, yields Ok(0.0). A non-finite likelihood is a
/// NumericalFailure, kept distinct from the short-history sentinel.
pub fn forecast_volatility(series: &[f64]) -> Result<f64, AnalysisError> {
    if series.iter().any(|value| !value.is_finite()) {
        return Err(AnalysisError::InvalidInput(
            "scoring series contains non-finite values".to_string(),
        ));
    }

    let diffs = first_differences(series);
    if diffs.len() < MIN_DIFFERENCES {
        return Ok(0.0);
    }

    let mean = diffs.iter().sum::<f64>() / diffs.len() as f64;
    let residuals: Vec<f64> = diffs.iter().map(|diff| diff - mean).collect();
    let sample_var =
        residuals.iter().map(|e| e * e).sum::<f64>() / residuals.len() as f64;

    // A flat (or perfectly linear) scoring series has nothing to fit
    if sample_var < 1e-9 {
        return Ok(0.0);
    }

    let params = fit_garch(&residuals, sample_var)?;
    Ok(forecast_sigma(&params, &residuals, sample_var))
}

/// Playoff variant of [`forecast_volatility`], gated on the player having
/// at least [`MIN_PLAYOFF_GAMES`] playoff appearances. Returns Ok(None)
/// below the gate.
pub fn forecast_playoff_volatility(
    series: &[f64],
    playoff_game_count: usize,
) -> Result<Option<f64>, AnalysisError> {
    if playoff_game_count < MIN_PLAYOFF_GAMES {
        return Ok(None);
    }
    forecast_volatility(series).map(Some)
}

/// Negative Gaussian log-likelihood (up to a constant) of the residuals
/// under GARCH(1,1) with omega tied to the sample variance
/// (variance targeting: omega = sample_var * (1 - alpha - beta)).
fn garch_nll(residuals: &[f64], sample_var: f64, alpha: f64, beta: f64) -> f64 {
    let omega = sample_var * (1.0 - alpha - beta);
    let mut variance = sample_var;
    let mut nll = 0.0;
    for (t, &e) in residuals.iter().enumerate() {
        if t > 0 {
            let prev = residuals[t - 1];
            variance = omega + alpha * prev * prev + beta * variance;
        }
        let var = variance.max(VARIANCE_FLOOR);
        nll += var.ln() + e * e / var;
    }
    nll
}

/// Coarse grid search over (alpha, beta) followed by step-halving
/// coordinate descent. The stationarity constraint alpha + beta < 1 is
/// enforced throughout so the implied omega stays non-negative.
fn fit_garch(residuals: &[f64], sample_var: f64) -> Result<GarchParams, AnalysisError> {
    let mut best_alpha = 0.05;
    let mut best_beta = 0.80;
    let mut best_nll = f64::INFINITY;

    for alpha_step in 0..7 {
        let alpha = 0.02 + 0.05 * alpha_step as f64;
        for beta_step in 0..10 {
            let beta = 0.05 + 0.10 * beta_step as f64;
            if alpha + beta >= STATIONARITY_CAP {
                continue;
            }
            let nll = garch_nll(residuals, sample_var, alpha, beta);
            if nll < best_nll {
                best_nll = nll;
                best_alpha = alpha;
                best_beta = beta;
            }
        }
    }

    // Local refinement around the best grid point
    let mut step = 0.05;
    while step > 1e-5 {
        let mut improved = false;
        let candidates = [
            (best_alpha + step, best_beta),
            (best_alpha - step, best_beta),
            (best_alpha, best_beta + step),
            (best_alpha, best_beta - step),
        ];
        for (alpha, beta) in candidates {
            if alpha < 1e-4 || beta < 1e-4 || alpha + beta >= STATIONARITY_CAP {
                continue;
            }
            let nll = garch_nll(residuals, sample_var, alpha, beta);
            if nll < best_nll {
                best_nll = nll;
                best_alpha = alpha;
                best_beta = beta;
                improved = true;
            }
        }
        if !improved {
            step *= 0.5;
        }
    }

    if !best_nll.is_finite() {
        return Err(AnalysisError::NumericalFailure(
            "GARCH likelihood did not converge to a finite value".to_string(),
        ));
    }

    Ok(GarchParams {
        omega: sample_var * (1.0 - best_alpha - best_beta),
        alpha: best_alpha,
        beta: best_beta,
    })
}

/// Run the variance recursion over the fitted sample and step it one game
/// ahead; the forecast is the square root of that conditional variance.
fn forecast_sigma(params: &GarchParams, residuals: &[f64], sample_var: f64) -> f64 {
    let mut variance = sample_var;
    for t in 1..residuals.len() {
        let prev = residuals[t - 1];
        variance = params.omega + params.alpha * prev * prev + params.beta * variance;
    }
    let last = residuals[residuals.len() - 1];
    let next_variance = params.omega + params.alpha * last * last + params.beta * variance;
    next_variance.max(0.0).sqrt()
}
