use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Which slice of the schedule a game belongs to.
/// Regular-season and playoff scoring are kept as separate series
/// because their volatility is forecast independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCategory {
    RegularSeason,
    Playoff,
}

/// One game's point total for a player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringObservation {
    pub date: NaiveDate,
    pub points: u32,
    pub category: GameCategory,
}

/// A chronologically ordered scoring history for one player (oldest first).
/// The constructor sorts by date and rejects duplicate dates, so downstream
/// differencing can assume a clean, ordered series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSeries {
    observations: Vec<ScoringObservation>,
}

impl ScoringSeries {
    pub fn new(mut observations: Vec<ScoringObservation>) -> Result<Self, AnalysisError> {
        observations.sort_by_key(|obs| obs.date);
        for pair in observations.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(AnalysisError::InvalidInput(format!(
                    "duplicate game date in scoring series: {}",
                    pair[0].date
                )));
            }
        }
        Ok(Self { observations })
    }

    pub fn empty() -> Self {
        Self {
            observations: Vec::new(),
        }
    }

    pub fn observations(&self) -> &[ScoringObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Point totals in chronological order
    pub fn points(&self) -> Vec<f64> {
        self.observations
            .iter()
            .map(|obs| obs.points as f64)
            .collect()
    }

    /// The last `n` point totals (or the whole series when shorter),
    /// still in chronological order
    pub fn recent_points(&self, n: usize) -> Vec<f64> {
        let start = self.observations.len().saturating_sub(n);
        self.observations[start..]
            .iter()
            .map(|obs| obs.points as f64)
            .collect()
    }

    /// Mean points per game, or None for an empty series
    pub fn average_points(&self) -> Option<f64> {
        if self.observations.is_empty() {
            return None;
        }
        let total: u32 = self.observations.iter().map(|obs| obs.points).sum();
        Some(total as f64 / self.observations.len() as f64)
    }
}

/// Which estimator produced a probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimatorKind {
    Poisson,
    MonteCarlo,
}

/// A probability in [0,1] tagged with its producing estimator,
/// so the blender can weight the two sources differently
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityEstimate {
    pub value: f64,
    pub source: EstimatorKind,
}

/// 95% confidence band around a blended probability, clamped to [0,1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Blended over-probability with its confidence band and the
/// component estimates it was built from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendedResult {
    pub blended_probability: f64,
    pub confidence_interval: ConfidenceInterval,
    pub poisson_probability: Option<f64>,
    pub monte_carlo_probability: Option<f64>,
}

/// Outcome of one volatility forecast.
///
/// `NoSignal` is the expected short-history case (fewer than 10 score
/// differences); `Unavailable` means the GARCH fit itself broke and the
/// figure must not be read as "zero volatility".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VolatilitySignal {
    Forecast(f64),
    NoSignal,
    Unavailable,
}

impl VolatilitySignal {
    /// The forecasted standard deviation, if one was computed
    pub fn value(&self) -> Option<f64> {
        match self {
            VolatilitySignal::Forecast(sigma) => Some(*sigma),
            VolatilitySignal::NoSignal | VolatilitySignal::Unavailable => None,
        }
    }
}

/// Everything the pipeline needs to evaluate one over/under proposition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPropRequest {
    pub player_name: String,
    pub regular_season: ScoringSeries,
    pub playoffs: ScoringSeries,
    /// Season scoring average, if known from an upstream source.
    /// Falls back to the regular-season series mean when absent.
    pub season_avg_points: Option<f64>,
    /// The over/under line for the proposition
    pub threshold: f64,
}

/// Composite result for one proposition. Each field degrades
/// independently when its inputs are missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropAnalysis {
    pub player_name: String,
    pub threshold: f64,
    pub probability: Option<BlendedResult>,
    pub regular_season_volatility: VolatilitySignal,
    /// Absent (None) when the player has fewer than 5 playoff games
    pub playoff_volatility: Option<VolatilitySignal>,
}

impl PropAnalysis {
    /// Human-readable one-line summary for CLI output
    pub fn format(&self) -> String {
        let prob_part = match &self.probability {
            Some(result) => format!(
                "P(over {:.1}) = {:.1}% (95% CI {:.1}%-{:.1}%)",
                self.threshold,
                result.blended_probability * 100.0,
                result.confidence_interval.lower * 100.0,
                result.confidence_interval.upper * 100.0
            ),
            None => format!("P(over {:.1}) unavailable (no data)", self.threshold),
        };
        let vol_part = match self.regular_season_volatility {
            VolatilitySignal::Forecast(sigma) => format!("volatility {:.2} pts", sigma),
            VolatilitySignal::NoSignal => "volatility n/a (short history)".to_string(),
            VolatilitySignal::Unavailable => "volatility unavailable (fit failed)".to_string(),
        };
        let playoff_part = match self.playoff_volatility {
            Some(VolatilitySignal::Forecast(sigma)) => {
                format!(", playoff volatility {:.2} pts", sigma)
            }
            Some(VolatilitySignal::NoSignal) => ", playoff volatility n/a".to_string(),
            Some(VolatilitySignal::Unavailable) => ", playoff volatility unavailable".to_string(),
            None => String::new(),
        };
        format!(
            "{}: {} | {}{}",
            self.player_name, prob_part, vol_part, playoff_part
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(day: u32, points: u32) -> ScoringObservation {
        ScoringObservation {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            points,
            category: GameCategory::RegularSeason,
        }
    }

    #[test]
    fn test_series_sorts_chronologically() {
        let series = ScoringSeries::new(vec![obs(20, 30), obs(5, 10), obs(12, 20)]).unwrap();
        assert_eq!(series.points(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_series_rejects_duplicate_dates() {
        let result = ScoringSeries::new(vec![obs(5, 10), obs(5, 12)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_recent_points_window() {
        let series =
            ScoringSeries::new(vec![obs(1, 10), obs(2, 20), obs(3, 30), obs(4, 40)]).unwrap();
        assert_eq!(series.recent_points(2), vec![30.0, 40.0]);
        // Window larger than the series returns everything
        assert_eq!(series.recent_points(10).len(), 4);
    }

    #[test]
    fn test_average_points() {
        let series = ScoringSeries::new(vec![obs(1, 10), obs(2, 20)]).unwrap();
        assert!((series.average_points().unwrap() - 15.0).abs() < 1e-9);
        assert!(ScoringSeries::empty().average_points().is_none());
    }
}
