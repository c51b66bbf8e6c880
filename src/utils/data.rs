use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;

use crate::models::{PropAnalysis, ScoringObservation, VolatilitySignal};

/// Save fetched game logs to a JSON cache file
pub fn save_game_logs_to_cache(
    observations: &[ScoringObservation],
    cache_file: &str,
) -> Result<()> {
    let json =
        serde_json::to_string_pretty(observations).context("Failed to serialize game logs")?;
    if let Some(parent) = std::path::Path::new(cache_file).parent() {
        std::fs::create_dir_all(parent).context("Failed to create cache directory")?;
    }
    std::fs::write(cache_file, json).context("Failed to write cache file")?;
    Ok(())
}

/// Load game logs from a JSON cache file
pub fn load_game_logs_from_cache(cache_file: &str) -> Result<Vec<ScoringObservation>> {
    let json = std::fs::read_to_string(cache_file).context("Failed to read cache file")?;
    let observations: Vec<ScoringObservation> =
        serde_json::from_str(&json).context("Failed to deserialize game logs")?;
    Ok(observations)
}

fn volatility_cell(signal: &VolatilitySignal) -> String {
    match signal {
        VolatilitySignal::Forecast(sigma) => format!("{:.3}", sigma),
        VolatilitySignal::NoSignal => "no_signal".to_string(),
        VolatilitySignal::Unavailable => "unavailable".to_string(),
    }
}

/// Save analysis results to CSV
pub fn save_analyses_to_csv(analyses: &[PropAnalysis], filename: &str) -> Result<()> {
    let mut file = File::create(filename).context("Failed to create CSV file")?;

    // Write CSV header
    writeln!(
        file,
        "Player,Threshold,Blended Probability (%),CI Lower (%),CI Upper (%),Poisson (%),Monte Carlo (%),Regular Season Volatility,Playoff Volatility"
    )?;

    // Write each analysis
    for analysis in analyses {
        let (blended, lower, upper, poisson, monte_carlo) = match &analysis.probability {
            Some(result) => (
                format!("{:.2}", result.blended_probability * 100.0),
                format!("{:.2}", result.confidence_interval.lower * 100.0),
                format!("{:.2}", result.confidence_interval.upper * 100.0),
                result
                    .poisson_probability
                    .map(|p| format!("{:.2}", p * 100.0))
                    .unwrap_or_default(),
                result
                    .monte_carlo_probability
                    .map(|p| format!("{:.2}", p * 100.0))
                    .unwrap_or_default(),
            ),
            None => (
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ),
        };

        writeln!(
            file,
            "{},{:.1},{},{},{},{},{},{},{}",
            analysis.player_name,
            analysis.threshold,
            blended,
            lower,
            upper,
            poisson,
            monte_carlo,
            volatility_cell(&analysis.regular_season_volatility),
            analysis
                .playoff_volatility
                .as_ref()
                .map(volatility_cell)
                .unwrap_or_default()
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameCategory;
    use chrono::NaiveDate;

    #[test]
    fn test_game_log_cache_round_trip() {
        let observations = vec![
            ScoringObservation {
                date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
                points: 31,
                category: GameCategory::RegularSeason,
            },
            ScoringObservation {
                date: NaiveDate::from_ymd_opt(2025, 4, 22).unwrap(),
                points: 27,
                category: GameCategory::Playoff,
            },
        ];
        let dir = std::env::temp_dir().join("nba_prop_model_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("game_logs.json");
        let path = path.to_str().unwrap();

        save_game_logs_to_cache(&observations, path).unwrap();
        let loaded = load_game_logs_from_cache(path).unwrap();
        assert_eq!(loaded, observations);
    }
}
