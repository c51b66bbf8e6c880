pub mod analysis;
pub mod api;
pub mod error;
pub mod models;
pub mod utils;

pub use analysis::*;
pub use api::*;
pub use models::*;
pub use utils::*;

use anyhow::{anyhow, Context, Result};
use api::stats_api::StatsApiClient;
use std::path::Path;
use tracing::warn;

use analysis::pipeline::analyze_prop;
use models::{GameCategory, PlayerPropRequest, PropAnalysis, ScoringSeries};
use utils::data::{load_game_logs_from_cache, save_game_logs_to_cache};

/// Fetch a player's game logs (from the API or cache), build the
/// regular-season and playoff series and run the full probability/volatility
/// pipeline for one over/under line.
pub async fn fetch_player_prop_analysis(
    player_name: &str,
    season: u32,
    threshold: f64,
    use_cache: bool,
) -> Result<PropAnalysis> {
    // Load .env file
    dotenv::dotenv().ok();

    // Get API key from environment
    let api_key = std::env::var("STATS_API_KEY").expect("STATS_API_KEY not set in .env file");

    let client = StatsApiClient::new(api_key);

    let player = client
        .search_player(player_name)
        .await
        .context("Failed to search for player")?
        .ok_or_else(|| anyhow!("No player found matching '{}'", player_name))?;
    let full_name = format!("{} {}", player.first_name, player.last_name);

    // Cache file path
    let cache_file = format!("cache/game_logs_{}_{}.json", player.id, season);

    let observations = if use_cache && Path::new(&cache_file).exists() {
        load_game_logs_from_cache(&cache_file)?
    } else {
        let observations = client
            .fetch_player_game_logs(player.id, season)
            .await
            .context("Failed to fetch game logs")?;
        save_game_logs_to_cache(&observations, &cache_file)?;
        observations
    };

    // Split into the two series the pipeline forecasts independently
    let (playoff_games, regular_games): (Vec<_>, Vec<_>) = observations
        .into_iter()
        .partition(|obs| obs.category == GameCategory::Playoff);

    // The season average from the API is a nicety; the series mean covers
    // for it when the endpoint has nothing
    let season_avg_points = match client.fetch_season_average(player.id, season).await {
        Ok(avg) => avg,
        Err(e) => {
            warn!(error = %e, "season average fetch failed, using series mean");
            None
        }
    };

    let request = PlayerPropRequest {
        player_name: full_name,
        regular_season: ScoringSeries::new(regular_games)?,
        playoffs: ScoringSeries::new(playoff_games)?,
        season_avg_points,
        threshold,
    };

    analyze_prop(&request).map_err(Into::into)
}
