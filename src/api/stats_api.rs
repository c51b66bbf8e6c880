use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::models::{GameCategory, ScoringObservation};

const BASE_URL: &str = "https://api.balldontlie.io/v1";
const PAGE_SIZE: u32 = 100;

/// A player record from the balldontlie players endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Player {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub team: Option<Team>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
struct PlayersResponse {
    data: Vec<Player>,
}

/// One per-game stat line; only the fields the pipeline needs
#[derive(Debug, Deserialize)]
struct StatLine {
    pts: Option<u32>,
    game: StatGame,
}

#[derive(Debug, Deserialize)]
struct StatGame {
    date: String,
    postseason: bool,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    data: Vec<StatLine>,
    meta: StatsMeta,
}

#[derive(Debug, Deserialize)]
struct StatsMeta {
    next_cursor: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SeasonAverage {
    pts: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SeasonAveragesResponse {
    data: Vec<SeasonAverage>,
}

/// Client for the balldontlie NBA stats API
pub struct StatsApiClient {
    client: Client,
    api_key: String,
}

impl StatsApiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Look up a player by (partial) name; returns the first match
    pub async fn search_player(&self, name: &str) -> Result<Option<Player>> {
        let url = format!("{}/players?search={}", BASE_URL, name);

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .send()
            .await
            .context("Failed to query players endpoint")?;

        let players: PlayersResponse = response
            .json()
            .await
            .context("Failed to parse players response")?;
        Ok(players.data.into_iter().next())
    }

    /// Fetch every per-game stat line for a player in one season, following
    /// the cursor until the API runs out of pages. Games without a recorded
    /// point total are skipped.
    pub async fn fetch_player_game_logs(
        &self,
        player_id: u64,
        season: u32,
    ) -> Result<Vec<ScoringObservation>> {
        let mut observations = Vec::new();
        let mut cursor: Option<u64> = None;

        loop {
            let mut url = format!(
                "{}/stats?player_ids[]={}&seasons[]={}&per_page={}",
                BASE_URL, player_id, season, PAGE_SIZE
            );
            if let Some(cursor) = cursor {
                url.push_str(&format!("&cursor={}", cursor));
            }

            let response = self
                .client
                .get(&url)
                .header("Authorization", &self.api_key)
                .send()
                .await
                .context("Failed to query stats endpoint")?;

            let page: StatsResponse = response
                .json()
                .await
                .context("Failed to parse stats response")?;

            for line in page.data {
                let Some(points) = line.pts else { continue };
                let date = parse_game_date(&line.game.date)?;
                let category = if line.game.postseason {
                    GameCategory::Playoff
                } else {
                    GameCategory::RegularSeason
                };
                observations.push(ScoringObservation {
                    date,
                    points,
                    category,
                });
            }

            match page.meta.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(observations)
    }

    /// Season scoring average from the season_averages endpoint, if the
    /// player logged any games that season
    pub async fn fetch_season_average(&self, player_id: u64, season: u32) -> Result<Option<f64>> {
        let url = format!(
            "{}/season_averages?season={}&player_ids[]={}",
            BASE_URL, season, player_id
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .send()
            .await
            .context("Failed to query season averages endpoint")?;

        let averages: SeasonAveragesResponse = response
            .json()
            .await
            .context("Failed to parse season averages response")?;
        Ok(averages.data.into_iter().next().and_then(|avg| avg.pts))
    }
}

/// Game dates arrive either as plain "YYYY-MM-DD" or as a full timestamp;
/// only the date part matters here
fn parse_game_date(raw: &str) -> Result<NaiveDate> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| anyhow!("unparseable game date {:?}: {}", raw, e))
}
