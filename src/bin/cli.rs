use anyhow::Result;
use clap::Parser;
use nba_prop_model::data::save_analyses_to_csv;
use nba_prop_model::fetch_player_prop_analysis;
use nba_prop_model::models::VolatilitySignal;

#[derive(Parser)]
#[command(about = "NBA player prop over/under probability model")]
struct Args {
    /// Player full name, e.g. "Jayson Tatum"
    #[arg(long)]
    player: String,

    /// Points line for the over/under proposition
    #[arg(long)]
    threshold: f64,

    /// Season starting year (2024 = the 2024-25 season)
    #[arg(long, default_value_t = 2024)]
    season: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let use_cache = std::env::var("USE_CACHE").unwrap_or_default() == "1";
    let save_csv = std::env::var("SAVE_CSV").unwrap_or_default() == "1";

    println!("NBA Player Prop Probability Model\n");
    println!(
        "Analyzing: {} over {} points ({}-{} season)\n",
        args.player,
        args.threshold,
        args.season,
        (args.season + 1) % 100
    );

    let analysis =
        fetch_player_prop_analysis(&args.player, args.season, args.threshold, use_cache).await?;

    match &analysis.probability {
        Some(result) => {
            if let Some(p) = result.poisson_probability {
                println!("Poisson estimate:      {:.1}%", p * 100.0);
            }
            if let Some(p) = result.monte_carlo_probability {
                println!("Monte Carlo estimate:  {:.1}%", p * 100.0);
            }
            println!(
                "Blended probability:   {:.1}%",
                result.blended_probability * 100.0
            );
            println!(
                "95% confidence band:   {:.1}% - {:.1}%",
                result.confidence_interval.lower * 100.0,
                result.confidence_interval.upper * 100.0
            );
        }
        None => println!("No probability estimate (no usable scoring data)."),
    }

    println!();
    match analysis.regular_season_volatility {
        VolatilitySignal::Forecast(sigma) => {
            println!("Regular season volatility: {:.2} pts (GARCH 1-step)", sigma)
        }
        VolatilitySignal::NoSignal => {
            println!("Regular season volatility: n/a (fewer than 10 score differences)")
        }
        VolatilitySignal::Unavailable => {
            println!("Regular season volatility: unavailable (fit failed)")
        }
    }
    match analysis.playoff_volatility {
        Some(VolatilitySignal::Forecast(sigma)) => {
            println!("Playoff volatility:        {:.2} pts (GARCH 1-step)", sigma)
        }
        Some(VolatilitySignal::NoSignal) => {
            println!("Playoff volatility:        n/a (short playoff history)")
        }
        Some(VolatilitySignal::Unavailable) => {
            println!("Playoff volatility:        unavailable (fit failed)")
        }
        None => println!("Playoff volatility:        omitted (fewer than 5 playoff games)"),
    }

    println!("\n{}", analysis.format());

    if save_csv {
        save_analyses_to_csv(std::slice::from_ref(&analysis), "cache/prop_analysis.csv")?;
        println!("\nSaved analysis to cache/prop_analysis.csv");
    }

    Ok(())
}
