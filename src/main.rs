use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ddsequence::api::{build_router, state::AppState};
use ddsequence::calculate::{
    detect_events, player_tallies, rank_by_win_rate, rank_by_wins, rank_up_conditions, recap,
    team_tallies, top_events,
};
use ddsequence::config::AppConfig;
use ddsequence::models::{round_rate, MatchRecord, NewGame, NewPenalty, TimeWindow};
use ddsequence::storage::{self, StorageConfig};

#[derive(Parser)]
#[command(name = "ddsequence")]
#[command(about = "2v2 match ledger with win-rate rankings, streaks and yearly recaps")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Print ranking tables
    Stats {
        /// Restrict to one year
        #[arg(long)]
        year: Option<String>,
    },

    /// Print the year-in-review as JSON
    Recap {
        year: i32,
    },

    /// Print the current dashboard events
    Events {
        /// Use the carousel limit instead of the banner limit
        #[arg(long)]
        carousel: bool,
    },

    /// Print what each player needs to move up one rank
    RankUp {
        /// Restrict to one year
        #[arg(long)]
        year: Option<String>,
    },

    /// Record a finished game
    AddGame {
        /// The two winners (player tokens)
        #[arg(long, num_args = 2, required = true)]
        winners: Vec<String>,

        /// The two losers (player tokens)
        #[arg(long, num_args = 2, required = true)]
        losers: Vec<String>,
    },

    /// Record a penalty
    AddPenalty {
        /// Player token
        #[arg(long)]
        player: String,

        /// Optional reason
        #[arg(long)]
        reason: Option<String>,
    },
}

fn load_games(storage: &StorageConfig, year: Option<&str>) -> Result<Vec<MatchRecord>> {
    let games = match TimeWindow::from_params(year, None, None) {
        Some(window) => storage::read_games_where(storage, |g| window.contains(g.created_at))?,
        None => storage::read_games(storage)?,
    };
    Ok(games)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting ddsequence v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let state = AppState::new(&config);
            let mut app = build_router(state);
            if access_log {
                app = app.layer(TraceLayer::new_for_http());
            }

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Stats { year } => {
            let games = load_games(&storage, year.as_deref())?;
            let players = player_tallies(&games);

            println!("Games: {}", games.len());
            println!();
            println!("{:<6} {:<8} {:>8} {:>6} {:>6}", "Rank", "Player", "Winrate", "Wins", "Games");
            for row in rank_by_win_rate(players.clone()) {
                println!(
                    "{:<6} {:<8} {:>7.2}% {:>6} {:>6}",
                    row.rank,
                    row.entity.display_name(),
                    round_rate(row.tally.win_rate()),
                    row.tally.wins,
                    row.tally.total
                );
            }

            println!();
            println!("{:<6} {:<8} {:>8} {:>6} {:>6}", "Rank", "Team", "Winrate", "Wins", "Games");
            for row in rank_by_win_rate(team_tallies(&games)) {
                println!(
                    "{:<6} {:<8} {:>7.2}% {:>6} {:>6}",
                    row.rank,
                    row.entity.display_name(),
                    round_rate(row.tally.win_rate()),
                    row.tally.wins,
                    row.tally.total
                );
            }

            println!();
            println!("{:<6} {:<8} {:>6}", "Rank", "Player", "Wins");
            for row in rank_by_wins(players) {
                println!(
                    "{:<6} {:<8} {:>6}",
                    row.rank,
                    row.entity.display_name(),
                    row.tally.wins
                );
            }
        }
        Commands::Recap { year } => {
            let window = TimeWindow::for_year(year).context("year out of range")?;
            let games = storage::read_games_where(&storage, |g| window.contains(g.created_at))?;
            match recap(&games, year) {
                Some(recap) => println!("{}", serde_json::to_string_pretty(&recap)?),
                None => println!("No games recorded in {}", year),
            }
        }
        Commands::Events { carousel } => {
            let limit = if carousel {
                config.stats.carousel_event_limit
            } else {
                config.stats.banner_event_limit
            };
            let games = storage::read_games(&storage)?;
            let events = top_events(detect_events(&games), limit);
            if events.is_empty() {
                println!("No events");
            }
            for event in events {
                println!("[{}] {}: {}", event.priority, event.title, event.message);
            }
        }
        Commands::RankUp { year } => {
            let games = load_games(&storage, year.as_deref())?;
            let ranking = rank_by_win_rate(player_tallies(&games));
            for condition in rank_up_conditions(&ranking, config.stats.rank_up_search_cap) {
                println!(
                    "#{} -> #{}: {}",
                    condition.current_rank, condition.target_rank, condition.description
                );
            }
        }
        Commands::AddGame { winners, losers } => {
            let record = NewGame::new(winners, losers).into_record(Utc::now())?;
            storage::append_game(&storage, &record)?;
            tracing::info!(
                "Recorded game {} ({} beat {})",
                record.id,
                record.winning_key(),
                record.losing_key()
            );
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::AddPenalty { player, reason } => {
            let record = NewPenalty {
                player: Some(player),
                reason,
            }
            .into_record(Utc::now())?;
            storage::append_penalty(&storage, &record)?;
            tracing::info!("Recorded penalty {} for {}", record.id, record.player);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}
