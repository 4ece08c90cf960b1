use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use esoccer_signals::alerts::{AlertGate, LogNotifier};
use esoccer_signals::calculate::{h2h_stats, league_stats, player_stats};
use esoccer_signals::config::AppConfig;
use esoccer_signals::models::{HistoryMatch, SampleSize};
use esoccer_signals::normalize::{
    dedup_matches, extract_records, normalize_history, parse_score_string, summarize_parsed,
};
use esoccer_signals::parse_duration;
use esoccer_signals::scan::{LiveScanner, ScanSummary};
use esoccer_signals::storage::{
    load_history, load_payload, modified_at, write_normalized_history,
};
use esoccer_signals::strategy::{strategy_report, StrategyClassifier};

#[derive(Parser)]
#[command(name = "esoccer-signals")]
#[command(about = "Rolling statistics, league thermometer and live strategy signals for e-soccer")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults are used when it does not exist)
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
    /// Normalize a history payload and write it as JSONL
    Normalize {
        /// Payload to read (default: the configured history file)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Report counts without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Rolling statistics for one player
    Player {
        name: String,

        /// Matches in the window (default: engine.player_window)
        #[arg(long)]
        window: Option<usize>,
    },

    /// Head-to-head between two players
    H2h {
        player1: String,
        player2: String,

        /// Only the most recent N meetings
        #[arg(long)]
        limit: Option<usize>,
    },

    /// League thermometer
    Leagues {
        /// Matches per league: 5, 10, 15, 20, 30 or 40
        #[arg(long)]
        sample: Option<usize>,
    },

    /// Classify a match-up into a strategy signal
    Classify {
        home: String,
        away: String,

        /// League of the match, used by the league guard
        #[arg(long)]
        league: Option<String>,
    },

    /// Classify the live feed and send alerts
    Scan {
        /// Scan once and print the results
        #[arg(long)]
        once: bool,

        /// Keep scanning at the refresh interval
        #[arg(long)]
        watch: bool,

        /// Refresh interval (e.g. "10s", "1m")
        #[arg(long)]
        interval: Option<String>,
    },

    /// Replay the history and report strategy hit rates
    Backtest {
        /// Only replay the most recent N matches of each league
        #[arg(long)]
        limit_per_league: Option<usize>,
    },

    /// Parse score tooltips from one player's side
    ParseScore {
        /// Tooltip strings, e.g. "Neo 2 - Zion 1"
        #[arg(required = true)]
        tooltips: Vec<String>,

        /// Half-time score string, applied to every tooltip
        #[arg(long)]
        half_time: Option<String>,

        /// Player whose side is "home"
        #[arg(long)]
        player: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn history(config: &AppConfig) -> Result<Vec<HistoryMatch>> {
    load_history(&config.storage()).context("Failed to load match history")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    // Initialize tracing; stdout carries command output
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting esoccer-signals v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Normalize { input, dry_run } => {
            let storage = config.storage();
            let input = input.unwrap_or_else(|| storage.history_path());

            let payload = load_payload(&input)?;
            let records = extract_records(&payload).len();
            let normalized = normalize_history(&payload, modified_at(&input));
            let valid = normalized.len();
            let history = dedup_matches(normalized);

            println!("\n=== Normalization Results ===");
            println!("Records:          {}", records);
            println!("Dropped:          {}", records - valid);
            println!("Duplicates:       {}", valid - history.len());
            println!("Matches:          {}", history.len());

            if dry_run {
                println!("\n(dry run - no data written to disk)");
            } else {
                write_normalized_history(&storage, &history)?;
                println!("Written to:       {:?}", storage.normalized_history_path());
            }
        }

        Commands::Player { name, window } => {
            let history = history(&config)?;
            let window = window.unwrap_or(config.engine.player_window);
            print_json(&player_stats(&name, &history, window))?;
        }

        Commands::H2h {
            player1,
            player2,
            limit,
        } => {
            let history = history(&config)?;
            print_json(&h2h_stats(&player1, &player2, &history, limit))?;
        }

        Commands::Leagues { sample } => {
            let sample = match sample {
                Some(n) => SampleSize::try_from(n)?,
                None => config.engine.thermometer_sample,
            };
            let history = history(&config)?;
            print_json(&league_stats(&history, sample))?;
        }

        Commands::Classify { home, away, league } => {
            let history = history(&config)?;
            let classifier = StrategyClassifier::new(config.engine.classifier());
            print_json(&classifier.classify(&home, &away, league.as_deref(), &history))?;
        }

        Commands::Scan {
            once,
            watch,
            interval,
        } => {
            let ttl = config
                .alerts
                .ttl_duration()
                .ok_or_else(|| anyhow!("Invalid alert ttl: {}", config.alerts.ttl))?;
            let gate = AlertGate::new(config.alerts.min_confidence, chrono::Duration::from_std(ttl)?);
            let mut scanner = LiveScanner::new(
                StrategyClassifier::new(config.engine.classifier()),
                gate,
                Arc::new(LogNotifier),
            )
            .with_alerts(config.alerts.enabled);
            let storage = config.storage();

            if once {
                let analyzed = scanner.scan_files(&storage).await?;
                let summary = ScanSummary::from_events(&analyzed);
                tracing::info!(
                    events = summary.events,
                    signals = summary.signals,
                    sent = summary.sent,
                    "Live scan completed"
                );
                print_json(&analyzed)?;
            } else if watch {
                let interval = interval.unwrap_or_else(|| config.scan.refresh_interval.clone());
                let every = parse_duration(&interval)
                    .filter(|d| !d.is_zero())
                    .ok_or_else(|| anyhow!("Invalid interval: {}", interval))?;
                scanner.run_periodic(storage, every).await;
            } else {
                eprintln!("Specify --once or --watch");
            }
        }

        Commands::Backtest { limit_per_league } => {
            let history = history(&config)?;
            let classifier = StrategyClassifier::new(config.engine.classifier());
            print_json(&strategy_report(&history, limit_per_league, &classifier))?;
        }

        Commands::ParseScore {
            tooltips,
            half_time,
            player,
        } => {
            let scores: Vec<_> = tooltips
                .iter()
                .map(|t| parse_score_string(t, half_time.as_deref(), &player))
                .collect();
            print_json(&serde_json::json!({
                "scores": scores,
                "summary": summarize_parsed(&scores),
            }))?;
        }
    }

    Ok(())
}
