//! Q-Boxing headless runner
//!
//! Plays bouts on a manual clock and prints summaries.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use qboxing_core::api::{simulate_batch_capped, simulate_bout, BatchSummary, BoutRequest, BoutResponse};
use qboxing_core::engine::config::BoutConfig;
use qboxing_core::BoutError;

#[derive(Parser)]
#[command(name = "qboxing")]
#[command(about = "Run Q-learning boxing bouts headless", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one bout
    Run {
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// JSON or YAML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Named preset when no config file is given
        #[arg(long, default_value = "standard")]
        preset: String,

        #[arg(long, default_value_t = qboxing_core::api::DEFAULT_MAX_FRAMES)]
        max_frames: u64,

        /// Print the summary as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Play many bouts in parallel
    Batch {
        /// Number of bouts
        #[arg(long, default_value_t = 8)]
        seeds: u64,

        #[arg(long, default_value_t = 1)]
        start_seed: u64,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "standard")]
        preset: String,

        #[arg(long, default_value_t = qboxing_core::api::DEFAULT_MAX_FRAMES)]
        max_frames: u64,
    },

    /// Print a preset config as JSON
    Config {
        #[arg(long, default_value = "standard")]
        preset: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { seed, config, preset, max_frames, json } => {
            let cfg = load_config(config.as_deref(), &preset)?;
            let request = BoutRequest { config: Some(cfg), max_frames: Some(max_frames), ..BoutRequest::new(seed) };
            let response = simulate_bout(&request).map_err(explain)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_bout(&response);
            }
        }

        Commands::Batch { seeds, start_seed, config, preset, max_frames } => {
            let cfg = load_config(config.as_deref(), &preset)?;
            let seed_list: Vec<u64> = (start_seed..start_seed + seeds).collect();

            println!("🥊 Running {} bouts (seeds {}..{})", seed_list.len(), start_seed, start_seed + seeds);
            let responses = simulate_batch_capped(&seed_list, &cfg, max_frames).map_err(explain)?;
            let summary = BatchSummary::from_responses(&responses);
            info!(bouts = summary.bouts, "batch finished");

            println!("   Red wins:   {}", summary.red_wins);
            println!("   Blue wins:  {}", summary.blue_wins);
            println!("   Undecided:  {}", summary.undecided);
            println!("   Avg rounds: {:.2}", summary.mean_rounds);
            println!(
                "   Accuracy:   red {:.1}% / blue {:.1}%",
                summary.mean_red_accuracy * 100.0,
                summary.mean_blue_accuracy * 100.0
            );
        }

        Commands::Config { preset } => {
            let cfg = BoutConfig::preset(&preset)?;
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, preset: &str) -> Result<BoutConfig> {
    info!(path = ?path, preset, "loading config");
    match path {
        Some(p) => BoutConfig::load(p)
            .map_err(explain)
            .with_context(|| format!("loading config {}", p.display())),
        None => Ok(BoutConfig::preset(preset)?),
    }
}

/// Attach a hint telling the user whether editing the input can help.
fn explain(err: BoutError) -> anyhow::Error {
    let hint = if err.is_recoverable() {
        "invalid input; fix the config or request and rerun"
    } else {
        "bout could not run"
    };
    anyhow::Error::new(err).context(hint)
}

fn print_bout(resp: &BoutResponse) {
    let s = &resp.summary;
    let winner = s.winner.map(|w| w.name()).unwrap_or("draw");

    println!("🥊 Seed {} - {} frames", resp.seed, resp.frames);
    println!("   Score:  Red {} - {} Blue ({} rounds)", s.red_score, s.blue_score, s.rounds_played);
    println!("   Winner: {}{}", winner, if s.game_over { "" } else { " (frame cap reached)" });
    for (label, st) in [("Red ", &s.stats.red), ("Blue", &s.stats.blue)] {
        println!(
            "   {}: {} thrown, {} landed ({:.1}%), {:.0} dmg, {} super, {} counters, {} dodges",
            label,
            st.punches_thrown,
            st.punches_landed,
            st.accuracy() * 100.0,
            st.damage_dealt,
            st.super_punches,
            st.sameside_counters,
            st.real_dodges
        );
    }
    println!("   Epsilon: red {:.3} / blue {:.3}", s.red_epsilon, s.blue_epsilon);
}
