//! Feint CLI - host a duel or act as a remote player.
//!
//! `play` runs the authoritative host loop on this terminal. `submit` and
//! `status` are the remote side: they only touch the shared session store,
//! so another terminal (or machine sharing the session directory) can play
//! one slot of a hosted match.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use feint_core::feint_session::{SessionId, Slot, Zone};
use feint_core::DuelConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Feint - a two-player zone-guessing duel
#[derive(Parser, Debug)]
#[command(name = "feint")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file (roster, timing, storage)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Session store directory (overrides config and FEINT_SESSION_DIR)
    #[arg(long, global = true)]
    session_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Host a match on this terminal
    Play {
        /// Random seed (default: config, FEINT_SEED, or random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Frame interval in milliseconds
        #[arg(long)]
        frame_ms: Option<u64>,
    },

    /// Submit a zone for one slot of a hosted match
    Submit {
        /// Six-digit session code printed by `play`
        #[arg(long)]
        code: SessionId,

        /// Player slot: 1 or 2
        #[arg(long)]
        slot: Slot,

        /// Zone: head, torso, or legs
        #[arg(long)]
        zone: Zone,

        /// Remote participant id to bind to the slot
        #[arg(long)]
        participant: Option<i64>,
    },

    /// Show the session state as seen by one slot
    Status {
        /// Six-digit session code printed by `play`
        #[arg(long)]
        code: SessionId,

        /// Player slot: 1 or 2
        #[arg(long)]
        slot: Slot,
    },
}

fn main() -> ExitCode {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();
    setup_logging();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => DuelConfig::load(path)?,
        None => DuelConfig::default(),
    };
    config.apply_env();
    if let Some(dir) = args.session_dir {
        config.session_dir = dir;
    }

    match args.command {
        Commands::Play { seed, frame_ms } => {
            if seed.is_some() {
                config.seed = seed;
            }
            if let Some(ms) = frame_ms {
                config.frame_interval_ms = ms.max(1);
            }
            config.validate().context("invalid duel config")?;
            cli::play::execute(&config)
        }
        Commands::Submit {
            code,
            slot,
            zone,
            participant,
        } => cli::submit::execute(&config, &code, slot, zone, participant),
        Commands::Status { code, slot } => cli::status::execute(&config, &code, slot),
    }
}

/// Logs to stderr, filtered by `RUST_LOG` (default: info for feint crates).
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("feint=info,feint_core=info,feint_session=info")
    });

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
