#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays the Egg Drop challenge in a terminal.

mod config;
mod console;

use std::io;

use anyhow::Result;
use clap::Parser;
use egg_drop_session::RngFloorSource;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::CliArgs;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Entry point for the Egg Drop command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_level.as_deref());

    let settings = config::resolve(&args)?;
    debug!(?settings, "resolved settings");

    let rng = match settings.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    console::run(
        stdin.lock(),
        stdout.lock(),
        settings.game,
        RngFloorSource::new(rng),
    )
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
