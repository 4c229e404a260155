//! Layered configuration for the command-line adapter.
//!
//! Values resolve in order: built-in defaults, then an optional TOML file,
//! then command-line flags.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{value_parser, Parser};
use egg_drop_core::{GameConfig, MAX_EGGS, MAX_FLOORS, MIN_EGGS, MIN_FLOORS};
use serde::Deserialize;

/// Command-line arguments accepted by the `egg-drop` binary.
#[derive(Debug, Default, Parser)]
#[command(
    name = "egg-drop",
    about = "Find the highest floor an egg survives, in as few drops as possible."
)]
pub(crate) struct CliArgs {
    /// Number of floors in the building.
    #[arg(long, value_parser = value_parser!(u32).range(i64::from(MIN_FLOORS)..=i64::from(MAX_FLOORS)))]
    pub(crate) floors: Option<u32>,
    /// Number of eggs available.
    #[arg(long, value_parser = value_parser!(u32).range(i64::from(MIN_EGGS)..=i64::from(MAX_EGGS)))]
    pub(crate) eggs: Option<u32>,
    /// Seed for the critical floor generator; omit for a random game.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Path to a TOML file providing `floors`, `eggs`, and `seed`.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Tracing filter directive, such as `debug`; falls back to `RUST_LOG`.
    #[arg(long)]
    pub(crate) log_level: Option<String>,
}

/// Settings read from the optional configuration file.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileSettings {
    floors: Option<u32>,
    eggs: Option<u32>,
    seed: Option<u64>,
}

/// Fully resolved adapter settings.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) game: GameConfig,
    pub(crate) seed: Option<u64>,
}

/// Resolves settings from the parsed arguments and the file they point at.
pub(crate) fn resolve(args: &CliArgs) -> Result<Settings> {
    let file = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file at {}", path.display()))?;
            parse_file(&contents)
                .with_context(|| format!("failed to load config file at {}", path.display()))?
        }
        None => FileSettings::default(),
    };
    layer(file, args)
}

fn parse_file(contents: &str) -> Result<FileSettings> {
    toml::from_str(contents).context("failed to parse config toml contents")
}

fn layer(file: FileSettings, args: &CliArgs) -> Result<Settings> {
    let defaults = GameConfig::default();
    let floors = args
        .floors
        .or(file.floors)
        .unwrap_or(defaults.total_floors());
    let eggs = args.eggs.or(file.eggs).unwrap_or(defaults.total_eggs());
    let game = GameConfig::new(floors, eggs).context("invalid game configuration")?;

    Ok(Settings {
        game,
        seed: args.seed.or(file.seed),
    })
}
