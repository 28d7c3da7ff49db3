//! # obbygen
//!
//! Generates an obby world, validates it and writes the scene file.
//!
//! ```bash
//! obbygen --config obby.toml
//! obbygen --stages 40 --themes lobby,lava_volcano,space_galaxy --seed 7 --out tower.rbxlx
//! RUST_LOG=debug obbygen --validate-only --strict
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use obby::core::ThemeId;
use obby::{ObbyConfig, ObbyResult, Pipeline};
use tracing::{error, info};

/// Obby world generator
#[derive(Parser, Debug)]
#[command(name = "obbygen", version)]
#[command(about = "Generate, validate and serialize an obby world")]
struct Cli {
    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Total stages across all sections
    #[arg(long, allow_negative_numbers = true)]
    stages: Option<i64>,

    /// Comma-separated theme sequence, one section each
    #[arg(long, value_delimiter = ',')]
    themes: Option<Vec<String>>,

    /// World seed
    #[arg(long)]
    seed: Option<u64>,

    /// Game title
    #[arg(long)]
    name: Option<String>,

    /// Scene output path
    #[arg(long)]
    out: Option<PathBuf>,

    /// Stop after writing the validation report
    #[arg(long)]
    validate_only: bool,

    /// Fail when the validator finds any issue
    #[arg(long)]
    strict: bool,
}

impl Cli {
    fn into_config(self) -> ObbyResult<ObbyConfig> {
        let mut config = match &self.config {
            Some(path) => ObbyConfig::load(path)?,
            None => ObbyConfig::default(),
        };
        let generation = &mut config.generation;
        if let Some(stages) = self.stages {
            generation.stages = stages;
        }
        if let Some(themes) = self.themes {
            generation.themes = themes.iter().map(|t| t.parse::<ThemeId>()).collect::<Result<_, _>>()?;
        }
        if let Some(seed) = self.seed {
            generation.seed = seed;
        }
        if let Some(name) = self.name {
            generation.game_name = name;
        }
        if let Some(out) = self.out {
            config.output.scene_path = out;
        }
        config.output.validate_only |= self.validate_only;
        config.output.strict |= self.strict;
        Ok(config)
    }
}

fn run(cli: Cli) -> ObbyResult<()> {
    let config = cli.into_config()?;
    info!(
        seed = config.generation.seed,
        stages = config.generation.stages,
        sections = config.generation.themes.len(),
        "starting obby generation"
    );
    let summary = Pipeline::new(config).execute()?;
    info!(summary = %summary.report.summary(), "done");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "obbygen failed");
            ExitCode::FAILURE
        }
    }
}
