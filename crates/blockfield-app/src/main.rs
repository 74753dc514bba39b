//! Generates a block terrain field and reports its instance batches.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p blockfield-app -- --seed 42 --x-max 2 --z-max 1 --y-max 16`.

use std::process::ExitCode;

use blockfield_config::{CliArgs, Config, default_config_dir};
use blockfield_terrain::TerrainField;
use clap::Parser;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Fall back to defaults rather than refusing to run.
    let (mut config, load_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    blockfield_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Some(e) = load_error {
        warn!(
            "Failed to load config from {}: {e}, using defaults",
            config_dir.display()
        );
    }

    let params = config.world.terrain_params();
    info!(
        "Generating {}x{} field up to height {} (seed {}, {:?})",
        params.x_max, params.z_max, params.y_max, params.noise.seed, params.floor
    );

    let field = match TerrainField::generate(params) {
        Ok(field) => field,
        Err(e) => {
            error!("Terrain generation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    for (block, batch) in field.batches() {
        info!(
            "{block:>8}: {:>9} instances, {:>11} bytes",
            batch.len(),
            batch.byte_len()
        );
    }
    info!(
        "Total {} instances, content hash {:016x}",
        field.total_instances(),
        field.content_hash()
    );

    ExitCode::SUCCESS
}
