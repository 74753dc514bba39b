//! Command-line argument parsing for the terrain generator.

use std::path::PathBuf;

use blockfield_terrain::{FloorPolicy, NoiseBackend};
use clap::{Parser, ValueEnum};

use crate::Config;

/// Floor policy as spelled on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FloorArg {
    /// Every column holds at least one fill block.
    Bedrock,
    /// Columns may sit directly on bedrock.
    Zero,
}

impl From<FloorArg> for FloorPolicy {
    fn from(arg: FloorArg) -> Self {
        match arg {
            FloorArg::Bedrock => FloorPolicy::BedrockGuaranteed,
            FloorArg::Zero => FloorPolicy::ZeroFloor,
        }
    }
}

/// Noise backend as spelled on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Perlin,
    #[value(name = "fastnoise")]
    FastNoiseLite,
}

impl From<BackendArg> for NoiseBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Perlin => NoiseBackend::Perlin,
            BackendArg::FastNoiseLite => NoiseBackend::FastNoiseLite,
        }
    }
}

/// Terrain generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "blockfield", about = "Procedural block terrain generator")]
pub struct CliArgs {
    /// World seed.
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i32>,

    /// Field width in columns.
    #[arg(long)]
    pub x_max: Option<i32>,

    /// Field depth in columns.
    #[arg(long)]
    pub z_max: Option<i32>,

    /// Maximum column height.
    #[arg(long)]
    pub y_max: Option<i32>,

    /// Lowest allowed surface height.
    #[arg(long, value_enum)]
    pub floor: Option<FloorArg>,

    /// Base noise frequency.
    #[arg(long)]
    pub frequency: Option<f64>,

    /// Number of fBm octaves.
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Frequency multiplier between octaves.
    #[arg(long)]
    pub lacunarity: Option<f64>,

    /// Amplitude multiplier between octaves.
    #[arg(long)]
    pub gain: Option<f64>,

    /// Noise primitive.
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Worker threads (0 = one per CPU).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let world = &mut self.world;
        if let Some(seed) = args.seed {
            world.seed = seed;
        }
        if let Some(x) = args.x_max {
            world.x_max = x;
        }
        if let Some(z) = args.z_max {
            world.z_max = z;
        }
        if let Some(y) = args.y_max {
            world.y_max = y;
        }
        if let Some(floor) = args.floor {
            world.floor = floor.into();
        }
        if let Some(f) = args.frequency {
            world.frequency = f;
        }
        if let Some(o) = args.octaves {
            world.octaves = o;
        }
        if let Some(l) = args.lacunarity {
            world.lacunarity = l;
        }
        if let Some(g) = args.gain {
            world.gain = g;
        }
        if let Some(backend) = args.backend {
            world.backend = backend.into();
        }
        if let Some(w) = args.workers {
            world.workers = w;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
