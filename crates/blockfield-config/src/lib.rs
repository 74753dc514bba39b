//! Configuration for the block terrain generator.
//!
//! World and logging settings persist to disk as `config.ron`. Command-line
//! flags (clap) override any loaded value before generation starts.

mod cli;
mod config;
mod error;

pub use cli::{BackendArg, CliArgs, FloorArg};
pub use config::{CONFIG_FILE, Config, DebugConfig, WorldConfig, default_config_dir};
pub use error::ConfigError;
