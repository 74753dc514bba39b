//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use blockfield_terrain::{FloorPolicy, NoiseBackend, NoiseParams, TerrainParams};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

const APP_NAME: &str = "blockfield";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Terrain generation settings.
    pub world: WorldConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Terrain generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed.
    pub seed: i32,
    /// Field width in columns.
    pub x_max: i32,
    /// Field depth in columns.
    pub z_max: i32,
    /// Maximum column height.
    pub y_max: i32,
    /// Whether columns may bottom out at height 0.
    pub floor: FloorPolicy,
    /// Base noise frequency (0.01 detailed, 0.001 smooth).
    pub frequency: f64,
    /// Number of fBm octaves.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub gain: f64,
    /// Noise primitive.
    pub backend: NoiseBackend,
    /// Generation worker threads (0 = one per CPU).
    pub workers: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write JSON logs to a file in debug builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        let noise = NoiseParams::default();
        Self {
            seed: 0,
            x_max: 64,
            z_max: 64,
            y_max: 32,
            floor: FloorPolicy::BedrockGuaranteed,
            frequency: noise.frequency,
            octaves: noise.octaves,
            lacunarity: noise.lacunarity,
            gain: noise.gain,
            backend: noise.backend,
            workers: 1,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

impl WorldConfig {
    /// Generation parameters described by this section.
    pub fn terrain_params(&self) -> TerrainParams {
        TerrainParams {
            x_max: self.x_max,
            z_max: self.z_max,
            y_max: self.y_max,
            noise: NoiseParams {
                seed: self.seed,
                frequency: self.frequency,
                octaves: self.octaves,
                lacunarity: self.lacunarity,
                gain: self.gain,
                backend: self.backend,
            },
            floor: self.floor,
            workers: self.workers,
        }
    }
}

/// The platform configuration directory, e.g. `~/.config/blockfield` on Linux.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join(APP_NAME))
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("x_max: 64"));
        assert!(ron_str.contains("floor: BedrockGuaranteed"));
        assert!(ron_str.contains("backend: Perlin"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.world.floor = FloorPolicy::ZeroFloor;
        config.world.backend = NoiseBackend::FastNoiseLite;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let ron_str = "(world: (seed: 9, y_max: 100))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.world.seed, 9);
        assert_eq!(config.world.y_max, 100);
        assert_eq!(config.world.x_max, 64);
        assert_eq!(config.debug, DebugConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_terrain_params_carry_every_world_field() {
        let world = WorldConfig {
            seed: 42,
            x_max: 2,
            z_max: 1,
            y_max: 16,
            floor: FloorPolicy::ZeroFloor,
            frequency: 0.001,
            octaves: 3,
            lacunarity: 2.5,
            gain: 0.4,
            backend: NoiseBackend::FastNoiseLite,
            workers: 6,
        };
        let params = world.terrain_params();
        assert_eq!((params.x_max, params.z_max, params.y_max), (2, 1, 16));
        assert_eq!(params.noise.seed, 42);
        assert_eq!(params.noise.frequency, 0.001);
        assert_eq!(params.noise.octaves, 3);
        assert_eq!(params.noise.lacunarity, 2.5);
        assert_eq!(params.noise.gain, 0.4);
        assert_eq!(params.noise.backend, NoiseBackend::FastNoiseLite);
        assert_eq!(params.floor, FloorPolicy::ZeroFloor);
        assert_eq!(params.workers, 6);
    }

    #[test]
    fn test_default_world_matches_default_noise() {
        let params = WorldConfig::default().terrain_params();
        assert_eq!(params.noise, NoiseParams::default());
        assert_eq!(params.floor, FloorPolicy::BedrockGuaranteed);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.seed = 1234;
        config.world.x_max = 200;
        config.debug.log_level = "debug".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// World settings\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
