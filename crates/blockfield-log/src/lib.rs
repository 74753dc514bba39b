//! Structured logging for the terrain generator.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log file
//! in debug builds. The level comes from `RUST_LOG` when set, otherwise from
//! the loaded configuration.

use std::path::{Path, PathBuf};

use blockfield_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the JSON log file written inside the log directory.
pub const LOG_FILE: &str = "blockfield.log";

const DEFAULT_FILTER: &str = "info";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - whether file logging may be enabled at all
/// * `config` - source of the log level and the `log_to_file` switch
///
/// Must be called at most once per process.
///
/// ```no_run
/// use blockfield_config::Config;
/// use blockfield_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config_filter(config));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true) // generation workers are named
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(log_path) = file_log_path(log_dir, debug_build, config)
        && let Some(parent) = log_path.parent()
        && std::fs::create_dir_all(parent).is_ok()
        && let Ok(log_file) = std::fs::File::create(&log_path)
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Filter built from the configured level, or [`default_env_filter`] when none is set.
fn config_filter(config: Option<&Config>) -> EnvFilter {
    match config.map(|c| c.debug.log_level.trim()) {
        Some(level) if !level.is_empty() => EnvFilter::new(level),
        _ => default_env_filter(),
    }
}

/// Where the JSON log goes, if file logging is enabled.
fn file_log_path(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Option<PathBuf> {
    let wanted = config.is_none_or(|c| c.debug.log_to_file);
    if !debug_build || !wanted {
        return None;
    }
    log_dir.map(|dir| dir.join(LOG_FILE))
}
