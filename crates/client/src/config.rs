//! Layered engine configuration.
//!
//! Sources, later ones winning:
//! 1. [`EngineConfig::default`]
//! 2. A RON file, from `--config` or `PIXI_CONFIG`
//! 3. Environment overrides:
//!    - `PIXI_TICK_HZ` - arbitration rate in hertz
//!    - `PIXI_SWITCH_MARGIN` - utility hysteresis margin
//!    - `PIXI_MIN_DWELL_TICKS` - utility minimum dwell
//!
//! The result is validated before it is returned, so a bad value fails at
//! startup.
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use companion_core::EngineConfig;

pub const CONFIG_ENV: &str = "PIXI_CONFIG";

/// Loads the engine configuration from all sources.
pub fn load(path: Option<&Path>) -> Result<EngineConfig> {
    let path = path
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

    let mut config = match path {
        Some(path) => from_file(&path)?,
        None => EngineConfig::default(),
    };
    apply_env(&mut config);

    config
        .validate()
        .context("engine configuration rejected")?;
    Ok(config)
}

/// Parses a RON configuration file. Missing fields keep their defaults.
pub fn from_file(path: &Path) -> Result<EngineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = ron::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    tracing::debug!("loaded configuration from {}", path.display());
    Ok(config)
}

/// Applies the `PIXI_*` environment overrides.
pub fn apply_env(config: &mut EngineConfig) {
    if let Some(tick_hz) = read_env::<f32>("PIXI_TICK_HZ") {
        config.tick_hz = tick_hz;
    }
    if let Some(margin) = read_env::<f32>("PIXI_SWITCH_MARGIN") {
        config.hysteresis.switch_margin = margin;
    }
    if let Some(dwell) = read_env::<u64>("PIXI_MIN_DWELL_TICKS") {
        config.hysteresis.min_dwell_ticks = dwell;
    }
}

pub(crate) fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}
