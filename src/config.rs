//! Runtime configuration parsed from environment variables.

use std::path::PathBuf;

use canvas::consts::{HISTORY_LIMIT, MAX_ZOOM, MIN_ZOOM};
use canvas::viewport::ViewportConfig;

pub const DEFAULT_DATA_FILE: &str = "ambient-storage.json";
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} ({reason})")]
    Invalid { var: &'static str, value: String, reason: &'static str },
    #[error("zoom bounds must satisfy 0 < min <= max (got {min}..{max})")]
    ZoomBounds { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub history_limit: usize,
    pub panning: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            history_limit: HISTORY_LIMIT,
            panning: false,
        }
    }
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `AMBIENT_DATA_FILE`: default `ambient-storage.json`
    /// - `AMBIENT_VIEWPORT_WIDTH` / `AMBIENT_VIEWPORT_HEIGHT`: default 1280 x 800
    /// - `AMBIENT_MIN_ZOOM` / `AMBIENT_MAX_ZOOM`: default 0.1 / 4.0
    /// - `AMBIENT_HISTORY_LIMIT`: default 50
    /// - `AMBIENT_PANNING`: `true` or `false` (default)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let data_file = lookup("AMBIENT_DATA_FILE")
            .filter(|v| !v.trim().is_empty())
            .map_or(defaults.data_file, PathBuf::from);
        let viewport_width = parse_extent(&lookup, "AMBIENT_VIEWPORT_WIDTH", defaults.viewport_width)?;
        let viewport_height = parse_extent(&lookup, "AMBIENT_VIEWPORT_HEIGHT", defaults.viewport_height)?;
        let min_zoom = parse_f64(&lookup, "AMBIENT_MIN_ZOOM", defaults.min_zoom)?;
        let max_zoom = parse_f64(&lookup, "AMBIENT_MAX_ZOOM", defaults.max_zoom)?;
        if !(min_zoom > 0.0 && min_zoom <= max_zoom) {
            return Err(ConfigError::ZoomBounds { min: min_zoom, max: max_zoom });
        }
        let history_limit = parse_limit(&lookup, "AMBIENT_HISTORY_LIMIT", defaults.history_limit)?;
        let panning = parse_bool(&lookup, "AMBIENT_PANNING", defaults.panning)?;

        Ok(Self { data_file, viewport_width, viewport_height, min_zoom, max_zoom, history_limit, panning })
    }

    #[must_use]
    pub fn viewport_config(&self) -> ViewportConfig {
        ViewportConfig {
            min_scale: self.min_zoom,
            max_scale: self.max_zoom,
            wheel_enabled: true,
            panning_enabled: self.panning,
        }
    }
}

fn parse_f64(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(default);
    };
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ConfigError::Invalid { var, value, reason: "expected a finite number" }),
    }
}

fn parse_extent(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: f64,
) -> Result<f64, ConfigError> {
    let v = parse_f64(lookup, var, default)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(ConfigError::Invalid { var, value: v.to_string(), reason: "must be positive" })
    }
}

fn parse_limit(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: usize,
) -> Result<usize, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(default);
    };
    match value.trim().parse::<usize>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ConfigError::Invalid { var, value, reason: "expected a positive integer" }),
    }
}

fn parse_bool(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { var, value, reason: "expected true or false" }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
