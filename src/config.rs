//! Viewer configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;
use std::str::FromStr;

use tracing::warn;

use crate::consts::{HIGHLIGHT_DURATION_MS, MAX_ZOOM, MIN_ZOOM, MODEL_FIT_PADDING, TAP_SLOP_PX, ZOOM_SENSITIVITY};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("zoom bounds must be positive and finite (min {min}, max {max})")]
    NonPositiveZoom { min: f64, max: f64 },
    #[error("min zoom {min} exceeds max zoom {max}")]
    InvertedZoom { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Exponent applied per wheel notch.
    pub zoom_sensitivity: f64,
    /// Fraction of the viewport a freshly loaded model fills.
    pub fit_padding: f64,
    /// Pointer travel, in pixels, tolerated before a press stops being a tap.
    pub tap_slop_px: f64,
    pub highlight_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            fit_padding: MODEL_FIT_PADDING,
            tap_slop_px: TAP_SLOP_PX,
            highlight_ms: HIGHLIGHT_DURATION_MS,
        }
    }
}

impl ViewerConfig {
    /// Build config from process environment variables.
    ///
    /// Optional:
    /// - `VIEWER_MIN_ZOOM`: default 0.01
    /// - `VIEWER_MAX_ZOOM`: default 10
    /// - `VIEWER_ZOOM_SENSITIVITY`: default 0.075
    /// - `VIEWER_FIT_PADDING`: default 0.9
    /// - `VIEWER_TAP_SLOP_PX`: default 0
    /// - `VIEWER_HIGHLIGHT_MS`: default 500
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the resulting zoom bounds are unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(e) => {
                warn!(key, error = %e, "unreadable config variable; using default");
                None
            }
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// Unparseable values are logged and replaced by the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the resulting zoom bounds are unusable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            min_zoom: parse_or(&lookup, "VIEWER_MIN_ZOOM", defaults.min_zoom),
            max_zoom: parse_or(&lookup, "VIEWER_MAX_ZOOM", defaults.max_zoom),
            zoom_sensitivity: parse_or(&lookup, "VIEWER_ZOOM_SENSITIVITY", defaults.zoom_sensitivity),
            fit_padding: parse_or(&lookup, "VIEWER_FIT_PADDING", defaults.fit_padding),
            tap_slop_px: parse_or(&lookup, "VIEWER_TAP_SLOP_PX", defaults.tap_slop_px),
            highlight_ms: parse_or(&lookup, "VIEWER_HIGHLIGHT_MS", defaults.highlight_ms),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the zoom bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for non-positive or inverted bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_zoom, self.max_zoom);
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || max <= 0.0 {
            return Err(ConfigError::NonPositiveZoom { min, max });
        }
        if min > max {
            return Err(ConfigError::InvertedZoom { min, max });
        }
        Ok(())
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, "invalid config value; using default");
            default
        }
    }
}
