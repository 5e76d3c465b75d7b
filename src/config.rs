//! Configuration for the tracking pipeline.

use crate::error::TrackerError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunable parameters for a tracking session.
///
/// All fields have working defaults, so a config file only needs to name the
/// values it wants to override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Width every incoming frame is resized to before processing.
    pub canonical_width: u32,
    /// Height every incoming frame is resized to before processing.
    pub canonical_height: u32,
    /// Half-width of the horizontal dead zone around frame center, in pixels.
    /// An object inside the dead zone is considered centered.
    pub center_threshold_px: u32,
    /// Minimum wall-clock interval between two issued commands, in seconds.
    pub min_command_interval_s: f64,
    /// Connected regions smaller than this many pixels are treated as noise.
    pub min_region_area_px2: u32,
    /// Number of recent raw centroids averaged into the smoothed centroid.
    pub smoothing_window_frames: usize,
    /// Rolling window of frames the background model adapts over.
    pub background_history_frames: u32,
    /// A pixel is foreground when its squared deviation from the modeled
    /// background exceeds this multiple of the modeled variance.
    pub background_variance_threshold: f32,
    /// Timeout for a single command transmission, in seconds.
    pub command_timeout_s: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            canonical_width: 640,
            canonical_height: 480,
            center_threshold_px: 50,
            min_command_interval_s: 0.2,
            min_region_area_px2: 500,
            smoothing_window_frames: 5,
            background_history_frames: 100,
            background_variance_threshold: 50.0,
            command_timeout_s: 1.0,
        }
    }
}

impl TrackerConfig {
    /// Loads a configuration from a TOML file and validates it.
    pub fn from_toml_file(path: &Path) -> Result<Self, TrackerError> {
        let text = std::fs::read_to_string(path)?;
        let config: TrackerConfig =
            toml::from_str(&text).map_err(|e| TrackerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.canonical_width == 0 || self.canonical_height == 0 {
            return Err(TrackerError::Config(
                "canonical resolution must be non-zero".to_string(),
            ));
        }
        if self.canonical_width > 4096 || self.canonical_height > 4096 {
            return Err(TrackerError::Config(
                "canonical resolution too large (max 4096 per axis)".to_string(),
            ));
        }
        if self.center_threshold_px >= self.canonical_width / 2 {
            return Err(TrackerError::Config(
                "center_threshold_px must be smaller than half the frame width".to_string(),
            ));
        }
        if !self.min_command_interval_s.is_finite() || self.min_command_interval_s < 0.0 {
            return Err(TrackerError::Config(
                "min_command_interval_s must be a non-negative number".to_string(),
            ));
        }
        if self.smoothing_window_frames == 0 {
            return Err(TrackerError::Config(
                "smoothing_window_frames must be at least 1".to_string(),
            ));
        }
        if self.background_history_frames == 0 {
            return Err(TrackerError::Config(
                "background_history_frames must be at least 1".to_string(),
            ));
        }
        if !self.background_variance_threshold.is_finite()
            || self.background_variance_threshold <= 0.0
        {
            return Err(TrackerError::Config(
                "background_variance_threshold must be positive".to_string(),
            ));
        }
        if !self.command_timeout_s.is_finite() || self.command_timeout_s <= 0.0 {
            return Err(TrackerError::Config(
                "command_timeout_s must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Minimum interval between issued commands as a `Duration`.
    pub fn min_command_interval(&self) -> Duration {
        Duration::from_secs_f64(self.min_command_interval_s)
    }

    /// Command transmission timeout as a `Duration`.
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.command_timeout_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let config = TrackerConfig::default();
        assert_eq!(config.canonical_width, 640);
        assert_eq!(config.canonical_height, 480);
        assert_eq!(config.center_threshold_px, 50);
        assert_eq!(config.min_command_interval_s, 0.2);
        assert_eq!(config.min_region_area_px2, 500);
        assert_eq!(config.smoothing_window_frames, 5);
        assert_eq!(config.background_history_frames, 100);
        assert_eq!(config.background_variance_threshold, 50.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_resolution_rejected() {
        let mut config = TrackerConfig::default();
        config.canonical_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn dead_zone_wider_than_frame_rejected() {
        let mut config = TrackerConfig::default();
        config.center_threshold_px = 320;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_smoothing_window_rejected() {
        let mut config = TrackerConfig::default();
        config.smoothing_window_frames = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: TrackerConfig =
            toml::from_str("center_threshold_px = 80\nmin_command_interval_s = 0.5\n")
                .expect("valid toml");
        assert_eq!(config.center_threshold_px, 80);
        assert_eq!(config.min_command_interval_s, 0.5);
        assert_eq!(config.canonical_width, 640);
        assert_eq!(config.smoothing_window_frames, 5);
    }
}
