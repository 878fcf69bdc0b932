use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, SonarError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub playback: PlaybackConfig,
}

impl AppConfig {
    /// Parses a JSON document and validates the result. Missing fields fall
    /// back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded configuration");
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        self.playback.validate()
    }
}

/// Constants driving the smoothing, edge detection, pitch mapping and click
/// synthesis stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Samples strictly brighter than this value count as light.
    pub threshold: u8,
    pub smoothing_window: usize,
    /// Input samples per second of synthesized audio.
    pub scan_rate: f64,
    /// Click length in seconds.
    pub click_duration: f64,
    pub min_frequency: f64,
    pub max_frequency: f64,
    pub min_distance: usize,
    pub max_distance: usize,
    pub decay_rate: f64,
    pub click_gain: f64,
    /// Length in seconds of the buffer emitted when no edges are found.
    pub silent_duration: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: 128,
            smoothing_window: 4,
            scan_rate: 1000.0,
            click_duration: 0.01,
            min_frequency: 200.0,
            max_frequency: 4000.0,
            min_distance: 5,
            max_distance: 200,
            decay_rate: 8.0,
            click_gain: 0.3,
            silent_duration: 0.1,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.smoothing_window == 0 {
            return Err(SonarError::config("smoothing_window must be at least 1"));
        }
        require_positive("scan_rate", self.scan_rate)?;
        require_positive("click_duration", self.click_duration)?;
        require_positive("click_gain", self.click_gain)?;
        require_non_negative("min_frequency", self.min_frequency)?;
        require_non_negative("max_frequency", self.max_frequency)?;
        require_non_negative("decay_rate", self.decay_rate)?;
        require_non_negative("silent_duration", self.silent_duration)?;

        if self.min_frequency > self.max_frequency {
            return Err(SonarError::config(format!(
                "min_frequency ({}) exceeds max_frequency ({})",
                self.min_frequency, self.max_frequency
            )));
        }
        if self.max_distance <= self.min_distance {
            return Err(SonarError::config(format!(
                "max_distance ({}) must be greater than min_distance ({})",
                self.max_distance, self.min_distance
            )));
        }
        Ok(())
    }
}

/// Settings owned by the playback side: the backend sample rate, the output
/// volume and how often the driver may process a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub sample_rate: u32,
    pub volume: f32,
    pub max_fps: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            volume: 0.5,
            max_fps: 30.0,
        }
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(SonarError::config("sample_rate must be positive"));
        }
        require_positive("max_fps", f64::from(self.max_fps))?;
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(SonarError::config(format!(
                "volume ({}) must lie within [0, 1]",
                self.volume
            )));
        }
        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SonarError::config(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

fn require_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SonarError::config(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}
