use serde::{Deserialize, Serialize};

use crate::{PipelineConfig, Result, SonarError};

/// Maps the spacing between edges to a click frequency.
///
/// The relationship is inverted: closely spaced edges sound higher than
/// widely spaced ones. Distances outside the configured range are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchMapper {
    min_distance: usize,
    max_distance: usize,
    min_frequency: f64,
    max_frequency: f64,
}

impl PitchMapper {
    pub fn new(
        min_distance: usize,
        max_distance: usize,
        min_frequency: f64,
        max_frequency: f64,
    ) -> Result<Self> {
        if max_distance <= min_distance {
            return Err(SonarError::config(format!(
                "max_distance ({max_distance}) must be greater than min_distance ({min_distance})"
            )));
        }
        if !(min_frequency.is_finite() && max_frequency.is_finite()) {
            return Err(SonarError::config("frequency range must be finite"));
        }
        Ok(Self {
            min_distance,
            max_distance,
            min_frequency,
            max_frequency,
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(
            config.min_distance,
            config.max_distance,
            config.min_frequency,
            config.max_frequency,
        )
    }

    /// Returns the click frequency in Hz for an inter-edge distance.
    pub fn frequency(&self, distance: usize) -> f64 {
        let clamped = distance.clamp(self.min_distance, self.max_distance);
        let span = (self.max_distance - self.min_distance) as f64;
        let normalized = (clamped - self.min_distance) as f64 / span;
        let inverted = 1.0 - normalized;
        self.min_frequency + inverted * (self.max_frequency - self.min_frequency)
    }

    pub fn distance_range(&self) -> (usize, usize) {
        (self.min_distance, self.max_distance)
    }

    pub fn frequency_range(&self) -> (f64, f64) {
        (self.min_frequency, self.max_frequency)
    }
}
