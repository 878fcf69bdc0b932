//! Click synthesis: turns detected edges into a peak-normalized mono buffer.

use std::f64::consts::PI;

use crate::{AudioBuffer, Edge, PipelineConfig, PitchMapper, Result, SonarError};

/// Renders a short decaying sine click for every dark-to-light edge.
#[derive(Debug, Clone)]
pub struct ClickSynth {
    sample_rate: u32,
    scan_rate: f64,
    click_duration: f64,
    decay_rate: f64,
    click_gain: f64,
    silent_duration: f64,
    mapper: PitchMapper,
}

impl ClickSynth {
    pub fn new(config: &PipelineConfig, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(SonarError::config("sample_rate must be positive"));
        }
        config.validate()?;

        Ok(Self {
            sample_rate,
            scan_rate: config.scan_rate,
            click_duration: config.click_duration,
            decay_rate: config.decay_rate,
            click_gain: config.click_gain,
            silent_duration: config.silent_duration,
            mapper: PitchMapper::from_config(config)?,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn mapper(&self) -> &PitchMapper {
        &self.mapper
    }

    /// Number of output samples covering `input_len` scanline samples.
    pub fn buffer_len(&self, input_len: usize) -> usize {
        self.seconds_to_samples(input_len as f64 / self.scan_rate)
    }

    /// Output sample at which a click for an edge at `position` starts.
    pub fn start_sample(&self, position: usize) -> usize {
        self.seconds_to_samples(position as f64 / self.scan_rate)
    }

    pub fn click_len(&self) -> usize {
        self.seconds_to_samples(self.click_duration)
    }

    pub fn silent_len(&self) -> usize {
        self.seconds_to_samples(self.silent_duration)
    }

    /// Synthesizes the buffer for `edges` detected over a scanline of
    /// `input_len` samples.
    ///
    /// Without edges the result is a short silent buffer of the configured
    /// silent duration. Otherwise clicks are summed into a buffer spanning the
    /// scanline, samples past its end are dropped, and the result is
    /// normalized to a peak of 1.0.
    pub fn render(&self, edges: &[Edge], input_len: usize) -> AudioBuffer {
        if edges.is_empty() {
            return AudioBuffer::silent(self.silent_len(), self.sample_rate);
        }

        let mut buffer = AudioBuffer::silent(self.buffer_len(input_len), self.sample_rate);
        let click_len = self.click_len();

        for edge in edges.iter().filter(|edge| edge.is_dark_to_light()) {
            let frequency = self.mapper.frequency(edge.distance);
            let start = self.start_sample(edge.position);
            tracing::trace!(
                position = edge.position,
                distance = edge.distance,
                frequency,
                start,
                "rendering click"
            );
            self.accumulate_click(buffer.samples_mut(), start, click_len, frequency);
        }

        buffer.normalize_peak();
        buffer
    }

    fn accumulate_click(&self, output: &mut [f32], start: usize, click_len: usize, frequency: f64) {
        let sample_rate = f64::from(self.sample_rate);
        let Some(window) = output.get_mut(start..) else {
            return;
        };

        for (i, slot) in window.iter_mut().take(click_len).enumerate() {
            let t = i as f64 / click_len as f64;
            let envelope = (-self.decay_rate * t).exp();
            let phase = 2.0 * PI * frequency * i as f64 / sample_rate;
            *slot += (phase.sin() * envelope * self.click_gain) as f32;
        }
    }

    fn seconds_to_samples(&self, seconds: f64) -> usize {
        (seconds * f64::from(self.sample_rate)).floor() as usize
    }
}
