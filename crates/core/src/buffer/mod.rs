use serde::{Deserialize, Serialize};

/// Owned mono block of floating point audio produced for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Creates an all-zero buffer of `len` samples.
    pub fn silent(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples
            .iter()
            .fold(0.0_f32, |acc, sample| acc.max(sample.abs()))
    }

    pub fn rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.samples.iter().map(|sample| sample * sample).sum();
        (sum / self.samples.len() as f32).sqrt()
    }

    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|sample| *sample == 0.0)
    }

    /// Divides every sample by the current peak so the loudest sample sits at
    /// exactly 1.0. Silent buffers are left untouched. Returns the peak
    /// measured before scaling.
    pub fn normalize_peak(&mut self) -> f32 {
        let peak = self.peak();
        if peak > 0.0 {
            for sample in &mut self.samples {
                *sample /= peak;
            }
        }
        peak
    }

    /// Returns a copy of the buffer with every sample multiplied by `gain`.
    pub fn scaled(&self, gain: f32) -> Self {
        Self::new(
            self.samples.iter().map(|sample| sample * gain).collect(),
            self.sample_rate,
        )
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_buffer_has_no_peak() {
        let mut buffer = AudioBuffer::silent(480, 48_000);
        assert_eq!(buffer.len(), 480);
        assert!(buffer.is_silent());
        assert_eq!(buffer.normalize_peak(), 0.0);
        assert!(buffer.is_silent());
        assert!((buffer.duration_seconds() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn normalizes_to_unit_peak() {
        let mut buffer = AudioBuffer::new(vec![0.1, -0.4, 0.2, 0.0], 8);
        let peak = buffer.normalize_peak();
        assert!((peak - 0.4).abs() < f32::EPSILON);
        assert_eq!(buffer.peak(), 1.0);
        assert_eq!(buffer.samples()[1], -1.0);
        assert!((buffer.samples()[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn scaling_keeps_sample_rate() {
        let buffer = AudioBuffer::new(vec![1.0, -1.0], 44_100);
        let quiet = buffer.scaled(0.5);
        assert_eq!(quiet.samples(), &[0.5, -0.5]);
        assert_eq!(quiet.sample_rate(), 44_100);
    }

    #[test]
    fn rms_of_empty_buffer_is_zero() {
        assert_eq!(AudioBuffer::silent(0, 44_100).rms(), 0.0);
        assert!((AudioBuffer::new(vec![1.0; 4], 4).rms() - 1.0).abs() < 1e-6);
    }
}
