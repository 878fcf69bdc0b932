use std::{f32::consts::PI, fmt, sync::Arc};

use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};
use serde::{Deserialize, Serialize};

use crate::{AudioBuffer, Result};

/// Diagnostic description of a rendered buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BufferSummary {
    pub duration_seconds: f32,
    pub peak: f32,
    pub rms: f32,
    /// Magnitude-weighted mean frequency in Hz.
    pub spectral_centroid_hz: f32,
    /// Centre frequency of the strongest spectral bin in Hz.
    pub dominant_frequency_hz: f32,
}

/// Computes [`BufferSummary`] values. FFT plans and scratch space are cached
/// between calls with the same buffer length.
pub struct SpectrumAnalyzer {
    fft_planner: RealFftPlanner<f32>,
    fft: Option<FftResources>,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self {
            fft_planner: RealFftPlanner::new(),
            fft: None,
        }
    }

    pub fn summarize(&mut self, buffer: &AudioBuffer) -> Result<BufferSummary> {
        let mut summary = BufferSummary {
            duration_seconds: buffer.duration_seconds(),
            peak: buffer.peak(),
            rms: buffer.rms(),
            ..Default::default()
        };

        let samples = buffer.samples();
        if samples.len() < 2 || buffer.sample_rate() == 0 {
            return Ok(summary);
        }

        let len = samples.len();
        let bin_hz = buffer.sample_rate() as f32 / len as f32;
        let fft = self.prepare_fft(len);

        for (index, value) in samples.iter().enumerate() {
            fft.input[index] = *value * hann_value(index, len);
        }

        fft.plan
            .process_with_scratch(&mut fft.input, &mut fft.spectrum, &mut fft.scratch)?;

        let mut magnitude_sum = 0.0;
        let mut weighted_sum = 0.0;
        let mut strongest = (0_usize, 0.0_f32);

        for (i, bin) in fft.spectrum.iter().enumerate() {
            let magnitude = bin.norm();
            magnitude_sum += magnitude;
            weighted_sum += magnitude * (i as f32 * bin_hz);
            if magnitude > strongest.1 {
                strongest = (i, magnitude);
            }
        }

        if magnitude_sum > f32::EPSILON {
            summary.spectral_centroid_hz = weighted_sum / magnitude_sum;
            summary.dominant_frequency_hz = strongest.0 as f32 * bin_hz;
        }

        Ok(summary)
    }

    fn prepare_fft(&mut self, size: usize) -> &mut FftResources {
        let stale = self
            .fft
            .as_ref()
            .map(|fft| fft.size != size)
            .unwrap_or(false);
        if stale {
            self.fft = None;
        }

        let planner = &mut self.fft_planner;
        self.fft.get_or_insert_with(|| {
            let plan = planner.plan_fft_forward(size);
            let scratch = plan.make_scratch_vec();
            let spectrum = plan.make_output_vec();
            let input = plan.make_input_vec();
            tracing::trace!(size, "planned fft");
            FftResources {
                size,
                plan,
                scratch,
                spectrum,
                input,
            }
        })
    }
}

struct FftResources {
    size: usize,
    plan: Arc<dyn RealToComplex<f32>>,
    scratch: Vec<Complex32>,
    spectrum: Vec<Complex32>,
    input: Vec<f32>,
}

impl fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("fft", &self.fft)
            .finish()
    }
}

impl fmt::Debug for FftResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftResources")
            .field("size", &self.size)
            .finish()
    }
}

fn hann_value(index: usize, len: usize) -> f32 {
    if len <= 1 {
        return 1.0;
    }

    0.5 - 0.5 * ((2.0 * PI * index as f32) / (len as f32 - 1.0)).cos()
}
