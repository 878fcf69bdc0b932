use serde::{Deserialize, Serialize};

use crate::{
    edges::detect_edges, smoothing::moving_average, AudioBuffer, ClickSynth, Edge,
    PipelineConfig, Result,
};

/// Everything produced while sonifying one scanline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub input_len: usize,
    pub edges: Vec<Edge>,
    /// Edges that produced a click.
    pub sounding_edges: usize,
    pub buffer: AudioBuffer,
}

/// Stateless scanline-to-audio pipeline: smoothing, edge detection, pitch
/// mapping and click synthesis.
///
/// Construction validates the configuration; processing never fails. Each call
/// allocates its own output buffer, so a shared `Sonifier` can serve several
/// threads at once.
#[derive(Debug, Clone)]
pub struct Sonifier {
    config: PipelineConfig,
    synth: ClickSynth,
}

impl Sonifier {
    pub fn new(config: PipelineConfig, sample_rate: u32) -> Result<Self> {
        let synth = ClickSynth::new(&config, sample_rate)?;
        Ok(Self { config, synth })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> u32 {
        self.synth.sample_rate()
    }

    pub fn synth(&self) -> &ClickSynth {
        &self.synth
    }

    /// Runs the pipeline and returns only the rendered buffer.
    pub fn process(&self, brightness: &[u8]) -> AudioBuffer {
        self.process_with_report(brightness).buffer
    }

    pub fn process_with_report(&self, brightness: &[u8]) -> FrameReport {
        let smoothed = moving_average(brightness, self.config.smoothing_window);
        let edges = detect_edges(&smoothed, self.config.threshold);
        let buffer = self.synth.render(&edges, smoothed.len());
        let sounding_edges = edges.iter().filter(|edge| edge.is_dark_to_light()).count();

        tracing::debug!(
            input_len = brightness.len(),
            edges = edges.len(),
            sounding_edges,
            samples = buffer.len(),
            "sonified scanline"
        );

        FrameReport {
            input_len: brightness.len(),
            edges,
            sounding_edges,
            buffer,
        }
    }
}
