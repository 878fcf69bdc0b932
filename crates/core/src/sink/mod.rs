//! Playback sinks that take ownership of rendered buffers.

use std::{
    fmt,
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::{AudioBuffer, Result, SonarError};

/// Destination for rendered buffers.
///
/// A sink is acquired with [`initialize`](PlaybackSink::initialize) and
/// released with [`shutdown`](PlaybackSink::shutdown). Submitted buffers are
/// owned by the sink from then on.
pub trait PlaybackSink {
    fn initialize(&mut self) -> Result<()>;

    fn submit(&mut self, buffer: AudioBuffer) -> Result<()>;

    fn shutdown(&mut self) -> Result<()>;

    fn is_initialized(&self) -> bool;
}

/// Writes every submitted buffer, scaled by the output volume, to a mono
/// 32-bit float WAV file.
pub struct WavSink {
    path: PathBuf,
    sample_rate: u32,
    volume: f32,
    writer: Option<WavWriter<BufWriter<File>>>,
    samples_written: usize,
}

impl WavSink {
    pub fn new(path: impl Into<PathBuf>, sample_rate: u32, volume: f32) -> Self {
        Self {
            path: path.into(),
            sample_rate,
            volume,
            writer: None,
            samples_written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn samples_written(&self) -> usize {
        self.samples_written
    }
}

impl PlaybackSink for WavSink {
    fn initialize(&mut self) -> Result<()> {
        if self.writer.is_some() {
            return Ok(());
        }

        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        self.writer = Some(WavWriter::create(&self.path, spec)?);
        self.samples_written = 0;
        tracing::info!(
            path = %self.path.display(),
            sample_rate = self.sample_rate,
            "opened wav sink"
        );
        Ok(())
    }

    fn submit(&mut self, buffer: AudioBuffer) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(SonarError::SinkNotInitialized)?;
        if buffer.sample_rate() != self.sample_rate {
            return Err(SonarError::msg(format!(
                "buffer sample rate {} does not match sink rate {}",
                buffer.sample_rate(),
                self.sample_rate
            )));
        }

        for sample in buffer.samples() {
            writer.write_sample(sample * self.volume)?;
        }
        self.samples_written += buffer.len();
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
            tracing::info!(
                path = %self.path.display(),
                samples = self.samples_written,
                "closed wav sink"
            );
        }
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.writer.is_some()
    }
}

impl fmt::Debug for WavSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WavSink")
            .field("path", &self.path)
            .field("sample_rate", &self.sample_rate)
            .field("volume", &self.volume)
            .field("open", &self.writer.is_some())
            .field("samples_written", &self.samples_written)
            .finish()
    }
}

impl Drop for WavSink {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            tracing::warn!(%err, "failed to finalize wav sink");
        }
    }
}

/// Keeps submitted buffers in memory, scaled by the output volume.
#[derive(Debug, Default)]
pub struct MemorySink {
    volume: f32,
    initialized: bool,
    buffers: Vec<AudioBuffer>,
}

impl MemorySink {
    pub fn new(volume: f32) -> Self {
        Self {
            volume,
            ..Default::default()
        }
    }

    pub fn buffers(&self) -> &[AudioBuffer] {
        &self.buffers
    }

    pub fn take_buffers(&mut self) -> Vec<AudioBuffer> {
        std::mem::take(&mut self.buffers)
    }
}

impl PlaybackSink for MemorySink {
    fn initialize(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn submit(&mut self, buffer: AudioBuffer) -> Result<()> {
        if !self.initialized {
            return Err(SonarError::SinkNotInitialized);
        }
        self.buffers.push(buffer.scaled(self.volume));
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.initialized = false;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }
}
