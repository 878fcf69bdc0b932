//! Core library for the Scanline Sonar application.
//!
//! A scanline of green-channel brightness values is smoothed, scanned for
//! threshold crossings and rendered as a buffer of short pitched clicks, one
//! per dark-to-light edge, pitched by the distance since the previous edge.
//! The surrounding modules provide the pieces a driver needs around that
//! pipeline: configuration, scanline sources, playback sinks and frame
//! rate limiting.

pub mod analysis;
pub mod buffer;
pub mod config;
pub mod driver;
pub mod edges;
pub mod error;
pub mod mapping;
pub mod scanline;
pub mod sink;
pub mod smoothing;
pub mod sonifier;
pub mod synth;
pub mod timeline;

pub use analysis::{BufferSummary, SpectrumAnalyzer};
pub use buffer::AudioBuffer;
pub use config::{AppConfig, PipelineConfig, PlaybackConfig};
pub use driver::{FrameOutcome, ScanDriver};
pub use edges::{detect_edges, Edge, Transition};
pub use error::{Result, SonarError};
pub use mapping::PitchMapper;
pub use scanline::{green_channel, ScanlineImage};
pub use sink::{MemorySink, PlaybackSink, WavSink};
pub use smoothing::moving_average;
pub use sonifier::{FrameReport, Sonifier};
pub use synth::ClickSynth;
pub use timeline::{FrameClock, FrameLimiter};
