use crate::{FrameLimiter, PlaybackSink, Result, Sonifier};

/// What happened to a frame offered to the [`ScanDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Arrived too soon after the previous processed frame.
    Throttled,
    /// Rendered and handed to the sink.
    Submitted { edges: usize, samples: usize },
    /// Rendered, but the sink refused the buffer.
    Dropped { edges: usize },
}

/// Feeds rate-limited scanlines through a [`Sonifier`] into an injected
/// playback sink.
#[derive(Debug)]
pub struct ScanDriver<S: PlaybackSink> {
    sonifier: Sonifier,
    limiter: FrameLimiter,
    sink: S,
}

impl<S: PlaybackSink> ScanDriver<S> {
    pub fn new(sonifier: Sonifier, max_fps: f32, sink: S) -> Result<Self> {
        Ok(Self {
            sonifier,
            limiter: FrameLimiter::new(max_fps)?,
            sink,
        })
    }

    pub fn sonifier(&self) -> &Sonifier {
        &self.sonifier
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Acquires the sink.
    pub fn start(&mut self) -> Result<()> {
        self.limiter.reset();
        self.sink.initialize()
    }

    /// Processes `brightness` if the limiter admits a frame at
    /// `time_seconds`. Sink failures are logged and do not affect later
    /// frames.
    pub fn offer_frame(&mut self, time_seconds: f64, brightness: &[u8]) -> FrameOutcome {
        if !self.limiter.admit(time_seconds) {
            return FrameOutcome::Throttled;
        }

        let report = self.sonifier.process_with_report(brightness);
        let edges = report.edges.len();
        let samples = report.buffer.len();

        match self.sink.submit(report.buffer) {
            Ok(()) => FrameOutcome::Submitted { edges, samples },
            Err(err) => {
                tracing::warn!(%err, time_seconds, "dropping rendered frame");
                FrameOutcome::Dropped { edges }
            }
        }
    }

    /// Releases the sink and hands it back.
    pub fn stop(mut self) -> Result<S> {
        self.sink.shutdown()?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AudioBuffer, MemorySink, PipelineConfig, SonarError};

    fn sonifier() -> Sonifier {
        Sonifier::new(PipelineConfig::default(), 8_000).unwrap()
    }

    fn stripes() -> Vec<u8> {
        (0..300)
            .map(|i| if (i / 30) % 2 == 1 { 255 } else { 0 })
            .collect()
    }

    /// Fails every other submission.
    #[derive(Debug, Default)]
    struct FlakySink {
        ready: bool,
        calls: usize,
        accepted: Vec<AudioBuffer>,
    }

    impl PlaybackSink for FlakySink {
        fn initialize(&mut self) -> Result<()> {
            self.ready = true;
            Ok(())
        }

        fn submit(&mut self, buffer: AudioBuffer) -> Result<()> {
            self.calls += 1;
            if self.calls % 2 == 1 {
                return Err(SonarError::msg("device busy"));
            }
            self.accepted.push(buffer);
            Ok(())
        }

        fn shutdown(&mut self) -> Result<()> {
            self.ready = false;
            Ok(())
        }

        fn is_initialized(&self) -> bool {
            self.ready
        }
    }

    #[test]
    fn submits_admitted_frames() {
        let mut driver = ScanDriver::new(sonifier(), 4.0, MemorySink::new(1.0)).unwrap();
        assert_eq!(driver.sonifier().sample_rate(), 8_000);
        driver.start().unwrap();

        let outcomes: Vec<FrameOutcome> = (1..=6)
            .map(|frame| driver.offer_frame(frame as f64 * 0.125, &stripes()))
            .collect();

        assert_eq!(outcomes[0], FrameOutcome::Throttled);
        assert_eq!(
            outcomes[2],
            FrameOutcome::Submitted {
                edges: 9,
                samples: 2_400,
            }
        );

        let sink = driver.stop().unwrap();
        assert!(!sink.is_initialized());
        assert_eq!(sink.buffers().len(), 2);
        assert!((sink.buffers()[0].peak() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unstarted_sink_drops_frames() {
        let mut driver = ScanDriver::new(sonifier(), 30.0, MemorySink::new(1.0)).unwrap();
        let outcome = driver.offer_frame(1.0, &stripes());
        assert_eq!(outcome, FrameOutcome::Dropped { edges: 9 });
    }

    #[test]
    fn sink_failures_do_not_block_later_frames() {
        let mut driver = ScanDriver::new(sonifier(), 30.0, FlakySink::default()).unwrap();
        driver.start().unwrap();

        let first = driver.offer_frame(1.0, &stripes());
        let second = driver.offer_frame(2.0, &stripes());

        assert_eq!(first, FrameOutcome::Dropped { edges: 9 });
        assert!(matches!(second, FrameOutcome::Submitted { edges: 9, .. }));
        assert_eq!(driver.sink().accepted.len(), 1);
    }
}
