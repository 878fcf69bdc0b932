use crate::{Result, SonarError};

/// Simulated driver time, advanced by whoever feeds frames in.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    pub time_seconds: f64,
}

impl FrameClock {
    pub fn reset(&mut self) {
        self.time_seconds = 0.0;
    }

    pub fn advance(&mut self, delta: f64) {
        self.time_seconds = (self.time_seconds + delta).max(0.0);
    }
}

/// Caps how often frames are admitted for processing.
///
/// A frame is admitted when strictly more than one frame interval has passed
/// since the last admitted frame. The first frame is admitted once its
/// timestamp exceeds one interval, matching a limiter whose last timestamp
/// starts at zero.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    min_interval: f64,
    last_admitted: f64,
}

impl FrameLimiter {
    pub fn new(max_fps: f32) -> Result<Self> {
        if !(max_fps.is_finite() && max_fps > 0.0) {
            return Err(SonarError::config(format!(
                "max_fps must be a positive number, got {max_fps}"
            )));
        }
        Ok(Self {
            min_interval: 1.0 / f64::from(max_fps),
            last_admitted: 0.0,
        })
    }

    pub fn min_interval(&self) -> f64 {
        self.min_interval
    }

    /// Returns `true` and records the timestamp if the frame may be processed.
    pub fn admit(&mut self, time_seconds: f64) -> bool {
        if time_seconds - self.last_admitted > self.min_interval {
            self.last_admitted = time_seconds;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last_admitted = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_never_goes_negative() {
        let mut clock = FrameClock::default();
        clock.advance(0.5);
        clock.advance(-2.0);
        assert_eq!(clock.time_seconds, 0.0);
        clock.advance(0.25);
        clock.reset();
        assert_eq!(clock.time_seconds, 0.0);
    }

    #[test]
    fn source_twice_as_fast_as_cap() {
        let mut limiter = FrameLimiter::new(4.0).unwrap();
        let mut clock = FrameClock::default();
        let mut admitted = Vec::new();

        for frame in 1..=12 {
            clock.advance(0.125);
            if limiter.admit(clock.time_seconds) {
                admitted.push(frame);
            }
        }

        // exactly one interval apart is not enough
        assert_eq!(admitted, vec![3, 6, 9, 12]);
    }

    #[test]
    fn default_cap_interval() {
        let limiter = FrameLimiter::new(30.0).unwrap();
        assert!((limiter.min_interval() - 1.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn slow_sources_pass_through() {
        let mut limiter = FrameLimiter::new(30.0).unwrap();
        let admitted = (1..=10)
            .filter(|frame| limiter.admit(*frame as f64 * 0.1))
            .count();
        assert_eq!(admitted, 10);
    }

    #[test]
    fn rejects_non_positive_rate() {
        assert!(FrameLimiter::new(0.0).is_err());
        assert!(FrameLimiter::new(f32::INFINITY).is_err());
    }
}
