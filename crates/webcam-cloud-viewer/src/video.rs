//! Frame source selection.

use crate::config::{Config, SourceKind};
use pixcloud::{Error, NoSignal, TestPattern, VideoSource};
use std::fmt;

#[cfg(feature = "webcam")]
pub mod webcam;

/// Resolution of the synthetic pattern; matches the capture size the webcam asks for.
const PATTERN_SIZE: (u32, u32) = (1280, 720);

/// Consecutive failed reads tolerated before a capture device is given up on.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 30;

/// Tracks back-to-back frame read/decode failures on a capture device.
///
/// Isolated bad frames are dropped; only a sustained run of failures ends
/// capture. Any good frame resets the count.
#[derive(Debug, Clone)]
pub struct FailureBudget {
    consecutive: u32,
    limit: u32,
}

impl FailureBudget {
    pub fn new(limit: u32) -> Self {
        Self {
            consecutive: 0,
            limit: limit.max(1),
        }
    }

    pub fn record_success(&mut self) {
        self.consecutive = 0;
    }

    /// Counts one failure. Once the limit is reached, returns the
    /// [`Error::Capture`] that ends capture.
    pub fn record_failure(&mut self, cause: impl fmt::Display) -> Option<Error> {
        self.consecutive = self.consecutive.saturating_add(1);
        (self.consecutive >= self.limit).then(|| {
            Error::Capture(format!(
                "{} consecutive frames failed, last error: {}",
                self.consecutive, cause
            ))
        })
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }
}

impl Default for FailureBudget {
    fn default() -> Self {
        Self::new(MAX_CONSECUTIVE_FAILURES)
    }
}

/// Opens the configured source.
///
/// Capture failures are not fatal: the session continues with [`NoSignal`]
/// and the point cloud stays static.
pub fn open_source(config: &Config) -> Box<dyn VideoSource> {
    match config.source {
        SourceKind::Pattern => Box::new(TestPattern::new(PATTERN_SIZE.0, PATTERN_SIZE.1)),
        SourceKind::Webcam => match open_webcam(config.camera_index) {
            Ok(source) => source,
            Err(err) => {
                log::warn!("Webcam unavailable, continuing without video: {}", err);
                Box::new(NoSignal)
            }
        },
    }
}

#[cfg(feature = "webcam")]
fn open_webcam(index: u32) -> pixcloud::Result<Box<dyn VideoSource>> {
    Ok(Box::new(webcam::WebcamSource::open(index)?))
}

#[cfg(not(feature = "webcam"))]
fn open_webcam(_index: u32) -> pixcloud::Result<Box<dyn VideoSource>> {
    Err(pixcloud::Error::VideoUnavailable(
        "built without the `webcam` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn isolated_bad_frames_are_skipped() {
        let mut budget = FailureBudget::new(3);
        assert!(budget.record_failure("corrupt jpeg").is_none());
        assert!(budget.record_failure("corrupt jpeg").is_none());
        budget.record_success();
        assert_eq!(budget.consecutive(), 0);

        // Alternating good and bad frames never exhaust the budget.
        for _ in 0..100 {
            assert!(budget.record_failure("corrupt jpeg").is_none());
            budget.record_success();
        }
    }

    #[test]
    fn sustained_failures_end_capture() {
        let mut budget = FailureBudget::default();
        for _ in 1..MAX_CONSECUTIVE_FAILURES {
            assert!(budget.record_failure("timeout").is_none());
        }
        match budget.record_failure("device unplugged") {
            Some(Error::Capture(msg)) => {
                assert!(msg.starts_with(&MAX_CONSECUTIVE_FAILURES.to_string()));
                assert!(msg.ends_with("device unplugged"));
            }
            other => panic!("expected a capture error, got {:?}", other),
        }
    }

    #[test]
    fn zero_limit_gives_up_on_first_failure() {
        let mut budget = FailureBudget::new(0);
        assert!(budget.record_failure("timeout").is_some());
    }

    #[cfg(not(feature = "webcam"))]
    #[test]
    fn missing_backend_degrades_to_no_signal() {
        let cfg = Config::parse_from(["webcam-cloud", "--source", "webcam"]);
        let source = open_source(&cfg);
        assert!(!source.is_ready());
        assert_eq!(source.describe(), "no signal");
    }

    #[test]
    fn pattern_source_is_ready_immediately() {
        let cfg = Config::parse_from(["webcam-cloud", "--source", "pattern"]);
        assert!(open_source(&cfg).is_ready());
    }
}
