// src/error.rs - Error types for configuration, frame validation and landmark sources
use std::path::PathBuf;

use thiserror::Error;

use crate::landmarks::Handedness;

/// Rejected engine configuration. Raised when the config is built or
/// applied, never while frames are being processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pinch-off distance ({off}) must be greater than pinch-on distance ({on})")]
    PinchHysteresis { on: f64, off: f64 },

    #[error("smoothing factor must lie in [0, 1), got {0}")]
    Smoothing(f64),

    #[error("{name} must be a finite, non-negative number of seconds, got {value}")]
    Duration { name: &'static str, value: f64 },

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("min_hand_confidence must lie in [0, 1], got {0}")]
    Confidence(f64),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A hand or frame the engine refuses to process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("{handedness:?} hand has {count} landmarks, expected 21")]
    MalformedHand { handedness: Handedness, count: usize },

    #[error("{handedness:?} hand landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark { handedness: Handedness, index: usize },

    #[error("frame timestamp {current} does not follow previous timestamp {previous}")]
    NonMonotonicTimestamp { previous: f64, current: f64 },
}

/// Failure of the upstream landmark stream.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("landmark stream I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unreadable landmark record: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
