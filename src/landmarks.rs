// src/landmarks.rs - Per-frame hand landmark input from the external detector
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::FrameError;

/// Number of landmarks the detector reports per hand.
pub const LANDMARK_COUNT: usize = 21;

// MediaPipe hand landmark indices
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// One landmark in normalized image coordinates (x, y in [0, 1]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f64::is_finite)
    }
}

fn full_confidence() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub handedness: Handedness,
    pub landmarks: Vec<Landmark>,
    #[serde(default = "full_confidence")]
    pub confidence: f64,
}

impl Hand {
    pub fn new(handedness: Handedness, landmarks: Vec<Landmark>, confidence: f64) -> Self {
        Self {
            handedness,
            landmarks,
            confidence,
        }
    }

    /// Checks the detector contract: exactly 21 finite landmarks.
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.landmarks.len() != LANDMARK_COUNT {
            return Err(FrameError::MalformedHand {
                handedness: self.handedness,
                count: self.landmarks.len(),
            });
        }
        if let Some(index) = self.landmarks.iter().position(|lm| !lm.is_finite()) {
            return Err(FrameError::NonFiniteLandmark {
                handedness: self.handedness,
                index,
            });
        }
        Ok(())
    }

    /// Normalized 2D position of a landmark. Only call on a validated hand.
    pub fn point(&self, index: usize) -> Vector2<f64> {
        self.landmarks[index].position()
    }

    /// Builds an upright hand (fingers pointing up the image) with its wrist
    /// at `wrist`. Used by the simulated source and by tests.
    pub fn synthetic(handedness: Handedness, wrist: Vector2<f64>, extended: [bool; 5]) -> Self {
        // Offsets are for a right hand; a left hand mirrors them on x.
        let side = match handedness {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        };
        let at = |dx: f64, dy: f64| Landmark::new(wrist.x + side * dx, wrist.y + dy);

        let mut landmarks = Vec::with_capacity(LANDMARK_COUNT);
        landmarks.push(at(0.0, 0.0));

        landmarks.push(at(-0.03, -0.02));
        landmarks.push(at(-0.055, -0.04));
        landmarks.push(at(-0.07, -0.055));
        landmarks.push(if extended[0] {
            at(-0.095, -0.075)
        } else {
            at(-0.04, -0.06)
        });

        for (finger, mcp_x) in [-0.045, -0.015, 0.015, 0.045].into_iter().enumerate() {
            landmarks.push(at(mcp_x, -0.08));
            landmarks.push(at(mcp_x, -0.11));
            if extended[finger + 1] {
                landmarks.push(at(mcp_x, -0.13));
                landmarks.push(at(mcp_x, -0.15));
            } else {
                landmarks.push(at(mcp_x, -0.10));
                landmarks.push(at(mcp_x, -0.085));
            }
        }

        Self::new(handedness, landmarks, 0.95)
    }

    /// Moves the thumb tip to `gap` (normalized units) beside `target`, on the
    /// thumb's side of the hand.
    pub fn set_thumb_gap(&mut self, target: usize, gap: f64) {
        let side = match self.handedness {
            Handedness::Right => -1.0,
            Handedness::Left => 1.0,
        };
        let anchor = self.landmarks[target];
        self.landmarks[THUMB_TIP] = Landmark::new(anchor.x + side * gap, anchor.y);
    }
}

/// Everything the detector saw in one camera frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Capture time in seconds.
    pub timestamp: f64,
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl LandmarkFrame {
    pub fn new(timestamp: f64, hands: Vec<Hand>) -> Self {
        Self { timestamp, hands }
    }

    pub fn empty(timestamp: f64) -> Self {
        Self::new(timestamp, Vec::new())
    }
}
