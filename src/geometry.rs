// src/geometry.rs - Distance and position helpers over a validated hand
// Callers must run `Hand::validate` first so that all 21 indices exist.
use nalgebra::Vector2;

use crate::landmarks::*;

/// Distance between two landmarks in normalized units.
pub fn landmark_distance(hand: &Hand, a: usize, b: usize) -> f64 {
    (hand.point(a) - hand.point(b)).norm()
}

/// Distance between two landmarks in camera pixels. Both axes are scaled by
/// the frame width, the convention the pinch thresholds are tuned for.
pub fn pixel_distance(hand: &Hand, a: usize, b: usize, frame_width: f64) -> f64 {
    landmark_distance(hand, a, b) * frame_width
}

/// Mean of all landmark positions.
pub fn centroid(hand: &Hand) -> Vector2<f64> {
    let sum = hand
        .landmarks
        .iter()
        .fold(Vector2::zeros(), |acc, lm| acc + lm.position());
    sum / hand.landmarks.len() as f64
}

/// Mean of the wrist and the four finger MCP joints.
pub fn palm_center(hand: &Hand) -> Vector2<f64> {
    let joints = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
    joints.iter().fold(Vector2::zeros(), |acc, &j| acc + hand.point(j)) / joints.len() as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn tip(&self) -> usize {
        match self {
            Self::Thumb => THUMB_TIP,
            Self::Index => INDEX_TIP,
            Self::Middle => MIDDLE_TIP,
            Self::Ring => RING_TIP,
            Self::Pinky => PINKY_TIP,
        }
    }

    /// PIP joint, or IP for the thumb.
    pub fn middle_joint(&self) -> usize {
        match self {
            Self::Thumb => THUMB_IP,
            Self::Index => INDEX_PIP,
            Self::Middle => MIDDLE_PIP,
            Self::Ring => RING_PIP,
            Self::Pinky => PINKY_PIP,
        }
    }
}

/// Whether a finger is extended.
///
/// Long fingers: the tip lies farther from the wrist than the PIP joint when
/// both are projected on the wrist → middle-MCP axis, so the test follows the
/// hand's orientation instead of the image's vertical.
///
/// Thumb: the tip lies horizontally farther from the palm center than the IP
/// joint.
pub fn is_extended(hand: &Hand, finger: Finger) -> bool {
    if finger == Finger::Thumb {
        let center = palm_center(hand);
        let tip = (hand.point(THUMB_TIP).x - center.x).abs();
        let joint = (hand.point(THUMB_IP).x - center.x).abs();
        return tip > joint;
    }

    let wrist = hand.point(WRIST);
    let axis = hand.point(MIDDLE_MCP) - wrist;
    let length = axis.norm();
    if length <= f64::EPSILON {
        return false;
    }
    let axis = axis / length;

    let tip = (hand.point(finger.tip()) - wrist).dot(&axis);
    let joint = (hand.point(finger.middle_joint()) - wrist).dot(&axis);
    tip > joint
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_hand() -> Hand {
        Hand::synthetic(Handedness::Right, Vector2::new(0.5, 0.6), [true; 5])
    }

    #[test]
    fn pixel_distance_scales_by_width() {
        let mut hand = open_hand();
        hand.set_thumb_gap(INDEX_TIP, 0.05);
        let px = pixel_distance(&hand, THUMB_TIP, INDEX_TIP, 640.0);
        assert!((px - 32.0).abs() < 1e-9);
    }

    #[test]
    fn centroid_is_mean() {
        let mut hand = open_hand();
        for lm in hand.landmarks.iter_mut() {
            lm.x = 0.25;
            lm.y = 0.75;
        }
        let c = centroid(&hand);
        assert!((c.x - 0.25).abs() < 1e-12);
        assert!((c.y - 0.75).abs() < 1e-12);
    }

    #[test]
    fn palm_center_sits_over_wrist_for_symmetric_hand() {
        let hand = open_hand();
        let c = palm_center(&hand);
        assert!((c.x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn open_hand_has_all_fingers_extended() {
        let hand = open_hand();
        for finger in Finger::ALL {
            assert!(is_extended(&hand, finger), "{:?} should be extended", finger);
        }
    }

    #[test]
    fn curled_fingers_are_not_extended() {
        let hand = Hand::synthetic(Handedness::Left, Vector2::new(0.5, 0.6), [false; 5]);
        for finger in Finger::ALL {
            assert!(!is_extended(&hand, finger), "{:?} should be curled", finger);
        }
    }

    #[test]
    fn extension_follows_hand_orientation() {
        // Rotate an open hand 90 degrees so the fingers point right; the
        // vertical-only heuristic would call every finger curled.
        let mut hand = open_hand();
        let wrist = hand.point(WRIST);
        for lm in hand.landmarks.iter_mut() {
            let d = lm.position() - wrist;
            lm.x = wrist.x - d.y;
            lm.y = wrist.y + d.x;
        }
        for finger in [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky] {
            assert!(is_extended(&hand, finger), "{:?} should be extended", finger);
        }
    }

    #[test]
    fn degenerate_axis_counts_as_curled() {
        let mut hand = open_hand();
        hand.landmarks[MIDDLE_MCP] = hand.landmarks[WRIST];
        assert!(!is_extended(&hand, Finger::Index));
    }
}
