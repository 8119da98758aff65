// src/pinch.rs - Hysteresis state machine for thumb pinches
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry;
use crate::landmarks::{Hand, INDEX_TIP, MIDDLE_TIP, THUMB_TIP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinchType {
    /// Thumb + index: left click, drag.
    ThumbIndex,
    /// Thumb + middle: right click.
    ThumbMiddle,
}

impl PinchType {
    pub const ALL: [PinchType; 2] = [PinchType::ThumbIndex, PinchType::ThumbMiddle];

    pub fn landmarks(&self) -> (usize, usize) {
        match self {
            Self::ThumbIndex => (THUMB_TIP, INDEX_TIP),
            Self::ThumbMiddle => (THUMB_TIP, MIDDLE_TIP),
        }
    }

    /// Only one pinch may turn into a drag.
    pub fn is_drag_eligible(&self) -> bool {
        matches!(self, Self::ThumbIndex)
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThumbIndex => "thumb-index",
            Self::ThumbMiddle => "thumb-middle",
        }
    }

    /// Fingertip distance in camera pixels.
    pub fn distance(&self, hand: &Hand, frame_width: f64) -> f64 {
        let (a, b) = self.landmarks();
        geometry::pixel_distance(hand, a, b, frame_width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinchState {
    #[default]
    Inactive,
    Active,
}

/// `on` activates, `off` releases; `off > on` leaves a dead zone between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchThresholds {
    pub on: f64,
    pub off: f64,
}

/// Result of one evaluation. Each edge flag is true for exactly one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PinchUpdate {
    pub state: PinchState,
    pub just_activated: bool,
    pub just_released: bool,
}

impl PinchUpdate {
    pub fn is_active(&self) -> bool {
        self.state == PinchState::Active
    }
}

/// Stored state for one pinch type.
#[derive(Debug, Clone)]
pub struct GestureState {
    pub pinch: PinchType,
    pub state: PinchState,
    pub last_transition: Option<f64>,
    pub last_distance: Option<f64>,
}

impl GestureState {
    pub fn new(pinch: PinchType) -> Self {
        Self {
            pinch,
            state: PinchState::Inactive,
            last_transition: None,
            last_distance: None,
        }
    }

    /// Feeds one distance sample. The state only flips at or below `on`
    /// (activate) or at or above `off` (release); anything in between keeps
    /// the stored state.
    pub fn update(&mut self, distance: f64, now: f64, thresholds: &PinchThresholds) -> PinchUpdate {
        self.last_distance = Some(distance);

        let next = match self.state {
            PinchState::Inactive if distance <= thresholds.on => PinchState::Active,
            PinchState::Active if distance >= thresholds.off => PinchState::Inactive,
            unchanged => unchanged,
        };

        let changed = next != self.state;
        if changed {
            debug!(
                "{} pinch {:?} -> {:?} at {:.3}s (distance {:.1})",
                self.pinch.as_str(),
                self.state,
                next,
                now,
                distance
            );
            self.state = next;
            self.last_transition = Some(now);
        }

        PinchUpdate {
            state: next,
            just_activated: changed && next == PinchState::Active,
            just_released: changed && next == PinchState::Inactive,
        }
    }

    /// Feeds a sample from a frame where the pinch is not allowed. An active
    /// pinch releases and an inactive one stays inactive, whatever the distance.
    pub fn suppress(&mut self, distance: f64, now: f64) -> PinchUpdate {
        self.last_distance = Some(distance);
        if self.state == PinchState::Inactive {
            return self.snapshot();
        }

        debug!(
            "{} pinch released at {:.3}s (finger lowered)",
            self.pinch.as_str(),
            now
        );
        self.state = PinchState::Inactive;
        self.last_transition = Some(now);
        PinchUpdate {
            state: PinchState::Inactive,
            just_activated: false,
            just_released: true,
        }
    }

    /// Current state with no edges, for frames where the hand is missing.
    pub fn snapshot(&self) -> PinchUpdate {
        PinchUpdate {
            state: self.state,
            ..PinchUpdate::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == PinchState::Active
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.pinch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: PinchThresholds = PinchThresholds { on: 35.0, off: 45.0 };

    fn run(distances: &[f64]) -> (GestureState, Vec<PinchUpdate>) {
        let mut state = GestureState::new(PinchType::ThumbIndex);
        let updates = distances
            .iter()
            .enumerate()
            .map(|(i, d)| state.update(*d, i as f64 / 30.0, &THRESHOLDS))
            .collect();
        (state, updates)
    }

    #[test]
    fn activates_at_on_threshold() {
        let (state, updates) = run(&[50.0, 40.0, 35.0]);
        assert!(state.is_active());
        assert!(!updates[1].is_active());
        assert!(updates[2].just_activated);
    }

    #[test]
    fn releases_at_off_threshold() {
        let (state, updates) = run(&[30.0, 44.9, 45.0]);
        assert!(!state.is_active());
        assert!(updates[1].is_active());
        assert!(updates[2].just_released);
    }

    #[test]
    fn dead_zone_holds_state() {
        // Oscillating inside (on, off) must never toggle, from either side.
        let (_, updates) = run(&[50.0, 40.0, 36.0, 44.0, 38.0, 42.0]);
        assert!(updates.iter().all(|u| !u.is_active()));

        let (_, updates) = run(&[30.0, 40.0, 36.0, 44.0, 38.0, 42.0]);
        assert!(updates.iter().all(|u| u.is_active()));
        assert_eq!(updates.iter().filter(|u| u.just_activated).count(), 1);
    }

    #[test]
    fn monotonic_sweep_toggles_once_each_way() {
        let down: Vec<f64> = (0..=40).map(|i| 60.0 - i as f64).collect();
        let up: Vec<f64> = (0..=40).map(|i| 20.0 + i as f64).collect();
        let sweep: Vec<f64> = down.into_iter().chain(up).collect();
        let (_, updates) = run(&sweep);

        let activations: Vec<usize> = (0..sweep.len()).filter(|&i| updates[i].just_activated).collect();
        let releases: Vec<usize> = (0..sweep.len()).filter(|&i| updates[i].just_released).collect();
        assert_eq!(activations.len(), 1);
        assert_eq!(releases.len(), 1);
        assert_eq!(sweep[activations[0]], 35.0);
        assert_eq!(sweep[releases[0]], 45.0);
    }

    #[test]
    fn edges_last_one_frame() {
        let (_, updates) = run(&[30.0, 30.0, 50.0, 50.0]);
        assert!(updates[0].just_activated);
        assert!(!updates[1].just_activated);
        assert!(updates[2].just_released);
        assert!(!updates[3].just_released);
    }

    #[test]
    fn records_transition_time_and_distance() {
        let mut state = GestureState::new(PinchType::ThumbMiddle);
        state.update(50.0, 1.0, &THRESHOLDS);
        assert_eq!(state.last_transition, None);
        state.update(20.0, 2.0, &THRESHOLDS);
        assert_eq!(state.last_transition, Some(2.0));
        assert_eq!(state.last_distance, Some(20.0));
    }

    #[test]
    fn reset_returns_to_inactive() {
        let (mut state, _) = run(&[10.0]);
        state.reset();
        assert_eq!(state.state, PinchState::Inactive);
        assert_eq!(state.last_distance, None);
        assert_eq!(state.pinch, PinchType::ThumbIndex);
    }

    #[test]
    fn suppressed_pinch_cannot_activate() {
        let mut state = GestureState::new(PinchType::ThumbIndex);
        let update = state.suppress(5.0, 0.0);
        assert_eq!(update, PinchUpdate::default());
        assert_eq!(state.last_distance, Some(5.0));
        // Allowed again, the same distance activates normally.
        assert!(state.update(5.0, 0.1, &THRESHOLDS).just_activated);
    }

    #[test]
    fn suppressing_an_active_pinch_releases_it_once() {
        let (mut state, _) = run(&[20.0]);
        let first = state.suppress(20.0, 0.5);
        assert!(first.just_released);
        assert!(!first.is_active());
        assert_eq!(state.last_transition, Some(0.5));
        assert!(!state.suppress(20.0, 0.6).just_released);
    }
}
