// src/hold.rs - Click vs. drag timing on top of a pinch
use tracing::debug;

use crate::pinch::{PinchType, PinchUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldState {
    #[default]
    Idle,
    Held,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldOutcome {
    /// Released before turning into a drag, after `held` seconds.
    Click { held: f64 },
    DragStart,
    DragEnd,
}

#[derive(Debug, Clone)]
pub struct HoldTimer {
    pinch: PinchType,
    state: HoldState,
    hold_start: f64,
}

impl HoldTimer {
    pub fn new(pinch: PinchType) -> Self {
        Self {
            pinch,
            state: HoldState::Idle,
            hold_start: 0.0,
        }
    }

    pub fn pinch(&self) -> PinchType {
        self.pinch
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    /// Seconds the pinch has been held, if it is held.
    pub fn held_for(&self, now: f64) -> Option<f64> {
        match self.state {
            HoldState::Idle => None,
            _ => Some(now - self.hold_start),
        }
    }

    /// Advances the timer with this frame's pinch result. Timeouts are only
    /// checked here, so a stalled stream pauses the timer.
    pub fn update(&mut self, pinch: &PinchUpdate, now: f64, drag_hold: f64) -> Option<HoldOutcome> {
        if pinch.just_activated {
            self.state = HoldState::Held;
            self.hold_start = now;
            return None;
        }

        if pinch.just_released {
            let outcome = match self.state {
                HoldState::Held => Some(HoldOutcome::Click {
                    held: now - self.hold_start,
                }),
                HoldState::Dragging => Some(HoldOutcome::DragEnd),
                HoldState::Idle => None,
            };
            self.state = HoldState::Idle;
            return outcome;
        }

        if pinch.is_active()
            && self.state == HoldState::Held
            && self.pinch.is_drag_eligible()
            && now - self.hold_start >= drag_hold
        {
            debug!(
                "{} held {:.3}s, promoting to drag",
                self.pinch.as_str(),
                now - self.hold_start
            );
            self.state = HoldState::Dragging;
            return Some(HoldOutcome::DragStart);
        }

        None
    }

    /// Drops to Idle without an outcome. Returns whether a drag was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.state == HoldState::Dragging;
        self.state = HoldState::Idle;
        was_dragging
    }
}
