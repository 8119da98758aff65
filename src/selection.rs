// src/selection.rs - Turns per-frame typing candidates into confirmed key selections
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::keys::{self, Key, TypingMode};
use crate::layout::Hover;
use crate::zones::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    /// A (zone, finger count) pair held unchanged for the stability duration
    /// confirms once, then stays latched until it changes.
    #[default]
    Debounce,
    /// Hovering one on-screen key for the dwell duration confirms it. The
    /// pointer has to leave the key before it can confirm again.
    Dwell,
    /// Releasing the thumb-index pinch over a key confirms it.
    Pinch,
}

impl SelectionStrategy {
    pub fn next(&self) -> Self {
        match self {
            Self::Debounce => Self::Dwell,
            Self::Dwell => Self::Pinch,
            Self::Pinch => Self::Debounce,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debounce => "debounce",
            Self::Dwell => "dwell",
            Self::Pinch => "pinch",
        }
    }
}

/// Durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionTimings {
    pub stability: f64,
    pub dwell: f64,
    pub cooldown: f64,
    pub mode_change_cooldown: f64,
}

/// What the engine observed this frame for the primary hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionInput {
    pub zone: Option<Zone>,
    pub finger_count: Option<u8>,
    pub hovered: Option<Hover>,
    pub pinch_released: bool,
    pub both_hands_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Key(Key),
    ModeChanged(TypingMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub zone: Zone,
    pub finger_count: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confirmation {
    pub key: Key,
    pub at: f64,
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    strategy: SelectionStrategy,
    mode: TypingMode,
    timings: SelectionTimings,

    candidate: Option<Candidate>,
    candidate_since: f64,
    latched: bool,

    hover: Option<usize>,
    hover_since: f64,
    hover_armed: bool,

    mode_gesture_handled: bool,
    last_mode_change: Option<f64>,
    last_confirmed: Option<Confirmation>,
}

impl SelectionController {
    pub fn new(strategy: SelectionStrategy, timings: SelectionTimings) -> Self {
        Self {
            strategy,
            mode: TypingMode::default(),
            timings,
            candidate: None,
            candidate_since: 0.0,
            latched: false,
            hover: None,
            hover_since: 0.0,
            hover_armed: false,
            mode_gesture_handled: false,
            last_mode_change: None,
            last_confirmed: None,
        }
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    pub fn mode(&self) -> TypingMode {
        self.mode
    }

    pub fn candidate(&self) -> Option<Candidate> {
        self.candidate
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hover
    }

    pub fn last_confirmed(&self) -> Option<Confirmation> {
        self.last_confirmed
    }

    pub fn set_timings(&mut self, timings: SelectionTimings) {
        self.timings = timings;
    }

    pub fn set_strategy(&mut self, strategy: SelectionStrategy) {
        if strategy != self.strategy {
            info!("Selection strategy: {}", strategy.as_str());
            self.strategy = strategy;
            self.reset();
        }
    }

    /// Manual mode switch; returns the new mode.
    pub fn cycle_mode(&mut self) -> TypingMode {
        self.mode = self.mode.next();
        info!("Mode changed to: {}", self.mode.as_str());
        self.mode
    }

    /// Fraction of the dwell time spent on the hovered key, for overlays.
    pub fn dwell_progress(&self, now: f64) -> Option<f64> {
        if self.strategy != SelectionStrategy::Dwell || !self.hover_armed {
            return None;
        }
        self.hover.map(|_| ((now - self.hover_since) / self.timings.dwell).clamp(0.0, 1.0))
    }

    /// Clears candidate, hover and latch state. Mode, strategy and the
    /// cooldown clock are kept.
    pub fn reset(&mut self) {
        self.candidate = None;
        self.latched = false;
        self.hover = None;
        self.hover_armed = false;
        self.mode_gesture_handled = false;
    }

    pub fn update(&mut self, input: &SelectionInput, now: f64) -> Option<SelectionOutcome> {
        if input.both_hands_open {
            self.candidate = None;
            self.latched = false;
            self.hover = None;
            return self.update_mode_gesture(now);
        }
        self.mode_gesture_handled = false;

        match self.strategy {
            SelectionStrategy::Debounce => self.update_debounce(input, now),
            SelectionStrategy::Dwell => self.update_dwell(input, now),
            SelectionStrategy::Pinch => self.update_pinch(input, now),
        }
    }

    fn update_mode_gesture(&mut self, now: f64) -> Option<SelectionOutcome> {
        if self.mode_gesture_handled {
            return None;
        }
        let cooled = self
            .last_mode_change
            .map_or(true, |at| now - at >= self.timings.mode_change_cooldown);
        if !cooled {
            return None;
        }
        self.mode_gesture_handled = true;
        self.last_mode_change = Some(now);
        Some(SelectionOutcome::ModeChanged(self.cycle_mode()))
    }

    fn update_debounce(&mut self, input: &SelectionInput, now: f64) -> Option<SelectionOutcome> {
        let candidate = match (input.zone, input.finger_count) {
            (Some(zone), Some(finger_count)) => Candidate { zone, finger_count },
            _ => {
                self.candidate = None;
                self.latched = false;
                return None;
            }
        };

        if self.candidate != Some(candidate) {
            debug!(
                "Candidate {} fingers in {} at {:.3}s",
                candidate.finger_count,
                candidate.zone.name(),
                now
            );
            self.candidate = Some(candidate);
            self.candidate_since = now;
            self.latched = false;
            return None;
        }

        if self.latched || now - self.candidate_since < self.timings.stability || !self.cooled_down(now) {
            return None;
        }

        self.latched = true;
        let key = keys::key_for(self.mode, candidate.finger_count, candidate.zone)?;
        Some(self.confirm(key, now))
    }

    fn update_dwell(&mut self, input: &SelectionInput, now: f64) -> Option<SelectionOutcome> {
        let Some(hovered) = input.hovered else {
            self.hover = None;
            self.hover_armed = false;
            return None;
        };

        if self.hover != Some(hovered.index) {
            self.hover = Some(hovered.index);
            self.hover_since = now;
            self.hover_armed = true;
            return None;
        }

        if !self.hover_armed || now - self.hover_since < self.timings.dwell || !self.cooled_down(now) {
            return None;
        }

        self.hover_armed = false;
        Some(self.confirm(hovered.key, now))
    }

    fn update_pinch(&mut self, input: &SelectionInput, now: f64) -> Option<SelectionOutcome> {
        self.hover = input.hovered.map(|h| h.index);
        let hovered = input.hovered?;
        if !input.pinch_released || !self.cooled_down(now) {
            return None;
        }
        Some(self.confirm(hovered.key, now))
    }

    fn cooled_down(&self, now: f64) -> bool {
        self.last_confirmed
            .map_or(true, |last| now - last.at >= self.timings.cooldown)
    }

    fn confirm(&mut self, key: Key, now: f64) -> SelectionOutcome {
        info!("Action: {} ({} mode)", key, self.mode.as_str());
        self.last_confirmed = Some(Confirmation { key, at: now });
        SelectionOutcome::Key(key)
    }
}
