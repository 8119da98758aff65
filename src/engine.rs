// src/engine.rs - Per-frame orchestration of pinch, cursor and typing state
use nalgebra::Vector2;
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, ZoneAnchor};
use crate::cursor::CursorMapper;
use crate::error::{ConfigError, FrameError};
use crate::events::{Control, InteractionEvent};
use crate::fingers;
use crate::geometry::{self, Finger};
use crate::hold::{HoldOutcome, HoldState, HoldTimer};
use crate::keys::TypingMode;
use crate::landmarks::{Hand, LandmarkFrame, INDEX_TIP};
use crate::layout::KeyboardLayout;
use crate::pinch::{GestureState, PinchState, PinchThresholds, PinchType, PinchUpdate};
use crate::selection::{SelectionController, SelectionInput, SelectionOutcome, SelectionStrategy};
use crate::zones::{Zone, ZoneGrid};

/// Most hands the engine looks at in one frame.
pub const MAX_HANDS: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Frames accepted and processed.
    pub frames: u64,
    pub rejected_frames: u64,
    pub rejected_hands: u64,
    pub events: u64,
}

pub struct GestureEngine {
    config: EngineConfig,
    thresholds: PinchThresholds,
    pinches: [GestureState; 2],
    holds: [HoldTimer; 2],
    cursor: CursorMapper,
    grid: ZoneGrid,
    layout: KeyboardLayout,
    selection: SelectionController,

    mouse_enabled: bool,
    click_enabled: bool,
    typing_enabled: bool,

    // A DragStart went out and its DragEnd has not.
    button_down: bool,
    // Times of the last emitted clicks, for rate limiting.
    last_left_click: Option<f64>,
    last_right_click: Option<f64>,
    last_timestamp: Option<f64>,
    // Events raised between frames (controls, recalibration).
    pending: Vec<InteractionEvent>,
    stats: EngineStats,
}

impl GestureEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let engine = Self {
            thresholds: config.pinch_thresholds(),
            pinches: PinchType::ALL.map(GestureState::new),
            holds: PinchType::ALL.map(HoldTimer::new),
            cursor: CursorMapper::new(
                config.screen_width,
                config.screen_height,
                config.mirror_x,
                config.smoothing,
            ),
            grid: ZoneGrid::new(config.frame_width, config.frame_height),
            layout: KeyboardLayout::standard(config.frame_width, config.frame_height),
            selection: SelectionController::new(config.selection_strategy, config.selection_timings()),
            mouse_enabled: config.mouse_enabled,
            click_enabled: config.click_enabled,
            typing_enabled: config.typing_enabled,
            button_down: false,
            last_left_click: None,
            last_right_click: None,
            last_timestamp: None,
            pending: Vec::new(),
            stats: EngineStats::default(),
            config,
        };

        info!(
            "Gesture engine ready: pinch {:.0}/{:.0}px, drag after {:.2}s, {} selection",
            engine.thresholds.on,
            engine.thresholds.off,
            engine.config.drag_hold,
            engine.selection.strategy().as_str()
        );
        Ok(engine)
    }

    /// Applies a new configuration without resetting gesture, cursor or
    /// selection state. Runtime toggles keep their current values.
    pub fn reconfigure(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;

        self.thresholds = config.pinch_thresholds();
        self.cursor.reconfigure(
            config.screen_width,
            config.screen_height,
            config.mirror_x,
            config.smoothing,
        );
        if (config.frame_width, config.frame_height) != self.grid.dimensions() {
            self.grid = ZoneGrid::new(config.frame_width, config.frame_height);
            self.layout = KeyboardLayout::standard(config.frame_width, config.frame_height);
        }
        self.selection.set_timings(config.selection_timings());
        self.selection.set_strategy(config.selection_strategy);
        self.config = config;

        info!("Engine reconfigured");
        Ok(())
    }

    /// Processes one frame and returns its events in order. A rejected frame
    /// is logged and yields no events.
    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> Vec<InteractionEvent> {
        match self.try_process_frame(frame) {
            Ok(events) => events,
            Err(e) => {
                warn!("Frame rejected: {}", e);
                Vec::new()
            }
        }
    }

    pub fn try_process_frame(&mut self, frame: &LandmarkFrame) -> Result<Vec<InteractionEvent>, FrameError> {
        let now = frame.timestamp;
        let previous = self.last_timestamp.unwrap_or(f64::NEG_INFINITY);
        if !now.is_finite() || now < previous {
            self.stats.rejected_frames += 1;
            return Err(FrameError::NonMonotonicTimestamp { previous, current: now });
        }
        self.last_timestamp = Some(now);
        self.stats.frames += 1;

        let hands = self.accepted_hands(frame);
        let primary = self.primary_hand(&hands);

        let mut events = std::mem::take(&mut self.pending);

        // Pinches and hold timers. Without a primary hand everything stays frozen.
        let mut outcomes: Vec<(PinchType, HoldOutcome)> = Vec::new();
        let mut index_pinch = self.pinches[PinchType::ThumbIndex.index()].snapshot();
        let pointing = primary.map_or(false, |hand| self.is_pointing(hand));
        if let Some(hand) = primary {
            let updates = self.update_pinches(hand, pointing, now);
            index_pinch = updates[PinchType::ThumbIndex.index()];
            outcomes = self.update_holds(&updates, now);
        }

        if self.mouse_enabled && pointing {
            if let Some(hand) = primary {
                let position = self.cursor.update(hand.point(INDEX_TIP));
                events.push(InteractionEvent::CursorMove {
                    x: position.x,
                    y: position.y,
                });
            }
        }

        for (pinch, outcome) in outcomes {
            if let Some(event) = self.click_event(pinch, outcome, now) {
                events.push(event);
            }
        }

        if self.typing_enabled {
            let input = self.selection_input(&hands, primary, &index_pinch);
            match self.selection.update(&input, now) {
                Some(SelectionOutcome::Key(key)) => events.push(InteractionEvent::KeySelected { key }),
                Some(SelectionOutcome::ModeChanged(mode)) => {
                    events.push(InteractionEvent::ModeChanged { mode })
                }
                None => {}
            }
        }

        self.stats.events += events.len() as u64;
        Ok(events)
    }

    /// Validated hands at or above the confidence floor, at most two.
    fn accepted_hands<'a>(&mut self, frame: &'a LandmarkFrame) -> Vec<&'a Hand> {
        if frame.hands.len() > MAX_HANDS {
            warn!(
                "Frame at {:.3}s has {} hands, ignoring all but the first {}",
                frame.timestamp,
                frame.hands.len(),
                MAX_HANDS
            );
        }

        let mut accepted = Vec::with_capacity(MAX_HANDS);
        for hand in frame.hands.iter().take(MAX_HANDS) {
            if let Err(e) = hand.validate() {
                warn!("Skipping hand: {}", e);
                self.stats.rejected_hands += 1;
                continue;
            }
            if hand.confidence < self.config.min_hand_confidence {
                debug!(
                    "{} hand below confidence floor ({:.2} < {:.2})",
                    hand.handedness.as_str(),
                    hand.confidence,
                    self.config.min_hand_confidence
                );
                continue;
            }
            accepted.push(hand);
        }
        accepted
    }

    fn primary_hand<'a>(&self, hands: &[&'a Hand]) -> Option<&'a Hand> {
        self.config
            .primary_hand
            .and_then(|preferred| hands.iter().find(|h| h.handedness == preferred).copied())
            .or_else(|| hands.first().copied())
    }

    /// Whether the hand may drive the cursor and the thumb-index pinch.
    fn is_pointing(&self, hand: &Hand) -> bool {
        !self.config.require_index_extended || geometry::is_extended(hand, Finger::Index)
    }

    fn update_pinches(&mut self, hand: &Hand, pointing: bool, now: f64) -> [PinchUpdate; 2] {
        let frame_width = self.config.frame_width;
        let thresholds = self.thresholds;
        PinchType::ALL.map(|pinch| {
            let distance = pinch.distance(hand, frame_width);
            let state = &mut self.pinches[pinch.index()];
            // A lowered index finger releases the thumb-index pinch.
            if pinch == PinchType::ThumbIndex && !pointing {
                state.suppress(distance, now)
            } else {
                state.update(distance, now, &thresholds)
            }
        })
    }

    fn update_holds(&mut self, updates: &[PinchUpdate; 2], now: f64) -> Vec<(PinchType, HoldOutcome)> {
        let drag_hold = self.config.drag_hold;
        let mut outcomes = Vec::new();

        let left = PinchType::ThumbIndex.index();
        if let Some(outcome) = self.holds[left].update(&updates[left], now, drag_hold) {
            outcomes.push((PinchType::ThumbIndex, outcome));
        }

        // The drag-eligible pinch owns the button while it is engaged.
        let right = PinchType::ThumbMiddle.index();
        if updates[left].is_active() || self.holds[left].state() != HoldState::Idle {
            if self.holds[right].state() != HoldState::Idle {
                debug!("thumb-middle hold cancelled by thumb-index pinch");
                self.holds[right].cancel();
            }
        } else if let Some(outcome) = self.holds[right].update(&updates[right], now, drag_hold) {
            outcomes.push((PinchType::ThumbMiddle, outcome));
        }

        outcomes
    }

    fn click_event(&mut self, pinch: PinchType, outcome: HoldOutcome, now: f64) -> Option<InteractionEvent> {
        match outcome {
            HoldOutcome::Click { held } if self.click_enabled => match pinch {
                PinchType::ThumbIndex => {
                    if !since(self.last_left_click, now, self.config.click_debounce) {
                        debug!("left click at {:.3}s debounced", now);
                        return None;
                    }
                    self.last_left_click = Some(now);
                    Some(InteractionEvent::ClickLeft)
                }
                PinchType::ThumbMiddle => {
                    if held < self.config.right_click_min_hold {
                        debug!("thumb-middle tap of {:.3}s too short for a right click", held);
                        return None;
                    }
                    if !since(self.last_right_click, now, self.config.right_click_debounce) {
                        debug!("right click at {:.3}s debounced", now);
                        return None;
                    }
                    self.last_right_click = Some(now);
                    Some(InteractionEvent::ClickRight)
                }
            },
            HoldOutcome::DragStart if self.click_enabled => {
                self.button_down = true;
                Some(InteractionEvent::DragStart)
            }
            HoldOutcome::DragEnd if self.button_down => {
                self.button_down = false;
                Some(InteractionEvent::DragEnd)
            }
            _ => None,
        }
    }

    fn selection_input(&self, hands: &[&Hand], primary: Option<&Hand>, index_pinch: &PinchUpdate) -> SelectionInput {
        let Some(hand) = primary else {
            return SelectionInput::default();
        };

        let tip = hand.point(INDEX_TIP);
        let both_hands_open =
            hands.len() == MAX_HANDS && hands.iter().all(|h| fingers::count_extended(h) == 5);

        SelectionInput {
            zone: Some(self.zone_for(hand)),
            finger_count: Some(fingers::count_extended(hand)),
            hovered: self
                .layout
                .key_at(tip.x * self.config.frame_width, tip.y * self.config.frame_height),
            pinch_released: index_pinch.just_released,
            both_hands_open,
        }
    }

    /// Returns every pinch to Inactive, every hold to Idle, and clears the
    /// click clocks, the selection candidate and cursor smoothing. Thresholds, toggles and the
    /// typing mode are kept. The resulting events go out with the next frame.
    pub fn recalibrate(&mut self) {
        for pinch in &mut self.pinches {
            pinch.reset();
        }
        for hold in &mut self.holds {
            hold.cancel();
        }
        if self.button_down {
            self.button_down = false;
            self.pending.push(InteractionEvent::DragEnd);
        }
        self.last_left_click = None;
        self.last_right_click = None;
        self.selection.reset();
        self.cursor.reset();
        self.pending.push(InteractionEvent::Recalibrated);
        info!("Recalibrated");
    }

    pub fn toggle_mouse(&mut self) -> bool {
        self.mouse_enabled = !self.mouse_enabled;
        info!("Mouse control: {}", on_off(self.mouse_enabled));
        self.mouse_enabled
    }

    pub fn toggle_click(&mut self) -> bool {
        self.click_enabled = !self.click_enabled;
        info!("Click control: {}", on_off(self.click_enabled));
        self.click_enabled
    }

    pub fn toggle_typing(&mut self) -> bool {
        self.typing_enabled = !self.typing_enabled;
        self.selection.reset();
        info!("Typing: {}", on_off(self.typing_enabled));
        self.typing_enabled
    }

    pub fn cycle_strategy(&mut self) -> SelectionStrategy {
        let next = self.selection.strategy().next();
        self.selection.set_strategy(next);
        next
    }

    pub fn cycle_mode(&mut self) -> TypingMode {
        let mode = self.selection.cycle_mode();
        self.pending.push(InteractionEvent::ModeChanged { mode });
        mode
    }

    pub fn apply(&mut self, control: Control) {
        debug!("Control: {:?}", control);
        match control {
            Control::ToggleMouse => {
                self.toggle_mouse();
            }
            Control::ToggleClick => {
                self.toggle_click();
            }
            Control::ToggleTyping => {
                self.toggle_typing();
            }
            Control::Recalibrate => self.recalibrate(),
            Control::CycleStrategy => {
                self.cycle_strategy();
            }
            Control::CycleMode => {
                self.cycle_mode();
            }
        }
    }

    /// Drains events raised by controls, for callers that dispatch them
    /// immediately instead of with the next frame.
    pub fn take_pending(&mut self) -> Vec<InteractionEvent> {
        let pending = std::mem::take(&mut self.pending);
        self.stats.events += pending.len() as u64;
        pending
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn mouse_enabled(&self) -> bool {
        self.mouse_enabled
    }

    pub fn click_enabled(&self) -> bool {
        self.click_enabled
    }

    pub fn typing_enabled(&self) -> bool {
        self.typing_enabled
    }

    pub fn mode(&self) -> TypingMode {
        self.selection.mode()
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.selection.strategy()
    }

    pub fn pinch_state(&self, pinch: PinchType) -> PinchState {
        self.pinches[pinch.index()].state
    }

    pub fn hold_state(&self, pinch: PinchType) -> HoldState {
        self.holds[pinch.index()].state()
    }

    pub fn is_dragging(&self) -> bool {
        self.button_down
    }

    pub fn cursor_position(&self) -> Option<Vector2<f64>> {
        self.cursor.state().smoothed
    }

    /// Zone of the hand's configured anchor point.
    pub fn zone_for(&self, hand: &Hand) -> Zone {
        let anchor = match self.config.zone_anchor {
            ZoneAnchor::Centroid => geometry::centroid(hand),
            ZoneAnchor::IndexTip => hand.point(INDEX_TIP),
        };
        self.grid.classify(anchor)
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }
}

// No previous time, or at least `gap` seconds since it.
fn since(previous: Option<f64>, now: f64, gap: f64) -> bool {
    previous.map_or(true, |at| now - at >= gap)
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
