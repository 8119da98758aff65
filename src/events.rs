// src/events.rs - Interaction events, control commands and event sinks
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::keys::{Key, TypingMode};

/// Discrete output of the engine. A frame produces an ordered list of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    /// Smoothed screen position in pixels.
    CursorMove { x: f64, y: f64 },
    ClickLeft,
    ClickRight,
    DragStart,
    DragEnd,
    KeySelected { key: Key },
    ModeChanged { mode: TypingMode },
    Recalibrated,
}

impl InteractionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CursorMove { .. } => "cursor_move",
            Self::ClickLeft => "click_left",
            Self::ClickRight => "click_right",
            Self::DragStart => "drag_start",
            Self::DragEnd => "drag_end",
            Self::KeySelected { .. } => "key_selected",
            Self::ModeChanged { .. } => "mode_changed",
            Self::Recalibrated => "recalibrated",
        }
    }
}

/// Commands accepted between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    ToggleMouse,
    ToggleClick,
    ToggleTyping,
    Recalibrate,
    CycleStrategy,
    CycleMode,
}

/// Consumer of engine events, e.g. an OS input injector.
pub trait InputSink {
    fn dispatch(&mut self, event: &InteractionEvent);
}

/// Logs every event. Cursor moves go to trace level since they arrive every frame.
#[derive(Debug, Default)]
pub struct TracingSink {
    dispatched: u64,
}

impl TracingSink {
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}

impl InputSink for TracingSink {
    fn dispatch(&mut self, event: &InteractionEvent) {
        self.dispatched += 1;
        match event {
            InteractionEvent::CursorMove { x, y } => {
                tracing::trace!("cursor -> ({:.1}, {:.1})", x, y)
            }
            InteractionEvent::KeySelected { key } => info!("key: {}", key),
            InteractionEvent::ModeChanged { mode } => info!("mode: {}", mode.as_str()),
            other => info!("{}", other.kind()),
        }
    }
}

impl InputSink for Vec<InteractionEvent> {
    fn dispatch(&mut self, event: &InteractionEvent) {
        self.push(*event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_string(&InteractionEvent::KeySelected { key: Key::Char('a') }).unwrap();
        assert_eq!(json, r#"{"type":"key_selected","key":{"char":"a"}}"#);

        let json = serde_json::to_string(&InteractionEvent::ClickLeft).unwrap();
        assert_eq!(json, r#"{"type":"click_left"}"#);
    }

    #[test]
    fn controls_parse_from_snake_case() {
        let control: Control = serde_json::from_str(r#""toggle_typing""#).unwrap();
        assert_eq!(control, Control::ToggleTyping);
    }

    #[test]
    fn sinks_receive_events_in_order() {
        let mut recorded: Vec<InteractionEvent> = Vec::new();
        let mut logged = TracingSink::default();
        for event in [InteractionEvent::DragStart, InteractionEvent::DragEnd] {
            recorded.dispatch(&event);
            logged.dispatch(&event);
        }
        assert_eq!(recorded, vec![InteractionEvent::DragStart, InteractionEvent::DragEnd]);
        assert_eq!(logged.dispatched(), 2);
    }
}
