// src/lib.rs - Gesture interaction engine: hand landmarks in, debounced input events out
pub mod config;
pub mod cursor;
pub mod data;
pub mod engine;
pub mod error;
pub mod events;
pub mod fingers;
pub mod geometry;
pub mod hold;
pub mod keys;
pub mod landmarks;
pub mod layout;
pub mod pinch;
pub mod selection;
pub mod source;
pub mod zones;

pub use config::{EngineConfig, ZoneAnchor};
pub use engine::{EngineStats, GestureEngine};
pub use error::{ConfigError, FrameError, SourceError};
pub use events::{Control, InputSink, InteractionEvent, TracingSink};
pub use keys::{Key, TypingMode};
pub use landmarks::{Hand, Handedness, Landmark, LandmarkFrame};
pub use selection::SelectionStrategy;
pub use source::{LandmarkSource, ReplaySource, SimulatedSource, SourceItem};
