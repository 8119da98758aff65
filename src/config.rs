// src/config.rs - Engine configuration, validation and loading
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::landmarks::Handedness;
use crate::pinch::PinchThresholds;
use crate::selection::{SelectionStrategy, SelectionTimings};

/// Environment variable naming a config file to load instead of the default location.
pub const CONFIG_ENV: &str = "GESTURE_CONTROL_CONFIG";

/// Which point of the hand drives zone classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneAnchor {
    /// Mean of all 21 landmarks.
    #[default]
    Centroid,
    IndexTip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Pinch thresholds in camera pixels
    pub pinch_on: f64,
    pub pinch_off: f64,
    /// Seconds a thumb-index pinch must be held before it becomes a drag.
    pub drag_hold: f64,
    /// Weight of the previous cursor position, in [0, 1).
    pub smoothing: f64,

    // Click rate limits in seconds
    pub click_debounce: f64,
    pub right_click_debounce: f64,
    /// Shortest thumb-middle hold that counts as a right click.
    pub right_click_min_hold: f64,
    /// Cursor movement and thumb-index pinches need a raised index finger.
    pub require_index_extended: bool,

    pub zone_stability: f64,
    pub dwell: f64,
    pub selection_cooldown: f64,
    pub mode_change_cooldown: f64,

    pub min_hand_confidence: f64,
    pub primary_hand: Option<Handedness>,
    pub zone_anchor: ZoneAnchor,
    pub selection_strategy: SelectionStrategy,

    pub frame_width: f64,
    pub frame_height: f64,
    pub screen_width: f64,
    pub screen_height: f64,
    pub mirror_x: bool,

    pub mouse_enabled: bool,
    pub click_enabled: bool,
    pub typing_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pinch_on: 35.0,
            pinch_off: 45.0,
            drag_hold: 0.35,
            smoothing: 0.6,
            click_debounce: 0.5,
            right_click_debounce: 0.8,
            right_click_min_hold: 0.15,
            require_index_extended: true,
            zone_stability: 0.3,
            dwell: 0.7,
            selection_cooldown: 0.5,
            mode_change_cooldown: 2.0,
            min_hand_confidence: 0.5,
            primary_hand: None,
            zone_anchor: ZoneAnchor::Centroid,
            selection_strategy: SelectionStrategy::Debounce,
            frame_width: 640.0,
            frame_height: 480.0,
            screen_width: 1920.0,
            screen_height: 1080.0,
            mirror_x: false,
            mouse_enabled: true,
            click_enabled: true,
            typing_enabled: false,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pinch_on.is_finite() && self.pinch_off.is_finite()) || self.pinch_off <= self.pinch_on {
            return Err(ConfigError::PinchHysteresis {
                on: self.pinch_on,
                off: self.pinch_off,
            });
        }
        if self.pinch_on < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "pinch_on",
                value: self.pinch_on,
            });
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(ConfigError::Smoothing(self.smoothing));
        }

        for (name, value) in [
            ("drag_hold", self.drag_hold),
            ("click_debounce", self.click_debounce),
            ("right_click_debounce", self.right_click_debounce),
            ("right_click_min_hold", self.right_click_min_hold),
            ("zone_stability", self.zone_stability),
            ("dwell", self.dwell),
            ("selection_cooldown", self.selection_cooldown),
            ("mode_change_cooldown", self.mode_change_cooldown),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Duration { name, value });
            }
        }

        for (name, value) in [
            ("frame_width", self.frame_width),
            ("frame_height", self.frame_height),
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if !(0.0..=1.0).contains(&self.min_hand_confidence) {
            return Err(ConfigError::Confidence(self.min_hand_confidence));
        }
        Ok(())
    }

    /// Parses and validates a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `$GESTURE_CONTROL_CONFIG`, else `config.json` in the platform config
    /// directory, else defaults. An explicitly named file must exist.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load(PathBuf::from(path));
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn pinch_thresholds(&self) -> PinchThresholds {
        PinchThresholds {
            on: self.pinch_on,
            off: self.pinch_off,
        }
    }

    pub fn selection_timings(&self) -> SelectionTimings {
        SelectionTimings {
            stability: self.zone_stability,
            dwell: self.dwell,
            cooldown: self.selection_cooldown,
            mode_change_cooldown: self.mode_change_cooldown,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "GestureControl")
        .map(|dirs| dirs.config_dir().join("config.json"))
}
