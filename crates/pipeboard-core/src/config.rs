//! Sensor and interaction configuration.

use crate::board::BoardResult;
use serde::{Deserialize, Serialize};

/// Pointer travel (in logical pixels) before a press becomes a drag.
pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 8.0;
/// Keyboard step when no target lies in the arrow's direction.
pub const DEFAULT_KEYBOARD_STEP: f64 = 25.0;
/// Announcements kept before the oldest is dropped.
pub const DEFAULT_MAX_ANNOUNCEMENTS: usize = 5;

/// Tunables for the gesture sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Pointer must travel strictly further than this to start a drag.
    pub activation_distance: f64,
    /// Fallback keyboard step.
    pub keyboard_step: f64,
    /// Keys that pick up the focused item.
    pub pick_up_keys: Vec<String>,
    /// Keys that drop the held item.
    pub drop_keys: Vec<String>,
    /// Keys that cancel a keyboard drag.
    pub cancel_keys: Vec<String>,
    pub max_announcements: usize,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
            keyboard_step: DEFAULT_KEYBOARD_STEP,
            pick_up_keys: vec!["Space".to_string(), "Enter".to_string()],
            drop_keys: vec!["Space".to_string(), "Enter".to_string()],
            cancel_keys: vec!["Escape".to_string()],
            max_announcements: DEFAULT_MAX_ANNOUNCEMENTS,
        }
    }
}

impl SensorConfig {
    /// Parse a config, filling missing fields with defaults.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_pick_up_key(&self, key: &str) -> bool {
        self.pick_up_keys.iter().any(|k| k == key)
    }

    pub fn is_drop_key(&self, key: &str) -> bool {
        self.drop_keys.iter().any(|k| k == key)
    }

    pub fn is_cancel_key(&self, key: &str) -> bool {
        self.cancel_keys.iter().any(|k| k == key)
    }
}
