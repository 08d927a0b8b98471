//! Gesture sensors.
//!
//! Sensors turn raw pointer and keyboard input into one abstract stream of
//! drag events, so the session controller does not care which device is
//! driving it:
//! - `PointerSensor` waits for travel past an activation distance, so a plain
//!   click is still a click
//! - `KeyboardSensor` picks up, steps between targets and drops with keys

mod keyboard;
mod pointer;

pub use keyboard::{KeyboardSensor, keyboard_coordinates};
pub use pointer::PointerSensor;

use kurbo::Point;

/// Which input device drives a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Pointer,
    Keyboard,
}

/// Abstract drag events shared by all sensors.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// A drag was recognized on `item`, starting at `position`.
    Start {
        item: String,
        sensor: SensorKind,
        position: Point,
    },
    /// The pointer or keyboard focus moved.
    Move { position: Point },
    /// Released: resolve whatever lies under the dragged item.
    End,
    /// Released with no target.
    Cancel,
}

/// Output of a sensor.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorEvent {
    Drag(DragEvent),
    /// A press and release that never crossed the activation distance.
    Click { item: String },
}
