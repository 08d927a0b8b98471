//! Pointer sensor with a distance activation constraint.

use super::{DragEvent, SensorEvent, SensorKind};
use crate::input::{MouseButton, PointerEvent};
use kurbo::Point;

#[derive(Debug, Clone, Default, PartialEq)]
enum PointerPhase {
    #[default]
    Idle,
    /// Pressed on an item, not yet past the activation distance.
    Pending { item: String, origin: Point },
    /// Drag recognized.
    Active { item: String },
}

/// Recognizes drags from pointer input.
#[derive(Debug, Clone, Default)]
pub struct PointerSensor {
    activation_distance: f64,
    phase: PointerPhase,
}

impl PointerSensor {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            activation_distance,
            phase: PointerPhase::Idle,
        }
    }

    /// Check if the sensor is driving a drag.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, PointerPhase::Active { .. })
    }

    /// Check if a press is waiting to cross the activation distance.
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, PointerPhase::Pending { .. })
    }

    /// Drop any press or drag in progress.
    pub fn reset(&mut self) {
        self.phase = PointerPhase::Idle;
    }

    /// Process a pointer event. `hit` is the item under the pointer, if any;
    /// it only matters for presses.
    pub fn handle(&mut self, event: &PointerEvent, hit: Option<&str>) -> Option<SensorEvent> {
        match event {
            PointerEvent::Down { position, button } => {
                if *button != MouseButton::Left || self.is_active() {
                    return None;
                }
                self.phase = match hit {
                    Some(item) => PointerPhase::Pending {
                        item: item.to_string(),
                        origin: *position,
                    },
                    None => PointerPhase::Idle,
                };
                None
            }
            PointerEvent::Move { position } => match &self.phase {
                PointerPhase::Idle => None,
                PointerPhase::Pending { item, origin } => {
                    if origin.distance(*position) <= self.activation_distance {
                        return None;
                    }
                    let item = item.clone();
                    let origin = *origin;
                    log::debug!("Pointer drag activated on {item}");
                    self.phase = PointerPhase::Active { item: item.clone() };
                    Some(SensorEvent::Drag(DragEvent::Start {
                        item,
                        sensor: SensorKind::Pointer,
                        position: origin,
                    }))
                }
                PointerPhase::Active { .. } => {
                    Some(SensorEvent::Drag(DragEvent::Move { position: *position }))
                }
            },
            PointerEvent::Up { button, .. } => {
                if *button != MouseButton::Left {
                    return None;
                }
                match std::mem::take(&mut self.phase) {
                    PointerPhase::Idle => None,
                    PointerPhase::Pending { item, .. } => Some(SensorEvent::Click { item }),
                    PointerPhase::Active { .. } => Some(SensorEvent::Drag(DragEvent::End)),
                }
            }
        }
    }
}
