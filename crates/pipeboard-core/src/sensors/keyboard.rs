//! Keyboard sensor for accessible dragging.

use super::{DragEvent, SensorEvent, SensorKind};
use crate::collision::{DropTargetRegistry, RegisteredTarget};
use crate::config::SensorConfig;
use crate::input::Direction;
use kurbo::Point;

#[derive(Debug, Clone, Default, PartialEq)]
enum KeyboardPhase {
    #[default]
    Idle,
    /// Item picked up; `position` is where the keyboard "pointer" rests.
    Holding { item: String, position: Point },
}

/// Recognizes pick-up, step, drop and cancel from key presses.
#[derive(Debug, Clone)]
pub struct KeyboardSensor {
    config: SensorConfig,
    phase: KeyboardPhase,
}

impl KeyboardSensor {
    pub fn new(config: SensorConfig) -> Self {
        Self {
            config,
            phase: KeyboardPhase::Idle,
        }
    }

    /// Check if the sensor is holding an item.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, KeyboardPhase::Holding { .. })
    }

    /// Current keyboard position while holding.
    pub fn position(&self) -> Option<Point> {
        match &self.phase {
            KeyboardPhase::Holding { position, .. } => Some(*position),
            KeyboardPhase::Idle => None,
        }
    }

    pub fn reset(&mut self) {
        self.phase = KeyboardPhase::Idle;
    }

    /// Process a pressed key. `focused` is the item holding keyboard focus.
    pub fn handle(
        &mut self,
        key: &str,
        focused: Option<&str>,
        targets: &DropTargetRegistry,
    ) -> Option<SensorEvent> {
        match &mut self.phase {
            KeyboardPhase::Idle => {
                if !self.config.is_pick_up_key(key) {
                    return None;
                }
                let item = focused?;
                // Without geometry there is nowhere to start from.
                let position = targets.item_rect(item)?.center();
                log::debug!("Keyboard drag picked up {item}");
                self.phase = KeyboardPhase::Holding {
                    item: item.to_string(),
                    position,
                };
                Some(SensorEvent::Drag(DragEvent::Start {
                    item: item.to_string(),
                    sensor: SensorKind::Keyboard,
                    position,
                }))
            }
            KeyboardPhase::Holding { item, position } => {
                if self.config.is_cancel_key(key) {
                    self.phase = KeyboardPhase::Idle;
                    return Some(SensorEvent::Drag(DragEvent::Cancel));
                }
                if self.config.is_drop_key(key) {
                    self.phase = KeyboardPhase::Idle;
                    return Some(SensorEvent::Drag(DragEvent::End));
                }
                let direction = Direction::from_key(key)?;
                *position = keyboard_coordinates(
                    direction,
                    *position,
                    targets.candidates(Some(item.as_str())),
                    self.config.keyboard_step,
                );
                Some(SensorEvent::Drag(DragEvent::Move {
                    position: *position,
                }))
            }
        }
    }
}

/// Next keyboard position when stepping in `direction` from `from`.
///
/// Moves to the nearest target center lying strictly in that direction
/// (first registered wins ties). With no such target, steps a fixed
/// distance instead.
pub fn keyboard_coordinates<'a>(
    direction: Direction,
    from: Point,
    candidates: impl IntoIterator<Item = &'a RegisteredTarget>,
    step: f64,
) -> Point {
    let mut best: Option<(Point, f64)> = None;
    for candidate in candidates {
        let center = candidate.rect.center();
        if !direction.points_toward(from, center) {
            continue;
        }
        let distance = from.distance(center);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((center, distance)),
        }
    }
    best.map(|(p, _)| p)
        .unwrap_or_else(|| from + direction.unit() * step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn slot(x: f64, y: f64) -> Rect {
        Rect::from_origin_size((x, y), (100.0, 40.0))
    }

    fn registry() -> DropTargetRegistry {
        let mut targets = DropTargetRegistry::new();
        targets.register_column("applied", Rect::new(0.0, 0.0, 100.0, 400.0));
        targets.register_column("interview", Rect::new(120.0, 0.0, 220.0, 400.0));
        targets.register_item("1", slot(0.0, 0.0));
        targets.register_item("2", slot(0.0, 50.0));
        targets
    }

    #[test]
    fn test_pick_up_requires_focus_and_geometry() {
        let targets = registry();
        let mut sensor = KeyboardSensor::new(SensorConfig::default());

        assert_eq!(sensor.handle("Space", None, &targets), None);
        assert_eq!(sensor.handle("Space", Some("unknown"), &targets), None);
        assert_eq!(sensor.handle("ArrowDown", Some("1"), &targets), None);
        assert!(!sensor.is_active());

        let event = sensor.handle("Space", Some("1"), &targets);
        assert_eq!(
            event,
            Some(SensorEvent::Drag(DragEvent::Start {
                item: "1".to_string(),
                sensor: SensorKind::Keyboard,
                position: Point::new(50.0, 20.0),
            }))
        );
        assert!(sensor.is_active());
    }

    #[test]
    fn test_arrow_steps_to_nearest_target() {
        let targets = registry();
        let mut sensor = KeyboardSensor::new(SensorConfig::default());
        sensor.handle("Enter", Some("1"), &targets);

        // Below item 1: item 2 (y=70) is nearer than the applied column center (y=200).
        let event = sensor.handle("ArrowDown", None, &targets);
        assert_eq!(
            event,
            Some(SensorEvent::Drag(DragEvent::Move {
                position: Point::new(50.0, 70.0)
            }))
        );

        // To the right: only the interview column.
        sensor.handle("ArrowRight", None, &targets);
        assert_eq!(sensor.position(), Some(Point::new(170.0, 200.0)));
    }

    #[test]
    fn test_arrow_without_target_uses_fixed_step() {
        let targets = registry();
        let mut sensor = KeyboardSensor::new(SensorConfig::default());
        sensor.handle("Space", Some("1"), &targets);

        // Nothing above the first slot.
        sensor.handle("ArrowUp", None, &targets);
        assert_eq!(sensor.position(), Some(Point::new(50.0, -5.0)));
    }

    #[test]
    fn test_drop_and_cancel() {
        let targets = registry();
        let mut sensor = KeyboardSensor::new(SensorConfig::default());

        sensor.handle("Space", Some("1"), &targets);
        assert_eq!(
            sensor.handle("Space", None, &targets),
            Some(SensorEvent::Drag(DragEvent::End))
        );
        assert!(!sensor.is_active());

        sensor.handle("Space", Some("1"), &targets);
        assert_eq!(
            sensor.handle("Escape", None, &targets),
            Some(SensorEvent::Drag(DragEvent::Cancel))
        );
        assert!(!sensor.is_active());
    }

    #[test]
    fn test_stepping_is_deterministic() {
        let targets = registry();
        let from = Point::new(50.0, 20.0);
        let a = keyboard_coordinates(Direction::Down, from, targets.candidates(Some("1")), 25.0);
        let b = keyboard_coordinates(Direction::Down, from, targets.candidates(Some("1")), 25.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_stepping_tie_prefers_first_registered() {
        let mut targets = DropTargetRegistry::new();
        targets.register_column("left", Rect::new(-20.0, 90.0, 0.0, 110.0));
        targets.register_column("right", Rect::new(0.0, 90.0, 20.0, 110.0));
        let from = Point::new(0.0, 0.0);
        let next = keyboard_coordinates(Direction::Down, from, targets.candidates(None), 25.0);
        assert_eq!(next, Point::new(-10.0, 100.0));
    }
}
