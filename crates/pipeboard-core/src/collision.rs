//! Drop-target geometry and nearest-center collision detection.

use crate::board::DropTarget;
use kurbo::{Point, Rect};

/// A drop target together with its on-screen bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredTarget {
    pub target: DropTarget,
    pub rect: Rect,
}

/// Drop targets registered by the renderer for the current frame.
///
/// Registration order is kept; it decides ties.
#[derive(Debug, Clone, Default)]
pub struct DropTargetRegistry {
    targets: Vec<RegisteredTarget>,
}

impl DropTargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all geometry. Called at the start of each render.
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Register a column container.
    pub fn register_column(&mut self, id: impl Into<String>, rect: Rect) {
        self.register(DropTarget::Column(id.into()), rect);
    }

    /// Register an item's slot.
    pub fn register_item(&mut self, id: impl Into<String>, rect: Rect) {
        self.register(DropTarget::Item(id.into()), rect);
    }

    /// Register a target. Re-registering replaces the geometry in place.
    pub fn register(&mut self, target: DropTarget, rect: Rect) {
        if let Some(existing) = self.targets.iter_mut().find(|t| t.target == target) {
            existing.rect = rect;
        } else {
            self.targets.push(RegisteredTarget { target, rect });
        }
    }

    /// Bounds of a registered target.
    pub fn rect_of(&self, target: &DropTarget) -> Option<Rect> {
        self.targets
            .iter()
            .find(|t| &t.target == target)
            .map(|t| t.rect)
    }

    /// Bounds of an item's slot.
    pub fn item_rect(&self, item_id: &str) -> Option<Rect> {
        self.rect_of(&DropTarget::Item(item_id.to_string()))
    }

    /// Registered targets in order.
    pub fn targets(&self) -> &[RegisteredTarget] {
        &self.targets
    }

    /// Candidates for a drag of `exclude`: every target except that item's own slot.
    pub fn candidates<'a>(
        &'a self,
        exclude: Option<&'a str>,
    ) -> impl Iterator<Item = &'a RegisteredTarget> + 'a {
        self.targets.iter().filter(move |t| match (&t.target, exclude) {
            (DropTarget::Item(id), Some(excluded)) => id != excluded,
            _ => true,
        })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Nearest target to the dragged rect, by center distance.
    pub fn closest_center(&self, dragged: Rect, exclude: Option<&str>) -> Option<DropTarget> {
        closest_center(dragged.center(), self.candidates(exclude))
    }
}

/// Pick the candidate whose center is nearest to `center`.
///
/// Strict comparison keeps the first-registered candidate on exact ties.
/// Returns `None` only when there are no candidates.
pub fn closest_center<'a>(
    center: Point,
    candidates: impl IntoIterator<Item = &'a RegisteredTarget>,
) -> Option<DropTarget> {
    let mut best: Option<(&RegisteredTarget, f64)> = None;
    for candidate in candidates {
        let distance = center.distance(candidate.rect.center());
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(t, _)| t.target.clone())
}
