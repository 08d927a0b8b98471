//! Drag session controller.
//!
//! Two states, `Idle` and `Dragging`. Resolution happens atomically on drop:
//! `end` decides the outcome and returns to `Idle` in one call, so there is no
//! intermediate "resolving" state anyone could observe.

use crate::board::{Board, DropTarget, Item};
use crate::intent::MoveIntent;
use crate::sensors::SensorKind;
use kurbo::{Point, Rect, Vec2};

/// Where an item is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// In its column slot.
    InPlace,
    /// Detached, following the pointer or keyboard focus.
    Overlay,
}

/// An in-progress drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// The item being dragged (a snapshot taken at drag start).
    pub item: Item,
    pub source_column: String,
    pub sensor: SensorKind,
    /// Slot bounds when the drag started.
    pub origin_rect: Rect,
    /// Pointer or keyboard position when the drag started.
    pub start_position: Point,
    /// Translation of the overlay from `origin_rect`.
    pub offset: Vec2,
    /// Target currently under the overlay, for highlighting.
    pub hover: Option<DropTarget>,
}

impl DragSession {
    /// Current overlay bounds.
    pub fn overlay_rect(&self) -> Rect {
        self.origin_rect + self.offset
    }
}

/// Detached representation of the dragged item.
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    pub item: &'a Item,
    pub rect: Rect,
}

/// Why a drag ended without a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Released with nothing underneath.
    NoTarget,
    /// The target or the dragged item no longer resolves to a column.
    Unresolvable,
    /// The keyboard or host cancelled the drag.
    Cancelled,
}

/// Result of a finished drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Cross-column drop; the intent must be handed to the host.
    Moved(MoveIntent),
    /// Dropped back into its own column. No callback.
    SameColumn,
    Aborted(AbortReason),
}

#[derive(Debug, Clone, Default, PartialEq)]
enum ControllerState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Coordinates a single drag session at a time.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: ControllerState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ControllerState::Dragging(_))
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            ControllerState::Dragging(session) => Some(session),
            ControllerState::Idle => None,
        }
    }

    /// Id of the item being dragged.
    pub fn active_item(&self) -> Option<&str> {
        self.session().map(|s| s.item.id.as_str())
    }

    /// Begin a drag on `item_id`.
    ///
    /// Refused while another session is active. An item the board does not
    /// know leaves the controller idle.
    pub fn start(
        &mut self,
        board: &Board,
        item_id: &str,
        sensor: SensorKind,
        origin_rect: Rect,
        start_position: Point,
    ) -> bool {
        if self.is_dragging() {
            log::debug!("Ignoring drag start on {item_id}: a session is already active");
            return false;
        }
        let Some((item, column)) = board.locate(item_id) else {
            log::debug!("Ignoring drag start on unknown item {item_id}");
            return false;
        };

        log::debug!("Drag started on {item_id} in {column} ({sensor:?})");
        self.state = ControllerState::Dragging(DragSession {
            item: item.clone(),
            source_column: column.to_string(),
            sensor,
            origin_rect,
            start_position,
            offset: Vec2::ZERO,
            hover: None,
        });
        true
    }

    /// Follow the pointer or keyboard to `position`.
    pub fn drag_move(&mut self, position: Point) {
        if let ControllerState::Dragging(session) = &mut self.state {
            session.offset = position - session.start_position;
        }
    }

    /// Record the target currently under the overlay.
    pub fn set_hover(&mut self, target: Option<DropTarget>) {
        if let ControllerState::Dragging(session) = &mut self.state {
            session.hover = target;
        }
    }

    /// Target under the overlay, if dragging.
    pub fn hover(&self) -> Option<&DropTarget> {
        self.session().and_then(|s| s.hover.as_ref())
    }

    /// Finish the drag against the board that was current when it ended.
    ///
    /// The session is cleared whatever the outcome. A `Moved` outcome must be
    /// forwarded to the host before control returns to the input source.
    pub fn end(&mut self, board: &Board, over: Option<&str>) -> DragOutcome {
        let ControllerState::Dragging(session) = std::mem::take(&mut self.state) else {
            return DragOutcome::Aborted(AbortReason::NoTarget);
        };
        let item_id = session.item.id.as_str();

        let Some(over) = over else {
            log::debug!("Drag of {item_id} released over nothing");
            return DragOutcome::Aborted(AbortReason::NoTarget);
        };

        let source = board.locate(item_id).map(|(_, column)| column);
        let destination = board
            .classify_target(over)
            .and_then(|target| board.destination_column(&target));

        let (Some(source), Some(destination)) = (source, destination) else {
            log::debug!("Drag of {item_id} over {over} did not resolve to a column");
            return DragOutcome::Aborted(AbortReason::Unresolvable);
        };

        if source == destination {
            log::debug!("Drag of {item_id} dropped back into {source}");
            return DragOutcome::SameColumn;
        }

        DragOutcome::Moved(MoveIntent::new(item_id, source, destination))
    }

    /// Abort the drag without resolving a target.
    pub fn cancel(&mut self) -> Option<DragOutcome> {
        match std::mem::take(&mut self.state) {
            ControllerState::Dragging(session) => {
                log::debug!("Drag of {} cancelled", session.item.id);
                Some(DragOutcome::Aborted(AbortReason::Cancelled))
            }
            ControllerState::Idle => None,
        }
    }

    /// Check if `item_id` should be drawn as a placeholder in its slot.
    ///
    /// The dragged item keeps its slot for layout while the overlay carries
    /// its visual.
    pub fn is_suppressed(&self, item_id: &str) -> bool {
        self.active_item() == Some(item_id)
    }

    /// The detached overlay, if dragging.
    pub fn overlay(&self) -> Option<Overlay<'_>> {
        self.session().map(|session| Overlay {
            item: &session.item,
            rect: session.overlay_rect(),
        })
    }
}
