//! Board context: wires sensors, collision and the session controller
//! together and routes results to the host.
//!
//! A renderer drives it once per frame:
//! 1. `begin_frame`, then `register_column` / `register_item` for every
//!    visible drop target
//! 2. `pointer_event` / `key_event` for each input event
//! 3. `toggle_menu`, `select_menu_action` and `document_click` for menu clicks

use crate::board::{Board, DropTarget};
use crate::collision::DropTargetRegistry;
use crate::config::SensorConfig;
use crate::input::PointerEvent;
use crate::intent::{BoardHost, emit_move};
use crate::menu::{MenuAction, MenuManager, MenuState};
use crate::sensors::{DragEvent, KeyboardSensor, PointerSensor, SensorEvent, SensorKind};
use crate::session::{AbortReason, DragController, DragOutcome};
use kurbo::{Rect, Size};
use std::collections::VecDeque;

/// What an input event amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Press and release on an item without dragging.
    Clicked(String),
    DragStarted(String),
    DragEnded(DragOutcome),
}

/// Interaction state for one board widget.
#[derive(Debug)]
pub struct BoardContext {
    config: SensorConfig,
    pointer: PointerSensor,
    keyboard: KeyboardSensor,
    controller: DragController,
    targets: DropTargetRegistry,
    menus: MenuManager,
    announcements: VecDeque<String>,
}

impl Default for BoardContext {
    fn default() -> Self {
        Self::new(SensorConfig::default())
    }
}

impl BoardContext {
    pub fn new(config: SensorConfig) -> Self {
        Self {
            pointer: PointerSensor::new(config.activation_distance),
            keyboard: KeyboardSensor::new(config.clone()),
            controller: DragController::new(),
            targets: DropTargetRegistry::new(),
            menus: MenuManager::new(),
            announcements: VecDeque::new(),
            config,
        }
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn controller(&self) -> &DragController {
        &self.controller
    }

    pub fn targets(&self) -> &DropTargetRegistry {
        &self.targets
    }

    pub fn menus(&self) -> &MenuManager {
        &self.menus
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    /// Start a new frame: drop last frame's geometry.
    pub fn begin_frame(&mut self) {
        self.targets.clear();
    }

    pub fn register_column(&mut self, id: &str, rect: Rect) {
        self.targets.register_column(id, rect);
    }

    pub fn register_item(&mut self, id: &str, rect: Rect) {
        self.targets.register_item(id, rect);
    }

    /// Re-derive state after the host supplied a new board.
    ///
    /// Menus of removed items are dropped, releasing their listeners, and a
    /// drag whose item disappeared is cancelled.
    pub fn sync(&mut self, board: &Board) {
        self.menus.retain(board);
        let vanished = self
            .controller
            .active_item()
            .is_some_and(|id| board.locate(id).is_none());
        if vanished {
            log::debug!("Dragged item left the board; cancelling");
            self.controller.cancel();
            self.pointer.reset();
            self.keyboard.reset();
        }
    }

    /// Feed a pointer event. `hit` is the item under the pointer, if any.
    pub fn pointer_event(
        &mut self,
        board: &Board,
        event: &PointerEvent,
        hit: Option<&str>,
        host: &mut dyn BoardHost,
    ) -> Option<Interaction> {
        if self.owned_by(SensorKind::Keyboard) {
            return None;
        }
        let output = self.pointer.handle(event, hit)?;
        match output {
            SensorEvent::Click { item } => Some(Interaction::Clicked(item)),
            SensorEvent::Drag(DragEvent::Start {
                item,
                sensor,
                position,
            }) => {
                let started = self.drag_start(board, item, sensor, position);
                if started.is_some() {
                    // Catch the overlay up with the pointer that crossed the threshold.
                    self.drag_move(board, event.position());
                } else {
                    self.pointer.reset();
                }
                started
            }
            SensorEvent::Drag(drag) => self.apply(board, drag, host),
        }
    }

    /// Feed a pressed key. `focused` is the item with keyboard focus.
    pub fn key_event(
        &mut self,
        board: &Board,
        key: &str,
        focused: Option<&str>,
        host: &mut dyn BoardHost,
    ) -> Option<Interaction> {
        if self.owned_by(SensorKind::Pointer) {
            if self.config.is_cancel_key(key) {
                self.pointer.reset();
                return self.apply(board, DragEvent::Cancel, host);
            }
            return None;
        }
        let output = self.keyboard.handle(key, focused, &self.targets)?;
        match output {
            SensorEvent::Drag(DragEvent::Start {
                item,
                sensor,
                position,
            }) => {
                let started = self.drag_start(board, item, sensor, position);
                if started.is_some() {
                    // A press still waiting on the activation distance would never see
                    // its release while the keyboard owns the session.
                    self.pointer.reset();
                } else {
                    self.keyboard.reset();
                }
                started
            }
            SensorEvent::Drag(drag) => self.apply(board, drag, host),
            SensorEvent::Click { item } => Some(Interaction::Clicked(item)),
        }
    }

    /// Trigger-button click on an item's menu.
    pub fn toggle_menu(&mut self, item_id: &str) -> MenuState {
        self.menus.toggle(item_id)
    }

    /// Choose an action from an item's menu and notify the host.
    pub fn select_menu_action(
        &mut self,
        board: &Board,
        item_id: &str,
        action: MenuAction,
        host: &mut dyn BoardHost,
    ) -> Option<MenuAction> {
        let action = self.menus.select(item_id, action)?;
        let Some((_, column)) = board.locate(item_id) else {
            log::debug!("Menu action on {item_id}, which is no longer on the board");
            return Some(action);
        };
        match action {
            MenuAction::Proceed => {
                log::info!("Proceed {item_id} from {column}");
                host.on_proceed(item_id, column);
            }
            MenuAction::Reject => {
                log::info!("Reject {item_id} from {column}");
                host.on_reject(item_id, column);
            }
            MenuAction::View => {}
        }
        Some(action)
    }

    /// A click reached the document. `inside` names the item whose menu
    /// contains the click, if any. Returns the menus that closed.
    pub fn document_click(&mut self, inside: Option<&str>) -> Vec<String> {
        self.menus.document_click(inside)
    }

    /// Take the queued accessibility announcements.
    pub fn take_announcements(&mut self) -> Vec<String> {
        self.announcements.drain(..).collect()
    }

    fn owned_by(&self, sensor: SensorKind) -> bool {
        self.controller
            .session()
            .is_some_and(|session| session.sensor == sensor)
    }

    fn drag_start(
        &mut self,
        board: &Board,
        item: String,
        sensor: SensorKind,
        position: kurbo::Point,
    ) -> Option<Interaction> {
        let origin = self
            .targets
            .item_rect(&item)
            .unwrap_or_else(|| Rect::from_center_size(position, Size::ZERO));
        if !self.controller.start(board, &item, sensor, origin, position) {
            return None;
        }
        if let Some((found, _)) = board.locate(&item) {
            self.announce(format!("Picked up {}.", found.label()));
        }
        Some(Interaction::DragStarted(item))
    }

    fn drag_move(&mut self, board: &Board, position: kurbo::Point) {
        self.controller.drag_move(position);
        let Some(session) = self.controller.session() else {
            return;
        };
        let hover = self
            .targets
            .closest_center(session.overlay_rect(), Some(session.item.id.as_str()));
        if hover.as_ref() == self.controller.hover() {
            return;
        }
        if let Some(target) = &hover {
            let message = format!(
                "{} is over {}.",
                session.item.label(),
                target_label(board, target)
            );
            self.announce(message);
        }
        self.controller.set_hover(hover);
    }

    fn apply(
        &mut self,
        board: &Board,
        event: DragEvent,
        host: &mut dyn BoardHost,
    ) -> Option<Interaction> {
        match event {
            DragEvent::Start {
                item,
                sensor,
                position,
            } => self.drag_start(board, item, sensor, position),
            DragEvent::Move { position } => {
                self.drag_move(board, position);
                None
            }
            DragEvent::End => {
                let session = self.controller.session()?;
                let label = session.item.label().to_string();
                let over = self
                    .targets
                    .closest_center(session.overlay_rect(), Some(session.item.id.as_str()));
                let outcome = self
                    .controller
                    .end(board, over.as_ref().map(DropTarget::id));
                Some(self.finish(board, &label, outcome, host))
            }
            DragEvent::Cancel => {
                let label = self.controller.session()?.item.label().to_string();
                let outcome = self.controller.cancel()?;
                Some(self.finish(board, &label, outcome, host))
            }
        }
    }

    fn finish(
        &mut self,
        board: &Board,
        label: &str,
        outcome: DragOutcome,
        host: &mut dyn BoardHost,
    ) -> Interaction {
        let message = match &outcome {
            DragOutcome::Moved(intent) => format!(
                "{label} was moved from {} to {}.",
                column_label(board, &intent.from_column),
                column_label(board, &intent.to_column)
            ),
            DragOutcome::SameColumn => format!("{label} was dropped back in place."),
            DragOutcome::Aborted(AbortReason::Cancelled) => "Dragging was cancelled.".to_string(),
            DragOutcome::Aborted(_) => format!("{label} was not moved."),
        };
        self.announce(message);

        if let DragOutcome::Moved(intent) = &outcome {
            emit_move(host, intent.clone());
        }
        Interaction::DragEnded(outcome)
    }

    fn announce(&mut self, message: String) {
        if self.config.max_announcements == 0 {
            return;
        }
        while self.announcements.len() >= self.config.max_announcements {
            self.announcements.pop_front();
        }
        self.announcements.push_back(message);
    }
}

fn column_label<'a>(board: &'a Board, id: &'a str) -> &'a str {
    board.column(id).map(|c| c.label()).unwrap_or(id)
}

fn target_label<'a>(board: &'a Board, target: &'a DropTarget) -> &'a str {
    match target {
        DropTarget::Column(id) => column_label(board, id),
        DropTarget::Item(id) => board.locate(id).map(|(item, _)| item.label()).unwrap_or(id.as_str()),
    }
}
