//! The board widget.
//!
//! `BoardView` owns the interaction state for one board and turns each
//! frame's egui input into pointer, key and menu events for
//! [`BoardContext`]. The board itself stays with the host and is passed in
//! by reference every frame.

use std::collections::HashMap;

use egui::{CursorIcon, Event, Id, Key, Order, Pos2, Rect, Sense, Ui};
use pipeboard_core::{
    Board, BoardContext, BoardHost, Direction, Interaction, KeyEvent, MenuAction, MenuState,
    MouseButton, Placement, PointerEvent, SensorConfig,
};

use crate::card::{paint_card, paint_placeholder};
use crate::column::paint_column;
use crate::layout::{BoardLayout, LayoutMetrics, to_egui_rect, to_kurbo_point};
use crate::menu::{action_menu, menu_trigger};
use crate::sizing;

/// What happened on the board during one frame.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BoardResponse {
    pub interactions: Vec<Interaction>,
    /// Menu actions chosen this frame, as `(item_id, action)`.
    pub menu_actions: Vec<(String, MenuAction)>,
}

/// Interactive column board.
#[derive(Debug)]
pub struct BoardView {
    id: Id,
    context: BoardContext,
    metrics: LayoutMetrics,
    focused: Option<String>,
    /// Dropdown rectangles from the last frame they were shown.
    menu_rects: HashMap<String, Rect>,
}

impl BoardView {
    pub fn new(id_salt: impl std::hash::Hash, config: SensorConfig) -> Self {
        Self {
            id: Id::new(id_salt),
            context: BoardContext::new(config),
            metrics: LayoutMetrics::default(),
            focused: None,
            menu_rects: HashMap::new(),
        }
    }

    pub fn context(&self) -> &BoardContext {
        &self.context
    }

    /// Item holding keyboard focus.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn set_focus(&mut self, item_id: Option<&str>) {
        self.focused = item_id.map(str::to_string);
    }

    /// Call after the host replaced the board.
    pub fn sync(&mut self, board: &Board) {
        self.context.sync(board);
        if self
            .focused
            .as_deref()
            .is_some_and(|id| board.locate(id).is_none())
        {
            self.focused = None;
        }
        let menus = self.context.menus();
        self.menu_rects.retain(|id, _| menus.is_open(id));
    }

    /// Accessibility announcements queued since the last call.
    pub fn take_announcements(&mut self) -> Vec<String> {
        self.context.take_announcements()
    }

    /// Lay out, handle input and paint the board.
    pub fn show(&mut self, ui: &mut Ui, board: &Board, host: &mut dyn BoardHost) -> BoardResponse {
        let available = ui.available_rect_before_wrap();
        let layout = BoardLayout::compute(board, available.min, available.height(), self.metrics);
        if !layout.columns().is_empty() {
            ui.allocate_rect(layout.bounds(), Sense::hover());
        }

        self.context.begin_frame();
        layout.register(&mut self.context);

        let mut response = BoardResponse::default();
        let events = ui.input(|i| i.events.clone());
        for event in &events {
            if let Some(interaction) = self.handle_event(board, &layout, event, host) {
                match &interaction {
                    Interaction::Clicked(item) | Interaction::DragStarted(item) => {
                        self.focused = Some(item.clone());
                    }
                    Interaction::DragEnded(_) => {}
                }
                response.interactions.push(interaction);
            }
        }

        self.paint(ui, board, &layout);
        self.show_menus(ui, board, &layout, host, &mut response);
        self.show_overlay(ui);
        response
    }

    fn handle_event(
        &mut self,
        board: &Board,
        layout: &BoardLayout,
        event: &Event,
        host: &mut dyn BoardHost,
    ) -> Option<Interaction> {
        match event {
            Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                let button = mouse_button(*button)?;
                if *pressed && button == MouseButton::Left {
                    self.document_click(layout, *pos);
                }
                let hit = self.hit_card(layout, *pos);
                let position = to_kurbo_point(*pos);
                let event = if *pressed {
                    PointerEvent::Down { position, button }
                } else {
                    PointerEvent::Up { position, button }
                };
                self.context.pointer_event(board, &event, hit, host)
            }
            Event::PointerMoved(pos) => {
                let event = PointerEvent::Move {
                    position: to_kurbo_point(*pos),
                };
                self.context.pointer_event(board, &event, None, host)
            }
            Event::Key {
                key: Key::Tab,
                pressed: true,
                modifiers,
                ..
            } => {
                if !self.context.is_dragging() {
                    self.focused = next_focus(board, self.focused.as_deref(), modifiers.shift);
                }
                None
            }
            _ => match key_event(event)? {
                KeyEvent::Pressed(key) => {
                    let focused = self.focused.clone();
                    self.context
                        .key_event(board, &key, focused.as_deref(), host)
                }
                KeyEvent::Released(_) => None,
            },
        }
    }

    /// Card under `pos` that may start a drag. Triggers and open dropdowns
    /// sit on top of cards and take the press instead.
    fn hit_card<'a>(&self, layout: &'a BoardLayout, pos: Pos2) -> Option<&'a str> {
        if layout.hit_trigger(pos).is_some() || self.menu_at(pos).is_some() {
            return None;
        }
        layout.hit_item(pos).map(|slot| slot.id.as_str())
    }

    fn menu_at(&self, pos: Pos2) -> Option<&str> {
        self.menu_rects
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(id, _)| id.as_str())
    }

    fn document_click(&mut self, layout: &BoardLayout, pos: Pos2) {
        // Trigger clicks are handled by the trigger alone.
        if layout.hit_trigger(pos).is_some() {
            return;
        }
        let inside = self.menu_at(pos).map(str::to_string);
        for closed in self.context.document_click(inside.as_deref()) {
            self.menu_rects.remove(&closed);
        }
    }

    fn paint(&mut self, ui: &mut Ui, board: &Board, layout: &BoardLayout) {
        let painter = ui.painter().clone();
        let controller = self.context.controller();
        let highlighted = controller
            .hover()
            .and_then(|target| board.destination_column(target));

        for (slot, column) in layout.columns().iter().zip(board.columns()) {
            paint_column(&painter, slot, column, highlighted == Some(column.id.as_str()));
        }

        let mut toggled = Vec::new();
        for slot in layout.items() {
            let Some((item, _)) = board.locate(&slot.id) else {
                continue;
            };
            if controller.is_suppressed(&slot.id) {
                paint_placeholder(&painter, slot.rect);
                continue;
            }
            let focused = self.focused.as_deref() == Some(slot.id.as_str());
            paint_card(&painter, slot.rect, item, Placement::InPlace, focused);

            let open = self.context.menus().is_open(&slot.id);
            let trigger = menu_trigger(ui, slot.trigger, self.id.with(("trigger", &slot.id)), open);
            if trigger.clicked() {
                toggled.push(slot.id.clone());
            }
        }

        for item_id in toggled {
            if self.context.toggle_menu(&item_id) == MenuState::Closed {
                self.menu_rects.remove(&item_id);
            }
        }
    }

    fn show_menus(
        &mut self,
        ui: &mut Ui,
        board: &Board,
        layout: &BoardLayout,
        host: &mut dyn BoardHost,
        response: &mut BoardResponse,
    ) {
        let open: Vec<String> = self
            .context
            .menus()
            .open_menus()
            .into_iter()
            .map(str::to_string)
            .collect();

        for item_id in open {
            let Some(slot) = layout.item(&item_id) else {
                continue;
            };
            let anchor = Pos2::new(
                slot.trigger.right() - sizing::MENU_WIDTH - 12.0,
                slot.trigger.bottom() + 4.0,
            );
            let (chosen, rect) = action_menu(ui.ctx(), &item_id, anchor);
            self.menu_rects.insert(item_id.clone(), rect);

            let Some(action) = chosen else {
                continue;
            };
            log::debug!("Menu action {action:?} chosen on {item_id}");
            if let Some(action) = self
                .context
                .select_menu_action(board, &item_id, action, host)
            {
                response.menu_actions.push((item_id.clone(), action));
            }
            self.menu_rects.remove(&item_id);
        }
    }

    fn show_overlay(&self, ui: &mut Ui) {
        let Some(overlay) = self.context.controller().overlay() else {
            return;
        };
        let rect = to_egui_rect(overlay.rect);
        egui::Area::new(self.id.with("drag_overlay"))
            .fixed_pos(rect.min)
            .order(Order::Tooltip)
            .interactable(false)
            .show(ui.ctx(), |ui| {
                let (slot, _) = ui.allocate_exact_size(rect.size(), Sense::hover());
                paint_card(ui.painter(), slot, overlay.item, Placement::Overlay, false);
            });
        ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        ui.ctx().request_repaint();
    }
}

fn mouse_button(button: egui::PointerButton) -> Option<MouseButton> {
    match button {
        egui::PointerButton::Primary => Some(MouseButton::Left),
        egui::PointerButton::Secondary => Some(MouseButton::Right),
        egui::PointerButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Translate an egui key event into a named key the sensors understand.
///
/// Auto-repeat only passes through for arrow keys. A held Space or Enter
/// would otherwise pick an item up and drop it again straight away.
fn key_event(event: &Event) -> Option<KeyEvent> {
    let Event::Key {
        key,
        pressed,
        repeat,
        ..
    } = event
    else {
        return None;
    };
    let name = match key {
        Key::Space => "Space",
        Key::Enter => "Enter",
        Key::Escape => "Escape",
        Key::ArrowUp => "ArrowUp",
        Key::ArrowDown => "ArrowDown",
        Key::ArrowLeft => "ArrowLeft",
        Key::ArrowRight => "ArrowRight",
        _ => return None,
    };
    if *repeat && Direction::from_key(name).is_none() {
        return None;
    }
    Some(if *pressed {
        KeyEvent::Pressed(name.to_string())
    } else {
        KeyEvent::Released(name.to_string())
    })
}

/// Next item to focus when tabbing, in board order, wrapping around.
fn next_focus(board: &Board, current: Option<&str>, backwards: bool) -> Option<String> {
    let ids: Vec<&str> = board
        .columns()
        .iter()
        .flat_map(|column| column.items.iter().map(|item| item.id.as_str()))
        .collect();
    if ids.is_empty() {
        return None;
    }
    let len = ids.len();
    let index = match (current.and_then(|c| ids.iter().position(|id| *id == c)), backwards) {
        (None, false) => 0,
        (None, true) => len - 1,
        (Some(i), false) => (i + 1) % len,
        (Some(i), true) => (i + len - 1) % len,
    };
    Some(ids[index].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, PointerButton, RawInput, pos2, vec2};
    use pipeboard_core::{Column, DragOutcome, DropTarget, Item, RecordingHost};

    fn board() -> Board {
        Board::new(vec![
            Column::new("applied", "Applied").with_item(Item::new("1", "Alice", "Engineer")),
            Column::new("interview", "Interview"),
        ])
        .unwrap()
    }

    fn key(key: Key) -> Event {
        Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: Modifiers::NONE,
        }
    }

    fn held(key: Key) -> Event {
        Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: true,
            modifiers: Modifiers::NONE,
        }
    }

    fn button(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    /// Run one frame with `events` and return what the board reported.
    fn frame(
        ctx: &egui::Context,
        view: &mut BoardView,
        board: &Board,
        host: &mut RecordingHost,
        events: Vec<Event>,
    ) -> BoardResponse {
        let input = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(1024.0, 768.0))),
            events,
            ..Default::default()
        };
        let mut response = BoardResponse::default();
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                response = view.show(ui, board, host);
            });
        });
        response
    }

    #[test]
    fn test_next_focus_wraps() {
        let board = Board::new(vec![
            Column::new("a", "A").with_item(Item::new("1", "Alice", "")),
            Column::new("b", "B").with_item(Item::new("2", "Bob", "")),
        ])
        .unwrap();

        assert_eq!(next_focus(&board, None, false).as_deref(), Some("1"));
        assert_eq!(next_focus(&board, Some("1"), false).as_deref(), Some("2"));
        assert_eq!(next_focus(&board, Some("2"), false).as_deref(), Some("1"));
        assert_eq!(next_focus(&board, None, true).as_deref(), Some("2"));
        assert_eq!(next_focus(&board, Some("1"), true).as_deref(), Some("2"));
    }

    #[test]
    fn test_next_focus_empty_board() {
        let board = Board::new(vec![Column::new("a", "A")]).unwrap();
        assert_eq!(next_focus(&board, Some("1"), false), None);
    }

    #[test]
    fn test_key_event_names() {
        assert_eq!(
            key_event(&key(Key::ArrowLeft)),
            Some(KeyEvent::Pressed("ArrowLeft".to_string()))
        );
        assert_eq!(key_event(&key(Key::A)), None);
        assert_eq!(key_event(&Event::PointerGone), None);
    }

    #[test]
    fn test_key_event_repeats_only_arrows() {
        assert_eq!(
            key_event(&held(Key::ArrowDown)),
            Some(KeyEvent::Pressed("ArrowDown".to_string()))
        );
        assert_eq!(key_event(&held(Key::Space)), None);
        assert_eq!(key_event(&held(Key::Enter)), None);
        assert_eq!(key_event(&held(Key::Escape)), None);
    }

    #[test]
    fn test_held_space_does_not_drop() {
        let ctx = egui::Context::default();
        let board = board();
        let mut view = BoardView::new("board", SensorConfig::default());
        let mut host = RecordingHost::new();
        frame(&ctx, &mut view, &board, &mut host, vec![]);
        view.set_focus(Some("1"));

        let response = frame(
            &ctx,
            &mut view,
            &board,
            &mut host,
            vec![key(Key::Space), held(Key::Space)],
        );

        assert_eq!(
            response.interactions,
            vec![Interaction::DragStarted("1".to_string())]
        );
        assert!(view.context().is_dragging());
        assert!(host.events().is_empty());
    }

    #[test]
    fn test_keyboard_drag_through_egui() {
        let ctx = egui::Context::default();
        let board = board();
        let mut view = BoardView::new("board", SensorConfig::default());
        let mut host = RecordingHost::new();

        // First frame lays the board out so the sensors have geometry.
        frame(&ctx, &mut view, &board, &mut host, vec![]);
        view.set_focus(Some("1"));

        let response = frame(
            &ctx,
            &mut view,
            &board,
            &mut host,
            vec![key(Key::Space), key(Key::ArrowRight), key(Key::Space)],
        );

        assert_eq!(response.interactions.len(), 2);
        assert!(matches!(
            response.interactions.last(),
            Some(Interaction::DragEnded(DragOutcome::Moved(_)))
        ));
        let moves = host.moves();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].destination.droppable_id, "interview");
        assert!(!view.context().is_dragging());
    }

    #[test]
    fn test_click_focuses_card() {
        let ctx = egui::Context::default();
        let board = board();
        let mut view = BoardView::new("board", SensorConfig::default());
        let mut host = RecordingHost::new();
        frame(&ctx, &mut view, &board, &mut host, vec![]);

        let card = view.context().targets().item_rect("1").unwrap();
        let pos = pos2(card.x0 as f32 + 10.0, card.y1 as f32 - 10.0);
        let response = frame(
            &ctx,
            &mut view,
            &board,
            &mut host,
            vec![button(pos, true), button(pos, false)],
        );

        assert_eq!(response.interactions, vec![Interaction::Clicked("1".to_string())]);
        assert_eq!(view.focused(), Some("1"));
        assert!(host.events().is_empty());
    }

    /// Centre of the menu trigger on `item_id`'s card.
    fn trigger_center(view: &BoardView, item_id: &str) -> Pos2 {
        let card = view.context().targets().item_rect(item_id).unwrap();
        let metrics = LayoutMetrics::default();
        let inset = (metrics.card_height / 2.0 - metrics.trigger_size) / 2.0;
        pos2(
            card.x1 as f32 - inset - metrics.trigger_size / 2.0,
            card.y0 as f32 + inset + metrics.trigger_size / 2.0,
        )
    }

    fn column_center(view: &BoardView, column_id: &str) -> Pos2 {
        let rect = view
            .context()
            .targets()
            .rect_of(&DropTarget::Column(column_id.to_string()))
            .unwrap();
        let center = rect.center();
        pos2(center.x as f32, center.y as f32)
    }

    /// Open the menu on "1" by clicking its trigger. Returns every
    /// interaction reported along the way.
    fn open_menu(
        ctx: &egui::Context,
        view: &mut BoardView,
        board: &Board,
        host: &mut RecordingHost,
    ) -> Vec<Interaction> {
        let pos = trigger_center(view, "1");
        let mut interactions = Vec::new();
        for events in [
            vec![Event::PointerMoved(pos)],
            vec![button(pos, true)],
            vec![button(pos, false)],
            vec![],
        ] {
            interactions.extend(frame(ctx, view, board, host, events).interactions);
        }
        interactions
    }

    #[test]
    fn test_trigger_click_opens_menu_without_drag() {
        let ctx = egui::Context::default();
        let board = board();
        let mut view = BoardView::new("board", SensorConfig::default());
        let mut host = RecordingHost::new();
        frame(&ctx, &mut view, &board, &mut host, vec![]);

        let interactions = open_menu(&ctx, &mut view, &board, &mut host);

        assert!(interactions.is_empty());
        assert!(view.context().menus().is_open("1"));
        assert!(view.menu_rects.contains_key("1"));
        assert!(!view.context().is_dragging());
        assert!(host.events().is_empty());
    }

    #[test]
    fn test_press_inside_menu_keeps_it_open() {
        let ctx = egui::Context::default();
        let board = board();
        let mut view = BoardView::new("board", SensorConfig::default());
        let mut host = RecordingHost::new();
        frame(&ctx, &mut view, &board, &mut host, vec![]);
        open_menu(&ctx, &mut view, &board, &mut host);

        // Just inside the frame, clear of the action rows.
        let inside = view.menu_rects["1"].min + vec2(2.0, 2.0);
        frame(
            &ctx,
            &mut view,
            &board,
            &mut host,
            vec![Event::PointerMoved(inside), button(inside, true)],
        );

        assert!(view.context().menus().is_open("1"));
        assert!(!view.context().is_dragging());
        assert!(host.events().is_empty());
    }

    #[test]
    fn test_press_outside_menu_closes_it() {
        let ctx = egui::Context::default();
        let board = board();
        let mut view = BoardView::new("board", SensorConfig::default());
        let mut host = RecordingHost::new();
        frame(&ctx, &mut view, &board, &mut host, vec![]);
        open_menu(&ctx, &mut view, &board, &mut host);

        let outside = column_center(&view, "interview");
        let response = frame(
            &ctx,
            &mut view,
            &board,
            &mut host,
            vec![
                Event::PointerMoved(outside),
                button(outside, true),
                button(outside, false),
            ],
        );

        assert!(response.interactions.is_empty());
        assert!(response.menu_actions.is_empty());
        assert!(!view.context().menus().is_open("1"));
        assert!(view.menu_rects.is_empty());
        assert!(host.events().is_empty());
    }

    #[test]
    fn test_pointer_drag_through_egui() {
        let ctx = egui::Context::default();
        let board = board();
        let mut view = BoardView::new("board", SensorConfig::default());
        let mut host = RecordingHost::new();
        frame(&ctx, &mut view, &board, &mut host, vec![]);

        let card = view.context().targets().item_rect("1").unwrap().center();
        let start = pos2(card.x as f32, card.y as f32);
        let target = column_center(&view, "interview");

        let mut interactions = Vec::new();
        for events in [
            vec![Event::PointerMoved(start), button(start, true)],
            vec![Event::PointerMoved(start + vec2(20.0, 0.0))],
            vec![Event::PointerMoved(target)],
            vec![button(target, false)],
        ] {
            interactions.extend(frame(&ctx, &mut view, &board, &mut host, events).interactions);
        }

        assert_eq!(interactions.len(), 2);
        assert_eq!(interactions[0], Interaction::DragStarted("1".to_string()));
        assert!(matches!(
            interactions[1],
            Interaction::DragEnded(DragOutcome::Moved(_))
        ));
        let moves = host.moves();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].destination.droppable_id, "interview");
        assert!(!view.context().is_dragging());
    }

    #[test]
    fn test_sync_drops_stale_focus() {
        let mut view = BoardView::new("board", SensorConfig::default());
        view.set_focus(Some("1"));
        view.sync(&Board::new(vec![Column::new("applied", "Applied")]).unwrap());
        assert_eq!(view.focused(), None);
    }
}
