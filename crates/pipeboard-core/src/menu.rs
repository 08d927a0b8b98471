//! Per-item action menu with scoped outside-click dismissal.
//!
//! An open menu holds an [`OutsideClickGuard`], a subscription to the single
//! document-wide click listener set. Dropping the guard unsubscribes, so
//! closing the menu or unmounting the item always releases it.

use crate::board::Board;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

/// Actions offered by an item's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Proceed,
    /// Reserved for the host; has no side effect here.
    View,
    Reject,
}

impl MenuAction {
    /// All actions in display order.
    pub const ALL: [MenuAction; 3] = [MenuAction::Proceed, MenuAction::View, MenuAction::Reject];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Proceed => "Proceed",
            MenuAction::View => "View",
            MenuAction::Reject => "Reject",
        }
    }
}

/// Menu visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

/// Document-wide click subscriptions, keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct DocumentListeners {
    subscribers: Rc<RefCell<HashSet<String>>>,
}

impl DocumentListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `item_id` to document clicks.
    ///
    /// Returns `None` if that item is already subscribed.
    pub fn subscribe(&self, item_id: &str) -> Option<OutsideClickGuard> {
        if !self.subscribers.borrow_mut().insert(item_id.to_string()) {
            return None;
        }
        log::debug!("Outside-click listener registered for {item_id}");
        Some(OutsideClickGuard {
            item_id: item_id.to_string(),
            subscribers: Rc::downgrade(&self.subscribers),
        })
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribed item ids, sorted.
    pub fn subscribers(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.subscribers.borrow().iter().cloned().collect();
        ids.sort();
        ids
    }
}

/// Live outside-click subscription. Unsubscribes on drop.
#[derive(Debug)]
pub struct OutsideClickGuard {
    item_id: String,
    subscribers: Weak<RefCell<HashSet<String>>>,
}

impl OutsideClickGuard {
    pub fn item_id(&self) -> &str {
        &self.item_id
    }
}

impl Drop for OutsideClickGuard {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.borrow_mut().remove(&self.item_id);
            log::debug!("Outside-click listener removed for {}", self.item_id);
        }
    }
}

/// One item's menu.
#[derive(Debug)]
pub struct ItemMenu {
    item_id: String,
    guard: Option<OutsideClickGuard>,
}

impl ItemMenu {
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            guard: None,
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn state(&self) -> MenuState {
        if self.guard.is_some() {
            MenuState::Open
        } else {
            MenuState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == MenuState::Open
    }

    /// Open the menu, acquiring the outside-click subscription.
    pub fn open(&mut self, listeners: &DocumentListeners) {
        if self.guard.is_none() {
            self.guard = listeners.subscribe(&self.item_id);
        }
    }

    /// Close the menu, releasing the subscription.
    pub fn close(&mut self) {
        self.guard = None;
    }

    /// Trigger-button click.
    pub fn toggle(&mut self, listeners: &DocumentListeners) {
        if self.is_open() {
            self.close();
        } else {
            self.open(listeners);
        }
    }

    /// Choose an action. Only an open menu accepts a selection.
    pub fn select(&mut self, action: MenuAction) -> Option<MenuAction> {
        if !self.is_open() {
            return None;
        }
        self.close();
        Some(action)
    }
}

/// Menus for every item that has interacted with one.
#[derive(Debug, Default)]
pub struct MenuManager {
    listeners: DocumentListeners,
    menus: HashMap<String, ItemMenu>,
}

impl MenuManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared document listener set.
    pub fn listeners(&self) -> &DocumentListeners {
        &self.listeners
    }

    pub fn state(&self, item_id: &str) -> MenuState {
        self.menus
            .get(item_id)
            .map(ItemMenu::state)
            .unwrap_or_default()
    }

    pub fn is_open(&self, item_id: &str) -> bool {
        self.state(item_id) == MenuState::Open
    }

    /// Ids of items whose menu is open, sorted.
    pub fn open_menus(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self
            .menus
            .values()
            .filter(|m| m.is_open())
            .map(ItemMenu::item_id)
            .collect();
        ids.sort();
        ids
    }

    /// Trigger-button click on `item_id`'s menu.
    pub fn toggle(&mut self, item_id: &str) -> MenuState {
        let menu = self
            .menus
            .entry(item_id.to_string())
            .or_insert_with(|| ItemMenu::new(item_id));
        menu.toggle(&self.listeners);
        menu.state()
    }

    /// Select an action on `item_id`'s menu, closing it.
    pub fn select(&mut self, item_id: &str, action: MenuAction) -> Option<MenuAction> {
        self.menus.get_mut(item_id)?.select(action)
    }

    /// A click reached the document.
    ///
    /// `inside` names the item whose menu contains the click, if any. Every
    /// other subscribed menu closes. Returns the ids that closed.
    pub fn document_click(&mut self, inside: Option<&str>) -> Vec<String> {
        let mut closed = Vec::new();
        for id in self.listeners.subscribers() {
            if Some(id.as_str()) == inside {
                continue;
            }
            if let Some(menu) = self.menus.get_mut(&id) {
                menu.close();
                closed.push(id);
            }
        }
        closed
    }

    /// Drop menus for items no longer on the board.
    pub fn retain(&mut self, board: &Board) {
        self.menus.retain(|id, _| board.locate(id).is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Column, Item};

    #[test]
    fn test_toggle_open_close() {
        let mut menus = MenuManager::new();
        assert_eq!(menus.state("1"), MenuState::Closed);

        assert_eq!(menus.toggle("1"), MenuState::Open);
        assert_eq!(menus.listeners().subscribers(), vec!["1".to_string()]);

        assert_eq!(menus.toggle("1"), MenuState::Closed);
        assert!(menus.listeners().is_empty());
    }

    #[test]
    fn test_select_closes_and_returns_action() {
        let mut menus = MenuManager::new();
        menus.toggle("1");

        assert_eq!(menus.select("1", MenuAction::Proceed), Some(MenuAction::Proceed));
        assert!(!menus.is_open("1"));
        assert!(menus.listeners().is_empty());
    }

    #[test]
    fn test_select_on_closed_menu_is_ignored() {
        let mut menus = MenuManager::new();
        assert_eq!(menus.select("1", MenuAction::Reject), None);
        menus.toggle("1");
        menus.toggle("1");
        assert_eq!(menus.select("1", MenuAction::Reject), None);
    }

    #[test]
    fn test_outside_click_closes() {
        let mut menus = MenuManager::new();
        menus.toggle("1");

        let closed = menus.document_click(None);
        assert_eq!(closed, vec!["1".to_string()]);
        assert!(!menus.is_open("1"));
        assert!(menus.listeners().is_empty());
    }

    #[test]
    fn test_click_inside_keeps_menu_open() {
        let mut menus = MenuManager::new();
        menus.toggle("1");
        menus.toggle("2");

        let closed = menus.document_click(Some("1"));
        assert_eq!(closed, vec!["2".to_string()]);
        assert!(menus.is_open("1"));
        assert_eq!(menus.open_menus(), vec!["1"]);
    }

    #[test]
    fn test_single_subscription_per_item() {
        let listeners = DocumentListeners::new();
        let guard = listeners.subscribe("1");
        assert!(guard.is_some());
        assert!(listeners.subscribe("1").is_none());
        assert_eq!(listeners.len(), 1);

        drop(guard);
        assert!(listeners.is_empty());
        assert!(listeners.subscribe("1").is_some());
    }

    #[test]
    fn test_reopen_does_not_double_register() {
        let listeners = DocumentListeners::new();
        let mut menu = ItemMenu::new("1");
        menu.open(&listeners);
        menu.open(&listeners);
        assert_eq!(listeners.len(), 1);
        assert_eq!(menu.state(), MenuState::Open);
    }

    #[test]
    fn test_unmount_releases_listener() {
        let mut menus = MenuManager::new();
        menus.toggle("1");
        menus.toggle("2");

        let board = Board::new(vec![
            Column::new("applied", "Applied").with_item(Item::new("2", "Bob", "")),
        ])
        .unwrap();
        menus.retain(&board);

        assert_eq!(menus.listeners().subscribers(), vec!["2".to_string()]);
        assert_eq!(menus.state("1"), MenuState::Closed);
    }

    #[test]
    fn test_guard_outliving_listeners_is_safe() {
        let listeners = DocumentListeners::new();
        let guard = listeners.subscribe("1").unwrap();
        drop(listeners);
        assert_eq!(guard.item_id(), "1");
        drop(guard);
    }
}
