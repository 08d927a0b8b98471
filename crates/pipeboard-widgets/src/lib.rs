//! egui rendering for the Pipeboard column board.
//!
//! - **Layout**: column and card geometry, hit testing
//! - **Column**: column body, header with count badge, empty placeholder
//! - **Card**: candidate cards, the drag placeholder and the overlay
//! - **Menu**: per-card trigger and action dropdown
//! - **BoardView**: translates egui input into board interactions

pub mod board_view;
pub mod card;
pub mod column;
pub mod layout;
pub mod menu;

pub use board_view::{BoardResponse, BoardView};
pub use card::{paint_card, paint_placeholder};
pub use column::paint_column;
pub use layout::{BoardLayout, ColumnSlot, ItemSlot, LayoutMetrics, to_egui_rect, to_kurbo_point, to_kurbo_rect};
pub use menu::{action_menu, menu_item, menu_trigger, panel_frame};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Column width
    pub const COLUMN_WIDTH: f32 = 240.0;
    /// Gap between columns
    pub const COLUMN_GAP: f32 = 16.0;
    /// Column header height
    pub const HEADER_HEIGHT: f32 = 40.0;
    /// Card height
    pub const CARD_HEIGHT: f32 = 64.0;
    /// Gap between cards
    pub const CARD_GAP: f32 = 8.0;
    /// Menu trigger button size
    pub const TRIGGER: f32 = 22.0;
    /// Dropdown menu width
    pub const MENU_WIDTH: f32 = 132.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Focus ring and drop highlight (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Highlighted column background
    pub const DROP_BG: Color32 = Color32::from_rgb(235, 245, 255);
    /// Column background
    pub const COLUMN_BG: Color32 = Color32::from_rgb(241, 242, 246);
    /// Card background
    pub const CARD_BG: Color32 = Color32::WHITE;
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
    /// Destructive action text
    pub const DANGER: Color32 = Color32::from_rgb(220, 38, 38);
}
