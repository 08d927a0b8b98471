//! Card menu: the trigger button and the action dropdown.

use egui::{
    Align2, Color32, Context, CornerRadius, CursorIcon, FontId, Frame, Id, Margin, Order, Pos2,
    Rect, Response, Sense, Stroke, Ui, vec2,
};
use pipeboard_core::MenuAction;

use crate::{sizing, theme};

/// Show a menu item. Returns true when clicked.
pub fn menu_item(ui: &mut Ui, label: &str, text_color: Color32) -> bool {
    let size = vec2(ui.available_width(), 28.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if response.hovered() {
            theme::HOVER_BG
        } else {
            Color32::TRANSPARENT
        };
        ui.painter()
            .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);

        ui.painter().text(
            Pos2::new(rect.left() + 12.0, rect.center().y),
            Align2::LEFT_CENTER,
            label,
            FontId::proportional(13.0),
            text_color,
        );
    }

    let clicked = response.clicked();
    response.on_hover_cursor(CursorIcon::PointingHand);
    clicked
}

/// Three-dot trigger button occupying `rect`.
pub fn menu_trigger(ui: &mut Ui, rect: Rect, id: Id, open: bool) -> Response {
    // Not focusable: Tab focus belongs to the cards.
    let response = ui.interact(rect, id, Sense::CLICK);

    if ui.is_rect_visible(rect) {
        let bg_color = if open {
            theme::DROP_BG
        } else if response.hovered() {
            theme::HOVER_BG
        } else {
            Color32::TRANSPARENT
        };
        ui.painter()
            .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);

        let dot_color = if open { theme::ACCENT } else { theme::TEXT_MUTED };
        for dx in [-5.0, 0.0, 5.0] {
            ui.painter()
                .circle_filled(rect.center() + vec2(dx, 0.0), 1.6, dot_color);
        }
    }

    response.on_hover_cursor(CursorIcon::PointingHand)
}

/// Dropdown for `item_id`, anchored below its trigger.
///
/// Returns the chosen action and the dropdown's screen rectangle, which the
/// caller uses to tell inside clicks from outside ones.
pub fn action_menu(ctx: &Context, item_id: &str, anchor: Pos2) -> (Option<MenuAction>, Rect) {
    let mut chosen = None;
    let response = egui::Area::new(Id::new(("card_menu", item_id)))
        .fixed_pos(anchor)
        .order(Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(sizing::MENU_WIDTH);
                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing = vec2(0.0, 2.0);
                    for action in MenuAction::ALL {
                        let color = match action {
                            MenuAction::Reject => theme::DANGER,
                            _ => theme::TEXT,
                        };
                        if menu_item(ui, action.label(), color) {
                            chosen = Some(action);
                        }
                    }
                });
            });
        });
    (chosen, response.response.rect)
}

/// Create a standard panel frame with shadow.
pub fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(6))
}
