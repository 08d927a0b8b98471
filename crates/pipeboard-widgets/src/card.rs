//! Candidate cards.
//!
//! A card is drawn in one of two places. In its slot it shows the name, the
//! role and the menu trigger; while it is being dragged the slot holds a
//! dashed placeholder and the card itself follows the overlay, without a
//! trigger.

use egui::{Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Shape, Stroke, StrokeKind};
use pipeboard_core::{Item, Placement};

use crate::{sizing, theme};

/// Paint a card. `focused` draws the keyboard focus ring.
pub fn paint_card(painter: &Painter, rect: Rect, item: &Item, placement: Placement, focused: bool) {
    let corner = CornerRadius::same(sizing::CORNER_RADIUS + 2);

    if placement == Placement::Overlay {
        painter.add(egui::epaint::Shadow {
            spread: 0,
            blur: 12,
            offset: [0, 4],
            color: Color32::from_black_alpha(40),
        }
        .as_shape(rect, corner));
    }
    painter.rect_filled(rect, corner, theme::CARD_BG);

    let stroke = if focused {
        Stroke::new(2.0, theme::ACCENT)
    } else {
        Stroke::new(1.0, theme::BORDER)
    };
    painter.rect_stroke(rect, corner, stroke, StrokeKind::Inside);

    painter.text(
        Pos2::new(rect.left() + 12.0, rect.top() + rect.height() * 0.35),
        Align2::LEFT_CENTER,
        &item.name,
        FontId::proportional(14.0),
        theme::TEXT,
    );
    if !item.role.is_empty() {
        painter.text(
            Pos2::new(rect.left() + 12.0, rect.top() + rect.height() * 0.7),
            Align2::LEFT_CENTER,
            &item.role,
            FontId::proportional(12.0),
            theme::TEXT_MUTED,
        );
    }
}

/// Paint the slot left behind by a dragged card.
pub fn paint_placeholder(painter: &Painter, rect: Rect) {
    let corner = CornerRadius::same(sizing::CORNER_RADIUS + 2);
    painter.rect_filled(rect, corner, Color32::from_black_alpha(8));

    let stroke = Stroke::new(1.0, Color32::from_gray(180));
    let points = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    painter.extend(Shape::dashed_line(&points, stroke, 6.0, 4.0));
}
