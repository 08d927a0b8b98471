//! Column painting: background, header with count badge, empty placeholder.

use egui::{Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, vec2};
use pipeboard_core::Column;

use crate::layout::ColumnSlot;
use crate::{sizing, theme};

/// Shown in a column with no cards.
pub const EMPTY_TEXT: &str = "Drop candidates here";

/// Paint one column. `highlighted` marks it as the current drop destination.
pub fn paint_column(painter: &Painter, slot: &ColumnSlot, column: &Column, highlighted: bool) {
    let (fill, stroke) = if highlighted {
        (theme::DROP_BG, Stroke::new(2.0, theme::ACCENT))
    } else {
        (theme::COLUMN_BG, Stroke::new(1.0, theme::BORDER))
    };
    painter.rect_filled(slot.rect, CornerRadius::same(sizing::PANEL_RADIUS), fill);
    painter.rect_stroke(
        slot.rect,
        CornerRadius::same(sizing::PANEL_RADIUS),
        stroke,
        StrokeKind::Inside,
    );

    painter.text(
        Pos2::new(slot.header.left() + 12.0, slot.header.center().y),
        Align2::LEFT_CENTER,
        column.label(),
        FontId::proportional(14.0),
        theme::TEXT,
    );
    paint_count_badge(painter, slot.header, column.items.len());

    if column.items.is_empty() {
        let text_color = if highlighted {
            theme::ACCENT
        } else {
            theme::TEXT_MUTED
        };
        painter.text(
            Pos2::new(slot.body.center().x, slot.body.top() + 32.0),
            Align2::CENTER_CENTER,
            EMPTY_TEXT,
            FontId::proportional(12.0),
            text_color,
        );
    }
}

fn paint_count_badge(painter: &Painter, header: Rect, count: usize) {
    let text = count.to_string();
    let width = 14.0 + 7.0 * text.len() as f32;
    let badge = Rect::from_center_size(
        Pos2::new(header.right() - 12.0 - width / 2.0, header.center().y),
        vec2(width, 20.0),
    );
    painter.rect_filled(badge, CornerRadius::same(10), Color32::from_gray(225));
    painter.text(
        badge.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(11.0),
        theme::TEXT_MUTED,
    );
}
