//! Board geometry: where columns, cards and menu triggers sit on screen.
//!
//! Layout is recomputed every frame from the board, so hit testing always
//! sees the same rectangles that get painted and registered as drop targets.

use egui::{Pos2, Rect, Vec2, pos2, vec2};
use pipeboard_core::{Board, BoardContext};

use crate::sizing;

/// Spacing used to lay out a board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub column_width: f32,
    pub column_gap: f32,
    pub header_height: f32,
    pub card_height: f32,
    pub card_gap: f32,
    /// Inset of cards inside their column
    pub padding: f32,
    pub trigger_size: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            column_width: sizing::COLUMN_WIDTH,
            column_gap: sizing::COLUMN_GAP,
            header_height: sizing::HEADER_HEIGHT,
            card_height: sizing::CARD_HEIGHT,
            card_gap: sizing::CARD_GAP,
            padding: 8.0,
            trigger_size: sizing::TRIGGER,
        }
    }
}

/// One column's rectangles.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSlot {
    pub id: String,
    /// Whole column, header included. This is the drop target.
    pub rect: Rect,
    pub header: Rect,
    pub body: Rect,
}

/// One card's rectangles.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSlot {
    pub id: String,
    pub column: String,
    pub rect: Rect,
    /// Menu trigger button in the card's top-right corner.
    pub trigger: Rect,
}

/// Geometry for every column and card of a board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardLayout {
    columns: Vec<ColumnSlot>,
    items: Vec<ItemSlot>,
    metrics: LayoutMetrics,
}

impl BoardLayout {
    /// Lay out `board` starting at `origin`. Columns are at least
    /// `min_height` tall and grow to fit their cards.
    pub fn compute(board: &Board, origin: Pos2, min_height: f32, metrics: LayoutMetrics) -> Self {
        let mut columns = Vec::with_capacity(board.columns().len());
        let mut items = Vec::new();

        for (index, column) in board.columns().iter().enumerate() {
            let x = origin.x + index as f32 * (metrics.column_width + metrics.column_gap);
            let content = metrics.padding
                + column.items.len() as f32 * (metrics.card_height + metrics.card_gap);
            let height = min_height.max(metrics.header_height + content + metrics.padding);

            let rect = Rect::from_min_size(pos2(x, origin.y), vec2(metrics.column_width, height));
            let header = Rect::from_min_size(rect.min, vec2(rect.width(), metrics.header_height));
            let body = Rect::from_min_max(pos2(rect.left(), header.bottom()), rect.max);

            for (row, item) in column.items.iter().enumerate() {
                let top = body.top()
                    + metrics.padding
                    + row as f32 * (metrics.card_height + metrics.card_gap);
                let card = Rect::from_min_size(
                    pos2(body.left() + metrics.padding, top),
                    vec2(body.width() - 2.0 * metrics.padding, metrics.card_height),
                );
                let inset = (metrics.card_height / 2.0 - metrics.trigger_size) / 2.0;
                let trigger = Rect::from_min_size(
                    pos2(card.right() - metrics.trigger_size - inset, card.top() + inset),
                    Vec2::splat(metrics.trigger_size),
                );
                items.push(ItemSlot {
                    id: item.id.clone(),
                    column: column.id.clone(),
                    rect: card,
                    trigger,
                });
            }

            columns.push(ColumnSlot {
                id: column.id.clone(),
                rect,
                header,
                body,
            });
        }

        Self {
            columns,
            items,
            metrics,
        }
    }

    pub fn columns(&self) -> &[ColumnSlot] {
        &self.columns
    }

    pub fn items(&self) -> &[ItemSlot] {
        &self.items
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn column(&self, id: &str) -> Option<&ColumnSlot> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&ItemSlot> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Bounding box of all columns.
    pub fn bounds(&self) -> Rect {
        self.columns
            .iter()
            .fold(Rect::NOTHING, |acc, column| acc.union(column.rect))
    }

    /// Card under `pos`, trigger area included.
    pub fn hit_item(&self, pos: Pos2) -> Option<&ItemSlot> {
        self.items.iter().find(|slot| slot.rect.contains(pos))
    }

    /// Item whose menu trigger is under `pos`.
    pub fn hit_trigger(&self, pos: Pos2) -> Option<&str> {
        self.items
            .iter()
            .find(|slot| slot.trigger.contains(pos))
            .map(|slot| slot.id.as_str())
    }

    /// Register every column and card as a drop target, columns first.
    pub fn register(&self, context: &mut BoardContext) {
        for column in &self.columns {
            context.register_column(&column.id, to_kurbo_rect(column.rect));
        }
        for item in &self.items {
            context.register_item(&item.id, to_kurbo_rect(item.rect));
        }
    }
}

/// Convert an egui point to board coordinates.
pub fn to_kurbo_point(pos: Pos2) -> kurbo::Point {
    kurbo::Point::new(pos.x as f64, pos.y as f64)
}

/// Convert an egui rectangle to board coordinates.
pub fn to_kurbo_rect(rect: Rect) -> kurbo::Rect {
    kurbo::Rect::new(
        rect.min.x as f64,
        rect.min.y as f64,
        rect.max.x as f64,
        rect.max.y as f64,
    )
}

/// Convert a board rectangle back to screen coordinates.
pub fn to_egui_rect(rect: kurbo::Rect) -> Rect {
    Rect::from_min_max(
        pos2(rect.x0 as f32, rect.y0 as f32),
        pos2(rect.x1 as f32, rect.y1 as f32),
    )
}
