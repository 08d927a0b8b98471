//! The application's side of the board callbacks.
//!
//! The board widget only reports what happened; `BoardStore` owns the board
//! and decides what each callback does to it. Callbacks are recorded during
//! the frame and applied afterwards, once the widget no longer borrows the
//! board.

use pipeboard_core::{Board, BoardResult, HostEvent, MoveDescriptor};

/// Owner of the live board.
#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    board: Board,
}

impl BoardStore {
    pub fn new(board: Board) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Apply recorded callbacks in order. Returns true if the board changed.
    ///
    /// A callback that no longer fits the board (for example, a move of an
    /// item that was rejected earlier in the same batch) is logged and skipped.
    pub fn apply(&mut self, events: impl IntoIterator<Item = HostEvent>) -> bool {
        let mut changed = false;
        for event in events {
            match self.apply_one(&event) {
                Ok(Some(board)) => {
                    self.board = board;
                    changed = true;
                }
                Ok(None) => {}
                Err(e) => log::warn!("Ignoring {event:?}: {e}"),
            }
        }
        changed
    }

    fn apply_one(&self, event: &HostEvent) -> BoardResult<Option<Board>> {
        match event {
            HostEvent::DragEnd(descriptor) => {
                log_move(descriptor);
                self.board.with_move(descriptor).map(Some)
            }
            HostEvent::Proceed { item_id, column_id } => {
                let Some(next) = self.board.next_column(column_id) else {
                    log::info!("{item_id} is already in the last stage");
                    return Ok(None);
                };
                let descriptor = MoveDescriptor {
                    source: column_id.as_str().into(),
                    destination: next.id.as_str().into(),
                    draggable_id: item_id.clone(),
                };
                log_move(&descriptor);
                self.board.with_move(&descriptor).map(Some)
            }
            HostEvent::Reject { item_id, column_id } => {
                log::info!("Removing {item_id} from {column_id}");
                self.board.without_item(item_id).map(Some)
            }
        }
    }
}

fn log_move(descriptor: &MoveDescriptor) {
    match serde_json::to_string(descriptor) {
        Ok(json) => log::info!("Applying move {json}"),
        Err(e) => log::warn!("Failed to serialize move: {e}"),
    }
}
