//! Move intents and the host callback contract.
//!
//! The core never applies a move. It packages the resolved move and hands it
//! to the host, which decides what to do and supplies a new board next render.

use serde::{Deserialize, Serialize};

/// A resolved cross-column move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub item_id: String,
    pub from_column: String,
    pub to_column: String,
}

impl MoveIntent {
    pub fn new(
        item_id: impl Into<String>,
        from_column: impl Into<String>,
        to_column: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            from_column: from_column.into(),
            to_column: to_column.into(),
        }
    }
}

/// One end of a move, as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppableRef {
    pub droppable_id: String,
}

impl From<&str> for DroppableRef {
    fn from(id: &str) -> Self {
        Self {
            droppable_id: id.to_string(),
        }
    }
}

/// Host-facing description of a completed drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDescriptor {
    pub source: DroppableRef,
    pub destination: DroppableRef,
    pub draggable_id: String,
}

impl From<MoveIntent> for MoveDescriptor {
    fn from(intent: MoveIntent) -> Self {
        Self {
            source: DroppableRef {
                droppable_id: intent.from_column,
            },
            destination: DroppableRef {
                droppable_id: intent.to_column,
            },
            draggable_id: intent.item_id,
        }
    }
}

/// Callbacks a host application provides to the board.
///
/// All callbacks are notifications. They run synchronously inside the input
/// handler that produced them, against the board that was current when the
/// gesture ended.
pub trait BoardHost {
    /// An item was dropped into a different column.
    fn on_drag_end(&mut self, descriptor: MoveDescriptor);

    /// "Proceed" was chosen from an item's action menu.
    fn on_proceed(&mut self, item_id: &str, column_id: &str);

    /// "Reject" was chosen from an item's action menu.
    fn on_reject(&mut self, item_id: &str, column_id: &str);
}

/// Hand a move intent to the host. Called exactly once per cross-column drop.
pub fn emit_move(host: &mut dyn BoardHost, intent: MoveIntent) {
    log::info!(
        "Moving {} from {} to {}",
        intent.item_id,
        intent.from_column,
        intent.to_column
    );
    host.on_drag_end(intent.into());
}

/// A host callback, captured for later handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    DragEnd(MoveDescriptor),
    Proceed { item_id: String, column_id: String },
    Reject { item_id: String, column_id: String },
}

/// Host that records callbacks instead of acting on them.
///
/// Useful for tests and for hosts that apply intents after the frame, once
/// the board is no longer borrowed by the renderer.
#[derive(Debug, Default)]
pub struct RecordingHost {
    events: Vec<HostEvent>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Take all recorded events, leaving the host empty.
    pub fn drain(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recorded move descriptors only.
    pub fn moves(&self) -> Vec<&MoveDescriptor> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::DragEnd(d) => Some(d),
                _ => None,
            })
            .collect()
    }
}

impl BoardHost for RecordingHost {
    fn on_drag_end(&mut self, descriptor: MoveDescriptor) {
        self.events.push(HostEvent::DragEnd(descriptor));
    }

    fn on_proceed(&mut self, item_id: &str, column_id: &str) {
        self.events.push(HostEvent::Proceed {
            item_id: item_id.to_string(),
            column_id: column_id.to_string(),
        });
    }

    fn on_reject(&mut self, item_id: &str, column_id: &str) {
        self.events.push(HostEvent::Reject {
            item_id: item_id.to_string(),
            column_id: column_id.to_string(),
        });
    }
}
