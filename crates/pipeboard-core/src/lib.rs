//! Pipeboard Core Library
//!
//! Headless drag-and-drop logic for a column board: gesture recognition,
//! nearest-center drop resolution, the drag session state machine and the
//! per-item action menu. The board itself belongs to the host; this crate
//! only reads it and reports intents.

pub mod board;
pub mod collision;
pub mod config;
pub mod context;
pub mod input;
pub mod intent;
pub mod menu;
pub mod sensors;
pub mod session;

pub use board::{Board, BoardError, BoardResult, Column, DropTarget, Item};
pub use collision::{DropTargetRegistry, RegisteredTarget, closest_center};
pub use config::SensorConfig;
pub use context::{BoardContext, Interaction};
pub use input::{Direction, KeyEvent, MouseButton, PointerEvent};
pub use intent::{BoardHost, DroppableRef, HostEvent, MoveDescriptor, MoveIntent, RecordingHost};
pub use menu::{DocumentListeners, ItemMenu, MenuAction, MenuManager, MenuState, OutsideClickGuard};
pub use sensors::{DragEvent, KeyboardSensor, PointerSensor, SensorEvent, SensorKind};
pub use session::{AbortReason, DragController, DragOutcome, DragSession, Overlay, Placement};
