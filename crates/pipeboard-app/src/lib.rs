//! Pipeboard Application
//!
//! Desktop shell hosting a single board: windowing, GPU setup, and a host
//! that applies the board's move and menu callbacks.

mod app;
mod config;
mod error;
mod host;

pub use app::App;
pub use config::{AppConfig, demo_board};
pub use error::{AppError, AppResult};
pub use host::BoardStore;
