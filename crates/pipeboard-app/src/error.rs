//! Application errors.

use pipeboard_core::BoardError;
use thiserror::Error;

/// Errors that stop the application from starting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Surface supports no texture format")]
    NoSurfaceFormat,

    #[error("Failed to load board: {0}")]
    Board(#[from] BoardError),
}

pub type AppResult<T> = Result<T, AppError>;
