pub mod app;
pub mod config;
pub mod error;
pub mod network;
pub mod tray;

pub use error::{AppError, FrameError, NetworkError, StreamError};

pub use app::{DashboardApp, DashboardController};
pub use network::{FrameReceiver, HttpTrayBackend, TrayBackend};
