pub mod controller;
pub mod dashboard;
pub mod notice;
pub mod views;

pub use controller::{Activity, DashboardController, DashboardState};
pub use dashboard::DashboardApp;
pub use notice::{Notice, NoticeKind};
