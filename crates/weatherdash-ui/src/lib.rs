//! Terminal front end for weatherdash: the dashboard controller, the service
//! tasks it spawns, and the panel renderer.

pub mod clock;
pub mod commands;
pub mod models;
pub mod render;
pub mod services;

pub use clock::{Clock, FixedClock, LocalClock};
pub use commands::Command;
pub use models::{DashboardController, DashboardView};
pub use render::TerminalView;
pub use services::{DashboardServiceMessage, DashboardServices};
