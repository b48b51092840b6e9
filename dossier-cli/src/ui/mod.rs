// Terminal UI module using ratatui

mod app;
mod dashboard;
mod widgets;

pub use app::{Action, App};
pub use dashboard::Dashboard;
