//! TUI Widgets

pub mod results;
pub mod upload;

pub use results::render_results;
pub use upload::{render_mode_selector, render_panel};
