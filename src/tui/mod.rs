//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single screen with:
//! - The risk input form and Predict button
//! - The result panel
//! - A live preview of the feature record, assumed columns marked
//! - A collapsible help panel

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
