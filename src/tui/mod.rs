//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides the screening intake form, the result view and a fatal
//! screen shown when the model artifacts cannot be loaded.

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
