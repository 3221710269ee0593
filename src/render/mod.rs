//! Shared rendering infrastructure for CLI and TUI output.

pub mod cli;
pub mod colors;

pub use cli::{render_organizations, render_shades, render_theme};
pub use colors::ThemeColor;
