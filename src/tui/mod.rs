//! Interactive branding preview.

mod app;
mod input;

pub use app::run_tui;
