//! Configuration file parsing for netwatch
//!
//! Supports `<config_dir>/netwatch/config.toml` (or an explicit path) with
//! the interface, refresh interval and per-state output templates.

pub mod format;
pub mod settings;
pub mod types;

pub use format::TemplateRenderer;
pub use settings::{default_config_path, load_settings, try_load_settings};
pub use types::*;
