//! TUI components using tui-realm.

pub mod control;
pub mod help;

pub use control::Control;
pub use help::{SETTINGS_FOOTER_ACTIONS, format_footer, render_help};
