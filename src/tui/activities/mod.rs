//! Activity modules for the TUI.

pub mod settings;

pub use settings::{Msg, SettingsActivity, UserEvent};
