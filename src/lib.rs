//! Sound settings for a game client.
//!
//! - [`widget`]: generic settings controls (check box, inputs, slider, select)
//! - [`sound`]: the sound tab wiring widgets to the settings store and mixer
//! - [`store`] and [`audio`]: the collaborators the tab reads and writes
//! - [`tui`]: the interactive settings dialog

pub mod audio;
pub mod cli;
pub mod logging;
pub mod sound;
pub mod store;
pub mod tui;
pub mod widget;
