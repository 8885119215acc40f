//! Interactive settings dialog.
//!
//! Architecture: one tui-realm activity. Every widget of the settings tab is
//! mounted as its own `Control` component; the model owns the tab together
//! with the settings store and the mixer.

mod activities;
mod components;
mod model;

use std::io::stdout;
use std::sync::LazyLock;

use color_eyre::eyre::{Result, WrapErr};
use crossterm_actions::{
    ActionBinding, ActionConfig, AppEvent, EditingMode, TuiEvent, TuiRealmDispatcher,
    defaults, keys,
};
use ratatui::{
    Terminal,
    crossterm::ExecutableCommand,
    crossterm::terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    },
    prelude::CrosstermBackend,
};

use crate::cli::Cli;

pub use model::Model;

use activities::{Msg, SettingsActivity};

// ============================================================================
// Event handling (shared across components)
// ============================================================================

/// Unified application events - wraps TuiEvent + custom actions.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum AppAction {
    /// Standard TUI events (navigation, input, selection, app)
    Tui(TuiEvent),
    /// Toggle a check box
    Toggle,
    /// Write settings to disk
    Save,
    /// Increment value by small step (1)
    ValueIncrementSmall,
    /// Decrement value by small step (1)
    ValueDecrementSmall,
    /// Increment value by large step (10)
    ValueIncrementLarge,
    /// Decrement value by large step (10)
    ValueDecrementLarge,
}

/// Global dispatcher instance - shared by all components.
pub static DISPATCHER: LazyLock<TuiRealmDispatcher<AppAction>> = LazyLock::new(|| {
    let mut config = ActionConfig::new(EditingMode::Emacs);

    // Import all standard TuiEvent bindings wrapped in AppAction::Tui
    for binding in defaults::emacs_defaults().bindings() {
        config.bind(ActionBinding {
            action: AppAction::Tui(binding.action),
            keys: binding.keys.clone(),
            description: binding.description.clone(),
        });
    }

    config.bind(
        ActionBinding::builder().action(AppAction::Toggle)
            .key(keys::char(' '))
            .description("Toggle setting")
            .build(),
    );
    config.bind(
        ActionBinding::builder().action(AppAction::Save)
            .key(keys::char('s'))
            .description("Save settings")
            .build(),
    );

    // Value adjustment bindings: [/] for small steps, {/} for large steps
    config.bind(
        ActionBinding::builder().action(AppAction::ValueDecrementSmall)
            .key(keys::char('['))
            .description("Decrease value")
            .build(),
    );
    config.bind(
        ActionBinding::builder().action(AppAction::ValueIncrementSmall)
            .key(keys::char(']'))
            .description("Increase value")
            .build(),
    );
    config.bind(
        ActionBinding::builder().action(AppAction::ValueDecrementLarge)
            .key(keys::char('{'))
            .description("Decrease value (10x)")
            .build(),
    );
    config.bind(
        ActionBinding::builder().action(AppAction::ValueIncrementLarge)
            .key(keys::char('}'))
            .description("Increase value (10x)")
            .build(),
    );

    config.compile();
    TuiRealmDispatcher::new(config)
});

/// Convenience function for components to access the dispatcher.
pub fn dispatcher() -> &'static TuiRealmDispatcher<AppAction> {
    &DISPATCHER
}

/// Handle global application events that are common across all components.
/// Returns Some(Msg) if the action was handled, None otherwise.
pub fn handle_global_app_events(action: &AppAction) -> Option<Msg> {
    match action {
        AppAction::Tui(TuiEvent::App(AppEvent::Quit)) => Some(Msg::Quit),
        AppAction::Tui(TuiEvent::App(AppEvent::Help)) => Some(Msg::ShowHelp),
        AppAction::Tui(TuiEvent::App(AppEvent::Refresh)) => Some(Msg::Reload),
        AppAction::Save => Some(Msg::Save),
        _ => None,
    }
}

// ============================================================================
// TUI entry point
// ============================================================================

/// Run the interactive settings dialog.
///
/// Settings are saved when the dialog closes.
pub fn run(cli: &Cli) -> Result<()> {
    let model = Model::load(&cli.settings, cli.debug_settings)?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut activity = SettingsActivity::default();
    activity.on_create(model);

    let result = loop {
        if let Err(e) = activity.on_draw(&mut terminal) {
            break Err(e);
        }
        if activity.will_umount() {
            break Ok(());
        }
    };
    let model = activity.on_destroy();

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result?;

    if let Some(mut model) = model
        && model.dirty
    {
        model.save().wrap_err("Failed to save settings on exit")?;
        eprintln!("Wrote settings to {}", model.settings_path.display());
    }

    Ok(())
}
