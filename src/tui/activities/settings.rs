//! Settings activity - the sound settings screen.

use std::io::Stdout;
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};
use ratatui::{
    Terminal,
    crossterm::event::{self, Event, KeyCode},
    layout::{Constraint, Direction, Layout},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Tabs},
};
use tuirealm::{Application, EventListenerCfg, PollStrategy, Update};

use crate::sound::SoundTab;
use crate::tui::Model;
use crate::tui::components::{Control, SETTINGS_FOOTER_ACTIONS, format_footer, render_help};
use crate::widget::{WidgetKind, WidgetValue};

// ============================================================================
// Messages (scoped to SettingsActivity)
// ============================================================================

/// All possible messages that can be sent in SettingsActivity.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    // Application control
    Quit,
    ShowHelp,
    HideHelp,

    // Focus/Navigation
    FocusNext,
    FocusPrev,

    /// A control produced a new value for the widget with this id
    ValueChanged(String, WidgetValue),

    // Persistence
    Save,
    Reload,

    /// Remount controls from the model (chained after value changes)
    Sync,
}

// ============================================================================
// User events (required by tui-realm, currently unused)
// ============================================================================

/// Custom user events (currently unused, but required by tui-realm).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {}

// ============================================================================
// Focus management
// ============================================================================

/// Manages focus state for Tab navigation over the visible widget rows.
#[derive(Default)]
pub struct FocusManager {
    ids: Vec<String>,
    current_idx: usize,
}

impl FocusManager {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids, current_idx: 0 }
    }

    /// Get the current focus component ID.
    pub fn current_focus(&self) -> Option<&String> {
        self.ids.get(self.current_idx)
    }

    /// Move focus to next component and return its ID.
    pub fn focus_next(&mut self) -> Option<&String> {
        if !self.ids.is_empty() {
            self.current_idx = (self.current_idx + 1) % self.ids.len();
        }
        self.current_focus()
    }

    /// Move focus to previous component and return its ID.
    pub fn focus_prev(&mut self) -> Option<&String> {
        if !self.ids.is_empty() {
            self.current_idx = (self.current_idx + self.ids.len() - 1) % self.ids.len();
        }
        self.current_focus()
    }
}

// ============================================================================
// SettingsActivity
// ============================================================================

/// The settings dialog activity.
#[derive(Default)]
pub struct SettingsActivity {
    app: Option<Application<String, Msg, UserEvent>>,
    focus: FocusManager,
    model: Option<Model>,
    exit: bool,
}

impl SettingsActivity {
    /// Create and configure the tui-realm application.
    fn create_application() -> Application<String, Msg, UserEvent> {
        Application::init(
            EventListenerCfg::default()
                .crossterm_input_listener(Duration::from_millis(20), 10)
                .poll_timeout(Duration::from_millis(50)),
        )
    }

    /// Mount one control per visible widget.
    fn mount_controls(app: &mut Application<String, Msg, UserEvent>, model: &Model) -> Result<()> {
        for view in model.visible_widgets() {
            let id = view.id.clone();
            app.mount(id, Box::new(Control::new(view)), vec![])?;
        }
        Ok(())
    }

    /// Remount all controls with current model values and restore focus.
    fn sync_controls(
        app: &mut Application<String, Msg, UserEvent>,
        model: &Model,
        focus: &FocusManager,
    ) {
        for view in model.visible_widgets() {
            let id = view.id.clone();
            let _ = app.umount(&id);
            let _ = app.mount(id, Box::new(Control::new(view)), vec![]);
        }
        if let Some(id) = focus.current_focus() {
            let _ = app.active(id);
        }
    }

    pub fn on_create(&mut self, model: Model) {
        let mut app = Self::create_application();

        if let Err(e) = Self::mount_controls(&mut app, &model) {
            tracing::error!("Failed to mount controls: {}", e);
        }

        let ids: Vec<String> = model.visible_widgets().into_iter().map(|v| v.id).collect();
        self.focus = FocusManager::new(ids);
        if let Some(id) = self.focus.current_focus() {
            let _ = app.active(id);
        }

        self.app = Some(app);
        self.model = Some(model);
    }

    /// Draw the UI and handle one tick of events.
    pub fn on_draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let (Some(app), Some(model)) = (self.app.as_mut(), self.model.as_mut()) else {
            return Err(eyre!("settings activity drawn before creation"));
        };

        let rows_in_view: Vec<(String, WidgetKind)> = model
            .visible_widgets()
            .into_iter()
            .map(|v| (v.id, v.kind))
            .collect();

        terminal.draw(|frame| {
            let area = frame.area();

            let main_rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Title
                    Constraint::Length(1), // Tabs
                    Constraint::Min(3),    // Content
                    Constraint::Length(1), // Status
                ])
                .split(area);

            // Title bar
            let dirty = if model.dirty { " [modified]" } else { "" };
            let title = format!(" Settings - {}{dirty} ", model.settings_path.display());
            let title_widget =
                Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD));
            frame.render_widget(title_widget, main_rows[0]);

            let tabs = Tabs::new(vec![SoundTab::TITLE])
                .select(0)
                .highlight_style(Style::default().fg(Color::Cyan));
            frame.render_widget(tabs, main_rows[1]);

            let block = Block::default()
                .title(format!(" {} ", SoundTab::TITLE))
                .borders(Borders::ALL);
            let inner = block.inner(main_rows[2]);
            frame.render_widget(block, main_rows[2]);

            // One line per control, with a spacer after the check boxes
            let mut constraints = Vec::with_capacity(rows_in_view.len() * 2);
            for (i, (_, kind)) in rows_in_view.iter().enumerate() {
                constraints.push(Constraint::Length(1));
                let next_is_check = rows_in_view
                    .get(i + 1)
                    .is_some_and(|(_, k)| *k == WidgetKind::Check);
                if *kind == WidgetKind::Check && !next_is_check {
                    constraints.push(Constraint::Length(1));
                }
            }
            constraints.push(Constraint::Min(0));
            let slots = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(inner);

            let mut slot = 0;
            for (i, (id, kind)) in rows_in_view.iter().enumerate() {
                app.view(id, frame, slots[slot]);
                slot += 1;
                let next_is_check = rows_in_view
                    .get(i + 1)
                    .is_some_and(|(_, k)| *k == WidgetKind::Check);
                if *kind == WidgetKind::Check && !next_is_check {
                    slot += 1;
                }
            }

            // Status bar
            let status = model.message.clone().unwrap_or_else(|| {
                format_footer(SETTINGS_FOOTER_ACTIONS, &[("adjust", "[]/{}")])
            });
            let status_widget =
                Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
            frame.render_widget(status_widget, main_rows[3]);

            // Help modal overlay
            if model.show_help {
                let kinds: Vec<WidgetKind> =
                    rows_in_view.iter().map(|(_, kind)| *kind).collect();
                render_help(frame, &kinds);
            }
        })?;

        // Handle help modal events separately (intercepts all input when visible)
        if model.show_help {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                        model.update(Some(Msg::HideHelp));
                    }
                    _ => {}
                }
            }
            return Ok(());
        }

        // Timeout is fine, just continue
        let Ok(messages) = app.tick(PollStrategy::Once) else {
            return Ok(());
        };

        let mut needs_sync = false;
        for msg in messages {
            // Handle focus changes at activity level
            match &msg {
                Msg::FocusNext => {
                    if let Some(next) = self.focus.focus_next() {
                        let _ = app.active(next);
                    }
                }
                Msg::FocusPrev => {
                    if let Some(prev) = self.focus.focus_prev() {
                        let _ = app.active(prev);
                    }
                }
                Msg::Quit => {
                    self.exit = true;
                    return Ok(());
                }
                _ => {}
            }

            // A control may show a value the model rejected
            if matches!(msg, Msg::ValueChanged(..)) {
                needs_sync = true;
            }

            // Process through model, handle chained messages
            let mut current = Some(msg);
            while let Some(m) = current {
                if matches!(m, Msg::Sync) {
                    needs_sync = true;
                }
                current = model.update(Some(m));
            }
        }

        if needs_sync {
            Self::sync_controls(app, model, &self.focus);
        }

        Ok(())
    }

    /// Whether the activity wants to exit.
    pub fn will_umount(&self) -> bool {
        self.exit
    }

    /// Clean up and return the model.
    pub fn on_destroy(&mut self) -> Option<Model> {
        self.app = None;
        self.model.take()
    }
}
