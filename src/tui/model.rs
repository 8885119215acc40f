//! Application model for the settings dialog.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use tuirealm::Update;

use crate::audio::Mixer;
use crate::sound::{SoundEvent, SoundTab};
use crate::store::{ConfigStore, DEBUG_SETTINGS, SettingsStore};
use crate::widget::{self, WidgetView};

use super::activities::Msg;

/// Application model containing all state.
pub struct Model {
    // Collaborators the tab reads and writes
    pub store: SettingsStore,
    pub mixer: Mixer,

    pub tab: SoundTab,

    pub settings_path: PathBuf,
    /// Show experimental widgets
    pub show_experimental: bool,

    // UI state
    pub quit: bool,
    pub show_help: bool,
    pub dirty: bool,
    pub message: Option<String>,
}

impl Model {
    /// Load settings from `path` and build the tab.
    pub fn load(path: &Path, debug_settings: bool) -> Result<Self> {
        let store = SettingsStore::load(path)
            .wrap_err_with(|| format!("Failed to load settings from {}", path.display()))?;
        Ok(Self::new(store, path.to_path_buf(), debug_settings))
    }

    pub fn new(store: SettingsStore, settings_path: PathBuf, debug_settings: bool) -> Self {
        let mixer = Mixer::from_store(&store);
        let tab = SoundTab::new(&store, &mixer);
        let show_experimental = debug_settings || store.get_bool(DEBUG_SETTINGS);

        Self {
            store,
            mixer,
            tab,
            settings_path,
            show_experimental,
            quit: false,
            show_help: false,
            dirty: false,
            message: None,
        }
    }

    /// Widgets to display, in column order.
    pub fn visible_widgets(&self) -> Vec<WidgetView> {
        widget::visible(self.tab.widgets(), self.show_experimental)
            .map(|w| w.view())
            .collect()
    }

    /// Persist mixer volumes and write the settings file.
    pub fn save(&mut self) -> Result<()> {
        self.mixer.persist(&mut self.store);
        self.store
            .save(&self.settings_path)
            .wrap_err_with(|| format!("Failed to write to {}", self.settings_path.display()))?;
        self.dirty = false;
        self.message = Some(format!("Saved to {}", self.settings_path.display()));
        Ok(())
    }

    /// Discard unsaved changes and re-read the settings file.
    pub fn reload(&mut self) -> Result<()> {
        let store = SettingsStore::load(&self.settings_path).wrap_err_with(|| {
            format!(
                "Failed to load settings from {}",
                self.settings_path.display()
            )
        })?;
        self.mixer = Mixer::from_store(&store);
        self.tab = SoundTab::new(&store, &self.mixer);
        self.store = store;
        self.dirty = false;
        self.message = Some(format!("Reloaded {}", self.settings_path.display()));
        Ok(())
    }
}

fn describe(event: SoundEvent) -> String {
    match event {
        SoundEvent::SoundToggled(true) => "Sound enabled".to_string(),
        SoundEvent::SoundToggled(false) => "Sound disabled".to_string(),
        SoundEvent::VolumeChanged(layer, percent) => {
            format!("{} volume {percent:.0}%", layer.label())
        }
    }
}

impl Update<Msg> for Model {
    fn update(&mut self, msg: Option<Msg>) -> Option<Msg> {
        let msg = msg?;

        match msg {
            Msg::Quit => {
                self.quit = true;
                None
            }
            Msg::ShowHelp => {
                self.show_help = true;
                None
            }
            Msg::HideHelp => {
                self.show_help = false;
                None
            }

            Msg::ValueChanged(id, value) => {
                let event = self
                    .tab
                    .change(&id, value, &mut self.store, &mut self.mixer)?;
                self.dirty = true;
                self.message = Some(describe(event));
                Some(Msg::Sync)
            }

            Msg::Save => {
                if let Err(e) = self.save() {
                    self.message = Some(format!("Save failed: {e}"));
                }
                None
            }
            Msg::Reload => match self.reload() {
                Ok(()) => Some(Msg::Sync),
                Err(e) => {
                    self.message = Some(format!("Reload failed: {e}"));
                    None
                }
            },

            // Handled by the activity
            Msg::FocusNext | Msg::FocusPrev | Msg::Sync => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::audio::{SoundLayer, VolumeService};
    use crate::widget::WidgetValue;

    fn model() -> Model {
        Model::new(
            SettingsStore::default(),
            PathBuf::from("unused.toml"),
            false,
        )
    }

    #[test]
    fn value_change_updates_mixer_and_requests_sync() {
        let mut model = model();
        let next = model.update(Some(Msg::ValueChanged(
            "setting-vol-music".to_string(),
            WidgetValue::Number(30.0),
        )));
        assert_eq!(next, Some(Msg::Sync));
        assert!(model.dirty);
        assert_eq!(model.mixer.volume(SoundLayer::Music), 0.3);
        assert_eq!(model.message.as_deref(), Some("Music volume 30%"));
    }

    #[test]
    fn toggling_sound_off_disables_sliders_in_view() {
        let mut model = model();
        model.update(Some(Msg::ValueChanged(
            "chk_sound".to_string(),
            WidgetValue::Bool(false),
        )));
        let views = model.visible_widgets();
        assert_eq!(views.len(), 7);
        assert!(views[0].enabled);
        assert!(views[1..].iter().all(|v| !v.enabled));
        assert!(model.mixer.is_muted());
    }

    #[test]
    fn change_on_disabled_slider_is_dropped() {
        let mut store = SettingsStore::default();
        store.set(crate::store::SOUND_ENABLED, false.into());
        let mut model = Model::new(store, PathBuf::from("unused.toml"), false);
        let next = model.update(Some(Msg::ValueChanged(
            "setting-vol-gui".to_string(),
            WidgetValue::Number(10.0),
        )));
        assert_eq!(next, None);
        assert!(!model.dirty);
        assert_eq!(model.mixer.volume(SoundLayer::Gui), 1.0);
    }

    #[test]
    fn experimental_widgets_follow_debug_settings() {
        assert!(!model().show_experimental);

        let mut store = SettingsStore::default();
        store.set(DEBUG_SETTINGS, true.into());
        let from_store = Model::new(store, PathBuf::from("unused.toml"), false);
        assert!(from_store.show_experimental);

        let cli = crate::cli::Cli::try_parse_from(["soundcheck", "--debug-settings"]).unwrap();
        let from_flag = Model::new(
            SettingsStore::default(),
            PathBuf::from("unused.toml"),
            cli.debug_settings,
        );
        assert!(from_flag.show_experimental);
        assert_eq!(from_flag.visible_widgets().len(), 7);
    }

    #[test]
    fn quit_sets_flag() {
        let mut model = model();
        assert_eq!(model.update(Some(Msg::Quit)), None);
        assert!(model.quit);
    }
}
