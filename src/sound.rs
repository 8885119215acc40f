//! Sound settings tab: master on/off switch and per-layer volume sliders.

use serde::Serialize;
use tracing::{info, warn};

use crate::audio::{SoundLayer, VolumeService};
use crate::store::{ConfigStore, ConfigValue, SOUND_ENABLED};
use crate::widget::{Column, SettingsWidget, WidgetKind, WidgetValue};

/// Id of the sound on/off check box.
pub const SOUND_CHECK_ID: &str = "chk_sound";

/// Id prefix of the volume sliders; the layer name follows.
pub const VOLUME_ID_PREFIX: &str = "setting-vol-";

/// Messages produced by the tab's widgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundEvent {
    /// The sound check box was toggled.
    SoundToggled(bool),
    /// A volume slider moved; the value is in percent.
    VolumeChanged(SoundLayer, f64),
}

/// The "Sound" page of the settings dialog.
#[derive(Debug)]
pub struct SoundTab {
    chk_sound: SettingsWidget<SoundEvent>,
    sliders: Vec<(SoundLayer, SettingsWidget<SoundEvent>)>,
    col1: Column,
}

impl SoundTab {
    pub const TITLE: &'static str = "Sound";

    /// Build the tab from the current settings and mixer volumes.
    pub fn new(store: &dyn ConfigStore, audio: &dyn VolumeService) -> Self {
        let mut col1 = Column::new();

        // state of sound when the tab is created
        let sound_enabled = store.get_bool(SOUND_ENABLED);

        let mut chk_sound = SettingsWidget::new(SOUND_CHECK_ID, "Enable sound", WidgetKind::Check);
        chk_sound.set_value(sound_enabled);
        chk_sound.on_change(|value| SoundEvent::SoundToggled(value.truthy()));
        chk_sound.add_to(&mut col1);

        let mut sliders = Vec::with_capacity(SoundLayer::ALL.len());
        for layer in SoundLayer::ALL {
            let mut slider = SettingsWidget::slider(
                format!("{VOLUME_ID_PREFIX}{}", layer.as_str()),
                layer.label(),
                0.0,
                100.0,
            );
            slider.set_value(audio.volume(layer) * 100.0);
            slider.on_change(move |value| {
                SoundEvent::VolumeChanged(layer, value.as_f64().unwrap_or_default())
            });
            slider.add_to(&mut col1);
            sliders.push((layer, slider));
        }

        let mut tab = Self {
            chk_sound,
            sliders,
            col1,
        };
        tab.set_sliders_enabled(sound_enabled);
        tab
    }

    /// Widget ids in display order.
    pub fn column(&self) -> &Column {
        &self.col1
    }

    /// All widgets in display order.
    pub fn widgets(&self) -> impl Iterator<Item = &SettingsWidget<SoundEvent>> {
        std::iter::once(&self.chk_sound).chain(self.sliders.iter().map(|(_, s)| s))
    }

    pub fn widget(&self, id: &str) -> Option<&SettingsWidget<SoundEvent>> {
        self.widgets().find(|w| w.id() == id)
    }

    fn widget_mut(&mut self, id: &str) -> Option<&mut SettingsWidget<SoundEvent>> {
        if self.chk_sound.id() == id {
            return Some(&mut self.chk_sound);
        }
        self.sliders
            .iter_mut()
            .find(|(_, s)| s.id() == id)
            .map(|(_, s)| s)
    }

    pub fn sound_check(&self) -> &SettingsWidget<SoundEvent> {
        &self.chk_sound
    }

    pub fn slider(&self, layer: SoundLayer) -> Option<&SettingsWidget<SoundEvent>> {
        self.sliders
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, s)| s)
    }

    pub fn sound_enabled(&self) -> bool {
        self.chk_sound.value().truthy()
    }

    /// Deliver a user edit to the widget `id` and apply the resulting event.
    ///
    /// Returns the applied event, or `None` when the widget is unknown or
    /// disabled.
    pub fn change(
        &mut self,
        id: &str,
        value: WidgetValue,
        store: &mut dyn ConfigStore,
        audio: &mut dyn VolumeService,
    ) -> Option<SoundEvent> {
        let Some(widget) = self.widget_mut(id) else {
            warn!(id, "change for unknown sound widget");
            return None;
        };
        let event = widget.change(value)?;
        self.apply(event, store, audio);
        Some(event)
    }

    /// Perform the side effects of a widget event.
    pub fn apply(
        &mut self,
        event: SoundEvent,
        store: &mut dyn ConfigStore,
        audio: &mut dyn VolumeService,
    ) {
        match event {
            SoundEvent::SoundToggled(enabled) => {
                store.set(SOUND_ENABLED, ConfigValue::Bool(enabled));
                audio.on_state_changed(store);
                self.set_sliders_enabled(enabled);
                info!(enabled, "sound toggled");
            }
            SoundEvent::VolumeChanged(layer, percent) => {
                audio.set_volume(layer, percent / 100.0);
            }
        }
    }

    fn set_sliders_enabled(&mut self, enabled: bool) {
        for (_, slider) in &mut self.sliders {
            slider.set_enabled(enabled);
        }
    }

    /// Serializable view of the tab's current values.
    pub fn summary(&self) -> SoundSummary {
        SoundSummary {
            enabled: self.sound_enabled(),
            layers: self
                .sliders
                .iter()
                .map(|(layer, slider)| LayerSummary {
                    layer: *layer,
                    label: slider.label().to_string(),
                    volume: slider.value().as_f64().unwrap_or_default().round() as u8,
                    enabled: slider.is_enabled(),
                })
                .collect(),
        }
    }
}

/// Current sound settings as shown by the tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundSummary {
    pub enabled: bool,
    pub layers: Vec<LayerSummary>,
}

/// One volume slider in a [`SoundSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    pub layer: SoundLayer,
    pub label: String,
    /// Volume in percent.
    pub volume: u8,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Mixer;
    use crate::store::SettingsStore;

    #[test]
    fn column_lists_check_box_then_layers() {
        let store = SettingsStore::default();
        let tab = SoundTab::new(&store, &Mixer::default());
        let ids: Vec<&str> = tab.column().ids().iter().map(String::as_str).collect();
        assert_eq!(
            ids,
            vec![
                "chk_sound",
                "setting-vol-master",
                "setting-vol-gui",
                "setting-vol-sfx",
                "setting-vol-creature",
                "setting-vol-ambient",
                "setting-vol-music",
            ]
        );
    }

    #[test]
    fn unknown_widget_is_ignored() {
        let mut store = SettingsStore::default();
        let mut mixer = Mixer::default();
        let mut tab = SoundTab::new(&store, &mixer);
        let event = tab.change("setting-vol-voice", 10.into(), &mut store, &mut mixer);
        assert_eq!(event, None);
    }

    #[test]
    fn summary_reports_percentages() {
        let mut mixer = Mixer::default();
        mixer.set_volume(SoundLayer::Gui, 0.25);
        let tab = SoundTab::new(&SettingsStore::default(), &mixer);
        let summary = tab.summary();
        assert!(summary.enabled);
        assert_eq!(summary.layers.len(), 6);
        assert_eq!(summary.layers[1].layer, SoundLayer::Gui);
        assert_eq!(summary.layers[1].volume, 25);
        assert_eq!(summary.layers[2].label, "Effects");
    }
}
