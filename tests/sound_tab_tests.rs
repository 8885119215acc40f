use approx::assert_relative_eq;
use soundcheck::audio::{Mixer, SoundLayer, VolumeService};
use soundcheck::sound::{SOUND_CHECK_ID, SoundEvent, SoundTab};
use soundcheck::store::{ConfigStore, ConfigValue, SOUND_ENABLED, SettingsStore};
use soundcheck::widget::WidgetValue;

/// Volume service that records every call.
#[derive(Default)]
struct RecordingAudio {
    volumes: [f64; 6],
    set_calls: Vec<(SoundLayer, f64)>,
    state_changes: Vec<bool>,
}

impl RecordingAudio {
    fn with_volumes(volumes: [f64; 6]) -> Self {
        Self {
            volumes,
            ..Default::default()
        }
    }
}

impl VolumeService for RecordingAudio {
    fn volume(&self, layer: SoundLayer) -> f64 {
        let idx = SoundLayer::ALL.iter().position(|l| *l == layer).unwrap();
        self.volumes[idx]
    }

    fn set_volume(&mut self, layer: SoundLayer, fraction: f64) {
        let idx = SoundLayer::ALL.iter().position(|l| *l == layer).unwrap();
        self.volumes[idx] = fraction;
        self.set_calls.push((layer, fraction));
    }

    fn on_state_changed(&mut self, store: &dyn ConfigStore) {
        self.state_changes.push(store.get_bool(SOUND_ENABLED));
    }
}

fn slider_id(layer: SoundLayer) -> String {
    format!("setting-vol-{}", layer.as_str())
}

#[test]
fn test_initial_slider_values_follow_audio_service() {
    let store = SettingsStore::default();
    let audio = RecordingAudio::with_volumes([1.0, 0.5, 0.333, 0.0, 0.756, 0.25]);
    let tab = SoundTab::new(&store, &audio);

    let expected = [100.0, 50.0, 33.0, 0.0, 76.0, 25.0];
    let layers: Vec<SoundLayer> = tab.summary().layers.iter().map(|l| l.layer).collect();
    assert_eq!(layers, SoundLayer::ALL.to_vec());

    for (layer, want) in SoundLayer::ALL.into_iter().zip(expected) {
        let slider = tab.slider(layer).unwrap();
        assert_eq!(slider.value(), WidgetValue::Number(want), "{layer}");
    }
}

#[test]
fn test_slider_labels_in_fixed_order() {
    let tab = SoundTab::new(&SettingsStore::default(), &Mixer::default());
    let labels: Vec<&str> = tab.widgets().skip(1).map(|w| w.label()).collect();
    assert_eq!(
        labels,
        vec!["Master", "GUI", "Effects", "Creatures", "Ambient", "Music"]
    );
}

#[test]
fn test_slider_change_sets_volume_exactly_once() {
    let mut store = SettingsStore::default();
    let mut audio = RecordingAudio::with_volumes([1.0; 6]);
    let mut tab = SoundTab::new(&store, &audio);

    let event = tab.change(
        &slider_id(SoundLayer::Ambient),
        WidgetValue::Number(40.0),
        &mut store,
        &mut audio,
    );

    assert_eq!(
        event,
        Some(SoundEvent::VolumeChanged(SoundLayer::Ambient, 40.0))
    );
    assert_eq!(audio.set_calls.len(), 1);
    assert_eq!(audio.set_calls[0].0, SoundLayer::Ambient);
    assert_relative_eq!(audio.set_calls[0].1, 0.4);
}

#[test]
fn test_unchecking_sound_disables_all_sliders() {
    let mut store = SettingsStore::default();
    let mut audio = RecordingAudio::with_volumes([1.0; 6]);
    let mut tab = SoundTab::new(&store, &audio);
    assert!(tab.widgets().all(|w| w.is_enabled()));

    tab.change(SOUND_CHECK_ID, WidgetValue::Bool(false), &mut store, &mut audio);

    assert!(!store.get_bool(SOUND_ENABLED));
    assert_eq!(audio.state_changes, vec![false]);
    assert!(tab.sound_check().is_enabled());
    for layer in SoundLayer::ALL {
        assert!(!tab.slider(layer).unwrap().is_enabled(), "{layer}");
    }

    tab.change(SOUND_CHECK_ID, WidgetValue::Bool(true), &mut store, &mut audio);

    assert!(store.get_bool(SOUND_ENABLED));
    assert_eq!(audio.state_changes, vec![false, true]);
    assert!(tab.widgets().all(|w| w.is_enabled()));
    assert!(audio.set_calls.is_empty());
}

#[test]
fn test_sliders_start_disabled_when_sound_is_off() {
    let mut store = SettingsStore::default();
    store.set(SOUND_ENABLED, ConfigValue::Bool(false));
    let mut audio = RecordingAudio::with_volumes([0.5; 6]);
    let mut tab = SoundTab::new(&store, &audio);

    assert_eq!(tab.sound_check().value(), WidgetValue::Bool(false));
    assert!(tab.widgets().skip(1).all(|w| !w.is_enabled()));

    let event = tab.change(
        &slider_id(SoundLayer::Music),
        WidgetValue::Number(10.0),
        &mut store,
        &mut audio,
    );
    assert_eq!(event, None);
    assert!(audio.set_calls.is_empty());
}

#[test]
fn test_mixer_mutes_through_tab() {
    let mut store = SettingsStore::default();
    let mut mixer = Mixer::default();
    let mut tab = SoundTab::new(&store, &mixer);

    tab.change(
        &slider_id(SoundLayer::Master),
        WidgetValue::Number(50.0),
        &mut store,
        &mut mixer,
    );
    assert_relative_eq!(mixer.effective_volume(SoundLayer::Music), 0.5);

    tab.change(SOUND_CHECK_ID, WidgetValue::Bool(false), &mut store, &mut mixer);
    assert!(mixer.is_muted());
    assert_relative_eq!(mixer.effective_volume(SoundLayer::Music), 0.0);
}
