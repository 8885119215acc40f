use std::path::PathBuf;

use soundcheck::audio::{Mixer, SoundLayer, VolumeService};
use soundcheck::store::{ConfigStore, ConfigValue, SOUND_ENABLED, SettingsStore};

fn temp_settings(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("soundcheck-{}-{name}.toml", std::process::id()))
}

#[test]
fn test_missing_file_yields_defaults() {
    let path = temp_settings("missing");
    let _ = std::fs::remove_file(&path);

    let store = SettingsStore::load(&path).unwrap();
    assert_eq!(store, SettingsStore::default());
}

#[test]
fn test_parse_toml() {
    let path = temp_settings("parse");
    std::fs::write(
        &path,
        r#"
sound = false
"sound.music.volume" = 0.4
"#,
    )
    .unwrap();

    let store = SettingsStore::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(!store.get_bool(SOUND_ENABLED));
    assert_eq!(store.get_float("sound.music.volume"), Some(0.4));
    // Untouched keys keep their defaults
    assert_eq!(store.get_float("sound.gui.volume"), Some(1.0));

    let mixer = Mixer::from_store(&store);
    assert!(mixer.is_muted());
    assert_eq!(mixer.volume(SoundLayer::Music), 0.4);
}

#[test]
fn test_save_and_reload() {
    let path = temp_settings("roundtrip");

    let mut store = SettingsStore::default();
    let mut mixer = Mixer::from_store(&store);
    mixer.set_volume(SoundLayer::Creature, 0.3);
    mixer.persist(&mut store);
    store.set(SOUND_ENABLED, ConfigValue::Bool(false));
    store.save(&path).unwrap();

    let loaded = SettingsStore::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, store);
    assert_eq!(loaded.get_float("sound.creature.volume"), Some(0.3));
}

#[test]
fn test_malformed_file_is_an_error() {
    let path = temp_settings("malformed");
    std::fs::write(&path, "sound = [unclosed").unwrap();

    let result = SettingsStore::load(&path);
    std::fs::remove_file(&path).unwrap();

    let err = result.unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_environment_overrides_every_key() {
    let path = temp_settings("env");
    std::fs::write(&path, "\"sound.music.volume\" = 0.9\n").unwrap();

    let store: SettingsStore = SettingsStore::layered(
        &path,
        [
            ("SOUND".to_string(), "false".to_string()),
            ("SOUND__MUSIC__VOLUME".to_string(), "0.2".to_string()),
            ("DEBUG__SETTINGS".to_string(), "true".to_string()),
        ],
    )
    .extract()
    .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(!store.get_bool(SOUND_ENABLED));
    assert!(store.get_bool("debug.settings"));
    assert_eq!(store.get_float("sound.music.volume"), Some(0.2));
    assert_eq!(store.get_float("sound.gui.volume"), Some(1.0));
    assert!(store.get("sound_music_volume").is_none());
}
