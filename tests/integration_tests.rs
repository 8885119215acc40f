use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cmd() -> Command {
    cargo_bin_cmd!("soundcheck")
}

fn temp_settings(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "soundcheck-cli-{}-{name}.toml",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

#[test]
fn test_cli_prints_default_settings() {
    let path = temp_settings("defaults");

    cmd()
        .arg("--settings")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled = true"))
        .stdout(predicate::str::contains("[[layers]]"))
        .stdout(predicate::str::contains("label = \"Creatures\""))
        .stdout(predicate::str::contains("volume = 100"));

    // Nothing requested, nothing written
    assert!(!path.exists());
}

#[test]
fn test_cli_json_output() {
    let path = temp_settings("json");

    let output = cmd()
        .arg("--settings")
        .arg(&path)
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["enabled"], true);
    let layers = value["layers"].as_array().unwrap();
    assert_eq!(layers.len(), 6);
    assert_eq!(layers[0]["layer"], "master");
    assert_eq!(layers[5]["layer"], "music");
}

#[test]
fn test_cli_sets_volume_and_saves() {
    let path = temp_settings("save");

    cmd()
        .arg("--settings")
        .arg(&path)
        .args(["--volume", "music=40", "--volume", "GUI=5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote settings to"));

    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(written.contains("\"sound.music.volume\" = 0.4"));
    assert!(written.contains("\"sound.gui.volume\" = 0.05"));
}

#[test]
fn test_cli_dry_run_does_not_write() {
    let path = temp_settings("dry-run");

    cmd()
        .arg("--settings")
        .arg(&path)
        .args(["--volume", "ambient=20", "--dry-run", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"volume\": 20"));

    assert!(!path.exists());
}

#[test]
fn test_cli_volume_ignored_while_sound_is_off() {
    let path = temp_settings("muted");
    std::fs::write(&path, "sound = false\n").unwrap();

    cmd()
        .arg("--settings")
        .arg(&path)
        .args(["--volume", "sfx=10", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring volume for sfx"))
        .stdout(predicate::str::contains("enabled = false"));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_cli_sound_on_applies_before_volumes() {
    let path = temp_settings("unmute");
    std::fs::write(&path, "sound = false\n").unwrap();

    cmd()
        .arg("--settings")
        .arg(&path)
        .args(["--sound", "on", "--volume", "sfx=10", "--dry-run"])
        .args(["--format", "json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring").not())
        .stdout(predicate::str::contains("\"volume\": 10,"));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_cli_sound_off_is_persisted() {
    let path = temp_settings("sound-off");

    cmd()
        .arg("--settings")
        .arg(&path)
        .args(["--sound", "off"])
        .assert()
        .success();

    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(written.contains("sound = false"));
}

#[test]
fn test_cli_invalid_volume_fails() {
    cmd()
        .args(["--volume", "music=150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside 0-100"));

    cmd()
        .args(["--volume", "voice=10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("voice"));
}

#[test]
fn test_cli_completions() {
    cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("soundcheck"));
}

#[test]
fn test_cli_environment_overrides_layer_volume() {
    let path = temp_settings("env");

    let output = cmd()
        .arg("--settings")
        .arg(&path)
        .args(["--format", "json"])
        .env("SOUNDCHECK_SOUND__MUSIC__VOLUME", "0.2")
        .env("SOUNDCHECK_SOUND", "false")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["enabled"], false);
    assert_eq!(value["layers"][5]["layer"], "music");
    assert_eq!(value["layers"][5]["volume"], 20);
}
