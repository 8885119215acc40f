//! CLI argument parsing and command handling.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::audio::{SoundLayer, VolumeService};
use crate::sound::{SOUND_CHECK_ID, SoundTab, VOLUME_ID_PREFIX};
use crate::store::ConfigStore;
use crate::widget::WidgetValue;

/// Summary output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// TOML (default)
    #[default]
    Toml,
    /// JSON
    Json,
}

/// On/off switch argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

/// A `LAYER=PERCENT` volume assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeArg {
    pub layer: SoundLayer,
    pub percent: f64,
}

/// Parse `LAYER=PERCENT`, e.g. `music=40`.
pub fn parse_volume(s: &str) -> Result<VolumeArg, String> {
    let (layer, percent) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LAYER=PERCENT, got '{s}'"))?;
    let layer: SoundLayer = layer.parse().map_err(|e| format!("{e}"))?;
    let percent: f64 = percent
        .trim()
        .parse()
        .map_err(|_| format!("invalid volume '{}'", percent.trim()))?;
    if !(0.0..=100.0).contains(&percent) {
        return Err(format!("volume {percent} is outside 0-100"));
    }
    Ok(VolumeArg { layer, percent })
}

/// Sound settings for the game client, with an interactive settings dialog.
#[derive(Parser, Debug)]
#[command(name = "soundcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (TOML). A missing file means default settings.
    #[arg(long, value_name = "FILE", default_value = "soundcheck.toml")]
    pub settings: PathBuf,

    /// Launch the interactive settings dialog
    #[arg(short, long)]
    pub interactive: bool,

    /// Turn sound on or off
    #[arg(long, value_enum)]
    pub sound: Option<Toggle>,

    /// Set a layer volume in percent (repeatable), e.g. --volume music=40
    #[arg(long = "volume", value_name = "LAYER=PERCENT", value_parser = parse_volume)]
    pub volumes: Vec<VolumeArg>,

    /// Show experimental settings in the interactive dialog
    #[arg(long)]
    pub debug_settings: bool,

    /// Output format for the printed settings
    #[arg(long, value_enum, default_value_t = OutputFormat::Toml)]
    pub format: OutputFormat,

    /// Apply changes and print the result without saving
    #[arg(long)]
    pub dry_run: bool,

    /// Log file path (default: soundcheck.log)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error (default: info)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Generate shell completions for the specified shell
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}

impl Cli {
    /// Whether any setting change was requested.
    pub fn has_changes(&self) -> bool {
        self.sound.is_some() || !self.volumes.is_empty()
    }

    /// Apply the requested changes through the tab's widgets.
    ///
    /// Turning sound on happens before volume changes and turning it off
    /// after them, so `--sound on --volume music=40` works on a muted client.
    /// Returns a warning for every change the tab rejected.
    pub fn apply_to(
        &self,
        tab: &mut SoundTab,
        store: &mut dyn ConfigStore,
        audio: &mut dyn VolumeService,
    ) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.sound == Some(Toggle::On) {
            tab.change(SOUND_CHECK_ID, WidgetValue::Bool(true), store, audio);
        }

        for volume in &self.volumes {
            let id = format!("{VOLUME_ID_PREFIX}{}", volume.layer.as_str());
            let applied = tab.change(&id, WidgetValue::Number(volume.percent), store, audio);
            if applied.is_none() {
                warnings.push(format!(
                    "Ignoring volume for {}: sound is disabled (use --sound on)",
                    volume.layer
                ));
            }
        }

        if self.sound == Some(Toggle::Off) {
            tab.change(SOUND_CHECK_ID, WidgetValue::Bool(false), store, audio);
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_volume_assignment() {
        let arg = parse_volume("music=40").unwrap();
        assert_eq!(arg.layer, SoundLayer::Music);
        assert_eq!(arg.percent, 40.0);
    }

    #[test]
    fn rejects_malformed_volume() {
        assert!(parse_volume("music").is_err());
        assert!(parse_volume("voice=10").is_err());
        assert!(parse_volume("music=loud").is_err());
        assert!(parse_volume("music=101").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
