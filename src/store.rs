//! Key/value settings store with layered loading.
//!
//! Settings are a flat map from dotted keys to scalar values:
//!
//! ```toml
//! sound = true
//! "debug.settings" = false
//! "sound.master.volume" = 0.8
//! ```
//!
//! Loading merges built-in defaults, the settings file and `SOUNDCHECK_*`
//! environment variables, in that order. A double underscore in a variable
//! name stands for a dot: `SOUNDCHECK_SOUND__MUSIC__VOLUME=0.4` overrides
//! `sound.music.volume`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::audio::SoundLayer;

/// Global sound on/off flag.
pub const SOUND_ENABLED: &str = "sound";

/// Shows experimental settings widgets.
pub const DEBUG_SETTINGS: &str = "debug.settings";

/// Prefix for environment overrides, e.g. `SOUNDCHECK_SOUND=false`.
pub const ENV_PREFIX: &str = "SOUNDCHECK_";

/// Stands for `.` in environment variable names.
const ENV_KEY_SEPARATOR: &str = "__";

/// Read/write access to client configuration.
pub trait ConfigStore {
    /// Boolean value of `key`; missing or non-boolean values read as `false`.
    fn get_bool(&self, key: &str) -> bool;

    /// Numeric value of `key`, if present and numeric.
    fn get_float(&self, key: &str) -> Option<f64>;

    fn set(&mut self, key: &str, value: ConfigValue);
}

/// A scalar settings value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Float(f64),
    Text(String),
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Error type for settings store operations.
#[derive(Debug)]
pub enum StoreError {
    /// IO error writing the settings file
    Io(std::io::Error),
    /// Settings file or environment could not be parsed
    Parse(figment::Error),
    /// TOML serialization error
    Serialize(toml::ser::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(e) => write!(f, "Settings parse error: {}", e),
            Self::Serialize(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<figment::Error> for StoreError {
    fn from(e: figment::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Serialize(e)
    }
}

/// In-memory settings backed by a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsStore {
    values: BTreeMap<String, ConfigValue>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        values.insert(SOUND_ENABLED.to_string(), ConfigValue::Bool(true));
        values.insert(DEBUG_SETTINGS.to_string(), ConfigValue::Bool(false));
        for layer in SoundLayer::ALL {
            values.insert(layer.config_key(), ConfigValue::Float(1.0));
        }
        Self { values }
    }
}

impl SettingsStore {
    /// A store with no values at all.
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Layered sources: defaults, then the settings file, then environment.
    ///
    /// A missing settings file contributes nothing.
    pub fn figment(path: &Path) -> Figment {
        let env = Env::prefixed(ENV_PREFIX);
        let vars: Vec<(String, String)> = env
            .iter()
            .map(|(key, value)| (key.as_str().to_string(), value))
            .collect();
        Self::layered(path, vars)
    }

    /// Like [`SettingsStore::figment`], with explicit `(name, value)`
    /// overrides in place of the process environment. Names carry no prefix.
    pub fn layered(
        path: &Path,
        overrides: impl IntoIterator<Item = (String, String)>,
    ) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Serialized::defaults(env_overrides(overrides)))
    }

    /// Load settings from `path` merged over the defaults.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let store: Self = Self::figment(path).extract()?;
        debug!(path = %path.display(), keys = store.values.len(), "settings loaded");
        Ok(store)
    }

    /// Save settings to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!(path = %path.display(), "settings saved");
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl ConfigStore for SettingsStore {
    fn get_bool(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(ConfigValue::Bool(b)) => *b,
            Some(ConfigValue::Text(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        match self.values.get(key)? {
            ConfigValue::Float(n) => Some(*n),
            ConfigValue::Text(s) => s.trim().parse().ok(),
            ConfigValue::Bool(_) => None,
        }
    }

    fn set(&mut self, key: &str, value: ConfigValue) {
        debug!(key, %value, "setting changed");
        self.values.insert(key.to_string(), value);
    }
}

/// Map environment variable names to settings keys and parse their values.
///
/// Names are lowercased and `__` becomes `.`; `true`/`false` become booleans,
/// numbers become floats and anything else stays text.
pub fn env_overrides(
    vars: impl IntoIterator<Item = (String, String)>,
) -> BTreeMap<String, ConfigValue> {
    vars.into_iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, raw)| {
            let key = name.to_ascii_lowercase().replace(ENV_KEY_SEPARATOR, ".");
            let trimmed = raw.trim();
            let value = if trimmed.eq_ignore_ascii_case("true") {
                ConfigValue::Bool(true)
            } else if trimmed.eq_ignore_ascii_case("false") {
                ConfigValue::Bool(false)
            } else if let Ok(n) = trimmed.parse::<f64>() {
                ConfigValue::Float(n)
            } else {
                ConfigValue::Text(raw)
            };
            debug!(key, %value, "environment override");
            (key, value)
        })
        .collect()
}
