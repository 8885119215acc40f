//! Audio layers and the volume service.

use std::fmt;
use std::str::FromStr;

use float_cmp::approx_eq;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::store::{ConfigStore, ConfigValue, SOUND_ENABLED};

/// A named audio channel with its own volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundLayer {
    Master,
    Gui,
    Sfx,
    Creature,
    Ambient,
    Music,
}

impl SoundLayer {
    /// All layers, in settings display order.
    pub const ALL: [SoundLayer; 6] = [
        SoundLayer::Master,
        SoundLayer::Gui,
        SoundLayer::Sfx,
        SoundLayer::Creature,
        SoundLayer::Ambient,
        SoundLayer::Music,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Gui => "gui",
            Self::Sfx => "sfx",
            Self::Creature => "creature",
            Self::Ambient => "ambient",
            Self::Music => "music",
        }
    }

    /// Display label for settings widgets.
    pub fn label(self) -> &'static str {
        match self {
            Self::Master => "Master",
            Self::Gui => "GUI",
            Self::Sfx => "Effects",
            Self::Creature => "Creatures",
            Self::Ambient => "Ambient",
            Self::Music => "Music",
        }
    }

    /// Settings key holding the persisted volume of this layer.
    pub fn config_key(self) -> String {
        format!("sound.{}.volume", self.as_str())
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SoundLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown layer name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLayer(pub String);

impl fmt::Display for UnknownLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = SoundLayer::ALL.iter().map(|l| l.as_str()).collect();
        write!(
            f,
            "unknown sound layer '{}' (expected one of: {})",
            self.0,
            names.join(", ")
        )
    }
}

impl std::error::Error for UnknownLayer {}

impl FromStr for SoundLayer {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SoundLayer::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownLayer(s.to_string()))
    }
}

/// Per-layer volume control of the audio engine.
pub trait VolumeService {
    /// Volume of `layer` as a fraction in `[0, 1]`.
    fn volume(&self, layer: SoundLayer) -> f64;

    fn set_volume(&mut self, layer: SoundLayer, fraction: f64);

    /// Called after the global sound flag in `store` changed.
    fn on_state_changed(&mut self, store: &dyn ConfigStore);
}

/// In-process volume mixer.
#[derive(Debug, Clone, PartialEq)]
pub struct Mixer {
    volumes: [f64; 6],
    muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            volumes: [1.0; 6],
            muted: false,
        }
    }
}

impl Mixer {
    /// Restore volumes and the muted state from persisted settings.
    pub fn from_store(store: &dyn ConfigStore) -> Self {
        let mut mixer = Self::default();
        for layer in SoundLayer::ALL {
            if let Some(v) = store.get_float(&layer.config_key()) {
                mixer.volumes[layer.index()] = v.clamp(0.0, 1.0);
            }
        }
        mixer.muted = !store.get_bool(SOUND_ENABLED);
        mixer
    }

    /// Write every layer volume back to `store`.
    pub fn persist(&self, store: &mut dyn ConfigStore) {
        for layer in SoundLayer::ALL {
            store.set(
                &layer.config_key(),
                ConfigValue::Float(self.volumes[layer.index()]),
            );
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Output gain of a layer: zero while muted, otherwise scaled by master.
    pub fn effective_volume(&self, layer: SoundLayer) -> f64 {
        if self.muted {
            return 0.0;
        }
        let own = self.volumes[layer.index()];
        match layer {
            SoundLayer::Master => own,
            _ => own * self.volumes[SoundLayer::Master.index()],
        }
    }
}

impl VolumeService for Mixer {
    fn volume(&self, layer: SoundLayer) -> f64 {
        self.volumes[layer.index()]
    }

    fn set_volume(&mut self, layer: SoundLayer, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        let slot = &mut self.volumes[layer.index()];
        if approx_eq!(f64, *slot, fraction, ulps = 2) {
            trace!(%layer, fraction, "volume unchanged");
            return;
        }
        *slot = fraction;
        debug!(%layer, fraction, "volume set");
    }

    fn on_state_changed(&mut self, store: &dyn ConfigStore) {
        self.muted = !store.get_bool(SOUND_ENABLED);
        info!(muted = self.muted, "sound state changed");
    }
}
