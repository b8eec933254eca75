//! Tunable animation and encoding parameters.
//!
//! [`ScrollSettings`] is the resolved configuration the engine runs with. It can be
//! built in code, or (with the `config` feature) loaded from a TOML file whose keys
//! are all optional and layered over the defaults:
//!
//! ```toml
//! preset = "trackpad"
//! max_input_gap_ms = 100
//! frame_interval_ms = 16.667
//!
//! [presets.trackpad]
//! drag_coefficient = 30.0
//! drag_exponent = 0.7
//! stop_speed = 50.0
//! ```

use crate::error::{GestureScrollError, Result};
use crate::subpixel::RoundingBias;
use std::collections::BTreeMap;
use std::time::Duration;

/// Points per scroll line.
pub const DEFAULT_LINE_SCALE: f64 = 10.0;
/// Factor from point deltas to gesture (swipe) deltas.
pub const DEFAULT_SWIPE_SENSITIVITY: f64 = 0.6;
/// Longest pause between the last movement and lift-off that still starts momentum.
pub const DEFAULT_MAX_INPUT_GAP: Duration = Duration::from_millis(100);
/// One frame at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);
/// Preset used when none is named.
pub const DEFAULT_PRESET: &str = "trackpad";

/// Drag model parameters for one named preset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "config", serde(deny_unknown_fields))]
pub struct DragParameters {
    /// Scale of the drag force
    pub drag_coefficient: f64,
    /// Power of speed the drag force grows with
    pub drag_exponent: f64,
    /// Speed in points per second below which motion is finished
    pub stop_speed: f64,
}

impl DragParameters {
    /// Feel of a physical trackpad flick.
    pub const TRACKPAD: DragParameters = DragParameters {
        drag_coefficient: 30.0,
        drag_exponent: 0.7,
        stop_speed: 50.0,
    };

    /// Shorter glide that settles quickly.
    pub const PRECISE: DragParameters = DragParameters {
        drag_coefficient: 60.0,
        drag_exponent: 0.9,
        stop_speed: 80.0,
    };

    fn validate(&self, preset: &str) -> Result<()> {
        let checks = [
            ("drag_coefficient", self.drag_coefficient),
            ("drag_exponent", self.drag_exponent),
            ("stop_speed", self.stop_speed),
        ];
        for (field, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(GestureScrollError::config(format!(
                    "preset '{preset}': {field} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Resolved engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSettings {
    /// Points per line; line vectors are point vectors divided by this
    pub line_scale: f64,
    /// Multiplier from point deltas to gesture deltas
    pub swipe_sensitivity: f64,
    /// Staleness threshold between the last sample and lift-off
    pub max_input_gap: Duration,
    /// Period of the momentum frame ticks
    pub frame_interval: Duration,
    /// Rounding policy shared by both sub-pixel accumulators
    pub rounding: RoundingBias,
    /// Value written into the scroll record's direction-inverted flag
    pub direction_inverted: bool,
    /// Name of the active drag preset
    pub preset: String,
    /// All known drag presets by name
    pub presets: BTreeMap<String, DragParameters>,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        let mut presets = BTreeMap::new();
        presets.insert(DEFAULT_PRESET.to_string(), DragParameters::TRACKPAD);
        presets.insert("precise".to_string(), DragParameters::PRECISE);

        Self {
            line_scale: DEFAULT_LINE_SCALE,
            swipe_sensitivity: DEFAULT_SWIPE_SENSITIVITY,
            max_input_gap: DEFAULT_MAX_INPUT_GAP,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            rounding: RoundingBias::default(),
            direction_inverted: false,
            preset: DEFAULT_PRESET.to_string(),
            presets,
        }
    }
}

impl ScrollSettings {
    /// Drag parameters of the active preset.
    pub fn drag(&self) -> Result<DragParameters> {
        self.presets
            .get(&self.preset)
            .copied()
            .ok_or_else(|| GestureScrollError::unknown_preset(&self.preset))
    }

    /// Switch to another named preset.
    pub fn with_preset(mut self, name: impl Into<String>) -> Result<Self> {
        self.preset = name.into();
        self.drag()?;
        Ok(self)
    }

    /// Check every value the engine relies on being positive and finite.
    pub fn validate(&self) -> Result<()> {
        if !(self.line_scale.is_finite() && self.line_scale > 0.0) {
            return Err(GestureScrollError::config(format!(
                "line_scale must be a positive number, got {}",
                self.line_scale
            )));
        }
        if !self.swipe_sensitivity.is_finite() {
            return Err(GestureScrollError::config("swipe_sensitivity must be finite"));
        }
        if self.frame_interval.is_zero() {
            return Err(GestureScrollError::config("frame_interval must be non-zero"));
        }
        for (name, params) in &self.presets {
            params.validate(name)?;
        }
        self.drag()?;
        Ok(())
    }
}

#[cfg(feature = "config")]
pub use file::{default_config_path, load_from_path, load_or_default, ConfigFile};

#[cfg(feature = "config")]
mod file {
    use super::*;
    use serde::Deserialize;
    use std::path::{Path, PathBuf};

    /// TOML configuration file structure.
    ///
    /// All fields are optional; anything left out keeps its default.
    #[derive(Debug, Clone, Default, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    pub struct ConfigFile {
        #[serde(default)]
        pub preset: Option<String>,
        #[serde(default)]
        pub line_scale: Option<f64>,
        #[serde(default)]
        pub swipe_sensitivity: Option<f64>,
        #[serde(default)]
        pub max_input_gap_ms: Option<u64>,
        /// Fractional milliseconds, e.g. 8.333 for 120 Hz
        #[serde(default)]
        pub frame_interval_ms: Option<f64>,
        #[serde(default)]
        pub rounding: Option<RoundingBias>,
        #[serde(default)]
        pub direction_inverted: Option<bool>,
        /// Presets added to, or replacing, the built-in ones
        #[serde(default)]
        pub presets: BTreeMap<String, DragParameters>,
    }

    impl ConfigFile {
        /// Parse TOML text; `origin` only labels errors.
        pub fn parse(text: &str, origin: &Path) -> Result<Self> {
            toml::from_str(text).map_err(|err| GestureScrollError::ConfigParse {
                path: origin.to_path_buf(),
                message: err.message().to_string(),
            })
        }

        /// Layer this file over `base` and validate the result.
        pub fn apply(self, mut base: ScrollSettings) -> Result<ScrollSettings> {
            if let Some(preset) = self.preset {
                base.preset = preset;
            }
            if let Some(line_scale) = self.line_scale {
                base.line_scale = line_scale;
            }
            if let Some(sensitivity) = self.swipe_sensitivity {
                base.swipe_sensitivity = sensitivity;
            }
            if let Some(gap) = self.max_input_gap_ms {
                base.max_input_gap = Duration::from_millis(gap);
            }
            if let Some(interval) = self.frame_interval_ms {
                if !(interval.is_finite() && interval > 0.0) {
                    return Err(GestureScrollError::config(format!(
                        "frame_interval_ms must be a positive number, got {interval}"
                    )));
                }
                base.frame_interval = Duration::from_nanos((interval * 1_000_000.0).round() as u64);
            }
            if let Some(rounding) = self.rounding {
                base.rounding = rounding;
            }
            if let Some(inverted) = self.direction_inverted {
                base.direction_inverted = inverted;
            }
            base.presets.extend(self.presets);

            base.validate()?;
            Ok(base)
        }
    }

    /// `<config_dir>/gesture-scroll/config.toml`, if the platform has a config dir.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gesture-scroll").join("config.toml"))
    }

    /// Load settings from an explicit file. A missing file is an error.
    pub fn load_from_path(path: &Path) -> Result<ScrollSettings> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            GestureScrollError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }
        })?;
        ConfigFile::parse(&text, path)?.apply(ScrollSettings::default())
    }

    /// Load from the default location, falling back to defaults when no file exists.
    pub fn load_or_default() -> Result<ScrollSettings> {
        match default_config_path() {
            Some(path) if path.is_file() => load_from_path(&path),
            _ => Ok(ScrollSettings::default()),
        }
    }
}
