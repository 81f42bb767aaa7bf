//! Runtime settings shared by the CLI and the GUI.
//!
//! Settings live in a JSON file. Every level is `#[serde(default)]`, so a
//! file only needs the keys it changes.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::audio::spectrum::{SpectrumAnalyser, DEFAULT_FFT_SIZE, DEFAULT_SMOOTHING};
use crate::pitch::PitchDisplayOptions;
use crate::view::ViewOptions;

/// Environment variable naming the settings file.
pub const CONFIG_ENV_VAR: &str = "SONOVIEW_CONFIG";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyserSettings {
    pub fft_size: usize,
    pub smoothing: f32,
}

impl Default for AnalyserSettings {
    fn default() -> Self {
        Self {
            fft_size: DEFAULT_FFT_SIZE,
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

impl AnalyserSettings {
    pub fn build(&self) -> Result<SpectrumAnalyser, crate::Error> {
        SpectrumAnalyser::new(self.fft_size, self.smoothing)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub view: ViewOptions,
    pub pitch: PitchDisplayOptions,
    pub analyser: AnalyserSettings,
}

impl Settings {
    /// Read and validate a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read settings: {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&data)
            .with_context(|| format!("Invalid settings file: {}", path.display()))?;
        settings
            .validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load the file named by `SONOVIEW_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(&PathBuf::from(path)),
            _ => Ok(Self::default()),
        }
    }

    /// Explicit path first, then the environment, then defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::from_env(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Cannot write settings: {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.view.validate()?;
        self.analyser.build()?;
        if self.pitch.first_bin > self.pitch.last_bin {
            bail!(
                "pitch bin window is inverted: {}..{}",
                self.pitch.first_bin,
                self.pitch.last_bin
            );
        }
        if !self.pitch.noise_floor.is_finite() {
            bail!("pitch noise floor must be finite");
        }
        Ok(())
    }
}
