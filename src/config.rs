// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::path::Path;

use config::{Config, Environment};
use serde::Deserialize;
use tracing::debug;

mod error;

pub use error::ConfigError;

/// Environment variables with this prefix override the defaults, e.g.
/// PADKIT_SAMPLES_DIR.
const ENV_PREFIX: &str = "PADKIT";

const DEFAULT_SAMPLES_DIR: &str = ".";
const DEFAULT_AUDIO_DEVICE: &str = "default";

/// Process settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// The directory the kit's sample files are read from.
    samples_dir: String,
    /// The output device name. "default" is the host default, names starting
    /// with "mock" select the mock backend.
    audio_device: String,
    /// A fixed output buffer size in frames.
    #[serde(default)]
    buffer_size: Option<u32>,
}

impl Settings {
    /// Loads settings from the defaults and the process environment.
    pub fn load() -> Result<Settings, ConfigError> {
        Settings::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(environment: Environment) -> Result<Settings, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("samples_dir", DEFAULT_SAMPLES_DIR)?
            .set_default("audio_device", DEFAULT_AUDIO_DEVICE)?
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        settings.validate()?;

        debug!(settings = ?settings, "Loaded settings.");
        Ok(settings)
    }

    /// Creates settings for the given directory and device.
    #[cfg(test)]
    pub fn new(samples_dir: &Path, audio_device: &str) -> Settings {
        Settings {
            samples_dir: samples_dir.to_string_lossy().into_owned(),
            audio_device: audio_device.to_string(),
            buffer_size: None,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.audio_device.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "audio_device",
                reason: "must not be empty".to_string(),
            });
        }
        if self.buffer_size == Some(0) {
            return Err(ConfigError::Invalid {
                key: "buffer_size",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn samples_dir(&self) -> &Path {
        Path::new(&self.samples_dir)
    }

    pub fn audio_device(&self) -> &str {
        &self.audio_device
    }

    pub fn buffer_size(&self) -> Option<u32> {
        self.buffer_size
    }
}
