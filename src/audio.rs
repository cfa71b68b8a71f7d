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
use std::{error::Error, fmt, sync::Arc};

use crate::config::Settings;
use crate::samples::SampleStream;

pub mod cpal;
pub mod format;
pub mod mock;

pub use format::SampleFormat;

/// An open output device that pulls from a single sample stream.
/// Devices open paused.
pub trait Output: fmt::Display + Send + Sync {
    /// Starts (or keeps) the device pulling from its stream.
    fn resume(&self) -> Result<(), Box<dyn Error>>;

    /// Stops the device from pulling. The stream keeps its position.
    ///
    /// Triggers never pause: the stream's lock keeps a rewind from racing the
    /// pull callback, so a playing sound is simply rewound in place.
    fn pause(&self) -> Result<(), Box<dyn Error>>;

    /// Returns true if the device is not currently pulling.
    fn is_paused(&self) -> bool;

    /// Closes the device. Once closed, the callback is never invoked again.
    /// Closing an already closed device does nothing.
    fn close(&self);
}

/// An audio backend that opens one output device per sample stream.
pub trait Backend: fmt::Display + Send + Sync {
    /// Opens a paused output device that pulls from the given stream.
    fn open(
        &self,
        label: &str,
        format: &SampleFormat,
        stream: Arc<SampleStream>,
    ) -> Result<Box<dyn Output>, Box<dyn Error>>;
}

/// Lists output devices known to cpal.
pub fn list_devices() -> Result<Vec<String>, Box<dyn Error>> {
    cpal::Backend::list()
}

/// Gets the backend for the configured audio device.
pub fn get_backend(settings: &Settings) -> Result<Arc<dyn Backend>, Box<dyn Error>> {
    let device = settings.audio_device();
    if device.starts_with("mock") {
        return Ok(Arc::new(mock::Backend::get(device)));
    };

    Ok(Arc::new(cpal::Backend::get(device, settings.buffer_size())?))
}
