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
use std::path::PathBuf;

use crate::kit::Sound;

/// Errors produced while decoding a sample file.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unable to read WAV data: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported sample format: {bits} bit {format}")]
    UnsupportedFormat { bits: u16, format: &'static str },
}

/// A sound could not be loaded. Never fatal; the sound is left out of the kit.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to decode {} for {sound}: {source}", path.display())]
    Decode {
        sound: Sound,
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("failed to open output device for {sound}: {reason}")]
    Open { sound: Sound, reason: String },
}
