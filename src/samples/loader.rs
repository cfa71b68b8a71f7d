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
use std::{collections::HashMap, path::Path, sync::Arc};

use hound::WavReader;
use tracing::{debug, info, span, warn, Level};

use super::{DecodeError, LoadError, SamplePlayer, SampleStream, SampleTable};
use crate::audio::{self, SampleFormat};
use crate::config::Settings;
use crate::kit::{self, Sound};

/// Bits per sample handed to output devices.
const OUTPUT_BITS: u16 = 16;

/// Decodes a WAV file into 16-bit little-endian PCM.
pub fn decode(path: &Path) -> Result<(Vec<u8>, SampleFormat), DecodeError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let format = SampleFormat {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: OUTPUT_BITS,
    };

    let mut data = Vec::with_capacity(reader.len() as usize * 2);
    match spec.sample_format {
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(DecodeError::UnsupportedFormat {
                    bits: spec.bits_per_sample,
                    format: "integer",
                });
            }
            for sample in reader.samples::<i32>() {
                let frame = requantize(sample?, spec.bits_per_sample);
                data.extend_from_slice(&frame.to_le_bytes());
            }
        }
        hound::SampleFormat::Float => {
            if spec.bits_per_sample != 32 {
                return Err(DecodeError::UnsupportedFormat {
                    bits: spec.bits_per_sample,
                    format: "float",
                });
            }
            for sample in reader.samples::<f32>() {
                let frame = (sample?.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                data.extend_from_slice(&frame.to_le_bytes());
            }
        }
    }

    debug!(
        path = path.display().to_string(),
        %format,
        source_bits = spec.bits_per_sample,
        bytes = data.len(),
        "Decoded sample."
    );
    Ok((data, format))
}

/// Moves an integer sample of the given bit depth into 16 bits.
fn requantize(sample: i32, bits: u16) -> i16 {
    if bits <= OUTPUT_BITS {
        (sample << (OUTPUT_BITS - bits)) as i16
    } else {
        (sample >> (bits - OUTPUT_BITS)) as i16
    }
}

/// Decodes the file and opens a paused output device bound to it.
pub fn load(
    path: &Path,
    sound: Sound,
    backend: &dyn audio::Backend,
) -> Result<SamplePlayer, LoadError> {
    let (data, format) = decode(path).map_err(|source| LoadError::Decode {
        sound,
        path: path.to_path_buf(),
        source,
    })?;

    let stream = Arc::new(SampleStream::new(data));
    let output = backend
        .open(sound.name(), &format, stream.clone())
        .map_err(|e| LoadError::Open {
            sound,
            reason: e.to_string(),
        })?;

    info!(
        sound = sound.name(),
        path = path.display().to_string(),
        %format,
        "Loaded sample."
    );
    Ok(SamplePlayer::new(sound, stream, output))
}

/// Loads the default kit from the configured samples directory. Sounds that
/// fail to load are logged and left out of the table.
pub fn load_kit(settings: &Settings, backend: &dyn audio::Backend) -> SampleTable {
    let span = span!(Level::INFO, "load kit");
    let _enter = span.enter();

    let mut players = HashMap::new();
    for (file, sound) in kit::DEFAULT_SAMPLES {
        let path = settings.samples_dir().join(file);
        match load(&path, sound, backend) {
            Ok(player) => {
                players.insert(sound, player);
            }
            Err(e) => warn!(err = %e, "Sound will be unavailable."),
        }
    }

    let table = SampleTable::new(players);
    info!(
        loaded = table.len(),
        missing = ?table.missing(),
        %backend,
        "Kit loaded."
    );
    table
}
