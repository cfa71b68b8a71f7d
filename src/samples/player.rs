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
use std::{collections::HashMap, fmt, sync::Arc};

use tracing::{debug, error};

use super::SampleStream;
use crate::audio::Output;
use crate::kit::Sound;

/// A loaded sound bound to its own output device.
pub struct SamplePlayer {
    sound: Sound,
    stream: Arc<SampleStream>,
    output: Box<dyn Output>,
}

impl SamplePlayer {
    pub fn new(sound: Sound, stream: Arc<SampleStream>, output: Box<dyn Output>) -> SamplePlayer {
        SamplePlayer {
            sound,
            stream,
            output,
        }
    }

    #[cfg(test)]
    pub fn sound(&self) -> Sound {
        self.sound
    }

    #[cfg(test)]
    pub fn stream(&self) -> &SampleStream {
        &self.stream
    }

    /// Plays the sample from the beginning. A sound that's still playing is
    /// cut off and restarted.
    pub fn trigger(&self) {
        self.stream.rewind();
        if let Err(e) = self.output.resume() {
            error!(err = e.as_ref(), sound = self.sound.name(), "Unable to resume output");
        }
    }

    /// Closes the output device. The device never pulls again afterwards.
    pub fn close(&self) {
        self.output.close();
        debug!(sound = self.sound.name(), "Closed output.");
    }
}

impl fmt::Display for SamplePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.sound, self.output)
    }
}

/// Every sound that loaded successfully. Built once, then shared read-only.
pub struct SampleTable {
    players: HashMap<Sound, SamplePlayer>,
}

impl SampleTable {
    pub fn new(players: HashMap<Sound, SamplePlayer>) -> SampleTable {
        SampleTable { players }
    }

    pub fn get(&self, sound: Sound) -> Option<&SamplePlayer> {
        self.players.get(&sound)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The sounds with no player, in kit order.
    pub fn missing(&self) -> Vec<Sound> {
        Sound::ALL
            .into_iter()
            .filter(|sound| !self.players.contains_key(sound))
            .collect()
    }

    /// Closes every output. Closing is idempotent, so this is safe to repeat.
    pub fn close_all(&self) {
        for player in self.players.values() {
            player.close();
        }
    }
}
