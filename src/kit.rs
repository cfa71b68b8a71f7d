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

//! The drum kit: the closed set of sounds that can be played.

use std::fmt;

/// A percussion sound, independent of whatever physical input plays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sound {
    BassPedal,
    Snare,
    Tom,
    FloorTom,
    HighHatClosed,
    HighHatOpen,
    CrashCymbal,
    RideCymbal,
}

impl Sound {
    /// Every sound in the kit.
    pub const ALL: [Sound; 8] = [
        Sound::BassPedal,
        Sound::Snare,
        Sound::Tom,
        Sound::FloorTom,
        Sound::HighHatClosed,
        Sound::HighHatOpen,
        Sound::CrashCymbal,
        Sound::RideCymbal,
    ];

    /// The human readable name of the sound.
    pub fn name(self) -> &'static str {
        match self {
            Sound::BassPedal => "bass pedal",
            Sound::Snare => "snare hit",
            Sound::Tom => "tom tom",
            Sound::FloorTom => "floor tom",
            Sound::HighHatClosed => "closed high hat",
            Sound::HighHatOpen => "open high hat",
            Sound::CrashCymbal => "crash cymbal",
            Sound::RideCymbal => "ride cymbal",
        }
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The sample files loaded at startup, relative to the samples directory.
/// The open high hat has no sample and is always absent.
pub const DEFAULT_SAMPLES: [(&str, Sound); 7] = [
    ("snare1.wav", Sound::Snare),
    ("crashCymbal.wav", Sound::CrashCymbal),
    ("hiroomtm.wav", Sound::Tom),
    ("Floor-Tom-3.wav", Sound::FloorTom),
    ("Deep-Kick.wav", Sound::BassPedal),
    ("Closed-Hi-Hat-4.wav", Sound::HighHatClosed),
    ("Ride-Cymbal-2.wav", Sound::RideCymbal),
];
