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

//! Sample playback for the drum kit.
//!
//! This module provides:
//! - WAV decoding into 16-bit PCM held entirely in memory
//! - A cursor over each sample that the output device pulls from
//! - One player per sound, bound to its own output device

mod error;
mod loader;
mod player;
mod stream;

pub use error::{DecodeError, LoadError};
pub use loader::load_kit;
pub use player::{SamplePlayer, SampleTable};
pub use stream::SampleStream;
