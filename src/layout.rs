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

//! Layouts bind drum pads to sounds. A table of layouts is keyed by D-pad
//! direction so the player can switch kits while playing.

use std::collections::HashMap;

use crate::input::{Direction, Pad};
use crate::kit::Sound;

/// The layout that is active when the kit starts.
pub const DEFAULT_POSITION: Direction = Direction::Up;

/// The pad every selectable layout must bind.
const REFERENCE_PAD: Pad = Pad::Red;

/// A complete mapping from pads to sounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    bindings: HashMap<Pad, Sound>,
}

impl Layout {
    /// Creates a layout from the given pad bindings.
    pub fn new<I>(bindings: I) -> Layout
    where
        I: IntoIterator<Item = (Pad, Sound)>,
    {
        Layout {
            bindings: bindings.into_iter().collect(),
        }
    }

    /// Returns the sound bound to the pad, or None if the pad is unbound.
    pub fn sound_for(&self, pad: Pad) -> Option<Sound> {
        self.bindings.get(&pad).copied()
    }

    /// A layout can only be selected if it binds the reference pad.
    pub fn is_populated(&self) -> bool {
        self.bindings.contains_key(&REFERENCE_PAD)
    }
}

/// The table of layouts, keyed by D-pad direction. Read only once built.
#[derive(Debug, Clone, Default)]
pub struct Layouts {
    layouts: HashMap<Direction, Layout>,
}

impl Layouts {
    /// Creates an empty layout table.
    pub fn empty() -> Layouts {
        Layouts {
            layouts: HashMap::new(),
        }
    }

    /// Adds a layout at the given position.
    pub fn with_layout(mut self, position: Direction, layout: Layout) -> Layouts {
        self.layouts.insert(position, layout);
        self
    }

    /// The built in layouts. Up is the standard kit, right swaps the orange pad
    /// to the ride cymbal, down additionally moves the crash to the yellow pad.
    pub fn builtin() -> Layouts {
        let standard = [
            (Pad::Red, Sound::Snare),
            (Pad::Blue, Sound::Tom),
            (Pad::Green, Sound::FloorTom),
            (Pad::Yellow, Sound::HighHatClosed),
            (Pad::Orange, Sound::CrashCymbal),
            (Pad::KickPedal, Sound::BassPedal),
        ];

        let ride = Layout::new(standard).with_binding(Pad::Orange, Sound::RideCymbal);
        let ride_and_crash = ride.clone().with_binding(Pad::Yellow, Sound::CrashCymbal);

        Layouts::empty()
            .with_layout(Direction::Up, Layout::new(standard))
            .with_layout(Direction::Right, ride)
            .with_layout(Direction::Down, ride_and_crash)
    }

    /// Returns the layout at the given position.
    pub fn get(&self, position: Direction) -> Option<&Layout> {
        self.layouts.get(&position)
    }

    /// Looks up the sound for a pad in the layout at the given position.
    pub fn lookup(&self, position: Direction, pad: Pad) -> Option<Sound> {
        self.get(position).and_then(|layout| layout.sound_for(pad))
    }

    /// Returns true if the position holds a layout that can be switched to.
    pub fn is_selectable(&self, position: Direction) -> bool {
        self.get(position).is_some_and(Layout::is_populated)
    }
}

impl Layout {
    fn with_binding(mut self, pad: Pad, sound: Sound) -> Layout {
        self.bindings.insert(pad, sound);
        self
    }
}
