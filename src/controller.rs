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
use std::io;

use tracing::info;

use crate::input::Event;

pub mod gamepad;
pub mod keyboard;

/// A source of input events.
pub trait Driver {
    /// Blocks until the next event. Ok(None) means the source is done and no
    /// more events will come.
    fn next_event(&mut self) -> Result<Option<Event>, io::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeviceOpenError {
    #[error("unable to initialize controller support: {0}")]
    Init(String),

    #[error("no controller at index {0}")]
    NotFound(usize),

    #[error("unable to set up the terminal: {0}")]
    Terminal(#[from] io::Error),
}

/// Opens the input driver for the given controller index. A negative index
/// selects the keyboard.
pub fn open(index: i32) -> Result<Box<dyn Driver>, DeviceOpenError> {
    match usize::try_from(index) {
        Ok(index) => Ok(Box::new(gamepad::Driver::open(index)?)),
        Err(_) => {
            info!("No controller selected, using the keyboard.");
            Ok(Box::new(keyboard::Driver::open()?))
        }
    }
}
