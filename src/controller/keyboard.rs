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
use std::io::{self, Write};

use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::info;

use crate::input::{Direction, Event, Key};

/// Reads drum hits from the terminal.
pub struct Driver {
    _raw_mode: RawModeGuard,
}

impl Driver {
    /// Prints the key bindings and puts the terminal into raw mode so keys
    /// arrive as they're pressed.
    pub fn open() -> Result<Driver, io::Error> {
        write_help(io::stdout().lock())?;
        let raw_mode = RawModeGuard::enable()?;

        info!("Keyboard driver started.");
        Ok(Driver {
            _raw_mode: raw_mode,
        })
    }
}

impl super::Driver for Driver {
    fn next_event(&mut self) -> Result<Option<Event>, io::Error> {
        loop {
            if let event::Event::Key(key) = event::read()? {
                if let Some(key) = translate(key) {
                    return Ok(Some(Event::Key(key)));
                }
            }
        }
    }
}

/// Restores the terminal when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<RawModeGuard> {
        terminal::enable_raw_mode()?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn write_help<W: Write>(mut writer: W) -> io::Result<()> {
    writeln!(
        writer,
        "Pads: q (red), w (blue), e (green), 1 (yellow), 3 (orange), space (kick pedal)"
    )?;
    writeln!(writer, "Arrow keys switch layouts, Esc quits.")?;
    writer.flush()
}

/// Maps a terminal key press to a key. Releases and repeats are dropped so
/// that holding a key doesn't keep retriggering.
fn translate(key: KeyEvent) -> Option<Key> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    // Raw mode swallows the interrupt signal.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Key::Escape);
    }

    match key.code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c.to_ascii_lowercase())),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Up => Some(Key::Arrow(Direction::Up)),
        KeyCode::Right => Some(Key::Arrow(Direction::Right)),
        KeyCode::Down => Some(Key::Arrow(Direction::Down)),
        KeyCode::Left => Some(Key::Arrow(Direction::Left)),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn press(code: KeyCode) -> Option<Key> {
        translate(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_keys() {
        assert_eq!(Some(Key::Char('q')), press(KeyCode::Char('q')));
        assert_eq!(Some(Key::Char('w')), press(KeyCode::Char('W')));
        assert_eq!(Some(Key::Space), press(KeyCode::Char(' ')));
        assert_eq!(Some(Key::Escape), press(KeyCode::Esc));
        assert_eq!(Some(Key::Arrow(Direction::Left)), press(KeyCode::Left));
        assert_eq!(None, press(KeyCode::Tab));
    }

    #[test]
    fn test_ctrl_c_quits() {
        assert_eq!(
            Some(Key::Escape),
            translate(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
        );
    }

    #[test]
    fn test_release_and_repeat_ignored() {
        for kind in [KeyEventKind::Release, KeyEventKind::Repeat] {
            assert_eq!(
                None,
                translate(KeyEvent::new_with_kind(
                    KeyCode::Char('q'),
                    KeyModifiers::NONE,
                    kind
                ))
            );
        }
    }

    #[test]
    fn test_help() -> Result<(), io::Error> {
        let mut out = Vec::new();
        write_help(&mut out)?;
        let help = String::from_utf8_lossy(&out);
        assert!(help.contains("q (red)"));
        assert!(help.contains("Esc quits"));
        Ok(())
    }
}
