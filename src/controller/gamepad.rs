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
use std::{fmt, io, time::Duration};

use gilrs::{Axis, EventType, Gamepad, GamepadId, Gilrs};
use tracing::{debug, info, span, warn, Level};

use super::DeviceOpenError;
use crate::input::{Button, Direction, Event};

/// The longest a single wait for controller events blocks before waiting again.
const WAIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Lists the connected controllers by index.
pub fn list_controllers() -> Result<Vec<String>, DeviceOpenError> {
    let gilrs = Gilrs::new().map_err(|e| DeviceOpenError::Init(e.to_string()))?;
    Ok(gilrs
        .gamepads()
        .enumerate()
        .map(|(index, (_, gamepad))| ControllerInfo::new(index, &gamepad).to_string())
        .collect())
}

/// What gilrs knows about a connected controller.
struct ControllerInfo {
    index: usize,
    name: String,
    os_name: String,
    mapping: String,
    power: String,
}

impl ControllerInfo {
    fn new(index: usize, gamepad: &Gamepad<'_>) -> ControllerInfo {
        ControllerInfo {
            index,
            name: gamepad.name().to_string(),
            os_name: gamepad.os_name().to_string(),
            mapping: format!("{:?}", gamepad.mapping_source()),
            power: format!("{:?}", gamepad.power_info()),
        }
    }
}

impl fmt::Display for ControllerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (os name: {}, mapping: {}, power: {})",
            self.index, self.name, self.os_name, self.mapping, self.power
        )
    }
}

/// Reads events from one game controller.
pub struct Driver {
    gilrs: Gilrs,
    id: GamepadId,
    name: String,
    translator: Translator,
}

impl Driver {
    /// Opens the controller at the given index in the connected controller list.
    pub fn open(index: usize) -> Result<Driver, DeviceOpenError> {
        let gilrs = Gilrs::new().map_err(|e| DeviceOpenError::Init(e.to_string()))?;
        let (id, details) = gilrs
            .gamepads()
            .nth(index)
            .map(|(id, gamepad)| (id, ControllerInfo::new(index, &gamepad)))
            .ok_or(DeviceOpenError::NotFound(index))?;

        info!(
            index,
            name = details.name.as_str(),
            os_name = details.os_name.as_str(),
            mapping = details.mapping.as_str(),
            power = details.power.as_str(),
            "Opened controller."
        );
        Ok(Driver {
            gilrs,
            id,
            name: details.name,
            translator: Translator::default(),
        })
    }
}

impl super::Driver for Driver {
    fn next_event(&mut self) -> Result<Option<Event>, io::Error> {
        let span = span!(Level::DEBUG, "gamepad", name = self.name.as_str());
        let _enter = span.enter();

        loop {
            let Some(gilrs::Event { id, event, .. }) =
                self.gilrs.next_event_blocking(Some(WAIT_TIMEOUT))
            else {
                continue;
            };
            if id != self.id {
                continue;
            }

            match self.translator.event(event) {
                Translated::Event(event) => return Ok(Some(event)),
                Translated::Skip => {}
                Translated::Disconnected => {
                    warn!("Controller disconnected.");
                    return Ok(None);
                }
            }
        }
    }
}

/// The result of translating one gilrs event.
#[derive(Debug, PartialEq)]
enum Translated {
    Event(Event),
    Skip,
    Disconnected,
}

/// Turns gilrs buttons into controller events. The D-pad is reported by gilrs
/// as four buttons, so their state is folded back into a hat bitmask.
#[derive(Default)]
struct Translator {
    hat: u8,
}

impl Translator {
    fn event(&mut self, event: EventType) -> Translated {
        let translated = match event {
            EventType::ButtonPressed(button, _) => self.button(button, true),
            EventType::ButtonReleased(button, _) => self.button(button, false),
            EventType::AxisChanged(axis, value, _) => Some(Event::Axis {
                axis: axis_index(axis),
                value,
            }),
            EventType::Disconnected => return Translated::Disconnected,
            _ => None,
        };
        translated.map_or(Translated::Skip, Translated::Event)
    }

    fn button(&mut self, button: gilrs::Button, pressed: bool) -> Option<Event> {
        if let Some(direction) = dpad_direction(button) {
            let mask = direction.hat_mask();
            self.hat = if pressed {
                self.hat | mask
            } else {
                self.hat & !mask
            };
            return Some(Event::Hat { position: self.hat });
        }

        match controller_button(button) {
            Some(button) => Some(Event::Button { button, pressed }),
            None => {
                debug!(button = ?button, pressed, "Ignoring unmapped button.");
                None
            }
        }
    }
}

fn dpad_direction(button: gilrs::Button) -> Option<Direction> {
    match button {
        gilrs::Button::DPadUp => Some(Direction::Up),
        gilrs::Button::DPadRight => Some(Direction::Right),
        gilrs::Button::DPadDown => Some(Direction::Down),
        gilrs::Button::DPadLeft => Some(Direction::Left),
        _ => None,
    }
}

fn controller_button(button: gilrs::Button) -> Option<Button> {
    match button {
        gilrs::Button::West => Some(Button::Square),
        gilrs::Button::South => Some(Button::Cross),
        gilrs::Button::East => Some(Button::Circle),
        gilrs::Button::North => Some(Button::Triangle),
        gilrs::Button::LeftTrigger => Some(Button::KickPedal),
        gilrs::Button::RightTrigger => Some(Button::Orange),
        gilrs::Button::Select => Some(Button::Select),
        gilrs::Button::Start => Some(Button::Start),
        gilrs::Button::Mode => Some(Button::Ps),
        _ => None,
    }
}

fn axis_index(axis: Axis) -> u8 {
    match axis {
        Axis::LeftStickX => 0,
        Axis::LeftStickY => 1,
        Axis::LeftZ => 2,
        Axis::RightStickX => 3,
        Axis::RightStickY => 4,
        Axis::RightZ => 5,
        Axis::DPadX => 6,
        Axis::DPadY => 7,
        _ => u8::MAX,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_face_buttons() {
        let mut translator = Translator::default();
        assert_eq!(
            Some(Event::button_down(Button::Circle)),
            translator.button(gilrs::Button::East, true)
        );
        assert_eq!(
            Some(Event::button_up(Button::Ps)),
            translator.button(gilrs::Button::Mode, false)
        );
        assert_eq!(
            Some(Event::button_down(Button::Orange)),
            translator.button(gilrs::Button::RightTrigger, true)
        );
        assert_eq!(None, translator.button(gilrs::Button::LeftThumb, true));
    }

    #[test]
    fn test_dpad_becomes_hat() {
        let mut translator = Translator::default();
        assert_eq!(
            Some(Event::hat(Direction::Right)),
            translator.button(gilrs::Button::DPadRight, true)
        );
        assert_eq!(
            Some(Event::Hat {
                position: Direction::RIGHT_MASK | Direction::DOWN_MASK
            }),
            translator.button(gilrs::Button::DPadDown, true)
        );
        translator.button(gilrs::Button::DPadRight, false);
        assert_eq!(
            Some(Event::Hat { position: 0 }),
            translator.button(gilrs::Button::DPadDown, false)
        );
    }

    #[test]
    fn test_connection_events() {
        let mut translator = Translator::default();
        assert_eq!(Translated::Skip, translator.event(EventType::Connected));
        assert_eq!(
            Translated::Disconnected,
            translator.event(EventType::Disconnected)
        );
        assert_eq!(Translated::Skip, translator.event(EventType::Dropped));
    }

    #[test]
    fn test_controller_info_display() {
        let info = ControllerInfo {
            index: 1,
            name: "Drum Kit".to_string(),
            os_name: "Harmonix Drum Kit for PlayStation(R)3".to_string(),
            mapping: "SdlMappings".to_string(),
            power: "Wired".to_string(),
        };
        assert_eq!(
            "1: Drum Kit (os name: Harmonix Drum Kit for PlayStation(R)3, mapping: SdlMappings, power: Wired)",
            info.to_string()
        );
    }
}
