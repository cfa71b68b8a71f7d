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

//! The physical input vocabulary: controller buttons, D-pad directions, pads and keys.

use std::fmt;

/// A raw controller button. Indices follow the PlayStation-style layout used
/// by drum kit controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Square,
    Cross,
    Circle,
    Triangle,
    /// The kick pedal reports as the left shoulder button.
    KickPedal,
    /// The orange pad reports as the right shoulder button.
    Orange,
    Select,
    Start,
    Ps,
    /// Any button outside of the drum kit vocabulary.
    Other(u8),
}

impl Button {
    /// Converts a raw button index into a button.
    #[cfg(test)]
    pub fn from_index(index: u8) -> Button {
        match index {
            0 => Button::Square,
            1 => Button::Cross,
            2 => Button::Circle,
            3 => Button::Triangle,
            4 => Button::KickPedal,
            5 => Button::Orange,
            8 => Button::Select,
            9 => Button::Start,
            12 => Button::Ps,
            other => Button::Other(other),
        }
    }

    /// Returns the raw button index.
    pub fn index(self) -> u8 {
        match self {
            Button::Square => 0,
            Button::Cross => 1,
            Button::Circle => 2,
            Button::Triangle => 3,
            Button::KickPedal => 4,
            Button::Orange => 5,
            Button::Select => 8,
            Button::Start => 9,
            Button::Ps => 12,
            Button::Other(index) => index,
        }
    }

    /// Returns the drum pad this button is wired to, if any.
    pub fn pad(self) -> Option<Pad> {
        match self {
            Button::Circle => Some(Pad::Red),
            Button::Square => Some(Pad::Blue),
            Button::Cross => Some(Pad::Green),
            Button::Triangle => Some(Pad::Yellow),
            Button::Orange => Some(Pad::Orange),
            Button::KickPedal => Some(Pad::KickPedal),
            _ => None,
        }
    }
}

/// A drum pad on the kit. Layouts bind pads to sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pad {
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    KickPedal,
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pad::Red => "red",
            Pad::Blue => "blue",
            Pad::Green => "green",
            Pad::Yellow => "yellow",
            Pad::Orange => "orange",
            Pad::KickPedal => "kick pedal",
        };
        write!(f, "{}", name)
    }
}

/// A D-pad (hat) direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const UP_MASK: u8 = 0x01;
    pub const RIGHT_MASK: u8 = 0x02;
    pub const DOWN_MASK: u8 = 0x04;
    pub const LEFT_MASK: u8 = 0x08;

    /// Converts a hat position bitmask into a direction. Centered and diagonal
    /// positions have no direction.
    pub fn from_hat(position: u8) -> Option<Direction> {
        match position {
            Self::UP_MASK => Some(Direction::Up),
            Self::RIGHT_MASK => Some(Direction::Right),
            Self::DOWN_MASK => Some(Direction::Down),
            Self::LEFT_MASK => Some(Direction::Left),
            _ => None,
        }
    }

    /// Returns the hat position bitmask for this direction.
    pub fn hat_mask(self) -> u8 {
        match self {
            Direction::Up => Self::UP_MASK,
            Direction::Right => Self::RIGHT_MASK,
            Direction::Down => Self::DOWN_MASK,
            Direction::Left => Self::LEFT_MASK,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        write!(f, "{}", name)
    }
}

/// A key press from the terminal fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space,
    Escape,
    Arrow(Direction),
}

/// A single input event from an input source.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A controller button was pressed or released.
    Button { button: Button, pressed: bool },
    /// The D-pad moved to the given hat bitmask position. Zero is centered.
    Hat { position: u8 },
    /// An analog axis moved.
    Axis { axis: u8, value: f32 },
    /// A key was pressed.
    Key(Key),
}

impl Event {
    /// Shorthand for a button press.
    #[cfg(test)]
    pub fn button_down(button: Button) -> Event {
        Event::Button {
            button,
            pressed: true,
        }
    }

    /// Shorthand for a button release.
    #[cfg(test)]
    pub fn button_up(button: Button) -> Event {
        Event::Button {
            button,
            pressed: false,
        }
    }

    /// Shorthand for a hat move to the given direction.
    #[cfg(test)]
    pub fn hat(direction: Direction) -> Event {
        Event::Hat {
            position: direction.hat_mask(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_button_index_round_trips_known_buttons() {
        for index in [0, 1, 2, 3, 4, 5, 8, 9, 12] {
            let button = Button::from_index(index);
            assert!(!matches!(button, Button::Other(_)));
            assert_eq!(index, button.index());
        }
        assert_eq!(Button::Other(7), Button::from_index(7));
    }

    #[test]
    fn test_button_pads() {
        assert_eq!(Some(Pad::Red), Button::Circle.pad());
        assert_eq!(Some(Pad::Blue), Button::Square.pad());
        assert_eq!(Some(Pad::Green), Button::Cross.pad());
        assert_eq!(Some(Pad::Yellow), Button::Triangle.pad());
        assert_eq!(Some(Pad::Orange), Button::Orange.pad());
        assert_eq!(Some(Pad::KickPedal), Button::KickPedal.pad());
        assert_eq!(None, Button::Ps.pad());
        assert_eq!(None, Button::Select.pad());
        assert_eq!(None, Button::Other(20).pad());
    }

    #[test]
    fn test_hat_directions() {
        assert_eq!(Some(Direction::Up), Direction::from_hat(0x01));
        assert_eq!(Some(Direction::Right), Direction::from_hat(0x02));
        assert_eq!(Some(Direction::Down), Direction::from_hat(0x04));
        assert_eq!(Some(Direction::Left), Direction::from_hat(0x08));
        // Centered and diagonals.
        assert_eq!(None, Direction::from_hat(0x00));
        assert_eq!(None, Direction::from_hat(0x03));
        assert_eq!(None, Direction::from_hat(0x0c));

        assert_eq!(Event::Hat { position: 0x02 }, Event::hat(Direction::Right));
    }
}
