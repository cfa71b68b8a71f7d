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

//! Resolves raw input events into kit actions through the active layout.

use tracing::{debug, info};

use crate::input::{Button, Direction, Event, Key, Pad};
use crate::kit::Sound;
use crate::layout::{Layouts, DEFAULT_POSITION};

/// What the session should do in response to an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Play the sound from the beginning.
    Trigger(Sound),
    /// Stop the kit.
    Quit,
}

/// Tracks the active layout and turns input events into actions.
#[derive(Debug)]
pub struct Dispatcher {
    layouts: Layouts,
    active: Direction,
}

impl Dispatcher {
    /// Creates a dispatcher with the default layout active.
    pub fn new(layouts: Layouts) -> Dispatcher {
        Dispatcher {
            layouts,
            active: DEFAULT_POSITION,
        }
    }

    /// The position of the active layout.
    pub fn active(&self) -> Direction {
        self.active
    }

    /// Handles a single input event.
    pub fn handle(&mut self, event: &Event) -> Option<Action> {
        match event {
            Event::Button {
                button,
                pressed: true,
            } => match button.pad() {
                Some(pad) => self.hit(pad),
                None => {
                    debug!(button = button.index(), "Ignoring button press");
                    None
                }
            },
            Event::Button {
                button: Button::Ps,
                pressed: false,
            } => Some(Action::Quit),
            Event::Button { .. } => None,
            Event::Hat { position } => {
                debug!(position, "Hat moved");
                if let Some(direction) = Direction::from_hat(*position) {
                    self.select(direction);
                }
                None
            }
            Event::Axis { axis, value } => {
                debug!(axis, value, "Axis moved");
                None
            }
            Event::Key(key) => self.key(*key),
        }
    }

    /// The keyboard fallback mirrors the controller: q/w/e are red/blue/green,
    /// 1 and 3 are the yellow and orange cymbals, space is the kick pedal.
    fn key(&mut self, key: Key) -> Option<Action> {
        match key {
            Key::Escape => Some(Action::Quit),
            Key::Space => self.hit(Pad::KickPedal),
            Key::Arrow(direction) => {
                self.select(direction);
                None
            }
            Key::Char(c) => match c {
                'q' => self.hit(Pad::Red),
                'w' => self.hit(Pad::Blue),
                'e' => self.hit(Pad::Green),
                '1' => self.hit(Pad::Yellow),
                '3' => self.hit(Pad::Orange),
                _ => None,
            },
        }
    }

    fn hit(&self, pad: Pad) -> Option<Action> {
        match self.layouts.lookup(self.active, pad) {
            Some(sound) => Some(Action::Trigger(sound)),
            None => {
                debug!(%pad, layout = %self.active, "Pad is not mapped");
                None
            }
        }
    }

    fn select(&mut self, position: Direction) {
        if !self.layouts.is_selectable(position) {
            debug!(%position, "No layout at position");
            return;
        }
        if self.active != position {
            info!(%position, "Switched layout");
        }
        self.active = position;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::Layout;

    fn dispatch_all(dispatcher: &mut Dispatcher, events: &[Event]) -> Vec<Action> {
        events
            .iter()
            .filter_map(|event| dispatcher.handle(event))
            .collect()
    }

    #[test]
    fn test_red_plays_snare_on_default_layout() {
        let mut dispatcher = Dispatcher::new(Layouts::builtin());
        assert_eq!(Direction::Up, dispatcher.active());
        assert_eq!(
            vec![Action::Trigger(Sound::Snare)],
            dispatch_all(&mut dispatcher, &[Event::button_down(Button::Circle)])
        );
    }

    #[test]
    fn test_right_layout_plays_ride_on_orange() {
        let mut dispatcher = Dispatcher::new(Layouts::builtin());
        assert_eq!(
            vec![Action::Trigger(Sound::CrashCymbal)],
            dispatch_all(&mut dispatcher, &[Event::button_down(Button::Orange)])
        );
        assert_eq!(
            vec![Action::Trigger(Sound::RideCymbal)],
            dispatch_all(
                &mut dispatcher,
                &[
                    Event::hat(Direction::Right),
                    Event::button_down(Button::Orange)
                ]
            )
        );
        assert_eq!(Direction::Right, dispatcher.active());
    }

    #[test]
    fn test_switch_changes_every_binding_in_layout() {
        let mut dispatcher = Dispatcher::new(Layouts::builtin());
        dispatcher.handle(&Event::hat(Direction::Down));
        assert_eq!(
            vec![
                Action::Trigger(Sound::Snare),
                Action::Trigger(Sound::Tom),
                Action::Trigger(Sound::FloorTom),
                Action::Trigger(Sound::CrashCymbal),
                Action::Trigger(Sound::RideCymbal),
                Action::Trigger(Sound::BassPedal),
            ],
            dispatch_all(
                &mut dispatcher,
                &[
                    Event::button_down(Button::Circle),
                    Event::button_down(Button::Square),
                    Event::button_down(Button::Cross),
                    Event::button_down(Button::Triangle),
                    Event::button_down(Button::Orange),
                    Event::button_down(Button::KickPedal),
                ]
            )
        );
    }

    #[test]
    fn test_absent_or_invalid_positions_keep_layout() {
        let mut dispatcher = Dispatcher::new(Layouts::builtin());
        dispatcher.handle(&Event::hat(Direction::Right));

        // Left has no layout, zero is centered and 0x03 is a diagonal.
        for position in [Direction::LEFT_MASK, 0x00, 0x03, 0xff] {
            assert_eq!(None, dispatcher.handle(&Event::Hat { position }));
            assert_eq!(Direction::Right, dispatcher.active());
        }
        assert_eq!(
            Some(Action::Trigger(Sound::RideCymbal)),
            dispatcher.handle(&Event::button_down(Button::Orange))
        );
    }

    #[test]
    fn test_layout_missing_reference_pad_is_not_selected() {
        let layouts = Layouts::builtin().with_layout(
            Direction::Left,
            Layout::new([(Pad::Orange, Sound::HighHatOpen)]),
        );
        let mut dispatcher = Dispatcher::new(layouts);
        dispatcher.handle(&Event::hat(Direction::Left));
        assert_eq!(Direction::Up, dispatcher.active());
        assert_eq!(
            Some(Action::Trigger(Sound::CrashCymbal)),
            dispatcher.handle(&Event::button_down(Button::Orange))
        );
    }

    #[test]
    fn test_unmapped_pad_is_ignored() {
        let layouts =
            Layouts::empty().with_layout(Direction::Up, Layout::new([(Pad::Red, Sound::Snare)]));
        let mut dispatcher = Dispatcher::new(layouts);
        assert_eq!(None, dispatcher.handle(&Event::button_down(Button::Square)));
        assert_eq!(None, dispatcher.handle(&Event::Key(Key::Space)));
    }

    #[test]
    fn test_quit_on_ps_release_only() {
        let mut dispatcher = Dispatcher::new(Layouts::builtin());
        assert_eq!(None, dispatcher.handle(&Event::button_down(Button::Ps)));
        assert_eq!(
            Some(Action::Quit),
            dispatcher.handle(&Event::button_up(Button::Ps))
        );
        // Releasing a pad does nothing.
        assert_eq!(None, dispatcher.handle(&Event::button_up(Button::Circle)));
        assert_eq!(None, dispatcher.handle(&Event::button_up(Button::Start)));
    }

    #[test]
    fn test_non_pad_buttons_and_axes_are_ignored() {
        let mut dispatcher = Dispatcher::new(Layouts::builtin());
        assert_eq!(
            Vec::<Action>::new(),
            dispatch_all(
                &mut dispatcher,
                &[
                    Event::button_down(Button::Select),
                    Event::button_down(Button::Start),
                    Event::button_down(Button::Other(10)),
                    Event::Axis {
                        axis: 0,
                        value: 0.5
                    },
                ]
            )
        );
        assert_eq!(Direction::Up, dispatcher.active());
    }

    #[test]
    fn test_keyboard_mirrors_controller() {
        let mut dispatcher = Dispatcher::new(Layouts::builtin());
        assert_eq!(
            vec![
                Action::Trigger(Sound::Snare),
                Action::Trigger(Sound::Tom),
                Action::Trigger(Sound::FloorTom),
                Action::Trigger(Sound::HighHatClosed),
                Action::Trigger(Sound::CrashCymbal),
                Action::Trigger(Sound::BassPedal),
            ],
            dispatch_all(
                &mut dispatcher,
                &[
                    Event::Key(Key::Char('q')),
                    Event::Key(Key::Char('w')),
                    Event::Key(Key::Char('e')),
                    Event::Key(Key::Char('1')),
                    Event::Key(Key::Char('3')),
                    Event::Key(Key::Space),
                    Event::Key(Key::Char('z')),
                ]
            )
        );

        dispatcher.handle(&Event::Key(Key::Arrow(Direction::Down)));
        assert_eq!(Direction::Down, dispatcher.active());
        dispatcher.handle(&Event::Key(Key::Arrow(Direction::Left)));
        assert_eq!(Direction::Down, dispatcher.active());
        assert_eq!(
            Some(Action::Trigger(Sound::CrashCymbal)),
            dispatcher.handle(&Event::Key(Key::Char('1')))
        );

        assert_eq!(
            Some(Action::Quit),
            dispatcher.handle(&Event::Key(Key::Escape))
        );
    }
}
