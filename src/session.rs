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
//! Ties an input driver to the dispatcher and the playback worker.

use std::error::Error;

use crossbeam_channel::Sender;
use tracing::{debug, info, span, warn, Level};

use crate::controller::Driver;
use crate::dispatch::{Action, Dispatcher};
use crate::playback::{PlaybackController, PlaybackWorker, Request};

pub struct Session {
    dispatcher: Dispatcher,
    controller: PlaybackController,
}

impl Session {
    pub fn new(dispatcher: Dispatcher, controller: PlaybackController) -> Session {
        Session {
            dispatcher,
            controller,
        }
    }

    /// Dispatches input until quit is requested or the driver runs dry. The
    /// playback worker is stopped and every output closed before this
    /// returns, including when the driver fails.
    pub fn run(mut self, driver: &mut dyn Driver) -> Result<(), Box<dyn Error>> {
        let span = span!(Level::INFO, "session");
        let _enter = span.enter();

        let (requests_tx, requests_rx) = crossbeam_channel::unbounded::<Request>();
        let (quit_tx, quit_rx) = crossbeam_channel::bounded::<()>(1);
        let worker = PlaybackWorker::spawn(self.controller.clone(), requests_rx, quit_rx)?;

        let result = self.dispatch(driver, &requests_tx);

        stop_worker(&quit_tx, worker);
        self.controller.stop_all();

        result
    }

    fn dispatch(
        &mut self,
        driver: &mut dyn Driver,
        requests: &Sender<Request>,
    ) -> Result<(), Box<dyn Error>> {
        info!(layout = %self.dispatcher.active(), "Ready to play.");

        loop {
            let Some(event) = driver.next_event()? else {
                info!("Input closed.");
                return Ok(());
            };

            match self.dispatcher.handle(&event) {
                Some(Action::Trigger(sound)) => {
                    if requests.send(Request { sound }).is_err() {
                        warn!("Playback worker stopped unexpectedly.");
                        return Ok(());
                    }
                }
                Some(Action::Quit) => {
                    info!("Quit requested.");
                    return Ok(());
                }
                None => {}
            }
        }
    }
}

/// Signals the worker and waits for it. Anything already queued still plays
/// before the worker exits.
fn stop_worker(quit: &Sender<()>, worker: PlaybackWorker) {
    if quit.send(()).is_err() {
        debug!("Playback worker already stopped.");
    }
    worker.join();
}
