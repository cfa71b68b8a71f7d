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
use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use crossbeam_channel::{select, Receiver};
use tracing::{debug, error, info, span, Level};

use crate::kit::Sound;
use crate::samples::SampleTable;

/// A request to play a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub sound: Sound,
}

/// Plays sounds from the shared sample table.
#[derive(Clone)]
pub struct PlaybackController {
    table: Arc<SampleTable>,
    stopped: Arc<AtomicBool>,
}

impl PlaybackController {
    pub fn new(table: SampleTable) -> PlaybackController {
        PlaybackController {
            table: Arc::new(table),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Plays the sound from the beginning. Sounds that didn't load are skipped.
    pub fn trigger(&self, sound: Sound) {
        let Some(player) = self.table.get(sound) else {
            debug!(sound = sound.name(), "Sound not loaded, ignoring.");
            return;
        };

        info!(sound = sound.name(), "Playing {}.", sound);
        player.trigger();
    }

    /// Closes every output device. Only the first call does anything.
    pub fn stop_all(&self) {
        if self.stopped.swap(true, Ordering::Relaxed) {
            return;
        }
        self.table.close_all();
        info!(closed = self.table.len(), "Closed all outputs.");
    }

    #[cfg(test)]
    pub fn table(&self) -> &SampleTable {
        &self.table
    }
}

/// The thread that turns requests into triggers.
pub struct PlaybackWorker {
    handle: thread::JoinHandle<()>,
}

impl PlaybackWorker {
    /// Starts consuming requests in order. The worker stops once quit is
    /// signalled, after playing anything already queued, or when either
    /// channel disconnects.
    pub fn spawn(
        controller: PlaybackController,
        requests: Receiver<Request>,
        quit: Receiver<()>,
    ) -> io::Result<PlaybackWorker> {
        let handle = thread::Builder::new()
            .name("playback".to_string())
            .spawn(move || {
                let span = span!(Level::INFO, "playback");
                let _enter = span.enter();

                loop {
                    select! {
                        recv(requests) -> request => match request {
                            Ok(request) => controller.trigger(request.sound),
                            Err(_) => break,
                        },
                        recv(quit) -> _ => {
                            for request in requests.try_iter() {
                                controller.trigger(request.sound);
                            }
                            break;
                        },
                    }
                }
                debug!("Playback worker stopped.");
            })?;

        Ok(PlaybackWorker { handle })
    }

    /// Waits for the worker to stop.
    pub fn join(self) {
        if self.handle.join().is_err() {
            error!("Playback worker panicked");
        }
    }
}
