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
    error::Error,
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::audio::SampleFormat;
use crate::samples::SampleStream;

/// A mock backend. Doesn't actually play anything, but keeps every output it
/// opens so tests can drive the pull callback by hand.
pub struct Backend {
    name: String,
    outputs: Mutex<Vec<Output>>,
}

impl Backend {
    /// Gets the given mock backend.
    pub fn get(name: &str) -> Backend {
        Backend {
            name: name.to_string(),
            outputs: Mutex::new(Vec::new()),
        }
    }

    /// Returns the output opened with the given label.
    #[cfg(test)]
    pub fn output(&self, label: &str) -> Option<Output> {
        self.outputs
            .lock()
            .iter()
            .find(|output| output.label == label)
            .cloned()
    }

    /// Returns every output opened so far.
    #[cfg(test)]
    pub fn outputs(&self) -> Vec<Output> {
        self.outputs.lock().clone()
    }
}

impl crate::audio::Backend for Backend {
    fn open(
        &self,
        label: &str,
        format: &SampleFormat,
        stream: Arc<SampleStream>,
    ) -> Result<Box<dyn crate::audio::Output>, Box<dyn Error>> {
        if self.name.ends_with("-fail") {
            return Err(format!("mock device {} refused to open {}", self.name, label).into());
        }

        info!(backend = self.name, label, %format, "Opened mock output.");
        let output = Output {
            label: label.to_string(),
            stream,
            paused: Arc::new(AtomicBool::new(true)),
            closed: Arc::new(AtomicBool::new(false)),
            resumes: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        };
        self.outputs.lock().push(output.clone());
        Ok(Box::new(output))
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}

/// A mock output device.
#[derive(Clone)]
#[cfg_attr(not(test), allow(dead_code))]
pub struct Output {
    label: String,
    stream: Arc<SampleStream>,
    paused: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
    resumes: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl Output {
    /// Simulates the audio subsystem asking for `len` bytes.
    #[cfg(test)]
    pub fn pull(&self, len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len];
        self.stream.fill_bytes(&mut out);
        out
    }

    /// The stream this output pulls from.
    #[cfg(test)]
    pub fn stream(&self) -> &SampleStream {
        &self.stream
    }

    /// The number of times the device has been resumed.
    #[cfg(test)]
    pub fn resume_count(&self) -> usize {
        self.resumes.load(Ordering::Relaxed)
    }

    /// The number of times close has actually closed the device.
    #[cfg(test)]
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::Relaxed)
    }
}

impl crate::audio::Output for Output {
    fn resume(&self) -> Result<(), Box<dyn Error>> {
        if self.closed.load(Ordering::Relaxed) {
            return Err(format!("mock output {} is closed", self.label).into());
        }
        self.paused.store(false, Ordering::Relaxed);
        self.resumes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn pause(&self) -> Result<(), Box<dyn Error>> {
        self.paused.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::Relaxed) {
            self.paused.store(true, Ordering::Relaxed);
            self.closes.fetch_add(1, Ordering::Relaxed);
            debug!(label = self.label, "Closed mock output.");
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.label)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::audio::{Backend as _, Output as _, SampleFormat};
    use crate::samples::SampleStream;

    use super::Backend;

    fn open(backend: &Backend, frames: &[u8]) -> super::Output {
        let stream = Arc::new(SampleStream::new(frames.to_vec()));
        backend
            .open("snare hit", &SampleFormat::default(), stream)
            .unwrap();
        backend.output("snare hit").unwrap()
    }

    #[test]
    fn test_pause_keeps_position() {
        let backend = Backend::get("mock-device");
        let output = open(&backend, &[1, 0, 2, 0, 3, 0]);
        output.stream().rewind();
        output.resume().unwrap();
        assert_eq!(vec![1, 0], output.pull(2));

        output.pause().unwrap();
        assert!(output.is_paused());
        assert_eq!(2, output.stream().cursor());

        output.resume().unwrap();
        assert!(!output.is_paused());
        assert_eq!(vec![2, 0, 3, 0], output.pull(4));
    }

    #[test]
    fn test_close_is_idempotent() {
        let backend = Backend::get("mock-device");
        let output = open(&backend, &[1, 0]);

        output.close();
        output.close();
        assert_eq!(1, output.close_count());
        assert!(output.is_paused());
        assert!(output.resume().is_err());
    }

    #[test]
    fn test_failing_backend_refuses_to_open() {
        let backend = Backend::get("mock-fail");
        let stream = Arc::new(SampleStream::new(vec![1, 0]));
        assert!(backend
            .open("snare hit", &SampleFormat::default(), stream)
            .is_err());
        assert!(backend.outputs().is_empty());
    }
}
