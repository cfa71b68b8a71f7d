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

//! The read cursor over a decoded sample.
//!
//! The output device pulls from the stream on its own schedule while triggers
//! rewind it from the playback thread, so the cursor lives behind a lock that
//! both sides take for the whole read-modify-write.

use parking_lot::Mutex;

/// Bytes per 16-bit frame.
const FRAME_BYTES: usize = 2;

/// Decoded 16-bit little-endian PCM and the position the device has read up to.
pub struct SampleStream {
    /// The sample data. Never modified after construction.
    data: Box<[u8]>,
    /// Byte offset of the next frame to play. Always even, never past the end.
    cursor: Mutex<usize>,
}

impl SampleStream {
    /// Creates a stream over the given PCM bytes. A trailing partial frame is
    /// dropped. The cursor starts at the end so nothing plays until the first
    /// trigger.
    pub fn new(mut data: Vec<u8>) -> SampleStream {
        data.truncate(data.len() - data.len() % FRAME_BYTES);
        let len = data.len();
        SampleStream {
            data: data.into_boxed_slice(),
            cursor: Mutex::new(len),
        }
    }

    /// The length of the sample data in bytes.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the sample holds no frames.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The current cursor position in bytes.
    pub fn cursor(&self) -> usize {
        *self.cursor.lock()
    }

    /// Returns true once every frame has been played.
    #[cfg(test)]
    pub fn is_exhausted(&self) -> bool {
        self.cursor() >= self.data.len()
    }

    /// Moves the cursor back to the start of the sample.
    pub fn rewind(&self) {
        *self.cursor.lock() = 0;
    }

    /// Fills the output with raw bytes, two at a time. Frames past the end of
    /// the sample are silence. Returns the number of sample bytes copied.
    pub fn fill_bytes(&self, out: &mut [u8]) -> usize {
        let mut cursor = self.cursor.lock();
        let start = *cursor;
        for frame in out.chunks_mut(FRAME_BYTES) {
            if frame.len() == FRAME_BYTES && *cursor < self.data.len() {
                frame.copy_from_slice(&self.data[*cursor..*cursor + FRAME_BYTES]);
                *cursor += FRAME_BYTES;
            } else {
                frame.fill(0);
            }
        }
        *cursor - start
    }

    /// Fills the output with 16-bit samples. Samples past the end are silence.
    /// Returns the number of samples copied from the sample data.
    pub fn fill_frames(&self, out: &mut [i16]) -> usize {
        let mut cursor = self.cursor.lock();
        let start = *cursor;
        for sample in out.iter_mut() {
            if *cursor < self.data.len() {
                *sample = i16::from_le_bytes([self.data[*cursor], self.data[*cursor + 1]]);
                *cursor += FRAME_BYTES;
            } else {
                *sample = 0;
            }
        }
        (*cursor - start) / FRAME_BYTES
    }
}

impl std::fmt::Debug for SampleStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleStream")
            .field("len", &self.data.len())
            .field("cursor", &self.cursor())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use std::thread;

    use super::*;

    /// Frames hold their 1-based index so torn or out of order reads are visible.
    fn indexed_stream(frames: u16) -> SampleStream {
        SampleStream::new((1..=frames).flat_map(|i| i.to_le_bytes()).collect())
    }

    #[test]
    fn test_new_stream_is_silent_until_rewound() {
        let stream = SampleStream::new(vec![1, 2, 3, 4]);
        assert!(stream.is_exhausted());

        let mut out = [0xffu8; 4];
        assert_eq!(0, stream.fill_bytes(&mut out));
        assert_eq!([0, 0, 0, 0], out);
    }

    #[test]
    fn test_odd_trailing_byte_is_dropped() {
        let stream = SampleStream::new(vec![1, 2, 3]);
        assert_eq!(2, stream.len());
        assert!(!stream.is_empty());
        assert!(SampleStream::new(vec![9]).is_empty());
    }

    #[test]
    fn test_pull_reproduces_data_then_silence() {
        let data: Vec<u8> = (0..64).collect();
        let stream = SampleStream::new(data.clone());
        stream.rewind();
        assert_eq!(0, stream.cursor());

        // Pull in uneven chunks.
        let mut pulled = Vec::new();
        for size in [6, 10, 2, 30, 16] {
            let mut out = vec![0xffu8; size];
            stream.fill_bytes(&mut out);
            pulled.extend_from_slice(&out);
        }
        assert_eq!(data, pulled);
        assert!(stream.is_exhausted());

        for _ in 0..3 {
            let mut out = [0xffu8; 8];
            assert_eq!(0, stream.fill_bytes(&mut out));
            assert_eq!([0u8; 8], out);
        }
        assert_eq!(64, stream.cursor());
    }

    #[test]
    fn test_pull_pads_partial_buffer_with_silence() {
        let stream = SampleStream::new(vec![1, 2, 3, 4]);
        stream.rewind();

        let mut out = [0xffu8; 7];
        assert_eq!(4, stream.fill_bytes(&mut out));
        assert_eq!([1, 2, 3, 4, 0, 0, 0], out);
    }

    #[test]
    fn test_fill_frames_decodes_little_endian() {
        let stream = SampleStream::new(vec![0x01, 0x00, 0xff, 0xff, 0x00, 0x80]);
        stream.rewind();

        let mut out = [7i16; 5];
        assert_eq!(3, stream.fill_frames(&mut out));
        assert_eq!([1, -1, i16::MIN, 0, 0], out);
    }

    #[test]
    fn test_rewind_restarts_mid_playback() {
        let stream = indexed_stream(8);
        stream.rewind();

        let mut out = [0i16; 3];
        stream.fill_frames(&mut out);
        assert_eq!([1, 2, 3], out);

        stream.rewind();
        assert_eq!(0, stream.cursor());
        stream.rewind();
        assert_eq!(0, stream.cursor());

        stream.fill_frames(&mut out);
        assert_eq!([1, 2, 3], out);
    }

    #[test]
    fn test_concurrent_rewind_and_pull() {
        const FRAMES: u16 = 512;
        let stream = Arc::new(indexed_stream(FRAMES));
        let done = Arc::new(AtomicBool::new(false));
        stream.rewind();

        let puller = {
            let stream = stream.clone();
            let done = done.clone();
            thread::spawn(move || {
                let mut played = Vec::new();
                let mut out = [0i16; 7];
                while !done.load(Ordering::Relaxed) {
                    stream.fill_frames(&mut out);
                    played.extend_from_slice(&out);
                }
                played
            })
        };

        for _ in 0..2000 {
            stream.rewind();
            thread::yield_now();
        }
        done.store(true, Ordering::Relaxed);
        let played = puller.join().expect("puller panicked");

        // Playback only ever moves forward one frame at a time, restarts from the
        // first frame, or goes silent after the last frame.
        let mut previous = 0i16;
        for &frame in played.iter() {
            let valid = frame == previous + 1
                || frame == 1
                || (frame == 0 && (previous == 0 || previous == FRAMES as i16));
            assert!(valid, "frame {} followed {}", frame, previous);
            previous = frame;
        }
    }
}
