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
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, error, info, span, Level};

use crate::audio::SampleFormat;
use crate::samples::SampleStream;

/// A small wrapper around a cpal::Device. Every sound gets its own output
/// stream on this device.
pub struct Backend {
    /// The name of the device.
    name: String,
    /// The host ID of the device.
    host_id: cpal::HostId,
    /// The underlying cpal device.
    device: cpal::Device,
    /// The sample format the device prefers. Sample data is converted to it.
    sample_format: cpal::SampleFormat,
    /// Fixed stream buffer size in frames. None lets cpal choose.
    buffer_size: Option<u32>,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?}) ({})",
            self.name,
            self.sample_format,
            self.host_id.name()
        )
    }
}

impl Backend {
    /// Lists the output devices of every available host.
    pub fn list() -> Result<Vec<String>, Box<dyn Error>> {
        // Suppress noisy output here.
        let _shh_stdout = shh::stdout()?;
        let _shh_stderr = shh::stderr()?;

        let mut devices: Vec<String> = Vec::new();
        for host_id in cpal::available_hosts() {
            let host_devices = match cpal::host_from_id(host_id)?.output_devices() {
                Ok(host_devices) => host_devices,
                Err(e) => {
                    error!(
                        err = e.to_string(),
                        host = host_id.name(),
                        "Unable to list devices for host"
                    );
                    continue;
                }
            };

            for device in host_devices {
                let max_channels = match device.supported_output_configs() {
                    Ok(configs) => configs.map(|config| config.channels()).max().unwrap_or(0),
                    Err(_) => continue,
                };

                if max_channels > 0 {
                    devices.push(format!(
                        "{} (Channels={}) ({})",
                        device.name()?,
                        max_channels,
                        host_id.name()
                    ));
                }
            }
        }

        devices.sort();
        Ok(devices)
    }

    /// Gets the named cpal output device. "default" is the default output
    /// device of the default host.
    pub fn get(name: &str, buffer_size: Option<u32>) -> Result<Backend, Box<dyn Error>> {
        let (host_id, device) = if name == "default" {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or("no default output device")?;
            (host.id(), device)
        } else {
            Backend::find(name)?.ok_or_else(|| format!("no device found with name {}", name))?
        };

        let sample_format = device.default_output_config()?.sample_format();
        let backend = Backend {
            name: device.name()?,
            host_id,
            device,
            sample_format,
            buffer_size,
        };
        info!(device = %backend, "Using audio device.");
        Ok(backend)
    }

    fn find(name: &str) -> Result<Option<(cpal::HostId, cpal::Device)>, Box<dyn Error>> {
        let _shh_stderr = shh::stderr()?;

        for host_id in cpal::available_hosts() {
            let Ok(mut devices) = cpal::host_from_id(host_id)?.output_devices() else {
                continue;
            };
            let found = devices.find(|device| {
                device
                    .name()
                    .map(|device_name| device_name.trim() == name)
                    .unwrap_or(false)
            });
            if let Some(device) = found {
                return Ok(Some((host_id, device)));
            }
        }
        Ok(None)
    }

    fn stream_config(&self, format: &SampleFormat) -> cpal::StreamConfig {
        cpal::StreamConfig {
            channels: format.channels,
            sample_rate: cpal::SampleRate(format.sample_rate),
            buffer_size: match self.buffer_size {
                Some(frames) => cpal::BufferSize::Fixed(frames),
                None => cpal::BufferSize::Default,
            },
        }
    }
}

impl crate::audio::Backend for Backend {
    /// Opens a stream on its own thread. cpal streams can't move between
    /// threads, so the thread owns the stream and takes commands over a channel.
    fn open(
        &self,
        label: &str,
        format: &SampleFormat,
        stream: Arc<SampleStream>,
    ) -> Result<Box<dyn crate::audio::Output>, Box<dyn Error>> {
        let config = self.stream_config(format);
        let device = self.device.clone();
        let sample_format = self.sample_format;
        let (command_tx, command_rx) = crossbeam_channel::unbounded::<Command>();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), String>>(1);

        let thread_label = label.to_string();
        let handle = thread::Builder::new()
            .name(format!("output {}", label))
            .spawn(move || {
                run_output(
                    thread_label,
                    device,
                    config,
                    sample_format,
                    stream,
                    command_rx,
                    ready_tx,
                )
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                debug!(label, %format, "Output opened.");
                Ok(Box::new(Output {
                    label: label.to_string(),
                    commands: command_tx,
                    paused: AtomicBool::new(true),
                    thread: Mutex::new(Some(handle)),
                }))
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e.into())
            }
            Err(_) => {
                let _ = handle.join();
                Err("output thread exited before the stream was built".into())
            }
        }
    }
}

/// Commands for the thread that owns a cpal stream.
enum Command {
    Resume,
    Pause,
    Close,
}

/// Builds the stream, reports whether that worked, then applies commands until
/// closed. Dropping the stream at the end stops the callback for good.
fn run_output(
    label: String,
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_format: cpal::SampleFormat,
    stream: Arc<SampleStream>,
    commands: Receiver<Command>,
    ready: Sender<Result<(), String>>,
) {
    let span = span!(Level::INFO, "output", label = label.as_str());
    let _enter = span.enter();

    let built = match sample_format {
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, stream),
        cpal::SampleFormat::I32 => build_stream::<i32>(&device, &config, stream),
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, stream),
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, stream),
        cpal::SampleFormat::F64 => build_stream::<f64>(&device, &config, stream),
        other => {
            let _ = ready.send(Err(format!("unsupported device sample format {:?}", other)));
            return;
        }
    };

    let output_stream = match built {
        Ok(output_stream) => output_stream,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    // Some hosts start streams as soon as they're built.
    if let Err(e) = output_stream.pause() {
        debug!(err = %e, "Unable to pause new stream");
    }
    if ready.send(Ok(())).is_err() {
        return;
    }

    for command in commands.iter() {
        let result = match command {
            Command::Resume => output_stream.play().map_err(|e| e.to_string()),
            Command::Pause => output_stream.pause().map_err(|e| e.to_string()),
            Command::Close => break,
        };
        if let Err(e) = result {
            error!(err = %e, "Unable to change output stream state");
        }
    }
    debug!("Output stream closed.");
}

/// Builds a stream whose callback pulls 16-bit frames from the sample stream
/// and converts them to the device format.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    stream: Arc<SampleStream>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<i16>,
{
    // Grown once to the device's period size, then reused.
    let mut scratch: Vec<i16> = Vec::new();
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            if scratch.len() < data.len() {
                scratch.resize(data.len(), 0);
            }
            let frames = &mut scratch[..data.len()];
            stream.fill_frames(frames);
            for (dst, &src) in data.iter_mut().zip(frames.iter()) {
                *dst = <T as cpal::Sample>::from_sample(src);
            }
        },
        |err| error!("CPAL output stream error: {}", err),
        None,
    )
}

/// An output stream owned by its own thread.
pub struct Output {
    label: String,
    commands: Sender<Command>,
    paused: AtomicBool,
    thread: Mutex<Option<thread::JoinHandle<()>>>,
}

impl crate::audio::Output for Output {
    fn resume(&self) -> Result<(), Box<dyn Error>> {
        self.commands
            .send(Command::Resume)
            .map_err(|_| format!("output {} is closed", self.label))?;
        self.paused.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn pause(&self) -> Result<(), Box<dyn Error>> {
        self.commands
            .send(Command::Pause)
            .map_err(|_| format!("output {} is closed", self.label))?;
        self.paused.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    fn close(&self) {
        let Some(thread) = self.thread.lock().take() else {
            return;
        };
        let _ = self.commands.send(Command::Close);
        if thread.join().is_err() {
            error!(label = self.label, "Output thread panicked");
        }
        self.paused.store(true, Ordering::Relaxed);
    }
}

impl Drop for Output {
    fn drop(&mut self) {
        crate::audio::Output::close(self);
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (cpal)", self.label)
    }
}
