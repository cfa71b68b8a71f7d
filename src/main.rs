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
mod audio;
mod config;
mod controller;
mod dispatch;
mod input;
mod kit;
mod layout;
mod playback;
mod samples;
mod session;
#[cfg(test)]
mod testutil;

use std::error::Error;

use clap::{crate_version, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::dispatch::Dispatcher;
use crate::layout::Layouts;
use crate::playback::PlaybackController;
use crate::session::Session;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Plays drum samples from a game controller or the keyboard.",
    allow_negative_numbers = true
)]
struct Cli {
    /// The index of the controller to play with. A negative index plays with
    /// the keyboard. Without an index, lists audio devices and controllers.
    controller: Option<i32>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let Some(index) = cli.controller else {
        return list();
    };

    let settings = config::Settings::load()?;
    let backend = audio::get_backend(&settings)?;
    let controller = PlaybackController::new(samples::load_kit(&settings, backend.as_ref()));

    let mut driver = match controller::open(index) {
        Ok(driver) => driver,
        Err(e) => {
            controller.stop_all();
            return Err(e.into());
        }
    };

    Session::new(Dispatcher::new(Layouts::builtin()), controller).run(driver.as_mut())?;

    // Restores the terminal if the keyboard was in use.
    drop(driver);
    info!("Done.");
    Ok(())
}

/// Prints the audio devices and controllers that can be played with.
fn list() -> Result<(), Box<dyn Error>> {
    let devices = audio::list_devices()?;
    if devices.is_empty() {
        println!("No audio devices found.");
    } else {
        println!("Audio devices:");
        for device in devices {
            println!("- {}", device);
        }
    }

    let controllers = controller::gamepad::list_controllers()?;
    if controllers.is_empty() {
        println!("No controllers found.");
    } else {
        println!("Controllers:");
        for controller in controllers {
            println!("- {}", controller);
        }
    }
    Ok(())
}
