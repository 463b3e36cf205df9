/* Copyright (C) 2021-2022 by Jacob Alexander
 *
 * This file is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This file is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this file.  If not, see <http://www.gnu.org/licenses/>.
 */

#[macro_use]
extern crate log;

use clap::{App, Arg, ArgMatches};
use evmap::device::KeymapDevice;
use evmap::display::scancode_hex;
use evmap::{built_info, display, logging, mapping, names};
use std::io;

// ----- Enumerations -----

/// Options are processed in command line order and can be repeated
enum Action<'a> {
    Print,
    Set(&'a str),
}

// ----- Functions -----

/// Main entry point
fn main() {
    // Setup logging mechanism
    logging::setup_logging_lite().ok();

    // Process command-line arguments
    // Most of the information is generated from Cargo.toml using built crate (build.rs)
    let version_info = format!("{} - {}", built_info::PKG_VERSION, built_info::PROFILE);
    let about_info = format!("\n{}", built_info::PKG_DESCRIPTION);
    let after_info = format!(
        "{} ({}) -> {}",
        built_info::RUSTC_VERSION,
        built_info::HOST,
        built_info::TARGET,
    );
    let mut app = App::new(built_info::PKG_NAME)
        .version(version_info.as_str())
        .author(built_info::PKG_AUTHORS)
        .about(about_info.as_str())
        .after_help(after_info.as_str())
        .arg(
            Arg::with_name("device")
                .short("d")
                .long("device")
                .value_name("PATH")
                .takes_value(true)
                .help("Select the input device (e.g. /dev/input/event8)"),
        )
        .arg(
            Arg::with_name("print")
                .short("p")
                .long("print")
                .multiple(true)
                .help("Print the current map (columns: index scancode keycode name)"),
        )
        .arg(
            Arg::with_name("set")
                .short("s")
                .long("set")
                .value_name("[INDEX:]SCANCODE=KEYCODE")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("Change the mapping for a scancode (key names work too; use 0x0 to disable a key)"),
        )
        .arg(
            Arg::with_name("list")
                .short("l")
                .long("list")
                .help("List evdev devices"),
        );
    let matches = app.clone().get_matches();

    // Rebuild the command line order; -p and -s can be repeated and take
    // effect in the order given
    let mut actions: Vec<(usize, Action)> = vec![];
    if let (Some(indices), Some(values)) = (matches.indices_of("set"), matches.values_of("set")) {
        actions.extend(indices.zip(values).map(|(index, arg)| (index, Action::Set(arg))));
    }
    if let Some(indices) = matches.indices_of("print") {
        actions.extend(indices.map(|index| (index, Action::Print)));
    }
    actions.sort_by_key(|(index, _)| *index);

    if actions.is_empty() && !matches.is_present("list") {
        app.write_help(&mut io::stderr()).ok();
        eprintln!();
        std::process::exit(1);
    }

    if let Err(err) = run(&matches, &actions) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches, actions: &[(usize, Action)]) -> io::Result<()> {
    if matches.is_present("list") {
        list_devices()?;
    }

    let mut device = match matches.value_of("device") {
        Some(fd_path) => Some(open_device(fd_path)?),
        None => None,
    };

    for (_, action) in actions {
        let device = device
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No device opened"))?;
        match action {
            Action::Print => {
                let stdout = io::stdout();
                display::write_keymap(device.as_ref(), &mut stdout.lock())?;
            }
            Action::Set(arg) => {
                let update = mapping::parse_mapping(arg)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
                let previous = device.set_keymap_entry(&update)?;
                info!(
                    "{} => {:#x} {} (was {:#x} {})",
                    scancode_hex(&update.scancode),
                    update.keycode,
                    names::key_name(update.keycode).unwrap_or("?"),
                    previous,
                    names::key_name(previous).unwrap_or("?"),
                );
            }
        }
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn open_device(fd_path: &str) -> io::Result<Box<dyn KeymapDevice>> {
    Ok(Box::new(evmap::device::evdev::EvdevDevice::open(fd_path)?))
}

#[cfg(not(target_os = "linux"))]
fn open_device(_fd_path: &str) -> io::Result<Box<dyn KeymapDevice>> {
    Err(io::Error::new(
        io::ErrorKind::Other,
        "evdev devices are only available on Linux",
    ))
}

#[cfg(target_os = "linux")]
fn list_devices() -> io::Result<()> {
    for (fd_path, identity) in evmap::device::evdev::list_devices()? {
        println!("{fd_path}  {identity}");
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn list_devices() -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Other,
        "evdev devices are only available on Linux",
    ))
}
