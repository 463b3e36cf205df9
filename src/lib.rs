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

// ----- Crates -----

#[macro_use]
extern crate log;

// ----- Modules -----

/// device access: evdev nodes, udev enumeration and the virtual device
pub mod device;

/// keymap table dump formatting
pub mod display;

/// sparse keymap table and key capability bitmap
pub mod keymap;

/// logging setup
pub mod logging;

/// command line `[index:]scancode=keycode` arguments
pub mod mapping;

/// keycode name lookup table
pub mod names;

/// shared per-device keymap state
pub mod session;

/// Compile time information
pub mod built_info {
    // This file is generated at build time using build.rs
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
