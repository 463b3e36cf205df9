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

// ----- Modules -----

/// evdev devices, keymap ioctls and udev enumeration
#[cfg(target_os = "linux")]
pub mod evdev;

/// in-process device backed by a keymap session
pub mod virt;

// ----- Crates -----

use crate::keymap::{EntryReport, EntrySelector, EntryUpdate};

// ----- Traits -----

/// A device whose sparse keymap can be read and rewritten
///
/// # Remarks
/// One get/set contract independent of transport: the evdev provider
/// forwards requests to the kernel table through ioctls, the virtual
/// provider resolves them against an in-process keymap session. Selectors
/// that resolve to nothing surface as `ErrorKind::NotFound` or
/// `ErrorKind::InvalidInput` (the kernel reports both as EINVAL).
pub trait KeymapDevice {
    /// Human readable identity for listings and logs
    fn identity(&self) -> String;

    /// Look up one entry by index or scancode
    fn keymap_entry(&self, selector: &EntrySelector) -> std::io::Result<EntryReport>;

    /// Replace one entry, returning the keycode it previously mapped to
    fn set_keymap_entry(&mut self, update: &EntryUpdate) -> std::io::Result<u32>;
}
