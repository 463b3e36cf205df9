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

use crate::device::KeymapDevice;
use crate::keymap::{EntrySelector, WIRE_SCANCODE_MAX};
use crate::names;
use std::io::{self, Write};

// ----- Consts -----

/// Indices are 16 bit on the wire, so the table cannot be longer than this
const INDEX_LIMIT: u32 = 0x10000;

// ----- Functions -----

/// Hex form of a wire scancode, most significant byte first
pub fn scancode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    if cfg!(target_endian = "little") {
        for byte in bytes.iter().rev() {
            out.push_str(&format!("{byte:02x}"));
        }
    } else {
        for byte in bytes.iter() {
            out.push_str(&format!("{byte:02x}"));
        }
    }
    out
}

/// Dump a device's keymap as `index scancode keycode name` rows
///
/// Walks the table by index until the device reports the end. The device's
/// answers are cross-checked: the echoed index must match the requested one
/// and the reported scancode must fit the request form.
pub fn write_keymap<W: Write>(device: &dyn KeymapDevice, out: &mut W) -> io::Result<()> {
    writeln!(out, "{:>5} {:>8} {:>10} {}", "index", "scancode", "keycode", "name")?;

    for index in 0..INDEX_LIMIT {
        let report = match device.keymap_entry(&EntrySelector::ByIndex(index as u16)) {
            Ok(report) => report,
            // The kernel answers EINVAL past the last entry
            Err(err)
                if err.kind() == io::ErrorKind::NotFound
                    || err.kind() == io::ErrorKind::InvalidInput =>
            {
                break;
            }
            Err(err) => return Err(err),
        };

        if u32::from(report.index) != index {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("inconsistent table: index {} != {}", report.index, index),
            ));
        }
        if report.scancode.len() > WIRE_SCANCODE_MAX {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("inconsistent table: scancode length {}", report.scancode.len()),
            ));
        }

        let keycode = if report.keycode == 0 {
            "0".to_string()
        } else {
            format!("{:#x}", report.keycode)
        };
        writeln!(
            out,
            "{:>5} {:>8} {:>10} {}",
            report.index,
            scancode_hex(&report.scancode),
            keycode,
            names::key_name(report.keycode).unwrap_or("?"),
        )?;
    }
    out.flush()
}

// ----- Tests -----
