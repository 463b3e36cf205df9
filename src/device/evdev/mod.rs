#![cfg(target_os = "linux")]
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
use crate::keymap::{EntryReport, EntrySelector, EntryUpdate, WIRE_SCANCODE_MAX};
use std::io;
use std::os::unix::io::AsRawFd;

// ----- Consts -----

/// `input_keymap_entry.flags`: look up by index instead of scancode
const INPUT_KEYMAP_BY_INDEX: u8 = 0x01;

const IOC_WRITE: libc::c_ulong = 1;
const IOC_READ: libc::c_ulong = 2;

/// `_IOC(dir, 'E', nr, sizeof(struct input_keymap_entry))`
const fn evioc(dir: libc::c_ulong, nr: libc::c_ulong) -> libc::c_ulong {
    (dir << 30)
        | ((std::mem::size_of::<RawKeymapEntry>() as libc::c_ulong) << 16)
        | ((b'E' as libc::c_ulong) << 8)
        | nr
}

const EVIOCGKEYCODE_V2: libc::c_ulong = evioc(IOC_READ, 0x04);
const EVIOCSKEYCODE_V2: libc::c_ulong = evioc(IOC_WRITE, 0x04);

// ----- Structs -----

/// `struct input_keymap_entry`, the keymap ioctl argument
#[repr(C)]
#[derive(Clone, Copy)]
struct RawKeymapEntry {
    flags: u8,
    len: u8,
    index: u16,
    keycode: u32,
    scancode: [u8; WIRE_SCANCODE_MAX],
}

impl Default for RawKeymapEntry {
    fn default() -> RawKeymapEntry {
        RawKeymapEntry {
            flags: 0,
            len: 0,
            index: 0,
            keycode: 0,
            scancode: [0; WIRE_SCANCODE_MAX],
        }
    }
}

impl RawKeymapEntry {
    /// Fill in the selector half of the request
    fn select(selector: &EntrySelector) -> io::Result<RawKeymapEntry> {
        let mut ke = RawKeymapEntry::default();
        match selector {
            EntrySelector::ByIndex(index) => {
                ke.flags = INPUT_KEYMAP_BY_INDEX;
                ke.index = *index;
            }
            EntrySelector::ByScancode(bytes) => {
                ke.set_scancode(bytes)?;
            }
        }
        Ok(ke)
    }

    fn set_scancode(&mut self, bytes: &[u8]) -> io::Result<()> {
        if bytes.len() > self.scancode.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "scancode is {} bytes, request form carries {}",
                    bytes.len(),
                    self.scancode.len()
                ),
            ));
        }
        self.len = bytes.len() as u8;
        self.scancode[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

/// One opened evdev device node
///
/// The keymap ioctls go straight to the file descriptor; the evdev handle is
/// only used for identity queries. Read-only access is enough for both
/// directions, the keymap ioctls do not require write permission.
pub struct EvdevDevice {
    fd_path: String,
    file: std::fs::File,
    device: evdev_rs::Device,
}

impl EvdevDevice {
    pub fn open(fd_path: &str) -> io::Result<EvdevDevice> {
        let file = std::fs::File::open(fd_path)?;

        // Initialize an evdev handle on a duplicate fd for metadata queries
        let mut device = match evdev_rs::Device::new() {
            Some(device) => device,
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    "Could not create evdev device",
                ));
            }
        };
        device.set_fd(file.try_clone()?).map_err(|err| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("{fd_path} is not an evdev device: {err:?}"),
            )
        })?;

        debug!("Opened {} {}", fd_path, device_name(&device));
        Ok(EvdevDevice {
            fd_path: fd_path.to_string(),
            file,
            device,
        })
    }

    pub fn fd_path(&self) -> &str {
        &self.fd_path
    }

    fn ioctl(&self, request: libc::c_ulong, ke: &mut RawKeymapEntry) -> io::Result<()> {
        let ret = unsafe { libc::ioctl(self.file.as_raw_fd(), request, ke as *mut RawKeymapEntry) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl KeymapDevice for EvdevDevice {
    fn identity(&self) -> String {
        device_name(&self.device)
    }

    fn keymap_entry(&self, selector: &EntrySelector) -> io::Result<EntryReport> {
        let mut ke = RawKeymapEntry::select(selector)?;
        self.ioctl(EVIOCGKEYCODE_V2, &mut ke)?;

        let len = (ke.len as usize).min(ke.scancode.len());
        Ok(EntryReport {
            index: ke.index,
            scancode: ke.scancode[..len].to_vec(),
            keycode: ke.keycode,
        })
    }

    fn set_keymap_entry(&mut self, update: &EntryUpdate) -> io::Result<u32> {
        // The ioctl replaces without reporting what it replaced, so read the
        // entry first
        let previous = self.keymap_entry(&update.selector)?.keycode;

        let mut ke = RawKeymapEntry::select(&update.selector)?;
        // The scancode field doubles as the replacement; a by-scancode
        // selector and the replacement are the same bytes on the wire
        ke.set_scancode(&update.scancode)?;
        ke.keycode = update.keycode;
        self.ioctl(EVIOCSKEYCODE_V2, &mut ke)?;

        Ok(previous)
    }
}

// ----- Functions -----

/// Build a unique device name string
fn device_name(device: &evdev_rs::Device) -> String {
    format!(
        "[{:04x}:{:04x}-{:?}] {} {} {}",
        device.vendor_id(),
        device.product_id(),
        evdev_rs::enums::int_to_bus_type(device.bustype() as u32),
        device.name().unwrap_or(""),
        device.phys().unwrap_or(""),
        device.uniq().unwrap_or(""),
    )
}

/// Scan for evdev nodes using udev
///
/// Returns `(node path, identity)` pairs for every `/dev/input/event*`
/// device. Nodes that cannot be opened (usually missing privileges) are
/// still listed, with the error standing in for the identity.
pub fn list_devices() -> io::Result<Vec<(String, String)>> {
    let mut enumerator = udev::Enumerator::new()?;
    enumerator.match_subsystem("input")?;

    let mut nodes = vec![];
    for device in enumerator.scan_devices()? {
        let sysname = device.sysname().to_str().unwrap_or("").to_string();
        if !sysname.starts_with("event") {
            continue;
        }
        let fd_path = format!("/dev/input/{sysname}");
        let identity = match EvdevDevice::open(&fd_path) {
            Ok(device) => device.identity(),
            Err(err) => format!("<{err}>"),
        };
        nodes.push((fd_path, identity));
    }
    nodes.sort();
    Ok(nodes)
}

// ----- Tests -----

#[cfg(test)]
mod test {
    use super::*;
    use crate::logging::setup_logging_lite;

    /// Request codes must match the kernel ABI
    #[test]
    fn ioctl_request_codes_test() {
        assert!(std::mem::size_of::<RawKeymapEntry>() == 40);
        assert!(EVIOCGKEYCODE_V2 == 0x8028_4504);
        assert!(EVIOCSKEYCODE_V2 == 0x4028_4504);
    }

    /// Needs an actual input device and the privileges to open it
    #[test]
    #[ignore]
    fn local_devices_test() {
        setup_logging_lite().ok();

        let nodes = list_devices().unwrap();
        for (fd_path, identity) in &nodes {
            info!("{} {}", fd_path, identity);
        }
        assert!(!nodes.is_empty());
    }
}
