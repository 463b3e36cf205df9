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
use crate::keymap::{EntryReport, EntrySelector, EntryUpdate, SparseKeymap};
use crate::session::KeymapSession;

// ----- Structs -----

/// In-process keymap device
///
/// Same request/response surface as a real evdev node, resolved against a
/// keymap session instead of the kernel. Used by tests and by consumers that
/// want the remap semantics without hardware.
pub struct VirtualDevice {
    name: String,
    session: KeymapSession,
}

impl VirtualDevice {
    pub fn new(name: &str, session: KeymapSession) -> VirtualDevice {
        VirtualDevice {
            name: name.to_string(),
            session,
        }
    }

    pub fn with_keymap(name: &str, keymap: SparseKeymap) -> VirtualDevice {
        VirtualDevice::new(name, KeymapSession::new(keymap))
    }

    /// Shared handle to the underlying keymap
    pub fn session(&self) -> KeymapSession {
        self.session.clone()
    }
}

impl KeymapDevice for VirtualDevice {
    fn identity(&self) -> String {
        format!("[virt] {}", self.name)
    }

    fn keymap_entry(&self, selector: &EntrySelector) -> std::io::Result<EntryReport> {
        Ok(self.session.get_keycode(selector)?)
    }

    fn set_keymap_entry(&mut self, update: &EntryUpdate) -> std::io::Result<u32> {
        Ok(self.session.set_keycode(update)?)
    }
}

// ----- Tests -----

#[cfg(test)]
mod test {
    use super::*;
    use crate::keymap::KeyEntry;
    use crate::logging::setup_logging_lite;

    /// Core errors surface with the io error kinds the display loop and the
    /// evdev provider agree on
    #[test]
    fn error_kind_mapping_test() {
        setup_logging_lite().ok();

        let mut device = VirtualDevice::with_keymap(
            "test-keyboard",
            SparseKeymap::new(vec![KeyEntry::key(0xe005, 224)]),
        );

        let err = device
            .keymap_entry(&EntrySelector::ByIndex(1))
            .unwrap_err();
        assert!(err.kind() == std::io::ErrorKind::NotFound);

        let err = device
            .set_keymap_entry(&EntryUpdate {
                selector: EntrySelector::ByIndex(0),
                scancode: vec![0; 5],
                keycode: 225,
            })
            .unwrap_err();
        assert!(err.kind() == std::io::ErrorKind::InvalidInput);

        // The write path still works through the device surface
        let previous = device
            .set_keymap_entry(&EntryUpdate {
                selector: EntrySelector::ByIndex(0),
                scancode: 0xe005u32.to_ne_bytes().to_vec(),
                keycode: 225,
            })
            .unwrap();
        assert!(previous == 224);
        assert!(device.session().snapshot().keybits().test(225));
    }
}
