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

use crate::keymap::{EntryReport, EntrySelector, EntryUpdate, KeymapError, SparseKeymap};
use std::sync::{Arc, RwLock};

// ----- Structs -----

/// Shared handle to one device's keymap
///
/// Owns the table and its capability bits as a single unit behind one
/// reader/writer lock. Each get or set holds the lock for its whole extent,
/// so a reader can never observe an entry whose capability bits have not
/// been reconciled yet.
///
/// This struct can be safely cloned and passed around; clones share the same
/// underlying keymap.
#[derive(Clone, Debug)]
pub struct KeymapSession {
    keymap: Arc<RwLock<SparseKeymap>>,
}

impl KeymapSession {
    pub fn new(keymap: SparseKeymap) -> KeymapSession {
        KeymapSession {
            keymap: Arc::new(RwLock::new(keymap)),
        }
    }

    /// Look up one entry
    pub fn get_keycode(&self, selector: &EntrySelector) -> Result<EntryReport, KeymapError> {
        self.keymap.read().unwrap().get_keycode(selector)
    }

    /// Replace one entry, returning the keycode it previously mapped to
    pub fn set_keycode(&self, update: &EntryUpdate) -> Result<u32, KeymapError> {
        self.keymap.write().unwrap().set_keycode(update)
    }

    /// Number of reachable entries
    pub fn len(&self) -> usize {
        self.keymap.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keymap.read().unwrap().is_empty()
    }

    /// Copy of the current table and capability bits
    pub fn snapshot(&self) -> SparseKeymap {
        self.keymap.read().unwrap().clone()
    }
}

// ----- Tests -----

#[cfg(test)]
mod test {
    use super::*;
    use crate::keymap::{EntryKind, KeyEntry, KEY_RESERVED};
    use crate::logging::setup_logging_lite;

    const KEY_VOLUMEDOWN: u32 = 114;
    const KEY_VOLUMEUP: u32 = 115;

    /// A write through one clone is visible to reads through another
    #[test]
    fn clone_visibility_test() {
        setup_logging_lite().ok();

        let session = KeymapSession::new(SparseKeymap::new(vec![KeyEntry::key(
            0xe030,
            KEY_VOLUMEUP,
        )]));
        let reader = session.clone();

        session
            .set_keycode(&EntryUpdate {
                selector: EntrySelector::ByIndex(0),
                scancode: 0xe030u32.to_ne_bytes().to_vec(),
                keycode: KEY_VOLUMEDOWN,
            })
            .unwrap();

        let report = reader.get_keycode(&EntrySelector::ByIndex(0)).unwrap();
        assert!(report.keycode == KEY_VOLUMEDOWN);
        assert!(reader.snapshot().keybits().test(KEY_VOLUMEDOWN));
        assert!(!reader.snapshot().keybits().test(KEY_VOLUMEUP));
    }

    /// Concurrent suppress/revive cycles against aliasing entries never leave
    /// the capability bits torn
    #[test]
    fn threaded_consistency_test() {
        setup_logging_lite().ok();

        let session = KeymapSession::new(SparseKeymap::new(vec![
            KeyEntry::key(0xe030, KEY_VOLUMEUP),
            KeyEntry::key(0xe0f9, KEY_VOLUMEUP),
        ]));

        let mut handles = vec![];
        for index in 0..2u16 {
            let session = session.clone();
            handles.push(std::thread::spawn(move || {
                for round in 0..200u32 {
                    let keycode = if round % 2 == 0 {
                        KEY_RESERVED
                    } else {
                        KEY_VOLUMEUP
                    };
                    session
                        .set_keycode(&EntryUpdate {
                            selector: EntrySelector::ByIndex(index),
                            scancode: vec![],
                            keycode,
                        })
                        .unwrap();

                    // Snapshot under a single read lock and check it is
                    // internally consistent
                    let snapshot = session.snapshot();
                    let live = snapshot
                        .entries()
                        .iter()
                        .any(|entry| {
                            entry.kind == EntryKind::Key && entry.keycode == KEY_VOLUMEUP
                        });
                    assert!(snapshot.keybits().test(KEY_VOLUMEUP) == live);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
