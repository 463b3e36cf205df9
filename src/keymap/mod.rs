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

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

// ----- Modules -----

#[cfg(test)]
mod test;

// ----- Consts -----

/// Keycode meaning "no function"
pub const KEY_RESERVED: u32 = 0;

/// Largest valid keycode
pub const KEY_MAX: u32 = 0x2ff;

/// Number of keycodes (and capability bits)
pub const KEY_CNT: usize = (KEY_MAX + 1) as usize;

/// Per-entry scancode storage, in bytes
/// Scancodes are stored as a scalar; anything longer cannot be represented
pub const SCANCODE_CAPACITY: usize = std::mem::size_of::<u32>();

/// Largest scancode the request form can carry, in bytes
pub const WIRE_SCANCODE_MAX: usize = 32;

// ----- Enumerations -----

/// Keymap entry kinds
///
/// # Remarks
/// Values match the kernel sparse keymap entry types so entries can round
/// trip through the evdev provider unchanged. Only `Key` and `Ignore` are
/// interpreted here; `Switch` and `VirtualSwitch` pass through untouched.
#[repr(u8)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, IntoPrimitive, TryFromPrimitive)]
pub enum EntryKind {
    /// Table terminator sentinel
    End = 0,
    /// Live mapping, advertised through the key capability bits
    Key = 1,
    /// Switch entry, opaque to the keymap
    Switch = 2,
    /// Virtual switch entry, opaque to the keymap
    VirtualSwitch = 3,
    /// Suppressed mapping, retained but not advertised
    Ignore = 4,
}

/// Errors for keymap get/set operations
///
/// All conditions are local and recoverable; the table and capability bits
/// are untouched whenever one of these is returned.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum KeymapError {
    /// Selector did not resolve to an entry
    NotFound,
    /// Replacement scancode does not fit the entry storage
    InvalidScancodeLength,
    /// Requested keycode is outside the keycode space
    InvalidKeycode,
}

impl fmt::Display for KeymapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeymapError::NotFound => write!(f, "no matching keymap entry"),
            KeymapError::InvalidScancodeLength => {
                write!(f, "scancode does not fit the entry storage")
            }
            KeymapError::InvalidKeycode => write!(f, "keycode is out of range"),
        }
    }
}

impl std::error::Error for KeymapError {}

impl From<KeymapError> for std::io::Error {
    fn from(err: KeymapError) -> std::io::Error {
        let kind = match err {
            KeymapError::NotFound => std::io::ErrorKind::NotFound,
            _ => std::io::ErrorKind::InvalidInput,
        };
        std::io::Error::new(kind, err.to_string())
    }
}

/// Entry selector used by get and set requests
///
/// `ByScancode` carries the wire form of the scancode (explicit length, up to
/// [`WIRE_SCANCODE_MAX`] bytes, native byte order).
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum EntrySelector {
    ByIndex(u16),
    ByScancode(Vec<u8>),
}

// ----- Structs -----

/// One scancode to keycode mapping
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct KeyEntry {
    pub kind: EntryKind,
    /// Scancode scalar, device defined width
    pub code: u32,
    pub keycode: u32,
}

impl KeyEntry {
    pub fn key(code: u32, keycode: u32) -> KeyEntry {
        KeyEntry {
            kind: EntryKind::Key,
            code,
            keycode,
        }
    }

    pub fn ignore(code: u32, keycode: u32) -> KeyEntry {
        KeyEntry {
            kind: EntryKind::Ignore,
            code,
            keycode,
        }
    }

    pub fn end() -> KeyEntry {
        KeyEntry {
            kind: EntryKind::End,
            code: 0,
            keycode: KEY_RESERVED,
        }
    }
}

/// Result of a get request
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct EntryReport {
    /// Ordinal the entry was found at
    pub index: u16,
    /// Stored scancode at full entry width, native byte order
    pub scancode: Vec<u8>,
    pub keycode: u32,
}

/// Set request: replace one entry's scancode, keycode and kind
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct EntryUpdate {
    pub selector: EntrySelector,
    /// Replacement scancode, explicit length, native byte order
    pub scancode: Vec<u8>,
    pub keycode: u32,
}

/// Key capability bits, one per keycode
///
/// Derived state: bit `k` is set iff at least one `Key` entry currently maps
/// to keycode `k`. Kept consistent by [`SparseKeymap::set_keycode`].
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct KeyBitmap {
    words: [u64; KEY_CNT / 64],
}

impl KeyBitmap {
    pub fn new() -> KeyBitmap {
        KeyBitmap {
            words: [0; KEY_CNT / 64],
        }
    }

    fn slot(keycode: u32) -> Option<(usize, u32)> {
        if keycode <= KEY_MAX {
            Some(((keycode / 64) as usize, keycode % 64))
        } else {
            None
        }
    }

    pub fn set(&mut self, keycode: u32) {
        if let Some((word, bit)) = KeyBitmap::slot(keycode) {
            self.words[word] |= 1 << bit;
        }
    }

    pub fn clear(&mut self, keycode: u32) {
        if let Some((word, bit)) = KeyBitmap::slot(keycode) {
            self.words[word] &= !(1 << bit);
        }
    }

    pub fn test(&self, keycode: u32) -> bool {
        match KeyBitmap::slot(keycode) {
            Some((word, bit)) => self.words[word] & (1 << bit) != 0,
            None => false,
        }
    }
}

impl Default for KeyBitmap {
    fn default() -> KeyBitmap {
        KeyBitmap::new()
    }
}

/// Sparse keymap table plus its derived key capability bits
///
/// # Remarks
/// The table is fixed-shape for its whole lifetime: entries are replaced in
/// place, never inserted or removed, so ordinals are stable. An `End` entry
/// terminates every scan; anything stored after it is unreachable. All
/// lookups use linear scan order with the first match winning, which is what
/// makes duplicate scancodes meaningful (the earliest one is authoritative
/// for lookups, later ones stay reachable by index).
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SparseKeymap {
    entries: Vec<KeyEntry>,
    keybits: KeyBitmap,
}

impl SparseKeymap {
    /// Build a keymap from a device's entry table, deriving the capability
    /// bits from its `Key` entries
    pub fn new(entries: Vec<KeyEntry>) -> SparseKeymap {
        let mut keymap = SparseKeymap {
            entries,
            keybits: KeyBitmap::new(),
        };
        for pos in 0..keymap.live_len() {
            let entry = keymap.entries[pos];
            if entry.kind == EntryKind::Key {
                keymap.keybits.set(entry.keycode);
            }
        }
        keymap
    }

    fn live_len(&self) -> usize {
        self.entries
            .iter()
            .position(|entry| entry.kind == EntryKind::End)
            .unwrap_or(self.entries.len())
    }

    /// Reachable entries, in table order
    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries[..self.live_len()]
    }

    pub fn len(&self) -> usize {
        self.live_len()
    }

    pub fn is_empty(&self) -> bool {
        self.live_len() == 0
    }

    pub fn keybits(&self) -> &KeyBitmap {
        &self.keybits
    }

    /// Entry at the given ordinal
    pub fn entry_by_index(&self, index: u16) -> Option<&KeyEntry> {
        self.entries().get(index as usize)
    }

    /// First entry matching the scancode, in table order
    pub fn entry_from_scancode(&self, code: u32) -> Option<&KeyEntry> {
        self.entries().iter().find(|entry| entry.code == code)
    }

    /// First `Key` entry mapping the given keycode
    ///
    /// Used by the capability reconciliation re-scan after a set: the old
    /// keycode's bit may only drop once no entry justifies it anymore.
    pub fn entry_from_keycode(&self, keycode: u32) -> Option<&KeyEntry> {
        self.entries()
            .iter()
            .find(|entry| entry.kind == EntryKind::Key && entry.keycode == keycode)
    }

    /// Resolve a selector to an entry position
    fn position(&self, selector: &EntrySelector) -> Option<usize> {
        match selector {
            EntrySelector::ByIndex(index) => {
                let index = *index as usize;
                if index < self.live_len() {
                    Some(index)
                } else {
                    None
                }
            }
            EntrySelector::ByScancode(bytes) => {
                let code = scancode_to_scalar(bytes)?;
                self.entries().iter().position(|entry| entry.code == code)
            }
        }
    }

    /// Look up one entry
    ///
    /// The reported index is the ordinal the entry was found at, also when
    /// the lookup came in by scancode. The returned scancode is the stored
    /// scalar at full entry width.
    pub fn get_keycode(&self, selector: &EntrySelector) -> Result<EntryReport, KeymapError> {
        let pos = self.position(selector).ok_or(KeymapError::NotFound)?;
        let entry = &self.entries[pos];
        Ok(EntryReport {
            index: pos as u16,
            scancode: entry.code.to_ne_bytes().to_vec(),
            keycode: entry.keycode,
        })
    }

    /// Replace one entry's scancode and keycode, keeping the capability bits
    /// consistent
    ///
    /// Returns the keycode the entry previously mapped to.
    ///
    /// # Remarks
    /// Writing `KEY_RESERVED` over a live `Key` entry suppresses it; writing
    /// any real keycode over an `Ignore` entry revives it; every other kind
    /// keeps its kind. The asymmetry is deliberate: a suppressed entry stays
    /// distinguishable from one that was reserved from the start.
    pub fn set_keycode(&mut self, update: &EntryUpdate) -> Result<u32, KeymapError> {
        if update.keycode > KEY_MAX {
            return Err(KeymapError::InvalidKeycode);
        }
        let pos = self
            .position(&update.selector)
            .ok_or(KeymapError::NotFound)?;
        if update.scancode.len() > SCANCODE_CAPACITY {
            return Err(KeymapError::InvalidScancodeLength);
        }

        let old_kind = self.entries[pos].kind;
        let old_keycode = self.entries[pos].keycode;

        let new_kind = if update.keycode == KEY_RESERVED {
            if old_kind == EntryKind::Key {
                EntryKind::Ignore
            } else {
                old_kind
            }
        } else if old_kind == EntryKind::Ignore {
            EntryKind::Key
        } else {
            old_kind
        };

        let entry = &mut self.entries[pos];
        entry.kind = new_kind;
        entry.keycode = update.keycode;
        entry.code = scancode_from_wire(&update.scancode);

        // Reconcile the capability bits:
        //     Key -> Ignore: clear old
        //     Ignore -> Key: set new
        //     Key -> Key: clear old, set new
        //     Ignore -> Ignore: do nothing
        // The old bit must survive when another entry still maps the old
        // keycode (scancodes may alias), so clear then re-scan.
        if old_kind == EntryKind::Key {
            self.keybits.clear(old_keycode);
            if self.entry_from_keycode(old_keycode).is_some() {
                self.keybits.set(old_keycode);
            }
        }
        if new_kind == EntryKind::Key {
            self.keybits.set(update.keycode);
        }

        Ok(old_keycode)
    }
}

// ----- Functions -----

/// Convert a wire scancode to the stored scalar form
///
/// Only 1, 2 and 4 byte scancodes have a scalar form; every other length
/// cannot match any entry.
pub fn scancode_to_scalar(bytes: &[u8]) -> Option<u32> {
    match bytes.len() {
        1 => Some(bytes[0] as u32),
        2 => Some(u16::from_ne_bytes([bytes[0], bytes[1]]) as u32),
        4 => Some(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        _ => None,
    }
}

/// Zero-extend a replacement scancode (length already validated) into the
/// entry storage
fn scancode_from_wire(bytes: &[u8]) -> u32 {
    let mut raw = [0u8; SCANCODE_CAPACITY];
    raw[..bytes.len()].copy_from_slice(bytes);
    u32::from_ne_bytes(raw)
}
