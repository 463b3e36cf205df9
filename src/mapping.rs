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

use crate::keymap::{EntrySelector, EntryUpdate, WIRE_SCANCODE_MAX};
use crate::names;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

// ----- Enumerations -----

/// Errors for `[index:]scancode=keycode` arguments
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum MappingParseError {
    /// Argument does not follow the grammar, or the scancode has an odd
    /// number of hex digits or is longer than the request form carries
    InvalidMapping(String),
    /// Index prefix is not a valid entry ordinal
    InvalidIndex(String),
    /// Keycode is neither a known key name nor a number
    UnknownKey(String),
}

impl fmt::Display for MappingParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingParseError::InvalidMapping(arg) => write!(f, "Invalid mapping: {arg}"),
            MappingParseError::InvalidIndex(arg) => write!(f, "Invalid index: {arg}"),
            MappingParseError::UnknownKey(arg) => write!(f, "Unknown key: {arg}"),
        }
    }
}

impl std::error::Error for MappingParseError {}

// ----- Functions -----

lazy_static! {
    static ref MAPPING_RE: Regex =
        Regex::new(r"^(?:(?P<index>\d+):)?(?P<scancode>[0-9A-Fa-f]+)=(?P<keycode>\S+)$").unwrap();
}

/// Parse one `[index:]scancode=keycode` argument into a set request
///
/// The scancode is written most-significant digit first and must be a whole
/// number of bytes; the keycode is a key name (`MICMUTE`) or a number
/// (`0x0` disables the key). With an index prefix the entry is selected by
/// ordinal and its scancode replaced; without one the scancode itself is the
/// selector.
pub fn parse_mapping(arg: &str) -> Result<EntryUpdate, MappingParseError> {
    let caps = MAPPING_RE
        .captures(arg)
        .ok_or_else(|| MappingParseError::InvalidMapping(arg.to_string()))?;

    let digits = caps.name("scancode").unwrap().as_str();
    if digits.len() % 2 != 0 || digits.len() / 2 > WIRE_SCANCODE_MAX {
        return Err(MappingParseError::InvalidMapping(arg.to_string()));
    }
    let scancode = scancode_bytes(digits);

    let keycode = caps.name("keycode").unwrap().as_str();
    let keycode =
        names::key_code(keycode).ok_or_else(|| MappingParseError::UnknownKey(keycode.to_string()))?;

    let selector = match caps.name("index") {
        Some(index) => EntrySelector::ByIndex(
            index
                .as_str()
                .parse::<u16>()
                .map_err(|_| MappingParseError::InvalidIndex(arg.to_string()))?,
        ),
        None => EntrySelector::ByScancode(scancode.clone()),
    };

    Ok(EntryUpdate {
        selector,
        scancode,
        keycode,
    })
}

/// Decode hex digit pairs into wire (native) byte order
fn scancode_bytes(digits: &str) -> Vec<u8> {
    let mut bytes: Vec<u8> = digits
        .as_bytes()
        .chunks(2)
        .map(|pair| u8::from_str_radix(std::str::from_utf8(pair).unwrap(), 16).unwrap())
        .collect();
    if cfg!(target_endian = "little") {
        bytes.reverse();
    }
    bytes
}

// ----- Tests -----

#[cfg(test)]
mod test {
    use super::*;

    /// Wire form of a scancode scalar at full width
    fn wire(code: u32) -> Vec<u8> {
        code.to_ne_bytes().to_vec()
    }

    #[test]
    fn scancode_selector_test() {
        let update = parse_mapping("00100057=BRIGHTNESSDOWN").unwrap();
        assert!(update.selector == EntrySelector::ByScancode(wire(0x0010_0057)));
        assert!(update.scancode == wire(0x0010_0057));
        assert!(update.keycode == 0xe0);
    }

    #[test]
    fn index_selector_test() {
        let update = parse_mapping("571:00010081=0x0").unwrap();
        assert!(update.selector == EntrySelector::ByIndex(571));
        assert!(update.scancode == wire(0x0001_0081));
        assert!(update.keycode == 0);
    }

    /// Short scancodes keep their explicit length
    #[test]
    fn short_scancode_test() {
        let update = parse_mapping("e005=MUTE").unwrap();
        assert!(update.scancode == 0xe005u16.to_ne_bytes().to_vec());
        assert!(update.keycode == 113);
    }

    #[test]
    fn rejected_arguments_test() {
        // Odd number of hex digits
        assert!(
            parse_mapping("e00=MUTE") == Err(MappingParseError::InvalidMapping("e00=MUTE".to_string()))
        );
        // Not hex
        assert!(parse_mapping("xyz=MUTE").is_err());
        // Missing separator
        assert!(parse_mapping("e005") == Err(MappingParseError::InvalidMapping("e005".to_string())));
        // Longer than the request form carries
        let long = format!("{}=MUTE", "00".repeat(WIRE_SCANCODE_MAX + 1));
        assert!(parse_mapping(&long) == Err(MappingParseError::InvalidMapping(long.clone())));
        // Unknown key name
        assert!(
            parse_mapping("e005=NO_SUCH_KEY")
                == Err(MappingParseError::UnknownKey("NO_SUCH_KEY".to_string()))
        );
        // Index prefix out of range
        assert!(parse_mapping("70000:e005=MUTE").is_err());
    }
}
