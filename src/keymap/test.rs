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

#![cfg(test)]

// ----- Modules -----

use super::*;
use crate::logging::setup_logging_lite;
use rand::Rng;

// ----- Consts -----

const KEY_A: u32 = 30;
const KEY_S: u32 = 31;
const KEY_D: u32 = 32;
const KEY_MUTE: u32 = 113;

// ----- Functions -----

/// Verify the core invariant: a capability bit is set iff at least one
/// `Key` entry currently maps that keycode
fn check_keybits(keymap: &SparseKeymap) {
    for keycode in 0..=KEY_MAX {
        let expected = keymap
            .entries()
            .iter()
            .any(|entry| entry.kind == EntryKind::Key && entry.keycode == keycode);
        assert!(
            keymap.keybits().test(keycode) == expected,
            "capability bit mismatch for keycode {:#x}: bit={} entries={}",
            keycode,
            keymap.keybits().test(keycode),
            expected
        );
    }
}

/// Wire form of a scancode scalar at full width
fn wire(code: u32) -> Vec<u8> {
    code.to_ne_bytes().to_vec()
}

fn set_by_index(keymap: &mut SparseKeymap, index: u16, code: u32, keycode: u32) -> Result<u32, KeymapError> {
    keymap.set_keycode(&EntryUpdate {
        selector: EntrySelector::ByIndex(index),
        scancode: wire(code),
        keycode,
    })
}

// ----- Tests -----

/// Entry kind values match the kernel sparse keymap entry types
#[test]
fn entry_kind_abi_test() {
    assert!(u8::from(EntryKind::End) == 0);
    assert!(u8::from(EntryKind::Key) == 1);
    assert!(u8::from(EntryKind::Switch) == 2);
    assert!(u8::from(EntryKind::VirtualSwitch) == 3);
    assert!(u8::from(EntryKind::Ignore) == 4);
    assert!(EntryKind::try_from(4u8).unwrap() == EntryKind::Ignore);
    assert!(EntryKind::try_from(9u8).is_err());
}

/// Construction derives the capability bits from the `Key` entries
#[test]
fn derived_bits_test() {
    setup_logging_lite().ok();

    let keymap = SparseKeymap::new(vec![
        KeyEntry::key(0xe005, KEY_A),
        KeyEntry::ignore(0xe006, KEY_S),
        KeyEntry::key(0xe007, KEY_A),
    ]);

    assert!(keymap.keybits().test(KEY_A));
    assert!(!keymap.keybits().test(KEY_S));
    check_keybits(&keymap);
}

/// Duplicate scancodes: the earliest entry wins the lookup, later duplicates
/// stay reachable by index
#[test]
fn first_match_lookup_test() {
    setup_logging_lite().ok();

    let keymap = SparseKeymap::new(vec![
        KeyEntry::key(0x01, KEY_A),
        KeyEntry::key(0x02, KEY_S),
        KeyEntry::key(0xaa, KEY_D),
        KeyEntry::key(0x04, KEY_A),
        KeyEntry::key(0x05, KEY_S),
        KeyEntry::key(0xaa, KEY_MUTE),
    ]);

    let report = keymap
        .get_keycode(&EntrySelector::ByScancode(vec![0xaa]))
        .unwrap();
    assert!(report.index == 2, "landed on index {}", report.index);
    assert!(report.keycode == KEY_D);

    // The later duplicate is still addressable by ordinal
    let report = keymap.get_keycode(&EntrySelector::ByIndex(5)).unwrap();
    assert!(report.keycode == KEY_MUTE);
}

/// Suppressing one of two aliasing entries must not drop the shared bit
#[test]
fn coalesce_keeps_shared_bit_test() {
    setup_logging_lite().ok();

    let mut keymap = SparseKeymap::new(vec![
        KeyEntry::key(0xe005, KEY_MUTE),
        KeyEntry::key(0x01e1, KEY_MUTE),
    ]);

    let previous = set_by_index(&mut keymap, 0, 0xe005, KEY_RESERVED).unwrap();
    assert!(previous == KEY_MUTE);

    assert!(keymap.entries()[0].kind == EntryKind::Ignore);
    assert!(keymap.entries()[1] == KeyEntry::key(0x01e1, KEY_MUTE));
    assert!(keymap.keybits().test(KEY_MUTE), "aliased bit dropped");
    check_keybits(&keymap);
}

/// Suppressing the last aliasing entry clears the bit
#[test]
fn coalesce_clears_last_reference_test() {
    setup_logging_lite().ok();

    let mut keymap = SparseKeymap::new(vec![
        KeyEntry::key(0xe005, KEY_MUTE),
        KeyEntry::key(0x01e1, KEY_MUTE),
    ]);

    set_by_index(&mut keymap, 0, 0xe005, KEY_RESERVED).unwrap();
    set_by_index(&mut keymap, 1, 0x01e1, KEY_RESERVED).unwrap();

    assert!(!keymap.keybits().test(KEY_MUTE));
    assert!(keymap.entries()[0].kind == EntryKind::Ignore);
    assert!(keymap.entries()[1].kind == EntryKind::Ignore);
    check_keybits(&keymap);
}

/// Writing a real keycode over a suppressed entry revives it
#[test]
fn revive_suppressed_entry_test() {
    setup_logging_lite().ok();

    let mut keymap = SparseKeymap::new(vec![KeyEntry::ignore(0xe035, KEY_RESERVED)]);

    let previous = set_by_index(&mut keymap, 0, 0xe035, KEY_D).unwrap();
    assert!(previous == KEY_RESERVED);

    assert!(keymap.entries()[0].kind == EntryKind::Key);
    assert!(keymap.keybits().test(KEY_D));
    check_keybits(&keymap);
}

/// Writing RESERVED over an already suppressed entry changes nothing but the
/// stored keycode
#[test]
fn reserved_onto_suppressed_test() {
    setup_logging_lite().ok();

    let mut keymap = SparseKeymap::new(vec![KeyEntry::ignore(0xe035, KEY_A)]);

    let previous = set_by_index(&mut keymap, 0, 0xe035, KEY_RESERVED).unwrap();
    assert!(previous == KEY_A);
    assert!(keymap.entries()[0].kind == EntryKind::Ignore);
    assert!(keymap.entries()[0].keycode == KEY_RESERVED);
    check_keybits(&keymap);
}

/// Rewriting a live entry to a different keycode moves the bit
#[test]
fn rewrite_moves_bit_test() {
    setup_logging_lite().ok();

    let mut keymap = SparseKeymap::new(vec![KeyEntry::key(0xe005, KEY_A)]);

    let previous = set_by_index(&mut keymap, 0, 0xe005, KEY_S).unwrap();
    assert!(previous == KEY_A);
    assert!(keymap.entries()[0].kind == EntryKind::Key);
    assert!(!keymap.keybits().test(KEY_A));
    assert!(keymap.keybits().test(KEY_S));
    check_keybits(&keymap);
}

/// Oversized replacement scancodes are rejected without touching anything
#[test]
fn oversized_scancode_test() {
    setup_logging_lite().ok();

    let mut keymap = SparseKeymap::new(vec![
        KeyEntry::key(0xe005, KEY_A),
        KeyEntry::key(0xe006, KEY_S),
    ]);
    let before = keymap.clone();

    let result = keymap.set_keycode(&EntryUpdate {
        selector: EntrySelector::ByIndex(1),
        scancode: vec![0x50, 0x01, 0x10, 0x00, 0x01],
        keycode: KEY_D,
    });
    assert!(result == Err(KeymapError::InvalidScancodeLength));
    assert!(keymap == before, "failed set modified the keymap");
}

/// Out of range keycodes are rejected before anything is touched
#[test]
fn out_of_range_keycode_test() {
    setup_logging_lite().ok();

    let mut keymap = SparseKeymap::new(vec![KeyEntry::key(0xe005, KEY_A)]);
    let before = keymap.clone();

    let result = set_by_index(&mut keymap, 0, 0xe005, KEY_MAX + 1);
    assert!(result == Err(KeymapError::InvalidKeycode));
    assert!(keymap == before);
}

/// Lookups past the end of the table fail
#[test]
fn index_past_end_test() {
    setup_logging_lite().ok();

    let mut keymap = SparseKeymap::new(vec![KeyEntry::key(0xe005, KEY_A)]);

    assert!(keymap.get_keycode(&EntrySelector::ByIndex(1)) == Err(KeymapError::NotFound));
    assert!(set_by_index(&mut keymap, 7, 0xe005, KEY_S) == Err(KeymapError::NotFound));
}

/// An `End` entry terminates every scan; entries stored after it are
/// unreachable
#[test]
fn sentinel_terminates_test() {
    setup_logging_lite().ok();

    let keymap = SparseKeymap::new(vec![
        KeyEntry::key(0xe005, KEY_A),
        KeyEntry::end(),
        KeyEntry::key(0xe006, KEY_S),
    ]);

    assert!(keymap.len() == 1);
    assert!(keymap.get_keycode(&EntrySelector::ByIndex(1)) == Err(KeymapError::NotFound));
    assert!(
        keymap.get_keycode(&EntrySelector::ByScancode(wire(0xe006)))
            == Err(KeymapError::NotFound)
    );
    // The unreachable Key entry must not contribute capability bits either
    assert!(!keymap.keybits().test(KEY_S));
}

/// Scalar lookup accepts 1, 2 and 4 byte scancodes only
#[test]
fn scancode_width_test() {
    setup_logging_lite().ok();

    let keymap = SparseKeymap::new(vec![KeyEntry::key(0xe005, KEY_A)]);

    let short = 0xe005u16.to_ne_bytes().to_vec();
    assert!(keymap.get_keycode(&EntrySelector::ByScancode(short)).is_ok());
    assert!(keymap
        .get_keycode(&EntrySelector::ByScancode(wire(0xe005)))
        .is_ok());
    // 3 bytes has no scalar form
    let odd = vec![0x05, 0xe0, 0x00];
    assert!(
        keymap.get_keycode(&EntrySelector::ByScancode(odd)) == Err(KeymapError::NotFound)
    );
}

/// Switch entries pass through: keycode updates never flip their kind or
/// touch the capability bits
#[test]
fn switch_passthrough_test() {
    setup_logging_lite().ok();

    let mut keymap = SparseKeymap::new(vec![
        KeyEntry {
            kind: EntryKind::Switch,
            code: 0x10,
            keycode: 5,
        },
        KeyEntry::key(0x11, KEY_A),
    ]);

    set_by_index(&mut keymap, 0, 0x10, KEY_D).unwrap();
    assert!(keymap.entries()[0].kind == EntryKind::Switch);
    assert!(!keymap.keybits().test(KEY_D));

    set_by_index(&mut keymap, 0, 0x10, KEY_RESERVED).unwrap();
    assert!(keymap.entries()[0].kind == EntryKind::Switch);
    check_keybits(&keymap);
}

/// A set followed by a get on the same selector reads back the written value
#[test]
fn round_trip_test() {
    setup_logging_lite().ok();

    let mut keymap = SparseKeymap::new(vec![
        KeyEntry::key(0xe005, KEY_A),
        KeyEntry::key(0xe006, KEY_S),
    ]);

    keymap
        .set_keycode(&EntryUpdate {
            selector: EntrySelector::ByScancode(wire(0xe006)),
            scancode: wire(0xe006),
            keycode: KEY_MUTE,
        })
        .unwrap();
    set_by_index(&mut keymap, 0, 0xe009, KEY_D).unwrap();

    let report = keymap
        .get_keycode(&EntrySelector::ByScancode(wire(0xe006)))
        .unwrap();
    assert!(report.keycode == KEY_MUTE);
    assert!(report.index == 1);

    let report = keymap.get_keycode(&EntrySelector::ByIndex(0)).unwrap();
    assert!(report.keycode == KEY_D);
    assert!(report.scancode == wire(0xe009), "scancode was not replaced");
}

/// Random operation soak: the capability bits must match the table after
/// every single operation, successful or not
#[test]
fn randomized_consistency_test() {
    setup_logging_lite().ok();

    let mut rng = rand::thread_rng();
    let codes = [0x01u32, 0x02, 0xe005, 0xe006, 0xe007, 0x0100_0057];
    let keycodes = [KEY_RESERVED, KEY_A, KEY_S, KEY_D, KEY_MUTE, KEY_MAX + 1];

    let mut entries = vec![];
    for _ in 0..12 {
        let code = codes[rng.gen_range(0, codes.len())];
        let keycode = keycodes[rng.gen_range(0, keycodes.len() - 1)];
        entries.push(if rng.gen::<bool>() {
            KeyEntry::key(code, keycode)
        } else {
            KeyEntry::ignore(code, keycode)
        });
    }
    let mut keymap = SparseKeymap::new(entries);
    check_keybits(&keymap);

    for _ in 0..500 {
        let scancode = match rng.gen_range(0, 4) {
            0 => codes[rng.gen_range(0, codes.len())].to_ne_bytes()[..1].to_vec(),
            1 => codes[rng.gen_range(0, codes.len())].to_ne_bytes()[..2].to_vec(),
            2 => codes[rng.gen_range(0, codes.len())].to_ne_bytes().to_vec(),
            // Oversized, must be rejected
            _ => vec![0; 5],
        };
        let selector = if rng.gen::<bool>() {
            EntrySelector::ByIndex(rng.gen_range(0, 16))
        } else {
            EntrySelector::ByScancode(scancode.clone())
        };
        let update = EntryUpdate {
            selector,
            scancode,
            keycode: keycodes[rng.gen_range(0, keycodes.len())],
        };
        let _ = keymap.set_keycode(&update);
        check_keybits(&keymap);
    }
}
