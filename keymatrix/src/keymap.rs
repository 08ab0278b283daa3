//! The key map
//!
//! Built once from the board's table of [`KeyDef`]s and never changed after.
//! Lookups by intersection are tried in both orientations, and every key's
//! HID code is indexed by identity so that emitting an event never searches
//! the table.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use usbd_human_interface_device::page::Keyboard;

use crate::error::ConfigError;
use crate::keys::{KeyDef, KeyId, KeyName, Line};
use crate::log::debug;

pub struct KeyMap {
    /// Key definitions, indexed by `KeyId::Mapped`.
    defs: Vec<KeyDef>,
    /// Intersections, in the orientation the table gave them.
    by_lines: BTreeMap<(Line, Line), KeyId>,
    by_name: BTreeMap<&'static str, KeyId>,
}

impl KeyMap {
    /// Build the key map from the board table.
    ///
    /// Fails if two entries share an intersection, in either orientation, or
    /// a display name.  Nothing is ever silently overwritten.
    pub fn build(table: &[KeyDef]) -> Result<KeyMap, ConfigError> {
        let mut by_lines = BTreeMap::new();
        let mut by_name = BTreeMap::new();

        for (index, def) in table.iter().enumerate() {
            let (a, b) = def.lines;
            // Lines are u8, so a table with more entries than u16 can hold
            // has already failed on a duplicate intersection.
            let id = KeyId::Mapped(index as u16);

            let existing = by_lines
                .get(&(a, b))
                .or_else(|| by_lines.get(&(b, a)))
                .copied();
            if let Some(KeyId::Mapped(other)) = existing {
                return Err(ConfigError::DuplicateIntersection {
                    a,
                    b,
                    first: table[other as usize].name,
                    second: def.name,
                });
            }
            if by_name.insert(def.name, id).is_some() {
                return Err(ConfigError::DuplicateName(def.name));
            }
            by_lines.insert((a, b), id);
        }

        debug!("key map: {} keys", table.len());

        Ok(KeyMap {
            defs: table.to_vec(),
            by_lines,
            by_name,
        })
    }

    /// Resolve a closed intersection to a key.
    ///
    /// The pair is tried as given and then reversed.  An intersection that is
    /// not in the table resolves to `KeyId::Unmapped` with the lower line
    /// first, so both orientations give the same identity.
    pub fn lookup(&self, a: Line, b: Line) -> KeyId {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.by_lines
            .get(&(a, b))
            .or_else(|| self.by_lines.get(&(b, a)))
            .copied()
            .unwrap_or(KeyId::Unmapped(lo, hi))
    }

    /// The HID code for a key, if it has one.  Unmapped keys never do.
    pub fn code(&self, id: KeyId) -> Option<Keyboard> {
        self.def(id).and_then(|def| def.code)
    }

    /// Find a key by its display name.
    pub fn key(&self, name: &str) -> Option<KeyId> {
        self.by_name.get(name).copied()
    }

    pub fn def(&self, id: KeyId) -> Option<&KeyDef> {
        match id {
            KeyId::Mapped(index) => self.defs.get(index as usize),
            KeyId::Unmapped(..) => None,
        }
    }

    /// A printable name for the key.
    pub fn name(&self, id: KeyId) -> KeyName<'_> {
        KeyName {
            id,
            name: self.def(id).map(|def| def.name),
        }
    }

    pub fn defs(&self) -> &[KeyDef] {
        &self.defs
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
