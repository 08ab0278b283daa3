//! Keyboard matrix handling.
//!
//! Supports a keyboard connected via a diode-isolated pin matrix.  Drive
//! lines are selected one at a time and every sense line is sampled while
//! each is selected.  There is no ghost masking: with three keys closed on
//! the corners of a rectangle, the fourth corner will also read as closed.

use alloc::collections::btree_set::{self, BTreeSet};
use alloc::vec::Vec;
use core::fmt::Debug;

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::config::{Polarity, ScanConfig};
use crate::error::{ConfigError, ScanError};
use crate::keymap::KeyMap;
use crate::keys::{KeyId, Line};
use crate::log::info;

/// The keys found closed during one full pass over the drive lines.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScanResult {
    keys: BTreeSet<KeyId>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: KeyId) -> bool {
        self.keys.insert(key)
    }

    pub fn contains(&self, key: &KeyId) -> bool {
        self.keys.contains(key)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, KeyId> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn as_set(&self) -> &BTreeSet<KeyId> {
        &self.keys
    }

    pub(crate) fn into_set(self) -> BTreeSet<KeyId> {
        self.keys
    }
}

impl FromIterator<KeyId> for ScanResult {
    fn from_iter<T: IntoIterator<Item = KeyId>>(iter: T) -> Self {
        ScanResult {
            keys: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a KeyId;
    type IntoIter = btree_set::Iter<'a, KeyId>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

pub struct Matrix<O, I> {
    drive: Vec<(Line, O)>,
    sense: Vec<(Line, I)>,
    polarity: Polarity,
    settle_us: u32,
}

impl<O, I, E> Matrix<O, I>
where
    O: OutputPin<Error = E>,
    I: InputPin<Error = E>,
    E: Debug,
{
    /// Take ownership of the matrix lines.
    ///
    /// The pins must already be configured: drive lines as push-pull
    /// outputs, sense lines as inputs pulled to the inactive level for the
    /// configured polarity.  Lines are scanned in the order given.
    pub fn new(
        drive: Vec<(Line, O)>,
        sense: Vec<(Line, I)>,
        config: &ScanConfig,
    ) -> Result<Self, ConfigError> {
        if drive.is_empty() {
            return Err(ConfigError::NoDriveLines);
        }
        if sense.is_empty() {
            return Err(ConfigError::NoSenseLines);
        }

        let mut seen = BTreeSet::new();
        for line in drive.iter().map(|(l, _)| *l).chain(sense.iter().map(|(l, _)| *l)) {
            if !seen.insert(line) {
                return Err(ConfigError::LineRoleConflict(line));
            }
        }

        info!(
            "matrix: {} drive lines, {} sense lines, settle {}us",
            drive.len(),
            sense.len(),
            config.settle_us
        );

        Ok(Matrix {
            drive,
            sense,
            polarity: config.polarity,
            settle_us: config.settle_us,
        })
    }

    /// Verify that every key in the map sits between one drive line and one
    /// sense line of this matrix.
    pub fn check_keymap(&self, map: &KeyMap) -> Result<(), ConfigError> {
        for def in map.defs() {
            let (a, b) = def.lines;
            let on_drive = |l: Line| self.drive.iter().any(|(d, _)| *d == l);
            let on_sense = |l: Line| self.sense.iter().any(|(s, _)| *s == l);

            if (on_drive(a) && on_sense(b)) || (on_sense(a) && on_drive(b)) {
                continue;
            }
            let line = if on_drive(a) || on_sense(a) { b } else { a };
            return Err(ConfigError::UnconfiguredLine {
                key: def.name,
                line,
            });
        }
        Ok(())
    }

    /// Perform a single scan of the matrix, returning every closed key.
    pub fn scan<D: DelayUs<u32>>(
        &mut self,
        map: &KeyMap,
        delay: &mut D,
    ) -> Result<ScanResult, ScanError<E>> {
        let mut result = ScanResult::new();

        // Everything inactive first, so nothing left over from the previous
        // pass shows up on the first drive line.
        for index in 0..self.drive.len() {
            self.set_drive(index, false)?;
        }
        delay.delay_us(self.settle_us);

        for index in 0..self.drive.len() {
            self.set_drive(index, true)?;
            delay.delay_us(self.settle_us);

            let sampled = self.sample(index, map, &mut result);

            // Always try to release the line, even if sampling failed, so
            // that two drive lines are never active together.
            let released = self.set_drive(index, false);
            sampled?;
            released?;
        }

        Ok(result)
    }

    fn sample(&self, index: usize, map: &KeyMap, result: &mut ScanResult) -> Result<(), ScanError<E>> {
        let drive = self.drive[index].0;
        for (line, pin) in &self.sense {
            let closed = match self.polarity {
                Polarity::ActiveLow => pin.is_low(),
                Polarity::ActiveHigh => pin.is_high(),
            }
            .map_err(|error| ScanError::Sense { line: *line, error })?;

            if closed {
                result.insert(map.lookup(*line, drive));
            }
        }
        Ok(())
    }

    fn set_drive(&mut self, index: usize, active: bool) -> Result<(), ScanError<E>> {
        let high = match self.polarity {
            Polarity::ActiveLow => !active,
            Polarity::ActiveHigh => active,
        };
        let (line, pin) = &mut self.drive[index];
        let status = if high { pin.set_high() } else { pin.set_low() };
        status.map_err(|error| ScanError::Drive { line: *line, error })
    }
}
