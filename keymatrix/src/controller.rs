//! Scan loop driver
//!
//! One [`Controller::cycle`] is one round of scan, diff, emit, and commit.
//! The caller decides how often to run it; [`Controller::interval_ms`] gives
//! the configured cadence.

use alloc::vec::Vec;
use core::fmt::{self, Debug};

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::config::ScanConfig;
use crate::error::{ConfigError, ScanError};
use crate::hid::{HidEvent, HidTransport};
use crate::keymap::KeyMap;
use crate::keys::KeyId;
use crate::log::{info, warn};
use crate::matrix::{Matrix, ScanResult};
use crate::tracker::KeyTracker;

/// The outcome of one successful cycle.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CycleReport {
    /// The scan differed from the previous one.
    pub changed: bool,
    /// Events sent to the transport, releases first.
    pub events: Vec<HidEvent>,
    /// Transport calls that failed.
    pub failures: usize,
    /// Closed intersections that are not in the key map.
    pub unmapped: Vec<KeyId>,
}

pub struct Controller<O, I> {
    map: KeyMap,
    matrix: Matrix<O, I>,
    tracker: KeyTracker,
    config: ScanConfig,
    last: ScanResult,
}

impl<O, I, E> Controller<O, I>
where
    O: OutputPin<Error = E>,
    I: InputPin<Error = E>,
    E: Debug,
{
    /// Combine a key map with the matrix it describes.  Fails if any key
    /// cannot be reached by the matrix's lines.
    pub fn new(map: KeyMap, matrix: Matrix<O, I>, config: ScanConfig) -> Result<Self, ConfigError> {
        matrix.check_keymap(&map)?;
        info!(
            "controller: {} keys, scan every {}ms",
            map.len(),
            config.interval_ms
        );
        Ok(Controller {
            map,
            matrix,
            tracker: KeyTracker::new(),
            config,
            last: ScanResult::new(),
        })
    }

    /// Run one cycle.
    ///
    /// A GPIO failure abandons the cycle before anything is sent, leaving
    /// the held state as it was.  Transport failures do not abandon the
    /// cycle; they are counted in the report.
    pub fn cycle<D, T>(&mut self, delay: &mut D, transport: &mut T) -> Result<CycleReport, ScanError<E>>
    where
        D: DelayUs<u32>,
        T: HidTransport,
    {
        let scan = match self.matrix.scan(&self.map, delay) {
            Ok(scan) => scan,
            Err(e) => {
                warn!("scan failed on {}, skipping cycle", e.line());
                return Err(e);
            }
        };

        let changed = scan != self.last;
        if changed {
            info!("Active: {}", ActiveKeys { map: &self.map, scan: &scan });
        }

        let unmapped = scan.iter().copied().filter(|id| !id.is_mapped()).collect();
        let transitions = self.tracker.apply_scan(&self.map, scan.clone(), transport);
        self.last = scan;

        Ok(CycleReport {
            changed,
            events: transitions.events,
            failures: transitions.failures,
            unmapped,
        })
    }

    /// Release every held key.  The next cycle starts from an empty state,
    /// so anything still closed will be pressed again.
    pub fn shutdown<T: HidTransport>(&mut self, transport: &mut T) -> CycleReport {
        let transitions = self.tracker.release_all(&self.map, transport);
        self.last = ScanResult::new();
        CycleReport {
            changed: !transitions.events.is_empty(),
            events: transitions.events,
            failures: transitions.failures,
            unmapped: Vec::new(),
        }
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.map
    }

    pub fn tracker(&self) -> &KeyTracker {
        &self.tracker
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn interval_ms(&self) -> u32 {
        self.config.interval_ms
    }

    /// Is any key, with or without a HID code, currently held?
    pub fn any_held(&self) -> bool {
        self.tracker.held_count() > 0
    }
}

/// The names of every closed key, for the "Active:" log line.
struct ActiveKeys<'a> {
    map: &'a KeyMap,
    scan: &'a ScanResult,
}

impl fmt::Display for ActiveKeys<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &id) in self.scan.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.map.name(id))?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ActiveKeys<'_> {
    fn format(&self, fmt: defmt::Formatter) {
        for (i, &id) in self.scan.iter().enumerate() {
            if i > 0 {
                defmt::write!(fmt, ", ");
            }
            defmt::write!(fmt, "{}", self.map.name(id));
        }
    }
}
