//! Matrix keyboard core
//!
//! Scans a diode-isolated key matrix, resolves closed intersections through a
//! fixed key map, and turns successive scans into USB HID press and release
//! events.
//!
//! The pipeline for each cycle is:
//!
//! - [`Matrix::scan`] drives each drive line in turn and samples every sense
//!   line, producing a [`ScanResult`].
//! - [`KeyTracker::apply_scan`] diffs that result against the keys it believes
//!   are held, sends releases then presses to a [`HidTransport`], and commits
//!   the new result.
//!
//! [`Controller`] ties the two together with a [`KeyMap`] and a
//! [`ScanConfig`].

#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

pub use usbd_human_interface_device::page::Keyboard;

pub use config::{Polarity, ScanConfig};
pub use controller::{Controller, CycleReport};
pub use error::{ConfigError, ScanError};
pub use hid::{HidEvent, HidTransport};
pub use keymap::KeyMap;
pub use keys::{KeyDef, KeyId, Line};
pub use matrix::{Matrix, ScanResult};
pub use tracker::KeyTracker;

pub mod config;
pub mod controller;
pub mod error;
pub mod hid;
pub mod keymap;
pub mod keys;
pub mod matrix;
pub mod tracker;

#[cfg(feature = "defmt")]
mod log {
    pub use defmt::debug;
    pub use defmt::info;
    pub use defmt::warn;
    pub use defmt::Debug2Format as Dbg;
}

#[cfg(all(feature = "log", not(feature = "defmt")))]
mod log {
    pub use log::debug;
    pub use log::info;
    pub use log::warn;
    pub use crate::dbg::Dbg;
}

// Without a logging backend, the macros still evaluate (and so use) their
// arguments, but produce nothing.
#[cfg(not(any(feature = "log", feature = "defmt")))]
mod log {
    macro_rules! discard {
        ($fmt:literal $(, $arg:expr)* $(,)?) => {{
            $( let _ = &$arg; )*
        }};
    }
    pub(crate) use discard as debug;
    pub(crate) use discard as info;
    pub(crate) use discard as warn;
    pub use crate::dbg::Dbg;
}

/// Print a value through its `Debug` impl where a log line wants `{}`.
#[cfg(not(feature = "defmt"))]
mod dbg {
    use core::fmt;

    pub struct Dbg<'a, T: ?Sized>(pub &'a T);

    impl<T: fmt::Debug + ?Sized> fmt::Display for Dbg<'_, T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            fmt::Debug::fmt(self.0, f)
        }
    }
}
