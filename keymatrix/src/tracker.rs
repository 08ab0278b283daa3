//! Key state tracking
//!
//! Each logical key is either released or held.  A key becomes held when it
//! shows up in a scan, and released when it drops out of one.  A single scan
//! is trusted as it is; there is no debouncing at this level.
//!
//! Within one scan, every release is sent before any press, so that a key
//! lifted and another pressed in the same motion never collide, and modifier
//! releases land before the presses that follow them.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::hid::{HidEvent, HidTransport};
use crate::keymap::KeyMap;
use crate::keys::KeyId;
use crate::log::{info, warn, Dbg};
use crate::matrix::ScanResult;

/// What one update sent to the transport.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Transitions {
    /// Events in the order they were sent.
    pub events: Vec<HidEvent>,
    /// How many of those the transport rejected.
    pub failures: usize,
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    held: BTreeSet<KeyId>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, key: KeyId) -> bool {
        self.held.contains(&key)
    }

    pub fn held(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.held.iter().copied()
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    /// Compute the events that moving to `scan` would produce, without
    /// changing any state.  Releases come first.
    pub fn diff(&self, map: &KeyMap, scan: &ScanResult) -> Vec<HidEvent> {
        let released = self.held.difference(scan.as_set());
        let pressed = scan.as_set().difference(&self.held);

        released
            .filter_map(|&id| map.code(id).map(HidEvent::Release))
            .chain(pressed.filter_map(|&id| map.code(id).map(HidEvent::Press)))
            .collect()
    }

    /// Move to a new scan result, sending the transitions to `transport`.
    ///
    /// Keys without a HID code (including unmapped ones) are tracked as held
    /// but never sent.  A transport failure is logged and counted; the new
    /// scan still becomes the held state, so a lost release is not retried
    /// against a key that is no longer down.
    pub fn apply_scan<T: HidTransport>(
        &mut self,
        map: &KeyMap,
        scan: ScanResult,
        transport: &mut T,
    ) -> Transitions {
        let mut out = Transitions::default();

        for &id in self.held.difference(scan.as_set()) {
            if let Some(code) = map.code(id) {
                info!("Released: {}", map.name(id));
                send(HidEvent::Release(code), transport, &mut out);
            }
        }

        for &id in scan.as_set().difference(&self.held) {
            match map.code(id) {
                Some(code) => {
                    info!("Pressed: {}", map.name(id));
                    send(HidEvent::Press(code), transport, &mut out);
                }
                None if !id.is_mapped() => warn!("Unmapped key closed: {}", map.name(id)),
                None => info!("Holding: {}", map.name(id)),
            }
        }

        self.held = scan.into_set();
        out
    }

    /// Release everything that is held, and clear the held state.
    ///
    /// Each held key with a code gets its own release, after which the
    /// transport is told to drop anything else it still thinks is down.
    pub fn release_all<T: HidTransport>(&mut self, map: &KeyMap, transport: &mut T) -> Transitions {
        let mut out = Transitions::default();

        for &id in &self.held {
            if let Some(code) = map.code(id) {
                send(HidEvent::Release(code), transport, &mut out);
            }
        }
        if let Err(e) = transport.release_all() {
            warn!("release all failed: {}", Dbg(&e));
            out.failures += 1;
        }

        info!("Released all ({} held)", self.held.len());
        self.held.clear();
        out
    }
}

fn send<T: HidTransport>(event: HidEvent, transport: &mut T, out: &mut Transitions) {
    if let Err(e) = event.send(transport) {
        warn!("{} failed: {}", event, Dbg(&e));
        out.failures += 1;
    }
    out.events.push(event);
}
