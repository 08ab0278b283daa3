//! Control of the status LED.

use embedded_hal::digital::v2::{OutputPin, PinState};

pub struct Indication(&'static [Step]);

struct Step {
    on: bool,
    count: usize,
}

/// Waiting for the host to configure us.
pub static INIT_INDICATOR: Indication = Indication(&[
    Step { on: true,  count: 100 },
    Step { on: false, count: 100 },
]);

/// Configured, nothing held.
pub static IDLE_INDICATOR: Indication = Indication(&[
    Step { on: true,  count: 50 },
    Step { on: false, count: 1950 },
]);

/// At least one key is down.
pub static HELD_INDICATOR: Indication = Indication(&[
    Step { on: true, count: 10000 },
]);

/// The host has suspended us.
pub static SLEEP_INDICATOR: Indication = Indication(&[
    Step { on: false, count: 10000 },
]);

pub struct LedManager<L: OutputPin> {
    led: L,

    steps: &'static [Step],

    /// Information on the current display.
    count: usize,
    phase: usize,
}

impl<L: OutputPin> LedManager<L> {
    pub fn new(led: L) -> Self {
        LedManager {
            led,
            steps: INIT_INDICATOR.0,
            count: 0,
            phase: 0,
        }
    }

    /// Advance by one millisecond.
    pub fn tick(&mut self) {
        if self.count == 0 {
            if self.phase >= self.steps.len() {
                self.phase = 0;
            }
            let step = &self.steps[self.phase];
            let _ = self.led.set_state(PinState::from(step.on));
            self.count = step.count;
            self.phase += 1;
        } else {
            self.count -= 1;
        }
    }

    /// Switch to a new indication.  Setting the one already showing leaves
    /// it running where it is.
    pub fn set(&mut self, indicator: &Indication) {
        if core::ptr::eq(self.steps, indicator.0) {
            return;
        }
        self.steps = indicator.0;
        self.count = 0;
        self.phase = 0;
    }
}
