//! Scan configuration

/// Which electrical level selects a drive line and indicates a closed switch.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub enum Polarity {
    /// Drive lines are pulled low to select them, and sense lines have
    /// pull-ups, so a closed switch reads low.
    #[default]
    ActiveLow,
    /// Drive lines are driven high to select them, and sense lines have
    /// pull-downs, so a closed switch reads high.
    ActiveHigh,
}

/// Settle time after changing drive lines, in microseconds.
pub const DEFAULT_SETTLE_US: u32 = 1_000;

/// Time between scan cycles, in milliseconds.
pub const DEFAULT_INTERVAL_MS: u32 = 10;

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct ScanConfig {
    /// How long to wait after changing drive lines before sampling.  This
    /// needs to cover the line capacitance and pull resistors, or the sense
    /// lines will still show the previous drive state.
    pub settle_us: u32,
    pub interval_ms: u32,
    pub polarity: Polarity,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            settle_us: DEFAULT_SETTLE_US,
            interval_ms: DEFAULT_INTERVAL_MS,
            polarity: Polarity::default(),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Polarity {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Polarity::ActiveLow => defmt::write!(fmt, "active-low"),
            Polarity::ActiveHigh => defmt::write!(fmt, "active-high"),
        }
    }
}
