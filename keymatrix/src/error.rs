//! Errors
//!
//! Configuration errors are fatal and stop the keyboard from ever starting
//! its scan loop.  Scan errors only cost the cycle they happen in.

use core::fmt;

use crate::keys::Line;

/// A problem with the static description of the board.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// Two keys claim the same intersection (in either orientation).
    DuplicateIntersection {
        a: Line,
        b: Line,
        first: &'static str,
        second: &'static str,
    },
    /// Two keys share a display name, so the name cannot identify a key.
    DuplicateName(&'static str),
    NoDriveLines,
    NoSenseLines,
    /// A line was listed twice, or as both a drive and a sense line.
    LineRoleConflict(Line),
    /// A key references a line that is not configured as drive or sense, or
    /// has both of its lines on the same side of the matrix.
    UnconfiguredLine { key: &'static str, line: Line },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateIntersection {
                a,
                b,
                first,
                second,
            } => write!(
                f,
                "intersection ({}, {}) mapped by both {:?} and {:?}",
                a, b, first, second
            ),
            ConfigError::DuplicateName(name) => write!(f, "key name {:?} used twice", name),
            ConfigError::NoDriveLines => f.write_str("no drive lines configured"),
            ConfigError::NoSenseLines => f.write_str("no sense lines configured"),
            ConfigError::LineRoleConflict(line) => {
                write!(f, "line {} configured more than once", line)
            }
            ConfigError::UnconfiguredLine { key, line } => {
                write!(f, "key {:?} uses line {} which is not scanned", key, line)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ConfigError::DuplicateIntersection {
                a,
                b,
                first,
                second,
            } => defmt::write!(
                fmt,
                "intersection ({}, {}) mapped by both {=str} and {=str}",
                a,
                b,
                first,
                second
            ),
            ConfigError::DuplicateName(name) => {
                defmt::write!(fmt, "key name {=str} used twice", name)
            }
            ConfigError::NoDriveLines => defmt::write!(fmt, "no drive lines configured"),
            ConfigError::NoSenseLines => defmt::write!(fmt, "no sense lines configured"),
            ConfigError::LineRoleConflict(line) => {
                defmt::write!(fmt, "line {} configured more than once", line)
            }
            ConfigError::UnconfiguredLine { key, line } => {
                defmt::write!(fmt, "key {=str} uses line {} which is not scanned", key, line)
            }
        }
    }
}

/// A GPIO failure during one scan.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScanError<E> {
    Drive { line: Line, error: E },
    Sense { line: Line, error: E },
}

impl<E> ScanError<E> {
    pub fn line(&self) -> Line {
        match self {
            ScanError::Drive { line, .. } | ScanError::Sense { line, .. } => *line,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for ScanError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Drive { line, error } => {
                write!(f, "failed to drive line {}: {:?}", line, error)
            }
            ScanError::Sense { line, error } => {
                write!(f, "failed to read line {}: {:?}", line, error)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for ScanError<E> {}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for ScanError<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ScanError::Drive { line, .. } => defmt::write!(fmt, "failed to drive line {}", line),
            ScanError::Sense { line, .. } => defmt::write!(fmt, "failed to read line {}", line),
        }
    }
}
