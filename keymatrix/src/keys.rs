//! Keys on the matrix
//!
//! A physical key sits at the intersection of one drive line and one sense
//! line.  The board describes each key once, as a [`KeyDef`], and the rest of
//! the crate refers to keys through the [`KeyId`] the key map hands out.

use core::fmt;

use usbd_human_interface_device::page::Keyboard;

/// A single GPIO line, named by its GPIO number.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Line(pub u8);

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GP{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Line {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "GP{}", self.0)
    }
}

/// Static description of one key.
///
/// The two lines may be given in either order; the wiring does not promise
/// which of them ends up on the drive side.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct KeyDef {
    pub lines: (Line, Line),
    pub name: &'static str,
    /// The code sent to the host.  `None` for keys that only mean something
    /// to a layer above HID (such as a function-layer shift), which are
    /// tracked but never reported.
    pub code: Option<Keyboard>,
}

impl KeyDef {
    /// A key that reports `code` to the host.
    pub const fn new(a: u8, b: u8, name: &'static str, code: Keyboard) -> Self {
        KeyDef {
            lines: (Line(a), Line(b)),
            name,
            code: Some(code),
        }
    }

    /// A key with no HID code.
    pub const fn logical(a: u8, b: u8, name: &'static str) -> Self {
        KeyDef {
            lines: (Line(a), Line(b)),
            name,
            code: None,
        }
    }
}

/// The logical identity of a closed intersection.
///
/// Mapped keys are identified by their position in the key map, which is
/// one-to-one with their (unique) display name.  A closure on a pair that the
/// key map does not know about keeps the raw lines so that wiring mistakes
/// can be seen, lower line first.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum KeyId {
    Mapped(u16),
    Unmapped(Line, Line),
}

impl KeyId {
    pub fn is_mapped(&self) -> bool {
        match self {
            KeyId::Mapped(_) => true,
            KeyId::Unmapped(..) => false,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for KeyId {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            KeyId::Mapped(index) => defmt::write!(fmt, "#{}", index),
            KeyId::Unmapped(a, b) => defmt::write!(fmt, "Unknown({},{})", a, b),
        }
    }
}

/// A key identity paired with the name the key map gives it, for printing.
#[derive(Clone, Copy)]
pub struct KeyName<'a> {
    pub(crate) id: KeyId,
    pub(crate) name: Option<&'a str>,
}

impl fmt::Display for KeyName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name, self.id) {
            (Some(name), _) => f.write_str(name),
            (None, KeyId::Unmapped(a, b)) => write!(f, "Unknown({},{})", a, b),
            (None, KeyId::Mapped(index)) => write!(f, "#{}", index),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for KeyName<'_> {
    fn format(&self, fmt: defmt::Formatter) {
        match (self.name, self.id) {
            (Some(name), _) => defmt::write!(fmt, "{=str}", name),
            (None, id) => defmt::write!(fmt, "{}", id),
        }
    }
}
