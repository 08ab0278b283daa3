//! USB HID seam
//!
//! The tracker talks to the host through a [`HidTransport`], which is
//! expected to keep its own set of held codes and report it.  Calls are
//! assumed safe to repeat: pressing an already-pressed code does nothing.

use core::fmt::{self, Debug};

use usbd_human_interface_device::page::Keyboard;

/// Something that can report key state to a USB host.
pub trait HidTransport {
    type Error: Debug;

    /// Report that `code` is now held.
    fn press(&mut self, code: Keyboard) -> Result<(), Self::Error>;

    /// Report that `code` is no longer held.
    fn release(&mut self, code: Keyboard) -> Result<(), Self::Error>;

    /// Report that nothing is held.
    fn release_all(&mut self) -> Result<(), Self::Error>;
}

impl<T: HidTransport + ?Sized> HidTransport for &mut T {
    type Error = T::Error;

    fn press(&mut self, code: Keyboard) -> Result<(), Self::Error> {
        (**self).press(code)
    }

    fn release(&mut self, code: Keyboard) -> Result<(), Self::Error> {
        (**self).release(code)
    }

    fn release_all(&mut self) -> Result<(), Self::Error> {
        (**self).release_all()
    }
}

/// One transition sent to the host.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum HidEvent {
    Press(Keyboard),
    Release(Keyboard),
}

impl HidEvent {
    pub fn code(&self) -> Keyboard {
        match self {
            HidEvent::Press(k) => *k,
            HidEvent::Release(k) => *k,
        }
    }

    pub fn is_press(&self) -> bool {
        match self {
            HidEvent::Press(_) => true,
            HidEvent::Release(_) => false,
        }
    }

    pub fn is_release(&self) -> bool {
        !self.is_press()
    }

    /// Deliver this event to a transport.
    pub fn send<T: HidTransport>(&self, transport: &mut T) -> Result<(), T::Error> {
        match self {
            HidEvent::Press(k) => transport.press(*k),
            HidEvent::Release(k) => transport.release(*k),
        }
    }
}

impl fmt::Display for HidEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HidEvent::Press(k) => write!(f, "Press({:?})", k),
            HidEvent::Release(k) => write!(f, "Release({:?})", k),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HidEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            HidEvent::Press(k) => defmt::write!(fmt, "Press({})", k),
            HidEvent::Release(k) => defmt::write!(fmt, "Release({})", k),
        }
    }
}
