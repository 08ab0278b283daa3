// Usb HID management.

use alloc::vec::Vec;
use core::cell::RefCell;

use defmt::{debug, info, warn};
use frunk::{HCons, HNil};
use keymatrix::HidTransport;
use usb_device::{
    class_prelude::{UsbBus, UsbBusAllocator},
    prelude::{UsbDevice, UsbDeviceBuilder, UsbDeviceState, UsbVidPid},
    UsbError,
};
use usbd_human_interface_device::{
    device::{
        keyboard::{NKROBootKeyboard, NKROBootKeyboardConfig},
        DeviceClass,
    },
    page::Keyboard,
    usb_class::{UsbHidClass, UsbHidClassBuilder},
    UsbHidError,
};

// Type of the device list, which is internal to usbd_human_interface_device.
type InterfaceList<'a, Bus> = HCons<NKROBootKeyboard<'a, Bus>, HNil>;

/// Why a report could not be handed to the USB stack.
#[derive(Debug)]
pub enum ReportError {
    Usb(UsbError),
    Serialization,
}

pub struct UsbHandler<'a, Bus: UsbBus> {
    dev: UsbDevice<'a, Bus>,
    hid: UsbHidClass<'a, Bus, InterfaceList<'a, Bus>>,
    state: Option<UsbDeviceState>,

    /// Codes the host should see as down.
    held: Vec<Keyboard>,
    /// `held` has changed since the last report the stack accepted.
    pending: bool,
}

impl<'a, Bus: UsbBus> UsbHandler<'a, Bus> {
    pub fn new(usb_bus: &'a UsbBusAllocator<Bus>) -> Self {
        let keyboard = UsbHidClassBuilder::new()
            .add_device(NKROBootKeyboardConfig::default())
            .build(usb_bus);
        let usb_dev = UsbDeviceBuilder::new(usb_bus, UsbVidPid(0x1209, 0x0001))
            .manufacturer("keymatrix")
            .product(crate::board::PRODUCT)
            .serial_number("development")
            .device_class(0)
            .max_power(500)
            .build();
        UsbHandler {
            hid: keyboard,
            dev: usb_dev,
            state: None,
            held: Vec::new(),
            pending: false,
        }
    }

    pub fn state(&self) -> Option<UsbDeviceState> {
        self.state
    }

    /// Perform a 1khz tick operation.  Retries a report the stack was too
    /// busy to take.
    pub fn tick(&mut self) {
        match self.hid.device().tick() {
            Ok(()) => (),
            Err(UsbHidError::WouldBlock) => (),
            Err(_) => debug!("tick error"),
        }

        if self.pending {
            if let Err(e) = self.send_report() {
                warn!("Report retry failed: {}", defmt::Debug2Format(&e));
            }
        }
    }

    /// Perform a periodic poll.  This needs to be called much more often than
    /// the tick, including while the matrix is settling.
    pub fn poll(&mut self) {
        if self.dev.poll(&mut [&mut self.hid]) {
            if let Ok(leds) = self.hid.device().read_report() {
                debug!("Host LEDs: num {} caps {}", leds.num_lock, leds.caps_lock);
            }
        }

        // Check for state changes.
        let new_state = self.dev.state();
        if self.state != Some(new_state) {
            match new_state {
                UsbDeviceState::Addressed => info!("State: Addressed"),
                UsbDeviceState::Configured => info!("State: Configured"),
                UsbDeviceState::Default => info!("State: Default"),
                UsbDeviceState::Suspend => info!("State: Suspend"),
            }
            self.state = Some(new_state);
        }
    }

    /// Hand the current set of held codes to the stack.  A busy endpoint
    /// leaves the report pending for the next tick.
    fn send_report(&mut self) -> Result<(), ReportError> {
        let status = if self.held.is_empty() {
            self.hid.device().write_report([Keyboard::NoEventIndicated])
        } else {
            self.hid.device().write_report(self.held.iter().copied())
        };
        match status {
            Ok(()) | Err(UsbHidError::Duplicate) => {
                self.pending = false;
                Ok(())
            }
            Err(UsbHidError::WouldBlock) => {
                self.pending = true;
                Ok(())
            }
            Err(UsbHidError::UsbError(e)) => {
                self.pending = true;
                Err(ReportError::Usb(e))
            }
            Err(UsbHidError::SerializationError) => {
                self.pending = true;
                Err(ReportError::Serialization)
            }
        }
    }
}

impl<'a, Bus: UsbBus> HidTransport for UsbHandler<'a, Bus> {
    type Error = ReportError;

    fn press(&mut self, code: Keyboard) -> Result<(), ReportError> {
        if !self.held.contains(&code) {
            self.held.push(code);
        }
        self.send_report()
    }

    fn release(&mut self, code: Keyboard) -> Result<(), ReportError> {
        self.held.retain(|&k| k != code);
        self.send_report()
    }

    fn release_all(&mut self) -> Result<(), ReportError> {
        self.held.clear();
        self.send_report()
    }
}

/// The handler is shared between the run loop, the settle delay (which
/// polls it), and the scan cycle (which reports to it).  None of these
/// nest, so the borrows never overlap.
pub struct SharedUsb<'r, 'a, Bus: UsbBus>(pub &'r RefCell<UsbHandler<'a, Bus>>);

impl<'r, 'a, Bus: UsbBus> HidTransport for SharedUsb<'r, 'a, Bus> {
    type Error = ReportError;

    fn press(&mut self, code: Keyboard) -> Result<(), ReportError> {
        self.0.borrow_mut().press(code)
    }

    fn release(&mut self, code: Keyboard) -> Result<(), ReportError> {
        self.0.borrow_mut().release(code)
    }

    fn release_all(&mut self) -> Result<(), ReportError> {
        self.0.borrow_mut().release_all()
    }
}
