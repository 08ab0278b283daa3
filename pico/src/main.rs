//! Matrix keyboard firmware for the Raspberry Pi Pico
//!
//! Scans the key matrix every few milliseconds and reports the held keys to
//! the host as a USB NKRO boot keyboard.  The on-board LED on GP25 shows the
//! USB state, and stays lit while any key is held.
#![no_std]
#![no_main]

extern crate alloc;

use core::cell::RefCell;

use bsp::{entry, XOSC_CRYSTAL_FREQ};
use defmt::{info, warn};
use defmt_rtt as _;
use embedded_hal::blocking::delay::DelayUs;
use fugit::MicrosDurationU64;
use panic_probe as _;
use usb_device::class_prelude::UsbBusAllocator;
use usb_device::prelude::UsbDeviceState;

use embedded_alloc::Heap;

#[global_allocator]
static HEAP: Heap = Heap::empty();

// Provide an alias for our BSP so we can switch targets quickly.
use rp_pico as bsp;

use bsp::hal::{
    clocks::init_clocks_and_plls,
    gpio::PinState,
    pac,
    sio::Sio,
    timer::Instant,
    watchdog::Watchdog,
    Timer,
};

use bsp::hal;

use keymatrix::{Controller, KeyMap, Matrix, ScanConfig};

mod board;
mod leds;
mod usb;

use leds::{LedManager, HELD_INDICATOR, IDLE_INDICATOR, INIT_INDICATOR, SLEEP_INDICATOR};
use usb::{SharedUsb, UsbHandler};

/// USB report tick, and the LED step.
const TICK: MicrosDurationU64 = MicrosDurationU64::millis(1);

#[entry]
fn main() -> ! {
    {
        use core::mem::MaybeUninit;
        const HEAP_SIZE: usize = 16384;
        static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
        unsafe { HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE) }
    }

    let Some(mut pac) = pac::Peripherals::take() else {
        defmt::panic!("peripherals already taken");
    };
    let mut watchdog = Watchdog::new(pac.WATCHDOG);
    let sio = Sio::new(pac.SIO);

    info!("Program start");
    // External high-speed crystal on the pico board is 12Mhz
    let Ok(clocks) = init_clocks_and_plls(
        XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    ) else {
        defmt::panic!("clock setup failed");
    };

    let pins = bsp::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    let mut leds = LedManager::new(pins.led.into_push_pull_output());

    // Any problem with the board description stops us here, before the host
    // ever sees a keyboard.
    let config = ScanConfig::default();
    let controller = KeyMap::build(board::KEYS).and_then(|map| {
        let drive = board::drive!(pins);
        let sense = board::sense!(pins);
        let matrix = Matrix::new(drive, sense, &config)?;
        Controller::new(map, matrix, config)
    });
    let mut controller = match controller {
        Ok(c) => c,
        Err(e) => defmt::panic!("Bad board description: {}", e),
    };
    let interval = MicrosDurationU64::millis(u64::from(controller.interval_ms()));

    let usb_bus = UsbBusAllocator::new(hal::usb::UsbBus::new(
        pac.USBCTRL_REGS,
        pac.USBCTRL_DPRAM,
        clocks.usb_clock,
        true,
        &mut pac.RESETS,
    ));
    let usb = RefCell::new(UsbHandler::new(&usb_bus));

    let start = timer.get_counter();
    let mut pacer = Pacer {
        timer,
        usb: &usb,
        next_tick: start,
    };

    let mut state = None;
    let mut next_scan = start;
    let mut next_led = start;
    loop {
        let now = pacer.service();

        let new_state = usb.borrow().state();
        if new_state != state {
            // Leaving the configured state is the closest thing we get to
            // being told to stop.  Don't leave anything down on the host.
            if state == Some(UsbDeviceState::Configured) {
                info!("Host stopped us, releasing all keys");
                let report = controller.shutdown(&mut SharedUsb(&usb));
                if report.failures > 0 {
                    warn!("{} release failures on stop", report.failures);
                }
            }
            state = new_state;
        }
        let configured = state == Some(UsbDeviceState::Configured);

        if configured && now >= next_scan {
            // Scan errors are logged by the controller, and cost only this
            // cycle.
            if let Ok(report) = controller.cycle(&mut pacer, &mut SharedUsb(&usb)) {
                if report.failures > 0 {
                    warn!("{} transport failures", report.failures);
                }
            }
            next_scan = pacer.now() + interval;
        }

        if now >= next_led {
            leds.set(match state {
                Some(UsbDeviceState::Configured) if controller.any_held() => &HELD_INDICATOR,
                Some(UsbDeviceState::Configured) => &IDLE_INDICATOR,
                Some(UsbDeviceState::Suspend) => &SLEEP_INDICATOR,
                _ => &INIT_INDICATOR,
            });
            leds.tick();
            next_led = now + TICK;
        }
    }
}

/// Keeps USB serviced.  Used as the scanner's delay, so the settle time
/// between drive lines is spent polling rather than spinning.
struct Pacer<'r, 'a> {
    timer: Timer,
    usb: &'r RefCell<UsbHandler<'a, hal::usb::UsbBus>>,
    next_tick: Instant,
}

impl Pacer<'_, '_> {
    fn now(&self) -> Instant {
        self.timer.get_counter()
    }

    /// Poll USB, and run the 1ms tick if it is due.  Returns the current
    /// time.
    fn service(&mut self) -> Instant {
        let now = self.now();
        let mut usb = self.usb.borrow_mut();
        usb.poll();
        if now >= self.next_tick {
            usb.tick();
            self.next_tick = now + TICK;
        }
        now
    }
}

impl DelayUs<u32> for Pacer<'_, '_> {
    fn delay_us(&mut self, us: u32) {
        let end = self.now() + MicrosDurationU64::micros(u64::from(us));
        while self.service() < end {}
    }
}
