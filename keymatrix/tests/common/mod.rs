// Shared test support: a simulated diode matrix, and recording stand-ins
// for the delay and the HID transport.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::{InputPin, OutputPin};
use keymatrix::{
    HidTransport, KeyDef, KeyId, KeyMap, Keyboard, Line, Matrix, Polarity, ScanConfig, ScanResult,
};

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub const DRIVE: [u8; 3] = [0, 1, 2];
pub const SENSE: [u8; 2] = [10, 11];

/// A small board, with entries listed in both orientations.  The
/// intersection (2, 10) is wired but missing from the table.
pub static TABLE: &[KeyDef] = &[
    KeyDef::new(10, 0, "a", Keyboard::A),
    KeyDef::new(1, 10, "b", Keyboard::B),
    KeyDef::new(11, 1, "c", Keyboard::C),
    KeyDef::new(0, 11, "Lshift", Keyboard::LeftShift),
    KeyDef::logical(11, 2, "Fn"),
];

pub fn keymap() -> KeyMap {
    match KeyMap::build(TABLE) {
        Ok(map) => map,
        Err(e) => panic!("test table rejected: {}", e),
    }
}

/// Look a key up by name, failing the test if it is not there.
pub fn id(map: &KeyMap, name: &str) -> KeyId {
    match map.key(name) {
        Some(id) => id,
        None => panic!("no key named {:?}", name),
    }
}

pub fn scan_of(map: &KeyMap, names: &[&str]) -> ScanResult {
    names.iter().map(|n| id(map, n)).collect()
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PinFault(pub u8);

/// The electrical state of the simulated board.
#[derive(Debug, Default)]
pub struct Board {
    pub polarity: Polarity,
    /// Drive lines currently at their active level.
    pub active: BTreeSet<u8>,
    /// Closed switches, as (drive, sense).
    pub closed: BTreeSet<(u8, u8)>,
    /// The most drive lines ever seen active at once.
    pub peak_active: usize,
    /// Every level change, as (line, high).
    pub writes: Vec<(u8, bool)>,
    pub fail_drive: Option<u8>,
    pub fail_sense: Option<u8>,
}

impl Board {
    pub fn press(&mut self, drive: u8, sense: u8) {
        self.closed.insert((drive, sense));
    }

    pub fn release(&mut self, drive: u8, sense: u8) {
        self.closed.remove(&(drive, sense));
    }

    fn sense_closed(&self, sense: u8) -> bool {
        self.active.iter().any(|&d| self.closed.contains(&(d, sense)))
    }
}

pub type SharedBoard = Rc<RefCell<Board>>;

pub fn board(polarity: Polarity) -> SharedBoard {
    Rc::new(RefCell::new(Board {
        polarity,
        ..Board::default()
    }))
}

pub struct SimOutput {
    line: u8,
    board: SharedBoard,
}

impl SimOutput {
    fn set(&mut self, high: bool) -> Result<(), PinFault> {
        let mut b = self.board.borrow_mut();
        if b.fail_drive == Some(self.line) {
            return Err(PinFault(self.line));
        }
        b.writes.push((self.line, high));
        let active = match b.polarity {
            Polarity::ActiveLow => !high,
            Polarity::ActiveHigh => high,
        };
        if active {
            b.active.insert(self.line);
        } else {
            b.active.remove(&self.line);
        }
        assert!(b.active.len() <= 1, "drive lines active together: {:?}", b.active);
        b.peak_active = b.peak_active.max(b.active.len());
        Ok(())
    }
}

impl OutputPin for SimOutput {
    type Error = PinFault;

    fn set_low(&mut self) -> Result<(), PinFault> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        self.set(true)
    }
}

pub struct SimInput {
    line: u8,
    board: SharedBoard,
}

impl InputPin for SimInput {
    type Error = PinFault;

    fn is_high(&self) -> Result<bool, PinFault> {
        let b = self.board.borrow();
        if b.fail_sense == Some(self.line) {
            return Err(PinFault(self.line));
        }
        let closed = b.sense_closed(self.line);
        Ok(match b.polarity {
            // Pulled up, so an open switch reads high.
            Polarity::ActiveLow => !closed,
            Polarity::ActiveHigh => closed,
        })
    }

    fn is_low(&self) -> Result<bool, PinFault> {
        self.is_high().map(|h| !h)
    }
}

pub type SimMatrix = Matrix<SimOutput, SimInput>;

pub type Lines = (Vec<(Line, SimOutput)>, Vec<(Line, SimInput)>);

pub fn lines(board: &SharedBoard, drive: &[u8], sense: &[u8]) -> Lines {
    let drive = drive
        .iter()
        .map(|&line| {
            (
                Line(line),
                SimOutput {
                    line,
                    board: board.clone(),
                },
            )
        })
        .collect();
    let sense = sense
        .iter()
        .map(|&line| {
            (
                Line(line),
                SimInput {
                    line,
                    board: board.clone(),
                },
            )
        })
        .collect();
    (drive, sense)
}

pub fn matrix(board: &SharedBoard, config: &ScanConfig) -> SimMatrix {
    let (drive, sense) = lines(board, &DRIVE, &SENSE);
    match Matrix::new(drive, sense, config) {
        Ok(m) => m,
        Err(e) => panic!("matrix rejected: {}", e),
    }
}

/// Records every delay requested of it.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub calls: Vec<u32>,
}

impl DelayUs<u32> for RecordingDelay {
    fn delay_us(&mut self, us: u32) {
        self.calls.push(us);
    }
}

/// A call made on the transport.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sent {
    Press(Keyboard),
    Release(Keyboard),
    ReleaseAll,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransportFault;

/// A transport that keeps what a host would see, and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    /// Every call, including ones that failed.
    pub sent: Vec<Sent>,
    /// Codes the host believes are down.
    pub host: Vec<Keyboard>,
    /// Fail every call for this code.
    pub fail_code: Option<Keyboard>,
    pub fail_release_all: bool,
}

impl RecordingTransport {
    pub fn host_has(&self, code: Keyboard) -> bool {
        self.host.contains(&code)
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl HidTransport for RecordingTransport {
    type Error = TransportFault;

    fn press(&mut self, code: Keyboard) -> Result<(), TransportFault> {
        self.sent.push(Sent::Press(code));
        if self.fail_code == Some(code) {
            return Err(TransportFault);
        }
        if !self.host.contains(&code) {
            self.host.push(code);
        }
        Ok(())
    }

    fn release(&mut self, code: Keyboard) -> Result<(), TransportFault> {
        self.sent.push(Sent::Release(code));
        if self.fail_code == Some(code) {
            return Err(TransportFault);
        }
        self.host.retain(|&c| c != code);
        Ok(())
    }

    fn release_all(&mut self) -> Result<(), TransportFault> {
        self.sent.push(Sent::ReleaseAll);
        if self.fail_release_all {
            return Err(TransportFault);
        }
        self.host.clear();
        Ok(())
    }
}
