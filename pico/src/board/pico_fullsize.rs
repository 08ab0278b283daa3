//! Full-size board on a Raspberry Pi Pico.
//!
//! The drive lines are the matrix columns and the sense lines the rows.
//! Intersections in the table are written (row, column), as traced from the
//! board.

use keymatrix::{KeyDef, Keyboard::*};

pub const PRODUCT: &str = "Pico Fullsize";

macro_rules! drive {
    ($pins:expr) => {
        crate::board::drive_pins!($pins,
            0: gpio0, 1: gpio1, 2: gpio2, 3: gpio3, 4: gpio4, 5: gpio5,
            6: gpio6, 7: gpio7, 8: gpio8, 9: gpio9, 11: gpio11, 12: gpio12,
            14: gpio14, 15: gpio15, 16: gpio16, 17: gpio17, 20: gpio20, 27: gpio27)
    };
}
pub(crate) use drive;

macro_rules! sense {
    ($pins:expr) => {
        crate::board::sense_pins!($pins,
            10: gpio10, 13: gpio13, 18: gpio18, 19: gpio19,
            21: gpio21, 22: gpio22, 26: gpio26, 28: gpio28)
    };
}
pub(crate) use sense;

pub static KEYS: &[KeyDef] = &[
    // Function row
    KeyDef::new(28, 6, "ESC", Escape),
    KeyDef::new(13, 7, "F1", F1),
    KeyDef::new(13, 4, "F2", F2),
    KeyDef::new(18, 4, "F3", F3),
    KeyDef::new(28, 4, "F4", F4),
    KeyDef::new(10, 9, "F5", F5),
    KeyDef::new(28, 1, "F6", F6),
    KeyDef::new(18, 3, "F7", F7),
    KeyDef::new(13, 3, "F8", F8),
    KeyDef::new(13, 8, "F9", F9),
    KeyDef::new(10, 8, "F10", F10),
    KeyDef::new(28, 8, "F11", F11),
    KeyDef::new(21, 8, "F12", F12),
    KeyDef::new(10, 0, "PrtScr", PrintScreen),
    KeyDef::new(19, 0, "ScrLck", ScrollLock),
    KeyDef::new(19, 9, "Pause", Pause),

    // Number row
    KeyDef::new(13, 6, "`", Grave),
    KeyDef::new(10, 6, "1", Keyboard1),
    KeyDef::new(10, 7, "2", Keyboard2),
    KeyDef::new(10, 4, "3", Keyboard3),
    KeyDef::new(10, 5, "4", Keyboard4),
    KeyDef::new(13, 5, "5", Keyboard5),
    KeyDef::new(13, 2, "6", Keyboard6),
    KeyDef::new(10, 2, "7", Keyboard7),
    KeyDef::new(10, 1, "8", Keyboard8),
    KeyDef::new(10, 3, "9", Keyboard9),
    KeyDef::new(10, 11, "0", Keyboard0),
    KeyDef::new(13, 11, "-", Minus),
    KeyDef::new(13, 1, "=", Equal),
    KeyDef::new(18, 8, "BckSpc", DeleteBackspace),

    KeyDef::new(13, 12, "Ins", Insert),
    KeyDef::new(13, 16, "Home", Home),
    KeyDef::new(13, 20, "PgUp", PageUp),

    KeyDef::new(22, 27, "NmLck", KeypadNumLockAndClear),
    KeyDef::new(22, 12, "N_/", KeypadDivide),
    KeyDef::new(22, 20, "N_*", KeypadMultiply),
    KeyDef::new(21, 20, "N_-", KeypadSubtract),

    // Top letter row
    KeyDef::new(18, 6, "Tab", Tab),
    KeyDef::new(19, 6, "q", Q),
    KeyDef::new(19, 7, "w", W),
    KeyDef::new(19, 4, "e", E),
    KeyDef::new(19, 5, "r", R),
    KeyDef::new(18, 5, "t", T),
    KeyDef::new(18, 2, "y", Y),
    KeyDef::new(19, 2, "u", U),
    KeyDef::new(19, 1, "i", I),
    KeyDef::new(19, 3, "o", O),
    KeyDef::new(19, 11, "p", P),
    KeyDef::new(18, 11, "[", LeftBrace),
    KeyDef::new(18, 1, "]", RightBrace),
    KeyDef::new(26, 8, "\\", Backslash),

    KeyDef::new(13, 27, "Del", DeleteForward),
    KeyDef::new(10, 16, "End", End),
    KeyDef::new(10, 20, "PgDn", PageDown),

    KeyDef::new(19, 27, "P_7", Keypad7Home),
    KeyDef::new(19, 12, "P_8", Keypad8UpArrow),
    KeyDef::new(19, 20, "P_9", Keypad9PageUp),
    KeyDef::new(19, 16, "P_+", KeypadAdd),

    // Home row
    KeyDef::new(18, 7, "CpsLck", CapsLock),
    KeyDef::new(26, 6, "a", A),
    KeyDef::new(26, 7, "s", S),
    KeyDef::new(26, 4, "d", D),
    KeyDef::new(26, 5, "f", F),
    KeyDef::new(28, 5, "g", G),
    KeyDef::new(28, 2, "h", H),
    KeyDef::new(26, 2, "j", J),
    KeyDef::new(26, 1, "k", K),
    KeyDef::new(26, 3, "l", L),
    KeyDef::new(26, 11, ";", Semicolon),
    KeyDef::new(28, 11, "'", Apostrophe),
    KeyDef::new(22, 8, "Enter", ReturnEnter),

    KeyDef::new(18, 27, "P_4", Keypad4LeftArrow),
    KeyDef::new(18, 12, "P_5", Keypad5),
    KeyDef::new(18, 20, "P_6", Keypad6RightArrow),

    // Bottom letter row
    KeyDef::new(18, 17, "Lshift", LeftShift),
    KeyDef::new(22, 6, "z", Z),
    KeyDef::new(22, 7, "x", X),
    KeyDef::new(22, 4, "c", C),
    KeyDef::new(22, 5, "v", V),
    KeyDef::new(21, 5, "b", B),
    KeyDef::new(21, 2, "n", N),
    KeyDef::new(22, 2, "m", M),
    KeyDef::new(22, 1, ",", Comma),
    KeyDef::new(22, 3, ".", Dot),
    KeyDef::new(21, 11, "/", ForwardSlash),
    KeyDef::new(26, 17, "Rshift", RightShift),

    KeyDef::new(28, 16, "Up", UpArrow),

    KeyDef::new(26, 27, "P_1", Keypad1End),
    KeyDef::new(26, 12, "P_2", Keypad2DownArrow),
    KeyDef::new(26, 20, "P_3", Keypad3PageDown),
    KeyDef::new(26, 16, "P_Enter", KeypadEnter),

    // Space row
    KeyDef::new(13, 9, "Lctrl", LeftControl),
    KeyDef::new(18, 15, "L_Meta", LeftGUI),
    KeyDef::new(28, 0, "L_Alt", LeftAlt),
    KeyDef::new(28, 27, "SpcBar", Space),
    KeyDef::new(21, 0, "R_Alt", RightAlt),
    KeyDef::new(26, 14, "R_Meta", RightGUI),
    // Function layer shift.  Nothing above HID uses it yet.
    KeyDef::logical(21, 3, "Fn"),
    KeyDef::new(22, 9, "R_Ctrl", RightControl),
    KeyDef::new(21, 16, "Left", LeftArrow),
    KeyDef::new(21, 27, "Dn", DownArrow),
    KeyDef::new(21, 12, "Right", RightArrow),

    KeyDef::new(28, 12, "P_0", Keypad0Insert),
    KeyDef::new(28, 20, "P_.", KeypadDot),
];
