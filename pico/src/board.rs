//! Board-specific definitions

#[cfg(feature = "pico-fullsize")]
mod pico_fullsize;

#[cfg(feature = "pico-fullsize")]
pub use pico_fullsize::*;

/// Drive lines idle high, and are pulled low to select them.
macro_rules! drive_pins {
    ($pins:expr, $($num:literal: $pin:ident),* $(,)?) => {
        alloc::vec![
            $((keymatrix::Line($num),
               $pins.$pin
                 .into_push_pull_output_in_state(PinState::High)
                 .into_dyn_pin())),*
        ]
    };
}
pub(crate) use drive_pins;

/// Sense lines have pull-ups, so a closed switch reads low.
macro_rules! sense_pins {
    ($pins:expr, $($num:literal: $pin:ident),* $(,)?) => {
        alloc::vec![
            $((keymatrix::Line($num),
               $pins.$pin
                 .into_pull_up_input()
                 .into_dyn_pin())),*
        ]
    };
}
pub(crate) use sense_pins;
