//! Unified error type for bt-speaker.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for on-target
//! logging and `Display` for host tests.

use core::fmt;

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Display
    /// The panel did not answer its initialisation sequence.
    DisplayInit,

    /// Drawing into the frame buffer failed.
    Draw,

    /// Transferring the frame buffer to the panel failed.
    Commit,

    // Bluetooth
    /// A callback event was dropped because the scheduler queue was full.
    EventQueueFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DisplayInit => f.write_str("display initialisation failed"),
            Error::Draw => f.write_str("drawing failed"),
            Error::Commit => f.write_str("display commit failed"),
            Error::EventQueueFull => f.write_str("event queue full"),
        }
    }
}
