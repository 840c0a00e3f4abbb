//! Push-button input.
//!
//! Both encoder knobs carry a push switch (active-low with internal
//! pull-up). Buttons are sampled by the scheduler every
//! [`BUTTON_POLL_MS`](crate::config::BUTTON_POLL_MS); the sampling period
//! is the debounce.

use embedded_hal::digital::{InputPin, PinState};

/// One polled button.
///
/// Reports a press on the released-to-pressed edge only. Holding the
/// button reports nothing further until it is released.
pub struct ButtonChannel<P> {
    pin: P,
    last_level: PinState,
    /// Free-running toggle for buttons that alternate between two actions.
    latched: bool,
}

impl<P: InputPin> ButtonChannel<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            last_level: PinState::High,
            latched: false,
        }
    }

    /// Sample the pin. Returns `true` on a fresh press.
    ///
    /// A read error is treated as "released".
    pub fn poll(&mut self) -> bool {
        let level = match self.pin.is_low() {
            Ok(true) => PinState::Low,
            _ => PinState::High,
        };
        let pressed = self.last_level == PinState::High && level == PinState::Low;
        self.last_level = level;
        pressed
    }

    /// Flip the toggle and return its new value.
    pub fn toggle_latch(&mut self) -> bool {
        self.latched = !self.latched;
        self.latched
    }
}
