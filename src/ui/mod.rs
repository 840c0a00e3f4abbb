//! User interface subsystem - OLED display + two rotary encoders.
//!
//! ## Components
//!
//! - **Display**: SSD1306 128×64 OLED via I²C ([`display`])
//! - **Encoders**: volume knob and track knob, polled quadrature ([`encoder`])
//! - **Buttons**: one push switch per knob ([`buttons`])
//! - **Text**: metadata cleanup and two-line wrapping ([`text`])

pub mod buttons;
pub mod display;
pub mod encoder;
pub mod input_logic;
pub mod text;

#[cfg(test)]
mod tests;

use embedded_hal::digital::InputPin;

use buttons::ButtonChannel;
use encoder::{Encoder, EncoderChannel};

/// Both knobs and their buttons.
///
/// The volume knob's button toggles play/pause; the track knob's button
/// stops playback.
pub struct Controls<E, P> {
    pub volume: EncoderChannel<E>,
    pub track: EncoderChannel<E>,
    pub play_pause: ButtonChannel<P>,
    pub stop: ButtonChannel<P>,
}

impl<E: Encoder, P: InputPin> Controls<E, P> {
    pub fn new(volume: E, track: E, play_pause: P, stop: P) -> Self {
        Self {
            volume: EncoderChannel::new(volume),
            track: EncoderChannel::new(track),
            play_pause: ButtonChannel::new(play_pause),
            stop: ButtonChannel::new(stop),
        }
    }
}
