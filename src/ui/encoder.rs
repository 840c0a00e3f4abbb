//! Rotary encoder input.
//!
//! [`RotaryKnob`] counts steps from a two-pin mechanical encoder decoded by
//! `rotary-encoder-hal`. [`EncoderChannel`] turns its running position into
//! per-tick deltas for the scheduler.

use embedded_hal::digital::InputPin;
use rotary_encoder_hal::{DefaultPhase, Direction, Rotary};

/// A polled position source.
pub trait Encoder {
    /// Sample the hardware. Call as often as possible.
    fn tick(&mut self);

    /// Running position in steps.
    fn position(&self) -> i32;
}

/// Polled rotary encoder. Counts down when turned clockwise.
pub struct RotaryKnob<A, B> {
    rotary: Rotary<A, B, DefaultPhase>,
    position: i32,
}

impl<A: InputPin, B: InputPin> RotaryKnob<A, B> {
    pub fn new(pin_a: A, pin_b: B) -> Self {
        let mut rotary = Rotary::new(pin_a, pin_b);
        // Settle the decoder on the resting levels; this is not a turn.
        let _ = rotary.update();
        Self {
            rotary,
            position: 0,
        }
    }
}

impl<A: InputPin, B: InputPin> Encoder for RotaryKnob<A, B> {
    fn tick(&mut self) {
        let step = match self.rotary.update() {
            Ok(Direction::Clockwise) => -1,
            Ok(Direction::CounterClockwise) => 1,
            Ok(Direction::None) | Err(_) => return,
        };
        self.position = self.position.wrapping_add(step);
    }

    fn position(&self) -> i32 {
        self.position
    }
}

/// An encoder plus the position seen on the previous tick.
pub struct EncoderChannel<E> {
    encoder: E,
    last_position: i32,
}

impl<E: Encoder> EncoderChannel<E> {
    /// Starts from the encoder's current position so the first tick reports
    /// no movement.
    pub fn new(encoder: E) -> Self {
        let last_position = encoder.position();
        Self {
            encoder,
            last_position,
        }
    }

    /// Tick the encoder and return the movement since the previous call.
    pub fn tick(&mut self) -> i32 {
        self.encoder.tick();
        let position = self.encoder.position();
        let delta = position.wrapping_sub(self.last_position);
        self.last_position = position;
        delta
    }
}
