//! Unit tests for encoder decoding, button edges and screen composition.
//!
//! These tests run on the host (not embedded) against fake pins and an
//! in-memory 128×64 panel.

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};

use super::buttons::ButtonChannel;
use super::display::{draw_splash, gauge_fill, render, Frame, Panel};
use super::encoder::{Encoder, EncoderChannel, RotaryKnob};
use super::text::bounded;
use crate::a2dp::{ConnectionState, SinkEvent};
use crate::config::{GAUGE_WIDTH, GAUGE_X, SCREEN_HEIGHT, SCREEN_WIDTH, VOLUME_Y};
use crate::error::Error;
use crate::state::PlaybackState;

// ═══════════════════════════════════════════════════════════════════════════
// Fakes
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
struct PinError;

impl embedded_hal::digital::Error for PinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Shared pin level. `None` makes reads fail.
#[derive(Clone)]
struct FakePin(Rc<Cell<Option<bool>>>);

impl FakePin {
    fn new(high: bool) -> Self {
        Self(Rc::new(Cell::new(Some(high))))
    }

    fn set(&self, high: bool) {
        self.0.set(Some(high));
    }

    fn fail(&self) {
        self.0.set(None);
    }
}

impl ErrorType for FakePin {
    type Error = PinError;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, PinError> {
        self.0.get().ok_or(PinError)
    }

    fn is_low(&mut self) -> Result<bool, PinError> {
        self.is_high().map(|high| !high)
    }
}

/// Drive an encoder's pins through a sequence of `a | b << 1` states,
/// ticking after each.
fn turn<E: Encoder>(encoder: &mut E, a: &FakePin, b: &FakePin, states: &[u8]) {
    for &state in states {
        a.set(state & 0b01 != 0);
        b.set(state & 0b10 != 0);
        encoder.tick();
    }
}

/// One full quadrature cycle each way, starting and ending with both pins
/// high.
const CYCLE_FORWARD: [u8; 4] = [0b10, 0b00, 0b01, 0b11];
const CYCLE_BACKWARD: [u8; 4] = [0b01, 0b00, 0b10, 0b11];

fn resting_knob() -> (RotaryKnob<FakePin, FakePin>, FakePin, FakePin) {
    let (a, b) = (FakePin::new(true), FakePin::new(true));
    (RotaryKnob::new(a.clone(), b.clone()), a, b)
}

struct TestPanel {
    pixels: [[bool; SCREEN_WIDTH as usize]; SCREEN_HEIGHT as usize],
    commits: usize,
    fail_commit: bool,
}

impl TestPanel {
    fn new() -> Self {
        Self {
            pixels: [[false; SCREEN_WIDTH as usize]; SCREEN_HEIGHT as usize],
            commits: 0,
            fail_commit: false,
        }
    }

    fn pixel(&self, x: i32, y: i32) -> bool {
        self.pixels[y as usize][x as usize]
    }
}

impl OriginDimensions for TestPanel {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for TestPanel {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(pt, color) in pixels {
            if pt.x >= 0 && pt.x < SCREEN_WIDTH as i32 && pt.y >= 0 && pt.y < SCREEN_HEIGHT as i32 {
                self.pixels[pt.y as usize][pt.x as usize] = color.is_on();
            }
        }
        Ok(())
    }
}

impl Panel for TestPanel {
    fn commit(&mut self) -> Result<(), Error> {
        self.commits += 1;
        if self.fail_commit {
            Err(Error::Commit)
        } else {
            Ok(())
        }
    }
}

fn connected_state() -> PlaybackState {
    let mut state = PlaybackState::new();
    state.set_connection(ConnectionState::Connected);
    state
}

fn frame_text(state: &PlaybackState) -> Vec<String> {
    Frame::compose(state).text().map(String::from).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Quadrature Encoder Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn encoder_still_without_pin_changes() {
    let (mut enc, _a, _b) = resting_knob();
    for _ in 0..10 {
        enc.tick();
    }
    assert_eq!(enc.position(), 0);
}

#[test]
fn encoder_directions_are_opposite() {
    let (mut enc, a, b) = resting_knob();
    turn(&mut enc, &a, &b, &CYCLE_FORWARD);
    let forward = enc.position();
    assert_ne!(forward, 0);

    turn(&mut enc, &a, &b, &CYCLE_BACKWARD);
    assert_eq!(enc.position(), 0);

    turn(&mut enc, &a, &b, &CYCLE_BACKWARD);
    assert_eq!(enc.position(), -forward);
}

#[test]
fn encoder_ignores_failed_reads() {
    let (mut enc, a, b) = resting_knob();
    turn(&mut enc, &a, &b, &CYCLE_FORWARD);
    let before = enc.position();

    a.fail();
    enc.tick();
    enc.tick();
    assert_eq!(enc.position(), before);
}

#[test]
fn channel_reports_deltas_from_initial_position() {
    let (mut enc, a, b) = resting_knob();
    turn(&mut enc, &a, &b, &CYCLE_FORWARD);
    let cycle = enc.position();

    let mut channel = EncoderChannel::new(enc);
    assert_eq!(channel.tick(), 0);

    let mut moved = 0;
    for &state in &CYCLE_FORWARD {
        a.set(state & 0b01 != 0);
        b.set(state & 0b10 != 0);
        moved += channel.tick();
    }
    assert_eq!(moved, cycle);
    assert_eq!(channel.tick(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Button Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn button_fires_on_press_edge_only() {
    let pin = FakePin::new(true);
    let mut button = ButtonChannel::new(pin.clone());

    assert!(!button.poll());
    pin.set(false);
    assert!(button.poll());
    // Held.
    assert!(!button.poll());
    assert!(!button.poll());
    pin.set(true);
    assert!(!button.poll());
    pin.set(false);
    assert!(button.poll());
}

#[test]
fn button_held_at_boot_fires_once() {
    let pin = FakePin::new(false);
    let mut button = ButtonChannel::new(pin.clone());
    assert!(button.poll());
    assert!(!button.poll());
}

#[test]
fn button_read_error_counts_as_released() {
    let pin = FakePin::new(false);
    let mut button = ButtonChannel::new(pin.clone());
    assert!(button.poll());

    pin.fail();
    assert!(!button.poll());
    pin.set(false);
    assert!(button.poll());
}

#[test]
fn button_latch_alternates() {
    let mut button = ButtonChannel::new(FakePin::new(true));
    assert!(button.toggle_latch());
    assert!(!button.toggle_latch());
    assert!(button.toggle_latch());
}

// ═══════════════════════════════════════════════════════════════════════════
// Screen Composition Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn disconnected_screen_shows_pairing_prompt() {
    let state = PlaybackState::new();
    assert_eq!(
        frame_text(&state),
        ["Waiting for device...", "Vol: 50%", "Pair your device", "Name: BT-Speaker"]
    );
}

#[test]
fn connected_idle_screen_shows_ready_prompt() {
    let state = connected_state();
    assert_eq!(
        frame_text(&state),
        ["Phone Connected", "Vol: 50%", "Ready - Press Vol knob", "to Play/Pause"]
    );
}

#[test]
fn playing_screen_substitutes_placeholders() {
    let mut state = connected_state();
    state.apply(SinkEvent::StreamStarted);

    let frame = Frame::compose(&state);
    let rows: Vec<(i32, &str)> = frame.lines.iter().map(|l| (l.y, l.text.as_str())).collect();
    assert_eq!(
        rows,
        [
            (0, "Phone Connected"),
            (10, "Vol: 50%"),
            (22, "No artist info"),
            (32, "Loading..."),
        ]
    );
}

#[test]
fn playing_screen_wraps_long_title() {
    let mut state = connected_state();
    state.apply(SinkEvent::StreamStarted);
    state.apply(SinkEvent::Artist(bounded("Band")));
    state.apply(SinkEvent::Title(bounded(
        "A Really Very Extremely Long Song Title Indeed",
    )));

    let frame = Frame::compose(&state);
    let rows: Vec<(i32, &str)> = frame.lines.iter().map(|l| (l.y, l.text.as_str())).collect();
    assert_eq!(
        rows[2..],
        [
            (22, "Band"),
            (32, "A Really Very Extreme"),
            (42, "ly Long Song Title..."),
        ]
    );
}

#[test]
fn long_device_label_is_ellipsized() {
    let mut state = connected_state();
    state.device_label = bounded("A Very Long Phone Name Indeed");
    assert_eq!(frame_text(&state)[0], "A Very Long Pho...");
}

#[test]
fn gauge_fill_rounds_to_nearest_pixel() {
    let inner = GAUGE_WIDTH - 2;
    assert_eq!(gauge_fill(0), 0);
    assert_eq!(gauge_fill(1), 1);
    assert_eq!(gauge_fill(5), 4);
    assert_eq!(gauge_fill(50), inner / 2);
    assert_eq!(gauge_fill(100), inner);
    assert_eq!(gauge_fill(200), inner);
}

#[test]
fn gauge_monotonic_in_volume() {
    for v in 0..100u8 {
        assert!(gauge_fill(v) <= gauge_fill(v + 1));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Rendering Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn render_draws_gauge_frame_and_fill() {
    let mut panel = TestPanel::new();
    let mut state = PlaybackState::new();

    state.set_volume(0);
    render(&mut panel, &state).unwrap();
    assert!(panel.pixel(GAUGE_X + GAUGE_WIDTH as i32 - 1, VOLUME_Y));
    assert!(!panel.pixel(GAUGE_X + 1, VOLUME_Y + 1));

    state.set_volume(100);
    render(&mut panel, &state).unwrap();
    assert!(panel.pixel(GAUGE_X + 1, VOLUME_Y + 1));
    assert!(panel.pixel(GAUGE_X + GAUGE_WIDTH as i32 - 2, VOLUME_Y + 1));
}

#[test]
fn render_commits_exactly_once() {
    let mut panel = TestPanel::new();
    let state = connected_state();
    let before = state.clone();

    render(&mut panel, &state).unwrap();

    assert_eq!(panel.commits, 1);
    assert_eq!(state, before);
}

#[test]
fn render_reports_commit_failure() {
    let mut panel = TestPanel::new();
    panel.fail_commit = true;
    assert_eq!(render(&mut panel, &PlaybackState::new()), Err(Error::Commit));
    assert_eq!(panel.commits, 1);
}

#[test]
fn render_clears_previous_frame() {
    let mut panel = TestPanel::new();
    panel.pixels = [[true; SCREEN_WIDTH as usize]; SCREEN_HEIGHT as usize];
    render(&mut panel, &PlaybackState::new()).unwrap();
    assert!(!panel.pixel(0, SCREEN_HEIGHT as i32 - 1));
    assert!(!panel.pixel(SCREEN_WIDTH as i32 - 1, SCREEN_HEIGHT as i32 - 1));
}

#[test]
fn splash_is_committed() {
    let mut panel = TestPanel::new();
    draw_splash(&mut panel).unwrap();
    assert_eq!(panel.commits, 1);
    assert!(panel.pixels.iter().flatten().any(|&on| on));
}
