//! Status screen rendering for the 128×64 OLED.
//!
//! Rendering is split in two:
//!
//! - [`Frame::compose`] turns a [`PlaybackState`] into positioned text
//!   lines and a gauge fill. Pure; easy to assert on.
//! - [`Frame::draw`] paints that onto any `embedded-graphics` target.
//!
//! [`render`] does both, then commits the buffer to the [`Panel`].
//!
//! ```text
//! ┌────────────────────────────┐
//! │ Phone Connected            │  y = 0   status
//! │ Vol: 50%  [██████        ] │  y = 10  volume + gauge
//! │ Artist line 1              │  y = 22  content
//! │ (artist line 2)            │
//! │ Title line 1               │
//! │ (title line 2)             │
//! └────────────────────────────┘
//! ```

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::Vec;

use crate::config::{
    CONTENT_Y, DEVICE_LABEL_MAX, DEVICE_NAME, GAUGE_HEIGHT, GAUGE_WIDTH, GAUGE_X, LINE_HEIGHT,
    STATUS_Y, VOLUME_MAX, VOLUME_Y,
};
use crate::error::Error;
use crate::state::PlaybackState;
use crate::ui::text::{bounded, display_artist, display_title, ellipsize, wrap_line, Line};

/// Status line while no source is connected.
pub const WAITING_TEXT: &str = "Waiting for device...";

/// Prompt while connected but idle.
pub const READY_PROMPT: [&str; 2] = ["Ready - Press Vol knob", "to Play/Pause"];

/// First line of the pairing prompt. The second names the device.
pub const PAIR_PROMPT: &str = "Pair your device";

pub const SPLASH: [&str; 2] = ["BT Speaker", "Initializing..."];

/// Status, volume, and two wrapped two-line blocks.
const MAX_LINES: usize = 6;

/// A display that can show a drawn frame.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    /// Push the drawn buffer to the glass.
    fn commit(&mut self) -> Result<(), Error>;
}

/// One line of text at a fixed row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLine {
    pub y: i32,
    pub text: Line,
}

/// Everything one repaint shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<TextLine, MAX_LINES>,
    /// Filled width inside the gauge frame (px).
    pub gauge_fill: u32,
}

impl Frame {
    pub fn compose(state: &PlaybackState) -> Self {
        let mut frame = Frame {
            lines: Vec::new(),
            gauge_fill: gauge_fill(state.volume()),
        };

        if state.connected {
            frame.push(STATUS_Y, ellipsize(&state.device_label, DEVICE_LABEL_MAX));
        } else {
            frame.push(STATUS_Y, bounded(WAITING_TEXT));
        }

        let mut volume = Line::new();
        let _ = write!(volume, "Vol: {}%", state.volume());
        frame.push(VOLUME_Y, volume);

        let mut y = CONTENT_Y;
        if !state.connected {
            let mut name = Line::new();
            let _ = write!(name, "Name: {}", DEVICE_NAME);
            frame.push(y, bounded(PAIR_PROMPT));
            frame.push(y + LINE_HEIGHT, name);
        } else if !state.playing {
            for text in READY_PROMPT {
                frame.push(y, bounded(text));
                y += LINE_HEIGHT;
            }
        } else {
            for text in [display_artist(&state.artist), display_title(&state.title)] {
                for line in wrap_line(text).iter() {
                    frame.push(y, bounded(line));
                    y += LINE_HEIGHT;
                }
            }
        }

        frame
    }

    fn push(&mut self, y: i32, text: Line) {
        // MAX_LINES covers the tallest layout.
        let _ = self.lines.push(TextLine { y, text });
    }

    /// The frame's text, top to bottom.
    pub fn text(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }

    /// Clear `target` and paint this frame onto it.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        target.clear(BinaryColor::Off).map_err(|_| Error::Draw)?;

        let style = text_style();
        for line in &self.lines {
            Text::with_baseline(&line.text, Point::new(0, line.y), style, Baseline::Top)
                .draw(target)
                .map_err(|_| Error::Draw)?;
        }

        Rectangle::new(Point::new(GAUGE_X, VOLUME_Y), Size::new(GAUGE_WIDTH, GAUGE_HEIGHT))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(target)
            .map_err(|_| Error::Draw)?;

        if self.gauge_fill > 0 {
            Rectangle::new(
                Point::new(GAUGE_X + 1, VOLUME_Y + 1),
                Size::new(self.gauge_fill, GAUGE_HEIGHT - 2),
            )
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(target)
            .map_err(|_| Error::Draw)?;
        }

        Ok(())
    }
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .background_color(BinaryColor::Off)
        .build()
}

/// Gauge fill for `volume`, rounded to the nearest pixel inside the frame.
pub fn gauge_fill(volume: u8) -> u32 {
    let inner = GAUGE_WIDTH - 2;
    let max = u32::from(VOLUME_MAX);
    (u32::from(volume.min(VOLUME_MAX)) * inner + max / 2) / max
}

/// Draw the status screen for `state` and commit it.
///
/// The panel is committed exactly once, even when drawing failed.
pub fn render<P: Panel>(panel: &mut P, state: &PlaybackState) -> Result<(), Error> {
    let drawn = Frame::compose(state).draw(panel);
    panel.commit()?;
    drawn
}

/// Boot screen shown while the radio comes up.
pub fn draw_splash<P: Panel>(panel: &mut P) -> Result<(), Error> {
    panel.clear(BinaryColor::Off).map_err(|_| Error::Draw)?;
    let mut y = STATUS_Y;
    for text in SPLASH {
        Text::with_baseline(text, Point::new(0, y), text_style(), Baseline::Top)
            .draw(panel)
            .map_err(|_| Error::Draw)?;
        y += LINE_HEIGHT;
    }
    panel.commit()
}
