//! Cooperative main loop body.
//!
//! [`Scheduler::poll`] runs one iteration and never blocks. Callers sleep
//! for [`IDLE_DELAY_MS`](crate::config::IDLE_DELAY_MS) between iterations
//! to give the radio stack room.
//!
//! Each iteration:
//!
//! 1. Drains queued sink events, then the latest connection change, into
//!    the [`PlaybackState`].
//! 2. Ticks both encoders; a nonzero delta changes volume or skips track.
//! 3. Every [`BUTTON_POLL_MS`] samples both buttons.
//! 4. Repaints when the state is dirty or every [`DISPLAY_REFRESH_MS`].

use embedded_hal::digital::InputPin;

use crate::a2dp::{ConnectionState, SinkControl, SinkLink};
use crate::config::{BUTTON_POLL_MS, DISPLAY_REFRESH_MS};
use crate::state::PlaybackState;
use crate::ui::display::{render, Panel};
use crate::ui::encoder::Encoder;
use crate::ui::input_logic::{track_command, volume_after};
use crate::ui::Controls;

/// Fires at most once per period on a millisecond clock.
#[derive(Clone, Copy, Debug)]
pub struct RateGate {
    period_ms: u64,
    last_ms: u64,
}

impl RateGate {
    pub const fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            last_ms: 0,
        }
    }

    /// Whether a full period has passed since the last reset.
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_ms) >= self.period_ms
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.last_ms = now_ms;
    }

    /// [`is_due`](Self::is_due), resetting the gate when it is.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        let due = self.is_due(now_ms);
        if due {
            self.reset(now_ms);
        }
        due
    }
}

pub struct Scheduler<'a, E, P> {
    state: PlaybackState,
    controls: Controls<E, P>,
    link: &'a SinkLink,
    button_gate: RateGate,
    render_gate: RateGate,
}

impl<'a, E: Encoder, P: InputPin> Scheduler<'a, E, P> {
    pub fn new(controls: Controls<E, P>, link: &'a SinkLink) -> Self {
        Self {
            state: PlaybackState::new(),
            controls,
            link,
            button_gate: RateGate::new(BUTTON_POLL_MS),
            render_gate: RateGate::new(DISPLAY_REFRESH_MS),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Run one loop iteration at `now_ms`. Returns `true` if the panel was
    /// repainted.
    pub fn poll<S, D>(&mut self, now_ms: u64, sink: &mut S, panel: &mut D) -> bool
    where
        S: SinkControl,
        D: Panel,
    {
        self.drain_events();

        let delta = self.controls.volume.tick();
        if delta != 0 {
            self.on_volume(delta, sink);
        }

        let delta = self.controls.track.tick();
        if delta != 0 {
            self.on_track(delta, sink);
        }

        if self.button_gate.fire(now_ms) {
            self.poll_buttons(sink);
        }

        if !self.state.is_dirty() && !self.render_gate.is_due(now_ms) {
            return false;
        }

        if let Err(_e) = render(panel, &self.state) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Display update failed: {}", _e);
        }
        self.state.take_dirty();
        self.render_gate.reset(now_ms);
        true
    }

    fn drain_events(&mut self) {
        // Queued events predate the connection change being collected.
        while let Some(event) = self.link.take_event() {
            self.state.apply(event);
        }

        let Some(update) = self.link.take_connection() else {
            return;
        };
        if update.dropped && update.latest != ConnectionState::Disconnected {
            // Reconnected before we looked; still start the new session clean.
            self.state.set_connection(ConnectionState::Disconnected);
        }
        self.state.set_connection(update.latest);

        // Both reset `playing`; the next buffer must announce itself.
        if update.dropped
            || matches!(
                update.latest,
                ConnectionState::Connected | ConnectionState::Disconnected
            )
        {
            self.link.rearm_stream();
        }
    }

    fn on_volume<S: SinkControl>(&mut self, delta: i32, sink: &mut S) {
        let volume = volume_after(self.state.volume(), delta);
        self.state.set_volume(volume);
        sink.set_volume(volume);

        #[cfg(feature = "defmt")]
        defmt::info!("Volume: {}%", volume);
    }

    fn on_track<S: SinkControl>(&mut self, delta: i32, sink: &mut S) {
        if !sink.is_connected() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Track control: no device connected");
            return;
        }
        if let Some(command) = track_command(delta) {
            sink.send(command);
            self.state.mark_dirty();

            #[cfg(feature = "defmt")]
            defmt::info!("Sent {}", command);
        }
    }

    fn poll_buttons<S: SinkControl>(&mut self, sink: &mut S) {
        // Sample both every period so edges are tracked while disconnected.
        let play_pause = self.controls.play_pause.poll();
        let stop = self.controls.stop.poll();

        if play_pause {
            self.on_play_pause(sink);
        }
        if stop {
            self.on_stop(sink);
        }
    }

    fn on_play_pause<S: SinkControl>(&mut self, sink: &mut S) {
        if !sink.is_connected() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Play/Pause: no device connected");
            return;
        }

        if self.controls.play_pause.toggle_latch() {
            sink.pause();
            self.state.stop_playing();
            self.link.rearm_stream();

            #[cfg(feature = "defmt")]
            defmt::info!("Paused");
        } else {
            sink.play();
            self.state.mark_dirty();

            #[cfg(feature = "defmt")]
            defmt::info!("Resumed");
        }
    }

    fn on_stop<S: SinkControl>(&mut self, sink: &mut S) {
        if !sink.is_connected() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Stop: no device connected");
            return;
        }

        sink.stop();
        self.state.stop_playing();
        self.link.rearm_stream();

        #[cfg(feature = "defmt")]
        defmt::info!("Stopped");
    }
}
