//! Playback state store.
//!
//! One [`PlaybackState`] lives for the whole run, owned by the scheduler.
//! Sink events and control handlers mutate it; the renderer only reads it.

use heapless::String;

use crate::a2dp::{ConnectionState, SinkEvent};
use crate::config::{CONNECTED_LABEL, DISCONNECTED_LABEL, INITIAL_VOLUME, VOLUME_MAX};
use crate::ui::text::{bounded, MetaText};

/// Title held until the phone sends one.
pub const DEFAULT_TITLE: &str = "No Track";

/// Artist held until the phone sends one.
pub const DEFAULT_ARTIST: &str = "Unknown Artist";

/// Status-line label.
pub type DeviceLabel = String<32>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackState {
    /// Percent, always within `0..=VOLUME_MAX`.
    volume: u8,
    pub connected: bool,
    pub device_label: DeviceLabel,
    pub playing: bool,
    pub title: MetaText,
    pub artist: MetaText,
    dirty: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            volume: INITIAL_VOLUME,
            connected: false,
            device_label: bounded(DISCONNECTED_LABEL),
            playing: false,
            title: bounded(DEFAULT_TITLE),
            artist: bounded(DEFAULT_ARTIST),
            dirty: true,
        }
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Store a new volume, clamped to the scale.
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(VOLUME_MAX);
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the dirty flag, returning its previous value.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    /// Force the not-playing state. Returns `true` if it changed.
    pub fn stop_playing(&mut self) -> bool {
        self.dirty = true;
        core::mem::replace(&mut self.playing, false)
    }

    /// Fold one sink event into the state.
    pub fn apply(&mut self, event: SinkEvent) {
        match event {
            SinkEvent::StreamStarted => self.playing = true,
            SinkEvent::Title(title) => self.title = title,
            SinkEvent::Artist(artist) => self.artist = artist,
        }
        self.dirty = true;
    }

    /// Apply a connection change. Only connected and disconnected touch
    /// fields; every state marks dirty.
    pub fn set_connection(&mut self, state: ConnectionState) {
        self.dirty = true;
        match state {
            ConnectionState::Connected => {
                self.connected = true;
                self.device_label = bounded(CONNECTED_LABEL);
                self.playing = false;
            }
            ConnectionState::Disconnected => {
                self.connected = false;
                self.device_label = bounded(DISCONNECTED_LABEL);
                self.title = bounded(DEFAULT_TITLE);
                self.artist = bounded(DEFAULT_ARTIST);
                self.playing = false;
            }
            ConnectionState::Connecting | ConnectionState::Disconnecting => {}
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}
