//! Bluetooth audio-sink boundary.
//!
//! The wireless stack itself (pairing, codec negotiation, AVRCP transport)
//! is an external collaborator. This module defines what crosses the
//! boundary:
//!
//! 1. **Inbound** - [`SinkEvents`], the three callbacks the stack invokes
//!    (connection change, PCM buffer, metadata attribute). The core
//!    implements it in [`CallbackBridge`].
//! 2. **Outbound** - [`SinkControl`], the commands the core issues back to
//!    the stack (volume, transport, connection query).
//! 3. **Audio** - [`AudioOutput`], the PCM sink fed from the audio callback.
//!
//! Callbacks may run on a different context than the scheduler. They reach
//! the scheduler only through [`SinkLink`].

pub mod bridge;

pub use bridge::{CallbackBridge, ConnectionUpdate, SinkLink};

use crate::ui::text::MetaText;

/// Connection state as reported by the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl ConnectionState {
    /// Map the stack's raw state code.
    pub fn from_raw(code: u8) -> Option<Self> {
        match code {
            0 => Some(ConnectionState::Disconnected),
            1 => Some(ConnectionState::Connecting),
            2 => Some(ConnectionState::Connected),
            3 => Some(ConnectionState::Disconnecting),
            _ => None,
        }
    }

    /// Inverse of [`from_raw`](Self::from_raw).
    pub const fn code(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
            ConnectionState::Disconnecting => 3,
        }
    }
}

/// AVRCP metadata attribute. Raw ids are the stack's bitmask values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MetadataAttribute {
    Title,
    Artist,
    Album,
    TrackNumber,
    TotalTracks,
    Genre,
    PlayingTime,
    Unknown(u8),
}

impl From<u8> for MetadataAttribute {
    fn from(id: u8) -> Self {
        match id {
            0x01 => MetadataAttribute::Title,
            0x02 => MetadataAttribute::Artist,
            0x04 => MetadataAttribute::Album,
            0x08 => MetadataAttribute::TrackNumber,
            0x10 => MetadataAttribute::TotalTracks,
            0x20 => MetadataAttribute::Genre,
            0x40 => MetadataAttribute::PlayingTime,
            other => MetadataAttribute::Unknown(other),
        }
    }
}

/// Transport commands the core sends to the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transport {
    Play,
    Pause,
    Stop,
    Next,
    Previous,
}

/// Events handed from the callback context to the scheduler.
///
/// Connection changes are not queued; they travel through
/// [`SinkLink::take_connection`] so a full queue cannot lose them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkEvent {
    /// First PCM buffer of a stream was forwarded.
    StreamStarted,
    /// Cleaned track title.
    Title(MetaText),
    /// Cleaned artist name.
    Artist(MetaText),
}

/// Commands the core issues to the wireless stack.
pub trait SinkControl {
    /// Set the absolute sink volume (0-100).
    fn set_volume(&mut self, volume: u8);

    fn play(&mut self);

    fn pause(&mut self);

    fn stop(&mut self);

    fn next(&mut self);

    fn previous(&mut self);

    /// Whether a source is currently connected.
    fn is_connected(&self) -> bool;

    /// Dispatch a [`Transport`] command.
    fn send(&mut self, command: Transport) {
        match command {
            Transport::Play => self.play(),
            Transport::Pause => self.pause(),
            Transport::Stop => self.stop(),
            Transport::Next => self.next(),
            Transport::Previous => self.previous(),
        }
    }
}

/// PCM sink: 16-bit little-endian stereo at 44.1 kHz.
///
/// `write` is synchronous and has no result; a full transport stalls or
/// drops at its own discretion.
pub trait AudioOutput {
    fn write(&mut self, pcm: &[u8]);
}

impl<A: AudioOutput + ?Sized> AudioOutput for &mut A {
    fn write(&mut self, pcm: &[u8]) {
        (**self).write(pcm);
    }
}

/// Callbacks the wireless stack invokes. No ordering or thread identity is
/// assumed between calls.
pub trait SinkEvents {
    fn on_connection_change(&mut self, state: ConnectionState);

    fn on_audio_data(&mut self, pcm: &[u8]);

    fn on_metadata(&mut self, attribute: MetadataAttribute, text: &str);
}

/// Decode a nul-terminated metadata payload.
///
/// Stops at the first nul byte and keeps only the valid UTF-8 prefix.
pub fn decode_text(raw: &[u8]) -> &str {
    let raw = raw.split(|&b| b == 0).next().unwrap_or(raw);
    match core::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&raw[..e.valid_up_to()]).unwrap_or(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_state_from_raw_codes() {
        assert_eq!(ConnectionState::from_raw(0), Some(ConnectionState::Disconnected));
        assert_eq!(ConnectionState::from_raw(2), Some(ConnectionState::Connected));
        assert_eq!(ConnectionState::from_raw(3), Some(ConnectionState::Disconnecting));
        assert_eq!(ConnectionState::from_raw(9), None);
    }

    #[test]
    fn connection_state_codes_round_trip() {
        for code in 0..4 {
            let state = ConnectionState::from_raw(code).unwrap();
            assert_eq!(state.code(), code);
        }
    }

    #[test]
    fn metadata_attribute_ids() {
        assert_eq!(MetadataAttribute::from(0x01), MetadataAttribute::Title);
        assert_eq!(MetadataAttribute::from(0x02), MetadataAttribute::Artist);
        assert_eq!(MetadataAttribute::from(0x40), MetadataAttribute::PlayingTime);
        assert_eq!(MetadataAttribute::from(0x03), MetadataAttribute::Unknown(0x03));
    }

    #[test]
    fn decode_text_stops_at_nul() {
        assert_eq!(decode_text(b"Song\0garbage"), "Song");
        assert_eq!(decode_text(b"No terminator"), "No terminator");
        assert_eq!(decode_text(b"\0"), "");
    }

    #[test]
    fn decode_text_keeps_valid_utf8_prefix() {
        assert_eq!(decode_text(&[b'O', b'k', 0xFF, b'x', 0]), "Ok");
        assert_eq!(decode_text("Café\0".as_bytes()), "Café");
    }
}
