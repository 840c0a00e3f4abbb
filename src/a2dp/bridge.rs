//! Callback bridges between the wireless stack and the scheduler.
//!
//! The stack calls into [`CallbackBridge`] from its own context. PCM is
//! forwarded to the audio output immediately. Metadata and stream starts
//! become [`SinkEvent`]s on the [`SinkLink`] queue, which the scheduler
//! drains once per iteration. Connection changes bypass the queue: the link
//! keeps the latest state plus a sticky "dropped" flag, so a full queue can
//! never hide a disconnect.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use super::{AudioOutput, ConnectionState, MetadataAttribute, SinkEvent, SinkEvents};
use crate::config::EVENT_QUEUE_DEPTH;
use crate::error::Error;
use crate::ui::text::{clean_artist, clean_title};

/// Event queue shared by the callback context (producer) and the
/// scheduler (single consumer).
pub struct SinkLink {
    events: Channel<CriticalSectionRawMutex, SinkEvent, EVENT_QUEUE_DEPTH>,
    /// Set once the current stream has announced itself.
    stream_flagged: AtomicBool,
    /// Latest [`ConnectionState::code`].
    connection: AtomicU8,
    connection_changed: AtomicBool,
    /// A disconnect was reported since the last take.
    link_dropped: AtomicBool,
}

/// Connection changes collected since the previous
/// [`SinkLink::take_connection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionUpdate {
    /// The link went down in between, even if it is back up now.
    pub dropped: bool,
    pub latest: ConnectionState,
}

impl SinkLink {
    pub const fn new() -> Self {
        Self {
            events: Channel::new(),
            stream_flagged: AtomicBool::new(false),
            connection: AtomicU8::new(ConnectionState::Disconnected.code()),
            connection_changed: AtomicBool::new(false),
            link_dropped: AtomicBool::new(false),
        }
    }

    /// Record a connection change. Never blocks and never fails.
    pub fn report_connection(&self, state: ConnectionState) {
        if state == ConnectionState::Disconnected {
            self.link_dropped.store(true, Ordering::Release);
        }
        self.connection.store(state.code(), Ordering::Release);
        self.connection_changed.store(true, Ordering::Release);
    }

    /// Pending connection change, if any.
    pub fn take_connection(&self) -> Option<ConnectionUpdate> {
        if !self.connection_changed.swap(false, Ordering::AcqRel) {
            return None;
        }
        let dropped = self.link_dropped.swap(false, Ordering::AcqRel);
        let latest = ConnectionState::from_raw(self.connection.load(Ordering::Acquire))
            .unwrap_or(ConnectionState::Disconnected);
        Some(ConnectionUpdate { dropped, latest })
    }

    /// Queue an event without blocking.
    pub fn post(&self, event: SinkEvent) -> Result<(), Error> {
        self.events
            .try_send(event)
            .map_err(|_| Error::EventQueueFull)
    }

    /// Next pending event, if any.
    pub fn take_event(&self) -> Option<SinkEvent> {
        self.events.try_receive().ok()
    }

    /// Allow the next PCM buffer to announce a new stream.
    pub fn rearm_stream(&self) {
        self.stream_flagged.store(false, Ordering::Release);
    }

    /// Returns `true` for the first caller since the last re-arm.
    fn flag_stream(&self) -> bool {
        !self.stream_flagged.swap(true, Ordering::AcqRel)
    }
}

impl Default for SinkLink {
    fn default() -> Self {
        Self::new()
    }
}

/// The core's implementation of [`SinkEvents`].
pub struct CallbackBridge<'a, A> {
    link: &'a SinkLink,
    audio: A,
}

impl<'a, A: AudioOutput> CallbackBridge<'a, A> {
    pub fn new(link: &'a SinkLink, audio: A) -> Self {
        Self { link, audio }
    }

    fn post(&self, event: SinkEvent) {
        if let Err(_e) = self.link.post(event) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Dropped sink event: {}", _e);
        }
    }
}

impl<A: AudioOutput> SinkEvents for CallbackBridge<'_, A> {
    fn on_connection_change(&mut self, state: ConnectionState) {
        #[cfg(feature = "defmt")]
        defmt::info!("A2DP connection state: {}", state);

        self.link.report_connection(state);
    }

    fn on_audio_data(&mut self, pcm: &[u8]) {
        self.audio.write(pcm);

        if self.link.flag_stream() {
            #[cfg(feature = "defmt")]
            defmt::info!("Audio stream started");

            if self.link.post(SinkEvent::StreamStarted).is_err() {
                // Retry on the next buffer.
                self.link.rearm_stream();
            }
        }
    }

    fn on_metadata(&mut self, attribute: MetadataAttribute, text: &str) {
        match attribute {
            MetadataAttribute::Title => {
                let title = clean_title(text);
                #[cfg(feature = "defmt")]
                defmt::info!("Clean track title: {}", title.as_str());
                self.post(SinkEvent::Title(title));
            }
            MetadataAttribute::Artist => {
                let artist = clean_artist(text);
                #[cfg(feature = "defmt")]
                defmt::info!("Clean artist: {}", artist.as_str());
                self.post(SinkEvent::Artist(artist));
            }
            _other => {
                #[cfg(feature = "defmt")]
                defmt::info!("Metadata {}: {}", _other, text);
            }
        }
    }
}
