//! Host-testable core of the bt-speaker firmware.
//!
//! Everything that does not touch a peripheral lives here: the playback
//! state store, text layout, screen composition, encoder decoding, the
//! sink callback bridge and the cooperative scheduler. The embedded binary
//! (`main.rs`, `embedded` feature) binds it to the nRF52840, the SSD1306
//! panel, the I²S amplifier and the Bluetooth audio-sink stack.
//!
//! Usage: `cargo test` on the host.
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].

#![cfg_attr(not(test), no_std)]

pub mod a2dp;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod state;
pub mod ui;

pub use a2dp::{
    AudioOutput, CallbackBridge, ConnectionState, ConnectionUpdate, MetadataAttribute,
    SinkControl, SinkEvent, SinkEvents, SinkLink, Transport,
};
pub use error::Error;
pub use scheduler::Scheduler;
pub use state::PlaybackState;
pub use ui::display::Panel;
