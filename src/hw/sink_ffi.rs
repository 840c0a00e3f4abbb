//! Bluetooth audio-sink stack binding.
//!
//! The A2DP/AVRCP stack is a prebuilt library linked into the image. It
//! exposes plain C entry points for commands and calls back into the
//! `bt_sink_on_*` functions below from its own context. Callbacks are
//! routed to the installed [`CallbackBridge`].
//!
//! The nRF52840 radio is Bluetooth LE only and cannot carry A2DP. These
//! `bt_sink_*` symbols are the porting seam: they must come from a stack
//! driving a BR/EDR-capable controller (for example a Bluetooth Classic
//! companion module on its own host link). Nothing in the library depends
//! on which part provides them.

use core::cell::RefCell;

use bt_speaker::a2dp::decode_text;
use bt_speaker::{CallbackBridge, ConnectionState, MetadataAttribute, SinkControl, SinkEvents};
use defmt::warn;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::audio::PcmOut;

extern "C" {
    fn bt_sink_start(name: *const u8, name_len: usize, auto_reconnect: bool);
    fn bt_sink_set_volume(volume: u8);
    fn bt_sink_play();
    fn bt_sink_pause();
    fn bt_sink_stop();
    fn bt_sink_next();
    fn bt_sink_previous();
    fn bt_sink_is_connected() -> bool;
}

type Bridge = CallbackBridge<'static, PcmOut>;

static BRIDGE: Mutex<CriticalSectionRawMutex, RefCell<Option<Bridge>>> =
    Mutex::new(RefCell::new(None));

/// Route stack callbacks to `bridge`. Call before [`SinkHandle::start`].
pub fn install(bridge: Bridge) {
    BRIDGE.lock(|cell| *cell.borrow_mut() = Some(bridge));
}

fn with_bridge(f: impl FnOnce(&mut Bridge)) {
    BRIDGE.lock(|cell| match cell.borrow_mut().as_mut() {
        Some(bridge) => f(bridge),
        None => warn!("Sink callback before bridge install"),
    });
}

/// Commands to the running stack.
pub struct SinkHandle(());

impl SinkHandle {
    /// Start advertising as `name` and accept connections.
    pub fn start(name: &str, auto_reconnect: bool) -> Self {
        // SAFETY: the stack copies the name before returning.
        unsafe { bt_sink_start(name.as_ptr(), name.len(), auto_reconnect) };
        Self(())
    }
}

impl SinkControl for SinkHandle {
    fn set_volume(&mut self, volume: u8) {
        unsafe { bt_sink_set_volume(volume) }
    }

    fn play(&mut self) {
        unsafe { bt_sink_play() }
    }

    fn pause(&mut self) {
        unsafe { bt_sink_pause() }
    }

    fn stop(&mut self) {
        unsafe { bt_sink_stop() }
    }

    fn next(&mut self) {
        unsafe { bt_sink_next() }
    }

    fn previous(&mut self) {
        unsafe { bt_sink_previous() }
    }

    fn is_connected(&self) -> bool {
        unsafe { bt_sink_is_connected() }
    }
}

#[no_mangle]
pub extern "C" fn bt_sink_on_connection_state(code: u8) {
    match ConnectionState::from_raw(code) {
        Some(state) => with_bridge(|bridge| bridge.on_connection_change(state)),
        None => warn!("Unknown connection state {}", code),
    }
}

/// # Safety
///
/// `data` must point to `len` readable bytes for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn bt_sink_on_audio_data(data: *const u8, len: usize) {
    if data.is_null() {
        return;
    }
    let pcm = core::slice::from_raw_parts(data, len);
    with_bridge(|bridge| bridge.on_audio_data(pcm));
}

/// # Safety
///
/// `text` must point to `len` readable bytes for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn bt_sink_on_metadata(attribute: u8, text: *const u8, len: usize) {
    if text.is_null() {
        return;
    }
    let raw = core::slice::from_raw_parts(text, len);
    let text = decode_text(raw);
    with_bridge(|bridge| bridge.on_metadata(MetadataAttribute::from(attribute), text));
}
