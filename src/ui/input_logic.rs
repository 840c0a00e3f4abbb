//! Pure helpers mapping encoder movement to actions.

use crate::a2dp::Transport;
use crate::config::{VOLUME_MAX, VOLUME_STEP};

/// Volume after one tick of the volume encoder.
///
/// The encoder counts down when turned clockwise, so the delta is
/// subtracted to make clockwise louder.
pub fn volume_after(volume: u8, delta: i32) -> u8 {
    let next = i32::from(volume).saturating_sub(delta.saturating_mul(VOLUME_STEP));
    next.clamp(0, i32::from(VOLUME_MAX)) as u8
}

/// Transport command for one tick of the track encoder. Only the sign of
/// the delta matters.
pub fn track_command(delta: i32) -> Option<Transport> {
    match delta {
        d if d > 0 => Some(Transport::Next),
        d if d < 0 => Some(Transport::Previous),
        _ => None,
    }
}
