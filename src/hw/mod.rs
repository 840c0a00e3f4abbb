//! Board bindings: everything that touches an nRF52840 peripheral or the
//! linked Bluetooth stack.

pub mod audio;
pub mod panel;
pub mod sink_ffi;
