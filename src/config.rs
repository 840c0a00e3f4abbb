//! Application-wide constants and compile-time configuration.
//!
//! All pin assignments, timing parameters, layout geometry and buffer
//! sizes live here so they can be tuned in one place. There is no runtime
//! or persisted configuration.

// Bluetooth

/// Name advertised to phones while waiting for a connection.
pub const DEVICE_NAME: &str = "BT-Speaker";

/// Label shown on the status line once a source is connected.
pub const CONNECTED_LABEL: &str = "Phone Connected";

/// Label held while no source is connected.
pub const DISCONNECTED_LABEL: &str = "Not Connected";

/// Ask the stack to reconnect to the last source on power-up.
pub const AUTO_RECONNECT: bool = true;

/// Depth of the callback → scheduler event queue.
pub const EVENT_QUEUE_DEPTH: usize = 8;

// Volume

/// Volume pushed to the sink at start-up (percent).
pub const INITIAL_VOLUME: u8 = 50;

/// Upper bound of the volume scale (percent).
pub const VOLUME_MAX: u8 = 100;

/// Volume change per encoder detent (percent).
pub const VOLUME_STEP: i32 = 5;

// Scheduler timing

/// Button sampling period (ms). Doubles as the debounce window.
pub const BUTTON_POLL_MS: u64 = 50;

/// Maximum time between two repaints (ms).
pub const DISPLAY_REFRESH_MS: u64 = 100;

/// Idle delay at the end of every loop iteration (ms). Lets the radio
/// stack run.
pub const IDLE_DELAY_MS: u64 = 10;

// Text layout

/// Characters per display line with the 6×10 font on a 128 px panel.
pub const CHARS_PER_LINE: usize = 21;

/// How far back from the budget the wrapper looks for a space.
pub const WRAP_SEARCH_WINDOW: usize = 5;

/// Longest device label shown verbatim on the status line.
pub const DEVICE_LABEL_MAX: usize = 18;

/// Byte capacity of stored metadata strings (title, artist).
pub const METADATA_CAPACITY: usize = 128;

/// Byte capacity of a single rendered line (21 chars, up to 4 bytes each).
pub const LINE_CAPACITY: usize = 96;

// Display geometry (SSD1306 128×64)

/// Panel width in pixels.
pub const SCREEN_WIDTH: u32 = 128;

/// Panel height in pixels.
pub const SCREEN_HEIGHT: u32 = 64;

/// Vertical advance per text line (px).
pub const LINE_HEIGHT: i32 = 10;

/// Y of the status line.
pub const STATUS_Y: i32 = 0;

/// Y of the volume row.
pub const VOLUME_Y: i32 = 10;

/// Y of the first track/prompt line.
pub const CONTENT_Y: i32 = 22;

/// Volume gauge frame origin and size (px).
pub const GAUGE_X: i32 = 50;
pub const GAUGE_WIDTH: u32 = 78;
pub const GAUGE_HEIGHT: u32 = 6;

/// 7-bit I²C address of the SSD1306.
pub const DISPLAY_I2C_ADDRESS: u8 = 0x3C;

// Audio output

/// Bytes of PCM buffered between the stack callback and the I²S DMA.
pub const PCM_PIPE_SIZE: usize = 4096;

/// 16-bit samples per I²S DMA buffer.
pub const I2S_BUFFER_SAMPLES: usize = 512;

// GPIO pin assignments (nRF52840 board)
//
// These are logical names; actual `embassy_nrf::peripherals::*` pins are
// selected in `main.rs`.
//
//   Volume encoder A / B   → P0.03 / P0.04
//   Volume encoder button  → P0.28
//   Track encoder A / B    → P0.29 / P0.30
//   Track encoder button   → P0.31
//   I²C SDA / SCL          → P0.26 / P0.27
//   I²S MCK                → P0.12
//   I²S SCK / LRCK / SDOUT → P0.13 / P0.14 / P0.15
//
// All inputs are active-low with internal pull-ups.
