//! bt-speaker firmware entry point.
//!
//! Brings up the OLED, the I²S output and the Bluetooth audio sink, then
//! runs the cooperative scheduler forever with a short idle delay between
//! iterations.
//!
//! The audio-sink stack is linked in through the C ABI in `hw::sink_ffi`;
//! see there for the BR/EDR controller it requires.

#![no_std]
#![no_main]

mod hw;

use bt_speaker::config::{AUTO_RECONNECT, DEVICE_NAME, IDLE_DELAY_MS, INITIAL_VOLUME};
use bt_speaker::ui::display::draw_splash;
use bt_speaker::ui::encoder::RotaryKnob;
use bt_speaker::ui::Controls;
use bt_speaker::{CallbackBridge, Scheduler, SinkControl, SinkLink};
use defmt::{error, info, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Pull};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, i2s, peripherals};
use embassy_time::{Instant, Timer};
use hw::audio::{self, PcmOut};
use hw::panel::OledPanel;
use hw::sink_ffi::{self, SinkHandle};

use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    I2S => i2s::InterruptHandler<peripherals::I2S>;
});

/// Callback → scheduler event queue.
static LINK: SinkLink = SinkLink::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("BT Speaker starting...");

    // Display
    let mut twim_config = twim::Config::default();
    twim_config.frequency = twim::Frequency::K400;
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim_config);

    let mut panel = match OledPanel::init(i2c) {
        Ok(panel) => panel,
        Err(e) => {
            error!("SSD1306 init failed: {}", e);
            loop {
                cortex_m::asm::wfi();
            }
        }
    };
    if let Err(e) = draw_splash(&mut panel) {
        warn!("Splash failed: {}", e);
    }
    info!("Display initialized");

    // Audio output
    let output = audio::init(p.I2S, Irqs, p.P0_12, p.P0_13, p.P0_14, p.P0_15);
    spawner.must_spawn(audio::i2s_task(output));

    // Bluetooth sink
    sink_ffi::install(CallbackBridge::new(&LINK, PcmOut));
    let mut sink = SinkHandle::start(DEVICE_NAME, AUTO_RECONNECT);
    sink.set_volume(INITIAL_VOLUME);
    info!("Bluetooth A2DP sink started as {}", DEVICE_NAME);

    // Knobs
    let controls = Controls::new(
        RotaryKnob::new(Input::new(p.P0_03, Pull::Up), Input::new(p.P0_04, Pull::Up)),
        RotaryKnob::new(Input::new(p.P0_29, Pull::Up), Input::new(p.P0_30, Pull::Up)),
        Input::new(p.P0_28, Pull::Up),
        Input::new(p.P0_31, Pull::Up),
    );
    info!("Encoders initialized");

    let mut scheduler = Scheduler::new(controls, &LINK);
    loop {
        scheduler.poll(Instant::now().as_millis(), &mut sink, &mut panel);
        Timer::after_millis(IDLE_DELAY_MS).await;
    }
}
