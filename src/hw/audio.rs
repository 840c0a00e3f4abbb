//! I²S audio output.
//!
//! The sink callback writes PCM into [`PCM`] without blocking; the
//! [`i2s_task`] drains it into the I²S DMA double buffer. When the pipe
//! runs dry the task plays silence so the amplifier never sees stale
//! samples.

use bt_speaker::config::{I2S_BUFFER_SAMPLES, PCM_PIPE_SIZE};
use bt_speaker::AudioOutput;
use defmt::{error, info};
use embassy_nrf::i2s::{
    self, ApproxSampleRate, Channels, Config, DoubleBuffering, MasterClock, OutputStream,
    SampleWidth, I2S,
};
use embassy_nrf::gpio::Pin;
use embassy_nrf::interrupt::typelevel::{self, Binding};
use embassy_nrf::{peripherals, Peripheral};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;
use embassy_time::{with_timeout, Duration};

/// PCM bytes in flight between the sink callback and the I²S task.
pub static PCM: Pipe<CriticalSectionRawMutex, PCM_PIPE_SIZE> = Pipe::new();

/// How long the I²S task waits for more PCM before padding with silence.
const UNDERRUN_WAIT: Duration = Duration::from_millis(2);

pub type Output = OutputStream<'static, peripherals::I2S, i16, I2S_BUFFER_SAMPLES>;

/// [`AudioOutput`] that feeds [`PCM`]. Drops what does not fit.
pub struct PcmOut;

impl AudioOutput for PcmOut {
    fn write(&mut self, pcm: &[u8]) {
        let mut rest = pcm;
        while !rest.is_empty() {
            match PCM.try_write(rest) {
                Ok(n) => rest = &rest[n..],
                Err(_) => break,
            }
        }
    }
}

/// Configure the I²S peripheral for 16-bit stereo at ~44.1 kHz.
pub fn init<Irq>(
    i2s: peripherals::I2S,
    irq: Irq,
    mck: impl Peripheral<P = impl Pin> + 'static,
    sck: impl Peripheral<P = impl Pin> + 'static,
    lrck: impl Peripheral<P = impl Pin> + 'static,
    sdout: impl Peripheral<P = impl Pin> + 'static,
) -> Output
where
    Irq: Binding<typelevel::I2S, i2s::InterruptHandler<peripherals::I2S>> + 'static,
{
    let master_clock: MasterClock = ApproxSampleRate::_44100.into();
    info!("I2S sample rate: {} Hz", master_clock.sample_rate());

    let mut config = Config::default();
    config.sample_width = SampleWidth::_16bit;
    config.channels = Channels::Stereo;

    I2S::new_master(i2s, irq, mck, sck, lrck, master_clock, config)
        .output(sdout, DoubleBuffering::new())
}

/// Fill `raw` from the pipe, padding with silence after an underrun.
async fn fill(raw: &mut [u8]) {
    let mut filled = 0;
    while filled < raw.len() {
        match with_timeout(UNDERRUN_WAIT, PCM.read(&mut raw[filled..])).await {
            Ok(n) => filled += n,
            Err(_) => break,
        }
    }
    raw[filled..].fill(0);
}

#[embassy_executor::task]
pub async fn i2s_task(mut output: Output) -> ! {
    let mut raw = [0u8; I2S_BUFFER_SAMPLES * 2];

    if let Err(e) = output.start().await {
        error!("I2S start failed: {}", e);
    }

    loop {
        fill(&mut raw).await;

        let buffer = output.buffers().switch();
        for (sample, bytes) in buffer.iter_mut().zip(raw.chunks_exact(2)) {
            *sample = i16::from_le_bytes([bytes[0], bytes[1]]);
        }

        if let Err(e) = output.send().await {
            error!("I2S send failed: {}", e);
        }
    }
}
