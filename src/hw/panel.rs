//! SSD1306 OLED behind the library's [`Panel`] trait.

use bt_speaker::config::DISPLAY_I2C_ADDRESS;
use bt_speaker::{Error, Panel};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// Concrete display driver, generic over the HAL's I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// The panel the scheduler renders into.
pub struct OledPanel<I2C>(Display<I2C>);

impl<I2C> OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the SSD1306 and clear the screen.
    pub fn init(i2c: I2C) -> Result<Self, Error> {
        let interface = I2CDisplayInterface::new_custom_address(i2c, DISPLAY_I2C_ADDRESS);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        display.init().map_err(|_| Error::DisplayInit)?;
        display.clear_buffer();
        display.flush().map_err(|_| Error::DisplayInit)?;
        Ok(Self(display))
    }
}

impl<I2C> OriginDimensions for OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn size(&self) -> Size {
        self.0.size()
    }
}

impl<I2C> DrawTarget for OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Color = BinaryColor;
    type Error = <Display<I2C> as DrawTarget>::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.0.draw_iter(pixels)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.0.fill_solid(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.0.clear(color)
    }
}

impl<I2C> Panel for OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn commit(&mut self) -> Result<(), Error> {
        self.0.flush().map_err(|_| Error::Commit)
    }
}
