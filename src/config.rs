//! Panel configuration, and the bus parameters the SPI peripheral must be set up with.

use hal::spi::{Mode, MODE_0};

use crate::command::consts::{
    NATIVE_COLS, NATIVE_ROWS, PIXEL_FORMAT_16BPP, PIXEL_FORMAT_16BPP_MCU, ST7735_LANDSCAPE_MADCTL,
};
use crate::command::Orientation;

/// The SPI mode the controller samples on: clock idle low, data captured on the first edge.
pub const SPI_MODE: Mode = MODE_0;

/// Default SPI clock. The controller's write cycle is rated to 10 MHz, but common modules run
/// reliably at 20 MHz on short wires; drop to `SPI_SAFE_FREQUENCY_HZ` if the image corrupts.
pub const SPI_DEFAULT_FREQUENCY_HZ: u32 = 20_000_000;
/// SPI clock within the datasheet's write timing.
pub const SPI_SAFE_FREQUENCY_HZ: u32 = 10_000_000;

/// A configuration for the display. The panel size is mandatory and given to the constructor; the
/// builder methods change the remaining settings from their defaults (landscape, no inversion).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) orientation: Orientation,
    pub(crate) inverted: bool,
    pub(crate) pixel_format: u8,
    madctl: Option<u8>,
    spi_frequency_hz: u32,
}

impl Config {
    /// Create a new configuration for a panel that is `width` by `height` pixels as seen in the
    /// chosen orientation (landscape unless changed with `orientation`).
    ///
    /// Panics if the size does not fit the controller's frame memory in landscape orientation.
    pub fn new(width: u16, height: u16) -> Self {
        Self::new_oriented(width, height, Orientation::Landscape)
    }

    /// Create a new configuration for a panel that is `width` by `height` pixels as seen in
    /// `orientation`.
    ///
    /// Panics if the size does not fit the controller's frame memory in that orientation.
    pub fn new_oriented(width: u16, height: u16, orientation: Orientation) -> Self {
        let config = Config {
            width,
            height,
            orientation,
            inverted: false,
            pixel_format: PIXEL_FORMAT_16BPP,
            madctl: None,
            spi_frequency_hz: SPI_DEFAULT_FREQUENCY_HZ,
        };
        config.check_size();
        config
    }

    /// A full-size 320x240 landscape panel.
    pub fn landscape_320x240() -> Self {
        Self::new(NATIVE_ROWS, NATIVE_COLS)
    }

    /// A 160x128 landscape panel on an ST7735 controller, the common 1.8" module. It takes the
    /// MCU-only pixel format and an RGB, column-mirrored memory access setting.
    pub fn st7735_160x128() -> Self {
        Self::new(160, 128)
            .pixel_format(PIXEL_FORMAT_16BPP_MCU)
            .madctl(ST7735_LANDSCAPE_MADCTL)
    }

    /// Extend this `Config` to use a different memory access orientation. The panel size is kept
    /// as given, so callers switching to portrait should construct with portrait dimensions.
    ///
    /// Panics if the size does not fit the controller's frame memory in that orientation.
    pub fn orientation(self, orientation: Orientation) -> Self {
        let config = Self {
            orientation,
            ..self
        };
        config.check_size();
        config
    }

    /// Extend this `Config` to turn on colour inversion at init time. See
    /// `Command::InversionOn`.
    pub fn inverted(self, inverted: bool) -> Self {
        Self { inverted, ..self }
    }

    /// Extend this `Config` to send `format` as the `SetPixelFormat` parameter instead of
    /// `PIXEL_FORMAT_16BPP`. Pixel data is always 16-bit RGB565, so `format` must select that.
    pub fn pixel_format(self, format: u8) -> Self {
        Self {
            pixel_format: format,
            ..self
        }
    }

    /// Extend this `Config` to send `madctl` to the memory access control register instead of the
    /// orientation's own value, for modules wired with a different subpixel order or mirroring.
    /// The orientation still decides which edge the size checks treat as the width.
    pub fn madctl(self, madctl: u8) -> Self {
        Self {
            madctl: Some(madctl),
            ..self
        }
    }

    /// Extend this `Config` to record the SPI clock the bus is set up with.
    pub fn spi_frequency_hz(self, spi_frequency_hz: u32) -> Self {
        Self {
            spi_frequency_hz,
            ..self
        }
    }

    /// The SPI clock to configure the bus peripheral with.
    pub fn frequency_hz(&self) -> u32 {
        self.spi_frequency_hz
    }

    /// The SPI mode to configure the bus peripheral with.
    pub fn spi_mode(&self) -> Mode {
        SPI_MODE
    }

    /// The byte written to the memory access control register at init.
    pub(crate) fn madctl_value(&self) -> u8 {
        self.madctl.unwrap_or_else(|| self.orientation.madctl())
    }

    fn check_size(&self) {
        let (max_w, max_h) = if self.orientation.is_landscape() {
            (NATIVE_ROWS, NATIVE_COLS)
        } else {
            (NATIVE_COLS, NATIVE_ROWS)
        };
        if false
            || self.width == 0
            || self.height == 0
            || self.width > max_w
            || self.height > max_h
        {
            panic!("Panel size not supported by the controller.");
        }
    }
}
