//! Driver library for ILI9341-family TFT display controllers on a 4-wire SPI bus, with a 5x8
//! bitmap glyph rasterizer for drawing text, and a small MAX7219 8x8 LED matrix driver which
//! renders the same glyphs.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate embedded_hal as hal;

#[cfg(all(test, not(feature = "std")))]
extern crate std;

// Test helpers for spelling out expected bus traffic. These have to be here in order to be usable
// by mods declared afterwards.
#[cfg(test)]
macro_rules! send {
    ([$($d:tt),*]) => {Sent::Data(vec![$($d,)*])};
    (($e:expr)) => {$e};
    ($c:tt) => {Sent::Cmd($c)};
}
#[cfg(test)]
macro_rules! sends {
    ($($e:tt),*) => {&[$(send!($e),)*]};
}

// Logging macros. These compile to nothing unless the `defmt` feature is enabled, and must be
// declared before the modules that use them.
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
    }};
}

pub mod color;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod font;
pub mod interface;
pub mod matrix;
pub mod text;

// Re-exports for primary API.
pub use color::Rgb565;
pub use command::{consts, Orientation};
pub use config::Config;
pub use display::{Display, DisplayState, PixelCoord, Window};
pub use error::Error;
pub use font::{glyph, Glyph};
pub use interface::spi::SpiInterface;
pub use matrix::Max7219;
pub use text::{FillTarget, Rasterizer};
