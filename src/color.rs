//! 16-bit RGB565 colour values.

/// A colour packed as 5 bits red, 6 bits green, 5 bits blue, in the layout the controller expects
/// when configured for 16 bits/pixel. It is transmitted most significant byte first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Rgb565 = Rgb565(0x0000);
    pub const WHITE: Rgb565 = Rgb565(0xFFFF);
    pub const RED: Rgb565 = Rgb565(0xF800);
    pub const GREEN: Rgb565 = Rgb565(0x07E0);
    pub const BLUE: Rgb565 = Rgb565(0x001F);
    pub const YELLOW: Rgb565 = Rgb565(0xFFE0);
    pub const CYAN: Rgb565 = Rgb565(0x07FF);
    pub const MAGENTA: Rgb565 = Rgb565(0xF81F);

    /// Pack 8-bit channels, dropping the low bits of each.
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Rgb565(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// The two bytes as sent on the wire.
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<u16> for Rgb565 {
    fn from(raw: u16) -> Self {
        Rgb565(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_channels() {
        assert_eq!(Rgb565::from_rgb888(0xFF, 0xFF, 0xFF), Rgb565::WHITE);
        assert_eq!(Rgb565::from_rgb888(0xFF, 0, 0), Rgb565::RED);
        assert_eq!(Rgb565::from_rgb888(0, 0xFF, 0), Rgb565::GREEN);
        assert_eq!(Rgb565::from_rgb888(0, 0, 0xFF), Rgb565::BLUE);
        // Low bits are truncated, not rounded.
        assert_eq!(Rgb565::from_rgb888(0x07, 0x03, 0x07), Rgb565::BLACK);
    }

    #[test]
    fn big_endian_on_the_wire() {
        assert_eq!(Rgb565(0xF81F).to_be_bytes(), [0xF8, 0x1F]);
    }
}
