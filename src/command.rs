//! The command set for ILI9341-family controllers.
//!
//! Only the commands this driver needs are modelled. Every command is a single opcode byte sent
//! with D/C low, optionally followed by parameter bytes sent with D/C high. Opcodes and parameter
//! encodings are vendor-defined and reproduced exactly from the controller datasheet.

use crate::error::Error;
use crate::interface::DisplayInterface;

pub mod consts {
    //! Geometry and timing constants of the controller.

    /// Width of the controller's frame memory in its native (portrait) orientation.
    pub const NATIVE_COLS: u16 = 240;
    /// Height of the controller's frame memory in its native (portrait) orientation.
    pub const NATIVE_ROWS: u16 = 320;

    /// `SetPixelFormat` parameter selecting 16 bits/pixel on both the RGB and MCU interfaces.
    pub const PIXEL_FORMAT_16BPP: u8 = 0x55;
    /// `SetPixelFormat` parameter selecting 16 bits/pixel on the MCU interface only, as ST7735
    /// controllers document it.
    pub const PIXEL_FORMAT_16BPP_MCU: u8 = 0x05;

    /// MADCTL value for landscape on 1.8" ST7735 modules: row/column exchange with the column
    /// address mirrored, RGB subpixel order.
    pub const ST7735_LANDSCAPE_MADCTL: u8 = 0x60;

    /// Settle time after `SoftwareReset` before the controller accepts commands.
    pub const SOFTWARE_RESET_SETTLE_MS: u16 = 120;
    /// Settle time after `SleepOut` before the next command.
    pub const SLEEP_OUT_SETTLE_MS: u16 = 120;
    /// Settle time after a register write during bring-up.
    pub const REGISTER_SETTLE_MS: u16 = 10;
    /// Settle time after `DisplayOn`.
    pub const DISPLAY_ON_SETTLE_MS: u16 = 100;
}

/// Setting of the memory access control register, which maps frame memory onto the panel. All
/// values select BGR subpixel order, which is how the common modules are wired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// Native orientation, column address mirrored so the connector is at the bottom.
    Portrait,
    /// Row/column exchange: the long edge is horizontal.
    Landscape,
    /// Portrait rotated 180 degrees.
    PortraitFlipped,
    /// Landscape rotated 180 degrees.
    LandscapeFlipped,
}

impl Orientation {
    /// The MADCTL register value.
    pub fn madctl(self) -> u8 {
        match self {
            Orientation::Portrait => 0x48,
            Orientation::Landscape => 0x28,
            Orientation::PortraitFlipped => 0x88,
            Orientation::LandscapeFlipped => 0xE8,
        }
    }

    /// Whether rows and columns are exchanged, making the panel wider than it is tall.
    pub fn is_landscape(self) -> bool {
        match self {
            Orientation::Landscape | Orientation::LandscapeFlipped => true,
            Orientation::Portrait | Orientation::PortraitFlipped => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Reset all registers to their power-on defaults. The hardware reset line is preferred, since
    /// it also recovers a controller that is stuck mid-transfer.
    SoftwareReset,
    /// Enter sleep mode, stopping the panel scan.
    SleepIn,
    /// Leave sleep mode. The controller needs `SLEEP_OUT_SETTLE_MS` before it accepts further
    /// commands.
    SleepOut,
    /// Show frame memory normally.
    InversionOff,
    /// Show frame memory with all colours inverted. Some IPS modules need this to show correct
    /// colours.
    InversionOn,
    /// Blank the panel without touching frame memory.
    DisplayOff,
    /// Show frame memory on the panel.
    DisplayOn,
    /// Set the inclusive column start and end address of the addressing window. The column
    /// pointer is reset to the start address.
    ColumnAddressSet(u16, u16),
    /// Set the inclusive row (page) start and end address of the addressing window. The row
    /// pointer is reset to the start address.
    RowAddressSet(u16, u16),
    /// Arm the controller to accept a stream of pixel data into the addressing window. Data flows
    /// left to right, top to bottom, and the stream ends at the next command.
    MemoryWrite,
    /// Set the memory access control register. See `Orientation::madctl`.
    MemoryAccessControl(u8),
    /// Set the interface pixel format. See `consts::PIXEL_FORMAT_16BPP`.
    SetPixelFormat(u8),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        ($cmd, &$buf[..0])
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        ($cmd, &$buf[..1])
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr]) => {{
        let [s0, s1] = $arg0.to_be_bytes();
        let [e0, e1] = $arg1.to_be_bytes();
        $buf[..4].copy_from_slice(&[s0, s1, e0, e1]);
        ($cmd, &$buf[..4])
    }};
}

impl Command {
    /// The opcode byte.
    pub fn opcode(self) -> u8 {
        match self {
            Command::SoftwareReset => 0x01,
            Command::SleepIn => 0x10,
            Command::SleepOut => 0x11,
            Command::InversionOff => 0x20,
            Command::InversionOn => 0x21,
            Command::DisplayOff => 0x28,
            Command::DisplayOn => 0x29,
            Command::ColumnAddressSet(..) => 0x2A,
            Command::RowAddressSet(..) => 0x2B,
            Command::MemoryWrite => 0x2C,
            Command::MemoryAccessControl(_) => 0x36,
            Command::SetPixelFormat(_) => 0x3A,
        }
    }

    /// Send the command and its parameters. Address ranges with start after end are rejected
    /// before anything reaches the bus.
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 4];
        let op = self.opcode();
        let (cmd, data) = match self {
            Command::ColumnAddressSet(start, end) | Command::RowAddressSet(start, end) => {
                if start > end {
                    return Err(Error::Geometry);
                }
                ok_command!(arg_buf, op, [start, end])
            }
            Command::MemoryAccessControl(madctl) => ok_command!(arg_buf, op, [madctl]),
            Command::SetPixelFormat(format) => ok_command!(arg_buf, op, [format]),
            Command::SoftwareReset
            | Command::SleepIn
            | Command::SleepOut
            | Command::InversionOff
            | Command::InversionOn
            | Command::DisplayOff
            | Command::DisplayOn
            | Command::MemoryWrite => ok_command!(arg_buf, op, []),
        };
        iface.send_command(cmd).map_err(Error::Transport)?;
        iface.send_data(data).map_err(Error::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{Sent, TestSpyInterface};

    #[test]
    fn address_set() {
        let mut di = TestSpyInterface::new();
        Command::ColumnAddressSet(10, 300).send(&mut di).unwrap();
        Command::RowAddressSet(0, 239).send(&mut di).unwrap();
        #[rustfmt::skip]
        di.check_multi(sends!(
            0x2A, [0x00, 0x0A, 0x01, 0x2C],
            0x2B, [0x00, 0x00, 0x00, 0xEF]
        ));
    }

    #[test]
    fn address_set_rejects_reversed_range() {
        let mut di = TestSpyInterface::new();
        assert_eq!(
            Command::ColumnAddressSet(42, 23).send(&mut di),
            Err(Error::Geometry)
        );
        assert_eq!(
            Command::RowAddressSet(1, 0).send(&mut di),
            Err(Error::Geometry)
        );
        assert!(di.sent().is_empty());
    }

    #[test]
    fn single_point_window_is_allowed() {
        let mut di = TestSpyInterface::new();
        Command::ColumnAddressSet(7, 7).send(&mut di).unwrap();
        di.check_multi(sends!(0x2A, [0x00, 0x07, 0x00, 0x07]));
    }

    #[test]
    fn memory_access_control() {
        let mut di = TestSpyInterface::new();
        Command::MemoryAccessControl(Orientation::Landscape.madctl())
            .send(&mut di)
            .unwrap();
        Command::MemoryAccessControl(Orientation::Portrait.madctl())
            .send(&mut di)
            .unwrap();
        Command::MemoryAccessControl(Orientation::LandscapeFlipped.madctl())
            .send(&mut di)
            .unwrap();
        Command::MemoryAccessControl(Orientation::PortraitFlipped.madctl())
            .send(&mut di)
            .unwrap();
        #[rustfmt::skip]
        di.check_multi(sends!(
            0x36, [0x28],
            0x36, [0x48],
            0x36, [0xE8],
            0x36, [0x88]
        ));
    }

    #[test]
    fn pixel_format() {
        let mut di = TestSpyInterface::new();
        Command::SetPixelFormat(consts::PIXEL_FORMAT_16BPP)
            .send(&mut di)
            .unwrap();
        Command::SetPixelFormat(consts::PIXEL_FORMAT_16BPP_MCU)
            .send(&mut di)
            .unwrap();
        di.check_multi(sends!(0x3A, [0x55], 0x3A, [0x05]));
    }

    #[test]
    fn parameterless_commands() {
        let mut di = TestSpyInterface::new();
        for cmd in [
            Command::SoftwareReset,
            Command::SleepIn,
            Command::SleepOut,
            Command::InversionOff,
            Command::InversionOn,
            Command::DisplayOff,
            Command::DisplayOn,
            Command::MemoryWrite,
        ] {
            cmd.send(&mut di).unwrap();
        }
        #[rustfmt::skip]
        di.check_multi(sends!(
            0x01, 0x10, 0x11, 0x20, 0x21, 0x28, 0x29, 0x2C
        ));
    }

    #[test]
    fn transport_failure_is_reported() {
        let mut di = TestSpyInterface::new();
        di.fail_after(1);
        assert_eq!(
            Command::MemoryAccessControl(Orientation::Landscape.madctl()).send(&mut di),
            Err(Error::Transport(crate::interface::test_spy::SpyError))
        );
        di.check_multi(sends!(0x36));
    }
}
