//! Driver for the Maxim MAX7219 LED driver wired to an 8x8 matrix.
//!
//! The MAX7219 has no command/data line: every transfer is a 16-bit register write, register
//! address first, latched on the rising edge of chip-select. Each of the eight "digit" registers
//! holds one matrix row, with bit 7 driving the leftmost column.

use hal::blocking::spi;
use hal::digital::v2::OutputPin;

use crate::error::Error;
use crate::font::{glyph, GLYPH_HEIGHT};
use crate::interface::spi::InterfaceError;

/// Number of rows (and columns) of the matrix.
pub const MATRIX_SIZE: u8 = 8;
/// Highest accepted intensity level.
pub const MAX_INTENSITY: u8 = 15;

mod reg {
    pub const DIGIT0: u8 = 0x01;
    pub const DECODE_MODE: u8 = 0x09;
    pub const INTENSITY: u8 = 0x0A;
    pub const SCAN_LIMIT: u8 = 0x0B;
    pub const SHUTDOWN: u8 = 0x0C;
    pub const DISPLAY_TEST: u8 = 0x0F;
}

pub struct Max7219<SPI, CS> {
    spi: SPI,
    /// Active-low chip-select (LOAD).
    cs: CS,
    intensity: u8,
}

type MatrixResult<SPI, PinE> =
    Result<(), Error<InterfaceError<<SPI as spi::Write<u8>>::Error, PinE>>>;

impl<SPI, CS, PinE> Max7219<SPI, CS>
where
    SPI: spi::Write<u8>,
    CS: OutputPin<Error = PinE>,
{
    /// Create a driver for a matrix on `spi` selected by `cs`, to be brought up at `intensity`
    /// (0-15, clamped).
    pub fn new(spi: SPI, cs: CS, intensity: u8) -> Self {
        Self {
            spi,
            cs,
            intensity: intensity.min(MAX_INTENSITY),
        }
    }

    /// Give back the bus and pin.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Bring the chip out of its power-on state: no test mode, all eight rows scanned, raw
    /// (non-BCD) row data, blank rows, configured intensity, and finally out of shutdown.
    pub fn init(&mut self) -> MatrixResult<SPI, PinE> {
        self.write_register(reg::DISPLAY_TEST, 0x00)?;
        self.write_register(reg::SCAN_LIMIT, MATRIX_SIZE - 1)?;
        self.write_register(reg::DECODE_MODE, 0x00)?;
        self.clear()?;
        self.write_register(reg::INTENSITY, self.intensity)?;
        self.shutdown(false)?;
        log_debug!("matrix: ready");
        Ok(())
    }

    /// Set row `row` (0 = top) to `bits`, bit 7 being the leftmost column.
    pub fn set_row(&mut self, row: u8, bits: u8) -> MatrixResult<SPI, PinE> {
        if row >= MATRIX_SIZE {
            return Err(Error::Geometry);
        }
        self.write_register(reg::DIGIT0 + row, bits)
    }

    /// Turn every LED off.
    pub fn clear(&mut self) -> MatrixResult<SPI, PinE> {
        for row in 0..MATRIX_SIZE {
            self.set_row(row, 0)?;
        }
        Ok(())
    }

    /// Set the brightness, 0-15.
    pub fn set_intensity(&mut self, level: u8) -> MatrixResult<SPI, PinE> {
        if level > MAX_INTENSITY {
            return Err(Error::Geometry);
        }
        self.write_register(reg::INTENSITY, level)?;
        self.intensity = level;
        Ok(())
    }

    /// Enter or leave shutdown. Row data is kept while shut down.
    pub fn shutdown(&mut self, enabled: bool) -> MatrixResult<SPI, PinE> {
        self.write_register(reg::SHUTDOWN, if enabled { 0x00 } else { 0x01 })
    }

    /// Show a whole frame, `rows[0]` being the top row.
    pub fn draw_frame(&mut self, rows: &[u8; 8]) -> MatrixResult<SPI, PinE> {
        for (row, bits) in (0..MATRIX_SIZE).zip(rows.iter()) {
            self.set_row(row, *bits)?;
        }
        Ok(())
    }

    /// Show `c` from the bitmap font, one column in from the left edge. Characters missing from
    /// the font show as a blank matrix.
    pub fn draw_glyph(&mut self, c: char) -> MatrixResult<SPI, PinE> {
        let rows = glyph(c).rows();
        for row in 0..GLYPH_HEIGHT {
            // Font rows have the leftmost column in bit 0; the matrix wants it in bit 7.
            self.set_row(row, rows[row as usize].reverse_bits() >> 1)?;
        }
        Ok(())
    }

    fn write_register(&mut self, register: u8, value: u8) -> MatrixResult<SPI, PinE> {
        let result = self.framed_write(&[register, value]);
        if result.is_err() {
            log_warn!("matrix: register write failed");
        }
        result.map_err(Error::Transport)
    }

    fn framed_write(&mut self, buf: &[u8]) -> Result<(), InterfaceError<SPI::Error, PinE>> {
        self.cs.set_low().map_err(InterfaceError::Pin)?;
        let written = self.spi.write(buf).map_err(InterfaceError::Spi);
        let released = self.cs.set_high().map_err(InterfaceError::Pin);
        written.and(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Debug, PartialEq)]
    enum Ev {
        Cs(bool),
        Write(Vec<u8>),
    }

    type Log = Rc<RefCell<Vec<Ev>>>;

    struct Bus(Log);

    impl spi::Write<u8> for Bus {
        type Error = ();
        fn write(&mut self, words: &[u8]) -> Result<(), ()> {
            self.0.borrow_mut().push(Ev::Write(words.to_vec()));
            Ok(())
        }
    }

    struct Load(Log);

    impl OutputPin for Load {
        type Error = ();
        fn set_low(&mut self) -> Result<(), ()> {
            self.0.borrow_mut().push(Ev::Cs(false));
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), ()> {
            self.0.borrow_mut().push(Ev::Cs(true));
            Ok(())
        }
    }

    fn make(intensity: u8) -> (Max7219<Bus, Load>, Log) {
        let log = Log::default();
        (
            Max7219::new(Bus(log.clone()), Load(log.clone()), intensity),
            log,
        )
    }

    /// The register writes in the log, checking each is framed by chip-select.
    fn writes(log: &Log) -> Vec<[u8; 2]> {
        let log = log.borrow();
        log.chunks(3)
            .map(|frame| match frame {
                [Ev::Cs(false), Ev::Write(w), Ev::Cs(true)] => [w[0], w[1]],
                other => panic!("unframed transfer {:?}", other),
            })
            .collect()
    }

    #[test]
    fn init_sequence() {
        let (mut matrix, log) = make(3);
        matrix.init().unwrap();
        #[rustfmt::skip]
        assert_eq!(writes(&log), [
            [0x0F, 0x00], // display test off
            [0x0B, 0x07], // scan all rows
            [0x09, 0x00], // no decode
            [0x01, 0], [0x02, 0], [0x03, 0], [0x04, 0],
            [0x05, 0], [0x06, 0], [0x07, 0], [0x08, 0],
            [0x0A, 0x03], // intensity
            [0x0C, 0x01], // normal operation
        ]);
    }

    #[test]
    fn intensity_is_clamped_at_construction() {
        let (mut matrix, log) = make(200);
        matrix.init().unwrap();
        assert!(writes(&log).contains(&[0x0A, 0x0F]));
    }

    #[test]
    fn glyph_one() {
        let (mut matrix, log) = make(8);
        matrix.draw_glyph('1').unwrap();
        #[rustfmt::skip]
        assert_eq!(writes(&log), [
            [0x01, 0x10],
            [0x02, 0x30],
            [0x03, 0x10],
            [0x04, 0x10],
            [0x05, 0x10],
            [0x06, 0x10],
            [0x07, 0x38],
            [0x08, 0x00],
        ]);
    }

    #[test]
    fn frame_rows_top_to_bottom() {
        let (mut matrix, log) = make(8);
        let smile = [0x3C, 0x42, 0xA5, 0x81, 0xA5, 0x99, 0x42, 0x3C];
        matrix.draw_frame(&smile).unwrap();
        let expect: Vec<[u8; 2]> = (1u8..=8).zip(smile.iter()).map(|(r, b)| [r, *b]).collect();
        assert_eq!(writes(&log), expect);
    }

    #[test]
    fn unknown_glyph_is_blank() {
        let (mut matrix, log) = make(8);
        matrix.draw_glyph('?').unwrap();
        assert!(writes(&log).iter().all(|w| w[1] == 0));
    }

    #[test]
    fn geometry_is_checked() {
        let (mut matrix, log) = make(8);
        assert_eq!(matrix.set_row(8, 0xFF), Err(Error::Geometry));
        assert_eq!(matrix.set_intensity(16), Err(Error::Geometry));
        assert!(log.borrow().is_empty());
        matrix.set_row(7, 0x81).unwrap();
        matrix.set_intensity(15).unwrap();
        matrix.shutdown(true).unwrap();
        assert_eq!(writes(&log), [[0x08, 0x81], [0x0A, 0x0F], [0x0C, 0x00]]);
    }
}
