//! The bus transport beneath the display driver. Every command or data transfer is framed by
//! chip-select, with the mode-select (D/C) line set before the first clock edge.

use hal::blocking::delay::DelayMs;

/// Hold time for the hardware reset pulse, in milliseconds.
pub const RESET_PULSE_MS: u16 = 10;
/// Time after releasing reset before the controller accepts commands, in milliseconds. The
/// controller datasheet requires at least 100 ms; 120 ms covers a reset issued while the panel was
/// in sleep-out.
pub const RESET_RECOVERY_MS: u16 = 120;

pub trait DisplayInterface {
    type Error;

    /// Send a single command opcode.
    fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error>;

    /// Send a burst of parameter or pixel data. An empty buffer sends nothing.
    fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// Pulse the controller's hardware reset line and wait until it is ready again.
    fn reset<D>(&mut self, delay: &mut D) -> Result<(), Self::Error>
    where
        D: DelayMs<u16>;
}

pub mod spi {
    //! The SPI interface supports the "4-wire" interface of the controller, such that each word on
    //! the SPI bus is 8 bits and a separate D/C GPIO selects between command and data bytes.
    //!
    //! The interface drives chip-select itself rather than relying on the SPI peripheral, because
    //! the D/C line must be stable for the whole time CS is asserted.

    use core::fmt;

    use hal::blocking::delay::DelayMs;
    use hal::blocking::spi;
    use hal::digital::v2::OutputPin;

    use super::{DisplayInterface, RESET_PULSE_MS, RESET_RECOVERY_MS};

    /// Failure of the underlying bus or one of its control lines.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum InterfaceError<S, P> {
        /// The SPI peripheral failed to transmit.
        Spi(S),
        /// One of the D/C, CS or RST output pins could not be driven.
        Pin(P),
    }

    impl<S: fmt::Debug, P: fmt::Debug> fmt::Display for InterfaceError<S, P> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                InterfaceError::Spi(e) => write!(f, "SPI transfer failed: {:?}", e),
                InterfaceError::Pin(e) => write!(f, "control pin failed: {:?}", e),
            }
        }
    }

    pub struct SpiInterface<SPI, DC, CS, RST> {
        /// The SPI master device connected to the controller.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the controller (the fourth
        /// "wire" of "4-wire" mode). Low selects command, high selects data.
        dc: DC,
        /// Active-low chip-select.
        cs: CS,
        /// Active-low hardware reset.
        rst: RST,
    }

    impl<SPI, DC, CS, RST, PinE> SpiInterface<SPI, DC, CS, RST>
    where
        SPI: spi::Write<u8>,
        DC: OutputPin<Error = PinE>,
        CS: OutputPin<Error = PinE>,
        RST: OutputPin<Error = PinE>,
    {
        /// Create a new SPI interface to communicate with the display controller. `spi` is the SPI
        /// master device, which must be configured with `config::SPI_MODE`. `dc`, `cs` and `rst`
        /// are the GPIO output pins connected to the D/C, CS and RESET pins of the controller.
        pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST) -> Self {
            Self { spi, dc, cs, rst }
        }

        /// Give back the bus and pins.
        pub fn release(self) -> (SPI, DC, CS, RST) {
            (self.spi, self.dc, self.cs, self.rst)
        }

        fn framed_write(&mut self, buf: &[u8]) -> Result<(), InterfaceError<SPI::Error, PinE>> {
            self.cs.set_low().map_err(InterfaceError::Pin)?;
            let written = self.spi.write(buf).map_err(InterfaceError::Spi);
            // Release CS even if the write failed, so the next transfer starts a fresh frame.
            let released = self.cs.set_high().map_err(InterfaceError::Pin);
            written.and(released)
        }
    }

    impl<SPI, DC, CS, RST, PinE> DisplayInterface for SpiInterface<SPI, DC, CS, RST>
    where
        SPI: spi::Write<u8>,
        DC: OutputPin<Error = PinE>,
        CS: OutputPin<Error = PinE>,
        RST: OutputPin<Error = PinE>,
    {
        type Error = InterfaceError<SPI::Error, PinE>;

        fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
            self.dc.set_low().map_err(InterfaceError::Pin)?;
            self.framed_write(&[cmd])
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            if buf.is_empty() {
                return Ok(());
            }
            self.dc.set_high().map_err(InterfaceError::Pin)?;
            self.framed_write(buf)
        }

        fn reset<D>(&mut self, delay: &mut D) -> Result<(), Self::Error>
        where
            D: DelayMs<u16>,
        {
            self.cs.set_high().map_err(InterfaceError::Pin)?;
            self.rst.set_high().map_err(InterfaceError::Pin)?;
            self.rst.set_low().map_err(InterfaceError::Pin)?;
            delay.delay_ms(RESET_PULSE_MS);
            self.rst.set_high().map_err(InterfaceError::Pin)?;
            delay.delay_ms(RESET_RECOVERY_MS);
            Ok(())
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
            Dc(bool),
            Cs(bool),
            Rst(bool),
            Write(Vec<u8>),
            Delay(u16),
        }

        type Log = Rc<RefCell<Vec<Ev>>>;

        struct Bus {
            log: Log,
            fail: bool,
        }

        impl spi::Write<u8> for Bus {
            type Error = &'static str;
            fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
                if self.fail {
                    return Err("bus fault");
                }
                self.log.borrow_mut().push(Ev::Write(words.to_vec()));
                Ok(())
            }
        }

        struct Pin {
            log: Log,
            ev: fn(bool) -> Ev,
        }

        impl OutputPin for Pin {
            type Error = ();
            fn set_low(&mut self) -> Result<(), ()> {
                self.log.borrow_mut().push((self.ev)(false));
                Ok(())
            }
            fn set_high(&mut self) -> Result<(), ()> {
                self.log.borrow_mut().push((self.ev)(true));
                Ok(())
            }
        }

        struct Delay(Log);

        impl DelayMs<u16> for Delay {
            fn delay_ms(&mut self, ms: u16) {
                self.0.borrow_mut().push(Ev::Delay(ms));
            }
        }

        fn make(fail: bool) -> (SpiInterface<Bus, Pin, Pin, Pin>, Log) {
            let log = Log::default();
            let pin = |ev: fn(bool) -> Ev| Pin {
                log: log.clone(),
                ev,
            };
            let iface = SpiInterface::new(
                Bus {
                    log: log.clone(),
                    fail,
                },
                pin(Ev::Dc),
                pin(Ev::Cs),
                pin(Ev::Rst),
            );
            (iface, log)
        }

        #[test]
        fn command_is_framed() {
            let (mut iface, log) = make(false);
            iface.send_command(0x2C).unwrap();
            assert_eq!(
                *log.borrow(),
                [
                    Ev::Dc(false),
                    Ev::Cs(false),
                    Ev::Write(vec![0x2C]),
                    Ev::Cs(true)
                ]
            );
        }

        #[test]
        fn data_is_one_burst() {
            let (mut iface, log) = make(false);
            iface.send_data(&[1, 2, 3, 4]).unwrap();
            assert_eq!(
                *log.borrow(),
                [
                    Ev::Dc(true),
                    Ev::Cs(false),
                    Ev::Write(vec![1, 2, 3, 4]),
                    Ev::Cs(true)
                ]
            );
        }

        #[test]
        fn empty_data_sends_nothing() {
            let (mut iface, log) = make(false);
            iface.send_data(&[]).unwrap();
            assert!(log.borrow().is_empty());
        }

        #[test]
        fn chip_select_released_on_failure() {
            let (mut iface, log) = make(true);
            assert_eq!(
                iface.send_command(0x11),
                Err(InterfaceError::Spi("bus fault"))
            );
            assert_eq!(*log.borrow(), [Ev::Dc(false), Ev::Cs(false), Ev::Cs(true)]);
        }

        #[test]
        fn reset_timing() {
            let (mut iface, log) = make(false);
            let mut delay = Delay(log.clone());
            iface.reset(&mut delay).unwrap();
            assert_eq!(
                *log.borrow(),
                [
                    Ev::Cs(true),
                    Ev::Rst(true),
                    Ev::Rst(false),
                    Ev::Delay(10),
                    Ev::Rst(true),
                    Ev::Delay(120)
                ]
            );
        }
    }
}
