//! The main API to the display driver. It owns the bus interface and the controller lifecycle, and
//! provides windowed pixel writes and rectangle fills.

pub mod window;

use hal::blocking::delay::DelayMs;

use crate::color::Rgb565;
use crate::command::consts::*;
use crate::command::Command;
use crate::config::Config;
use crate::error::Error;
use crate::interface;

pub use self::window::Window;

/// Bytes of pixel data per bus burst when filling. Must be even so every burst holds whole
/// pixels.
pub const PIXEL_CHUNK_BYTES: usize = 64;

/// A pixel coordinate pair of `column` and `row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelCoord(pub i16, pub i16);

/// Lifecycle of the controller as far as the driver knows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayState {
    /// Power-on state, and the state after any transport failure.
    Uninitialized,
    /// `init` is running the reset and bring-up sequence.
    Initializing,
    /// The controller accepts window and pixel writes.
    Ready,
}

/// A driver for an ILI9341-family display.
pub struct Display<DI>
where
    DI: interface::DisplayInterface,
{
    iface: DI,
    config: Config,
    state: DisplayState,
    window: Option<Window>,
}

impl<DI> Display<DI>
where
    DI: interface::DisplayInterface,
{
    /// Construct a new display driver for the panel described by `config`, connected to the
    /// interface `iface`. Nothing is sent until `init`.
    pub fn new(iface: DI, config: Config) -> Self {
        Display {
            iface,
            config,
            state: DisplayState::Uninitialized,
            window: None,
        }
    }

    /// Reset the controller and run the bring-up sequence: software reset, sleep-out, 16-bit
    /// pixel format, orientation, optional inversion, display-on, each followed by the settle
    /// time the controller requires.
    ///
    /// The hardware reset is always performed first, so this is also how to recover after a
    /// transport failure.
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<DI::Error>>
    where
        D: DelayMs<u16>,
    {
        self.state = DisplayState::Initializing;
        self.window = None;
        log_debug!("display: reset and bring-up");
        let result = self.bring_up(delay);
        self.state = match result {
            Ok(()) => DisplayState::Ready,
            Err(_) => DisplayState::Uninitialized,
        };
        if result.is_ok() {
            log_debug!("display: ready");
        } else {
            log_warn!("display: bring-up failed");
        }
        result
    }

    fn bring_up<D>(&mut self, delay: &mut D) -> Result<(), Error<DI::Error>>
    where
        D: DelayMs<u16>,
    {
        self.iface.reset(delay).map_err(Error::Transport)?;
        // Not every module wires RST to all registers.
        Command::SoftwareReset.send(&mut self.iface)?;
        delay.delay_ms(SOFTWARE_RESET_SETTLE_MS);
        Command::SleepOut.send(&mut self.iface)?;
        delay.delay_ms(SLEEP_OUT_SETTLE_MS);
        Command::SetPixelFormat(self.config.pixel_format).send(&mut self.iface)?;
        delay.delay_ms(REGISTER_SETTLE_MS);
        Command::MemoryAccessControl(self.config.madctl_value()).send(&mut self.iface)?;
        delay.delay_ms(REGISTER_SETTLE_MS);
        if self.config.inverted {
            Command::InversionOn.send(&mut self.iface)?;
        }
        Command::DisplayOn.send(&mut self.iface)?;
        delay.delay_ms(DISPLAY_ON_SETTLE_MS);
        Ok(())
    }

    /// Control sleep mode. Leaving sleep mode needs `SLEEP_OUT_SETTLE_MS` before drawing.
    pub fn sleep(&mut self, enabled: bool) -> Result<(), Error<DI::Error>> {
        let cmd = match enabled {
            true => Command::SleepIn,
            false => Command::SleepOut,
        };
        self.command(cmd)
    }

    /// Turn the panel output on or off. Frame memory is kept either way.
    pub fn display_on(&mut self, on: bool) -> Result<(), Error<DI::Error>> {
        let cmd = match on {
            true => Command::DisplayOn,
            false => Command::DisplayOff,
        };
        self.command(cmd)
    }

    /// Control colour inversion.
    pub fn invert(&mut self, inverted: bool) -> Result<(), Error<DI::Error>> {
        let cmd = match inverted {
            true => Command::InversionOn,
            false => Command::InversionOff,
        };
        self.command(cmd)
    }

    /// Program the addressing window to the inclusive bounds `(x0, y0)`-`(x1, y1)` and arm the
    /// controller for a pixel stream. The bounds must satisfy `x0 <= x1 < width` and
    /// `y0 <= y1 < height`, otherwise `Error::Geometry` is returned and nothing is sent.
    pub fn set_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), Error<DI::Error>> {
        self.ensure_ready()?;
        let window = Window::new(x0, y0, x1, y1, self.config.width, self.config.height)
            .ok_or(Error::Geometry)?;
        self.program_window(window)
    }

    /// Stream raw big-endian RGB565 pixel bytes into the current window. The caller is
    /// responsible for sending exactly as many pixels as the window holds.
    pub fn write_pixels(&mut self, data: &[u8]) -> Result<(), Error<DI::Error>> {
        self.ensure_ready()?;
        if self.window.is_none() {
            return Err(Error::Geometry);
        }
        let result = self.iface.send_data(data).map_err(Error::Transport);
        self.track(result)
    }

    /// Fill the `w` by `h` rectangle whose upper left pixel is `(x, y)` with `color`.
    ///
    /// Empty rectangles and rectangles not entirely on the panel are rejected with
    /// `Error::Geometry` before anything is sent, because the controller does no bounds checking
    /// of its own and an out-of-range window corrupts subsequent draws.
    pub fn fill_rect(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        color: Rgb565,
    ) -> Result<(), Error<DI::Error>> {
        self.ensure_ready()?;
        let window = Window::from_rect(x, y, w, h, self.config.width, self.config.height)
            .ok_or(Error::Geometry)?;
        self.program_window(window)?;

        // Paint the window using constant memory: a buffer pre-filled with the colour is sent
        // repeatedly, with a shorter final burst for the remainder.
        let mut buf = [0u8; PIXEL_CHUNK_BYTES];
        for pixel in buf.chunks_exact_mut(2) {
            pixel.copy_from_slice(&color.to_be_bytes());
        }
        let mut remaining = window.pixel_count() * 2;
        while remaining > 0 {
            let chunk_len = remaining.min(buf.len());
            let result = self
                .iface
                .send_data(&buf[..chunk_len])
                .map_err(Error::Transport);
            self.track(result)?;
            remaining -= chunk_len;
        }
        Ok(())
    }

    /// Fill the whole panel with `color`.
    pub fn clear(&mut self, color: Rgb565) -> Result<(), Error<DI::Error>> {
        let size = self.size();
        self.fill_rect(0, 0, size.0, size.1, color)
    }

    /// Panel size in pixels, as seen in the configured orientation.
    pub fn size(&self) -> PixelCoord {
        PixelCoord(self.config.width as i16, self.config.height as i16)
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// The window most recently programmed into the controller, if it is known.
    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Give back the interface.
    pub fn release(self) -> DI {
        self.iface
    }

    fn ensure_ready(&self) -> Result<(), Error<DI::Error>> {
        match self.state {
            DisplayState::Ready => Ok(()),
            DisplayState::Uninitialized | DisplayState::Initializing => Err(Error::NotReady),
        }
    }

    fn command(&mut self, cmd: Command) -> Result<(), Error<DI::Error>> {
        self.ensure_ready()?;
        let result = cmd.send(&mut self.iface);
        self.track(result)
    }

    fn program_window(&mut self, window: Window) -> Result<(), Error<DI::Error>> {
        // The window is unknown from the first byte until the memory write command lands.
        self.window = None;
        let result = Command::ColumnAddressSet(window.x0, window.x1)
            .send(&mut self.iface)
            .and_then(|()| Command::RowAddressSet(window.y0, window.y1).send(&mut self.iface))
            .and_then(|()| Command::MemoryWrite.send(&mut self.iface));
        self.track(result)?;
        self.window = Some(window);
        Ok(())
    }

    /// Drop back to uninitialized if `result` is a transport failure.
    fn track<T>(&mut self, result: Result<T, Error<DI::Error>>) -> Result<T, Error<DI::Error>> {
        if let Err(Error::Transport(_)) = result {
            log_warn!("display: transport failure, re-init required");
            self.state = DisplayState::Uninitialized;
            self.window = None;
        }
        result
    }
}
