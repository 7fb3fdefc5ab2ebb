//! Errors reported by the display driver.

use core::fmt;

/// An error from a display operation. `E` is the error type of the underlying
/// `DisplayInterface`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus transfer failed. The controller's addressing window is undefined afterwards, so the
    /// display drops back to uninitialized and must be brought up again with `Display::init`.
    Transport(E),
    /// A rectangle or window was empty, reversed, or not entirely on the panel. Nothing was sent.
    Geometry,
    /// The display has not been (successfully) initialized. Nothing was sent.
    NotReady,
}

impl<E> Error<E> {
    /// Whether the error came from the bus rather than from the caller's arguments.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "display transport failed: {:?}", e),
            Error::Geometry => f.write_str("rectangle is empty or outside the panel"),
            Error::NotReady => f.write_str("display is not initialized"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
