use core::fmt::{Debug, Display, Formatter};

use crate::epd2in13::DriverState;

/// Epd error type
///
/// `E` is the error of the [`Transport`](crate::Transport) in use.
#[derive(Clone, Copy, Eq, PartialEq)]
pub enum Error<E> {
    /// Sending or reading on the transport failed, nothing is retried
    Transport(E),

    /// The bitmap matches neither the portrait nor the rotated panel size,
    /// or its usable area is empty
    InvalidGeometry {
        /// Width of the rejected bitmap
        width: u32,
        /// Height of the rejected bitmap
        height: u32,
    },

    /// The operation is not allowed in the current driver state
    InvalidState {
        /// Name of the rejected operation
        operation: &'static str,
        /// State the driver was in
        state: DriverState,
    },

    /// A window origin lies outside of the panel
    OutOfBounds {
        /// Requested x origin
        x: i32,
        /// Requested y origin
        y: i32,
    },

    /// The busy line did not go idle within the configured timeout
    ControllerTimeout,
}

impl<E: Display> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transport(err) => Display::fmt(err, f),
            Self::InvalidGeometry { width, height } => write!(
                f,
                "bitmap of {}x{} matches neither panel orientation",
                width, height
            ),
            Self::InvalidState { operation, state } => {
                write!(f, "`{}` is not allowed while {:?}", operation, state)
            }
            Self::OutOfBounds { x, y } => {
                write!(f, "window origin ({}, {}) is outside of the panel", x, y)
            }
            Self::ControllerTimeout => write!(f, "controller stayed busy past the timeout"),
        }
    }
}

impl<E: Debug> Debug for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transport(err) => f.debug_tuple("Transport").field(err).finish(),
            Self::InvalidGeometry { width, height } => f
                .debug_struct("InvalidGeometry")
                .field("width", width)
                .field("height", height)
                .finish(),
            Self::InvalidState { operation, state } => f
                .debug_struct("InvalidState")
                .field("operation", operation)
                .field("state", state)
                .finish(),
            Self::OutOfBounds { x, y } => f
                .debug_struct("OutOfBounds")
                .field("x", x)
                .field("y", y)
                .finish(),
            Self::ControllerTimeout => write!(f, "ControllerTimeout"),
        }
    }
}

/// Error of the [`DisplayInterface`](crate::interface::DisplayInterface),
/// one variant per peripheral
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum InterfaceError<SpiE, BusyE, DcE, RstE> {
    /// Encountered an SPI error
    Spi(SpiE),

    /// Encountered an error on Busy GPIO
    Busy(BusyE),

    /// Encountered an error on DC GPIO
    Dc(DcE),

    /// Encountered an error on RST GPIO
    Rst(RstE),
}

impl<SpiE, BusyE, DcE, RstE> Display for InterfaceError<SpiE, BusyE, DcE, RstE>
where
    SpiE: Debug,
    BusyE: Debug,
    DcE: Debug,
    RstE: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(err) => write!(f, "spi error: {:?}", err),
            Self::Busy(err) => write!(f, "busy pin error: {:?}", err),
            Self::Dc(err) => write!(f, "dc pin error: {:?}", err),
            Self::Rst(err) => write!(f, "reset pin error: {:?}", err),
        }
    }
}

impl<SpiE, BusyE, DcE, RstE> Debug for InterfaceError<SpiE, BusyE, DcE, RstE>
where
    SpiE: Debug,
    BusyE: Debug,
    DcE: Debug,
    RstE: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(err) => f.debug_tuple("Spi").field(err).finish(),
            Self::Busy(err) => f.debug_tuple("Busy").field(err).finish(),
            Self::Dc(err) => f.debug_tuple("Dc").field(err).finish(),
            Self::Rst(err) => f.debug_tuple("Rst").field(err).finish(),
        }
    }
}
