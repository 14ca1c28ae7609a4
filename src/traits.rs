use crate::color::Color;

/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Command: Copy {
    fn address(self) -> u8;
}

/// Seperates the different waveforms for the Display Refresh process
///
/// The mode is selected by [`initialize`](crate::epd2in13::Epd2in13::initialize) and decides
/// which LUT, VCOM and border values the controller gets.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default)]
pub enum UpdateMode {
    /// The "normal" full Lookuptable for the Refresh-Sequence
    #[default]
    Full,
    /// The quick LUT where not the full refresh sequence is followed.
    /// This leads to ghosting, a full refresh is needed from time to time.
    Partial,
}

/// The capabilities the driver needs from the physical connection.
///
/// Everything related to bus setup (clock speed, pin assignment, chip select)
/// is done before the transport is handed to the driver.
/// [`DisplayInterface`](crate::interface::DisplayInterface) implements it for
/// `embedded-hal` peripherals, tests use recording doubles.
pub trait Transport {
    /// Error of the underlying bus or pins
    type Error;

    /// Sends a command byte (data/command line low)
    fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Sends data bytes (data/command line high)
    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Reads the busy line, `true` while the controller is working
    fn is_busy(&mut self) -> Result<bool, Self::Error>;

    /// Drives the reset line
    fn set_reset(&mut self, high: bool) -> Result<(), Self::Error>;

    /// Blocks for the given amount of milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// A monochrome source image the driver can read from.
///
/// Anything that can answer "black or white" for a coordinate works, the
/// driver never writes to it.
pub trait MonoBitmap {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Color of the pixel at (x, y), callers stay within width/height
    fn pixel(&self, x: u32, y: u32) -> Color;
}

impl<T: MonoBitmap + ?Sized> MonoBitmap for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        (**self).pixel(x, y)
    }
}
